//! Outbox event kinds and payloads.
//!
//! Every reactive propagation in the service flows through these events:
//! one named kind per trigger, each with a deterministic idempotency key so
//! duplicate emission is rejected at insert and duplicate delivery cannot
//! double-apply.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::{OutboxEvent, ProfileChanges};

pub const PROFILE_UPDATED: &str = "profile_updated";
pub const SERMON_CREATED: &str = "sermon_created";
pub const SERMON_DELETED: &str = "sermon_deleted";
pub const EVENT_CREATED: &str = "event_created";
pub const EVENT_DELETED: &str = "event_deleted";

/// Payload of a `profile_updated` event: only the fields that changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdatedPayload {
    pub user_id: Uuid,
    pub changes: ProfileChanges,
}

/// Payload of sermon/event lifecycle events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPayload {
    pub church_id: Uuid,
    pub content_id: Uuid,
}

pub fn profile_updated(
    user_id: Uuid,
    changes: &ProfileChanges,
    updated_at: DateTime<Utc>,
) -> OutboxEvent {
    let payload = ProfileUpdatedPayload {
        user_id,
        changes: changes.clone(),
    };
    OutboxEvent {
        id: Uuid::new_v4(),
        kind: PROFILE_UPDATED.to_owned(),
        payload: serde_json::to_value(payload).expect("profile payload serializes"),
        idempotency_key: format!(
            "{PROFILE_UPDATED}:{user_id}:{}",
            updated_at.timestamp_millis()
        ),
    }
}

pub fn sermon_created(church_id: Uuid, sermon_id: Uuid) -> OutboxEvent {
    content_event(SERMON_CREATED, church_id, sermon_id)
}

pub fn sermon_deleted(church_id: Uuid, sermon_id: Uuid) -> OutboxEvent {
    content_event(SERMON_DELETED, church_id, sermon_id)
}

pub fn event_created(church_id: Uuid, event_id: Uuid) -> OutboxEvent {
    content_event(EVENT_CREATED, church_id, event_id)
}

pub fn event_deleted(church_id: Uuid, event_id: Uuid) -> OutboxEvent {
    content_event(EVENT_DELETED, church_id, event_id)
}

fn content_event(kind: &str, church_id: Uuid, content_id: Uuid) -> OutboxEvent {
    let payload = ContentPayload {
        church_id,
        content_id,
    };
    OutboxEvent {
        id: Uuid::new_v4(),
        kind: kind.to_owned(),
        payload: serde_json::to_value(payload).expect("content payload serializes"),
        idempotency_key: format!("{kind}:{content_id}"),
    }
}
