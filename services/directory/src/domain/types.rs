use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use steeple_domain::church::ChurchLevel;
use steeple_domain::membership::MembershipStatus;
use steeple_domain::role::{ChurchRole, SystemRole};

/// User profile, the identity anchor. The display fields are the canonical
/// copies that the sync engine propagates to member records and sermons.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub photo_url: Option<String>,
    pub system_role: SystemRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Church node in the hierarchy.
#[derive(Debug, Clone)]
pub struct Church {
    pub id: Uuid,
    pub name: String,
    pub level: ChurchLevel,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-church aggregate counters. Derived, never authoritative.
#[derive(Debug, Clone)]
pub struct ChurchStats {
    pub church_id: Uuid,
    pub member_count: i64,
    pub event_count: i64,
    pub sermon_count: i64,
    pub updated_at: DateTime<Utc>,
}

/// One user↔church relationship as the *user* sees it.
///
/// Mirrored into a [`MemberRecord`] on the church side. Neither copy is
/// globally authoritative; the sync engine and state machine keep them
/// convergent.
#[derive(Debug, Clone)]
pub struct ChurchMembership {
    pub user_id: Uuid,
    pub church_id: Uuid,
    pub church_name: String,
    pub role: ChurchRole,
    pub status: MembershipStatus,
    pub answers: Value,
    pub joined_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// One user↔church relationship as the *church* sees it, with cached copies
/// of the user's display fields (a read-optimized cache; staleness is
/// bounded by sync-engine propagation latency).
#[derive(Debug, Clone)]
pub struct MemberRecord {
    pub church_id: Uuid,
    pub user_id: Uuid,
    pub role: ChurchRole,
    pub status: MembershipStatus,
    pub rejection_reason: Option<String>,
    pub display_name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub answers: Value,
    pub joined_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Sermon with denormalized speaker name.
#[derive(Debug, Clone)]
pub struct Sermon {
    pub id: Uuid,
    pub church_id: Uuid,
    pub title: String,
    pub speaker_user_id: Option<Uuid>,
    pub speaker_name: String,
    pub preached_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Church calendar event.
#[derive(Debug, Clone)]
pub struct ChurchEvent {
    pub id: Uuid,
    pub church_id: Uuid,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A new outbox event, written in the same transaction as the change it
/// describes.
#[derive(Debug, Clone)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: Value,
    pub idempotency_key: String,
}

/// An outbox event as read back by the dispatcher.
#[derive(Debug, Clone)]
pub struct StoredOutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: Value,
    pub attempts: i32,
    pub created_at: DateTime<Utc>,
}

/// Distinguish an absent field from an explicit `null`: absent stays `None`
/// via `default`, while a present value (including `null`) becomes `Some`.
pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(de).map(Some)
}

/// Field-level diff of a user's tracked display fields.
///
/// `photo_url` is doubly optional: the outer level means "changed or not",
/// the inner level is the new (possibly cleared) value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub photo_url: Option<Option<String>>,
}

impl ProfileChanges {
    /// True when no tracked field changed. Such an update must propagate
    /// nothing.
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.photo_url.is_none()
    }

    /// Diff `user` against the requested new values, keeping only fields
    /// whose value actually differs.
    pub fn diff(
        user: &User,
        display_name: Option<&str>,
        first_name: Option<&str>,
        last_name: Option<&str>,
        email: Option<&str>,
        photo_url: Option<Option<&str>>,
    ) -> Self {
        let mut changes = Self::default();
        if let Some(v) = display_name {
            if v != user.display_name {
                changes.display_name = Some(v.to_owned());
            }
        }
        if let Some(v) = first_name {
            if v != user.first_name {
                changes.first_name = Some(v.to_owned());
            }
        }
        if let Some(v) = last_name {
            if v != user.last_name {
                changes.last_name = Some(v.to_owned());
            }
        }
        if let Some(v) = email {
            if v != user.email {
                changes.email = Some(v.to_owned());
            }
        }
        if let Some(v) = photo_url {
            if v != user.photo_url.as_deref() {
                changes.photo_url = Some(v.map(str::to_owned));
            }
        }
        changes
    }
}
