//! Outbox dispatcher, the single consumer of the event log.
//!
//! Drains due events oldest-first and routes each to its named applier.
//! Counter events are applied and acknowledged in one transaction
//! (exactly-once); profile-sync events are at-least-once with idempotent
//! absolute-value writes. A handler failure backs the event off
//! exponentially; after `MAX_ATTEMPTS` it is marked terminally failed and
//! left for operators.

use anyhow::Context as _;
use chrono::{DateTime, Duration, Utc};

use crate::domain::events::{self, ContentPayload, ProfileUpdatedPayload};
use crate::domain::repository::{
    MemberRecordRepository, MembershipRepository, OutboxRepository, SermonRepository, StatCounter,
    StatsRepository,
};
use crate::domain::types::StoredOutboxEvent;
use crate::error::DirectoryServiceError;
use crate::usecase::sync::{SyncProfileUseCase, log_sync_failure};

pub const MAX_ATTEMPTS: i32 = 5;
pub const DRAIN_LIMIT: u32 = 100;

const BACKOFF_BASE_SECS: i64 = 30;
const BACKOFF_CAP_SECS: i64 = 3600;

/// Exponential backoff for the next delivery attempt.
pub fn backoff_delay(attempts: i32) -> Duration {
    let exp = attempts.clamp(0, 8) as u32;
    let secs = (BACKOFF_BASE_SECS << exp).min(BACKOFF_CAP_SECS);
    Duration::seconds(secs)
}

/// Whether the applier acknowledged the event inside its own transaction.
enum Ack {
    Inline,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainOutcome {
    pub processed: u32,
    pub failed: u32,
}

pub struct OutboxDispatcher<O, M, R, SR, S>
where
    O: OutboxRepository,
    M: MembershipRepository,
    R: MemberRecordRepository,
    SR: SermonRepository,
    S: StatsRepository,
{
    pub outbox: O,
    pub sync: SyncProfileUseCase<M, R, SR>,
    pub stats: S,
}

impl<O, M, R, SR, S> OutboxDispatcher<O, M, R, SR, S>
where
    O: OutboxRepository,
    M: MembershipRepository,
    R: MemberRecordRepository,
    SR: SermonRepository,
    S: StatsRepository,
{
    pub async fn drain(&self, now: DateTime<Utc>) -> Result<DrainOutcome, DirectoryServiceError> {
        let due = self.outbox.due(now, DRAIN_LIMIT).await?;
        let mut outcome = DrainOutcome {
            processed: 0,
            failed: 0,
        };

        for event in due {
            match self.dispatch(&event).await {
                Ok(Ack::Inline) => outcome.processed += 1,
                Ok(Ack::Pending) => {
                    self.outbox.mark_processed(event.id, Utc::now()).await?;
                    outcome.processed += 1;
                }
                Err(e) => {
                    outcome.failed += 1;
                    let attempts = event.attempts + 1;
                    let terminal = attempts >= MAX_ATTEMPTS;
                    tracing::warn!(
                        event_id = %event.id,
                        kind = %event.kind,
                        attempts,
                        terminal,
                        error = %e,
                        "outbox event handler failed"
                    );
                    self.outbox
                        .record_failure(
                            event.id,
                            &e.to_string(),
                            attempts,
                            now + backoff_delay(attempts),
                            terminal,
                        )
                        .await?;
                }
            }
        }
        Ok(outcome)
    }

    async fn dispatch(&self, event: &StoredOutboxEvent) -> Result<Ack, DirectoryServiceError> {
        match event.kind.as_str() {
            events::PROFILE_UPDATED => {
                let payload: ProfileUpdatedPayload =
                    serde_json::from_value(event.payload.clone())
                        .context("decode profile_updated payload")?;
                self.sync
                    .execute(payload.user_id, &payload.changes, event.created_at)
                    .await
                    .map_err(|e| {
                        log_sync_failure(payload.user_id, &e);
                        e
                    })?;
                Ok(Ack::Pending)
            }
            events::SERMON_CREATED => self.counter(event, StatCounter::Sermons, 1).await,
            events::SERMON_DELETED => self.counter(event, StatCounter::Sermons, -1).await,
            events::EVENT_CREATED => self.counter(event, StatCounter::Events, 1).await,
            events::EVENT_DELETED => self.counter(event, StatCounter::Events, -1).await,
            other => Err(DirectoryServiceError::Internal(anyhow::anyhow!(
                "unknown outbox event kind: {other}"
            ))),
        }
    }

    async fn counter(
        &self,
        event: &StoredOutboxEvent,
        counter: StatCounter,
        delta: i64,
    ) -> Result<Ack, DirectoryServiceError> {
        let payload: ContentPayload =
            serde_json::from_value(event.payload.clone()).context("decode counter payload")?;
        // Delta and ack share one transaction; redelivery cannot double-apply.
        self.stats
            .add_with_ack(payload.church_id, counter, delta, event.id)
            .await?;
        Ok(Ack::Inline)
    }
}
