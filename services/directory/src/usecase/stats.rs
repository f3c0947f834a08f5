//! Aggregate counter maintenance.
//!
//! `event_count` and `sermon_count` are driven by outbox events (the
//! dispatcher applies each delta in the same transaction that marks the
//! event processed, so redelivery cannot double-apply). `member_count` is
//! maintained inline by the membership state machine. All counters are
//! derived and recomputable from the source tables.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{
    EventRepository, MemberRecordRepository, SermonRepository, StatsRepository,
};
use crate::domain::types::ChurchStats;
use crate::error::DirectoryServiceError;

/// Reconciliation sweep: recount every counter from its source table and
/// overwrite the aggregate row. Restores counters after drift from lost
/// best-effort deltas.
pub struct RecomputeStatsUseCase<R, SR, E, S>
where
    R: MemberRecordRepository,
    SR: SermonRepository,
    E: EventRepository,
    S: StatsRepository,
{
    pub member_records: R,
    pub sermons: SR,
    pub events: E,
    pub stats: S,
}

impl<R, SR, E, S> RecomputeStatsUseCase<R, SR, E, S>
where
    R: MemberRecordRepository,
    SR: SermonRepository,
    E: EventRepository,
    S: StatsRepository,
{
    pub async fn execute(&self, church_id: Uuid) -> Result<ChurchStats, DirectoryServiceError> {
        // Missing stats row means the church does not exist.
        self.stats
            .get(church_id)
            .await?
            .ok_or(DirectoryServiceError::ChurchNotFound)?;

        let member_count = self.member_records.count_approved(church_id).await?;
        let sermon_count = self.sermons.count_by_church(church_id).await?;
        let event_count = self.events.count_by_church(church_id).await?;

        self.stats
            .set_counts(church_id, member_count, event_count, sermon_count)
            .await?;

        tracing::info!(
            %church_id,
            member_count,
            event_count,
            sermon_count,
            "stats recomputed from source tables"
        );
        Ok(ChurchStats {
            church_id,
            member_count,
            event_count,
            sermon_count,
            updated_at: Utc::now(),
        })
    }
}
