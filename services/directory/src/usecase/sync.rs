//! Denormalization sync engine.
//!
//! Fans a user's profile diff out to every place the fields are duplicated:
//! the member record under each of the user's churches, and the cached
//! speaker name on their sermons. Fan-out is bounded in practice by how many
//! churches one user belongs to, but writes are still grouped into
//! capped batches; a fan-out larger than one batch is chunked across
//! several, never truncated.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::repository::{MemberRecordRepository, MembershipRepository, SermonRepository};
use crate::domain::types::ProfileChanges;
use crate::error::DirectoryServiceError;

/// Hard upper bound on writes per batch, leaving headroom under the
/// platform's 500-write batch cap.
pub const SYNC_BATCH_LIMIT: usize = 450;

/// What one sync pass touched; used for logging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    pub member_records: usize,
    pub batches: usize,
    pub sermons_updated: u64,
}

pub struct SyncProfileUseCase<M, R, S>
where
    M: MembershipRepository,
    R: MemberRecordRepository,
    S: SermonRepository,
{
    pub memberships: M,
    pub member_records: R,
    pub sermons: S,
}

impl<M, R, S> SyncProfileUseCase<M, R, S>
where
    M: MembershipRepository,
    R: MemberRecordRepository,
    S: SermonRepository,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        changes: &ProfileChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<SyncOutcome, DirectoryServiceError> {
        if changes.is_empty() {
            return Ok(SyncOutcome {
                member_records: 0,
                batches: 0,
                sermons_updated: 0,
            });
        }

        let memberships = self.memberships.list_by_user(user_id).await?;
        let church_ids: Vec<Uuid> = memberships.iter().map(|m| m.church_id).collect();

        let mut batches = 0;
        for chunk in church_ids.chunks(SYNC_BATCH_LIMIT) {
            self.member_records
                .apply_profile_changes(user_id, chunk, changes, updated_at)
                .await?;
            batches += 1;
        }

        // Sermons only cache the display name; other fields never reach them.
        let mut sermons_updated = 0;
        if let Some(name) = &changes.display_name {
            sermons_updated = self.sermons.update_speaker_name(user_id, name).await?;
        }

        let outcome = SyncOutcome {
            member_records: church_ids.len(),
            batches,
            sermons_updated,
        };
        tracing::debug!(
            %user_id,
            member_records = outcome.member_records,
            batches = outcome.batches,
            sermons = outcome.sermons_updated,
            "profile sync applied"
        );
        Ok(outcome)
    }
}

/// Profile sync runs after the profile edit already succeeded; a sync
/// failure must stay invisible to that caller and visible to operators.
pub fn log_sync_failure(user_id: Uuid, err: &DirectoryServiceError) {
    tracing::error!(
        target: "sync_drift",
        %user_id,
        error = %err,
        "profile sync failed; denormalized copies remain stale"
    );
}
