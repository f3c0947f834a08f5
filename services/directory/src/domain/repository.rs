#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use steeple_auth_types::claims::Claims;
use steeple_domain::membership::MembershipStatus;
use steeple_domain::pagination::PageRequest;
use steeple_domain::role::ChurchRole;

use crate::domain::types::{
    Church, ChurchEvent, ChurchMembership, ChurchStats, MemberRecord, OutboxEvent,
    ProfileChanges, Sermon, StoredOutboxEvent, User,
};
use crate::error::DirectoryServiceError;

/// Repository for user profiles.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DirectoryServiceError>;
    async fn create(&self, user: &User) -> Result<(), DirectoryServiceError>;

    /// Apply a profile diff and insert the matching outbox event atomically
    /// (same transaction).
    async fn update_profile_with_outbox(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
        updated_at: DateTime<Utc>,
        event: &OutboxEvent,
    ) -> Result<(), DirectoryServiceError>;

    async fn delete(&self, id: Uuid) -> Result<(), DirectoryServiceError>;
}

/// Repository for churches. Creating a church also seeds its stats row.
pub trait ChurchRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Church>, DirectoryServiceError>;
    async fn create(&self, church: &Church) -> Result<(), DirectoryServiceError>;
}

/// Repository for the user-side membership rows (`user_memberships`).
pub trait MembershipRepository: Send + Sync {
    async fn find(
        &self,
        user_id: Uuid,
        church_id: Uuid,
    ) -> Result<Option<ChurchMembership>, DirectoryServiceError>;

    async fn list_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ChurchMembership>, DirectoryServiceError>;

    async fn create(&self, membership: &ChurchMembership) -> Result<(), DirectoryServiceError>;

    async fn set_status_role(
        &self,
        user_id: Uuid,
        church_id: Uuid,
        status: MembershipStatus,
        role: ChurchRole,
        approved_at: Option<DateTime<Utc>>,
    ) -> Result<(), DirectoryServiceError>;

    async fn set_role(
        &self,
        user_id: Uuid,
        church_id: Uuid,
        role: ChurchRole,
    ) -> Result<(), DirectoryServiceError>;

    /// Delete one membership row. Returns `true` if a row was deleted.
    async fn delete(&self, user_id: Uuid, church_id: Uuid)
    -> Result<bool, DirectoryServiceError>;
}

/// Repository for the church-side member mirror (`church_members`).
pub trait MemberRecordRepository: Send + Sync {
    async fn find(
        &self,
        church_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<MemberRecord>, DirectoryServiceError>;

    async fn list_pending(
        &self,
        church_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<MemberRecord>, DirectoryServiceError>;

    async fn list_by_user(&self, user_id: Uuid)
    -> Result<Vec<MemberRecord>, DirectoryServiceError>;

    async fn create(&self, record: &MemberRecord) -> Result<(), DirectoryServiceError>;

    async fn approve(
        &self,
        church_id: Uuid,
        user_id: Uuid,
        role: ChurchRole,
        approved_at: DateTime<Utc>,
    ) -> Result<(), DirectoryServiceError>;

    async fn reject(
        &self,
        church_id: Uuid,
        user_id: Uuid,
        reason: &str,
        rejected_at: DateTime<Utc>,
    ) -> Result<(), DirectoryServiceError>;

    async fn set_role(
        &self,
        church_id: Uuid,
        user_id: Uuid,
        role: ChurchRole,
    ) -> Result<(), DirectoryServiceError>;

    /// Delete one member record. Returns `true` if a row was deleted.
    async fn delete(&self, church_id: Uuid, user_id: Uuid)
    -> Result<bool, DirectoryServiceError>;

    /// Apply a profile diff to the user's records in the given churches as a
    /// single bounded batch. Callers chunk the fan-out; one call must stay
    /// within the platform batch-write cap.
    async fn apply_profile_changes(
        &self,
        user_id: Uuid,
        church_ids: &[Uuid],
        changes: &ProfileChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DirectoryServiceError>;

    /// Approved-member count straight from the source table, for
    /// reconciliation.
    async fn count_approved(&self, church_id: Uuid) -> Result<i64, DirectoryServiceError>;
}

/// Which aggregate counter a delta applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatCounter {
    Members,
    Events,
    Sermons,
}

/// Repository for per-church aggregate counters.
///
/// Deltas must be applied with the store's atomic increment expression,
/// never read-then-write in application code.
pub trait StatsRepository: Send + Sync {
    async fn get(&self, church_id: Uuid) -> Result<Option<ChurchStats>, DirectoryServiceError>;

    async fn add(
        &self,
        church_id: Uuid,
        counter: StatCounter,
        delta: i64,
    ) -> Result<(), DirectoryServiceError>;

    /// Apply a delta and mark the driving outbox event processed in one
    /// transaction, so redelivery cannot double-apply.
    async fn add_with_ack(
        &self,
        church_id: Uuid,
        counter: StatCounter,
        delta: i64,
        ack_event_id: Uuid,
    ) -> Result<(), DirectoryServiceError>;

    /// Overwrite all counters with recomputed absolute values.
    async fn set_counts(
        &self,
        church_id: Uuid,
        member_count: i64,
        event_count: i64,
        sermon_count: i64,
    ) -> Result<(), DirectoryServiceError>;
}

/// Repository for sermons.
pub trait SermonRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Sermon>, DirectoryServiceError>;

    /// Insert a sermon and its lifecycle outbox event atomically.
    async fn create_with_outbox(
        &self,
        sermon: &Sermon,
        event: &OutboxEvent,
    ) -> Result<(), DirectoryServiceError>;

    /// Delete a sermon and insert its lifecycle outbox event atomically.
    async fn delete_with_outbox(
        &self,
        id: Uuid,
        event: &OutboxEvent,
    ) -> Result<(), DirectoryServiceError>;

    async fn count_by_church(&self, church_id: Uuid) -> Result<i64, DirectoryServiceError>;

    /// Update the cached speaker name on every sermon of the given speaker.
    /// Returns the number of sermons touched.
    async fn update_speaker_name(
        &self,
        speaker_user_id: Uuid,
        speaker_name: &str,
    ) -> Result<u64, DirectoryServiceError>;
}

/// Repository for church calendar events.
pub trait EventRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChurchEvent>, DirectoryServiceError>;

    async fn create_with_outbox(
        &self,
        event: &ChurchEvent,
        outbox: &OutboxEvent,
    ) -> Result<(), DirectoryServiceError>;

    async fn delete_with_outbox(
        &self,
        id: Uuid,
        outbox: &OutboxEvent,
    ) -> Result<(), DirectoryServiceError>;

    async fn count_by_church(&self, church_id: Uuid) -> Result<i64, DirectoryServiceError>;
}

/// Repository for the outbox event log.
pub trait OutboxRepository: Send + Sync {
    /// Unprocessed, unfailed events whose next_attempt_at has passed, oldest
    /// first.
    async fn due(
        &self,
        now: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<StoredOutboxEvent>, DirectoryServiceError>;

    async fn mark_processed(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), DirectoryServiceError>;

    /// Record a handler failure. `failed` marks the event terminally failed
    /// (no further attempts).
    async fn record_failure(
        &self,
        id: Uuid,
        error: &str,
        attempts: i32,
        next_attempt_at: DateTime<Utc>,
        failed: bool,
    ) -> Result<(), DirectoryServiceError>;
}

/// Port for the external identity provider's custom-claims storage.
pub trait ClaimsPort: Send + Sync {
    /// Claims for a user. Users with no custom claims yet get the default
    /// document.
    async fn get_claims(&self, user_id: Uuid) -> Result<Claims, DirectoryServiceError>;
    async fn set_claims(
        &self,
        user_id: Uuid,
        claims: &Claims,
    ) -> Result<(), DirectoryServiceError>;
    async fn delete_claims(&self, user_id: Uuid) -> Result<(), DirectoryServiceError>;
}
