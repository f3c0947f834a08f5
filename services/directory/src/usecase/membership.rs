//! Membership state machine.
//!
//! States: `NONE → PENDING → APPROVED`, `PENDING → REJECTED`,
//! `APPROVED → LEFT (deleted)`. NONE and LEFT are the absence of a record.
//!
//! Every transition touches several independently-owned writes with no
//! cross-document transaction: the church-side member record, the user-side
//! membership row, the identity-provider claims, and the aggregate counter.
//! Writes are issued in that fixed order so a partial failure leaves the
//! more-authoritative document updated first; claims and counter failures
//! are logged and swallowed because the transition itself already happened.

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use steeple_domain::membership::MembershipStatus;
use steeple_domain::pagination::PageRequest;
use steeple_domain::role::ChurchRole;

use crate::domain::repository::{
    ChurchRepository, ClaimsPort, MemberRecordRepository, MembershipRepository, StatCounter,
    StatsRepository, UserRepository,
};
use crate::domain::types::{ChurchMembership, MemberRecord};
use crate::error::DirectoryServiceError;
use crate::usecase::claims::{ClaimsGateway, log_claims_divergence};

fn log_stats_drift(church_id: Uuid, delta: i64, err: &DirectoryServiceError) {
    tracing::error!(
        target: "stats_drift",
        %church_id,
        delta,
        error = %err,
        "member_count delta lost; reconciliation sweep will repair"
    );
}

// ── RequestMembership ────────────────────────────────────────────────────────

pub struct RequestMembershipInput {
    pub user_id: Uuid,
    pub church_id: Uuid,
    pub answers: Value,
}

pub struct RequestMembershipUseCase<U, C, M, R>
where
    U: UserRepository,
    C: ChurchRepository,
    M: MembershipRepository,
    R: MemberRecordRepository,
{
    pub users: U,
    pub churches: C,
    pub memberships: M,
    pub member_records: R,
}

impl<U, C, M, R> RequestMembershipUseCase<U, C, M, R>
where
    U: UserRepository,
    C: ChurchRepository,
    M: MembershipRepository,
    R: MemberRecordRepository,
{
    pub async fn execute(
        &self,
        input: RequestMembershipInput,
    ) -> Result<ChurchMembership, DirectoryServiceError> {
        let user = self
            .users
            .find_by_id(input.user_id)
            .await?
            .ok_or(DirectoryServiceError::UserNotFound)?;
        let church = self
            .churches
            .find_by_id(input.church_id)
            .await?
            .ok_or(DirectoryServiceError::ChurchNotFound)?;

        // Uniqueness is the state machine's contract, not the storage
        // layer's: at most one membership per (user, church).
        if self
            .memberships
            .find(input.user_id, input.church_id)
            .await?
            .is_some()
        {
            return Err(DirectoryServiceError::MembershipAlreadyExists);
        }

        let now = Utc::now();
        let membership = ChurchMembership {
            user_id: user.id,
            church_id: church.id,
            church_name: church.name.clone(),
            role: ChurchRole::Visitor,
            status: MembershipStatus::Pending,
            answers: input.answers.clone(),
            joined_at: now,
            approved_at: None,
            updated_at: now,
        };
        let record = MemberRecord {
            church_id: church.id,
            user_id: user.id,
            role: ChurchRole::Visitor,
            status: MembershipStatus::Pending,
            rejection_reason: None,
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            photo_url: user.photo_url.clone(),
            answers: input.answers,
            joined_at: now,
            approved_at: None,
            updated_at: now,
        };

        // User-side first: a crash between the two writes leaves the user's
        // own view correct and the church-side mirror missing. No rollback.
        self.memberships.create(&membership).await?;
        self.member_records.create(&record).await?;

        Ok(membership)
    }
}

// ── ApproveMembership ────────────────────────────────────────────────────────

pub struct ApproveMembershipUseCase<M, R, CL, S>
where
    M: MembershipRepository,
    R: MemberRecordRepository,
    CL: ClaimsPort,
    S: StatsRepository,
{
    pub memberships: M,
    pub member_records: R,
    pub claims: ClaimsGateway<CL>,
    pub stats: S,
}

impl<M, R, CL, S> ApproveMembershipUseCase<M, R, CL, S>
where
    M: MembershipRepository,
    R: MemberRecordRepository,
    CL: ClaimsPort,
    S: StatsRepository,
{
    pub async fn execute(
        &self,
        church_id: Uuid,
        user_id: Uuid,
        role: ChurchRole,
    ) -> Result<(), DirectoryServiceError> {
        let record = self
            .member_records
            .find(church_id, user_id)
            .await?
            .ok_or(DirectoryServiceError::MembershipNotFound)?;
        if record.status != MembershipStatus::Pending {
            return Err(DirectoryServiceError::MembershipNotPending);
        }

        let now = Utc::now();

        // (a) member record, the church's authoritative view.
        self.member_records
            .approve(church_id, user_id, role, now)
            .await?;

        // (b) user's own membership row.
        self.memberships
            .set_status_role(user_id, church_id, MembershipStatus::Approved, role, Some(now))
            .await?;

        // (c) claims: synchronous, failure logged, never rolled back.
        if let Err(e) = self.claims.set_church_role(user_id, church_id, role).await {
            log_claims_divergence(user_id, church_id, &e);
        }

        // (d) counter last: the least consequential write if lost.
        if let Err(e) = self.stats.add(church_id, StatCounter::Members, 1).await {
            log_stats_drift(church_id, 1, &e);
        }

        Ok(())
    }
}

// ── RejectMembership ─────────────────────────────────────────────────────────

pub struct RejectMembershipUseCase<M, R>
where
    M: MembershipRepository,
    R: MemberRecordRepository,
{
    pub memberships: M,
    pub member_records: R,
}

impl<M, R> RejectMembershipUseCase<M, R>
where
    M: MembershipRepository,
    R: MemberRecordRepository,
{
    /// Rejections are retained on the church side as an audit trail but
    /// removed from the user-facing list. Counters are never touched.
    pub async fn execute(
        &self,
        church_id: Uuid,
        user_id: Uuid,
        reason: &str,
    ) -> Result<(), DirectoryServiceError> {
        let record = self
            .member_records
            .find(church_id, user_id)
            .await?
            .ok_or(DirectoryServiceError::MembershipNotFound)?;
        if record.status != MembershipStatus::Pending {
            return Err(DirectoryServiceError::MembershipNotPending);
        }

        let now = Utc::now();
        self.member_records
            .reject(church_id, user_id, reason, now)
            .await?;
        self.memberships.delete(user_id, church_id).await?;
        Ok(())
    }
}

// ── LeaveChurch ──────────────────────────────────────────────────────────────

pub struct LeaveChurchUseCase<M, R, CL, S>
where
    M: MembershipRepository,
    R: MemberRecordRepository,
    CL: ClaimsPort,
    S: StatsRepository,
{
    pub memberships: M,
    pub member_records: R,
    pub claims: ClaimsGateway<CL>,
    pub stats: S,
}

impl<M, R, CL, S> LeaveChurchUseCase<M, R, CL, S>
where
    M: MembershipRepository,
    R: MemberRecordRepository,
    CL: ClaimsPort,
    S: StatsRepository,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        church_id: Uuid,
    ) -> Result<(), DirectoryServiceError> {
        let membership = self
            .memberships
            .find(user_id, church_id)
            .await?
            .ok_or(DirectoryServiceError::MembershipNotFound)?;
        let was_approved = membership.status == MembershipStatus::Approved;

        // Same ordering discipline as approve: church-side record first.
        self.member_records.delete(church_id, user_id).await?;
        self.memberships.delete(user_id, church_id).await?;

        if let Err(e) = self.claims.remove_church_role(user_id, church_id).await {
            log_claims_divergence(user_id, church_id, &e);
        }

        // Pending requesters never counted; only approved members decrement.
        if was_approved {
            if let Err(e) = self.stats.add(church_id, StatCounter::Members, -1).await {
                log_stats_drift(church_id, -1, &e);
            }
        }

        Ok(())
    }
}

// ── UpdateMemberRole ─────────────────────────────────────────────────────────

pub struct UpdateMemberRoleUseCase<M, R, CL>
where
    M: MembershipRepository,
    R: MemberRecordRepository,
    CL: ClaimsPort,
{
    pub memberships: M,
    pub member_records: R,
    pub claims: ClaimsGateway<CL>,
}

impl<M, R, CL> UpdateMemberRoleUseCase<M, R, CL>
where
    M: MembershipRepository,
    R: MemberRecordRepository,
    CL: ClaimsPort,
{
    /// A role update racing a leave resolves last-write-wins per row; no
    /// distributed lock.
    pub async fn execute(
        &self,
        church_id: Uuid,
        user_id: Uuid,
        role: ChurchRole,
    ) -> Result<(), DirectoryServiceError> {
        let record = self
            .member_records
            .find(church_id, user_id)
            .await?
            .ok_or(DirectoryServiceError::MembershipNotFound)?;
        if record.status != MembershipStatus::Approved {
            return Err(DirectoryServiceError::MembershipNotApproved);
        }

        self.member_records.set_role(church_id, user_id, role).await?;
        self.memberships.set_role(user_id, church_id, role).await?;

        if let Err(e) = self.claims.set_church_role(user_id, church_id, role).await {
            log_claims_divergence(user_id, church_id, &e);
        }
        Ok(())
    }
}

// ── Reads ────────────────────────────────────────────────────────────────────

pub struct ListPendingMembershipsUseCase<R: MemberRecordRepository> {
    pub member_records: R,
}

impl<R: MemberRecordRepository> ListPendingMembershipsUseCase<R> {
    pub async fn execute(
        &self,
        church_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<MemberRecord>, DirectoryServiceError> {
        self.member_records
            .list_pending(church_id, page.clamped())
            .await
    }
}

pub struct MyMembershipsUseCase<M: MembershipRepository> {
    pub memberships: M,
}

impl<M: MembershipRepository> MyMembershipsUseCase<M> {
    pub async fn execute(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ChurchMembership>, DirectoryServiceError> {
        self.memberships.list_by_user(user_id).await
    }
}

// ── CascadeDeleteUser ────────────────────────────────────────────────────────

pub struct CascadeDeleteUserUseCase<U, M, R, CL, S>
where
    U: UserRepository,
    M: MembershipRepository,
    R: MemberRecordRepository,
    CL: ClaimsPort,
    S: StatsRepository,
{
    pub users: U,
    pub memberships: M,
    pub member_records: R,
    pub claims: ClaimsGateway<CL>,
    pub stats: S,
}

impl<U, M, R, CL, S> CascadeDeleteUserUseCase<U, M, R, CL, S>
where
    U: UserRepository,
    M: MembershipRepository,
    R: MemberRecordRepository,
    CL: ClaimsPort,
    S: StatsRepository,
{
    /// Consumes the identity provider's account-deletion event: remove every
    /// membership trace, then the user row itself.
    pub async fn execute(&self, user_id: Uuid) -> Result<(), DirectoryServiceError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(DirectoryServiceError::UserNotFound);
        }

        let records = self.member_records.list_by_user(user_id).await?;
        for record in records {
            self.member_records.delete(record.church_id, user_id).await?;
            self.memberships.delete(user_id, record.church_id).await?;
            if record.status == MembershipStatus::Approved {
                if let Err(e) = self
                    .stats
                    .add(record.church_id, StatCounter::Members, -1)
                    .await
                {
                    log_stats_drift(record.church_id, -1, &e);
                }
            }
        }

        // The provider account is already gone; this is best-effort cleanup
        // of any straggling claims document.
        if let Err(e) = self.claims.delete_all(user_id).await {
            tracing::warn!(%user_id, error = %e, "claims cleanup failed during account deletion");
        }

        self.users.delete(user_id).await
    }
}
