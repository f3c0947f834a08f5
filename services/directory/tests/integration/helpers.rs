use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

use steeple_auth_types::claims::Claims;
use steeple_domain::church::ChurchLevel;
use steeple_domain::membership::MembershipStatus;
use steeple_domain::pagination::PageRequest;
use steeple_domain::role::{ChurchRole, SystemRole};
use steeple_testing::claims::InMemoryClaims;

use steeple_directory::domain::repository::{
    ChurchRepository, ClaimsPort, EventRepository, MemberRecordRepository, MembershipRepository,
    OutboxRepository, SermonRepository, StatCounter, StatsRepository, UserRepository,
};
use steeple_directory::domain::types::{
    Church, ChurchEvent, ChurchMembership, ChurchStats, MemberRecord, OutboxEvent,
    ProfileChanges, Sermon, StoredOutboxEvent, User,
};
use steeple_directory::error::DirectoryServiceError;
use steeple_directory::usecase::claims::ClaimsGateway;

// ── Shared mock outbox ───────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct MockOutboxRow {
    pub id: Uuid,
    pub kind: String,
    pub payload: Value,
    pub idempotency_key: String,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub next_attempt_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
}

/// Event log shared between the write-side mocks (which append within their
/// "transactions") and the dispatcher (which drains it).
#[derive(Clone, Default)]
pub struct MockOutbox {
    pub rows: Arc<Mutex<Vec<MockOutboxRow>>>,
}

impl MockOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, enforcing the unique idempotency key the way the
    /// storage layer does.
    pub fn push(&self, event: &OutboxEvent) {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|r| r.idempotency_key == event.idempotency_key)
        {
            return;
        }
        let now = Utc::now();
        rows.push(MockOutboxRow {
            id: event.id,
            kind: event.kind.clone(),
            payload: event.payload.clone(),
            idempotency_key: event.idempotency_key.clone(),
            attempts: 0,
            last_error: None,
            created_at: now,
            next_attempt_at: now,
            processed_at: None,
            failed_at: None,
        });
    }

    pub fn rows_handle(&self) -> Arc<Mutex<Vec<MockOutboxRow>>> {
        Arc::clone(&self.rows)
    }

    pub fn unprocessed(&self) -> usize {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.processed_at.is_none() && r.failed_at.is_none())
            .count()
    }
}

impl OutboxRepository for MockOutbox {
    async fn due(
        &self,
        now: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<StoredOutboxEvent>, DirectoryServiceError> {
        let mut due: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                r.processed_at.is_none() && r.failed_at.is_none() && r.next_attempt_at <= now
            })
            .map(|r| StoredOutboxEvent {
                id: r.id,
                kind: r.kind.clone(),
                payload: r.payload.clone(),
                attempts: r.attempts,
                created_at: r.created_at,
            })
            .collect();
        due.sort_by_key(|e| e.created_at);
        due.truncate(limit as usize);
        Ok(due)
    }

    async fn mark_processed(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), DirectoryServiceError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|r| r.id == id) {
            row.processed_at = Some(at);
        }
        Ok(())
    }

    async fn record_failure(
        &self,
        id: Uuid,
        error: &str,
        attempts: i32,
        next_attempt_at: DateTime<Utc>,
        failed: bool,
    ) -> Result<(), DirectoryServiceError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|r| r.id == id) {
            row.attempts = attempts;
            row.last_error = Some(error.to_owned());
            row.next_attempt_at = next_attempt_at;
            if failed {
                row.failed_at = Some(Utc::now());
            }
        }
        Ok(())
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
    pub outbox: MockOutbox,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>, outbox: MockOutbox) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            outbox,
        }
    }

    pub fn users_handle(&self) -> Arc<Mutex<Vec<User>>> {
        Arc::clone(&self.users)
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DirectoryServiceError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: &User) -> Result<(), DirectoryServiceError> {
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn update_profile_with_outbox(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
        updated_at: DateTime<Utc>,
        event: &OutboxEvent,
    ) -> Result<(), DirectoryServiceError> {
        {
            let mut users = self.users.lock().unwrap();
            let user = users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or(DirectoryServiceError::UserNotFound)?;
            if let Some(v) = &changes.display_name {
                user.display_name = v.clone();
            }
            if let Some(v) = &changes.first_name {
                user.first_name = v.clone();
            }
            if let Some(v) = &changes.last_name {
                user.last_name = v.clone();
            }
            if let Some(v) = &changes.email {
                user.email = v.clone();
            }
            if let Some(v) = &changes.photo_url {
                user.photo_url = v.clone();
            }
            user.updated_at = updated_at;
        }
        self.outbox.push(event);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DirectoryServiceError> {
        self.users.lock().unwrap().retain(|u| u.id != id);
        Ok(())
    }
}

// ── MockChurchRepo ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockChurchRepo {
    pub churches: Arc<Mutex<Vec<Church>>>,
}

impl MockChurchRepo {
    pub fn new(churches: Vec<Church>) -> Self {
        Self {
            churches: Arc::new(Mutex::new(churches)),
        }
    }
}

impl ChurchRepository for MockChurchRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Church>, DirectoryServiceError> {
        Ok(self
            .churches
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn create(&self, church: &Church) -> Result<(), DirectoryServiceError> {
        self.churches.lock().unwrap().push(church.clone());
        Ok(())
    }
}

// ── MockMembershipRepo (user-side rows) ──────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockMembershipRepo {
    pub rows: Arc<Mutex<Vec<ChurchMembership>>>,
}

impl MockMembershipRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows_handle(&self) -> Arc<Mutex<Vec<ChurchMembership>>> {
        Arc::clone(&self.rows)
    }
}

impl MembershipRepository for MockMembershipRepo {
    async fn find(
        &self,
        user_id: Uuid,
        church_id: Uuid,
    ) -> Result<Option<ChurchMembership>, DirectoryServiceError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.user_id == user_id && m.church_id == church_id)
            .cloned())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ChurchMembership>, DirectoryServiceError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create(&self, membership: &ChurchMembership) -> Result<(), DirectoryServiceError> {
        self.rows.lock().unwrap().push(membership.clone());
        Ok(())
    }

    async fn set_status_role(
        &self,
        user_id: Uuid,
        church_id: Uuid,
        status: MembershipStatus,
        role: ChurchRole,
        approved_at: Option<DateTime<Utc>>,
    ) -> Result<(), DirectoryServiceError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(m) = rows
            .iter_mut()
            .find(|m| m.user_id == user_id && m.church_id == church_id)
        {
            m.status = status;
            m.role = role;
            m.approved_at = approved_at;
            m.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_role(
        &self,
        user_id: Uuid,
        church_id: Uuid,
        role: ChurchRole,
    ) -> Result<(), DirectoryServiceError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(m) = rows
            .iter_mut()
            .find(|m| m.user_id == user_id && m.church_id == church_id)
        {
            m.role = role;
            m.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(
        &self,
        user_id: Uuid,
        church_id: Uuid,
    ) -> Result<bool, DirectoryServiceError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|m| !(m.user_id == user_id && m.church_id == church_id));
        Ok(rows.len() < before)
    }
}

// ── MockMemberRecordRepo (church-side mirror) ────────────────────────────────

#[derive(Clone, Default)]
pub struct MockMemberRecordRepo {
    pub rows: Arc<Mutex<Vec<MemberRecord>>>,
    /// Chunk sizes seen by apply_profile_changes, for batching assertions.
    pub batch_sizes: Arc<Mutex<Vec<usize>>>,
}

impl MockMemberRecordRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows_handle(&self) -> Arc<Mutex<Vec<MemberRecord>>> {
        Arc::clone(&self.rows)
    }

    pub fn batch_sizes_handle(&self) -> Arc<Mutex<Vec<usize>>> {
        Arc::clone(&self.batch_sizes)
    }
}

impl MemberRecordRepository for MockMemberRecordRepo {
    async fn find(
        &self,
        church_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<MemberRecord>, DirectoryServiceError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.church_id == church_id && r.user_id == user_id)
            .cloned())
    }

    async fn list_pending(
        &self,
        church_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<MemberRecord>, DirectoryServiceError> {
        let rows = self.rows.lock().unwrap();
        let mut pending: Vec<_> = rows
            .iter()
            .filter(|r| r.church_id == church_id && r.status == MembershipStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by_key(|r| r.joined_at);
        Ok(pending
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .collect())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<MemberRecord>, DirectoryServiceError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create(&self, record: &MemberRecord) -> Result<(), DirectoryServiceError> {
        self.rows.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn approve(
        &self,
        church_id: Uuid,
        user_id: Uuid,
        role: ChurchRole,
        approved_at: DateTime<Utc>,
    ) -> Result<(), DirectoryServiceError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(r) = rows
            .iter_mut()
            .find(|r| r.church_id == church_id && r.user_id == user_id)
        {
            r.status = MembershipStatus::Approved;
            r.role = role;
            r.approved_at = Some(approved_at);
            r.updated_at = approved_at;
        }
        Ok(())
    }

    async fn reject(
        &self,
        church_id: Uuid,
        user_id: Uuid,
        reason: &str,
        rejected_at: DateTime<Utc>,
    ) -> Result<(), DirectoryServiceError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(r) = rows
            .iter_mut()
            .find(|r| r.church_id == church_id && r.user_id == user_id)
        {
            r.status = MembershipStatus::Rejected;
            r.rejection_reason = Some(reason.to_owned());
            r.updated_at = rejected_at;
        }
        Ok(())
    }

    async fn set_role(
        &self,
        church_id: Uuid,
        user_id: Uuid,
        role: ChurchRole,
    ) -> Result<(), DirectoryServiceError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(r) = rows
            .iter_mut()
            .find(|r| r.church_id == church_id && r.user_id == user_id)
        {
            r.role = role;
            r.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(
        &self,
        church_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, DirectoryServiceError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| !(r.church_id == church_id && r.user_id == user_id));
        Ok(rows.len() < before)
    }

    async fn apply_profile_changes(
        &self,
        user_id: Uuid,
        church_ids: &[Uuid],
        changes: &ProfileChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DirectoryServiceError> {
        self.batch_sizes.lock().unwrap().push(church_ids.len());
        let mut rows = self.rows.lock().unwrap();
        for r in rows
            .iter_mut()
            .filter(|r| r.user_id == user_id && church_ids.contains(&r.church_id))
        {
            if let Some(v) = &changes.display_name {
                r.display_name = v.clone();
            }
            if let Some(v) = &changes.email {
                r.email = v.clone();
            }
            if let Some(v) = &changes.photo_url {
                r.photo_url = v.clone();
            }
            r.updated_at = updated_at;
        }
        Ok(())
    }

    async fn count_approved(&self, church_id: Uuid) -> Result<i64, DirectoryServiceError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.church_id == church_id && r.status == MembershipStatus::Approved)
            .count() as i64)
    }
}

// ── MockStatsRepo ────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockStatsRepo {
    pub counts: Arc<Mutex<HashMap<Uuid, (i64, i64, i64)>>>,
    pub acked: Arc<Mutex<Vec<Uuid>>>,
    pub fail_writes: Arc<Mutex<bool>>,
    /// Events acknowledged inline also land here so redelivery tests can
    /// observe the shared outbox.
    pub outbox: Option<MockOutbox>,
}

impl MockStatsRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outbox(outbox: MockOutbox) -> Self {
        Self {
            outbox: Some(outbox),
            ..Self::default()
        }
    }

    pub fn seed(&self, church_id: Uuid) {
        self.counts.lock().unwrap().insert(church_id, (0, 0, 0));
    }

    pub fn member_count(&self, church_id: Uuid) -> i64 {
        self.counts
            .lock()
            .unwrap()
            .get(&church_id)
            .map(|c| c.0)
            .unwrap_or(0)
    }

    pub fn sermon_count(&self, church_id: Uuid) -> i64 {
        self.counts
            .lock()
            .unwrap()
            .get(&church_id)
            .map(|c| c.2)
            .unwrap_or(0)
    }

    pub fn event_count(&self, church_id: Uuid) -> i64 {
        self.counts
            .lock()
            .unwrap()
            .get(&church_id)
            .map(|c| c.1)
            .unwrap_or(0)
    }

    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    fn apply(&self, church_id: Uuid, counter: StatCounter, delta: i64) {
        let mut counts = self.counts.lock().unwrap();
        let entry = counts.entry(church_id).or_insert((0, 0, 0));
        match counter {
            StatCounter::Members => entry.0 += delta,
            StatCounter::Events => entry.1 += delta,
            StatCounter::Sermons => entry.2 += delta,
        }
    }
}

impl StatsRepository for MockStatsRepo {
    async fn get(&self, church_id: Uuid) -> Result<Option<ChurchStats>, DirectoryServiceError> {
        Ok(self
            .counts
            .lock()
            .unwrap()
            .get(&church_id)
            .map(|(m, e, s)| ChurchStats {
                church_id,
                member_count: *m,
                event_count: *e,
                sermon_count: *s,
                updated_at: Utc::now(),
            }))
    }

    async fn add(
        &self,
        church_id: Uuid,
        counter: StatCounter,
        delta: i64,
    ) -> Result<(), DirectoryServiceError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(DirectoryServiceError::Internal(anyhow::anyhow!(
                "stats store unavailable"
            )));
        }
        self.apply(church_id, counter, delta);
        Ok(())
    }

    async fn add_with_ack(
        &self,
        church_id: Uuid,
        counter: StatCounter,
        delta: i64,
        ack_event_id: Uuid,
    ) -> Result<(), DirectoryServiceError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(DirectoryServiceError::Internal(anyhow::anyhow!(
                "stats store unavailable"
            )));
        }
        // Delta and ack are one transaction in the real repository.
        self.apply(church_id, counter, delta);
        self.acked.lock().unwrap().push(ack_event_id);
        if let Some(outbox) = &self.outbox {
            let mut rows = outbox.rows.lock().unwrap();
            if let Some(row) = rows.iter_mut().find(|r| r.id == ack_event_id) {
                row.processed_at = Some(Utc::now());
            }
        }
        Ok(())
    }

    async fn set_counts(
        &self,
        church_id: Uuid,
        member_count: i64,
        event_count: i64,
        sermon_count: i64,
    ) -> Result<(), DirectoryServiceError> {
        self.counts
            .lock()
            .unwrap()
            .insert(church_id, (member_count, event_count, sermon_count));
        Ok(())
    }
}

// ── MockSermonRepo ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockSermonRepo {
    pub sermons: Arc<Mutex<Vec<Sermon>>>,
    pub outbox: MockOutbox,
}

impl MockSermonRepo {
    pub fn new(outbox: MockOutbox) -> Self {
        Self {
            sermons: Arc::new(Mutex::new(vec![])),
            outbox,
        }
    }

    pub fn sermons_handle(&self) -> Arc<Mutex<Vec<Sermon>>> {
        Arc::clone(&self.sermons)
    }
}

impl SermonRepository for MockSermonRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Sermon>, DirectoryServiceError> {
        Ok(self
            .sermons
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn create_with_outbox(
        &self,
        sermon: &Sermon,
        event: &OutboxEvent,
    ) -> Result<(), DirectoryServiceError> {
        self.sermons.lock().unwrap().push(sermon.clone());
        self.outbox.push(event);
        Ok(())
    }

    async fn delete_with_outbox(
        &self,
        id: Uuid,
        event: &OutboxEvent,
    ) -> Result<(), DirectoryServiceError> {
        self.sermons.lock().unwrap().retain(|s| s.id != id);
        self.outbox.push(event);
        Ok(())
    }

    async fn count_by_church(&self, church_id: Uuid) -> Result<i64, DirectoryServiceError> {
        Ok(self
            .sermons
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.church_id == church_id)
            .count() as i64)
    }

    async fn update_speaker_name(
        &self,
        speaker_user_id: Uuid,
        speaker_name: &str,
    ) -> Result<u64, DirectoryServiceError> {
        let mut sermons = self.sermons.lock().unwrap();
        let mut touched = 0;
        for s in sermons
            .iter_mut()
            .filter(|s| s.speaker_user_id == Some(speaker_user_id))
        {
            s.speaker_name = speaker_name.to_owned();
            touched += 1;
        }
        Ok(touched)
    }
}

// ── MockEventRepo ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockEventRepo {
    pub events: Arc<Mutex<Vec<ChurchEvent>>>,
    pub outbox: MockOutbox,
}

impl MockEventRepo {
    pub fn new(outbox: MockOutbox) -> Self {
        Self {
            events: Arc::new(Mutex::new(vec![])),
            outbox,
        }
    }
}

impl EventRepository for MockEventRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChurchEvent>, DirectoryServiceError> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn create_with_outbox(
        &self,
        event: &ChurchEvent,
        outbox: &OutboxEvent,
    ) -> Result<(), DirectoryServiceError> {
        self.events.lock().unwrap().push(event.clone());
        self.outbox.push(outbox);
        Ok(())
    }

    async fn delete_with_outbox(
        &self,
        id: Uuid,
        outbox: &OutboxEvent,
    ) -> Result<(), DirectoryServiceError> {
        self.events.lock().unwrap().retain(|e| e.id != id);
        self.outbox.push(outbox);
        Ok(())
    }

    async fn count_by_church(&self, church_id: Uuid) -> Result<i64, DirectoryServiceError> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.church_id == church_id)
            .count() as i64)
    }
}

// ── MockClaims (ClaimsPort over the in-memory store) ─────────────────────────

#[derive(Clone)]
pub struct MockClaims {
    pub store: InMemoryClaims,
}

impl MockClaims {
    pub fn new(store: InMemoryClaims) -> Self {
        Self { store }
    }
}

impl ClaimsPort for MockClaims {
    async fn get_claims(&self, user_id: Uuid) -> Result<Claims, DirectoryServiceError> {
        Ok(self.store.get(user_id))
    }

    async fn set_claims(
        &self,
        user_id: Uuid,
        claims: &Claims,
    ) -> Result<(), DirectoryServiceError> {
        self.store
            .set(user_id, claims.clone())
            .map_err(DirectoryServiceError::Internal)
    }

    async fn delete_claims(&self, user_id: Uuid) -> Result<(), DirectoryServiceError> {
        self.store
            .delete(user_id)
            .map_err(DirectoryServiceError::Internal)
    }
}

pub fn claims_gateway(store: &InMemoryClaims) -> ClaimsGateway<MockClaims> {
    ClaimsGateway {
        port: MockClaims::new(store.clone()),
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_user() -> User {
    User {
        id: Uuid::new_v4(),
        email: "hana@example.com".to_owned(),
        display_name: "Hana Park".to_owned(),
        first_name: "Hana".to_owned(),
        last_name: "Park".to_owned(),
        photo_url: None,
        system_role: SystemRole::User,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_church(name: &str) -> Church {
    Church {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        level: ChurchLevel::Local,
        parent_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn pending_membership(user: &User, church: &Church) -> ChurchMembership {
    let now = Utc::now();
    ChurchMembership {
        user_id: user.id,
        church_id: church.id,
        church_name: church.name.clone(),
        role: ChurchRole::Visitor,
        status: MembershipStatus::Pending,
        answers: json!([]),
        joined_at: now,
        approved_at: None,
        updated_at: now,
    }
}

pub fn pending_record(user: &User, church: &Church) -> MemberRecord {
    let now = Utc::now();
    MemberRecord {
        church_id: church.id,
        user_id: user.id,
        role: ChurchRole::Visitor,
        status: MembershipStatus::Pending,
        rejection_reason: None,
        display_name: user.display_name.clone(),
        email: user.email.clone(),
        photo_url: user.photo_url.clone(),
        answers: json!([]),
        joined_at: now,
        approved_at: None,
        updated_at: now,
    }
}
