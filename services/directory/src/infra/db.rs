use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    sea_query::Expr,
};
use uuid::Uuid;

use steeple_directory_schema::{
    church_members, church_stats, churches, events, outbox_events, sermons, user_memberships,
    users,
};
use steeple_domain::church::ChurchLevel;
use steeple_domain::membership::MembershipStatus;
use steeple_domain::pagination::PageRequest;
use steeple_domain::role::{ChurchRole, SystemRole};

use crate::domain::repository::{
    ChurchRepository, EventRepository, MemberRecordRepository, MembershipRepository,
    OutboxRepository, SermonRepository, StatCounter, StatsRepository, UserRepository,
};
use crate::domain::types::{
    Church, ChurchEvent, ChurchMembership, ChurchStats, MemberRecord, OutboxEvent,
    ProfileChanges, Sermon, StoredOutboxEvent, User,
};
use crate::error::DirectoryServiceError;

// Stored enums are strings; a value this service cannot parse is corruption,
// not client error.
fn parse_role(v: &str) -> Result<ChurchRole, DirectoryServiceError> {
    ChurchRole::parse(v)
        .ok_or_else(|| anyhow::anyhow!("invalid church role in storage: {v}").into())
}

fn parse_status(v: &str) -> Result<MembershipStatus, DirectoryServiceError> {
    MembershipStatus::parse(v)
        .ok_or_else(|| anyhow::anyhow!("invalid membership status in storage: {v}").into())
}

fn parse_level(v: &str) -> Result<ChurchLevel, DirectoryServiceError> {
    ChurchLevel::parse(v)
        .ok_or_else(|| anyhow::anyhow!("invalid church level in storage: {v}").into())
}

fn parse_system_role(v: &str) -> Result<SystemRole, DirectoryServiceError> {
    SystemRole::parse(v)
        .ok_or_else(|| anyhow::anyhow!("invalid system role in storage: {v}").into())
}

async fn insert_outbox_event(
    txn: &DatabaseTransaction,
    event: &OutboxEvent,
) -> Result<(), sea_orm::DbErr> {
    let now = Utc::now();
    outbox_events::ActiveModel {
        id: Set(event.id),
        kind: Set(event.kind.clone()),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(now),
        next_attempt_at: Set(now),
        processed_at: Set(None),
        failed_at: Set(None),
    }
    .insert(txn)
    .await?;
    Ok(())
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DirectoryServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn create(&self, user: &User) -> Result<(), DirectoryServiceError> {
        users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            display_name: Set(user.display_name.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            photo_url: Set(user.photo_url.clone()),
            system_role: Set(user.system_role.as_str().to_owned()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        Ok(())
    }

    async fn update_profile_with_outbox(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
        updated_at: DateTime<Utc>,
        event: &OutboxEvent,
    ) -> Result<(), DirectoryServiceError> {
        let changes = changes.clone();
        let event = event.clone();
        self.db
            .transaction::<_, (), sea_orm::DbErr>(move |txn| {
                Box::pin(async move {
                    let mut update = users::Entity::update_many()
                        .filter(users::Column::Id.eq(id))
                        .col_expr(users::Column::UpdatedAt, Expr::value(updated_at));
                    if let Some(v) = &changes.display_name {
                        update = update.col_expr(users::Column::DisplayName, Expr::value(v.clone()));
                    }
                    if let Some(v) = &changes.first_name {
                        update = update.col_expr(users::Column::FirstName, Expr::value(v.clone()));
                    }
                    if let Some(v) = &changes.last_name {
                        update = update.col_expr(users::Column::LastName, Expr::value(v.clone()));
                    }
                    if let Some(v) = &changes.email {
                        update = update.col_expr(users::Column::Email, Expr::value(v.clone()));
                    }
                    if let Some(v) = &changes.photo_url {
                        update = update.col_expr(users::Column::PhotoUrl, Expr::value(v.clone()));
                    }
                    update.exec(txn).await?;

                    insert_outbox_event(txn, &event).await?;
                    Ok(())
                })
            })
            .await
            .context("update profile with outbox")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DirectoryServiceError> {
        users::Entity::delete_many()
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(())
    }
}

fn user_from_model(model: users::Model) -> Result<User, DirectoryServiceError> {
    Ok(User {
        id: model.id,
        email: model.email,
        display_name: model.display_name,
        first_name: model.first_name,
        last_name: model.last_name,
        photo_url: model.photo_url,
        system_role: parse_system_role(&model.system_role)?,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Church repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbChurchRepository {
    pub db: DatabaseConnection,
}

impl ChurchRepository for DbChurchRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Church>, DirectoryServiceError> {
        let model = churches::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find church by id")?;
        model.map(church_from_model).transpose()
    }

    async fn create(&self, church: &Church) -> Result<(), DirectoryServiceError> {
        let church = church.clone();
        self.db
            .transaction::<_, (), sea_orm::DbErr>(move |txn| {
                Box::pin(async move {
                    churches::ActiveModel {
                        id: Set(church.id),
                        name: Set(church.name.clone()),
                        level: Set(church.level.as_str().to_owned()),
                        parent_id: Set(church.parent_id),
                        created_at: Set(church.created_at),
                        updated_at: Set(church.updated_at),
                    }
                    .insert(txn)
                    .await?;

                    // Stats row is born with the church, zeroed.
                    church_stats::ActiveModel {
                        church_id: Set(church.id),
                        member_count: Set(0),
                        event_count: Set(0),
                        sermon_count: Set(0),
                        updated_at: Set(church.created_at),
                    }
                    .insert(txn)
                    .await?;
                    Ok(())
                })
            })
            .await
            .context("create church with stats")?;
        Ok(())
    }
}

fn church_from_model(model: churches::Model) -> Result<Church, DirectoryServiceError> {
    Ok(Church {
        id: model.id,
        name: model.name,
        level: parse_level(&model.level)?,
        parent_id: model.parent_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Membership repository (user-side rows) ───────────────────────────────────

#[derive(Clone)]
pub struct DbMembershipRepository {
    pub db: DatabaseConnection,
}

impl MembershipRepository for DbMembershipRepository {
    async fn find(
        &self,
        user_id: Uuid,
        church_id: Uuid,
    ) -> Result<Option<ChurchMembership>, DirectoryServiceError> {
        let model = user_memberships::Entity::find_by_id((user_id, church_id))
            .one(&self.db)
            .await
            .context("find user membership")?;
        model.map(membership_from_model).transpose()
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ChurchMembership>, DirectoryServiceError> {
        let models = user_memberships::Entity::find()
            .filter(user_memberships::Column::UserId.eq(user_id))
            .order_by_asc(user_memberships::Column::JoinedAt)
            .all(&self.db)
            .await
            .context("list user memberships")?;
        models.into_iter().map(membership_from_model).collect()
    }

    async fn create(&self, membership: &ChurchMembership) -> Result<(), DirectoryServiceError> {
        user_memberships::ActiveModel {
            user_id: Set(membership.user_id),
            church_id: Set(membership.church_id),
            church_name: Set(membership.church_name.clone()),
            role: Set(membership.role.as_str().to_owned()),
            status: Set(membership.status.as_str().to_owned()),
            answers: Set(membership.answers.clone()),
            joined_at: Set(membership.joined_at),
            approved_at: Set(membership.approved_at),
            updated_at: Set(membership.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create user membership")?;
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
        user_memberships::ActiveModel {
            user_id: Set(user_id),
            church_id: Set(church_id),
            status: Set(status.as_str().to_owned()),
            role: Set(role.as_str().to_owned()),
            approved_at: Set(approved_at),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set membership status/role")?;
        Ok(())
    }

    async fn set_role(
        &self,
        user_id: Uuid,
        church_id: Uuid,
        role: ChurchRole,
    ) -> Result<(), DirectoryServiceError> {
        user_memberships::ActiveModel {
            user_id: Set(user_id),
            church_id: Set(church_id),
            role: Set(role.as_str().to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set membership role")?;
        Ok(())
    }

    async fn delete(
        &self,
        user_id: Uuid,
        church_id: Uuid,
    ) -> Result<bool, DirectoryServiceError> {
        let result = user_memberships::Entity::delete_many()
            .filter(user_memberships::Column::UserId.eq(user_id))
            .filter(user_memberships::Column::ChurchId.eq(church_id))
            .exec(&self.db)
            .await
            .context("delete user membership")?;
        Ok(result.rows_affected > 0)
    }
}

fn membership_from_model(
    model: user_memberships::Model,
) -> Result<ChurchMembership, DirectoryServiceError> {
    Ok(ChurchMembership {
        user_id: model.user_id,
        church_id: model.church_id,
        church_name: model.church_name,
        role: parse_role(&model.role)?,
        status: parse_status(&model.status)?,
        answers: model.answers,
        joined_at: model.joined_at,
        approved_at: model.approved_at,
        updated_at: model.updated_at,
    })
}

// ── Member record repository (church-side mirror) ────────────────────────────

#[derive(Clone)]
pub struct DbMemberRecordRepository {
    pub db: DatabaseConnection,
}

impl MemberRecordRepository for DbMemberRecordRepository {
    async fn find(
        &self,
        church_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<MemberRecord>, DirectoryServiceError> {
        let model = church_members::Entity::find_by_id((church_id, user_id))
            .one(&self.db)
            .await
            .context("find member record")?;
        model.map(member_record_from_model).transpose()
    }

    async fn list_pending(
        &self,
        church_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<MemberRecord>, DirectoryServiceError> {
        let models = church_members::Entity::find()
            .filter(church_members::Column::ChurchId.eq(church_id))
            .filter(church_members::Column::Status.eq(MembershipStatus::Pending.as_str()))
            .order_by_asc(church_members::Column::JoinedAt)
            .offset(page.offset())
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list pending member records")?;
        models.into_iter().map(member_record_from_model).collect()
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<MemberRecord>, DirectoryServiceError> {
        let models = church_members::Entity::find()
            .filter(church_members::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .context("list member records by user")?;
        models.into_iter().map(member_record_from_model).collect()
    }

    async fn create(&self, record: &MemberRecord) -> Result<(), DirectoryServiceError> {
        church_members::ActiveModel {
            church_id: Set(record.church_id),
            user_id: Set(record.user_id),
            role: Set(record.role.as_str().to_owned()),
            status: Set(record.status.as_str().to_owned()),
            rejection_reason: Set(record.rejection_reason.clone()),
            display_name: Set(record.display_name.clone()),
            email: Set(record.email.clone()),
            photo_url: Set(record.photo_url.clone()),
            answers: Set(record.answers.clone()),
            joined_at: Set(record.joined_at),
            approved_at: Set(record.approved_at),
            updated_at: Set(record.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create member record")?;
        Ok(())
    }

    async fn approve(
        &self,
        church_id: Uuid,
        user_id: Uuid,
        role: ChurchRole,
        approved_at: DateTime<Utc>,
    ) -> Result<(), DirectoryServiceError> {
        church_members::ActiveModel {
            church_id: Set(church_id),
            user_id: Set(user_id),
            role: Set(role.as_str().to_owned()),
            status: Set(MembershipStatus::Approved.as_str().to_owned()),
            approved_at: Set(Some(approved_at)),
            updated_at: Set(approved_at),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("approve member record")?;
        Ok(())
    }

    async fn reject(
        &self,
        church_id: Uuid,
        user_id: Uuid,
        reason: &str,
        rejected_at: DateTime<Utc>,
    ) -> Result<(), DirectoryServiceError> {
        church_members::ActiveModel {
            church_id: Set(church_id),
            user_id: Set(user_id),
            status: Set(MembershipStatus::Rejected.as_str().to_owned()),
            rejection_reason: Set(Some(reason.to_owned())),
            updated_at: Set(rejected_at),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("reject member record")?;
        Ok(())
    }

    async fn set_role(
        &self,
        church_id: Uuid,
        user_id: Uuid,
        role: ChurchRole,
    ) -> Result<(), DirectoryServiceError> {
        church_members::ActiveModel {
            church_id: Set(church_id),
            user_id: Set(user_id),
            role: Set(role.as_str().to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set member record role")?;
        Ok(())
    }

    async fn delete(
        &self,
        church_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, DirectoryServiceError> {
        let result = church_members::Entity::delete_many()
            .filter(church_members::Column::ChurchId.eq(church_id))
            .filter(church_members::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete member record")?;
        Ok(result.rows_affected > 0)
    }

    async fn apply_profile_changes(
        &self,
        user_id: Uuid,
        church_ids: &[Uuid],
        changes: &ProfileChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DirectoryServiceError> {
        if church_ids.is_empty() {
            return Ok(());
        }
        // One statement per batch: only the changed columns, absolute values,
        // so replaying the same diff is idempotent.
        let mut update = church_members::Entity::update_many()
            .filter(church_members::Column::UserId.eq(user_id))
            .filter(church_members::Column::ChurchId.is_in(church_ids.iter().copied()))
            .col_expr(church_members::Column::UpdatedAt, Expr::value(updated_at));
        if let Some(v) = &changes.display_name {
            update = update.col_expr(church_members::Column::DisplayName, Expr::value(v.clone()));
        }
        if let Some(v) = &changes.email {
            update = update.col_expr(church_members::Column::Email, Expr::value(v.clone()));
        }
        if let Some(v) = &changes.photo_url {
            update = update.col_expr(church_members::Column::PhotoUrl, Expr::value(v.clone()));
        }
        update
            .exec(&self.db)
            .await
            .context("apply profile changes to member records")?;
        Ok(())
    }

    async fn count_approved(&self, church_id: Uuid) -> Result<i64, DirectoryServiceError> {
        let count = church_members::Entity::find()
            .filter(church_members::Column::ChurchId.eq(church_id))
            .filter(church_members::Column::Status.eq(MembershipStatus::Approved.as_str()))
            .count(&self.db)
            .await
            .context("count approved members")?;
        Ok(count as i64)
    }
}

fn member_record_from_model(
    model: church_members::Model,
) -> Result<MemberRecord, DirectoryServiceError> {
    Ok(MemberRecord {
        church_id: model.church_id,
        user_id: model.user_id,
        role: parse_role(&model.role)?,
        status: parse_status(&model.status)?,
        rejection_reason: model.rejection_reason,
        display_name: model.display_name,
        email: model.email,
        photo_url: model.photo_url,
        answers: model.answers,
        joined_at: model.joined_at,
        approved_at: model.approved_at,
        updated_at: model.updated_at,
    })
}

// ── Stats repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbStatsRepository {
    pub db: DatabaseConnection,
}

fn counter_column(counter: StatCounter) -> church_stats::Column {
    match counter {
        StatCounter::Members => church_stats::Column::MemberCount,
        StatCounter::Events => church_stats::Column::EventCount,
        StatCounter::Sermons => church_stats::Column::SermonCount,
    }
}

impl StatsRepository for DbStatsRepository {
    async fn get(&self, church_id: Uuid) -> Result<Option<ChurchStats>, DirectoryServiceError> {
        let model = church_stats::Entity::find_by_id(church_id)
            .one(&self.db)
            .await
            .context("get church stats")?;
        Ok(model.map(|m| ChurchStats {
            church_id: m.church_id,
            member_count: m.member_count,
            event_count: m.event_count,
            sermon_count: m.sermon_count,
            updated_at: m.updated_at,
        }))
    }

    async fn add(
        &self,
        church_id: Uuid,
        counter: StatCounter,
        delta: i64,
    ) -> Result<(), DirectoryServiceError> {
        let column = counter_column(counter);
        // Atomic in-database increment; a read-then-write here would lose
        // updates under concurrent triggers.
        church_stats::Entity::update_many()
            .filter(church_stats::Column::ChurchId.eq(church_id))
            .col_expr(column, Expr::col(column).add(delta))
            .col_expr(church_stats::Column::UpdatedAt, Expr::value(Utc::now()))
            .exec(&self.db)
            .await
            .context("apply stats delta")?;
        Ok(())
    }

    async fn add_with_ack(
        &self,
        church_id: Uuid,
        counter: StatCounter,
        delta: i64,
        ack_event_id: Uuid,
    ) -> Result<(), DirectoryServiceError> {
        let column = counter_column(counter);
        self.db
            .transaction::<_, (), sea_orm::DbErr>(move |txn| {
                Box::pin(async move {
                    let now = Utc::now();
                    church_stats::Entity::update_many()
                        .filter(church_stats::Column::ChurchId.eq(church_id))
                        .col_expr(column, Expr::col(column).add(delta))
                        .col_expr(church_stats::Column::UpdatedAt, Expr::value(now))
                        .exec(txn)
                        .await?;
                    outbox_events::Entity::update_many()
                        .filter(outbox_events::Column::Id.eq(ack_event_id))
                        .col_expr(outbox_events::Column::ProcessedAt, Expr::value(Some(now)))
                        .exec(txn)
                        .await?;
                    Ok(())
                })
            })
            .await
            .context("apply stats delta with ack")?;
        Ok(())
    }

    async fn set_counts(
        &self,
        church_id: Uuid,
        member_count: i64,
        event_count: i64,
        sermon_count: i64,
    ) -> Result<(), DirectoryServiceError> {
        church_stats::Entity::update_many()
            .filter(church_stats::Column::ChurchId.eq(church_id))
            .col_expr(church_stats::Column::MemberCount, Expr::value(member_count))
            .col_expr(church_stats::Column::EventCount, Expr::value(event_count))
            .col_expr(church_stats::Column::SermonCount, Expr::value(sermon_count))
            .col_expr(church_stats::Column::UpdatedAt, Expr::value(Utc::now()))
            .exec(&self.db)
            .await
            .context("set recomputed stats")?;
        Ok(())
    }
}

// ── Sermon repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSermonRepository {
    pub db: DatabaseConnection,
}

impl SermonRepository for DbSermonRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Sermon>, DirectoryServiceError> {
        let model = sermons::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find sermon by id")?;
        Ok(model.map(sermon_from_model))
    }

    async fn create_with_outbox(
        &self,
        sermon: &Sermon,
        event: &OutboxEvent,
    ) -> Result<(), DirectoryServiceError> {
        let sermon = sermon.clone();
        let event = event.clone();
        self.db
            .transaction::<_, (), sea_orm::DbErr>(move |txn| {
                Box::pin(async move {
                    sermons::ActiveModel {
                        id: Set(sermon.id),
                        church_id: Set(sermon.church_id),
                        title: Set(sermon.title.clone()),
                        speaker_user_id: Set(sermon.speaker_user_id),
                        speaker_name: Set(sermon.speaker_name.clone()),
                        preached_at: Set(sermon.preached_at),
                        created_at: Set(sermon.created_at),
                    }
                    .insert(txn)
                    .await?;
                    insert_outbox_event(txn, &event).await?;
                    Ok(())
                })
            })
            .await
            .context("create sermon with outbox")?;
        Ok(())
    }

    async fn delete_with_outbox(
        &self,
        id: Uuid,
        event: &OutboxEvent,
    ) -> Result<(), DirectoryServiceError> {
        let event = event.clone();
        self.db
            .transaction::<_, (), sea_orm::DbErr>(move |txn| {
                Box::pin(async move {
                    sermons::Entity::delete_many()
                        .filter(sermons::Column::Id.eq(id))
                        .exec(txn)
                        .await?;
                    insert_outbox_event(txn, &event).await?;
                    Ok(())
                })
            })
            .await
            .context("delete sermon with outbox")?;
        Ok(())
    }

    async fn count_by_church(&self, church_id: Uuid) -> Result<i64, DirectoryServiceError> {
        let count = sermons::Entity::find()
            .filter(sermons::Column::ChurchId.eq(church_id))
            .count(&self.db)
            .await
            .context("count sermons")?;
        Ok(count as i64)
    }

    async fn update_speaker_name(
        &self,
        speaker_user_id: Uuid,
        speaker_name: &str,
    ) -> Result<u64, DirectoryServiceError> {
        let result = sermons::Entity::update_many()
            .filter(sermons::Column::SpeakerUserId.eq(speaker_user_id))
            .col_expr(
                sermons::Column::SpeakerName,
                Expr::value(speaker_name.to_owned()),
            )
            .exec(&self.db)
            .await
            .context("update sermon speaker names")?;
        Ok(result.rows_affected)
    }
}

fn sermon_from_model(model: sermons::Model) -> Sermon {
    Sermon {
        id: model.id,
        church_id: model.church_id,
        title: model.title,
        speaker_user_id: model.speaker_user_id,
        speaker_name: model.speaker_name,
        preached_at: model.preached_at,
        created_at: model.created_at,
    }
}

// ── Event repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEventRepository {
    pub db: DatabaseConnection,
}

impl EventRepository for DbEventRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChurchEvent>, DirectoryServiceError> {
        let model = events::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find event by id")?;
        Ok(model.map(event_from_model))
    }

    async fn create_with_outbox(
        &self,
        event: &ChurchEvent,
        outbox: &OutboxEvent,
    ) -> Result<(), DirectoryServiceError> {
        let event = event.clone();
        let outbox = outbox.clone();
        self.db
            .transaction::<_, (), sea_orm::DbErr>(move |txn| {
                Box::pin(async move {
                    events::ActiveModel {
                        id: Set(event.id),
                        church_id: Set(event.church_id),
                        title: Set(event.title.clone()),
                        starts_at: Set(event.starts_at),
                        created_at: Set(event.created_at),
                    }
                    .insert(txn)
                    .await?;
                    insert_outbox_event(txn, &outbox).await?;
                    Ok(())
                })
            })
            .await
            .context("create event with outbox")?;
        Ok(())
    }

    async fn delete_with_outbox(
        &self,
        id: Uuid,
        outbox: &OutboxEvent,
    ) -> Result<(), DirectoryServiceError> {
        let outbox = outbox.clone();
        self.db
            .transaction::<_, (), sea_orm::DbErr>(move |txn| {
                Box::pin(async move {
                    events::Entity::delete_many()
                        .filter(events::Column::Id.eq(id))
                        .exec(txn)
                        .await?;
                    insert_outbox_event(txn, &outbox).await?;
                    Ok(())
                })
            })
            .await
            .context("delete event with outbox")?;
        Ok(())
    }

    async fn count_by_church(&self, church_id: Uuid) -> Result<i64, DirectoryServiceError> {
        let count = events::Entity::find()
            .filter(events::Column::ChurchId.eq(church_id))
            .count(&self.db)
            .await
            .context("count events")?;
        Ok(count as i64)
    }
}

fn event_from_model(model: events::Model) -> ChurchEvent {
    ChurchEvent {
        id: model.id,
        church_id: model.church_id,
        title: model.title,
        starts_at: model.starts_at,
        created_at: model.created_at,
    }
}

// ── Outbox repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOutboxRepository {
    pub db: DatabaseConnection,
}

impl OutboxRepository for DbOutboxRepository {
    async fn due(
        &self,
        now: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<StoredOutboxEvent>, DirectoryServiceError> {
        let models = outbox_events::Entity::find()
            .filter(outbox_events::Column::ProcessedAt.is_null())
            .filter(outbox_events::Column::FailedAt.is_null())
            .filter(outbox_events::Column::NextAttemptAt.lte(now))
            .order_by_asc(outbox_events::Column::CreatedAt)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .context("load due outbox events")?;
        Ok(models
            .into_iter()
            .map(|m| StoredOutboxEvent {
                id: m.id,
                kind: m.kind,
                payload: m.payload,
                attempts: m.attempts,
                created_at: m.created_at,
            })
            .collect())
    }

    async fn mark_processed(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), DirectoryServiceError> {
        outbox_events::Entity::update_many()
            .filter(outbox_events::Column::Id.eq(id))
            .col_expr(outbox_events::Column::ProcessedAt, Expr::value(Some(at)))
            .exec(&self.db)
            .await
            .context("mark outbox event processed")?;
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
        let mut update = outbox_events::Entity::update_many()
            .filter(outbox_events::Column::Id.eq(id))
            .col_expr(outbox_events::Column::Attempts, Expr::value(attempts))
            .col_expr(
                outbox_events::Column::LastError,
                Expr::value(Some(error.to_owned())),
            )
            .col_expr(
                outbox_events::Column::NextAttemptAt,
                Expr::value(next_attempt_at),
            );
        if failed {
            update = update.col_expr(
                outbox_events::Column::FailedAt,
                Expr::value(Some(Utc::now())),
            );
        }
        update
            .exec(&self.db)
            .await
            .context("record outbox failure")?;
        Ok(())
    }
}
