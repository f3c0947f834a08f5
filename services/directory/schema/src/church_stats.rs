use sea_orm::entity::prelude::*;

/// Per-church aggregate counters. Derived and eventually consistent, never
/// authoritative; recomputable from the source tables at any time.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "church_stats")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub church_id: Uuid,
    pub member_count: i64,
    pub event_count: i64,
    pub sermon_count: i64,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
