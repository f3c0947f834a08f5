use sea_orm::entity::prelude::*;

/// A church's denormalized member roster: the "who does this church believe
/// is a member" projection. Carries cached copies of the user's display
/// fields; staleness is bounded only by the sync engine's propagation
/// latency. Deliberately not foreign-keyed to `users`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "church_members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub church_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub role: String,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub display_name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub answers: Json,
    pub joined_at: chrono::DateTime<chrono::Utc>,
    pub approved_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::churches::Entity",
        from = "Column::ChurchId",
        to = "super::churches::Column::Id"
    )]
    Churches,
}

impl Related<super::churches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Churches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
