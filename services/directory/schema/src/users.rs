use sea_orm::entity::prelude::*;

/// User profile record, created on first sign-in via the identity-provider
/// webhook. The identity-display fields (display_name, first/last name,
/// photo_url, email) are the canonical copies the sync engine fans out.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub photo_url: Option<String>,
    pub system_role: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_memberships::Entity")]
    UserMemberships,
}

impl Related<super::user_memberships::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserMemberships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
