use sea_orm::entity::prelude::*;

/// Church node in the organizational hierarchy
/// (headquarters → country → department → province → local).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "churches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub level: String,
    pub parent_id: Option<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::church_members::Entity")]
    ChurchMembers,
    #[sea_orm(has_many = "super::sermons::Entity")]
    Sermons,
    #[sea_orm(has_many = "super::events::Entity")]
    Events,
}

impl Related<super::church_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChurchMembers.def()
    }
}

impl Related<super::sermons::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sermons.def()
    }
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
