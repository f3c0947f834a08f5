use sea_orm_migration::prelude::*;

mod m20260510_000001_create_users;
mod m20260510_000002_create_churches;
mod m20260510_000003_create_church_stats;
mod m20260510_000004_create_user_memberships;
mod m20260510_000005_create_church_members;
mod m20260510_000006_create_sermons;
mod m20260510_000007_create_events;
mod m20260510_000008_create_outbox_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260510_000001_create_users::Migration),
            Box::new(m20260510_000002_create_churches::Migration),
            Box::new(m20260510_000003_create_church_stats::Migration),
            Box::new(m20260510_000004_create_user_memberships::Migration),
            Box::new(m20260510_000005_create_church_members::Migration),
            Box::new(m20260510_000006_create_sermons::Migration),
            Box::new(m20260510_000007_create_events::Migration),
            Box::new(m20260510_000008_create_outbox_events::Migration),
        ]
    }
}
