use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Churches::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Churches::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Churches::Name).string().not_null())
                    .col(ColumnDef::new(Churches::Level).string().not_null())
                    .col(ColumnDef::new(Churches::ParentId).uuid())
                    .col(
                        ColumnDef::new(Churches::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Churches::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Churches::Table, Churches::ParentId)
                            .to(Churches::Table, Churches::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Churches::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Churches {
    Table,
    Id,
    Name,
    Level,
    ParentId,
    CreatedAt,
    UpdatedAt,
}
