use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserMemberships::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserMemberships::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserMemberships::ChurchId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserMemberships::ChurchName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserMemberships::Role).string().not_null())
                    .col(ColumnDef::new(UserMemberships::Status).string().not_null())
                    .col(
                        ColumnDef::new(UserMemberships::Answers)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserMemberships::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserMemberships::ApprovedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(UserMemberships::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(UserMemberships::UserId)
                            .col(UserMemberships::ChurchId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserMemberships::Table, UserMemberships::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserMemberships::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserMemberships {
    Table,
    UserId,
    ChurchId,
    ChurchName,
    Role,
    Status,
    Answers,
    JoinedAt,
    ApprovedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
