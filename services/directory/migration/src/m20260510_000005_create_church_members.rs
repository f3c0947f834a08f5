use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChurchMembers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ChurchMembers::ChurchId).uuid().not_null())
                    .col(ColumnDef::new(ChurchMembers::UserId).uuid().not_null())
                    .col(ColumnDef::new(ChurchMembers::Role).string().not_null())
                    .col(ColumnDef::new(ChurchMembers::Status).string().not_null())
                    .col(ColumnDef::new(ChurchMembers::RejectionReason).string())
                    .col(
                        ColumnDef::new(ChurchMembers::DisplayName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ChurchMembers::Email).string().not_null())
                    .col(ColumnDef::new(ChurchMembers::PhotoUrl).string())
                    .col(
                        ColumnDef::new(ChurchMembers::Answers)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChurchMembers::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ChurchMembers::ApprovedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(ChurchMembers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ChurchMembers::ChurchId)
                            .col(ChurchMembers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ChurchMembers::Table, ChurchMembers::ChurchId)
                            .to(Churches::Table, Churches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The sync engine and the account-deletion cascade look records up by
        // user across churches; the PK only covers church-first lookups.
        manager
            .create_index(
                Index::create()
                    .table(ChurchMembers::Table)
                    .col(ChurchMembers::UserId)
                    .name("idx_church_members_user_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChurchMembers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ChurchMembers {
    Table,
    ChurchId,
    UserId,
    Role,
    Status,
    RejectionReason,
    DisplayName,
    Email,
    PhotoUrl,
    Answers,
    JoinedAt,
    ApprovedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Churches {
    Table,
    Id,
}
