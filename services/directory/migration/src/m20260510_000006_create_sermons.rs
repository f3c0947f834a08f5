use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sermons::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sermons::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Sermons::ChurchId).uuid().not_null())
                    .col(ColumnDef::new(Sermons::Title).string().not_null())
                    .col(ColumnDef::new(Sermons::SpeakerUserId).uuid())
                    .col(ColumnDef::new(Sermons::SpeakerName).string().not_null())
                    .col(
                        ColumnDef::new(Sermons::PreachedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sermons::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Sermons::Table, Sermons::ChurchId)
                            .to(Churches::Table, Churches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Speaker-name fan-out updates filter on this column.
        manager
            .create_index(
                Index::create()
                    .table(Sermons::Table)
                    .col(Sermons::SpeakerUserId)
                    .name("idx_sermons_speaker_user_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sermons::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Sermons {
    Table,
    Id,
    ChurchId,
    Title,
    SpeakerUserId,
    SpeakerName,
    PreachedAt,
    CreatedAt,
}

#[derive(Iden)]
enum Churches {
    Table,
    Id,
}
