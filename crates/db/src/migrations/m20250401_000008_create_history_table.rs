//! Create history table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(History::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(History::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(History::ViewerId).string_len(32).not_null())
                    .col(ColumnDef::new(History::VideoId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(History::LastWatchedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(History::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_history_viewer")
                            .from(History::Table, History::ViewerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_history_video")
                            .from(History::Table, History::VideoId)
                            .to(Video::Table, Video::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (viewer_id, video_id) - one entry per user per video,
        // the upsert target
        manager
            .create_index(
                Index::create()
                    .name("idx_history_viewer_video")
                    .table(History::Table)
                    .col(History::ViewerId)
                    .col(History::VideoId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: (viewer_id, last_watched_at) - history listing, recent first
        manager
            .create_index(
                Index::create()
                    .name("idx_history_viewer_watched")
                    .table(History::Table)
                    .col(History::ViewerId)
                    .col(History::LastWatchedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(History::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum History {
    Table,
    Id,
    ViewerId,
    VideoId,
    LastWatchedAt,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Video {
    Table,
    Id,
}
