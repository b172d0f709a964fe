//! Create video view table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VideoView::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VideoView::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VideoView::VideoId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(VideoView::ViewerId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VideoView::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_video_view_video")
                            .from(VideoView::Table, VideoView::VideoId)
                            .to(Video::Table, Video::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_video_view_viewer")
                            .from(VideoView::Table, VideoView::ViewerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (video_id, viewer_id) - the dedup gate for the
        // view counter increment
        manager
            .create_index(
                Index::create()
                    .name("idx_video_view_video_viewer")
                    .table(VideoView::Table)
                    .col(VideoView::VideoId)
                    .col(VideoView::ViewerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VideoView::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum VideoView {
    Table,
    Id,
    VideoId,
    ViewerId,
    CreatedAt,
}

#[derive(Iden)]
enum Video {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
