//! Video catalog repository.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use clipstream_common::{AppError, AppResult};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::entities::video::VISIBILITY_PUBLIC;
use crate::entities::{Video, VideoLike, VideoView, video, video_like, video_view};

/// Repository for video catalog, like-edge, and view-dedup operations.
#[derive(Clone)]
pub struct VideoRepository {
    db: Arc<DatabaseConnection>,
}

impl VideoRepository {
    /// Create a new video repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    // ==================== Catalog Operations ====================

    /// Find video by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<video::Model>> {
        Video::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get video by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<video::Model> {
        self.find_by_id(id).await?.ok_or(AppError::VideoNotFound)
    }

    /// Create a new video.
    pub async fn create(&self, model: video::ActiveModel) -> AppResult<video::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find videos by IDs. Order is unspecified; callers reorder as needed.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<video::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Video::find()
            .filter(video::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List public videos, newest first, optionally filtered by category.
    pub async fn find_public(&self, category: Option<&str>) -> AppResult<Vec<video::Model>> {
        let mut query = Video::find().filter(video::Column::Visibility.eq(VISIBILITY_PUBLIC));

        if let Some(category) = category {
            query = query.filter(video::Column::Category.eq(category));
        }

        query
            .order_by(video::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Public videos by view count descending.
    pub async fn find_trending(&self, limit: u64) -> AppResult<Vec<video::Model>> {
        Video::find()
            .filter(video::Column::Visibility.eq(VISIBILITY_PUBLIC))
            .order_by(video::Column::Views, Order::Desc)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Public videos owned by any of the given channels, newest first.
    ///
    /// This is the subscription feed query; an empty channel set short-circuits
    /// to an empty list.
    pub async fn find_public_by_channels(
        &self,
        channel_ids: &[String],
    ) -> AppResult<Vec<video::Model>> {
        if channel_ids.is_empty() {
            return Ok(vec![]);
        }

        Video::find()
            .filter(video::Column::ChannelId.is_in(channel_ids.to_vec()))
            .filter(video::Column::Visibility.eq(VISIBILITY_PUBLIC))
            .order_by(video::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Public videos of a single channel, newest first.
    pub async fn find_public_by_channel(&self, channel_id: &str) -> AppResult<Vec<video::Model>> {
        Video::find()
            .filter(video::Column::ChannelId.eq(channel_id))
            .filter(video::Column::Visibility.eq(VISIBILITY_PUBLIC))
            .order_by(video::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All videos of a channel regardless of visibility (analytics input).
    pub async fn find_by_channel(&self, channel_id: &str) -> AppResult<Vec<video::Model>> {
        Video::find()
            .filter(video::Column::ChannelId.eq(channel_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Videos of a channel updated at or after the given instant.
    pub async fn find_updated_since(
        &self,
        channel_id: &str,
        since: DateTime<FixedOffset>,
    ) -> AppResult<Vec<video::Model>> {
        Video::find()
            .filter(video::Column::ChannelId.eq(channel_id))
            .filter(video::Column::UpdatedAt.gte(since))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Top videos of a channel by view count descending.
    pub async fn find_top_by_channel(
        &self,
        channel_id: &str,
        limit: u64,
    ) -> AppResult<Vec<video::Model>> {
        Video::find()
            .filter(video::Column::ChannelId.eq(channel_id))
            .order_by(video::Column::Views, Order::Desc)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Distinct categories of public videos with their video counts.
    pub async fn categories(&self) -> AppResult<Vec<(String, i64)>> {
        Video::find()
            .select_only()
            .column(video::Column::Category)
            .column_as(video::Column::Id.count(), "count")
            .filter(video::Column::Visibility.eq(VISIBILITY_PUBLIC))
            .filter(video::Column::Category.is_not_null())
            .group_by(video::Column::Category)
            .order_by(video::Column::Category, Order::Asc)
            .into_tuple::<(String, i64)>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ==================== Like Edge Operations ====================

    /// Check whether a user has liked a video.
    pub async fn has_liked(&self, user_id: &str, video_id: &str) -> AppResult<bool> {
        let count = VideoLike::find()
            .filter(video_like::Column::UserId.eq(user_id))
            .filter(video_like::Column::VideoId.eq(video_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    /// Insert a like edge. Returns `false` if the edge already existed.
    pub async fn insert_like(
        &self,
        id: String,
        user_id: String,
        video_id: String,
    ) -> AppResult<bool> {
        let model = video_like::ActiveModel {
            id: Set(id),
            video_id: Set(video_id),
            user_id: Set(user_id),
            created_at: Set(Utc::now().into()),
        };

        let inserted = VideoLike::insert(model)
            .on_conflict(
                OnConflict::columns([video_like::Column::VideoId, video_like::Column::UserId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(inserted > 0)
    }

    /// Delete a like edge. Returns `true` if an edge was deleted.
    pub async fn delete_like(&self, user_id: &str, video_id: &str) -> AppResult<bool> {
        let deleted = VideoLike::delete_many()
            .filter(video_like::Column::UserId.eq(user_id))
            .filter(video_like::Column::VideoId.eq(video_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(deleted.rows_affected > 0)
    }

    /// Count likes of a video.
    pub async fn count_likes(&self, video_id: &str) -> AppResult<u64> {
        VideoLike::find()
            .filter(video_like::Column::VideoId.eq(video_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Public videos the user has liked, newest first.
    pub async fn find_liked_by(&self, user_id: &str) -> AppResult<Vec<video::Model>> {
        Video::find()
            .join(JoinType::InnerJoin, video::Relation::Likes.def())
            .filter(video_like::Column::UserId.eq(user_id))
            .filter(video::Column::Visibility.eq(VISIBILITY_PUBLIC))
            .order_by(video::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ==================== View Dedup Operations ====================

    /// Insert the per-(video, viewer) dedup record.
    ///
    /// Returns `true` only if the record was actually inserted, which is the
    /// sole gate for advancing the view counter.
    pub async fn insert_view(
        &self,
        id: String,
        video_id: String,
        viewer_id: String,
    ) -> AppResult<bool> {
        let model = video_view::ActiveModel {
            id: Set(id),
            video_id: Set(video_id),
            viewer_id: Set(viewer_id),
            created_at: Set(Utc::now().into()),
        };

        let inserted = VideoView::insert(model)
            .on_conflict(
                OnConflict::columns([video_view::Column::VideoId, video_view::Column::ViewerId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(inserted > 0)
    }

    /// Increment the view counter atomically by one.
    pub async fn increment_views(&self, video_id: &str) -> AppResult<()> {
        Video::update_many()
            .col_expr(
                video::Column::Views,
                Expr::col(video::Column::Views).add(1),
            )
            .filter(video::Column::Id.eq(video_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::mock_video;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<video::Model>::new()])
                .into_connection(),
        );

        let repo = VideoRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::VideoNotFound)));
    }

    #[tokio::test]
    async fn test_find_public_by_channels_empty_input() {
        // No query should be issued at all; the mock has no results queued.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = VideoRepository::new(db);
        let result = repo.find_public_by_channels(&[]).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_find_trending() {
        let v1 = mock_video("v1", "ch1", "First", 100);
        let v2 = mock_video("v2", "ch1", "Second", 50);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[v1, v2]])
                .into_connection(),
        );

        let repo = VideoRepository::new(db);
        let result = repo.find_trending(20).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].views, 100);
    }

    #[tokio::test]
    async fn test_increment_views() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = VideoRepository::new(db);
        assert!(repo.increment_views("v1").await.is_ok());
    }
}
