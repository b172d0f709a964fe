//! Watch history repository.

use std::sync::Arc;

use chrono::Utc;
use clipstream_common::{AppError, AppResult};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder, Set,
};

use crate::entities::{History, history};

/// Repository for watch-history operations.
#[derive(Clone)]
pub struct HistoryRepository {
    db: Arc<DatabaseConnection>,
}

impl HistoryRepository {
    /// Create a new history repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Upsert the (viewer, video) entry, setting `last_watched_at` to now.
    ///
    /// A single `ON CONFLICT ... DO UPDATE` keeps the at-most-one-per-pair
    /// invariant intact under concurrent requests.
    pub async fn upsert(&self, id: String, viewer_id: String, video_id: String) -> AppResult<()> {
        let now = Utc::now();
        let model = history::ActiveModel {
            id: Set(id),
            viewer_id: Set(viewer_id),
            video_id: Set(video_id),
            last_watched_at: Set(now.into()),
            created_at: Set(now.into()),
        };

        History::insert(model)
            .on_conflict(
                OnConflict::columns([history::Column::ViewerId, history::Column::VideoId])
                    .update_column(history::Column::LastWatchedAt)
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// A viewer's history entries, most recently watched first.
    pub async fn find_by_viewer(&self, viewer_id: &str) -> AppResult<Vec<history::Model>> {
        History::find()
            .filter(history::Column::ViewerId.eq(viewer_id))
            .order_by(history::Column::LastWatchedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_upsert() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = HistoryRepository::new(db);
        assert!(
            repo.upsert("h1".into(), "u1".into(), "v1".into())
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_find_by_viewer() {
        let entry = history::Model {
            id: "h1".to_string(),
            viewer_id: "u1".to_string(),
            video_id: "v1".to_string(),
            last_watched_at: Utc::now().into(),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[entry]])
                .into_connection(),
        );

        let repo = HistoryRepository::new(db);
        let result = repo.find_by_viewer("u1").await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].video_id, "v1");
    }
}
