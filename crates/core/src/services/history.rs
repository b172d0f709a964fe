//! Watch history service.

use std::collections::HashMap;

use clipstream_common::{AppResult, id::IdGenerator};
use clipstream_db::entities::{history, video};
use clipstream_db::repositories::{HistoryRepository, VideoRepository};

/// One history row joined with its video, when the video still exists.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub history: history::Model,
    pub video: video::Model,
}

/// Service for per-viewer watch history.
#[derive(Clone)]
pub struct HistoryService {
    history_repo: HistoryRepository,
    video_repo: VideoRepository,
    id_gen: IdGenerator,
}

impl HistoryService {
    /// Create a new history service.
    #[must_use]
    pub const fn new(history_repo: HistoryRepository, video_repo: VideoRepository) -> Self {
        Self {
            history_repo,
            video_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Record that the viewer watched a video, refreshing `last_watched_at`.
    pub async fn record(&self, viewer_id: &str, video_id: &str) -> AppResult<()> {
        let video = self.video_repo.get_by_id(video_id).await?;

        self.history_repo
            .upsert(self.id_gen.generate(), viewer_id.to_string(), video.id)
            .await
    }

    /// The viewer's history, most recently watched first.
    ///
    /// Entries whose video has been deleted are skipped rather than surfaced
    /// as holes.
    pub async fn list(&self, viewer_id: &str) -> AppResult<Vec<HistoryEntry>> {
        let entries = self.history_repo.find_by_viewer(viewer_id).await?;

        let video_ids: Vec<String> = entries.iter().map(|e| e.video_id.clone()).collect();
        let mut videos: HashMap<String, video::Model> = self
            .video_repo
            .find_by_ids(&video_ids)
            .await?
            .into_iter()
            .map(|v| (v.id.clone(), v))
            .collect();

        Ok(entries
            .into_iter()
            .filter_map(|history| {
                videos
                    .remove(&history.video_id)
                    .map(|video| HistoryEntry { history, video })
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use clipstream_db::entities::video;
    use clipstream_db::test_utils::mock_video;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn service(db: Arc<DatabaseConnection>) -> HistoryService {
        HistoryService::new(HistoryRepository::new(db.clone()), VideoRepository::new(db))
    }

    fn entry(id: &str, video_id: &str) -> history::Model {
        history::Model {
            id: id.to_string(),
            viewer_id: "u1".to_string(),
            video_id: video_id.to_string(),
            last_watched_at: Utc::now().into(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_record_checks_video_exists() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<video::Model>::new()])
                .into_connection(),
        );

        let result = service(db).record("u1", "missing").await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_record_upserts() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[mock_video("v1", "ch1", "Clip", 0)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        assert!(service(db).record("u1", "v1").await.is_ok());
    }

    #[tokio::test]
    async fn test_list_skips_deleted_videos() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[entry("h1", "v1"), entry("h2", "v2")]])
                // only v1 still exists
                .append_query_results([[mock_video("v1", "ch1", "Clip", 3)]])
                .into_connection(),
        );

        let entries = service(db).list("u1").await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].video.id, "v1");
    }
}
