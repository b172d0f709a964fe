//! Video catalog service: upload, listing, likes, and view counting.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use clipstream_common::id::IdGenerator;
use clipstream_common::{
    AppError, AppResult, MediaKind, StorageBackend, generate_storage_key,
};
use clipstream_db::entities::video::{VISIBILITY_PRIVATE, VISIBILITY_PUBLIC};
use clipstream_db::entities::video;
use clipstream_db::repositories::{ChannelRepository, VideoRepository};
use sea_orm::Set;
use serde::Serialize;
use validator::Validate;

/// Videos returned from the trending listing.
const TRENDING_LIMIT: u64 = 20;

/// Catch-all category clients send when no filter is meant.
const CATEGORY_ALL: &str = "All";

/// Narrow an optional category to an actual filter. The catch-all
/// sentinel matches everything, so it drops out here.
fn category_filter(category: Option<&str>) -> Option<&str> {
    category.filter(|c| *c != CATEGORY_ALL)
}

/// One part of a multipart upload, already buffered.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub data: Bytes,
    pub file_name: Option<String>,
    pub content_type: String,
}

/// Input for publishing a video. The media and thumbnail arrive as
/// separate multipart file parts.
#[derive(Debug, Validate)]
pub struct UploadVideoInput {
    #[validate(length(min = 1, max = 256))]
    pub title: String,
    #[validate(length(max = 8192))]
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub visibility: Option<String>,
    pub video: FilePart,
    pub thumbnail: FilePart,
}

/// Result of a like toggle: the caller's relationship to the video plus its
/// current like count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    pub liked: bool,
    pub like_count: u64,
}

/// Service for the video catalog.
#[derive(Clone)]
pub struct VideoService {
    video_repo: VideoRepository,
    channel_repo: ChannelRepository,
    storage: Arc<dyn StorageBackend>,
    id_gen: IdGenerator,
}

impl VideoService {
    /// Create a new video service.
    #[must_use]
    pub fn new(
        video_repo: VideoRepository,
        channel_repo: ChannelRepository,
        storage: Arc<dyn StorageBackend>,
    ) -> Self {
        Self {
            video_repo,
            channel_repo,
            storage,
            id_gen: IdGenerator::new(),
        }
    }

    /// Publish a video under the uploader's channel.
    ///
    /// Media and thumbnail are stored first; the catalog row is only written
    /// once both files are durable.
    pub async fn upload(&self, uploader_id: &str, input: UploadVideoInput) -> AppResult<video::Model> {
        input.validate()?;

        let channels = self.channel_repo.find_by_owner(uploader_id).await?;
        let Some(channel) = channels.into_iter().next() else {
            return Err(AppError::BadRequest(
                "Create a channel before uploading".to_string(),
            ));
        };

        let visibility = match input.visibility.as_deref() {
            None | Some(VISIBILITY_PUBLIC) => VISIBILITY_PUBLIC,
            Some(VISIBILITY_PRIVATE) => VISIBILITY_PRIVATE,
            Some(other) => {
                return Err(AppError::Validation(format!(
                    "Unknown visibility: {other}"
                )));
            }
        };

        let id = self.id_gen.generate();

        let video_key =
            generate_storage_key(MediaKind::Video, &id, input.video.file_name.as_deref());
        let stored_video = self
            .storage
            .upload(&video_key, &input.video.data, &input.video.content_type)
            .await?;

        let thumb_key = generate_storage_key(
            MediaKind::Thumbnail,
            &id,
            input.thumbnail.file_name.as_deref(),
        );
        let stored_thumb = self
            .storage
            .upload(
                &thumb_key,
                &input.thumbnail.data,
                &input.thumbnail.content_type,
            )
            .await?;

        let model = video::ActiveModel {
            id: Set(id),
            channel_id: Set(channel.id),
            title: Set(input.title),
            description: Set(input.description),
            video_url: Set(stored_video.url),
            thumbnail_url: Set(stored_thumb.url),
            tags: Set(serde_json::json!(input.tags)),
            category: Set(input.category),
            visibility: Set(visibility.to_string()),
            views: Set(0),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let video = self.video_repo.create(model).await?;
        tracing::info!(video_id = %video.id, channel_id = %video.channel_id, "video published");

        Ok(video)
    }

    /// Get a video by ID.
    pub async fn get(&self, id: &str) -> AppResult<video::Model> {
        self.video_repo.get_by_id(id).await
    }

    /// List public videos, optionally filtered by category.
    pub async fn list_public(&self, category: Option<&str>) -> AppResult<Vec<video::Model>> {
        self.video_repo.find_public(category_filter(category)).await
    }

    /// Public videos by view count descending.
    pub async fn trending(&self) -> AppResult<Vec<video::Model>> {
        self.video_repo.find_trending(TRENDING_LIMIT).await
    }

    /// Public videos the user has liked, newest first.
    pub async fn liked_by(&self, user_id: &str) -> AppResult<Vec<video::Model>> {
        self.video_repo.find_liked_by(user_id).await
    }

    /// Distinct public categories with their video counts.
    pub async fn categories(&self) -> AppResult<Vec<(String, i64)>> {
        self.video_repo.categories().await
    }

    /// Toggle the caller's like on a video.
    pub async fn toggle_like(&self, user_id: &str, video_id: &str) -> AppResult<LikeStatus> {
        let video = self.video_repo.get_by_id(video_id).await?;

        let liked = if self.video_repo.has_liked(user_id, &video.id).await? {
            self.video_repo.delete_like(user_id, &video.id).await?;
            false
        } else {
            self.video_repo
                .insert_like(
                    self.id_gen.generate(),
                    user_id.to_string(),
                    video.id.clone(),
                )
                .await?;
            true
        };

        let like_count = self.video_repo.count_likes(&video.id).await?;

        Ok(LikeStatus { liked, like_count })
    }

    /// Register a view and return the current counter.
    ///
    /// Each identified viewer advances the counter at most once per video;
    /// anonymous playback never counts. The dedup insert is the sole gate for
    /// the increment, so replays and concurrent requests settle to one.
    pub async fn register_view(&self, video_id: &str, viewer_id: Option<&str>) -> AppResult<i64> {
        let video = self.video_repo.get_by_id(video_id).await?;

        let Some(viewer_id) = viewer_id else {
            return Ok(video.views);
        };

        let inserted = self
            .video_repo
            .insert_view(
                self.id_gen.generate(),
                video.id.clone(),
                viewer_id.to_string(),
            )
            .await?;

        if !inserted {
            return Ok(video.views);
        }

        self.video_repo.increment_views(&video.id).await?;

        // Re-read so concurrent increments are reflected. A video deleted
        // between the increment and the re-read reports zero views.
        Ok(self
            .video_repo
            .find_by_id(&video.id)
            .await?
            .map_or(0, |v| v.views))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clipstream_common::UploadedFile;
    use clipstream_db::entities::channel;
    use clipstream_db::test_utils::{mock_channel, mock_video};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};

    struct NullStorage;

    #[async_trait::async_trait]
    impl StorageBackend for NullStorage {
        async fn upload(
            &self,
            key: &str,
            data: &[u8],
            content_type: &str,
        ) -> AppResult<UploadedFile> {
            Ok(UploadedFile {
                key: key.to_string(),
                url: format!("/media/{key}"),
                size: data.len() as u64,
                content_type: content_type.to_string(),
                md5: String::new(),
            })
        }

        async fn delete(&self, _key: &str) -> AppResult<()> {
            Ok(())
        }

        fn public_url(&self, key: &str) -> String {
            format!("/media/{key}")
        }

        async fn exists(&self, _key: &str) -> AppResult<bool> {
            Ok(false)
        }
    }

    fn service(db: Arc<DatabaseConnection>) -> VideoService {
        VideoService::new(
            VideoRepository::new(db.clone()),
            ChannelRepository::new(db),
            Arc::new(NullStorage),
        )
    }

    fn file_part(name: &str, content_type: &str) -> FilePart {
        FilePart {
            data: Bytes::from_static(b"bytes"),
            file_name: Some(name.to_string()),
            content_type: content_type.to_string(),
        }
    }

    fn upload_input(title: &str) -> UploadVideoInput {
        UploadVideoInput {
            title: title.to_string(),
            description: None,
            tags: vec![],
            category: None,
            visibility: None,
            video: file_part("clip.mp4", "video/mp4"),
            thumbnail: file_part("thumb.png", "image/png"),
        }
    }

    #[test]
    fn test_category_filter_passes_all_through_unfiltered() {
        assert_eq!(category_filter(None), None);
        assert_eq!(category_filter(Some("All")), None);
        assert_eq!(category_filter(Some("Music")), Some("Music"));
        // only the exact sentinel is special
        assert_eq!(category_filter(Some("all")), Some("all"));
    }

    #[tokio::test]
    async fn test_upload_requires_a_channel() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<channel::Model>::new()])
                .into_connection(),
        );

        let result = service(db).upload("u1", upload_input("My Clip")).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_upload_rejects_unknown_visibility() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[mock_channel("ch1", "u1", "Mine")]])
                .into_connection(),
        );

        let mut input = upload_input("My Clip");
        input.visibility = Some("unlisted".to_string());

        let result = service(db).upload("u1", input).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_view_anonymous_does_not_count() {
        let video = mock_video("v1", "ch1", "Clip", 7);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[video]])
                .into_connection(),
        );

        let views = service(db).register_view("v1", None).await.unwrap();

        assert_eq!(views, 7);
    }

    #[tokio::test]
    async fn test_register_view_replay_does_not_count() {
        let video = mock_video("v1", "ch1", "Clip", 7);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[video]])
                // dedup insert hits the unique index
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let views = service(db).register_view("v1", Some("u1")).await.unwrap();

        assert_eq!(views, 7);
    }

    #[tokio::test]
    async fn test_register_view_reports_zero_when_video_deleted_concurrently() {
        let video = mock_video("v1", "ch1", "Clip", 7);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[video]])
                // dedup insert lands
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                // counter increment
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                // re-read: the video row is gone
                .append_query_results([Vec::<video::Model>::new()])
                .into_connection(),
        );

        let views = service(db).register_view("v1", Some("u1")).await.unwrap();

        assert_eq!(views, 0);
    }

    #[tokio::test]
    async fn test_toggle_like_removes_existing_edge() {
        let video = mock_video("v1", "ch1", "Clip", 7);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[video]])
                // has_liked count
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1)),
                }]])
                // delete_like
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                // count_likes
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(3)),
                }]])
                .into_connection(),
        );

        let status = service(db).toggle_like("u1", "v1").await.unwrap();

        assert!(!status.liked);
        assert_eq!(status.like_count, 3);
    }
}
