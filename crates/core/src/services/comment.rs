//! Comment thread service.

use chrono::Utc;
use clipstream_common::{AppError, AppResult, id::IdGenerator};
use clipstream_db::entities::comment;
use clipstream_db::repositories::{CommentRepository, VideoRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for posting a comment or reply.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    #[validate(length(min = 1, max = 8192))]
    pub text: String,
    /// Parent comment when this is a reply. One level only.
    pub parent_id: Option<String>,
}

/// Service for comment threads.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    video_repo: VideoRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(comment_repo: CommentRepository, video_repo: VideoRepository) -> Self {
        Self {
            comment_repo,
            video_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Post a comment on a video.
    ///
    /// A reply must point at a parent on the same video.
    pub async fn create(
        &self,
        author_id: &str,
        video_id: &str,
        input: CreateCommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        if input.text.trim().is_empty() {
            return Err(AppError::Validation("Comment is empty".to_string()));
        }

        let video = self.video_repo.get_by_id(video_id).await?;

        if let Some(parent_id) = &input.parent_id {
            let parent = self.comment_repo.get_by_id(parent_id).await?;
            if parent.video_id != video.id {
                return Err(AppError::BadRequest(
                    "Parent comment belongs to a different video".to_string(),
                ));
            }
        }

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            video_id: Set(video.id),
            user_id: Set(author_id.to_string()),
            text: Set(input.text),
            parent_id: Set(input.parent_id),
            created_at: Set(Utc::now().into()),
        };

        self.comment_repo.create(model).await
    }

    /// Top-level comments of a video, newest first.
    pub async fn list_for_video(&self, video_id: &str) -> AppResult<Vec<comment::Model>> {
        self.video_repo.get_by_id(video_id).await?;
        self.comment_repo.find_top_level(video_id).await
    }

    /// Replies to a comment, oldest first.
    pub async fn list_replies(&self, comment_id: &str) -> AppResult<Vec<comment::Model>> {
        self.comment_repo.get_by_id(comment_id).await?;
        self.comment_repo.find_replies(comment_id).await
    }

    /// Delete a comment. Only the author may delete it.
    pub async fn delete(&self, comment_id: &str, caller_id: &str) -> AppResult<()> {
        let comment = self.comment_repo.get_by_id(comment_id).await?;

        if comment.user_id != caller_id {
            return Err(AppError::Forbidden(
                "Not the comment author".to_string(),
            ));
        }

        self.comment_repo.delete(comment_id).await
    }
}
