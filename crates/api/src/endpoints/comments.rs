//! Comment endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use clipstream_common::AppResult;
use clipstream_core::CreateCommentInput;
use clipstream_db::entities::comment;
use serde::Serialize;
use serde_json::{Value, json};

use crate::{extractors::AuthUser, middleware::AppState};

/// Comment response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub video_id: String,
    pub user_id: String,
    pub parent_id: Option<String>,
    pub text: String,
    pub created_at: String,
}

impl From<comment::Model> for CommentResponse {
    fn from(c: comment::Model) -> Self {
        Self {
            id: c.id,
            video_id: c.video_id,
            user_id: c.user_id,
            parent_id: c.parent_id,
            text: c.text,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// Post a comment or reply on a video.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Json(input): Json<CreateCommentInput>,
) -> AppResult<Json<CommentResponse>> {
    let comment = state
        .comment_service
        .create(&user.id, &video_id, input)
        .await?;

    Ok(Json(comment.into()))
}

/// Top-level comments of a video, newest first.
async fn list(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<Json<Vec<CommentResponse>>> {
    let comments = state.comment_service.list_for_video(&video_id).await?;

    Ok(Json(comments.into_iter().map(Into::into).collect()))
}

/// Replies to a comment, oldest first.
async fn replies(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<CommentResponse>>> {
    let comments = state.comment_service.list_replies(&id).await?;

    Ok(Json(comments.into_iter().map(Into::into).collect()))
}

/// Delete a comment. Only the author may delete it.
async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    state.comment_service.delete(&id, &user.id).await?;

    Ok(Json(json!({ "message": "Comment deleted" })))
}

pub fn router() -> Router<AppState> {
    // POST/GET take a video id, DELETE a comment id; one route entry since
    // axum rejects same-shape paths with different parameter names.
    Router::new()
        .route("/{id}", post(create).get(list).delete(remove))
        .route("/{id}/replies", get(replies))
}
