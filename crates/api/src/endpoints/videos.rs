//! Video endpoints.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    routing::{get, post},
};
use bytes::Bytes;
use clipstream_common::{AppError, AppResult};
use clipstream_core::{FilePart, UploadVideoInput};
use clipstream_db::entities::video;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
};

// ==================== Request/Response Types ====================

/// Video response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    pub id: String,
    pub channel_id: String,
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub thumbnail_url: String,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub visibility: String,
    pub views: i64,
    pub created_at: String,
}

impl From<video::Model> for VideoResponse {
    fn from(v: video::Model) -> Self {
        let tags = v.tag_list();
        Self {
            id: v.id,
            channel_id: v.channel_id,
            title: v.title,
            description: v.description,
            video_url: v.video_url,
            thumbnail_url: v.thumbnail_url,
            tags,
            category: v.category,
            visibility: v.visibility,
            views: v.views,
            created_at: v.created_at.to_rfc3339(),
        }
    }
}

/// Listing filter.
#[derive(Debug, Deserialize)]
struct ListVideosQuery {
    category: Option<String>,
}

/// Like toggle response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LikeResponse {
    liked: bool,
    like_count: u64,
    video: VideoResponse,
}

/// View registration response.
#[derive(Serialize)]
struct ViewResponse {
    views: i64,
}

/// One category with its public video count.
#[derive(Serialize)]
struct CategoryResponse {
    category: String,
    count: i64,
}

// ==================== Handlers ====================

/// Publish a video.
async fn upload(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<VideoResponse>> {
    let mut title = None;
    let mut description = None;
    let mut category = None;
    let mut visibility = None;
    let mut tags = Vec::new();
    let mut video_part = None;
    let mut thumbnail_part = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        match field.name().unwrap_or_default() {
            "title" => title = Some(read_text(field).await?),
            "description" => description = Some(read_text(field).await?),
            "category" => category = Some(read_text(field).await?),
            "visibility" => visibility = Some(read_text(field).await?),
            "tags" => {
                tags = read_text(field)
                    .await?
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(ToString::to_string)
                    .collect();
            }
            "video" => video_part = Some(read_file(field).await?),
            "thumbnail" => thumbnail_part = Some(read_file(field).await?),
            _ => {}
        }
    }

    let input = UploadVideoInput {
        title: title.ok_or_else(|| AppError::BadRequest("Title is required".to_string()))?,
        description,
        tags,
        category: category.filter(|c| !c.is_empty()),
        visibility: visibility.filter(|v| !v.is_empty()),
        video: video_part
            .ok_or_else(|| AppError::BadRequest("Video file is required".to_string()))?,
        thumbnail: thumbnail_part
            .ok_or_else(|| AppError::BadRequest("Thumbnail file is required".to_string()))?,
    };

    let video = state.video_service.upload(&user.id, input).await?;

    Ok(Json(video.into()))
}

/// List public videos, optionally filtered by category.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListVideosQuery>,
) -> AppResult<Json<Vec<VideoResponse>>> {
    let videos = state
        .video_service
        .list_public(query.category.as_deref())
        .await?;

    Ok(Json(videos.into_iter().map(Into::into).collect()))
}

/// Show a video.
async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<VideoResponse>> {
    let video = state.video_service.get(&id).await?;

    Ok(Json(video.into()))
}

/// Toggle the caller's like on a video.
async fn like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<LikeResponse>> {
    let status = state.video_service.toggle_like(&user.id, &id).await?;
    let video = state.video_service.get(&id).await?;

    Ok(Json(LikeResponse {
        liked: status.liked,
        like_count: status.like_count,
        video: video.into(),
    }))
}

/// Register a view. Anonymous playback never advances the counter.
async fn view(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ViewResponse>> {
    let views = state
        .video_service
        .register_view(&id, user.as_ref().map(|u| u.id.as_str()))
        .await?;

    Ok(Json(ViewResponse { views }))
}

/// Public videos by view count descending.
async fn trending(State(state): State<AppState>) -> AppResult<Json<Vec<VideoResponse>>> {
    let videos = state.video_service.trending().await?;

    Ok(Json(videos.into_iter().map(Into::into).collect()))
}

/// Distinct public categories with counts.
async fn categories(State(state): State<AppState>) -> AppResult<Json<Vec<CategoryResponse>>> {
    let categories = state.video_service.categories().await?;

    Ok(Json(
        categories
            .into_iter()
            .map(|(category, count)| CategoryResponse { category, count })
            .collect(),
    ))
}

/// Public videos the caller has liked.
async fn liked(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<VideoResponse>>> {
    let videos = state.video_service.liked_by(&user.id).await?;

    Ok(Json(videos.into_iter().map(Into::into).collect()))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart field: {e}")))
}

async fn read_file(field: axum::extract::multipart::Field<'_>) -> AppResult<FilePart> {
    let file_name = field.file_name().map(ToString::to_string);
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let data: Bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;

    Ok(FilePart {
        data,
        file_name,
        content_type,
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload))
        .route("/", get(list))
        .route("/{id}", get(show))
        .route("/{id}/like", post(like))
        .route("/{id}/view", post(view))
        .route("/trending/list", get(trending))
        .route("/categories/list", get(categories))
        .route("/liked/me", get(liked))
}
