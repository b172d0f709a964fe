//! Channel endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use clipstream_common::AppResult;
use clipstream_core::{CreateChannelInput, UpdateChannelInput};
use clipstream_db::entities::channel;
use serde::Serialize;

use crate::{
    endpoints::users::UserResponse, endpoints::videos::VideoResponse, extractors::AuthUser,
    middleware::AppState,
};

// ==================== Request/Response Types ====================

/// Channel response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelResponse {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: String,
}

impl From<channel::Model> for ChannelResponse {
    fn from(c: channel::Model) -> Self {
        Self {
            id: c.id,
            owner_id: c.owner_id,
            name: c.name,
            description: c.description,
            avatar_url: c.avatar_url,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// Channel page response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChannelPageResponse {
    channel: ChannelResponse,
    owner: Option<UserResponse>,
    subscriber_count: u64,
    videos: Vec<VideoResponse>,
}

/// Analytics overview response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyticsResponse {
    channel_id: String,
    total_views: i64,
    watch_time_hours: f64,
    total_subscribers: u64,
    views_last_48h: i64,
    top_videos: Vec<VideoResponse>,
}

// ==================== Handlers ====================

/// Create a new channel.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateChannelInput>,
) -> AppResult<Json<ChannelResponse>> {
    let channel = state.channel_service.create(&user.id, input).await?;

    Ok(Json(channel.into()))
}

/// Update a channel. Only the owner may update it.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Json(input): Json<UpdateChannelInput>,
) -> AppResult<Json<ChannelResponse>> {
    let channel = state
        .channel_service
        .update(&channel_id, &user.id, input)
        .await?;

    Ok(Json(channel.into()))
}

/// Public channel page.
async fn show(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> AppResult<Json<ChannelPageResponse>> {
    let page = state.channel_service.page(&channel_id).await?;

    Ok(Json(ChannelPageResponse {
        channel: page.channel.into(),
        owner: page.owner.map(Into::into),
        subscriber_count: page.subscriber_count,
        videos: page.videos.into_iter().map(Into::into).collect(),
    }))
}

/// Dashboard analytics for the caller's channel.
async fn analytics(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<AnalyticsResponse>> {
    let overview = state.analytics_service.overview(&user.id).await?;

    Ok(Json(AnalyticsResponse {
        channel_id: overview.channel_id,
        total_views: overview.total_views,
        watch_time_hours: overview.watch_time_hours,
        total_subscribers: overview.total_subscribers,
        views_last_48h: overview.views_last_48h,
        top_videos: overview.top_videos.into_iter().map(Into::into).collect(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/studio/analytics", get(analytics))
        .route("/{channelId}", get(show).put(update))
}
