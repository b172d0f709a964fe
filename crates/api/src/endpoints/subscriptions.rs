//! Subscription endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use clipstream_common::AppResult;
use clipstream_core::SubscriptionStatus;

use crate::{endpoints::videos::VideoResponse, extractors::AuthUser, middleware::AppState};

/// Toggle the caller's subscription to a channel.
async fn toggle(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> AppResult<Json<SubscriptionStatus>> {
    let status = state
        .subscription_service
        .toggle(&user.id, &channel_id)
        .await?;

    Ok(Json(status))
}

/// Caller's subscription state for a channel.
async fn status(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> AppResult<Json<SubscriptionStatus>> {
    let status = state
        .subscription_service
        .status(&user.id, &channel_id)
        .await?;

    Ok(Json(status))
}

/// Public videos from the caller's subscribed channels.
async fn feed(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<VideoResponse>>> {
    let videos = state.subscription_service.feed(&user.id).await?;

    Ok(Json(videos.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/feed/me", get(feed))
        .route("/{channelId}", post(toggle))
        .route("/{channelId}/status", get(status))
}
