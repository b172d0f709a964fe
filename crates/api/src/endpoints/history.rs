//! Watch history endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use clipstream_common::AppResult;
use serde::Serialize;
use serde_json::{Value, json};

use crate::{endpoints::videos::VideoResponse, extractors::AuthUser, middleware::AppState};

/// One watch-history entry with its video.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryEntryResponse {
    video: VideoResponse,
    last_watched_at: String,
}

/// Record that the caller watched a video.
async fn record(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<Json<Value>> {
    state.history_service.record(&user.id, &video_id).await?;

    Ok(Json(json!({ "message": "History updated" })))
}

/// Caller's watch history, most recently watched first.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<HistoryEntryResponse>>> {
    let entries = state.history_service.list(&user.id).await?;

    Ok(Json(
        entries
            .into_iter()
            .map(|e| HistoryEntryResponse {
                video: e.video.into(),
                last_watched_at: e.history.last_watched_at.to_rfc3339(),
            })
            .collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(list))
        .route("/{videoId}", post(record))
}
