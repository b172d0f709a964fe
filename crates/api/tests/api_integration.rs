//! API integration tests.
//!
//! These tests drive the full router with a mock database, a static identity
//! provider, and an in-memory storage stub.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    middleware::from_fn_with_state,
};
use clipstream_api::{middleware::auth_middleware, AppState, router as api_router};
use clipstream_common::config::ChannelConfig;
use clipstream_common::{
    AppResult, IdentityClaims, IdentityProvider, StorageBackend, UploadedFile,
};
use clipstream_core::{
    AnalyticsService, ChannelService, CommentService, HistoryService, SubscriptionService,
    UserService, VideoService,
};
use clipstream_db::repositories::{
    ChannelRepository, CommentRepository, HistoryRepository, SubscriptionRepository,
    UserRepository, VideoRepository,
};
use clipstream_db::test_utils::{mock_user, mock_video};
use http_body_util::BodyExt;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use std::sync::Arc;
use tower::ServiceExt;

/// Identity provider that accepts any token as the same test subject.
struct StaticIdentity;

#[async_trait::async_trait]
impl IdentityProvider for StaticIdentity {
    async fn verify(&self, _token: &str) -> AppResult<IdentityClaims> {
        Ok(IdentityClaims {
            uid: "ext-1".to_string(),
            email: Some("ada@example.com".to_string()),
            name: Some("Ada".to_string()),
            picture: None,
            aud: None,
        })
    }
}

/// Storage stub that never touches the filesystem.
struct NullStorage;

#[async_trait::async_trait]
impl StorageBackend for NullStorage {
    async fn upload(&self, key: &str, data: &[u8], content_type: &str) -> AppResult<UploadedFile> {
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

fn build_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);

    let user_repo = UserRepository::new(Arc::clone(&db));
    let channel_repo = ChannelRepository::new(Arc::clone(&db));
    let subscription_repo = SubscriptionRepository::new(Arc::clone(&db));
    let video_repo = VideoRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let history_repo = HistoryRepository::new(Arc::clone(&db));

    let storage: Arc<dyn StorageBackend> = Arc::new(NullStorage);

    AppState {
        user_service: UserService::new(user_repo.clone()),
        channel_service: ChannelService::new(
            channel_repo.clone(),
            user_repo,
            subscription_repo.clone(),
            video_repo.clone(),
            ChannelConfig::default(),
        ),
        subscription_service: SubscriptionService::new(
            subscription_repo.clone(),
            channel_repo.clone(),
            video_repo.clone(),
        ),
        video_service: VideoService::new(
            video_repo.clone(),
            channel_repo.clone(),
            Arc::clone(&storage),
        ),
        comment_service: CommentService::new(comment_repo, video_repo.clone()),
        history_service: HistoryService::new(history_repo, video_repo.clone()),
        analytics_service: AnalyticsService::new(channel_repo, video_repo, subscription_repo),
        identity: Arc::new(StaticIdentity),
        storage,
    }
}

fn build_app(db: DatabaseConnection) -> Router {
    let state = build_state(db);

    Router::new()
        .nest("/api", api_router())
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

#[tokio::test]
async fn test_trending_is_public() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[
            mock_video("v1", "ch1", "First", 100),
            mock_video("v2", "ch1", "Second", 50),
        ]])
        .into_connection();

    let app = build_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/videos/trending/list")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["id"], "v1");
    assert_eq!(json[0]["views"], 100);
}

#[tokio::test]
async fn test_subscription_status_requires_auth() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = build_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/subscriptions/ch1/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unauthenticated_request_gets_json_error_body() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = build_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/users/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["message"], "Unauthorized");
}

#[tokio::test]
async fn test_missing_channel_is_404_with_message() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<clipstream_db::entities::channel::Model>::new()])
        .into_connection();

    let app = build_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/channel/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["message"], "Channel not found");
}

#[tokio::test]
async fn test_sync_returns_existing_user() {
    let user = mock_user("u1", "ext-1");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // middleware resolves the local row
        .append_query_results([[user.clone()]])
        // sync looks it up again
        .append_query_results([[user]])
        .into_connection();

    let app = build_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users/sync")
                .header("Authorization", "Bearer some-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["id"], "u1");
    assert_eq!(json["uid"], "ext-1");
}

#[tokio::test]
async fn test_anonymous_view_returns_current_counter() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[mock_video("v1", "ch1", "Clip", 9)]])
        .into_connection();

    let app = build_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/videos/v1/view")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["views"], 9);
}
