//! API middleware.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use clipstream_common::{IdentityProvider, StorageBackend};
use clipstream_core::{
    AnalyticsService, ChannelService, CommentService, HistoryService, SubscriptionService,
    UserService, VideoService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub channel_service: ChannelService,
    pub subscription_service: SubscriptionService,
    pub video_service: VideoService,
    pub comment_service: CommentService,
    pub history_service: HistoryService,
    pub analytics_service: AnalyticsService,
    pub identity: Arc<dyn IdentityProvider>,
    pub storage: Arc<dyn StorageBackend>,
}

/// Authentication middleware.
///
/// Verifies the bearer token with the identity provider and stashes the
/// claims, plus the matching local user row when one exists, in request
/// extensions. Absent or invalid tokens pass through anonymously; the
/// extractors decide whether identity is required.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.identity.verify(token).await {
            Ok(claims) => {
                if let Ok(Some(user)) = state.user_service.find_by_uid(&claims.uid).await {
                    req.extensions_mut().insert(user);
                }
                req.extensions_mut().insert(claims);
            }
            Err(e) => {
                tracing::debug!("token verification failed: {e}");
            }
        }
    }

    next.run(req).await
}
