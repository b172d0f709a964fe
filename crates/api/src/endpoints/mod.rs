//! API endpoints.

mod channels;
mod comments;
mod history;
mod subscriptions;
mod users;
mod videos;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/channel", channels::router())
        .nest("/subscriptions", subscriptions::router())
        .nest("/videos", videos::router())
        .nest("/comments", comments::router())
        .nest("/history", history::router())
}
