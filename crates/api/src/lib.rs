//! HTTP API layer for clipstream.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: users, channels, subscriptions, videos, comments, history
//! - **Extractors**: required and optional authentication
//! - **Middleware**: bearer-token verification against the identity provider
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;

pub use endpoints::router;
pub use middleware::AppState;
