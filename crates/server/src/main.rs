//! Clipstream server entry point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, middleware};
use clipstream_api::{AppState, middleware::auth_middleware, router as api_router};
use clipstream_common::{
    Config, HttpIdentityProvider, IdentityProvider, LocalStorage, StorageBackend,
};
use clipstream_core::{
    AnalyticsService, ChannelService, CommentService, HistoryService, SubscriptionService,
    UserService, VideoService,
};
use clipstream_db::repositories::{
    ChannelRepository, CommentRepository, HistoryRepository, SubscriptionRepository,
    UserRepository, VideoRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
#[allow(clippy::expect_used)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clipstream=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting clipstream server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database and run migrations
    let db = clipstream_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    clipstream_db::migrate(&db).await?;
    info!("Migrations completed");

    // External collaborators
    let identity: Arc<dyn IdentityProvider> = Arc::new(HttpIdentityProvider::new(
        config.identity.verify_url.clone(),
        config.identity.audience.clone(),
    ));

    let media_path = PathBuf::from(&config.media.base_path);
    let storage: Arc<dyn StorageBackend> = Arc::new(LocalStorage::new(
        media_path.clone(),
        config.media.base_url.clone(),
    ));

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let channel_repo = ChannelRepository::new(Arc::clone(&db));
    let subscription_repo = SubscriptionRepository::new(Arc::clone(&db));
    let video_repo = VideoRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let history_repo = HistoryRepository::new(Arc::clone(&db));

    // Initialize services
    let user_service = UserService::new(user_repo.clone());
    let channel_service = ChannelService::new(
        channel_repo.clone(),
        user_repo,
        subscription_repo.clone(),
        video_repo.clone(),
        config.channels.clone(),
    );
    let subscription_service = SubscriptionService::new(
        subscription_repo.clone(),
        channel_repo.clone(),
        video_repo.clone(),
    );
    let video_service = VideoService::new(
        video_repo.clone(),
        channel_repo.clone(),
        Arc::clone(&storage),
    );
    let comment_service = CommentService::new(comment_repo, video_repo.clone());
    let history_service = HistoryService::new(history_repo, video_repo.clone());
    let analytics_service = AnalyticsService::new(channel_repo, video_repo, subscription_repo);

    let state = AppState {
        user_service,
        channel_service,
        subscription_service,
        video_service,
        comment_service,
        history_service,
        analytics_service,
        identity,
        storage,
    };

    let max_upload = usize::try_from(config.media.max_upload_size).unwrap_or(usize::MAX);

    let app = Router::new()
        .nest("/api", api_router())
        .nest_service("/media", ServeDir::new(media_path))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}
