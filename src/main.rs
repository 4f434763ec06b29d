//! Pulsync Backend
//!
//! REST backend for an internal short-form content platform: personalized
//! feed ranking, interest learning from view events, and the content,
//! tag and interaction endpoints that feed it.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod feed;
mod models;
mod observability;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;
use observability::RequestLogger;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
    pub request_log: Arc<RequestLogger>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Pulsync Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Create application state
    let state = AppState {
        repo,
        request_log: Arc::new(RequestLogger::new(config.request_log_capacity)),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Auth
        .route("/auth/login", post(api::login))
        .route("/auth/register", post(api::register))
        .route("/auth/me", get(api::me))
        // Feed
        .route("/feed", get(api::get_feed))
        .route("/feed/for-you", get(api::get_feed))
        .route("/feed/following", get(api::get_following_feed))
        .route("/feed/discover", get(api::get_discover_feed))
        .route("/feed/view", post(api::record_view))
        .route("/feed/interests", get(api::get_interests))
        .route("/feed/interests/{tag_id}/follow", post(api::follow_tag))
        // Content
        .route("/content", get(api::list_content))
        .route("/content", post(api::create_content))
        .route("/content/{id}", get(api::get_content))
        .route("/content/{id}/like", post(api::toggle_like))
        .route("/content/{id}/bookmark", post(api::toggle_bookmark))
        .route("/content/{id}/comments", get(api::list_comments))
        .route("/content/{id}/comments", post(api::create_comment))
        // Tags
        .route("/tags", get(api::list_tags))
        .route("/tags", post(api::create_tag))
        .route("/tags/{id}", get(api::get_tag))
        // Admin
        .route("/admin/logs", get(api::get_request_logs))
        .route("/admin/metrics", get(api::get_metrics));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            observability::track_requests,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
