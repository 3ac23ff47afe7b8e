//! Router configuration for the demo API.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{create_slug, download_file, upload_files, upload_one_file, AppState};

/// Create the API router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/upload", post(upload_files))
        .route("/upload-one", post(upload_one_file))
        .route("/download/:name", get(download_file))
        .route("/slug", post(create_slug));

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Create a simple health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
