// src/api/http/router.rs
// HTTP router composition for the chat relay

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::{chat::chat_handler, handlers::health_handler};
use crate::config::CONFIG;
use crate::state::AppState;

/// Main HTTP router: health plus the single chat endpoint.
pub fn http_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .layer(DefaultBodyLimit::max(CONFIG.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            CONFIG.request_timeout,
        )))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
