// src/api/http/handlers.rs

use axum::{Json, response::IntoResponse};
use chrono::Utc;
use serde_json::json;

use crate::config::CONFIG;

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "model": CONFIG.model,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
