//! Router utilities shared by every build: health check and 404 fallback

use crate::core::BizError;
use crate::core::error::RequestError;
use axum::{Json, Router, http::Uri, routing::get};
use serde_json::{Value, json};

/// Build health check routes
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check endpoint handler
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "biztime"
    }))
}

/// Fallback for requests no route matched
pub async fn not_found(uri: Uri) -> BizError {
    RequestError::RouteNotFound {
        path: uri.path().to_string(),
    }
    .into()
}
