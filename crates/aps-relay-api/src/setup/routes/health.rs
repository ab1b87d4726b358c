//! Health check handlers.

use axum::{http::StatusCode, response::IntoResponse, Json};

/// Liveness probe - process is running. Never touches upstream.
pub(super) async fn liveness_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}
