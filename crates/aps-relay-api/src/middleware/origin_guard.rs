use crate::error::HttpAppError;
use crate::state::AppState;
use aps_relay_core::AppError;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Origin allow-list guard
///
/// Rejects cross-origin requests whose `Origin` is not on the configured
/// allow-list before they reach any handler (preflights included). With an
/// empty allow-list every origin passes. Requests without an `Origin` header
/// are not cross-origin and always pass.
pub async fn origin_guard_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        let origin = String::from_utf8_lossy(origin.as_bytes());
        if !state.config.origin_allowed(&origin) {
            tracing::debug!(origin = %origin, "Rejected request from disallowed origin");
            return HttpAppError(AppError::OriginNotAllowed(origin.into_owned())).into_response();
        }
    }

    next.run(request).await
}
