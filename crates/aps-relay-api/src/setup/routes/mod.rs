//! Route configuration and setup.
//!
//! The relay route group lives in [domains](domains); health checks in [health](health).

mod domains;
mod health;

use crate::middleware::origin_guard_middleware;
use crate::state::AppState;
use aps_relay_core::Config;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router<()> {
    let cors = setup_cors(config);

    Router::new()
        .route("/health", get(health::liveness_check))
        .merge(domains::aps_routes(state.clone()))
        // Upload size is left to upstream to enforce.
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            origin_guard_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Setup CORS configuration
///
/// Response headers mirror the allow-list the origin guard enforces.
fn setup_cors(config: &Config) -> CorsLayer {
    let allow_origin = if config.allowed_origins.is_empty() {
        if config.is_production() {
            tracing::warn!("ALLOWED_ORIGINS is empty - every origin is accepted");
        }
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                // A literal "*" is not a valid entry in an explicit origin list.
                Ok(value) if origin != "*" => Some(value),
                _ => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}
