//! Relay route group.

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub fn aps_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(&format!("{}/token", API_PREFIX), get(handlers::token::get_token))
        .route(
            &format!("{}/upload-translate", API_PREFIX),
            post(handlers::upload_translate::upload_translate),
        )
        .route(
            &format!("{}/manifest/{{resource_locator}}", API_PREFIX),
            get(handlers::manifest::get_manifest),
        )
        .with_state(state)
}
