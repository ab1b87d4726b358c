use crate::error::HttpAppError;
use crate::state::AppState;
use aps_relay_client::TokenBundle;
use axum::{extract::State, Json};
use std::sync::Arc;

/// `GET /api/aps/token`: a fresh access token on every call.
pub async fn get_token(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TokenBundle>, HttpAppError> {
    let settings = state.config.aps_settings()?;
    let token = state.aps.get_access_token(&settings).await?;
    Ok(Json(token))
}
