use crate::error::HttpAppError;
use crate::state::AppState;
use aps_relay_core::AppError;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// `GET /api/aps/manifest/{resource_locator}`
///
/// Relays the upstream status code and body unchanged; job state is not interpreted.
pub async fn get_manifest(
    State(state): State<Arc<AppState>>,
    Path(resource_locator): Path<String>,
) -> Result<Response, HttpAppError> {
    let settings = state.config.aps_settings()?;
    let token = state.aps.get_access_token(&settings).await?;
    let manifest = state
        .aps
        .get_manifest(&token.access_token, &resource_locator)
        .await?;

    let status = StatusCode::from_u16(manifest.status).map_err(|_| {
        AppError::Internal(format!("Invalid upstream status code {}", manifest.status))
    })?;

    Ok((
        status,
        [(header::CONTENT_TYPE, "application/json")],
        manifest.body,
    )
        .into_response())
}
