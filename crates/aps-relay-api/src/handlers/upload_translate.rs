use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::extract_multipart_file;
use aps_relay_client::resource_locator;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTranslateResponse {
    pub resource_locator: String,
}

/// `POST /api/aps/upload-translate`
///
/// Token, bucket ensure, upload, then translation job submission, in that
/// order; the first failing step aborts the chain. The file is read before
/// anything else so a request without one never reaches upstream.
pub async fn upload_translate(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadTranslateResponse>, HttpAppError> {
    let file = extract_multipart_file(multipart?).await?;
    tracing::debug!(
        filename = %file.filename,
        size_bytes = file.data.len(),
        "Received file for translation"
    );

    let settings = state.config.aps_settings()?;
    let token = state.aps.get_access_token(&settings).await?;
    state
        .aps
        .ensure_bucket(&token.access_token, &settings)
        .await?;
    let object_id = state
        .aps
        .upload_to_bucket(&token.access_token, &settings.bucket_key, file)
        .await?;

    let urn = resource_locator(&object_id);
    state.aps.start_translation(&token.access_token, &urn).await?;

    Ok(Json(UploadTranslateResponse {
        resource_locator: urn,
    }))
}
