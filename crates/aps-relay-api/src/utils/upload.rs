//! Multipart helpers for the upload endpoint

use crate::constants::FILE_FIELD;
use aps_relay_client::FileUpload;
use aps_relay_core::AppError;
use axum::extract::Multipart;

/// Extract the uploaded file from a multipart form.
/// Only one field named "file" is accepted; multiple file fields are rejected.
/// Other fields are ignored.
pub async fn extract_multipart_file(mut multipart: Multipart) -> Result<FileUpload, AppError> {
    let mut upload: Option<FileUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        if upload.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;

        upload = Some(FileUpload { filename, data });
    }

    upload.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))
}
