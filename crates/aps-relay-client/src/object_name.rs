//! Stored object naming and resource locator encoding.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};

/// Replace every character outside `[A-Za-z0-9._-]` with `_`.
///
/// An empty name becomes `file` so the stored name always has a non-empty suffix.
pub fn sanitize_filename(filename: &str) -> String {
    if filename.is_empty() {
        return "file".to_string();
    }

    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `<epoch-millis>-<sanitized-name>`, the name an upload is stored under.
pub fn object_name(original_filename: &str, now: DateTime<Utc>) -> String {
    format!(
        "{}-{}",
        now.timestamp_millis(),
        sanitize_filename(original_filename)
    )
}

/// Base64 of the upstream object id: the handle clients poll the manifest with.
pub fn resource_locator(object_id: &str) -> String {
    STANDARD.encode(object_id)
}
