//! Error types module
//!
//! All failures a relay request can hit are unified under `AppError`. Each
//! variant describes how it is presented over HTTP through `ErrorMetadata`, so
//! the API crate renders every error from a single place.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like a missing upload field
    Debug,
    /// Warning level - for rejected or upstream-refused requests
    Warn,
    /// Error level - for misconfiguration and unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "UPSTREAM_ERROR")
    fn error_code(&self) -> &'static str;

    /// Client-facing message, rendered as the `error` field of the response body
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// One or more required settings are absent. Names are listed in the order they are checked.
    #[error("Missing required configuration: {}", join_names(.missing))]
    Configuration { missing: Vec<&'static str> },

    /// The upstream API refused a call, or could not be reached (`status` is `None`).
    #[error("{}", upstream_message(.step, .status, .body))]
    Upstream {
        step: &'static str,
        status: Option<u16>,
        body: String,
    },

    #[error("{0}")]
    InvalidInput(String),

    #[error("Origin {0} is not allowed")]
    OriginNotAllowed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn join_names(names: &[&'static str]) -> String {
    names.join(", ")
}

fn upstream_message(step: &str, status: &Option<u16>, body: &str) -> String {
    match status {
        Some(status) => format!("{} failed with status {}: {}", step, status, body),
        None => format!("{} failed: {}", step, body),
    }
}

impl AppError {
    /// Upstream error for a response that came back with a non-success status.
    pub fn upstream(step: &'static str, status: u16, body: impl Into<String>) -> Self {
        AppError::Upstream {
            step,
            status: Some(status),
            body: body.into(),
        }
    }

    /// Upstream error without a usable status (transport failure, unreadable body).
    pub fn upstream_unavailable(step: &'static str, detail: impl Into<String>) -> Self {
        AppError::Upstream {
            step,
            status: None,
            body: detail.into(),
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, LogLevel) {
    match err {
        AppError::Configuration { .. } => (500, "CONFIGURATION_ERROR", LogLevel::Error),
        AppError::Upstream { status, .. } => (
            status.filter(|s| (300..=599).contains(s)).unwrap_or(500),
            "UPSTREAM_ERROR",
            LogLevel::Warn,
        ),
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", LogLevel::Debug),
        AppError::OriginNotAllowed(_) => (403, "ORIGIN_NOT_ALLOWED", LogLevel::Warn),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", LogLevel::Error),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}
