//! HTTP client for the Autodesk Platform Services (APS) APIs the relay drives.
//!
//! Every upstream call is one typed request/response pair exposed through the
//! [`ApsApi`] trait: token issue, bucket ensure, object upload, translation job
//! start and manifest fetch. Non-success responses become
//! [`AppError::Upstream`] carrying the upstream status and body text.

pub mod api;
pub mod object_name;

use anyhow::{Context, Result};
use aps_relay_core::{ApsSettings, AppError, Config};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub use api::{FileUpload, ManifestResponse, TokenBundle};
pub use object_name::{object_name, resource_locator, sanitize_filename};

/// The upstream operations a relay request chain is composed from.
#[async_trait]
pub trait ApsApi: Send + Sync {
    /// Exchange the client credentials for a bearer token. Never cached.
    async fn get_access_token(&self, settings: &ApsSettings) -> Result<TokenBundle, AppError>;

    /// Make sure the configured bucket exists, creating it when the details lookup says 404.
    async fn ensure_bucket(&self, token: &str, settings: &ApsSettings) -> Result<(), AppError>;

    /// Upload a file under a timestamp-prefixed sanitized name; returns the upstream object id.
    async fn upload_to_bucket(
        &self,
        token: &str,
        bucket_key: &str,
        file: FileUpload,
    ) -> Result<String, AppError>;

    /// Submit a translation job for `urn`. Does not wait for the job.
    async fn start_translation(&self, token: &str, urn: &str) -> Result<(), AppError>;

    /// Fetch the job manifest for `urn`, whatever status upstream answers with.
    async fn get_manifest(&self, token: &str, urn: &str) -> Result<ManifestResponse, AppError>;
}

/// reqwest-backed [`ApsApi`] implementation.
#[derive(Clone, Debug)]
pub struct ApsClient {
    client: Client,
    base_url: String,
}

impl ApsClient {
    /// `timeout` of `None` leaves the transport defaults in place.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.aps_base_url,
            config.upstream_timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }
}

/// Send a request, mapping transport failures to an upstream error for `step`.
pub(crate) async fn send(
    step: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<reqwest::Response, AppError> {
    request
        .send()
        .await
        .map_err(|e| AppError::upstream_unavailable(step, e.to_string()))
}

/// Turn a non-success response into an upstream error carrying its status and body.
pub(crate) async fn upstream_error(step: &'static str, response: reqwest::Response) -> AppError {
    let status = response.status().as_u16();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    AppError::upstream(step, status, error_text)
}

/// Require a success status, then deserialize the JSON body.
pub(crate) async fn json_or_error<T: DeserializeOwned>(
    step: &'static str,
    response: reqwest::Response,
) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        return Err(upstream_error(step, response).await);
    }

    let text = response
        .text()
        .await
        .map_err(|e| AppError::upstream_unavailable(step, e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| {
        AppError::upstream(
            step,
            status.as_u16(),
            format!("unexpected response body ({}): {}", e, text),
        )
    })
}
