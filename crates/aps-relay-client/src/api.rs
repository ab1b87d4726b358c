//! Domain methods for the APS client.
//!
//! Wire types for each upstream call are defined here, next to the
//! [`ApsApi`] implementation that sends them.

use crate::object_name::object_name;
use crate::{json_or_error, send, upstream_error, ApsApi, ApsClient};
use aps_relay_core::{ApsSettings, AppError};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use urlencoding::encode;

const TOKEN_PATH: &str = "/authentication/v2/token";
const BUCKETS_PATH: &str = "/oss/v2/buckets";
const DESIGN_DATA_PATH: &str = "/modelderivative/v2/designdata";

pub(crate) const TOKEN_SCOPE: &str = "data:read data:write data:create bucket:create bucket:read";
const BUCKET_POLICY_KEY: &str = "persistent";
const REGION_HEADER: &str = "x-ads-region";
const DERIVATIVE_FORMAT: &str = "svf2";
const DERIVATIVE_VIEWS: [&str; 2] = ["2d", "3d"];

const STEP_TOKEN: &str = "Token request";
const STEP_BUCKET_DETAILS: &str = "Bucket lookup";
const STEP_BUCKET_CREATE: &str = "Bucket creation";
const STEP_UPLOAD: &str = "Upload";
const STEP_TRANSLATION: &str = "Translation job submission";
const STEP_MANIFEST: &str = "Manifest request";

/// Token bundle as issued upstream. Fields beyond the known ones are kept and
/// serialized back unchanged.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenBundle {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl fmt::Debug for TokenBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenBundle")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// A file received from the client, held in memory.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub data: Bytes,
}

/// Upstream manifest response, relayed without interpretation.
#[derive(Debug, Clone)]
pub struct ManifestResponse {
    pub status: u16,
    pub body: Bytes,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBucketRequest<'a> {
    bucket_key: &'a str,
    policy_key: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectDetails {
    object_id: String,
}

#[derive(Debug, Serialize)]
struct TranslationJob<'a> {
    input: JobInput<'a>,
    output: JobOutput,
}

#[derive(Debug, Serialize)]
struct JobInput<'a> {
    urn: &'a str,
}

#[derive(Debug, Serialize)]
struct JobOutput {
    formats: Vec<OutputFormat>,
}

#[derive(Debug, Serialize)]
struct OutputFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    views: Vec<&'static str>,
}

impl<'a> TranslationJob<'a> {
    fn for_urn(urn: &'a str) -> Self {
        Self {
            input: JobInput { urn },
            output: JobOutput {
                formats: vec![OutputFormat {
                    kind: DERIVATIVE_FORMAT,
                    views: DERIVATIVE_VIEWS.to_vec(),
                }],
            },
        }
    }
}

impl ApsClient {
    async fn create_bucket(&self, token: &str, settings: &ApsSettings) -> Result<(), AppError> {
        let request = self
            .client()
            .post(self.build_url(BUCKETS_PATH))
            .bearer_auth(token)
            .header(REGION_HEADER, settings.region.as_str())
            .json(&CreateBucketRequest {
                bucket_key: &settings.bucket_key,
                policy_key: BUCKET_POLICY_KEY,
            });
        let response = send(STEP_BUCKET_CREATE, request).await?;

        let status = response.status();
        // 409: a concurrent request created it between our lookup and this call.
        if status.is_success() || status == StatusCode::CONFLICT {
            tracing::info!(
                bucket_key = %settings.bucket_key,
                region = %settings.region,
                "Bucket created"
            );
            return Ok(());
        }

        Err(upstream_error(STEP_BUCKET_CREATE, response).await)
    }
}

#[async_trait]
impl ApsApi for ApsClient {
    async fn get_access_token(&self, settings: &ApsSettings) -> Result<TokenBundle, AppError> {
        let request = self.client().post(self.build_url(TOKEN_PATH)).form(&[
            ("client_id", settings.client_id.as_str()),
            ("client_secret", settings.client_secret.as_str()),
            ("grant_type", "client_credentials"),
            ("scope", TOKEN_SCOPE),
        ]);
        let response = send(STEP_TOKEN, request).await?;
        let token: TokenBundle = json_or_error(STEP_TOKEN, response).await?;

        tracing::debug!(expires_in = ?token.expires_in, "Access token issued");
        Ok(token)
    }

    async fn ensure_bucket(&self, token: &str, settings: &ApsSettings) -> Result<(), AppError> {
        let url = self.build_url(&format!(
            "{}/{}/details",
            BUCKETS_PATH,
            encode(&settings.bucket_key)
        ));
        let response = send(STEP_BUCKET_DETAILS, self.client().get(url).bearer_auth(token)).await?;

        match response.status() {
            StatusCode::OK => {
                tracing::debug!(bucket_key = %settings.bucket_key, "Bucket already exists");
                Ok(())
            }
            StatusCode::NOT_FOUND => self.create_bucket(token, settings).await,
            _ => Err(upstream_error(STEP_BUCKET_DETAILS, response).await),
        }
    }

    async fn upload_to_bucket(
        &self,
        token: &str,
        bucket_key: &str,
        file: FileUpload,
    ) -> Result<String, AppError> {
        let name = object_name(&file.filename, Utc::now());
        let size = file.data.len();
        let url = self.build_url(&format!(
            "{}/{}/objects/{}",
            BUCKETS_PATH,
            encode(bucket_key),
            encode(&name)
        ));

        let request = self
            .client()
            .put(url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(file.data);
        let response = send(STEP_UPLOAD, request).await?;
        let details: ObjectDetails = json_or_error(STEP_UPLOAD, response).await?;

        tracing::info!(
            object_name = %name,
            size_bytes = size,
            "File uploaded to bucket"
        );
        Ok(details.object_id)
    }

    async fn start_translation(&self, token: &str, urn: &str) -> Result<(), AppError> {
        let url = self.build_url(&format!("{}/job", DESIGN_DATA_PATH));
        let request = self
            .client()
            .post(url)
            .bearer_auth(token)
            .json(&TranslationJob::for_urn(urn));
        let response = send(STEP_TRANSLATION, request).await?;

        if !response.status().is_success() {
            return Err(upstream_error(STEP_TRANSLATION, response).await);
        }

        tracing::info!(urn = %urn, "Translation job submitted");
        Ok(())
    }

    async fn get_manifest(&self, token: &str, urn: &str) -> Result<ManifestResponse, AppError> {
        let url = self.build_url(&format!("{}/{}/manifest", DESIGN_DATA_PATH, encode(urn)));
        let response = send(STEP_MANIFEST, self.client().get(url).bearer_auth(token)).await?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::upstream_unavailable(STEP_MANIFEST, e.to_string()))?;

        Ok(ManifestResponse { status, body })
    }
}
