//! Configuration module
//!
//! Settings are read once at process start and passed explicitly to the
//! handlers. The upstream credentials are optional: the
//! process starts without them, and every request that needs them checks for
//! their presence through [`Config::aps_settings`].

use std::env;
use std::fmt;

use crate::error::AppError;

pub const DEFAULT_SERVER_PORT: u16 = 8787;
pub const DEFAULT_REGION: &str = "US";
pub const DEFAULT_APS_BASE_URL: &str = "https://developer.api.autodesk.com";

const CLIENT_ID_VAR: &str = "APS_CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "APS_CLIENT_SECRET";
const BUCKET_VAR: &str = "APS_BUCKET";

/// Process configuration.
#[derive(Clone)]
pub struct Config {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Container key, already lower-cased.
    pub bucket_key: Option<String>,
    pub region: String,
    /// Empty means every origin is accepted.
    pub allowed_origins: Vec<String>,
    pub server_port: u16,
    pub aps_base_url: String,
    pub upstream_timeout_secs: Option<u64>,
    pub environment: String,
}

/// The subset of configuration every upstream call chain needs, with all
/// required values present.
#[derive(Clone)]
pub struct ApsSettings {
    pub client_id: String,
    pub client_secret: String,
    pub bucket_key: String,
    pub region: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("bucket_key", &self.bucket_key)
            .field("region", &self.region)
            .field("allowed_origins", &self.allowed_origins)
            .field("server_port", &self.server_port)
            .field("aps_base_url", &self.aps_base_url)
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .field("environment", &self.environment)
            .finish()
    }
}

impl fmt::Debug for ApsSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApsSettings")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("bucket_key", &self.bucket_key)
            .field("region", &self.region)
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let server_port = match non_blank("PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => DEFAULT_SERVER_PORT,
        };

        let upstream_timeout_secs = match non_blank("APS_TIMEOUT_SECS") {
            Some(secs) => Some(
                secs.parse()
                    .map_err(|_| anyhow::anyhow!("APS_TIMEOUT_SECS must be a whole number of seconds"))?,
            ),
            None => None,
        };

        let allowed_origins = non_blank("ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Config {
            client_id: non_blank(CLIENT_ID_VAR),
            client_secret: non_blank(CLIENT_SECRET_VAR),
            bucket_key: non_blank(BUCKET_VAR).map(|key| key.to_lowercase()),
            region: non_blank("APS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            allowed_origins,
            server_port,
            aps_base_url: non_blank("APS_BASE_URL")
                .unwrap_or_else(|| DEFAULT_APS_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            upstream_timeout_secs,
            environment: non_blank("ENVIRONMENT")
                .or_else(|| non_blank("APP_ENV"))
                .unwrap_or_else(|| "development".to_string()),
        })
    }

    /// Required upstream settings, or a configuration error naming every missing one.
    pub fn aps_settings(&self) -> Result<ApsSettings, AppError> {
        let missing: Vec<&'static str> = [
            (CLIENT_ID_VAR, self.client_id.is_none()),
            (CLIENT_SECRET_VAR, self.client_secret.is_none()),
            (BUCKET_VAR, self.bucket_key.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        match (&self.client_id, &self.client_secret, &self.bucket_key) {
            (Some(client_id), Some(client_secret), Some(bucket_key)) => Ok(ApsSettings {
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
                bucket_key: bucket_key.clone(),
                region: self.region.clone(),
            }),
            _ => Err(AppError::Configuration { missing }),
        }
    }

    /// Whether a request declaring `origin` may proceed.
    pub fn origin_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == origin)
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}
