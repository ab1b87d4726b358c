//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use aps_relay_client::ApsClient;
use aps_relay_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        region = %config.region,
        aps_base_url = %config.aps_base_url,
        allowed_origins = config.allowed_origins.len(),
        "Configuration loaded"
    );
    if let Err(e) = config.aps_settings() {
        // Not fatal: each request reports it until the settings are provided.
        tracing::warn!(error = %e, "Upstream requests will fail until configured");
    }

    let state = build_state(config.clone())?;
    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}

/// Application state backed by the real upstream client.
pub fn build_state(config: Config) -> Result<Arc<AppState>> {
    let aps = ApsClient::from_config(&config).context("Failed to create APS client")?;
    Ok(Arc::new(AppState::new(config, Arc::new(aps))))
}
