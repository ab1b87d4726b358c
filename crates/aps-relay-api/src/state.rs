//! Application state shared by every handler.

use aps_relay_client::ApsApi;
use aps_relay_core::Config;
use std::sync::Arc;

/// Immutable per-process state. Nothing here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub aps: Arc<dyn ApsApi>,
}

impl AppState {
    pub fn new(config: Config, aps: Arc<dyn ApsApi>) -> Self {
        Self { config, aps }
    }
}
