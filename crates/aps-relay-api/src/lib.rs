//! APS Relay API Library
//!
//! This crate provides the HTTP handlers, the origin guard middleware and the
//! application setup for the relay.

pub mod constants;
mod handlers;
mod middleware;
pub mod setup;
mod telemetry;
mod utils;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use handlers::upload_translate::UploadTranslateResponse;
pub use state::AppState;
