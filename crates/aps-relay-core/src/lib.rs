//! APS Relay Core Library
//!
//! This crate provides the configuration and error types shared by the
//! upstream client and the HTTP API.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{ApsSettings, Config};
pub use error::{AppError, ErrorMetadata, LogLevel};
