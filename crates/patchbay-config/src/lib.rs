//! Patchbay configuration management
//!
//! This crate provides configuration loading, environment overrides and
//! validation for the patchbay server.

pub mod config;
pub mod error;
pub mod loader;

// Re-exports for convenience
pub use config::{LoggingConfig, PatchbayConfig, ServerConfig, WatchConfig};
pub use error::{ConfigError, ConfigResult};
pub use loader::{apply_env_overrides, FileLoader};
