//! Shared building blocks for the patchbay live-sync server.
//!
//! This crate provides the error types, path boundary validation and small
//! utilities used by every other patchbay crate.

pub mod error;
pub mod path;

pub use error::{PatchbayError, PatchbayResult};
pub use path::FileAddress;

/// Utility functions for common operations
pub mod utils {
    use std::time::{SystemTime, UNIX_EPOCH};

    /// Get current timestamp in seconds
    pub fn current_timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    /// Get current timestamp in milliseconds
    pub fn current_timestamp_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Logging utilities
pub mod logging {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    /// Initialize logging with default configuration
    pub fn init_logging() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info".into()),
            )
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    /// Initialize logging with custom level
    pub fn init_logging_with_level(level: &str) {
        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(level))
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
