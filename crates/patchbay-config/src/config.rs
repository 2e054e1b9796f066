//! Configuration structures for the patchbay server

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level patchbay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchbayConfig {
    /// Directory to watch, relative to the working directory
    pub root_directory: String,

    /// HTTP server configuration
    pub server: ServerConfig,

    /// Filesystem watch configuration
    pub watch: WatchConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for PatchbayConfig {
    fn default() -> Self {
        Self {
            root_directory: "game".to_string(),
            server: ServerConfig::default(),
            watch: WatchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind the server to
    pub host: String,

    /// Port to bind the server to
    pub port: u16,

    /// Enable permissive CORS on all routes
    pub cors_enabled: bool,

    /// Enable the `/log` console relay endpoint
    pub log_relay_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors_enabled: true,
            log_relay_enabled: true,
        }
    }
}

/// Filesystem watch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Skip dot-prefixed files and directories
    pub ignore_hidden: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            ignore_hidden: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum log level: trace, debug, info, warn, error
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl PatchbayConfig {
    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.root_directory.is_empty() {
            return Err(ConfigError::Validation(
                "root_directory cannot be empty".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::Validation("port cannot be 0".to_string()));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "unknown log level: {}",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Get the bind address as a string
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Resolve the watched directory against a working directory
    pub fn watched_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.root_directory)
    }
}
