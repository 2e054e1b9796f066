use crate::{ConfigError, ConfigResult, PatchbayConfig};
use std::path::Path;
use tokio::fs;

/// File-based configuration loader
pub struct FileLoader;

impl FileLoader {
    /// Load configuration from a TOML file
    pub async fn load_toml<P: AsRef<Path>>(path: P) -> ConfigResult<PatchbayConfig> {
        let content = fs::read_to_string(path.as_ref())
            .await
            .map_err(ConfigError::Io)?;

        let config: PatchbayConfig = toml::from_str(&content).map_err(ConfigError::Toml)?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub async fn load_json<P: AsRef<Path>>(path: P) -> ConfigResult<PatchbayConfig> {
        let content = fs::read_to_string(path.as_ref())
            .await
            .map_err(ConfigError::Io)?;

        let config: PatchbayConfig = serde_json::from_str(&content).map_err(ConfigError::Json)?;

        config.validate()?;
        Ok(config)
    }

    /// Auto-detect file format and load configuration
    pub async fn load_auto<P: AsRef<Path>>(path: P) -> ConfigResult<PatchbayConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::load_toml(path).await,
            Some("json") => Self::load_json(path).await,
            Some(ext) => Err(ConfigError::InvalidFormat(format!(
                "Unsupported file extension: {}",
                ext
            ))),
            None => {
                // Try TOML first, then JSON
                match Self::load_toml(path).await {
                    Ok(config) => Ok(config),
                    Err(_) => Self::load_json(path).await,
                }
            }
        }
    }
}

/// Apply `PATCHBAY_*` environment variable overrides to a loaded config.
///
/// Recognized: `PATCHBAY_ROOT_DIR`, `PATCHBAY_PORT`, `PATCHBAY_LOG_LEVEL`.
pub fn apply_env_overrides(config: &mut PatchbayConfig) -> ConfigResult<()> {
    if let Ok(root) = std::env::var("PATCHBAY_ROOT_DIR") {
        config.root_directory = root;
    }

    if let Ok(port) = std::env::var("PATCHBAY_PORT") {
        config.server.port = port
            .parse()
            .map_err(|_| ConfigError::Environment(format!("invalid PATCHBAY_PORT: {}", port)))?;
    }

    if let Ok(level) = std::env::var("PATCHBAY_LOG_LEVEL") {
        config.logging.level = level;
    }

    config.validate()?;
    Ok(())
}
