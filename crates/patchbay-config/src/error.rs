use patchbay_core::PatchbayError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Environment error: {0}")]
    Environment(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for PatchbayError {
    fn from(err: ConfigError) -> Self {
        PatchbayError::Config(err.to_string())
    }
}
