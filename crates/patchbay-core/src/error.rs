use thiserror::Error;

/// Core error types used across all patchbay crates
#[derive(Error, Debug, Clone)]
pub enum PatchbayError {
    /// No ledger entry for the requested path
    #[error("Not found: {0}")]
    NotFound(String),

    /// Path escapes the watched root directory
    #[error("Out of bounds: {0}")]
    OutOfBounds(String),

    /// Filesystem read/stat failure
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem watch errors
    #[error("Watch error: {0}")]
    Watch(String),

    /// A patch could not be applied to its baseline
    #[error("Patch apply error: {0}")]
    PatchApply(String),

    /// Serialization/Deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal system error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Standard Result type used across patchbay
pub type PatchbayResult<T> = Result<T, PatchbayError>;

impl From<std::io::Error> for PatchbayError {
    fn from(err: std::io::Error) -> Self {
        PatchbayError::Io(err.to_string())
    }
}
