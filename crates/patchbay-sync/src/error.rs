use patchbay_core::PatchbayError;
use thiserror::Error;

/// Errors from change detection, diffing and the watch pipeline
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Patch apply error: {0}")]
    PatchApply(String),

    #[error("Channel closed: {0}")]
    Channel(String),
}

pub type SyncResult<T> = Result<T, SyncError>;

impl From<SyncError> for PatchbayError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Io(e) => PatchbayError::Io(e.to_string()),
            SyncError::Watch(e) => PatchbayError::Watch(e.to_string()),
            SyncError::PatchApply(msg) => PatchbayError::PatchApply(msg),
            SyncError::Channel(msg) => PatchbayError::Internal(msg),
        }
    }
}
