//! Error types for the delivery API

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use patchbay_core::PatchbayError;
use thiserror::Error;

/// Delivery API errors, surfaced to callers as structured JSON responses
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Patch not found for file path: {0}")]
    PatchNotFound(String),

    #[error("{0} is not within the root directory")]
    OutOfBounds(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ServerError> for PatchbayError {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::PatchNotFound(path) => PatchbayError::NotFound(path),
            ServerError::OutOfBounds(path) => PatchbayError::OutOfBounds(path),
            ServerError::Io(msg) => PatchbayError::Io(msg),
            ServerError::Network(msg) => PatchbayError::Internal(msg),
            ServerError::Internal(msg) => PatchbayError::Internal(msg),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::PatchNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::OutOfBounds(_)
            | ServerError::Io(_)
            | ServerError::Network(_)
            | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
