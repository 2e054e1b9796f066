//! Route construction and HTTP handlers for the delivery API

use crate::delivery::DeliveryService;
use crate::error::ServerError;
use crate::types::{LogEntry, PatchListEntry, PatchRequestBody, PatchResponse};
use axum::extract::{Path as UrlPath, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use patchbay_config::ServerConfig;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state available to every handler
#[derive(Clone)]
pub struct AppState {
    pub delivery: DeliveryService,
}

/// Build the application router.
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let mut app = Router::new()
        .route("/patch/*path", post(post_patch))
        .route("/patchList", get(get_patch_list));

    if config.log_relay_enabled {
        app = app.route("/log", post(post_log));
    }

    let mut app = app.with_state(state);

    if config.cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app.layer(TraceLayer::new_for_http())
}

/// `POST /patch/{path}`: consume the pending events for one file, or
/// fast-forward from a supplied baseline.
async fn post_patch(
    State(state): State<AppState>,
    UrlPath(path): UrlPath<String>,
    body: Option<Json<PatchRequestBody>>,
) -> Result<Json<PatchResponse>, ServerError> {
    let initial = body.and_then(|Json(b)| b.initial);
    let response = state.delivery.patch_for(&path, initial).await?;
    Ok(Json(response))
}

/// `GET /patchList`: every file with a pending ledger entry.
async fn get_patch_list(State(state): State<AppState>) -> Json<Vec<PatchListEntry>> {
    Json(state.delivery.patch_list().await)
}

/// `POST /log`: relay console output from the consumer runtime.
async fn post_log(Json(entries): Json<Vec<LogEntry>>) -> StatusCode {
    for entry in entries {
        match entry.message_type {
            0 | 1 => tracing::info!(target: "patchbay::client", "{}", entry.message),
            2 => tracing::warn!(target: "patchbay::client", "{}", entry.message),
            3 => tracing::error!(target: "patchbay::client", "{}", entry.message),
            other => {
                tracing::debug!(target: "patchbay::client", kind = other, "{}", entry.message)
            }
        }
    }

    StatusCode::OK
}
