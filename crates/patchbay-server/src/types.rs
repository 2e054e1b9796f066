//! Wire types for the delivery API

use patchbay_sync::{PatchAction, PatchEvent, TextPatch};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Optional body of `POST /patch/{path}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatchRequestBody {
    /// Baseline content the caller already holds; triggers fast-forward
    pub initial: Option<String>,
}

/// One delivered event, keyed by its sequence number in [`PatchResponse`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEvent {
    pub action: PatchAction,

    /// Edits for `patch` events, `null` for deletes
    pub patch: Option<TextPatch>,

    /// Wall-clock time the event was recorded, informational only
    pub timestamp_ms: u64,
}

impl From<PatchEvent> for WireEvent {
    fn from(event: PatchEvent) -> Self {
        Self {
            action: event.action,
            patch: event.patch,
            timestamp_ms: event.timestamp_ms,
        }
    }
}

/// Successful body of `POST /patch/{path}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchResponse {
    pub file_name: String,
    pub ext: String,
    pub parts: Vec<String>,

    /// Pending events in ascending sequence order
    pub list: BTreeMap<u64, WireEvent>,
}

/// One entry of `GET /patchList`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchListEntry {
    pub path: String,
    pub file_name: String,
    pub ext: String,
    pub parts: Vec<String>,
}

/// One entry of the `POST /log` console relay
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub message: String,

    /// 0 = print, 1 = info, 2 = warning, 3 = error
    pub message_type: u8,
}
