//! HTTP delivery API for the patchbay live-sync server.
//!
//! Exposes per-file patch retrieval with consuming-read semantics, a
//! listing of files with pending changes, and an optional console relay
//! for the consumer runtime.

pub mod delivery;
pub mod error;
pub mod routes;
pub mod server;
pub mod types;

pub use delivery::DeliveryService;
pub use error::ServerError;
pub use routes::{create_router, AppState};
pub use server::PatchServer;
pub use types::{LogEntry, PatchListEntry, PatchRequestBody, PatchResponse, WireEvent};
