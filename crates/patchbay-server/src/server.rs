//! Main delivery server implementation

use crate::delivery::DeliveryService;
use crate::error::ServerError;
use crate::routes::{create_router, AppState};
use patchbay_config::PatchbayConfig;
use patchbay_sync::PatchLedger;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

/// HTTP server exposing the patch delivery API
pub struct PatchServer {
    config: PatchbayConfig,
    state: AppState,
}

impl PatchServer {
    /// Create a new server over the shared ledger.
    ///
    /// `root` is the absolute watched directory; every served path must
    /// resolve inside it.
    pub fn new(config: PatchbayConfig, root: PathBuf, ledger: Arc<RwLock<PatchLedger>>) -> Self {
        let delivery = DeliveryService::new(root, ledger);

        Self {
            config,
            state: AppState { delivery },
        }
    }

    /// Bind and serve until the process exits.
    pub async fn start(self) -> Result<(), ServerError> {
        let bind_addr: SocketAddr = self
            .config
            .bind_address()
            .parse()
            .map_err(|e| ServerError::Network(format!("invalid bind address: {}", e)))?;

        let app = create_router(self.state, &self.config.server);

        let listener = TcpListener::bind(bind_addr)
            .await
            .map_err(|e| ServerError::Network(format!("failed to bind to {}: {}", bind_addr, e)))?;

        tracing::info!("delivery API listening on {}", bind_addr);

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Network(format!("server error: {}", e)))?;

        Ok(())
    }
}
