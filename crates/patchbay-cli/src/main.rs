//! patchbay server binary: wires the watcher, change detector and delivery
//! API together.

use anyhow::Context;
use clap::Parser;
use patchbay_config::{apply_env_overrides, FileLoader, PatchbayConfig};
use patchbay_server::PatchServer;
use patchbay_sync::{ChangeDetector, FsWatcher, PatchLedger, SnapshotStore};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Parser)]
#[command(name = "patchbay")]
#[command(about = "Watches a source tree and serves text patches to live-reload consumers")]
struct Cli {
    /// Path to a patchbay.toml or patchbay.json configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the watched root directory
    #[arg(long)]
    root: Option<String>,

    /// Override the listening port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => FileLoader::load_auto(path)
            .await
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => PatchbayConfig::default(),
    };

    apply_env_overrides(&mut config)?;

    if let Some(root) = cli.root {
        config.root_directory = root;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate()?;

    patchbay_core::logging::init_logging_with_level(&config.logging.level);

    let cwd = std::env::current_dir().context("resolving working directory")?;
    let watched_dir = config.watched_dir(&cwd);
    if !watched_dir.is_dir() {
        anyhow::bail!(
            "watched directory {} does not exist",
            watched_dir.display()
        );
    }

    let snapshots = Arc::new(RwLock::new(SnapshotStore::new()));
    let ledger = Arc::new(RwLock::new(PatchLedger::new()));

    let detector = ChangeDetector::new(
        watched_dir.clone(),
        Arc::clone(&snapshots),
        Arc::clone(&ledger),
    );
    let tracked = detector.seed_existing().await?;
    tracing::info!(
        "watching {} ({} files tracked)",
        watched_dir.display(),
        tracked
    );

    let (mut watcher, events) = FsWatcher::new(watched_dir.clone(), config.watch.ignore_hidden)?;
    watcher.watch()?;
    tokio::spawn(detector.run(events));

    PatchServer::new(config, watched_dir, ledger).start().await?;

    Ok(())
}
