//! Remote-canvas client entry point.
//!
//! Loads the page configuration, builds one connection controller per
//! declared surface, and runs them concurrently until Ctrl-C.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_page_config()          -- TOML page file (per-surface attributes)
//!  └─ for each [[surface]]:
//!       SurfaceConfig::from_entry -- silently skips entries without draw_url
//!       SurfaceController::run()  -- own task: connect, forward, paint
//!  └─ ctrl_c                      -- aborts all controllers
//! ```
//!
//! Surfaces are fully independent: each owns its connection, listeners, and
//! reconnect schedule, held in an explicit map keyed by surface id. There
//! is no shared mutable registry.
//!
//! # Host-environment seams
//!
//! This binary wires the in-memory surface, input source, and clipboard.
//! A production build replaces them with windowing-backend implementations
//! of the same traits; only the wiring below changes.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use canvas_client::domain::config::{load_page_config, SurfaceConfig};
use canvas_client::infrastructure::clipboard::MemoryClipboard;
use canvas_client::infrastructure::input_source::ChannelInputSource;
use canvas_client::infrastructure::surface::FramebufferSurface;
use canvas_client::infrastructure::transport::WsConnector;
use canvas_client::SurfaceController;

/// Remote-canvas client: paints host-pushed pixels, forwards local input.
#[derive(Debug, Parser)]
#[command(name = "canvas-client", version)]
struct Cli {
    /// Path to the page configuration file.
    #[arg(long, env = "CANVAS_PAGE_CONFIG", default_value = "page.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    info!("remote-canvas client starting (config: {})", cli.config.display());

    let page = load_page_config(&cli.config)
        .with_context(|| format!("loading page config from {}", cli.config.display()))?;
    let page_url = page.page_url().context("resolving page URL")?;

    let connector = Arc::new(WsConnector::new());
    let mut controllers: HashMap<String, JoinHandle<()>> = HashMap::new();

    for entry in &page.surfaces {
        // A surface without a resolvable draw endpoint is disabled, not an
        // error: no listeners, no connection attempt.
        let Some(config) = SurfaceConfig::from_entry(entry, &page_url) else {
            debug!("surface {:?} has no draw endpoint; skipping", entry.id);
            continue;
        };
        info!(
            "surface {:?}: endpoint {}, mask {:#06x}",
            entry.id, config.endpoint, config.event_mask.0
        );

        let controller = SurfaceController::new(
            config,
            Arc::new(FramebufferSurface::new(entry.width, entry.height)),
            Arc::new(ChannelInputSource::new()),
            Arc::new(MemoryClipboard::new()),
            connector.clone(),
        );
        controllers.insert(entry.id.clone(), tokio::spawn(controller.run()));
    }

    if controllers.is_empty() {
        warn!("no surface with a draw endpoint configured; nothing to do");
        return Ok(());
    }

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    info!("shutdown signal received");

    for (id, handle) in controllers {
        handle.abort();
        debug!("stopped surface {id:?}");
    }

    info!("remote-canvas client stopped");
    Ok(())
}
