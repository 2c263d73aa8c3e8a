//! zdash-ui - Zotero reading-activity dashboard
//!
//! Serves the dashboard page and its JSON API. Credentials can be entered in
//! the page, or supplied up front (flags, environment or config file) to load
//! the library at startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zdash_common::config::{resolve_config, TomlConfig};
use zdash_common::LibraryType;
use zdash_ui::session::LibrarySnapshot;
use zdash_ui::zotero::{ZoteroClient, ZoteroConfig};
use zdash_ui::{build_router, AppState};

/// Command-line arguments for zdash-ui
#[derive(Parser, Debug)]
#[command(name = "zdash-ui")]
#[command(about = "Zotero reading-activity dashboard")]
#[command(version)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "ZDASH_PORT")]
    port: Option<u16>,

    /// Address to bind to
    #[arg(long, env = "ZDASH_BIND_ADDRESS")]
    bind_address: Option<String>,

    /// Zotero library ID to load at startup
    #[arg(long, env = "ZDASH_LIBRARY_ID")]
    library_id: Option<u64>,

    /// Zotero API key to load at startup
    #[arg(long, env = "ZDASH_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Library type: user or group
    #[arg(long, env = "ZDASH_LIBRARY_TYPE")]
    library_type: Option<LibraryType>,
}

impl Args {
    /// Command-line and environment values override the config file
    fn apply(&self, mut config: TomlConfig) -> TomlConfig {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(bind_address) = &self.bind_address {
            config.bind_address = bind_address.clone();
        }
        if let Some(library_id) = self.library_id {
            config.library_id = Some(library_id);
        }
        if let Some(api_key) = &self.api_key {
            config.api_key = Some(api_key.clone());
        }
        if let Some(library_type) = self.library_type {
            config.library_type = library_type;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.apply(resolve_config(args.config.as_deref()).context("Failed to load configuration")?);

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("zdash_ui={0},zdash_common={0},tower_http={0}", config.logging.level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build identification first, before any network delay
    info!(
        "Starting zdash-ui v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Configuration: {:?}", config);

    let state = AppState::from_config(&config);

    if let Some((library_id, api_key)) = config.credentials() {
        let zotero = ZoteroConfig::new(library_id, api_key)
            .with_library_type(config.library_type)
            .with_base_url(config.zotero_base_url.as_str());
        let client = ZoteroClient::new(zotero).context("Failed to create Zotero client")?;

        match LibrarySnapshot::fetch(&client).await {
            Ok(snapshot) => {
                let status = state.session.replace(snapshot).await;
                info!("✓ Loaded library {} ({} items)", library_id, status.item_count);
            }
            Err(e) => {
                warn!("Could not load library {} at startup: {}", library_id, e);
            }
        }
    } else {
        info!("No credentials configured; waiting for them from the dashboard");
    }

    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.bind_address, config.port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("zdash-ui listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
