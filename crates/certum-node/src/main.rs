//! Certum Node: entry point.
//!
//! Starts a certificate registry node with configuration from a TOML file or defaults.

mod api;
mod commands;
mod config;
mod node;
mod state;
mod storage;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::CertumConfig;
use node::CertumNode;

/// Certum Node
#[derive(Parser, Debug)]
#[command(name = "certum-node", version, about = "Certum certificate registry node")]
struct Args {
    /// Path to the configuration file (TOML).
    #[arg(short, long, default_value = "certum.toml")]
    config: PathBuf,

    /// Override the API port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the data directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Override the registry authority (hex Ed25519 public key).
    #[arg(long)]
    authority: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// Generate a default config file and exit.
    #[arg(long)]
    init: bool,
}

fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = if args.init {
        CertumConfig::default()
    } else {
        CertumConfig::load(&args.config)?
    };

    // Apply CLI overrides
    if let Some(api_port) = args.api_port {
        config.api.port = api_port;
    }
    if let Some(ref data_dir) = args.data_dir {
        config.storage.data_dir = data_dir.clone();
    }
    if let Some(ref authority) = args.authority {
        config.registry.authority = Some(authority.clone());
    }
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }

    init_tracing(&config.logging.level, &config.logging.format);

    // Handle --init flag
    if args.init {
        config.save(&args.config)?;
        tracing::info!(path = %args.config.display(), "wrote default config");
        return Ok(());
    }

    tracing::info!("Certum Node v{}", env!("CARGO_PKG_VERSION"));

    // Create and start the node
    let mut node = CertumNode::new(config)?;
    node.start().await?;
    if let Some(addr) = node.api_addr() {
        tracing::info!(authority = %node.authority().to_hex(), api = %addr, "node ready");
    }

    // Set up graceful shutdown on SIGINT/SIGTERM
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
        tracing::info!("received shutdown signal");
    };

    tokio::select! {
        result = node.run() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "node event loop error");
            }
        }
        _ = shutdown => {
            tracing::info!("initiating graceful shutdown");
        }
    }

    node.shutdown().await?;
    tracing::info!("Certum node exited cleanly");
    Ok(())
}
