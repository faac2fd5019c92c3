//! ChainMuse server - generates narrative nodes, stores them and mints them
//! on the ledger.

use chainmuse_core::{LogFormat, init_tracing};
use chainmuse_server::{AppState, ChainmuseConfig, serve};
use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;

/// Command-line arguments for the server.
#[derive(Parser, Debug)]
#[command(name = "chainmuse-server")]
#[command(about = "ChainMuse server - AI narrative graph on a ledger")]
#[command(version)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "CHAINMUSE_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overriding the configuration
    #[arg(long)]
    bind: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Validate configuration, build the adapters and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(if args.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    });

    info!("Starting ChainMuse server");
    let mut config = ChainmuseConfig::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    let addr = config.server.socket_addr()?;
    info!(
        %addr,
        network = %config.ledger.network,
        events_limit = config.server.events_limit,
        stats_scan_limit = config.server.stats_scan_limit,
        "Configuration loaded"
    );

    let state = AppState::from_config(&config)?;

    if args.check {
        info!("Configuration check complete");
        return Ok(());
    }

    let listener = TcpListener::bind(addr).await?;
    serve(listener, state).await?;
    Ok(())
}
