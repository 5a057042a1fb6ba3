mod config;
mod data;
mod error;
mod net;
mod registry;
mod storage;
use clap::Parser;
use config::ServerConfig;
use error::UltmaError;
use net::UltmaServer;
use registry::MatchRegistry;
use std::path::PathBuf;
use std::sync::Arc;
use storage::MatchStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(version, about)]
struct Cli {
    /// Config file to use instead of the per-user default
    #[clap(short, long)]
    config: Option<PathBuf>,
    #[clap(long)]
    host: Option<String>,
    #[clap(short, long)]
    port: Option<u16>,
    /// Seed every match RNG for reproducible games
    #[clap(long)]
    seed: Option<u64>,
    /// Log filter, e.g. "debug" or "ultma=trace"; RUST_LOG is used when absent
    #[clap(long)]
    log: Option<String>,
    #[clap(long)]
    no_persist: bool,
    /// Write the effective config file and exit
    #[clap(long)]
    write_config: bool,
}

fn setup_logging(filter: Option<&str>) -> Result<(), UltmaError> {
    let filter = match filter {
        Some(filter) => EnvFilter::try_new(filter)?,
        None => EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn match_store(config: &ServerConfig, no_persist: bool) -> Option<MatchStore> {
    if no_persist || !config.storage.enabled {
        return None;
    }
    config
        .storage
        .path
        .clone()
        .or_else(MatchStore::default_path)
        .map(MatchStore::new)
}

#[tokio::main]
async fn main() -> Result<(), UltmaError> {
    let args = Cli::parse();
    setup_logging(args.log.as_deref())?;

    let mut config = ServerConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.seed.is_some() {
        config.rules.seed = args.seed;
    }
    if args.write_config {
        let path = config.save(args.config.as_deref())?;
        info!(path = %path.display(), "config written");
        return Ok(());
    }

    let store = match_store(&config, args.no_persist);
    let registry = Arc::new(MatchRegistry::new(config.rules.clone(), store));
    if let Err(err) = registry.restore() {
        warn!(error = %err, "ignoring unreadable persisted match");
    }

    let server = UltmaServer::new(&config.server, registry).await?;
    info!(addr = %server.local_addr(), version = env!("CARGO_PKG_VERSION"), "UltMA server ready");
    tokio::signal::ctrl_c().await?;
    server.shutdown().await?;
    Ok(())
}
