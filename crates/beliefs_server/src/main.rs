//! `beliefs-server` entry point.

use anyhow::{Context, Result};
use beliefs_core::init_logging;
use beliefs_server::ServerConfig;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "beliefs-server", version, about = "Serve the beliefs log over HTTP")]
struct Cli {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen address, overrides config and environment.
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// SQLite database file, overrides config and environment.
    #[arg(long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config =
        ServerConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(bind) = cli.bind {
        config.bind_addr = bind;
    }
    if let Some(database) = cli.database {
        config.database_path = database;
    }

    init_logging(&config.log_level, config.log_dir.as_deref())
        .map_err(anyhow::Error::msg)
        .context("failed to initialize logging")?;

    beliefs_server::run(config).await
}
