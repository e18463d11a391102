//! lnops CLI — operations toolkit for an Eclair Lightning node.
//!
//! Subcommands: init, rebalance, audit.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// lnops — circular rebalancing and payment auditing for Eclair.
#[derive(Parser, Debug)]
#[command(name = "lnops", version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (defaults to ~/.lnops/config.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default configuration file.
    Init(commands::init::InitArgs),
    /// Compose (and optionally pay) circular rebalance routes.
    Rebalance(commands::rebalance::RebalanceArgs),
    /// Reconcile payment history into rebalance and relay listings.
    Audit(commands::audit::AuditArgs),
}

fn default_config_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".lnops")
        .join("config.toml")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    match &cli.command {
        Commands::Init(args) => commands::init::run(args, &config_path),
        Commands::Rebalance(args) => commands::rebalance::run(args, &config_path).await,
        Commands::Audit(args) => commands::audit::run(args, &config_path).await,
    }
}
