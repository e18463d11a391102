//! `lnops init` — Write a default configuration file.

use clap::Args;
use std::path::Path;

use lnops_core::config::LnopsConfig;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Address (host:port) of the node's REST API.
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub api_url: String,

    /// Password for the REST API (the user is always "eclair-cli").
    #[arg(long, default_value = "")]
    pub api_password: String,

    /// Overwrite an existing configuration file.
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InitArgs, config_path: &Path) -> anyhow::Result<()> {
    if config_path.exists() && !args.force {
        anyhow::bail!(
            "configuration file already exists at {} (use --force to overwrite)",
            config_path.display()
        );
    }

    let config = LnopsConfig {
        api_url: args.api_url.clone(),
        api_password: args.api_password.clone(),
        ..LnopsConfig::default()
    };
    config.store(config_path)?;

    println!("Wrote {}", config_path.display());
    println!("Edit it to set the API password, then run 'lnops audit' to verify connectivity.");

    Ok(())
}
