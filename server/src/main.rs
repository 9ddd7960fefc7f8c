// server/src/main.rs

// Entry point for the `clinic` console.

use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use log::info;

use clinic_server::cli::{load_effective_config, start_cli, CliArgs};

fn main() -> Result<()> {
    let args = CliArgs::parse();
    let config = load_effective_config(&args)?;

    Builder::from_env(Env::default().default_filter_or(config.log_level.as_str())).init();
    info!("clinic {} starting", env!("CARGO_PKG_VERSION"));

    start_cli(args, config)
}
