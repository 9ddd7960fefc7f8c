// server/src/cli/cli.rs

// Top-level argument parsing and dispatch for the `clinic` binary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Days, Local};
use clap::Parser;
use log::{info, warn};

use clinic_lib::commands::{parse_storage_engine, Commands, ConfigAction, ReportAction};
use clinic_lib::config::{
    load_clinic_config, render_clinic_config, save_clinic_config, ClinicConfig, DEFAULT_CONFIG_PATH,
};
use clinic_lib::storage_engine::seed::seed_storage;
use clinic_lib::{create_storage, StorageEngineType};
use medical_knowledge::ClinicWorkflow;

use crate::cli::handlers_utils::render_medications;
use crate::cli::interactive::run_cli_interactive;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Hospital management console", long_about = None)]
#[clap(propagate_version = true)]
pub struct CliArgs {
    /// Path to the TOML configuration file
    #[clap(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Directory holding the CSV data files
    #[clap(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
    /// Storage engine: csv or in-memory
    #[clap(long, value_parser = parse_storage_engine)]
    pub storage: Option<StorageEngineType>,
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

/// Loads the configuration and applies command-line overrides on top.
pub fn load_effective_config(args: &CliArgs) -> Result<ClinicConfig> {
    let mut config = load_clinic_config(args.config.as_deref())?;
    if let Some(data_dir) = &args.data_dir {
        config.storage.data_dir = data_dir.clone();
    }
    if let Some(engine) = args.storage {
        config.storage.engine = engine;
    }
    Ok(config)
}

fn run_report(config: &ClinicConfig, action: ReportAction) -> Result<String> {
    let storage = create_storage(&config.storage);
    let store = storage.load().context("Failed to load clinic data")?;
    let workflow = ClinicWorkflow::new(store, config.workflow.slot_release_policy);
    Ok(match action {
        ReportAction::Inventory => {
            let medications: Vec<_> = workflow.medications().iter().collect();
            render_medications(&medications)
        }
        ReportAction::LowStock => render_medications(&workflow.low_stock_medications()),
    })
}

pub fn start_cli(args: CliArgs, config: ClinicConfig) -> Result<()> {
    match args.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => {
            info!(
                "Starting interactive console on {} storage at {}",
                config.storage.engine,
                config.storage.data_dir.display()
            );
            run_cli_interactive(&config, create_storage(&config.storage))
        }
        Commands::Seed { force } => {
            if config.storage.engine == StorageEngineType::InMemory {
                warn!("Seeding in-memory storage; the data is lost when this command exits");
            }
            let today = Local::now().date_naive();
            let first_day = today.checked_add_days(Days::new(1)).unwrap_or(today);
            let storage = create_storage(&config.storage);
            if seed_storage(storage.as_ref(), &config.cli.default_password, first_day, force)? {
                println!(
                    "Seeded sample clinic into {}. Every account starts with the default password.",
                    config.storage.data_dir.display()
                );
            } else {
                println!("Data already present in {}; use --force to overwrite.", config.storage.data_dir.display());
            }
            Ok(())
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("{}", render_clinic_config(&config)?);
                Ok(())
            }
            ConfigAction::Save { path } => {
                let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
                save_clinic_config(&config, &path)?;
                println!("Configuration saved to {}", path.display());
                Ok(())
            }
        },
        Commands::Report { action } => {
            println!("{}", run_report(&config, action)?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_lib::storage_engine::seed::sample_store;
    use chrono::NaiveDate;

    fn csv_config(dir: &std::path::Path) -> ClinicConfig {
        let mut config = ClinicConfig::default();
        config.storage.engine = StorageEngineType::Csv;
        config.storage.data_dir = dir.to_path_buf();
        config
    }

    #[test]
    fn command_line_overrides_config() {
        let args = CliArgs::parse_from(["clinic", "--data-dir", "/tmp/clinic-data", "--storage", "in-memory", "seed"]);
        assert_eq!(args.command, Some(Commands::Seed { force: false }));
        let config = load_effective_config(&args).unwrap();
        assert_eq!(config.storage.engine, StorageEngineType::InMemory);
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/clinic-data"));
    }

    #[test]
    fn low_stock_report_reads_saved_data() {
        let dir = tempfile::tempdir().unwrap();
        let config = csv_config(dir.path());
        let store = sample_store("password", NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()).unwrap();
        create_storage(&config.storage).save(&store).unwrap();

        let report = run_report(&config, ReportAction::LowStock).unwrap();
        assert!(report.contains("Salbutamol"));
        assert!(!report.contains("Paracetamol"));
    }
}
