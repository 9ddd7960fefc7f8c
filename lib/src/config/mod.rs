// lib/src/config/mod.rs

pub mod config_helpers;
pub mod config_structs;

pub use config_helpers::{load_clinic_config, render_clinic_config, save_clinic_config};
pub use config_structs::{ClinicConfig, CliConfig, StorageConfig, StorageEngineType, WorkflowConfig};

pub const DEFAULT_CONFIG_PATH: &str = "clinic.toml";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_HISTORY_FILE: &str = ".clinic_history";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_PASSWORD: &str = "password";

pub const ENV_PREFIX: &str = "CLINIC";
pub const ENV_SEPARATOR: &str = "__";
