// lib/src/config/config_structs.rs

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use models::{SlotReleasePolicy, ValidationError};

use crate::config::{
    DEFAULT_DATA_DIR, DEFAULT_HISTORY_FILE, DEFAULT_LOG_LEVEL, DEFAULT_PASSWORD,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageEngineType {
    #[default]
    Csv,
    InMemory,
}

impl fmt::Display for StorageEngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageEngineType::Csv => write!(f, "csv"),
            StorageEngineType::InMemory => write!(f, "in_memory"),
        }
    }
}

impl FromStr for StorageEngineType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "csv" => Ok(StorageEngineType::Csv),
            "in_memory" | "inmemory" | "memory" => Ok(StorageEngineType::InMemory),
            _ => Err(ValidationError::unknown_variant("storage engine", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub engine: StorageEngineType,
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            engine: StorageEngineType::default(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Slot status after a patient cancels: `remove` or `release`.
    pub slot_release_policy: SlotReleasePolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub history_file: PathBuf,
    /// Accounts still using this password must change it at login.
    pub default_password: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            history_file: PathBuf::from(DEFAULT_HISTORY_FILE),
            default_password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicConfig {
    pub log_level: String,
    pub storage: StorageConfig,
    pub workflow: WorkflowConfig,
    pub cli: CliConfig,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        ClinicConfig {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            storage: StorageConfig::default(),
            workflow: WorkflowConfig::default(),
            cli: CliConfig::default(),
        }
    }
}
