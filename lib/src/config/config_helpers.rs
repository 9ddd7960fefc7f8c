// lib/src/config/config_helpers.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ::config::{Config, Environment, File, FileFormat};
use log::{debug, info, warn};

use crate::config::{ClinicConfig, DEFAULT_CONFIG_PATH, ENV_PREFIX, ENV_SEPARATOR};

/// Loads the effective configuration: defaults, then the TOML file, then
/// `CLINIC__*` environment variables.
///
/// An explicit `config_file_path` must exist. Without one, `clinic.toml` in
/// the working directory is used when present.
pub fn load_clinic_config(config_file_path: Option<&Path>) -> Result<ClinicConfig> {
    build_clinic_config(config_file_path, ENV_PREFIX)
}

pub(crate) fn build_clinic_config(config_file_path: Option<&Path>, env_prefix: &str) -> Result<ClinicConfig> {
    let (path_to_use, required) = match config_file_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    };

    if path_to_use.exists() {
        info!("Loading clinic config from {}", path_to_use.display());
    } else if required {
        anyhow::bail!("Config file not found at {}", path_to_use.display());
    } else {
        debug!("No config file at {}, using defaults", path_to_use.display());
    }

    let config = Config::builder()
        .add_source(
            File::from(path_to_use.as_path())
                .format(FileFormat::Toml)
                .required(required),
        )
        .add_source(Environment::with_prefix(env_prefix).separator(ENV_SEPARATOR))
        .build()
        .context(format!("Failed to load configuration from {}", path_to_use.display()))?;

    let clinic_config: ClinicConfig = config
        .try_deserialize()
        .context("Failed to deserialize clinic configuration")?;
    debug!("Effective clinic config: {:?}", clinic_config);
    Ok(clinic_config)
}

pub fn render_clinic_config(config: &ClinicConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize ClinicConfig to TOML")
}

pub fn save_clinic_config(config: &ClinicConfig, path: &Path) -> Result<()> {
    let toml_string = render_clinic_config(config)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .context(format!("Failed to create parent directories for {}", path.display()))?;
    }
    if path.exists() {
        warn!("Overwriting existing config file {}", path.display());
    }
    fs::write(path, toml_string).context(format!("Failed to write ClinicConfig to file: {}", path.display()))?;
    info!("Saved clinic config to {}", path.display());
    Ok(())
}
