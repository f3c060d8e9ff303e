//! Configuration loading for the Wireloom CLI.
//!
//! The configuration file is TOML. An explicit `--config` path must exist;
//! otherwise the platform config directory is probed and silently skipped
//! when no file is present.

use std::{fs, path::PathBuf};

use directories::ProjectDirs;
use log::{debug, info};

use wireloom::{WireloomError, config::AppConfig};

/// Loads the application configuration.
///
/// # Errors
///
/// Returns `WireloomError` when an explicitly requested file cannot be
/// read or when a config file fails to parse.
pub fn load_config(path: Option<&String>) -> Result<AppConfig, WireloomError> {
    let path = match path {
        Some(path) => PathBuf::from(path),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => {
                debug!("No configuration file found, using defaults");
                return Ok(AppConfig::default());
            }
        },
    };

    info!(config_path = path.display().to_string(); "Loading configuration");

    let text = fs::read_to_string(&path)?;
    toml::from_str(&text)
        .map_err(|err| WireloomError::Config(format!("{}: {err}", path.display())))
}

/// The per-user configuration file location, when the platform provides
/// a config directory.
fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "wireloom").map(|dirs| dirs.config_dir().join("wireloom.toml"))
}
