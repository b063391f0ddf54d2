//! Configuration IO helpers.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dirs_next::{config_dir, home_dir};

use crate::config::{AppConfig, ConfigError, validate_config};

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "AUTOTASK_DEMO_CONFIG";

/// Returns the default path for the demo configuration file.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(path.trim());
    }

    config_dir().unwrap_or_else(|| PathBuf::from(".")).join("autotask").join("demo.json")
}

/// Loads configuration from the default path.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(&default_config_path())
}

/// Loads configuration from a specific path. A missing file yields defaults.
pub fn load_config_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Saves configuration to a specific path, creating parent directories.
pub fn save_config_to_path(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    validate_config(config)?;
    if let Some(parent_directory) = path.parent() {
        fs::create_dir_all(parent_directory)?;
    }

    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
