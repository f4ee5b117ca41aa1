pub mod schema;

pub use schema::{Credentials, DeepselfConfig, DEFAULT_BASE_URL};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Default config path (~/.deepself/deepself.toml).
pub fn default_config_path() -> PathBuf {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().join(".deepself"))
        .unwrap_or_else(|| PathBuf::from(".deepself"))
        .join("deepself.toml")
}

/// Expand a leading `~` in a user-supplied path.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Load config from the given path, or return defaults.
pub fn load_config(path: &Path) -> Result<DeepselfConfig> {
    if path.exists() {
        let contents =
            std::fs::read_to_string(path).context("Failed to read deepself config file")?;
        let config: DeepselfConfig =
            toml::from_str(&contents).context("Failed to parse deepself config (TOML)")?;
        Ok(config)
    } else {
        Ok(DeepselfConfig::default())
    }
}

/// Save config to the given path (TOML format).
pub fn save_config(config: &DeepselfConfig, path: &Path) -> Result<()> {
    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents).context("Failed to write config file")?;
    Ok(())
}
