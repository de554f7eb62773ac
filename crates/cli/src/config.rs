//! Configuration file handling for the Zade CLI
//!
//! The assistant reads `~/.zade/config.toml` unless `--config` names another file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use zade::ZadeConfig;

/// Get the path to the default config file
pub fn default_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".zade")
        .join("config.toml")
}

pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map(Path::to_path_buf).unwrap_or_else(default_path)
}

/// Load configuration from file and environment; a missing file means defaults
pub fn load(path: &Path) -> Result<ZadeConfig> {
    ZadeConfig::load(Some(path))
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Effective configuration as TOML. API keys are never included.
pub fn render(config: &ZadeConfig) -> Result<String> {
    Ok(toml::to_string_pretty(config)?)
}

/// Write the default configuration, refusing to overwrite an existing file
pub fn write_default(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }

    // Ensure directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, render(&ZadeConfig::default())?)?;
    Ok(())
}
