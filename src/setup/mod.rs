//! First-run setup.
//!
//! Writes the embedded default configuration when no config file exists yet,
//! so `recalc config` always has something to open.

use std::path::Path;

/// Embedded default configuration template.
const DEFAULT_CONFIG: &str = include_str!("../../environments/recalc.toml");

/// Writes the default config to `config_path` unless a file is already there.
///
/// Returns `true` when a new file was written.
///
/// # Errors
/// Returns an error if the directory or file cannot be created.
pub fn ensure_config(config_path: &Path) -> anyhow::Result<bool> {
    if config_path.exists() {
        tracing::debug!("Config present at {}", config_path.display());
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(config_path, DEFAULT_CONFIG)?;

    tracing::info!("Default configuration written to {}", config_path.display());
    Ok(true)
}
