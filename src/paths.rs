//! Filesystem locations used by recalc.
//!
//! Follows the XDG Base Directory Specification where the corresponding
//! variables are set and falls back to the usual dot-directories under `$HOME`.

use anyhow::anyhow;
use std::path::PathBuf;

/// Application directory name used under every base directory.
pub const APP_DIR: &str = "recalc";

fn home_dir() -> anyhow::Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))
}

fn xdg_or_home(var: &str, fallback: &[&str]) -> anyhow::Result<PathBuf> {
    if let Ok(base) = std::env::var(var) {
        if !base.is_empty() {
            return Ok(PathBuf::from(base).join(APP_DIR));
        }
    }

    let mut path = home_dir()?;
    for part in fallback {
        path.push(part);
    }
    Ok(path.join(APP_DIR))
}

/// Directory holding `recalc.toml`. Not created by this function.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    xdg_or_home("XDG_CONFIG_HOME", &[".config"])
}

/// Path of the main configuration file.
pub fn config_file() -> anyhow::Result<PathBuf> {
    Ok(config_dir()?.join("recalc.toml"))
}

/// Directory for the recording and the history database, created on demand.
pub fn data_dir() -> anyhow::Result<PathBuf> {
    let dir = xdg_or_home("XDG_DATA_HOME", &[".local", "share"])?;
    std::fs::create_dir_all(&dir)
        .map_err(|e| anyhow!("Failed to create data directory {}: {e}", dir.display()))?;
    Ok(dir)
}

/// Directory for rotated log files. Not created by this function.
pub fn log_dir() -> anyhow::Result<PathBuf> {
    xdg_or_home("XDG_STATE_HOME", &[".local", "state"])
}
