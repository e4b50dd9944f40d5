//! Configuration file management for recalc.
//!
//! Configuration lives in a single TOML file in the user's config directory.
//! Every key has a default, so a partial or empty file still loads.

use crate::paths;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Recorder settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecorderConfig {
    /// Audio device to use. Options:
    /// - "default" for system default device
    /// - numeric index (0, 1, 2, etc.) from `recalc list-devices`
    /// - device name from `recalc list-devices`
    pub device: String,
    /// Requested sample rate in Hz; the device's native rate is used when they differ
    pub sample_rate: u32,
    /// Where the current take is written. Empty means `<data dir>/recording.wav`
    pub recording_file: String,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            device: "default".to_string(),
            sample_rate: 16000,
            recording_file: String::new(),
        }
    }
}

impl RecorderConfig {
    /// Resolves the fixed path every recording session overwrites.
    pub fn recording_path(&self) -> anyhow::Result<PathBuf> {
        resolve_data_file(&self.recording_file, "recording.wav")
    }
}

/// Calculator settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CalculatorConfig {
    /// How long transient messages stay on screen, in milliseconds
    pub toast_millis: u64,
    /// SQLite history database. Empty means `<data dir>/history.db`
    pub history_file: String,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            toast_millis: 1500,
            history_file: String::new(),
        }
    }
}

impl CalculatorConfig {
    pub fn history_path(&self) -> anyhow::Result<PathBuf> {
        resolve_data_file(&self.history_file, "history.db")
    }

    pub fn toast_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.toast_millis)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecalcConfig {
    pub recorder: RecorderConfig,
    pub calculator: CalculatorConfig,
    pub logging: LoggingConfig,
}

impl RecalcConfig {
    /// Loads configuration from `path`. A missing file yields the defaults.
    ///
    /// # Errors
    /// - If the file exists but cannot be read or is malformed
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: RecalcConfig = toml::from_str(&content)
            .with_context(|| format!("Malformed configuration in {}", path.display()))?;
        Ok(config)
    }
}

fn resolve_data_file(configured: &str, default_name: &str) -> anyhow::Result<PathBuf> {
    let configured = configured.trim();
    if configured.is_empty() {
        return Ok(paths::data_dir()?.join(default_name));
    }

    let path = PathBuf::from(configured);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config: RecalcConfig = toml::from_str("").unwrap();
        assert_eq!(config, RecalcConfig::default());
        assert_eq!(config.recorder.device, "default");
        assert_eq!(config.calculator.toast_millis, 1500);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config: RecalcConfig = toml::from_str(
            r#"
            [recorder]
            device = "2"

            [calculator]
            toast_millis = 800
            "#,
        )
        .unwrap();

        assert_eq!(config.recorder.device, "2");
        assert_eq!(config.recorder.sample_rate, 16000);
        assert_eq!(config.calculator.toast_millis, 800);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn written_values_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recalc.toml");

        let mut config = RecalcConfig::default();
        config.recorder.recording_file = "/tmp/take.wav".to_string();
        config.logging.level = "debug".to_string();
        fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        assert_eq!(RecalcConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RecalcConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, RecalcConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recalc.toml");
        fs::write(&path, "[recorder\ndevice = 3").unwrap();
        assert!(RecalcConfig::load_from(&path).is_err());
    }

    #[test]
    fn explicit_data_file_is_used_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("sub").join("history.sqlite");
        let config = CalculatorConfig {
            history_file: target.to_string_lossy().to_string(),
            ..CalculatorConfig::default()
        };

        assert_eq!(config.history_path().unwrap(), target);
        assert!(target.parent().unwrap().exists());
    }
}
