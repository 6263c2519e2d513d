//! TOML settings for the filter service
//!
//! Tells the binary where filter configs live and how often to re-check
//! them. Missing sections and keys fall back to defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Top-level settings file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceSettings {
    #[serde(default)]
    pub general: GeneralSettings,
    #[serde(default)]
    pub filters: FilterSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralSettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterSettings {
    /// JSON file holding the `FilterConfig` records
    #[serde(default = "default_config_file")]
    pub config_file: String,
    /// Minimum seconds between config store checks
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            config_file: default_config_file(),
            check_interval_secs: default_check_interval(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_config_file() -> String { "config/filters.json".to_string() }
fn default_check_interval() -> u64 { 10 }

impl ServiceSettings {
    /// Load settings from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read settings file: {}", path.as_ref().display()))?;

        let settings: Self = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML settings")?;

        Ok(settings)
    }
}

impl FilterSettings {
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }
}
