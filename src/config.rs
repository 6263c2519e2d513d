//! Filter configuration records and where they come from
//!
//! A `FilterConfig` is a versioned record owned by an external store. The
//! filters only read it; `last_modified` is a version marker, never a clock.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Name under which the account filter config is stored
pub const ACCOUNT_FILTER_NAME: &str = "account";
/// Name under which the asset filter config is stored
pub const ASSET_FILTER_NAME: &str = "asset";

/// Versioned filter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub name: String,
    /// Encoded rules payload (JSON)
    pub rules: String,
    pub enabled: bool,
    pub last_modified: i64,
}

impl FilterConfig {
    pub fn new(name: &str, rules: &str, enabled: bool, last_modified: i64) -> Self {
        Self {
            name: name.to_string(),
            rules: rules.to_string(),
            enabled,
            last_modified,
        }
    }

    /// Version rendered as a UTC timestamp for log lines; raw number if out of range
    pub fn version_display(&self) -> String {
        match DateTime::<Utc>::from_timestamp(self.last_modified, 0) {
            Some(ts) => ts.to_rfc3339(),
            None => self.last_modified.to_string(),
        }
    }
}

/// Supplies the current config for a named filter.
/// `Ok(None)` means no config has been stored yet.
#[async_trait]
pub trait FilterConfigSource: Send + Sync {
    async fn get_filter_config(&self, name: &str) -> Result<Option<FilterConfig>>;
}

/// Reads a JSON array of `FilterConfig` records from disk on every call,
/// so edits to the file are picked up on the next check.
pub struct JsonFileConfigSource {
    path: PathBuf,
}

impl JsonFileConfigSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_all(&self) -> Result<Vec<FilterConfig>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read filter config file: {}", self.path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse filter config JSON: {}", self.path.display()))
    }
}

#[async_trait]
impl FilterConfigSource for JsonFileConfigSource {
    async fn get_filter_config(&self, name: &str) -> Result<Option<FilterConfig>> {
        let configs = self.load_all().await?;
        Ok(configs.into_iter().find(|c| c.name == name))
    }
}

/// In-memory source for embedding and tests
#[derive(Default)]
pub struct StaticConfigSource {
    configs: RwLock<HashMap<String, FilterConfig>>,
}

impl StaticConfigSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the config stored under `config.name`
    pub fn put(&self, config: FilterConfig) {
        let mut configs = self
            .configs
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        configs.insert(config.name.clone(), config);
    }
}

#[async_trait]
impl FilterConfigSource for StaticConfigSource {
    async fn get_filter_config(&self, name: &str) -> Result<Option<FilterConfig>> {
        let configs = self
            .configs
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(configs.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_display() {
        let config = FilterConfig::new(ACCOUNT_FILTER_NAME, "{}", true, 0);
        assert_eq!(config.version_display(), "1970-01-01T00:00:00+00:00");

        let config = FilterConfig::new(ACCOUNT_FILTER_NAME, "{}", true, i64::MAX);
        assert_eq!(config.version_display(), i64::MAX.to_string());
    }

    #[tokio::test]
    async fn test_static_source_replaces() {
        let source = StaticConfigSource::new();
        assert!(source.get_filter_config("account").await.unwrap().is_none());

        source.put(FilterConfig::new("account", "{}", false, 1));
        source.put(FilterConfig::new("account", "{}", true, 2));
        let got = source.get_filter_config("account").await.unwrap().unwrap();
        assert_eq!(got.last_modified, 2);
        assert!(got.enabled);
    }

    #[tokio::test]
    async fn test_json_file_source() {
        let path = std::env::temp_dir().join(format!(
            "ledger_filters_cfg_{}.json",
            std::process::id()
        ));
        let json = r#"[
            {"name": "account", "rules": "{\"account_whitelist\":[\"GA\"]}", "enabled": true, "last_modified": 10},
            {"name": "asset", "rules": "{\"asset_whitelist\":[]}", "enabled": false, "last_modified": 3}
        ]"#;
        std::fs::write(&path, json).unwrap();

        let source = JsonFileConfigSource::new(&path);
        let account = source.get_filter_config("account").await.unwrap().unwrap();
        assert_eq!(account.last_modified, 10);
        assert!(source.get_filter_config("missing").await.unwrap().is_none());

        std::fs::remove_file(&path).unwrap();
        assert!(source.get_filter_config("account").await.is_err());
    }
}
