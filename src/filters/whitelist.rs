//! Versioned whitelist cache shared by the filter kinds
//!
//! Holds one immutable `WhitelistSnapshot` (entries + enabled + version)
//! behind a single reference. Readers clone the `Arc` and never see a mix of
//! two versions. Refresh decodes outside the lock, then re-checks the version
//! and swaps under the write lock, so concurrent refreshes are serialized and
//! a stale config can never overwrite a newer one.

use crate::config::FilterConfig;
use crate::error::FilterError;
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

/// One self-consistent version of a filter's rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhitelistSnapshot {
    entries: HashSet<String>,
    enabled: bool,
    last_modified: i64,
}

impl WhitelistSnapshot {
    pub fn new<I>(entries: I, enabled: bool, last_modified: i64) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            entries: entries.into_iter().collect(),
            enabled,
            last_modified,
        }
    }

    /// Filtering restricts output only with a populated list and the enabled flag
    pub fn is_active(&self) -> bool {
        self.enabled && !self.entries.is_empty()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.entries.contains(entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn last_modified(&self) -> i64 {
        self.last_modified
    }
}

/// Snapshot holder for one named filter
pub struct WhitelistCache {
    filter: &'static str,
    current: RwLock<Arc<WhitelistSnapshot>>,
}

impl WhitelistCache {
    /// Starts empty, disabled, at version 0
    pub fn new(filter: &'static str) -> Self {
        Self {
            filter,
            current: RwLock::new(Arc::new(WhitelistSnapshot::default())),
        }
    }

    pub fn filter_name(&self) -> &'static str {
        self.filter
    }

    /// Current snapshot; stays valid even if a refresh lands afterwards
    pub fn snapshot(&self) -> Arc<WhitelistSnapshot> {
        // The guarded value is only ever replaced wholesale, so a poisoned
        // lock still holds a complete snapshot.
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Apply `config` if it is newer than the cached version.
    ///
    /// `decode` turns the rules payload into the whitelist entries. Returns
    /// `Ok(true)` when a new snapshot was published, `Ok(false)` when the
    /// config was not newer. On decode failure nothing changes.
    pub fn refresh<F>(&self, config: &FilterConfig, decode: F) -> Result<bool, FilterError>
    where
        F: FnOnce(&str) -> Result<Vec<String>, serde_json::Error>,
    {
        if config.last_modified <= self.snapshot().last_modified {
            return Ok(false);
        }

        let entries = decode(&config.rules).map_err(|source| FilterError::Decode {
            filter: self.filter,
            source,
        })?;
        let next = Arc::new(WhitelistSnapshot::new(
            entries,
            config.enabled,
            config.last_modified,
        ));

        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if config.last_modified <= current.last_modified {
            debug!(
                "{} filter: config v{} lost to concurrent refresh (now v{})",
                self.filter, config.last_modified, current.last_modified
            );
            return Ok(false);
        }

        info!(
            "New {} filter config detected, reloading: version={} ({}) entries={} enabled={}",
            self.filter,
            config.last_modified,
            config.version_display(),
            next.len(),
            next.enabled(),
        );
        *current = next;
        Ok(true)
    }
}
