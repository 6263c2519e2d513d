//! Filter registry
//!
//! Owns the account and asset filters and refreshes them from a
//! `FilterConfigSource` at most once per check interval. Refresh failures are
//! logged and the previous rules stay in force.

use super::account::AccountFilter;
use super::asset::AssetFilter;
use super::TransactionFilterer;
use crate::config::{FilterConfig, FilterConfigSource, ACCOUNT_FILTER_NAME, ASSET_FILTER_NAME};
use crate::error::FilterError;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::{error, warn};

/// Default interval between config store checks
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(10);

pub struct Filters {
    account: Arc<AccountFilter>,
    asset: Arc<AssetFilter>,
    check_interval: Duration,
    /// None until the first check, and after `force_refresh`
    last_checked: Mutex<Option<Instant>>,
}

impl Default for Filters {
    fn default() -> Self {
        Self::new(DEFAULT_CHECK_INTERVAL)
    }
}

impl Filters {
    pub fn new(check_interval: Duration) -> Self {
        Self::with_filters(
            Arc::new(AccountFilter::new()),
            Arc::new(AssetFilter::new()),
            check_interval,
        )
    }

    pub fn with_filters(
        account: Arc<AccountFilter>,
        asset: Arc<AssetFilter>,
        check_interval: Duration,
    ) -> Self {
        Self {
            account,
            asset,
            check_interval,
            last_checked: Mutex::new(None),
        }
    }

    pub fn account_filter(&self) -> &Arc<AccountFilter> {
        &self.account
    }

    pub fn asset_filter(&self) -> &Arc<AssetFilter> {
        &self.asset
    }

    /// Make the next `get_filters` call re-check the source
    pub fn force_refresh(&self) {
        *self.last_checked.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Current filters, refreshed from `source` if the check interval elapsed.
    /// Always returns `[account, asset]`.
    pub async fn get_filters(
        &self,
        source: &dyn FilterConfigSource,
    ) -> Vec<Arc<dyn TransactionFilterer>> {
        if self.check_due() {
            self.refresh_from(source).await;
        }

        vec![
            Arc::clone(&self.account) as Arc<dyn TransactionFilterer>,
            Arc::clone(&self.asset) as Arc<dyn TransactionFilterer>,
        ]
    }

    /// Claims the check slot when due so concurrent callers don't all hit the source
    fn check_due(&self) -> bool {
        let mut last_checked = self.last_checked.lock().unwrap_or_else(PoisonError::into_inner);
        let due = match *last_checked {
            None => true,
            Some(at) => at.elapsed() >= self.check_interval,
        };
        if due {
            *last_checked = Some(Instant::now());
        }
        due
    }

    async fn refresh_from(&self, source: &dyn FilterConfigSource) {
        if let Some(config) = load(source, ACCOUNT_FILTER_NAME).await {
            log_refresh_error(ACCOUNT_FILTER_NAME, self.account.refresh_account_filter(&config));
        }
        if let Some(config) = load(source, ASSET_FILTER_NAME).await {
            log_refresh_error(ASSET_FILTER_NAME, self.asset.refresh_asset_filter(&config));
        }
    }
}

async fn load(source: &dyn FilterConfigSource, name: &str) -> Option<FilterConfig> {
    match source.get_filter_config(name).await {
        Ok(config) => config,
        Err(e) => {
            warn!("Unable to load {} filter config, keeping current rules: {:#}", name, e);
            None
        }
    }
}

fn log_refresh_error(name: &str, result: Result<(), FilterError>) {
    if let Err(e) = result {
        let cause = std::error::Error::source(&e)
            .map(|s| s.to_string())
            .unwrap_or_default();
        error!("Unable to refresh {} filter, keeping current rules: {} ({})", name, e, cause);
    }
}
