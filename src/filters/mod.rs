//! Transaction filtering
//!
//! Every filter kind implements `TransactionFilterer`. A `FilterPipeline`
//! applies a list of them in order; `Filters` owns the concrete filters and
//! keeps them in sync with the config store.

pub mod account;
pub mod asset;
pub mod pipeline;
pub mod registry;
pub mod whitelist;

pub use account::{AccountFilter, AccountFilterRules};
pub use asset::{AssetFilter, AssetFilterRules};
pub use pipeline::{FilterPipeline, FilterStats};
pub use registry::Filters;
pub use whitelist::{WhitelistCache, WhitelistSnapshot};

use crate::error::FilterError;
use crate::types::LedgerTransaction;
use async_trait::async_trait;

/// Per-call context forwarded to collaborators (participant extraction)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterContext {
    /// Ledger being ingested; 0 when unknown
    pub ledger_sequence: u32,
}

impl FilterContext {
    pub fn for_ledger(ledger_sequence: u32) -> Self {
        Self { ledger_sequence }
    }
}

/// Decides whether a transaction continues downstream.
///
/// `Ok(true)` keeps it, `Ok(false)` drops it. An `Err` is a pipeline-level
/// failure, not a filtering decision.
#[async_trait]
pub trait TransactionFilterer: Send + Sync {
    /// Filter name for logging
    fn name(&self) -> &str;

    async fn filter_transaction(
        &self,
        ctx: &FilterContext,
        transaction: &LedgerTransaction,
    ) -> Result<bool, FilterError>;
}
