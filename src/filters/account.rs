//! Account whitelist filter
//!
//! Keeps a transaction when any of its participant accounts is whitelisted.
//! Rules payload: `{"account_whitelist": ["G...", ...]}`.
//!
//! Fail-open: with an empty whitelist or `enabled = false` every transaction
//! passes, so missing configuration never drops data.

use super::whitelist::{WhitelistCache, WhitelistSnapshot};
use super::{FilterContext, TransactionFilterer};
use crate::config::{FilterConfig, ACCOUNT_FILTER_NAME};
use crate::error::FilterError;
use crate::participants::{OperationParticipants, ParticipantExtractor};
use crate::types::LedgerTransaction;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Decoded account filter rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountFilterRules {
    #[serde(rename = "account_whitelist")]
    pub canonical_whitelist: Vec<String>,
}

/// Participant-account whitelist filter
pub struct AccountFilter {
    cache: WhitelistCache,
    extractor: Arc<dyn ParticipantExtractor>,
}

impl Default for AccountFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountFilter {
    /// Empty, disabled filter using the default participant extractor
    pub fn new() -> Self {
        Self::with_extractor(Arc::new(OperationParticipants))
    }

    pub fn with_extractor(extractor: Arc<dyn ParticipantExtractor>) -> Self {
        Self {
            cache: WhitelistCache::new(ACCOUNT_FILTER_NAME),
            extractor,
        }
    }

    /// Reload rules from `config` if it is newer than what is cached.
    /// A malformed payload leaves the previous rules in force.
    pub fn refresh_account_filter(&self, config: &FilterConfig) -> Result<(), FilterError> {
        self.cache
            .refresh(config, |rules| {
                serde_json::from_str::<AccountFilterRules>(rules).map(|r| r.canonical_whitelist)
            })
            .map(|_| ())
    }

    /// Currently applied rules
    pub fn snapshot(&self) -> Arc<WhitelistSnapshot> {
        self.cache.snapshot()
    }

    fn keep(
        &self,
        ctx: &FilterContext,
        transaction: &LedgerTransaction,
    ) -> Result<bool, FilterError> {
        let rules = self.cache.snapshot();
        if !rules.is_active() {
            return Ok(true);
        }

        let participants = self
            .extractor
            .participants_for_transaction(ctx.ledger_sequence, transaction)?;

        Ok(participants.iter().any(|p| rules.contains(p.address())))
    }
}

#[async_trait]
impl TransactionFilterer for AccountFilter {
    fn name(&self) -> &str {
        ACCOUNT_FILTER_NAME
    }

    async fn filter_transaction(
        &self,
        ctx: &FilterContext,
        transaction: &LedgerTransaction,
    ) -> Result<bool, FilterError> {
        self.keep(ctx, transaction)
    }
}
