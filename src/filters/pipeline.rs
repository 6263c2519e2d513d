//! Filter pipeline
//!
//! Applies filters in insertion order with AND semantics: a transaction is
//! kept only if every filter keeps it. Evaluation stops at the first drop
//! or the first error.

use super::{FilterContext, TransactionFilterer};
use crate::error::FilterError;
use crate::types::LedgerTransaction;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Counts for one filtered batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub total: usize,
    pub kept: usize,
    pub dropped: usize,
}

impl FilterStats {
    pub fn merge(&mut self, other: FilterStats) {
        self.total += other.total;
        self.kept += other.kept;
        self.dropped += other.dropped;
    }
}

/// Ordered list of filters
#[derive(Default)]
pub struct FilterPipeline {
    filters: Vec<Arc<dyn TransactionFilterer>>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_filters(filters: Vec<Arc<dyn TransactionFilterer>>) -> Self {
        Self { filters }
    }

    /// Add a filter to the end of the pipeline
    pub fn add_filter(&mut self, filter: Arc<dyn TransactionFilterer>) {
        self.filters.push(filter);
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Run one transaction through every filter
    pub async fn filter_transaction(
        &self,
        ctx: &FilterContext,
        transaction: &LedgerTransaction,
    ) -> Result<bool, FilterError> {
        for filter in &self.filters {
            if !filter.filter_transaction(ctx, transaction).await? {
                debug!("tx {} dropped by {} filter", transaction.hash, filter.name());
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Filter a batch, returning kept transactions in input order
    pub async fn filter_transactions(
        &self,
        ctx: &FilterContext,
        transactions: Vec<LedgerTransaction>,
    ) -> Result<(Vec<LedgerTransaction>, FilterStats), FilterError> {
        let mut stats = FilterStats {
            total: transactions.len(),
            ..Default::default()
        };
        let mut kept = Vec::with_capacity(transactions.len());

        for tx in transactions {
            if self.filter_transaction(ctx, &tx).await? {
                kept.push(tx);
            }
        }

        stats.kept = kept.len();
        stats.dropped = stats.total - stats.kept;
        debug!(
            "ledger {}: filtered {} txs, kept {}, dropped {}",
            ctx.ledger_sequence, stats.total, stats.kept, stats.dropped
        );
        Ok((kept, stats))
    }
}
