//! Asset whitelist filter
//!
//! Keeps a transaction when any operation references a whitelisted asset
//! (canonical `CODE:ISSUER` or `native`). Same versioning and fail-open
//! rules as the account filter.

use super::whitelist::{WhitelistCache, WhitelistSnapshot};
use super::{FilterContext, TransactionFilterer};
use crate::config::{FilterConfig, ASSET_FILTER_NAME};
use crate::error::FilterError;
use crate::types::LedgerTransaction;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Decoded asset filter rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFilterRules {
    #[serde(rename = "asset_whitelist")]
    pub canonical_whitelist: Vec<String>,
}

pub struct AssetFilter {
    cache: WhitelistCache,
}

impl Default for AssetFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetFilter {
    pub fn new() -> Self {
        Self {
            cache: WhitelistCache::new(ASSET_FILTER_NAME),
        }
    }

    pub fn refresh_asset_filter(&self, config: &FilterConfig) -> Result<(), FilterError> {
        self.cache
            .refresh(config, |rules| {
                serde_json::from_str::<AssetFilterRules>(rules).map(|r| r.canonical_whitelist)
            })
            .map(|_| ())
    }

    pub fn snapshot(&self) -> Arc<WhitelistSnapshot> {
        self.cache.snapshot()
    }
}

#[async_trait]
impl TransactionFilterer for AssetFilter {
    fn name(&self) -> &str {
        ASSET_FILTER_NAME
    }

    async fn filter_transaction(
        &self,
        _ctx: &FilterContext,
        transaction: &LedgerTransaction,
    ) -> Result<bool, FilterError> {
        let rules = self.cache.snapshot();
        if !rules.is_active() {
            return Ok(true);
        }

        Ok(transaction
            .operations
            .iter()
            .flat_map(|op| op.body.assets())
            .any(|asset| rules.contains(&asset.canonical())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Asset, Operation, OperationBody};

    fn whitelist(assets: &[&str], enabled: bool, last_modified: i64) -> FilterConfig {
        let rules = AssetFilterRules {
            canonical_whitelist: assets.iter().map(|a| a.to_string()).collect(),
        };
        FilterConfig::new(
            ASSET_FILTER_NAME,
            &serde_json::to_string(&rules).unwrap(),
            enabled,
            last_modified,
        )
    }

    fn payment(asset: Asset) -> LedgerTransaction {
        LedgerTransaction::new("a1", 7, "GSRC").with_operation(Operation::new(
            OperationBody::Payment {
                destination: "GDST".to_string(),
                asset,
            },
        ))
    }

    #[tokio::test]
    async fn test_whitelisted_asset_kept() {
        let filter = AssetFilter::new();
        filter
            .refresh_asset_filter(&whitelist(&["USDC:GISSUER"], true, 1))
            .unwrap();
        let ctx = FilterContext::default();

        assert!(filter
            .filter_transaction(&ctx, &payment(Asset::credit("USDC", "GISSUER")))
            .await
            .unwrap());
        assert!(!filter
            .filter_transaction(&ctx, &payment(Asset::credit("USDC", "GFAKE")))
            .await
            .unwrap());
        assert!(!filter
            .filter_transaction(&ctx, &payment(Asset::Native))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_path_assets_match() {
        let filter = AssetFilter::new();
        filter
            .refresh_asset_filter(&whitelist(&["EUR:GI"], true, 1))
            .unwrap();
        let tx = LedgerTransaction::new("a2", 7, "GSRC").with_operation(Operation::new(
            OperationBody::PathPayment {
                destination: "GDST".to_string(),
                send_asset: Asset::Native,
                dest_asset: Asset::credit("USD", "GI"),
                path: vec![Asset::credit("EUR", "GI")],
            },
        ));
        assert!(filter
            .filter_transaction(&FilterContext::default(), &tx)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_disabled_passes_everything() {
        let filter = AssetFilter::new();
        filter
            .refresh_asset_filter(&whitelist(&["native"], false, 1))
            .unwrap();
        let tx = LedgerTransaction::new("a3", 7, "GSRC")
            .with_operation(Operation::new(OperationBody::BumpSequence));
        assert!(filter
            .filter_transaction(&FilterContext::default(), &tx)
            .await
            .unwrap());
    }

    #[test]
    fn test_bad_rules_rejected() {
        let filter = AssetFilter::new();
        let bad = FilterConfig::new(ASSET_FILTER_NAME, r#"{"asset_whitelist": 5}"#, true, 1);
        assert!(filter.refresh_asset_filter(&bad).unwrap_err().is_decode());
        assert_eq!(filter.snapshot().last_modified(), 0);
    }
}
