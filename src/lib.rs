//! Ledger Ingestion Filters
//!
//! Per-transaction filtering stage for a ledger-ingestion pipeline.
//! Filters are driven by versioned, hot-reloadable configs and decide
//! whether each transaction continues downstream.

pub mod config;
pub mod error;
pub mod filters;
pub mod participants;
pub mod settings;
pub mod types;

// Re-export commonly used types
pub use config::{FilterConfig, FilterConfigSource, JsonFileConfigSource, StaticConfigSource};
pub use error::{ExtractionError, FilterError};
pub use filters::{
    AccountFilter, AccountFilterRules, AssetFilter, AssetFilterRules, FilterContext,
    FilterPipeline, FilterStats, Filters, TransactionFilterer,
};
pub use participants::{OperationParticipants, ParticipantExtractor};
pub use settings::ServiceSettings;
pub use types::{Asset, LedgerTransaction, Operation, OperationBody, Participant};
