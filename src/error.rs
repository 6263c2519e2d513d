//! Filter error types
//!
//! Two failure kinds leave the filter core:
//! - `Decode`: a config's rules payload could not be parsed. Cached rules stay in place.
//! - `Extraction`: the participant extractor rejected a transaction. Passed through untouched.

use thiserror::Error;

/// Errors surfaced by the filter core.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Rules payload of a filter config failed to decode
    #[error("unable to decode {filter} filter rules")]
    Decode {
        filter: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Participant extraction failed; not a filtering decision
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

impl FilterError {
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

/// Errors returned by a `ParticipantExtractor`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("transaction {hash} has no operations")]
    EmptyTransaction { hash: String },

    #[error("transaction {hash}: operation {index} references an empty account id")]
    InvalidAccount { hash: String, index: usize },

    #[error("participant extraction failed: {0}")]
    Other(String),
}
