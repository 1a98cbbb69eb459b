//! Ranking error types.

use thiserror::Error;

/// Errors that can occur while voting on or ranking the catalog.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RankingError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Vote transition that cannot be applied to the product's counters.
    #[error("Invalid vote transition on {product_id} from {from} to {to}: {reason}")]
    InvalidTransition {
        product_id: String,
        from: String,
        to: String,
        reason: String,
    },

    /// Ranking configuration out of range.
    #[error("Invalid ranking config: {0}")]
    InvalidConfig(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RankingError {
    fn from(e: serde_json::Error) -> Self {
        RankingError::SerializationError(e.to_string())
    }
}
