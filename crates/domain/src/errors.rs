//! Error types used throughout the caching services

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the prediction cache
///
/// A cache miss is never an error. Producer failures travel through
/// [`PredCacheError::Producer`], [`PredCacheError::Network`] or
/// [`PredCacheError::Timeout`] and are never cached.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum PredCacheError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Producer error: {0}")]
    Producer(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PredCacheError {
    /// Whether retrying the failed call may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }
}

/// Result type alias for prediction cache operations
pub type Result<T> = std::result::Result<T, PredCacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates the tagged serde representation.
    ///
    /// Assertions:
    /// - Confirms the JSON carries `type` and `message` fields.
    /// - Confirms the value deserializes back to the same variant.
    #[test]
    fn test_error_serializes_tagged() {
        let err = PredCacheError::Producer("model returned 500".to_string());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "Producer");
        assert_eq!(json["message"], "model returned 500");

        let back: PredCacheError = serde_json::from_value(json).unwrap();
        assert_eq!(back, err);
    }

    /// Validates transient classification.
    ///
    /// Assertions:
    /// - Ensures network and timeout errors are transient.
    /// - Ensures configuration and producer errors are not.
    #[test]
    fn test_is_transient() {
        assert!(PredCacheError::Network("reset".into()).is_transient());
        assert!(PredCacheError::Timeout("5s".into()).is_transient());
        assert!(!PredCacheError::Config("ttl".into()).is_transient());
        assert!(!PredCacheError::Producer("bad".into()).is_transient());
    }
}
