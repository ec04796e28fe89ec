//! Cache error types
//!
//! Misses, expiry and capacity pressure are normal operation and never show
//! up here. Only construction-time configuration problems and invalid
//! lookup inputs do.

use thiserror::Error;

/// Errors raised by the cache engine
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CacheError {
    /// A configuration value is out of range
    #[error("Invalid cache configuration for '{field}': {message}")]
    InvalidConfig { field: String, message: String },

    /// A request shape could not be turned into a cache key
    #[error("Failed to derive cache key: {0}")]
    KeyDerivation(String),

    /// A feature vector is empty or contains non-finite values
    #[error("Invalid feature vector: {0}")]
    InvalidFeatures(String),
}

impl CacheError {
    /// Create an invalid configuration error for a field
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig { field: field.into(), message: message.into() }
    }

    /// Whether the error comes from the caller's input rather than the
    /// cache's own configuration
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::KeyDerivation(_) | Self::InvalidFeatures(_))
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        Self::KeyDerivation(err.to_string())
    }
}
