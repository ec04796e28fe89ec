//! Cache configuration types and builder patterns
//!
//! One [`CacheConfig`] parameterizes every cache instance: TTL, capacity,
//! eviction batch size, eviction policy and key strategy. Invalid values are
//! rejected when the store is constructed, never at call time.

use std::time::Duration;

use super::error::CacheError;
use super::key::KeyStrategy;

/// Similarity threshold used when none is configured
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.95;

/// Share of `max_entries` evicted in one batch when no explicit batch size is
/// configured
pub const DEFAULT_EVICTION_FRACTION: f64 = 0.2;

/// Eviction policy applied when a bounded store overflows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionPolicy {
    /// Evicts the oldest entries by creation time
    Fifo,
    /// Evicts entries with the lowest hit count, oldest first on ties
    #[default]
    LeastHitCount,
}

/// Configuration for cache behavior
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Name used in logs, health reports and janitor sweeps
    pub name: String,

    /// Time-to-live for entries
    pub ttl: Duration,

    /// Maximum number of entries (None = bounded only by the TTL sweep)
    pub max_entries: Option<usize>,

    /// Entries removed per capacity eviction (None = 20% of `max_entries`)
    pub eviction_batch_size: Option<usize>,

    /// Eviction policy when `max_entries` is exceeded
    pub eviction_policy: EvictionPolicy,

    /// How lookups identify entries
    pub key_strategy: KeyStrategy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            name: "cache".to_string(),
            ttl: Duration::from_secs(300),
            max_entries: None,
            eviction_batch_size: None,
            eviction_policy: EvictionPolicy::LeastHitCount,
            key_strategy: KeyStrategy::Exact,
        }
    }
}

impl CacheConfig {
    /// Create a new configuration builder
    pub fn builder() -> CacheConfigBuilder {
        CacheConfigBuilder::default()
    }

    /// Pure TTL cache: exact keys, no capacity bound
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    ///
    /// use predcache_common::cache::CacheConfig;
    ///
    /// let config = CacheConfig::ttl(Duration::from_secs(300));
    /// assert!(config.max_entries.is_none());
    /// ```
    pub fn ttl(ttl: Duration) -> Self {
        Self { ttl, ..Self::default() }
    }

    /// Exact-key cache bounded by `max_entries` with least-hit-count eviction
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    ///
    /// use predcache_common::cache::CacheConfig;
    ///
    /// let config = CacheConfig::bounded(Duration::from_secs(600), 1000);
    /// assert_eq!(config.effective_batch_size(), Some(200));
    /// ```
    pub fn bounded(ttl: Duration, max_entries: usize) -> Self {
        Self { ttl, max_entries: Some(max_entries), ..Self::default() }
    }

    /// Similarity cache over feature vectors, bounded with least-hit-count
    /// eviction
    pub fn similarity(ttl: Duration, max_entries: usize, threshold: f64) -> Self {
        Self {
            ttl,
            max_entries: Some(max_entries),
            key_strategy: KeyStrategy::Similarity { threshold },
            ..Self::default()
        }
    }

    /// Number of entries a capacity eviction removes
    ///
    /// Returns `None` for unbounded stores. Defaults to 20% of
    /// `max_entries`, at least one.
    pub fn effective_batch_size(&self) -> Option<usize> {
        let max_entries = self.max_entries?;
        let batch = self.eviction_batch_size.unwrap_or_else(|| {
            (max_entries as f64 * DEFAULT_EVICTION_FRACTION).ceil() as usize
        });
        Some(batch.max(1))
    }

    /// Threshold applied by similarity lookups
    pub fn similarity_threshold(&self) -> f64 {
        match self.key_strategy {
            KeyStrategy::Similarity { threshold } => threshold,
            KeyStrategy::Exact => DEFAULT_SIMILARITY_THRESHOLD,
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidConfig`] when the TTL is zero,
    /// `max_entries` or `eviction_batch_size` is zero, or the similarity
    /// threshold lies outside `(0, 1]`.
    pub fn validate(&self) -> Result<(), CacheError> {
        if self.ttl.is_zero() {
            return Err(CacheError::invalid_config("ttl", "must be greater than zero"));
        }
        if self.max_entries == Some(0) {
            return Err(CacheError::invalid_config("max_entries", "must be greater than zero"));
        }
        if self.eviction_batch_size == Some(0) {
            return Err(CacheError::invalid_config(
                "eviction_batch_size",
                "must be greater than zero",
            ));
        }
        if let KeyStrategy::Similarity { threshold } = self.key_strategy {
            if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
                return Err(CacheError::invalid_config(
                    "similarity_threshold",
                    format!("must be within (0, 1], got {}", threshold),
                ));
            }
        }
        Ok(())
    }
}

/// Builder for CacheConfig with fluent API
#[derive(Debug, Default)]
pub struct CacheConfigBuilder {
    config: CacheConfig,
}

impl CacheConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set time-to-live for entries
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.config.ttl = duration;
        self
    }

    /// Set maximum number of entries
    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.config.max_entries = Some(max_entries);
        self
    }

    /// Set the number of entries removed per capacity eviction
    pub fn eviction_batch_size(mut self, size: usize) -> Self {
        self.config.eviction_batch_size = Some(size);
        self
    }

    /// Set eviction policy
    pub fn eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.config.eviction_policy = policy;
        self
    }

    /// Set key strategy
    pub fn key_strategy(mut self, strategy: KeyStrategy) -> Self {
        self.config.key_strategy = strategy;
        self
    }

    /// Switch to similarity lookups with the given threshold
    pub fn similarity_threshold(mut self, threshold: f64) -> Self {
        self.config.key_strategy = KeyStrategy::Similarity { threshold };
        self
    }

    /// Build the configuration
    pub fn build(self) -> CacheConfig {
        self.config
    }
}
