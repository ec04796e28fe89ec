//! Configuration structures
//!
//! Every section carries serde defaults so a config file only needs the
//! values it overrides.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_LOG_LEVEL, JANITOR_INTERVAL_SECS, ML_SERVICE_BASE_URL, ML_SERVICE_MAX_ATTEMPTS,
    ML_SERVICE_TIMEOUT_MS, PRECOMPUTE_CACHE_MAX_ENTRIES, PRECOMPUTE_CACHE_TTL_SECS,
    PREDICTION_CACHE_MAX_ENTRIES, PREDICTION_CACHE_TTL_SECS, PREDICTION_SIMILARITY_THRESHOLD,
    QUERY_CACHE_MAX_ENTRIES, QUERY_CACHE_TTL_SECS, RESPONSE_CACHE_TTL_SECS,
};
use crate::errors::{PredCacheError, Result};
use crate::impl_setting_conversions;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub caches: CachesConfig,
    pub janitor: JanitorConfig,
    pub ml_service: MlServiceConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Check the values that are not validated by the cache engine itself
    ///
    /// # Errors
    /// Returns [`PredCacheError::Config`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.janitor.enabled && self.janitor.interval_seconds == 0 {
            return Err(PredCacheError::Config(
                "janitor.interval_seconds must be greater than zero".to_string(),
            ));
        }
        if self.ml_service.base_url.trim().is_empty() {
            return Err(PredCacheError::Config("ml_service.base_url must not be empty".to_string()));
        }
        if self.ml_service.timeout_ms == 0 {
            return Err(PredCacheError::Config(
                "ml_service.timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.ml_service.max_attempts == 0 {
            return Err(PredCacheError::Config(
                "ml_service.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Eviction policy as written in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicySetting {
    Fifo,
    #[default]
    LeastHitCount,
}

impl_setting_conversions!(EvictionPolicySetting {
    Fifo => "fifo",
    LeastHitCount => "least_hit_count",
});

/// Settings for one cache instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSettings {
    pub ttl_seconds: u64,
    #[serde(default)]
    pub max_entries: Option<usize>,
    #[serde(default)]
    pub eviction_batch_size: Option<usize>,
    #[serde(default)]
    pub eviction_policy: EvictionPolicySetting,
    /// Only read by similarity-keyed caches
    #[serde(default)]
    pub similarity_threshold: Option<f64>,
}

impl CacheSettings {
    /// Pure TTL settings
    pub fn ttl_only(ttl_seconds: u64) -> Self {
        Self {
            ttl_seconds,
            max_entries: None,
            eviction_batch_size: None,
            eviction_policy: EvictionPolicySetting::LeastHitCount,
            similarity_threshold: None,
        }
    }

    /// TTL plus a capacity bound
    pub fn bounded(ttl_seconds: u64, max_entries: usize) -> Self {
        Self { max_entries: Some(max_entries), ..Self::ttl_only(ttl_seconds) }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

/// One settings block per cache purpose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CachesConfig {
    pub response: CacheSettings,
    pub query: CacheSettings,
    pub prediction: CacheSettings,
    pub precompute: CacheSettings,
}

impl Default for CachesConfig {
    fn default() -> Self {
        Self {
            response: CacheSettings::ttl_only(RESPONSE_CACHE_TTL_SECS),
            query: CacheSettings::bounded(QUERY_CACHE_TTL_SECS, QUERY_CACHE_MAX_ENTRIES),
            prediction: CacheSettings {
                similarity_threshold: Some(PREDICTION_SIMILARITY_THRESHOLD),
                ..CacheSettings::bounded(PREDICTION_CACHE_TTL_SECS, PREDICTION_CACHE_MAX_ENTRIES)
            },
            precompute: CacheSettings::bounded(
                PRECOMPUTE_CACHE_TTL_SECS,
                PRECOMPUTE_CACHE_MAX_ENTRIES,
            ),
        }
    }
}

/// Periodic expiry sweep settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JanitorConfig {
    pub interval_seconds: u64,
    /// Random extra delay per tick, in seconds
    pub jitter_seconds: u64,
    pub enabled: bool,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self { interval_seconds: JANITOR_INTERVAL_SECS, jitter_seconds: 0, enabled: true }
    }
}

impl JanitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    pub fn jitter(&self) -> Duration {
        Duration::from_secs(self.jitter_seconds)
    }
}

/// External ML prediction service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MlServiceConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub max_attempts: u32,
}

impl Default for MlServiceConfig {
    fn default() -> Self {
        Self {
            base_url: ML_SERVICE_BASE_URL.to_string(),
            timeout_ms: ML_SERVICE_TIMEOUT_MS,
            max_attempts: ML_SERVICE_MAX_ATTEMPTS,
        }
    }
}

impl MlServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_string(), json: false }
    }
}
