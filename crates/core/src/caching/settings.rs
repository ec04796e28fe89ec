//! Conversion from configuration settings to cache engine configuration

use predcache_common::cache::{
    CacheConfig, CacheError, EvictionPolicy, KeyStrategy, DEFAULT_SIMILARITY_THRESHOLD,
};
use predcache_domain::{CacheSettings, EvictionPolicySetting, PredCacheError, Result};

/// Build a validated [`CacheConfig`] for an exact-key cache
///
/// # Errors
/// Returns [`PredCacheError::Config`] if the settings are out of range.
pub fn exact_cache_config(name: &str, settings: &CacheSettings) -> Result<CacheConfig> {
    build(name, settings, KeyStrategy::Exact)
}

/// Build a validated [`CacheConfig`] for a similarity-keyed cache
///
/// A missing threshold falls back to the engine default.
///
/// # Errors
/// Returns [`PredCacheError::Config`] if the settings are out of range.
pub fn similarity_cache_config(name: &str, settings: &CacheSettings) -> Result<CacheConfig> {
    let threshold = settings.similarity_threshold.unwrap_or(DEFAULT_SIMILARITY_THRESHOLD);
    build(name, settings, KeyStrategy::Similarity { threshold })
}

fn build(name: &str, settings: &CacheSettings, key_strategy: KeyStrategy) -> Result<CacheConfig> {
    let mut builder = CacheConfig::builder()
        .name(name)
        .ttl(settings.ttl())
        .eviction_policy(eviction_policy(settings.eviction_policy))
        .key_strategy(key_strategy);
    if let Some(max_entries) = settings.max_entries {
        builder = builder.max_entries(max_entries);
    }
    if let Some(batch) = settings.eviction_batch_size {
        builder = builder.eviction_batch_size(batch);
    }

    let config = builder.build();
    config.validate().map_err(|err| cache_error(name, err))?;
    Ok(config)
}

fn eviction_policy(setting: EvictionPolicySetting) -> EvictionPolicy {
    match setting {
        EvictionPolicySetting::Fifo => EvictionPolicy::Fifo,
        EvictionPolicySetting::LeastHitCount => EvictionPolicy::LeastHitCount,
    }
}

/// Map a cache engine error into the domain error, naming the cache
pub fn cache_error(name: &str, err: CacheError) -> PredCacheError {
    if err.is_input_error() {
        PredCacheError::InvalidInput(err.to_string())
    } else {
        PredCacheError::Config(format!("cache '{}': {}", name, err))
    }
}
