//! Response cache: pure TTL, exact keys derived from the request shape

use std::sync::Arc;

use predcache_common::cache::{exact_key, CacheConfig};
use predcache_domain::{CacheSettings, RequestShape, Result};
use serde_json::Value;

use super::ports::Producer;
use super::service::{CacheService, Fetched};
use super::settings::{cache_error, exact_cache_config};

/// Cache name and key namespace
pub const RESPONSE_CACHE: &str = "response";

/// Caches serialized response bodies keyed by request shape
#[derive(Clone)]
pub struct ResponseCache {
    service: CacheService<Arc<Value>>,
}

impl ResponseCache {
    /// # Errors
    /// Returns `PredCacheError::Config` if the settings are invalid.
    pub fn new(settings: &CacheSettings) -> Result<Self> {
        Self::with_config(exact_cache_config(RESPONSE_CACHE, settings)?)
    }

    /// # Errors
    /// Returns `PredCacheError::Config` if the configuration is invalid.
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        Ok(Self { service: CacheService::new(config)? })
    }

    /// Cache key for a request shape
    ///
    /// # Errors
    /// Returns `PredCacheError::InvalidInput` if the shape cannot be
    /// serialized.
    pub fn key_for(shape: &RequestShape) -> Result<String> {
        exact_key(RESPONSE_CACHE, shape).map_err(|err| cache_error(RESPONSE_CACHE, err))
    }

    /// Serve a cached response or build it with `produce`
    ///
    /// # Errors
    /// Returns key derivation errors and the producer's error unchanged.
    pub async fn get_or_produce<F, Fut>(&self, shape: &RequestShape, produce: F) -> Result<Fetched<Arc<Value>>>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<Value>>,
    {
        let key = Self::key_for(shape)?;
        self.service.get_or_produce(&key, || async move { produce().await.map(Arc::new) }).await
    }

    /// Serve a cached response or build it with a [`Producer`]
    ///
    /// # Errors
    /// Returns key derivation errors and the producer's error unchanged.
    pub async fn fetch(
        &self,
        shape: &RequestShape,
        producer: &dyn Producer<RequestShape, Value>,
    ) -> Result<Fetched<Arc<Value>>> {
        self.get_or_produce(shape, || producer.produce(shape)).await
    }

    pub fn service(&self) -> &CacheService<Arc<Value>> {
        &self.service
    }

    pub fn invalidate_all(&self) {
        self.service.invalidate_all();
    }
}
