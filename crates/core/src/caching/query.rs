//! Query cache: bounded, least-hit-count eviction, exact keys derived from
//! any serializable query description

use predcache_common::cache::{exact_key, CacheConfig};
use predcache_domain::{CacheSettings, Result};
use serde::Serialize;

use super::ports::Producer;
use super::service::{CacheService, Fetched};
use super::settings::{cache_error, exact_cache_config};

/// Cache name and key namespace
pub const QUERY_CACHE: &str = "query";

/// Caches database query results keyed by the query description
pub struct QueryCache<V>
where
    V: Clone,
{
    service: CacheService<V>,
}

impl<V> QueryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// # Errors
    /// Returns `PredCacheError::Config` if the settings are invalid.
    pub fn new(settings: &CacheSettings) -> Result<Self> {
        Self::with_config(exact_cache_config(QUERY_CACHE, settings)?)
    }

    /// # Errors
    /// Returns `PredCacheError::Config` if the configuration is invalid.
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        Ok(Self { service: CacheService::new(config)? })
    }

    /// Cache key for a query description
    ///
    /// # Errors
    /// Returns `PredCacheError::InvalidInput` if the query cannot be
    /// serialized.
    pub fn key_for<Q>(query: &Q) -> Result<String>
    where
        Q: Serialize + ?Sized,
    {
        exact_key(QUERY_CACHE, query).map_err(|err| cache_error(QUERY_CACHE, err))
    }

    /// Serve a cached result or run the query with `produce`
    ///
    /// # Errors
    /// Returns key derivation errors and the producer's error unchanged.
    pub async fn get_or_produce<Q, F, Fut>(&self, query: &Q, produce: F) -> Result<Fetched<V>>
    where
        Q: Serialize + ?Sized,
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<V>>,
    {
        let key = Self::key_for(query)?;
        self.service.get_or_produce(&key, produce).await
    }

    /// Serve a cached result or run the query through a [`Producer`]
    ///
    /// # Errors
    /// Returns key derivation errors and the producer's error unchanged.
    pub async fn fetch<Q>(&self, query: &Q, producer: &dyn Producer<Q, V>) -> Result<Fetched<V>>
    where
        Q: Serialize + Sync + ?Sized,
    {
        self.get_or_produce(query, || producer.produce(query)).await
    }

    pub fn service(&self) -> &CacheService<V> {
        &self.service
    }

    pub fn invalidate_all(&self) {
        self.service.invalidate_all();
    }
}

impl<V> Clone for QueryCache<V>
where
    V: Clone,
{
    fn clone(&self) -> Self {
        Self { service: self.service.clone() }
    }
}
