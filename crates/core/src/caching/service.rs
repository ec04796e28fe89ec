//! Generic get-or-produce service over a cache store

use std::future::Future;
use std::sync::Arc;

use predcache_common::cache::utils::CacheHealthReport;
use predcache_common::cache::{CacheConfig, CacheStats, CacheStore, FeatureVector, Sweepable};
use predcache_common::time::{Clock, SystemClock};
use predcache_domain::Result;
use tracing::{debug, instrument, warn};

use super::settings::cache_error;

/// A value returned by a caching service, with where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<V> {
    pub value: V,
    /// True when served from the cache without calling the producer
    pub cached: bool,
}

/// Cache-aside service: look up, fall through to the producer on a miss,
/// store only successful results
///
/// No lock is held while the producer runs. Two concurrent misses for the
/// same key may both call the producer; the later result overwrites the
/// earlier one.
pub struct CacheService<V, C = SystemClock>
where
    V: Clone,
    C: Clock,
{
    store: CacheStore<V, C>,
}

impl<V> CacheService<V, SystemClock>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a service over a new store
    ///
    /// # Errors
    /// Returns `PredCacheError::Config` if the configuration is invalid.
    pub fn new(config: CacheConfig) -> Result<Self> {
        let name = config.name.clone();
        let store = CacheStore::new(config).map_err(|err| cache_error(&name, err))?;
        Ok(Self { store })
    }
}

impl<V, C> CacheService<V, C>
where
    V: Clone + Send + Sync + 'static,
    C: Clock + Clone,
{
    /// Create a service over a new store with a custom clock
    ///
    /// # Errors
    /// Returns `PredCacheError::Config` if the configuration is invalid.
    pub fn with_clock(config: CacheConfig, clock: C) -> Result<Self> {
        let name = config.name.clone();
        let store = CacheStore::with_clock(config, clock).map_err(|err| cache_error(&name, err))?;
        Ok(Self { store })
    }

    /// Wrap an existing store
    pub fn from_store(store: CacheStore<V, C>) -> Self {
        Self { store }
    }

    /// The underlying store
    pub fn store(&self) -> &CacheStore<V, C> {
        &self.store
    }

    /// Cache name used in logs and reports
    pub fn name(&self) -> &str {
        self.store.name()
    }

    /// Return the cached value for `key`, or run `produce` and cache its
    /// result
    ///
    /// # Errors
    /// Returns the producer's error unchanged; nothing is cached for it.
    #[instrument(skip(self, produce), fields(cache = %self.name()))]
    pub async fn get_or_produce<F, Fut>(&self, key: &str, produce: F) -> Result<Fetched<V>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        if let Some(value) = self.store.get(key) {
            debug!("cache hit");
            return Ok(Fetched { value, cached: true });
        }

        debug!("cache miss");
        match produce().await {
            Ok(value) => {
                self.store.set(key, value.clone());
                Ok(Fetched { value, cached: false })
            }
            Err(err) => {
                warn!(error = %err, "producer failed, nothing cached");
                Err(err)
            }
        }
    }

    /// Return the best similar cached value, or run `produce` and cache its
    /// result under `features`
    ///
    /// # Errors
    /// Returns the producer's error unchanged; nothing is cached for it.
    #[instrument(skip(self, features, produce), fields(cache = %self.name(), dims = features.len()))]
    pub async fn get_or_produce_similar<F, Fut>(
        &self,
        features: FeatureVector,
        produce: F,
    ) -> Result<Fetched<V>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        if let Some(value) = self.store.get_similar(&features) {
            debug!("similarity hit");
            return Ok(Fetched { value, cached: true });
        }

        debug!("similarity miss");
        match produce().await {
            Ok(value) => {
                self.store.insert_similar(features, value.clone());
                Ok(Fetched { value, cached: false })
            }
            Err(err) => {
                warn!(error = %err, "producer failed, nothing cached");
                Err(err)
            }
        }
    }

    /// Drop one entry, returning whether it existed
    pub fn invalidate(&self, key: &str) -> bool {
        self.store.remove(key).is_some()
    }

    /// Drop every entry
    pub fn invalidate_all(&self) {
        self.store.clear();
        debug!(cache = %self.name(), "cache invalidated");
    }

    /// Snapshot of the store's counters
    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }

    /// Health report with tuning recommendations
    pub fn health(&self) -> CacheHealthReport {
        CacheHealthReport::new(&self.store)
    }

    /// Handle for registering this cache with a janitor
    pub fn sweepable(&self) -> Arc<dyn Sweepable> {
        Arc::new(self.store.clone())
    }
}

impl<V, C> Clone for CacheService<V, C>
where
    V: Clone,
    C: Clock + Clone,
{
    fn clone(&self) -> Self {
        Self { store: self.store.clone() }
    }
}
