//! Core cache store with TTL expiry, batch capacity eviction and
//! similarity lookup
//!
//! A [`CacheStore`] holds string-keyed entries behind a single
//! `parking_lot::RwLock`. Every read-modify-write sequence (hit-count bump,
//! capacity check + evict + insert) runs under the write lock, so the store
//! never exceeds `max_entries` once `set` returns.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::{debug, warn};

use super::config::{CacheConfig, EvictionPolicy};
use super::error::CacheError;
use super::key::FeatureVector;
use super::stats::{CacheStats, MetricsCollector};
use crate::time::{Clock, SystemClock};

/// Entry stored in the cache with the metadata used for expiry and eviction
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    created_at: Instant,
    last_accessed_at: Instant,
    hit_count: u64,
    /// Monotonic insert sequence, the final tie-break for eviction order
    insertion_order: u64,
    features: Option<FeatureVector>,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created_at) >= ttl
    }

    fn record_hit(&mut self, now: Instant) {
        self.hit_count += 1;
        self.last_accessed_at = now;
    }

    fn metadata(&self) -> EntryMetadata {
        EntryMetadata {
            created_at: self.created_at,
            last_accessed_at: self.last_accessed_at,
            hit_count: self.hit_count,
        }
    }
}

/// Bookkeeping for one entry, read without counting a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMetadata {
    pub created_at: Instant,
    /// Insert time until the first hit, then the time of the latest hit
    pub last_accessed_at: Instant,
    pub hit_count: u64,
}

/// Internal storage for cache entries
#[derive(Debug)]
struct CacheStorage<V> {
    entries: HashMap<String, CacheEntry<V>>,
    next_order: u64,
}

impl<V> CacheStorage<V> {
    fn new() -> Self {
        Self { entries: HashMap::new(), next_order: 0 }
    }

    fn purge_expired(&mut self, now: Instant, ttl: Duration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now, ttl));
        before - self.entries.len()
    }

    /// Remove up to `n` entries in eviction order, never touching `protected`
    fn evict_ranked(&mut self, n: usize, policy: EvictionPolicy, protected: Option<&str>) -> usize {
        if n == 0 {
            return 0;
        }

        let mut candidates: Vec<(&String, &CacheEntry<V>)> =
            self.entries.iter().filter(|(key, _)| Some(key.as_str()) != protected).collect();

        match policy {
            EvictionPolicy::LeastHitCount => candidates.sort_by(|(_, a), (_, b)| {
                (a.hit_count, a.created_at, a.insertion_order).cmp(&(
                    b.hit_count,
                    b.created_at,
                    b.insertion_order,
                ))
            }),
            EvictionPolicy::Fifo => candidates.sort_by(|(_, a), (_, b)| {
                (a.created_at, a.insertion_order).cmp(&(b.created_at, b.insertion_order))
            }),
        }

        let victims: Vec<String> =
            candidates.into_iter().take(n).map(|(key, _)| key.clone()).collect();
        for key in &victims {
            self.entries.remove(key);
        }
        victims.len()
    }

    fn average_hit_count(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let total: u64 = self.entries.values().map(|entry| entry.hit_count).sum();
        total as f64 / self.entries.len() as f64
    }
}

/// Thread-safe, time-aware cache store
///
/// Entries expire once `now - created_at >= ttl`. Bounded stores evict a
/// batch of the lowest-priority entries whenever an insert pushes them past
/// `max_entries`. Similarity stores additionally keep a [`FeatureVector`] per
/// entry and answer [`get_similar`](Self::get_similar) lookups with the best
/// match above the configured threshold.
///
/// Cloning a store is cheap; clones share the same entries and counters.
///
/// # Type Parameters
/// - `V`: Value type, cloned out on every hit (wrap large values in `Arc`)
/// - `C`: Clock type for time-based operations (defaults to `SystemClock`)
///
/// # Example
/// ```
/// use std::time::Duration;
///
/// use predcache_common::cache::{CacheConfig, CacheStore};
///
/// let cache: CacheStore<i32> = CacheStore::new(CacheConfig::bounded(Duration::from_secs(60), 100))?;
/// cache.set("key", 42);
/// assert_eq!(cache.get("key"), Some(42));
/// # Ok::<(), predcache_common::cache::CacheError>(())
/// ```
pub struct CacheStore<V, C = SystemClock>
where
    V: Clone,
    C: Clock,
{
    storage: Arc<RwLock<CacheStorage<V>>>,
    config: CacheConfig,
    metrics: MetricsCollector,
    clock: C,
}

impl<V> CacheStore<V, SystemClock>
where
    V: Clone,
{
    /// Create a new store with the given configuration using the system clock
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: CacheConfig) -> Result<Self, CacheError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<V, C> CacheStore<V, C>
where
    V: Clone,
    C: Clock + Clone,
{
    /// Create a new store with a custom clock (useful for testing)
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidConfig`] if the configuration is invalid.
    pub fn with_clock(config: CacheConfig, clock: C) -> Result<Self, CacheError> {
        config.validate()?;
        Ok(Self {
            storage: Arc::new(RwLock::new(CacheStorage::new())),
            config,
            metrics: MetricsCollector::new(),
            clock,
        })
    }

    /// Configuration this store was built with
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Name used in logs and reports
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Look up a value by exact key
    ///
    /// Returns `None` if the key is absent or its entry has expired; an
    /// expired entry is removed on the spot. A hit increments the entry's hit
    /// count.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut storage = self.storage.write();

        let expired = match storage.entries.get(key) {
            None => {
                self.metrics.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired(now, self.config.ttl),
        };

        if expired {
            storage.entries.remove(key);
            self.metrics.record_expirations(1);
            self.metrics.record_miss();
            return None;
        }

        let entry = storage.entries.get_mut(key)?;
        entry.record_hit(now);
        self.metrics.record_hit();
        Some(entry.value.clone())
    }

    /// Look up the best match for a feature vector using the configured
    /// similarity threshold
    pub fn get_similar(&self, features: &FeatureVector) -> Option<V> {
        self.get_similar_with_threshold(features, self.config.similarity_threshold())
    }

    /// Look up the best match for a feature vector
    ///
    /// Scans every entry that carries a feature vector of the same length and
    /// returns the one with the highest similarity score, provided it is at
    /// least `threshold`. Equal scores resolve to the earliest inserted
    /// entry. Expired entries met during the scan are removed. The matched
    /// entry's hit count is incremented.
    ///
    /// A threshold that is not finite or lies outside `(0, 1]` matches
    /// nothing.
    pub fn get_similar_with_threshold(&self, features: &FeatureVector, threshold: f64) -> Option<V> {
        if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
            warn!(cache = %self.config.name, threshold, "similarity threshold out of range");
            self.metrics.record_miss();
            return None;
        }

        let now = self.clock.now();
        let ttl = self.config.ttl;
        let mut storage = self.storage.write();

        let mut expired = Vec::new();
        let mut best: Option<(&String, f64, u64)> = None;
        for (key, entry) in &storage.entries {
            let Some(stored) = entry.features.as_ref() else {
                continue;
            };
            if entry.is_expired(now, ttl) {
                expired.push(key.clone());
                continue;
            }
            let Some(score) = stored.similarity(features) else {
                continue;
            };
            if score < threshold {
                continue;
            }
            let better = match best {
                None => true,
                Some((_, best_score, best_order)) => {
                    score > best_score || (score == best_score && entry.insertion_order < best_order)
                }
            };
            if better {
                best = Some((key, score, entry.insertion_order));
            }
        }
        let best = best.map(|(key, score, _)| (key.clone(), score));

        if !expired.is_empty() {
            for key in &expired {
                storage.entries.remove(key);
            }
            self.metrics.record_expirations(expired.len());
        }

        let Some((key, score)) = best else {
            self.metrics.record_miss();
            return None;
        };

        let entry = storage.entries.get_mut(&key)?;
        entry.record_hit(now);
        self.metrics.record_hit();
        debug!(cache = %self.config.name, key = %key, score, "similarity hit");
        Some(entry.value.clone())
    }

    /// Insert or overwrite an entry
    ///
    /// The entry starts with `created_at = now` and a hit count of zero. If
    /// the insert pushes a bounded store past `max_entries`, eviction runs
    /// before this returns.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.insert_entry(key.into(), value, None);
    }

    /// Insert or overwrite an entry that carries a feature vector
    pub fn set_with_features(&self, key: impl Into<String>, value: V, features: FeatureVector) {
        self.insert_entry(key.into(), value, Some(features));
    }

    /// Insert a similarity entry keyed by its feature vector
    ///
    /// Returns the derived key.
    pub fn insert_similar(&self, features: FeatureVector, value: V) -> String {
        let key = features.cache_key();
        self.insert_entry(key.clone(), value, Some(features));
        key
    }

    fn insert_entry(&self, key: String, value: V, features: Option<FeatureVector>) {
        let now = self.clock.now();
        let mut storage = self.storage.write();

        let insertion_order = storage.next_order;
        storage.next_order += 1;
        storage.entries.insert(
            key.clone(),
            CacheEntry {
                value,
                created_at: now,
                last_accessed_at: now,
                hit_count: 0,
                insertion_order,
                features,
            },
        );
        self.metrics.record_insert();

        self.enforce_capacity(&mut storage, &key, now);
    }

    /// Bring a bounded store back within `max_entries`
    ///
    /// Expired entries go first. If the store is still over capacity, a batch
    /// of `max(eviction_batch_size, overflow)` entries is evicted by policy.
    /// The entry just written is never a candidate.
    fn enforce_capacity(&self, storage: &mut CacheStorage<V>, inserted: &str, now: Instant) {
        let Some(max_entries) = self.config.max_entries else {
            return;
        };
        if storage.entries.len() <= max_entries {
            return;
        }

        let expired = storage.purge_expired(now, self.config.ttl);
        if expired > 0 {
            self.metrics.record_expirations(expired);
        }
        if storage.entries.len() <= max_entries {
            return;
        }

        let overflow = storage.entries.len() - max_entries;
        let batch = self.config.effective_batch_size().unwrap_or(1).max(overflow);
        let evicted = storage.evict_ranked(batch, self.config.eviction_policy, Some(inserted));
        self.metrics.record_evictions(evicted);

        debug!(
            cache = %self.config.name,
            evicted,
            expired,
            size = storage.entries.len(),
            "capacity eviction"
        );
    }

    /// Remove every expired entry
    ///
    /// Returns the number of entries removed.
    pub fn evict_expired(&self) -> usize {
        let now = self.clock.now();
        let removed = self.storage.write().purge_expired(now, self.config.ttl);
        if removed > 0 {
            self.metrics.record_expirations(removed);
            debug!(cache = %self.config.name, removed, "expired entries swept");
        }
        removed
    }

    /// Remove the `n` least valuable entries
    ///
    /// Ranking follows the configured policy: lowest hit count first (oldest
    /// `created_at` on ties) for [`EvictionPolicy::LeastHitCount`], oldest
    /// first for [`EvictionPolicy::Fifo`]. Insertion order breaks any
    /// remaining tie. Returns the number of entries removed.
    pub fn evict_least_valuable(&self, n: usize) -> usize {
        let evicted = self.storage.write().evict_ranked(n, self.config.eviction_policy, None);
        self.metrics.record_evictions(evicted);
        evicted
    }

    /// Remove a value from the store
    pub fn remove(&self, key: &str) -> Option<V> {
        self.storage.write().entries.remove(key).map(|entry| entry.value)
    }

    /// Drop every entry and reset the counters
    pub fn clear(&self) {
        self.storage.write().entries.clear();
        self.metrics.reset();
    }

    /// Number of stored entries, including expired ones not yet swept
    pub fn len(&self) -> usize {
        self.storage.read().entries.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a live entry exists for `key`, without counting a hit
    pub fn contains_key(&self, key: &str) -> bool {
        let now = self.clock.now();
        self.storage
            .read()
            .entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(now, self.config.ttl))
    }

    /// Metadata of a live entry, without counting a hit
    pub fn entry_metadata(&self, key: &str) -> Option<EntryMetadata> {
        let now = self.clock.now();
        self.storage
            .read()
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired(now, self.config.ttl))
            .map(CacheEntry::metadata)
    }

    /// Snapshot of size, average hit count and lifetime counters
    pub fn stats(&self) -> CacheStats {
        let storage = self.storage.read();
        self.metrics.snapshot(
            storage.entries.len(),
            self.config.max_entries,
            storage.average_hit_count(),
        )
    }

    /// Get or insert with a generator function
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    ///
    /// use predcache_common::cache::{CacheConfig, CacheStore};
    ///
    /// let cache: CacheStore<i32> = CacheStore::new(CacheConfig::ttl(Duration::from_secs(60)))?;
    /// assert_eq!(cache.get_or_insert_with("key", || 42), 42);
    /// assert_eq!(cache.get_or_insert_with("key", || 7), 42);
    /// # Ok::<(), predcache_common::cache::CacheError>(())
    /// ```
    pub fn get_or_insert_with<F>(&self, key: &str, f: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(key) {
            return value;
        }

        let value = f();
        self.set(key, value.clone());
        value
    }

    /// Get or insert with a fallible generator function
    ///
    /// A producer error is returned unchanged and nothing is stored.
    pub fn get_or_try_insert_with<F, E>(&self, key: &str, f: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        let value = f()?;
        self.set(key, value.clone());
        Ok(value)
    }
}

impl<V, C> Clone for CacheStore<V, C>
where
    V: Clone,
    C: Clock + Clone,
{
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            config: self.config.clone(),
            metrics: self.metrics.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<V, C> std::fmt::Debug for CacheStore<V, C>
where
    V: Clone,
    C: Clock,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("name", &self.config.name)
            .field("len", &self.storage.read().entries.len())
            .finish()
    }
}
