//! Cache statistics and metrics tracking
//!
//! [`CacheStats`] is the snapshot surfaced by `CacheStore::stats`; the
//! lifetime counters live in a lock-free [`MetricsCollector`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Statistics for cache performance monitoring
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    /// Current number of entries
    pub size: usize,

    /// Maximum allowed entries (None = unbounded)
    pub max_entries: Option<usize>,

    /// Mean hit count across stored entries, 0.0 when empty
    pub average_hit_count: f64,

    /// Total number of successful lookups
    pub hits: u64,

    /// Total number of failed lookups (absent, expired or no similar entry)
    pub misses: u64,

    /// Total number of insert operations
    pub inserts: u64,

    /// Total number of entries removed by capacity eviction
    pub evictions: u64,

    /// Total number of expired entries removed
    pub expirations: u64,
}

impl CacheStats {
    /// Calculate hit rate (hits / total accesses)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Calculate miss rate (misses / total accesses)
    pub fn miss_rate(&self) -> f64 {
        if self.total_accesses() == 0 {
            0.0
        } else {
            1.0 - self.hit_rate()
        }
    }

    /// Calculate fill percentage (size / max_entries)
    pub fn fill_percentage(&self) -> Option<f64> {
        self.max_entries.map(|max| if max == 0 { 0.0 } else { self.size as f64 / max as f64 })
    }

    /// Total number of access operations (hits + misses)
    pub fn total_accesses(&self) -> u64 {
        self.hits + self.misses
    }
}

/// Thread-safe metrics collector for cache operations
#[derive(Debug)]
pub(crate) struct MetricsCollector {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    inserts: Arc<AtomicU64>,
    evictions: Arc<AtomicU64>,
    expirations: Arc<AtomicU64>,
}

impl Clone for MetricsCollector {
    fn clone(&self) -> Self {
        Self {
            hits: Arc::clone(&self.hits),
            misses: Arc::clone(&self.misses),
            inserts: Arc::clone(&self.inserts),
            evictions: Arc::clone(&self.evictions),
            expirations: Arc::clone(&self.expirations),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    pub(crate) fn new() -> Self {
        Self {
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            inserts: Arc::new(AtomicU64::new(0)),
            evictions: Arc::new(AtomicU64::new(0)),
            expirations: Arc::new(AtomicU64::new(0)),
        }
    }

    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_evictions(&self, count: usize) {
        self.evictions.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_expirations(&self, count: usize) {
        self.expirations.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Get current statistics snapshot
    pub(crate) fn snapshot(
        &self,
        size: usize,
        max_entries: Option<usize>,
        average_hit_count: f64,
    ) -> CacheStats {
        CacheStats {
            size,
            max_entries,
            average_hit_count,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
        }
    }

    /// Reset all metrics to zero
    pub(crate) fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.inserts.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        self.expirations.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for cache::stats.
    use super::*;

    /// Validates `CacheStats::default` behavior for the cache stats default
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `stats.size` equals `0`.
    /// - Confirms `stats.average_hit_count` equals `0.0`.
    /// - Confirms rates are `0.0` with no accesses.
    #[test]
    fn test_cache_stats_default() {
        let stats = CacheStats::default();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.average_hit_count, 0.0);
        assert_eq!(stats.hit_rate(), 0.0);
        assert_eq!(stats.miss_rate(), 0.0);
        assert!(stats.fill_percentage().is_none());
    }

    /// Validates hit and fill ratios.
    ///
    /// Assertions:
    /// - Ensures `(stats.hit_rate() - 0.8).abs() < 1e-10` evaluates to true.
    /// - Confirms `stats.total_accesses()` equals `100`.
    /// - Confirms the fill percentage is `0.5`.
    #[test]
    fn test_rates() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            size: 50,
            max_entries: Some(100),
            ..Default::default()
        };

        assert!((stats.hit_rate() - 0.8).abs() < 1e-10);
        assert!((stats.miss_rate() - 0.2).abs() < 1e-10);
        assert_eq!(stats.total_accesses(), 100);
        assert_eq!(stats.fill_percentage(), Some(0.5));
    }

    /// Validates `MetricsCollector` counting, sharing and reset.
    ///
    /// Assertions:
    /// - Confirms counters recorded through a clone show in the original.
    /// - Confirms `reset` zeroes every counter.
    #[test]
    fn test_metrics_collector() {
        let collector = MetricsCollector::new();
        let shared = collector.clone();

        shared.record_hit();
        shared.record_miss();
        shared.record_insert();
        shared.record_evictions(3);
        shared.record_expirations(2);

        let snapshot = collector.snapshot(4, Some(10), 1.5);
        assert_eq!(snapshot.hits, 1);
        assert_eq!(snapshot.misses, 1);
        assert_eq!(snapshot.inserts, 1);
        assert_eq!(snapshot.evictions, 3);
        assert_eq!(snapshot.expirations, 2);
        assert_eq!(snapshot.average_hit_count, 1.5);

        collector.reset();
        let snapshot = collector.snapshot(0, None, 0.0);
        assert_eq!(snapshot, CacheStats::default());
    }
}
