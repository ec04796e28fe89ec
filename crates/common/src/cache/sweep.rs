//! Object-safe view of a cache for periodic expiry sweeps

use super::{CacheStats, CacheStore};
use crate::time::Clock;

/// A cache the janitor can sweep
///
/// Implemented by every [`CacheStore`] so stores with different value types
/// can be registered side by side as `Arc<dyn Sweepable>`.
pub trait Sweepable: Send + Sync {
    /// Name used in sweep logs
    fn cache_name(&self) -> &str;

    /// Remove expired entries, returning how many were removed
    fn sweep_expired(&self) -> usize;

    /// Current number of stored entries
    fn entry_count(&self) -> usize;

    /// Snapshot of the cache's counters
    fn stats(&self) -> CacheStats;
}

impl<V, C> Sweepable for CacheStore<V, C>
where
    V: Clone + Send + Sync,
    C: Clock + Clone,
{
    fn cache_name(&self) -> &str {
        self.name()
    }

    fn sweep_expired(&self) -> usize {
        self.evict_expired()
    }

    fn entry_count(&self) -> usize {
        self.len()
    }

    fn stats(&self) -> CacheStats {
        CacheStore::stats(self)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::cache::CacheConfig;
    use crate::time::MockClock;

    /// Validates sweeping stores of different value types through one list.
    ///
    /// Assertions:
    /// - Confirms each store reports its own name.
    /// - Confirms a sweep after the TTL empties both stores.
    #[test]
    fn test_sweep_heterogeneous_stores() {
        let clock = MockClock::new();
        let numbers: CacheStore<i32, MockClock> = CacheStore::with_clock(
            CacheConfig::builder().name("numbers").ttl(Duration::from_secs(1)).build(),
            clock.clone(),
        )
        .unwrap();
        let words: CacheStore<String, MockClock> = CacheStore::with_clock(
            CacheConfig::builder().name("words").ttl(Duration::from_secs(1)).build(),
            clock.clone(),
        )
        .unwrap();
        numbers.set("a", 1);
        words.set("b", "two".to_string());

        let caches: Vec<Arc<dyn Sweepable>> = vec![Arc::new(numbers), Arc::new(words)];
        assert_eq!(caches[0].cache_name(), "numbers");
        assert_eq!(caches[1].cache_name(), "words");

        clock.advance(Duration::from_secs(1));
        let removed: usize = caches.iter().map(|cache| cache.sweep_expired()).sum();
        assert_eq!(removed, 2);
        assert!(caches.iter().all(|cache| cache.entry_count() == 0));
        assert!(caches.iter().all(|cache| cache.stats().expirations == 1));
    }
}
