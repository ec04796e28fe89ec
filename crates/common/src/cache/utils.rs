//! Cache health reports and metrics reporting
//!
//! Observability surfaces consume these; the store itself never decides
//! anything based on them.

use std::fmt;

#[cfg(feature = "observability")]
use tracing::{info, warn};

use super::{CacheStats, CacheStore};
use crate::time::Clock;

/// Hit rate below which a cache with enough traffic is flagged
const LOW_HIT_RATE: f64 = 0.5;

/// Accesses required before the hit rate is judged
const MIN_ACCESSES_FOR_HIT_RATE: u64 = 100;

/// Fill ratio above which a bounded cache is flagged
const NEAR_CAPACITY: f64 = 0.85;

/// Cache health status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheHealth {
    /// Cache is operating normally
    Healthy,
    /// Cache hit rate is low, consider tuning
    LowHitRate,
    /// Cache is nearly full, consider increasing `max_entries`
    NearCapacity,
    /// Cache has both low hit rate and near capacity
    Critical,
}

impl fmt::Display for CacheHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "Healthy"),
            Self::LowHitRate => write!(f, "Low Hit Rate"),
            Self::NearCapacity => write!(f, "Near Capacity"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// Cache health report with diagnostics
#[derive(Debug, Clone)]
pub struct CacheHealthReport {
    /// Name of the reported cache
    pub cache_name: String,
    /// Overall health status
    pub health: CacheHealth,
    /// Current cache statistics
    pub stats: CacheStats,
    /// Recommendations for tuning
    pub recommendations: Vec<String>,
}

impl CacheHealthReport {
    /// Generate a health report for a store
    ///
    /// # Thresholds
    /// - Low hit rate: < 50% after more than 100 accesses
    /// - Near capacity: > 85% full
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    ///
    /// use predcache_common::cache::utils::{CacheHealth, CacheHealthReport};
    /// use predcache_common::cache::{CacheConfig, CacheStore};
    ///
    /// let cache: CacheStore<i32> = CacheStore::new(CacheConfig::bounded(Duration::from_secs(60), 100))?;
    /// let report = CacheHealthReport::new(&cache);
    /// assert_eq!(report.health, CacheHealth::Healthy);
    /// # Ok::<(), predcache_common::cache::CacheError>(())
    /// ```
    pub fn new<V, C>(cache: &CacheStore<V, C>) -> Self
    where
        V: Clone,
        C: Clock + Clone,
    {
        Self::from_stats(cache.name(), cache.stats())
    }

    /// Generate a health report from a statistics snapshot
    pub fn from_stats(cache_name: impl Into<String>, stats: CacheStats) -> Self {
        let mut recommendations = Vec::new();

        let low_hit_rate =
            stats.hit_rate() < LOW_HIT_RATE && stats.total_accesses() > MIN_ACCESSES_FOR_HIT_RATE;
        if low_hit_rate {
            recommendations.push(format!(
                "Hit rate is {:.2}%. Consider a longer TTL or a looser similarity threshold.",
                stats.hit_rate() * 100.0
            ));
        }

        let fill = stats.fill_percentage().filter(|fill| *fill > NEAR_CAPACITY);
        let near_capacity = fill.is_some();
        if let Some(fill) = fill {
            recommendations.push(format!(
                "Cache is {:.1}% full. Consider increasing max_entries.",
                fill * 100.0
            ));
        }

        if stats.inserts > 0 {
            let eviction_rate = stats.evictions as f64 / stats.inserts as f64;
            if eviction_rate > 0.2 {
                recommendations.push(format!(
                    "High eviction rate: {:.2}% of inserts. Cache may be too small for workload.",
                    eviction_rate * 100.0
                ));
            }
        }

        if stats.total_accesses() > 0 {
            let expiration_rate = stats.expirations as f64 / stats.total_accesses() as f64;
            if expiration_rate > 0.3 {
                recommendations.push(format!(
                    "High expiration rate: {:.2}%. Consider increasing TTL.",
                    expiration_rate * 100.0
                ));
            }
        }

        let health = match (low_hit_rate, near_capacity) {
            (true, true) => CacheHealth::Critical,
            (true, false) => CacheHealth::LowHitRate,
            (false, true) => CacheHealth::NearCapacity,
            (false, false) => CacheHealth::Healthy,
        };

        Self { cache_name: cache_name.into(), health, stats, recommendations }
    }

    /// Log the health report using tracing (requires `observability` feature)
    #[cfg(feature = "observability")]
    pub fn log(&self) {
        match self.health {
            CacheHealth::Healthy => {
                info!(
                    cache = %self.cache_name,
                    health = %self.health,
                    hit_rate = self.stats.hit_rate(),
                    size = self.stats.size,
                    "Cache health check: Healthy"
                );
            }
            CacheHealth::LowHitRate | CacheHealth::NearCapacity | CacheHealth::Critical => {
                warn!(
                    cache = %self.cache_name,
                    health = %self.health,
                    hit_rate = self.stats.hit_rate(),
                    size = self.stats.size,
                    max_entries = ?self.stats.max_entries,
                    "Cache health check: Issues detected"
                );
                for rec in &self.recommendations {
                    warn!(cache = %self.cache_name, recommendation = %rec, "Cache tuning recommendation");
                }
            }
        }
    }
}

impl fmt::Display for CacheHealthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cache Health Report: {}", self.cache_name)?;
        writeln!(f, "===================")?;
        writeln!(f, "Status: {}", self.health)?;
        writeln!(f)?;
        writeln!(f, "Statistics:")?;
        writeln!(f, "  Size: {}/{:?}", self.stats.size, self.stats.max_entries)?;
        writeln!(f, "  Average Hit Count: {:.2}", self.stats.average_hit_count)?;
        writeln!(f, "  Hits: {}", self.stats.hits)?;
        writeln!(f, "  Misses: {}", self.stats.misses)?;
        writeln!(f, "  Hit Rate: {:.2}%", self.stats.hit_rate() * 100.0)?;
        writeln!(f, "  Evictions: {}", self.stats.evictions)?;
        writeln!(f, "  Expirations: {}", self.stats.expirations)?;
        if let Some(fill_pct) = self.stats.fill_percentage() {
            writeln!(f, "  Fill: {:.1}%", fill_pct * 100.0)?;
        }

        if !self.recommendations.is_empty() {
            writeln!(f)?;
            writeln!(f, "Recommendations:")?;
            for (i, rec) in self.recommendations.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, rec)?;
            }
        }

        Ok(())
    }
}

/// Cache metrics reporter for periodic monitoring
pub struct MetricsReporter {
    cache_name: String,
}

impl MetricsReporter {
    /// Create a new metrics reporter
    pub fn new(cache_name: impl Into<String>) -> Self {
        Self { cache_name: cache_name.into() }
    }

    /// Report current cache metrics using tracing (requires `observability`
    /// feature)
    #[cfg(feature = "observability")]
    pub fn report(&self, stats: &CacheStats) {
        info!(
            cache = %self.cache_name,
            size = stats.size,
            max_entries = ?stats.max_entries,
            average_hit_count = stats.average_hit_count,
            hits = stats.hits,
            misses = stats.misses,
            hit_rate = format!("{:.2}%", stats.hit_rate() * 100.0),
            evictions = stats.evictions,
            expirations = stats.expirations,
            "Cache metrics report"
        );
    }

    /// Report metrics in JSON format (for structured logging)
    pub fn report_json(&self, stats: &CacheStats) -> serde_json::Value {
        serde_json::json!({
            "cache_name": self.cache_name,
            "size": stats.size,
            "max_entries": stats.max_entries,
            "average_hit_count": stats.average_hit_count,
            "hits": stats.hits,
            "misses": stats.misses,
            "hit_rate": stats.hit_rate(),
            "miss_rate": stats.miss_rate(),
            "inserts": stats.inserts,
            "evictions": stats.evictions,
            "expirations": stats.expirations,
            "total_accesses": stats.total_accesses(),
            "fill_percentage": stats.fill_percentage(),
        })
    }
}
