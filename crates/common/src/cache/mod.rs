//! Generic prediction/response cache with TTL expiry, batch capacity
//! eviction and similarity lookup
//!
//! One parameterized [`CacheStore`] serves every call site: pure TTL response
//! caches, bounded query caches and similarity-keyed prediction caches all
//! differ only in their [`CacheConfig`].
//!
//! # Features
//!
//! - **Thread-safe**: a single `parking_lot::RwLock` guards every
//!   read-modify-write, so the capacity bound holds under real threads
//! - **Generic**: any `V: Clone` value, typically `Arc<T>` for large payloads
//! - **Key strategies**: exact canonical-JSON hashing or feature-vector
//!   similarity with best-match lookup
//! - **Batch eviction**: overflow purges expired entries, then evicts a batch
//!   by least hit count or FIFO
//! - **Testable**: clock abstraction for deterministic TTL tests
//!
//! # Examples
//!
//! ## Exact-key response cache
//! ```
//! use std::time::Duration;
//!
//! use predcache_common::cache::{exact_key, CacheConfig, CacheStore};
//! use serde_json::json;
//!
//! let cache: CacheStore<String> = CacheStore::new(CacheConfig::ttl(Duration::from_secs(300)))?;
//! let key = exact_key("response", &json!({"path": "/matches", "league": "EPL"}))?;
//! cache.set(key.clone(), "payload".to_string());
//! assert_eq!(cache.get(&key), Some("payload".to_string()));
//! # Ok::<(), predcache_common::cache::CacheError>(())
//! ```
//!
//! ## Similarity prediction cache
//! ```
//! use std::time::Duration;
//!
//! use predcache_common::cache::{CacheConfig, CacheStore, FeatureVector};
//!
//! let cache: CacheStore<f64> =
//!     CacheStore::new(CacheConfig::similarity(Duration::from_secs(3600), 1000, 0.95))?;
//! cache.insert_similar(FeatureVector::new(vec![0.7, 0.65, 0.6])?, 0.42);
//!
//! let near = FeatureVector::new(vec![0.71, 0.64, 0.6])?;
//! assert_eq!(cache.get_similar(&near), Some(0.42));
//! # Ok::<(), predcache_common::cache::CacheError>(())
//! ```
//!
//! ## Cache Statistics
//! ```
//! use std::time::Duration;
//!
//! use predcache_common::cache::{CacheConfig, CacheStore};
//!
//! let cache: CacheStore<i32> = CacheStore::new(CacheConfig::bounded(Duration::from_secs(60), 100))?;
//! cache.set("key1", 1);
//! let _ = cache.get("key1");
//!
//! let stats = cache.stats();
//! assert_eq!(stats.size, 1);
//! assert_eq!(stats.average_hit_count, 1.0);
//! # Ok::<(), predcache_common::cache::CacheError>(())
//! ```

mod config;
mod core;
mod error;
mod key;
mod stats;
mod sweep;
pub mod utils;

// Re-export public API
pub use core::{CacheStore, EntryMetadata};

pub use config::{
    CacheConfig, CacheConfigBuilder, EvictionPolicy, DEFAULT_EVICTION_FRACTION,
    DEFAULT_SIMILARITY_THRESHOLD,
};
pub use error::CacheError;
pub use key::{canonical_json, exact_key, similarity, FeatureVector, KeyStrategy};
pub use stats::CacheStats;
pub use sweep::Sweepable;
