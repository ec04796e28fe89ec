//! Shared building blocks for the prediction cache crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: serialization and hashing dependencies
//! - `runtime`: the cache engine, clocks and intervals
//! - `observability`: tracing output from runtime modules

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod cache;
#[cfg(feature = "runtime")]
pub mod time;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use cache::{CacheConfig, CacheError, CacheStats, CacheStore, FeatureVector, KeyStrategy};
#[cfg(feature = "runtime")]
pub use time::{Clock, MockClock, SystemClock};
