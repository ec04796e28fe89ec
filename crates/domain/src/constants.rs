//! Domain constants
//!
//! Default lifetimes and capacities for each cache purpose, and the
//! defaults of the ML service and janitor.

// Response cache: transient, pure TTL
pub const RESPONSE_CACHE_TTL_SECS: u64 = 300;

// Query cache: bounded, least-hit-count eviction
pub const QUERY_CACHE_TTL_SECS: u64 = 600;
pub const QUERY_CACHE_MAX_ENTRIES: usize = 1_000;

// Prediction cache: similarity-keyed feature vectors
pub const PREDICTION_CACHE_TTL_SECS: u64 = 3_600;
pub const PREDICTION_CACHE_MAX_ENTRIES: usize = 1_000;
pub const PREDICTION_SIMILARITY_THRESHOLD: f64 = 0.95;

// Precompute cache: predictions warmed ahead of kickoff
pub const PRECOMPUTE_CACHE_TTL_SECS: u64 = 21_600;
pub const PRECOMPUTE_CACHE_MAX_ENTRIES: usize = 500;

// Janitor
pub const JANITOR_INTERVAL_SECS: u64 = 300;

// ML service
pub const ML_SERVICE_BASE_URL: &str = "http://localhost:8000";
pub const ML_SERVICE_TIMEOUT_MS: u64 = 5_000;
pub const ML_SERVICE_MAX_ATTEMPTS: u32 = 3;

// Logging
pub const DEFAULT_LOG_LEVEL: &str = "info";
