//! Caching services layered over the cache engine
//!
//! Each service owns its own store. There is no shared global cache.

pub mod ports;
pub mod precompute;
pub mod prediction;
pub mod query;
pub mod response;
pub mod service;
pub mod settings;

pub use ports::{PredictionModel, Producer};
pub use precompute::{PrecomputeService, WarmReport, PRECOMPUTE_CACHE, WARM_CONCURRENCY};
pub use prediction::{PredictionOutcome, PredictionService, PREDICTION_CACHE};
pub use query::{QueryCache, QUERY_CACHE};
pub use response::{ResponseCache, RESPONSE_CACHE};
pub use service::{CacheService, Fetched};
pub use settings::{cache_error, exact_cache_config, similarity_cache_config};
