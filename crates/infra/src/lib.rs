//! # Predcache Infrastructure
//!
//! Infrastructure implementations of core ports and process wiring.
//!
//! This crate contains:
//! - Configuration loading (environment, `.env`, TOML/JSON files)
//! - Tracing subscriber setup
//! - HTTP client with retry, and the ML service client
//! - The janitor sweeping expired cache entries
//! - The dependency-injection context tying it together
//!
//! ## Architecture
//! - Implements traits defined in `predcache-core`
//! - Depends on `predcache-common`, `predcache-domain` and `predcache-core`
//! - Contains all "impure" code (I/O, timers, network)

pub mod config;
pub mod context;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod observability;
pub mod scheduling;

// Re-export commonly used items
pub use context::CacheContext;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::MlServiceClient;
pub use observability::init_tracing;
pub use scheduling::{Janitor, SchedulerError, SchedulerResult, SweepReport};
