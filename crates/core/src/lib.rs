//! # Predcache Core
//!
//! Caching services - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for the expensive operations being cached
//! - Response, query, prediction and precompute caching services
//! - Conversion from configuration settings to engine configuration
//!
//! ## Architecture Principles
//! - Only depends on `predcache-common` and `predcache-domain`
//! - No HTTP, database or model code
//! - All producers via traits

pub mod caching;

pub use caching::ports::{PredictionModel, Producer};
pub use caching::{
    CacheService, Fetched, PrecomputeService, PredictionOutcome, PredictionService, QueryCache,
    ResponseCache, WarmReport,
};
