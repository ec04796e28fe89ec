//! Port interfaces for the expensive operations caches sit in front of
//!
//! These traits define the boundaries between the caching services and the
//! infrastructure that actually computes values.

use async_trait::async_trait;
use predcache_domain::{PredictionRequest, PredictionResult, Result};

/// Trait for the ML model that scores a match
#[async_trait]
pub trait PredictionModel: Send + Sync {
    /// Predict outcome probabilities for one match
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult>;
}

/// Trait for any producer a cache can wrap (database query, HTTP call)
///
/// Producers must be idempotent enough that serving a cached result in
/// place of a fresh call is safe.
#[async_trait]
pub trait Producer<Req, V>: Send + Sync
where
    Req: Sync + ?Sized,
{
    /// Compute the value for `request`
    async fn produce(&self, request: &Req) -> Result<V>;
}
