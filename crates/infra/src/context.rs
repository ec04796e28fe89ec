//! Cache context - dependency injection container
//!
//! Builds the four caching services from [`Config`], registers their stores
//! with one janitor and owns the janitor's lifecycle.

use std::sync::Arc;
use std::time::Duration;

use predcache_common::cache::utils::CacheHealthReport;
use predcache_core::{
    PrecomputeService, PredictionModel, PredictionService, QueryCache, ResponseCache,
};
use predcache_domain::{Config, PredCacheError, Result};
use serde_json::Value;

use crate::integrations::MlServiceClient;
use crate::scheduling::{Janitor, SweepReport};

/// Fail-fast bound on janitor start
const START_TIMEOUT: Duration = Duration::from_secs(10);

/// Holds every cache service and the janitor sweeping them
pub struct CacheContext {
    pub config: Config,
    pub response: ResponseCache,
    pub query: QueryCache<Arc<Value>>,
    pub prediction: Arc<PredictionService>,
    pub precompute: Arc<PrecomputeService>,
    janitor: Janitor,
}

impl CacheContext {
    /// Build the context with the HTTP ML service client as the model
    ///
    /// # Errors
    /// Returns `PredCacheError::Config` for invalid configuration and
    /// `PredCacheError::Network` if the HTTP client cannot be built.
    pub fn from_config(config: Config) -> Result<Self> {
        let model: Arc<dyn PredictionModel> = Arc::new(MlServiceClient::new(&config.ml_service)?);
        Self::new(config, model)
    }

    /// Build the context around any prediction model
    ///
    /// # Errors
    /// Returns `PredCacheError::Config` for invalid configuration.
    pub fn new(config: Config, model: Arc<dyn PredictionModel>) -> Result<Self> {
        config.validate()?;

        let caches = &config.caches;
        let response = ResponseCache::new(&caches.response)?;
        let query = QueryCache::new(&caches.query)?;
        let prediction = Arc::new(PredictionService::new(&caches.prediction, Arc::clone(&model))?);
        let precompute = Arc::new(PrecomputeService::new(&caches.precompute, model)?);

        // A disabled janitor is never started; its interval only has to be valid
        let interval = Duration::from_secs(config.janitor.interval_seconds.max(1));
        let mut janitor = Janitor::new(interval)?.with_jitter(config.janitor.jitter());
        janitor.register(response.service().sweepable());
        janitor.register(query.service().sweepable());
        janitor.register(prediction.service().sweepable());
        janitor.register(precompute.service().sweepable());

        tracing::info!(
            janitor_enabled = config.janitor.enabled,
            janitor_interval_secs = interval.as_secs(),
            "Cache context initialised"
        );

        Ok(Self { config, response, query, prediction, precompute, janitor })
    }

    /// Start the janitor if it is enabled
    ///
    /// # Errors
    /// Returns `PredCacheError::Timeout` if the janitor does not start in
    /// time and `PredCacheError::InvalidInput` if it is already running.
    pub async fn start(&mut self) -> Result<()> {
        if !self.config.janitor.enabled {
            tracing::info!("Janitor disabled, caches rely on lazy expiry");
            return Ok(());
        }

        tokio::time::timeout(START_TIMEOUT, self.janitor.start())
            .await
            .map_err(|_| {
                tracing::error!(timeout_secs = START_TIMEOUT.as_secs(), "Janitor start timed out");
                PredCacheError::Timeout("janitor start timed out".into())
            })?
            .map_err(PredCacheError::from)
    }

    /// Stop the janitor if it is running
    ///
    /// # Errors
    /// Returns an error if the janitor task does not shut down cleanly.
    pub async fn shutdown(&mut self) -> Result<()> {
        if self.janitor.is_running().await {
            self.janitor.stop().await?;
        }
        Ok(())
    }

    pub async fn janitor_running(&self) -> bool {
        self.janitor.is_running().await
    }

    /// Sweep every cache immediately
    pub fn sweep_now(&self) -> SweepReport {
        self.janitor.sweep_once()
    }

    /// Drop every entry in every cache
    pub fn invalidate_all(&self) {
        self.response.invalidate_all();
        self.query.invalidate_all();
        self.prediction.invalidate_all();
        self.precompute.invalidate_all();
    }

    /// Counters of every cache as JSON
    pub fn metrics_json(&self) -> Vec<Value> {
        self.janitor.metrics_json()
    }

    /// Health report per cache
    pub fn health_reports(&self) -> Vec<CacheHealthReport> {
        vec![
            self.response.service().health(),
            self.query.service().health(),
            self.prediction.service().health(),
            self.precompute.service().health(),
        ]
    }
}
