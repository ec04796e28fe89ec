//! Precompute service - predictions for upcoming fixtures, computed ahead of
//! demand and served by match id

use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use predcache_common::cache::{exact_key, CacheConfig};
use predcache_domain::{CacheSettings, PredCacheError, PredictionRequest, PredictionResult, Result};
use tracing::{debug, info, instrument, warn};

use super::ports::PredictionModel;
use super::service::{CacheService, Fetched};
use super::settings::{cache_error, exact_cache_config};

/// Cache name and key namespace
pub const PRECOMPUTE_CACHE: &str = "precompute";

/// Model calls in flight during a warm
pub const WARM_CONCURRENCY: usize = 4;

/// Outcome of a warm run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WarmReport {
    pub requested: usize,
    pub warmed: usize,
    /// Already cached or duplicated within the batch
    pub skipped: usize,
    /// Match id and error for every request that was not cached
    pub failed: Vec<(String, PredCacheError)>,
}

impl WarmReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Holds precomputed predictions keyed by match id
pub struct PrecomputeService {
    cache: CacheService<Arc<PredictionResult>>,
    model: Arc<dyn PredictionModel>,
}

impl PrecomputeService {
    /// # Errors
    /// Returns `PredCacheError::Config` if the settings are invalid.
    pub fn new(settings: &CacheSettings, model: Arc<dyn PredictionModel>) -> Result<Self> {
        Self::with_config(exact_cache_config(PRECOMPUTE_CACHE, settings)?, model)
    }

    /// # Errors
    /// Returns `PredCacheError::Config` if the configuration is invalid.
    pub fn with_config(config: CacheConfig, model: Arc<dyn PredictionModel>) -> Result<Self> {
        Ok(Self { cache: CacheService::new(config)?, model })
    }

    fn key_for(match_id: &str) -> Result<String> {
        exact_key(PRECOMPUTE_CACHE, match_id).map_err(|err| cache_error(PRECOMPUTE_CACHE, err))
    }

    /// Run the model for every request not already cached
    ///
    /// Successes are cached. Failures are collected in the report and leave
    /// no entry, so a later warm retries them.
    #[instrument(skip(self, requests), fields(requested = requests.len()))]
    pub async fn warm(&self, requests: Vec<PredictionRequest>) -> WarmReport {
        let mut report = WarmReport { requested: requests.len(), ..WarmReport::default() };
        let mut pending: Vec<(String, PredictionRequest)> = Vec::with_capacity(requests.len());
        let mut queued: HashSet<String> = HashSet::with_capacity(requests.len());

        for request in requests {
            if let Err(err) = request.validate() {
                report.failed.push((request.match_id.clone(), err));
                continue;
            }
            let key = match Self::key_for(&request.match_id) {
                Ok(key) => key,
                Err(err) => {
                    report.failed.push((request.match_id.clone(), err));
                    continue;
                }
            };
            if self.cache.store().contains_key(&key) || !queued.insert(key.clone()) {
                report.skipped += 1;
                continue;
            }
            pending.push((key, request));
        }

        let results: Vec<_> = stream::iter(pending)
            .map(|(key, request)| {
                let model = Arc::clone(&self.model);
                async move {
                    let result = model.predict(&request).await;
                    (key, request.match_id, result)
                }
            })
            .buffer_unordered(WARM_CONCURRENCY)
            .collect()
            .await;

        for (key, match_id, result) in results {
            match result {
                Ok(prediction) => {
                    self.cache.store().set(key, Arc::new(prediction));
                    report.warmed += 1;
                }
                Err(err) => {
                    warn!(match_id = %match_id, error = %err, "precompute failed");
                    report.failed.push((match_id, err));
                }
            }
        }

        info!(
            warmed = report.warmed,
            skipped = report.skipped,
            failed = report.failed.len(),
            "precompute warm finished"
        );
        report
    }

    /// Precomputed prediction for a match, if still fresh
    ///
    /// # Errors
    /// Returns `PredCacheError::InvalidInput` if the id cannot be keyed.
    pub fn lookup(&self, match_id: &str) -> Result<Option<Arc<PredictionResult>>> {
        let key = Self::key_for(match_id)?;
        let hit = self.cache.store().get(&key);
        debug!(match_id, hit = hit.is_some(), "precompute lookup");
        Ok(hit)
    }

    /// Serve the precomputed prediction or compute and cache it now
    ///
    /// # Errors
    /// Returns `PredCacheError::InvalidInput` for a malformed request and the
    /// model's error otherwise.
    pub async fn get_or_predict(&self, request: &PredictionRequest) -> Result<Fetched<Arc<PredictionResult>>> {
        request.validate()?;
        let key = Self::key_for(&request.match_id)?;
        let model = Arc::clone(&self.model);
        self.cache
            .get_or_produce(&key, || async move { model.predict(request).await.map(Arc::new) })
            .await
    }

    pub fn service(&self) -> &CacheService<Arc<PredictionResult>> {
        &self.cache
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}
