//! Prediction service - similarity cache in front of the ML model

use std::sync::Arc;

use predcache_common::cache::{CacheConfig, FeatureVector};
use predcache_domain::{CacheSettings, PredictionRequest, PredictionResult, Result};
use tracing::instrument;

use super::ports::PredictionModel;
use super::service::CacheService;
use super::settings::{cache_error, similarity_cache_config};

/// Cache name for model predictions
pub const PREDICTION_CACHE: &str = "prediction";

/// A prediction and whether it was served from the cache
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionOutcome {
    pub result: Arc<PredictionResult>,
    pub cached: bool,
}

/// Serves predictions for similar match states without calling the model
pub struct PredictionService {
    cache: CacheService<Arc<PredictionResult>>,
    model: Arc<dyn PredictionModel>,
}

impl PredictionService {
    /// Create a prediction service from cache settings
    ///
    /// # Errors
    /// Returns `PredCacheError::Config` if the settings are invalid.
    pub fn new(settings: &CacheSettings, model: Arc<dyn PredictionModel>) -> Result<Self> {
        Self::with_config(similarity_cache_config(PREDICTION_CACHE, settings)?, model)
    }

    /// # Errors
    /// Returns `PredCacheError::Config` if the configuration is invalid.
    pub fn with_config(config: CacheConfig, model: Arc<dyn PredictionModel>) -> Result<Self> {
        Ok(Self { cache: CacheService::new(config)?, model })
    }

    /// Predict a match, reusing a cached result for a similar feature vector
    ///
    /// Features are clamped into `[0, 1]` before comparison. A model failure
    /// is returned unchanged and nothing is cached.
    ///
    /// # Errors
    /// Returns `PredCacheError::InvalidInput` for a malformed request and the
    /// model's error otherwise.
    #[instrument(skip(self, request), fields(match_id = %request.match_id))]
    pub async fn predict(&self, request: &PredictionRequest) -> Result<PredictionOutcome> {
        request.validate()?;
        let features = FeatureVector::clamped(request.features.clone())
            .map_err(|err| cache_error(PREDICTION_CACHE, err))?;

        let model = Arc::clone(&self.model);
        let fetched = self
            .cache
            .get_or_produce_similar(features, || async move { model.predict(request).await.map(Arc::new) })
            .await?;

        Ok(PredictionOutcome { result: fetched.value, cached: fetched.cached })
    }

    pub fn service(&self) -> &CacheService<Arc<PredictionResult>> {
        &self.cache
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}
