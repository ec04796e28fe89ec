//! Shared test fixtures for `predcache-infra` integration tests.

use async_trait::async_trait;
use predcache_core::PredictionModel;
use predcache_domain::{PredictionRequest, PredictionResult, Result};

/// Model returning a fixed prediction
pub struct StubModel;

#[async_trait]
impl PredictionModel for StubModel {
    async fn predict(&self, _request: &PredictionRequest) -> Result<PredictionResult> {
        Ok(PredictionResult {
            home_win_probability: 0.4,
            draw_probability: 0.3,
            away_win_probability: 0.3,
            confidence: 0.6,
            model_version: None,
        })
    }
}
