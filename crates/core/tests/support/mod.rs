//! Shared test helpers for `predcache-core` integration tests.
//!
//! A scripted prediction model that counts calls and can be switched into a
//! failing state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use predcache_core::PredictionModel;
use predcache_domain::{PredCacheError, PredictionRequest, PredictionResult, Result};

#[derive(Default)]
pub struct MockModel {
    calls: AtomicUsize,
    failing: AtomicBool,
    delay: Option<Duration>,
}

#[allow(dead_code)]
impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay: Some(delay), ..Self::default() }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl PredictionModel for MockModel {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(PredCacheError::Producer(format!("model down for {}", request.match_id)));
        }

        let home = request.features.iter().sum::<f64>() / request.features.len() as f64;
        Ok(PredictionResult {
            home_win_probability: home,
            draw_probability: (1.0 - home) / 2.0,
            away_win_probability: (1.0 - home) / 2.0,
            confidence: 0.75,
            model_version: Some("mock".to_string()),
        })
    }
}

pub fn request(match_id: &str, features: Vec<f64>) -> PredictionRequest {
    PredictionRequest::new(match_id, "Home FC", "Away FC", features)
}
