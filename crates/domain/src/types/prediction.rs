//! Prediction request and result types exchanged with the ML service

use serde::{Deserialize, Serialize};

use crate::errors::{PredCacheError, Result};

/// Input for one match prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub match_id: String,
    pub home_team: String,
    pub away_team: String,
    /// Normalized match-state features, each expected in `[0, 1]`
    pub features: Vec<f64>,
}

impl PredictionRequest {
    pub fn new(
        match_id: impl Into<String>,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        features: Vec<f64>,
    ) -> Self {
        Self {
            match_id: match_id.into(),
            home_team: home_team.into(),
            away_team: away_team.into(),
            features,
        }
    }

    /// Reject requests the model cannot score
    ///
    /// # Errors
    /// Returns [`PredCacheError::InvalidInput`] for an empty match id, an
    /// empty feature list or a non-finite feature.
    pub fn validate(&self) -> Result<()> {
        if self.match_id.trim().is_empty() {
            return Err(PredCacheError::InvalidInput("match_id must not be empty".to_string()));
        }
        if self.features.is_empty() {
            return Err(PredCacheError::InvalidInput("features must not be empty".to_string()));
        }
        if let Some(i) = self.features.iter().position(|v| !v.is_finite()) {
            return Err(PredCacheError::InvalidInput(format!("feature {} is not finite", i)));
        }
        Ok(())
    }
}

/// Outcome probabilities returned by the ML service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub home_win_probability: f64,
    pub draw_probability: f64,
    pub away_win_probability: f64,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates `PredictionRequest::validate`.
    ///
    /// Assertions:
    /// - Ensures a well-formed request passes.
    /// - Ensures empty features and NaN features are rejected.
    #[test]
    fn test_request_validation() {
        let ok = PredictionRequest::new("m1", "Arsenal", "Chelsea", vec![0.5, 0.6]);
        assert!(ok.validate().is_ok());

        let empty = PredictionRequest::new("m1", "Arsenal", "Chelsea", vec![]);
        assert!(matches!(empty.validate(), Err(PredCacheError::InvalidInput(_))));

        let nan = PredictionRequest::new("m1", "Arsenal", "Chelsea", vec![0.1, f64::NAN]);
        assert!(nan.validate().is_err());

        let no_id = PredictionRequest::new(" ", "Arsenal", "Chelsea", vec![0.1]);
        assert!(no_id.validate().is_err());
    }

    /// Validates that an absent model version deserializes as `None`.
    #[test]
    fn test_result_without_model_version() {
        let result: PredictionResult = serde_json::from_str(
            r#"{"home_win_probability":0.5,"draw_probability":0.3,"away_win_probability":0.2,"confidence":0.8}"#,
        )
        .unwrap();
        assert!(result.model_version.is_none());
    }
}
