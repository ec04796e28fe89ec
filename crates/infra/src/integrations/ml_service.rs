//! HTTP client for the external ML prediction service
//!
//! Implements the [`PredictionModel`] port with `POST {base_url}/predict`.
//! Every call is bounded by the configured timeout and retried with backoff
//! on transient failures. Errors are never cached by the callers.

use async_trait::async_trait;
use predcache_core::PredictionModel;
use predcache_domain::{MlServiceConfig, PredCacheError, PredictionRequest, PredictionResult, Result};
use reqwest::{Method, Response};
use tracing::{debug, instrument};

use crate::errors::InfraError;
use crate::http::HttpClient;

const PREDICT_PATH: &str = "/predict";
const USER_AGENT: &str = concat!("predcache/", env!("CARGO_PKG_VERSION"));

/// Client for the ML prediction microservice
pub struct MlServiceClient {
    http_client: HttpClient,
    predict_url: String,
}

impl MlServiceClient {
    /// Create a client from configuration
    ///
    /// # Errors
    /// Returns `PredCacheError::Network` if the HTTP client cannot be built.
    pub fn new(config: &MlServiceConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(config.timeout())
            .max_attempts(config.max_attempts)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self::with_http_client(&config.base_url, http_client))
    }

    /// Create a client over an existing HTTP client
    pub fn with_http_client(base_url: &str, http_client: HttpClient) -> Self {
        let predict_url = format!("{}{}", base_url.trim_end_matches('/'), PREDICT_PATH);
        Self { http_client, predict_url }
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    async fn handle_error_status(response: Response) -> PredCacheError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = if body.is_empty() { String::new() } else { format!(": {}", body) };
        let message = format!("ML service returned {}{}", status.as_u16(), detail);

        if status.is_server_error() || status.as_u16() == 429 {
            PredCacheError::Network(message)
        } else {
            PredCacheError::Producer(message)
        }
    }
}

#[async_trait]
impl PredictionModel for MlServiceClient {
    #[instrument(skip(self, request), fields(match_id = %request.match_id))]
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult> {
        let builder = self.http_client.request(Method::POST, &self.predict_url).json(request);
        let response = self.http_client.send(builder).await?;

        let status = response.status();
        debug!(status = status.as_u16(), "received ML service response");
        if !status.is_success() {
            return Err(Self::handle_error_status(response).await);
        }

        let result: PredictionResult =
            response.json().await.map_err(|err| PredCacheError::from(InfraError::from(err)))?;

        let probabilities =
            [result.home_win_probability, result.draw_probability, result.away_win_probability];
        if probabilities.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(PredCacheError::Producer("ML service returned invalid probabilities".into()));
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(server: &MockServer) -> MlServiceClient {
        let http = HttpClient::builder()
            .base_backoff(Duration::from_millis(1))
            .max_attempts(2)
            .timeout(Duration::from_millis(500))
            .build()
            .unwrap();
        MlServiceClient::with_http_client(&format!("{}/", server.uri()), http)
    }

    fn request() -> PredictionRequest {
        PredictionRequest::new("m1", "Arsenal", "Chelsea", vec![0.4, 0.6])
    }

    #[tokio::test]
    async fn posts_request_and_parses_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .and(body_partial_json(json!({"match_id": "m1", "features": [0.4, 0.6]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "home_win_probability": 0.5,
                "draw_probability": 0.3,
                "away_win_probability": 0.2,
                "confidence": 0.7,
                "model_version": "2024.1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client(&server).predict(&request()).await.unwrap();

        assert_eq!(result.home_win_probability, 0.5);
        assert_eq!(result.model_version.as_deref(), Some("2024.1"));
    }

    #[tokio::test]
    async fn server_error_after_retries_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
            .expect(2)
            .mount(&server)
            .await;

        let err = client(&server).predict(&request()).await.unwrap_err();

        match err {
            PredCacheError::Network(msg) => assert!(msg.contains("500") && msg.contains("model crashed")),
            other => panic!("expected network error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn bad_request_is_producer_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST")).respond_with(ResponseTemplate::new(422)).expect(1).mount(&server).await;

        let err = client(&server).predict(&request()).await.unwrap_err();

        assert!(matches!(err, PredCacheError::Producer(_)));
    }

    #[tokio::test]
    async fn malformed_body_is_producer_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
            .mount(&server)
            .await;

        let err = client(&server).predict(&request()).await.unwrap_err();

        assert!(matches!(err, PredCacheError::Producer(_)));
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let err = client(&server).predict(&request()).await.unwrap_err();

        assert!(matches!(err, PredCacheError::Timeout(_)), "got {:?}", err);
    }
}
