//! End-to-end tests for the cache context against a mocked ML service

use std::time::Duration;

use predcache_domain::{Config, PredCacheError, PredictionRequest, RequestShape};
use predcache_infra::CacheContext;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.ml_service.base_url = server.uri();
    config.ml_service.max_attempts = 1;
    config.ml_service.timeout_ms = 1_000;
    config.janitor.interval_seconds = 1;
    config
}

fn prediction_body() -> serde_json::Value {
    json!({
        "home_win_probability": 0.55,
        "draw_probability": 0.25,
        "away_win_probability": 0.2,
        "confidence": 0.8
    })
}

#[tokio::test]
async fn predictions_hit_ml_service_once_per_similar_state() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(prediction_body()))
        .expect(1)
        .mount(&server)
        .await;

    let context = CacheContext::from_config(config_for(&server)).unwrap();

    let first = context
        .prediction
        .predict(&PredictionRequest::new("m1", "Arsenal", "Chelsea", vec![0.5, 0.6, 0.7]))
        .await
        .unwrap();
    let second = context
        .prediction
        .predict(&PredictionRequest::new("m2", "Spurs", "Everton", vec![0.51, 0.6, 0.7]))
        .await
        .unwrap();

    assert!(!first.cached);
    assert!(second.cached);
    assert_eq!(second.result.home_win_probability, 0.55);

    let metrics = context.metrics_json();
    let prediction = metrics
        .iter()
        .find(|report| report["cache_name"] == "prediction")
        .expect("prediction metrics");
    assert_eq!(prediction["hits"], 1);
    assert_eq!(prediction["misses"], 1);
    assert_eq!(prediction["size"], 1);
}

#[tokio::test]
async fn ml_failure_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(prediction_body()))
        .mount(&server)
        .await;

    let context = CacheContext::from_config(config_for(&server)).unwrap();
    let request = PredictionRequest::new("m1", "Arsenal", "Chelsea", vec![0.5, 0.5]);

    let err = context.prediction.predict(&request).await.unwrap_err();
    assert!(matches!(err, PredCacheError::Network(_)));
    assert_eq!(context.prediction.service().stats().size, 0);

    let outcome = context.prediction.predict(&request).await.unwrap();
    assert!(!outcome.cached);
}

#[tokio::test]
async fn janitor_lifecycle_through_context() {
    let server = MockServer::start().await;
    let mut context = CacheContext::from_config(config_for(&server)).unwrap();

    context.start().await.unwrap();
    assert!(context.janitor_running().await);

    context
        .response
        .get_or_produce(&RequestShape::get("/api/health"), || async { Ok(json!({"ok": true})) })
        .await
        .unwrap();
    let report = context.sweep_now();
    assert_eq!(report.per_cache.len(), 4);
    assert_eq!(report.total(), 0);

    context.shutdown().await.unwrap();
    assert!(!context.janitor_running().await);
}

#[tokio::test]
async fn disabled_janitor_is_not_started() {
    let server = MockServer::start().await;
    let mut config = config_for(&server);
    config.janitor.enabled = false;
    config.janitor.interval_seconds = 0;

    let mut context = CacheContext::from_config(config).unwrap();
    context.start().await.unwrap();

    assert!(!context.janitor_running().await);
    context.shutdown().await.unwrap();
}

#[tokio::test]
async fn warm_then_lookup_through_context() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(prediction_body())
                .set_delay(Duration::from_millis(10)),
        )
        .expect(3)
        .mount(&server)
        .await;

    let context = CacheContext::from_config(config_for(&server)).unwrap();
    let fixtures = (0..3)
        .map(|i| PredictionRequest::new(format!("m{i}"), "Home", "Away", vec![0.5]))
        .collect();

    let report = context.precompute.warm(fixtures).await;

    assert_eq!(report.warmed, 3);
    assert!(context.precompute.lookup("m2").unwrap().is_some());
    context.invalidate_all();
    assert!(context.precompute.lookup("m2").unwrap().is_none());
}
