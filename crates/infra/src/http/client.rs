use std::time::Duration;

use predcache_domain::PredCacheError;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};

use crate::errors::InfraError;

/// Longest single backoff sleep
const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// HTTP client with per-request timeout and retry on transient failures.
///
/// Server errors, `429 Too Many Requests`, timeouts and connection failures
/// are retried with exponential backoff. Other responses are returned as-is.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: u32,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder with retry semantics.
    ///
    /// # Errors
    /// Returns `PredCacheError::Timeout` or `PredCacheError::Network` once
    /// every attempt has failed, and `PredCacheError::Internal` if the
    /// request body cannot be replayed.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, PredCacheError> {
        let attempts = self.max_attempts.max(1);

        for attempt in 1..=attempts {
            let request = builder
                .try_clone()
                .ok_or_else(|| PredCacheError::Internal("request body cannot be replayed".into()))?
                .build()
                .map_err(|err| PredCacheError::from(InfraError::from(err)))?;

            let method = request.method().clone();
            let url = request.url().clone();
            debug!(attempt, %method, %url, "sending HTTP request");

            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, %method, %url, %status, "received HTTP response");

                    if is_retryable_status(status) && attempt < attempts {
                        self.sleep_with_backoff(attempt).await;
                        continue;
                    }

                    return Ok(response);
                }
                Err(err) => {
                    if attempt < attempts && should_retry_error(&err) {
                        debug!(attempt, %method, %url, error = %err, "HTTP request failed, retrying");
                        self.sleep_with_backoff(attempt).await;
                        continue;
                    }

                    warn!(attempt, %method, %url, error = %err, "HTTP request failed");
                    return Err(InfraError::from(err).into());
                }
            }
        }

        Err(PredCacheError::Internal("http client exhausted retries without a result".into()))
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    fn backoff_delay(&self, retry_number: u32) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8);
        self.base_backoff.saturating_mul(1u32 << shift).min(MAX_BACKOFF)
    }

    async fn sleep_with_backoff(&self, retry_number: u32) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: u32,
    base_backoff: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            max_attempts: 3,
            base_backoff: Duration::from_millis(100),
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    /// Per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// # Errors
    /// Returns `PredCacheError::Network` if the TLS backend cannot be
    /// initialised.
    pub fn build(self) -> Result<HttpClient, PredCacheError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(|err| PredCacheError::from(InfraError::from(err)))?;

        Ok(HttpClient { client, max_attempts: self.max_attempts.max(1), base_backoff: self.base_backoff })
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

fn should_retry_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}
