//! HTTP client for the reverse-geocoding endpoint

use crate::config::ClientConfig;
use crate::endpoints::ReverseGeocodeApi;
use crate::error::{GeocodeError, GeocodeResult};
use geolocator_telemetry::{metrics, Timer};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

const CLIENT_USER_AGENT: &str = concat!("geolocator/", env!("CARGO_PKG_VERSION"));

/// Reverse-geocoding client with retry and request correlation
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct GeocodeClient {
    inner: Client,
    config: Arc<ClientConfig>,
}

impl GeocodeClient {
    /// Create a new client with default configuration and environment overrides
    pub fn new() -> GeocodeResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> GeocodeResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(GeocodeError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the endpoint URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Access reverse-geocoding endpoints
    #[must_use]
    pub fn reverse(&self) -> ReverseGeocodeApi {
        ReverseGeocodeApi::new(self.clone())
    }

    /// GET the endpoint with query parameters, retrying transient failures
    #[instrument(skip(self), fields(url = %self.config.base_url))]
    pub async fn get_query<T: DeserializeOwned>(
        &self,
        params: &[(&str, String)],
    ) -> GeocodeResult<T> {
        let request_id = Uuid::new_v4().to_string();
        let timer = Timer::start("geocode.latency_ms");
        metrics().increment("geocode.requests");

        let result = self.execute_with_retry(&request_id, params).await;

        timer.stop();
        if result.is_err() {
            metrics().increment("geocode.failures");
        }
        result
    }

    /// Same as [`get_query`](Self::get_query), also returning the elapsed time
    pub async fn timed_get_query<T: DeserializeOwned>(
        &self,
        params: &[(&str, String)],
    ) -> GeocodeResult<(T, Duration)> {
        let start = Instant::now();
        let result = self.get_query(params).await?;
        Ok((result, start.elapsed()))
    }

    /// Execute request with retry logic
    async fn execute_with_retry<T: DeserializeOwned>(
        &self,
        request_id: &str,
        params: &[(&str, String)],
    ) -> GeocodeResult<T> {
        let retry_config = &self.config.retry;
        let mut last_error: Option<GeocodeError> = None;

        for attempt in 0..retry_config.max_attempts {
            // Wait before retry (except first attempt)
            if attempt > 0 {
                let delay = retry_config.delay_for_attempt(attempt);
                debug!(
                    request_id = %request_id,
                    attempt = attempt,
                    delay_ms = delay.as_millis(),
                    "Retrying after delay"
                );
                tokio::time::sleep(delay).await;
            }

            let start = Instant::now();
            let result = self.execute_single_request(request_id, params).await;
            let elapsed = start.elapsed();

            match result {
                Ok(value) => {
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        elapsed_ms = elapsed.as_millis(),
                        "Request succeeded"
                    );
                    return Ok(value);
                }
                Err(e) if e.is_retryable() && retry_config.should_retry(attempt) => {
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        error = %e,
                        "Request failed, will retry"
                    );
                    last_error = Some(e);
                }
                Err(e) => {
                    warn!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        error = %e,
                        "Request failed, not retrying"
                    );
                    return Err(e);
                }
            }
        }

        Err(GeocodeError::RetriesExhausted {
            attempts: retry_config.max_attempts,
            last_error: last_error.map_or_else(|| "Unknown error".to_string(), |e| e.to_string()),
        })
    }

    /// Execute a single request without retry
    async fn execute_single_request<T: DeserializeOwned>(
        &self,
        request_id: &str,
        params: &[(&str, String)],
    ) -> GeocodeResult<T> {
        let response = self
            .inner
            .get(self.config.base_url.as_str())
            .header(X_REQUEST_ID, request_id)
            .query(params)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Handle HTTP response and deserialize
    async fn handle_response<T: DeserializeOwned>(response: Response) -> GeocodeResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let message = response
                .text()
                .await
                .ok()
                .filter(|body| !body.is_empty())
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
            Err(GeocodeError::api_response(status.as_u16(), message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GeocodeClient::with_config(ClientConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let config = ClientConfig::default().with_base_url("not a url");
        assert!(matches!(
            GeocodeClient::with_config(config),
            Err(GeocodeError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_user_agent_carries_version() {
        assert!(CLIENT_USER_AGENT.starts_with("geolocator/"));
    }
}
