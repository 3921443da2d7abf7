//! Brokerage Backend Adapter
//!
//! Connects the console to the brokerage backend's REST API. A single
//! adapter implements every port (`LookupPort`, `PricingPort`, `PolicyPort`)
//! because they share one base URL, one credential and one circuit breaker.
//!
//! # Architecture
//!
//! - Connection pooling via a shared `reqwest::Client`
//! - Circuit breaker for fault tolerance (transient failures only)
//! - Correlation id header taken from `OperationMetadata`
//! - Request/response logging through `tracing`
//!
//! No retries: a failed call is reported to the caller, which shows it.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use core_kernel::{
    AdapterHealth, DomainPort, ExternalAuthConfig, HealthCheckResult, HealthCheckable,
    OperationMetadata, PortError,
};

use crate::circuit_breaker::CircuitBreaker;
use crate::config::{HttpAdapterConfig, CORRELATION_ID_HEADER};
use crate::error::{map_status, map_transport, HttpAdapterError};

const ADAPTER_ID: &str = "brokerage-http-adapter";

/// Whole milliseconds, saturating at `u64::MAX`
fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// REST adapter for the brokerage backend
///
/// # Example
///
/// ```rust,ignore
/// use infra_http::{BrokerHttpAdapter, HttpAdapterConfig};
///
/// let adapter = Arc::new(BrokerHttpAdapter::new(HttpAdapterConfig::new(base_url))?);
/// let service = PolicyFormService::new(adapter.clone(), adapter.clone(), adapter);
/// ```
#[derive(Debug)]
pub struct BrokerHttpAdapter {
    config: HttpAdapterConfig,
    client: Client,
    circuit_breaker: Option<Arc<CircuitBreaker>>,
}

impl BrokerHttpAdapter {
    /// Builds the adapter and its HTTP client
    ///
    /// # Errors
    ///
    /// Returns `HttpAdapterError` if a configured header is not a valid
    /// header name/value or the client cannot be built.
    pub fn new(config: HttpAdapterConfig) -> Result<Self, HttpAdapterError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.system.headers {
            let invalid = |message: String| HttpAdapterError::InvalidHeader {
                name: name.clone(),
                message,
            };
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
            let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
            headers.insert(header_name, header_value);
        }
        if let ExternalAuthConfig::ApiKey { header_name, key } = &config.system.auth {
            let invalid = |message: String| HttpAdapterError::InvalidHeader {
                name: header_name.clone(),
                message,
            };
            let name = HeaderName::from_bytes(header_name.as_bytes())
                .map_err(|e| invalid(e.to_string()))?;
            let mut value = HeaderValue::from_str(key).map_err(|e| invalid(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(name, value);
        }
        let user_agent = HeaderValue::from_str(&config.user_agent).map_err(|e| {
            HttpAdapterError::InvalidHeader {
                name: USER_AGENT.to_string(),
                message: e.to_string(),
            }
        })?;
        headers.insert(USER_AGENT, user_agent);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        let circuit_breaker = config
            .circuit_breaker
            .clone()
            .map(|cb| Arc::new(CircuitBreaker::new(cb)));

        tracing::debug!(base_url = %config.system.base_url, "brokerage adapter configured");
        Ok(Self {
            config,
            client,
            circuit_breaker,
        })
    }

    /// Returns the base URL of the backend
    pub fn base_url(&self) -> &str {
        &self.config.system.base_url
    }

    /// Checks if the circuit breaker is open (blocking requests)
    pub async fn is_circuit_open(&self) -> bool {
        match &self.circuit_breaker {
            Some(cb) => !cb.is_available().await,
            None => false,
        }
    }

    fn timeout_ms(&self) -> u64 {
        self.config.timeout_secs.saturating_mul(1000)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.system.auth {
            ExternalAuthConfig::BearerToken { token } => request.bearer_auth(token),
            ExternalAuthConfig::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            // API keys travel as a default header
            ExternalAuthConfig::ApiKey { .. } | ExternalAuthConfig::None => request,
        }
    }

    /// Sends a request and returns the successful response
    ///
    /// `resource` names the entity for `NotFound` errors and log lines.
    async fn send(
        &self,
        method: Method,
        path: &str,
        resource: &str,
        metadata: Option<&OperationMetadata>,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Response, PortError> {
        if let Some(cb) = &self.circuit_breaker {
            if !cb.is_available().await {
                return Err(PortError::ServiceUnavailable {
                    service: "Circuit breaker is open".to_string(),
                });
            }
        }

        let url = self.config.system.url(path);
        let operation = format!("{} {}", method, path);
        let mut request = self.authorize(self.client.request(method, &url));
        if let Some(correlation_id) = metadata.and_then(|m| m.correlation_id.as_deref()) {
            request = request.header(CORRELATION_ID_HEADER, correlation_id);
        }
        let request = build(request);

        let started = Instant::now();
        let result = request.send().await;
        let elapsed_ms = millis(started.elapsed());

        let outcome = match result {
            Err(e) => Err(map_transport(e, &operation, self.timeout_ms())),
            Ok(response) if response.status().is_success() => {
                tracing::debug!(%operation, status = %response.status(), elapsed_ms, "backend call succeeded");
                Ok(response)
            }
            Ok(response) => {
                let status = response.status();
                let retry_after = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<u64>().ok());
                let body = response.text().await.unwrap_or_default();
                Err(map_status(status, &body, resource, path, retry_after))
            }
        };

        if let Some(cb) = &self.circuit_breaker {
            match &outcome {
                Err(e) if e.is_transient() => cb.record_failure().await,
                _ => cb.record_success(),
            }
        }
        if let Err(e) = &outcome {
            tracing::warn!(%operation, elapsed_ms, error = %e, "backend call failed");
        }
        outcome
    }

    async fn decode<T: DeserializeOwned>(response: Response, resource: &str) -> Result<T, PortError> {
        let body = response.text().await.map_err(|e| PortError::Connection {
            message: format!("reading {} response: {}", resource, e),
            source: Some(Box::new(e)),
        })?;
        serde_json::from_str(&body).map_err(|e| PortError::Transformation {
            message: format!("decoding {} response: {}", resource, e),
        })
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        resource: &str,
        query: &[(&str, String)],
        metadata: Option<&OperationMetadata>,
    ) -> Result<T, PortError> {
        let response = self
            .send(Method::GET, path, resource, metadata, |r| {
                if query.is_empty() {
                    r
                } else {
                    r.query(query)
                }
            })
            .await?;
        Self::decode(response, resource).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        resource: &str,
        body: &B,
        metadata: Option<&OperationMetadata>,
    ) -> Result<T, PortError> {
        let response = self
            .send(Method::POST, path, resource, metadata, |r| r.json(body))
            .await?;
        Self::decode(response, resource).await
    }

    pub(crate) async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        resource: &str,
        body: &B,
        metadata: Option<&OperationMetadata>,
    ) -> Result<T, PortError> {
        let response = self
            .send(Method::PUT, path, resource, metadata, |r| r.json(body))
            .await?;
        Self::decode(response, resource).await
    }
}

impl DomainPort for BrokerHttpAdapter {}

#[async_trait]
impl HealthCheckable for BrokerHttpAdapter {
    /// Calls `GET /health`; an open circuit reports degraded without calling
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();

        if self.is_circuit_open().await {
            return HealthCheckResult {
                adapter_id: ADAPTER_ID.to_string(),
                status: AdapterHealth::Degraded,
                latency_ms: 0,
                message: Some("Circuit breaker is open".to_string()),
                checked_at: Utc::now(),
            };
        }

        let result = self.send(Method::GET, "health", "Health", None, |r| r).await;
        let latency_ms = millis(start.elapsed());

        let (status, message) = match result {
            Ok(_) => (AdapterHealth::Healthy, None),
            Err(e) => (AdapterHealth::Unhealthy, Some(e.to_string())),
        };
        HealthCheckResult {
            adapter_id: ADAPTER_ID.to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::CircuitBreakerConfig;

    #[test]
    fn test_config_defaults() {
        let config = HttpAdapterConfig::default();
        assert_eq!(config.timeout_secs, 30);
        assert!(config.circuit_breaker.is_some());
        assert!(config.user_agent.starts_with("policy-console/"));
    }

    #[test]
    fn test_millis_saturates() {
        assert_eq!(millis(Duration::from_millis(1500)), 1500);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn test_invalid_custom_header_is_rejected() {
        let mut config = HttpAdapterConfig::new("http://localhost:1");
        config
            .system
            .headers
            .insert("bad header".to_string(), "x".to_string());

        let err = BrokerHttpAdapter::new(config).unwrap_err();
        assert!(matches!(err, HttpAdapterError::InvalidHeader { ref name, .. } if name == "bad header"));
    }

    #[tokio::test]
    async fn test_circuit_breaker_initially_closed() {
        let adapter = BrokerHttpAdapter::new(HttpAdapterConfig::default()).unwrap();
        assert!(!adapter.is_circuit_open().await);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_unhealthy() {
        // Port 9 (discard) is not listening on loopback
        let config = HttpAdapterConfig::new("http://127.0.0.1:9")
            .with_timeout_secs(2)
            .with_circuit_breaker(Some(CircuitBreakerConfig::default()));
        let adapter = BrokerHttpAdapter::new(config).unwrap();

        let result = adapter.health_check().await;
        assert_eq!(result.adapter_id, ADAPTER_ID);
        assert_eq!(result.status, AdapterHealth::Unhealthy);
        assert!(result.message.is_some());
    }
}
