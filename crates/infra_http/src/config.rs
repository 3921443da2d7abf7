//! Adapter configuration

use core_kernel::{CircuitBreakerConfig, ExternalAuthConfig, ExternalSystemConfig};

/// Header carrying `OperationMetadata::correlation_id`
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-Id";

/// Configuration for the brokerage backend adapter
///
/// ```rust,ignore
/// let config = HttpAdapterConfig {
///     system: ExternalSystemConfig::new("https://broker.example.com/api"),
///     timeout_secs: 10,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct HttpAdapterConfig {
    /// Base URL, version segment, auth and extra headers
    pub system: ExternalSystemConfig,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Value of the `User-Agent` header
    pub user_agent: String,

    /// Circuit breaker configuration; `None` disables the breaker
    pub circuit_breaker: Option<CircuitBreakerConfig>,
}

impl Default for HttpAdapterConfig {
    fn default() -> Self {
        Self {
            system: ExternalSystemConfig::new("http://localhost:8080/api"),
            timeout_secs: 30,
            user_agent: concat!("policy-console/", env!("CARGO_PKG_VERSION")).to_string(),
            circuit_breaker: Some(CircuitBreakerConfig::default()),
        }
    }
}

impl HttpAdapterConfig {
    /// Default settings against the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            system: ExternalSystemConfig::new(base_url),
            ..Default::default()
        }
    }

    pub fn with_auth(mut self, auth: ExternalAuthConfig) -> Self {
        self.system.auth = auth;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_circuit_breaker(mut self, config: Option<CircuitBreakerConfig>) -> Self {
        self.circuit_breaker = config;
        self
    }
}
