//! Console configuration
//!
//! Read from `BROKER_*` environment variables (a `.env` file is loaded first
//! by the binary). Every field has a default, so an empty environment talks
//! to a local backend without credentials.

use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationError};

use core_kernel::{CircuitBreakerConfig, ExternalAuthConfig};
use infra_http::HttpAdapterConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Errors raised while loading the configuration
#[derive(Debug, Error)]
pub enum ConsoleConfigError {
    #[error("Failed to read configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// Console configuration
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Backend base URL, e.g. "https://broker.example.com/api"
    #[validate(url(message = "base_url must be an absolute URL"))]
    pub base_url: String,
    /// Optional version segment appended to the base URL
    pub api_version: Option<String>,
    /// Bearer token; takes precedence over the other credentials
    pub api_token: Option<String>,
    /// API key sent in `api_key_header`
    pub api_key: Option<String>,
    #[validate(length(min = 1, message = "api_key_header must not be empty"))]
    pub api_key_header: String,
    /// Basic auth credentials
    pub username: Option<String>,
    pub password: Option<String>,
    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    pub timeout_secs: u64,
    /// Consecutive transient failures before the breaker opens; 0 disables it
    pub breaker_failure_threshold: u32,
    /// Seconds the breaker stays open before letting a trial call through
    #[validate(range(min = 1))]
    pub breaker_reset_secs: u64,
    /// Operator name recorded with each backend call
    pub operator: Option<String>,
    /// Log level
    #[validate(custom(function = "validate_log_level"))]
    pub log_level: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            api_version: None,
            api_token: None,
            api_key: None,
            api_key_header: "X-Api-Key".to_string(),
            username: None,
            password: None,
            timeout_secs: 30,
            breaker_failure_threshold: 5,
            breaker_reset_secs: 30,
            operator: None,
            log_level: "info".to_string(),
        }
    }
}

fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    if LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("log_level"))
    }
}

impl ConsoleConfig {
    /// Loads and validates configuration from the process environment
    pub fn from_env() -> Result<Self, ConsoleConfigError> {
        Self::from_source(config::Environment::with_prefix("BROKER"))
    }

    /// Loads and validates configuration from an environment source
    pub fn from_source(source: config::Environment) -> Result<Self, ConsoleConfigError> {
        let config: Self = config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Credentials in order of precedence: token, API key, basic auth
    pub fn auth(&self) -> ExternalAuthConfig {
        if let Some(token) = &self.api_token {
            return ExternalAuthConfig::BearerToken {
                token: token.clone(),
            };
        }
        if let Some(key) = &self.api_key {
            return ExternalAuthConfig::ApiKey {
                header_name: self.api_key_header.clone(),
                key: key.clone(),
            };
        }
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => ExternalAuthConfig::Basic {
                username: username.clone(),
                password: password.clone(),
            },
            _ => ExternalAuthConfig::None,
        }
    }

    /// Settings for the backend adapter
    pub fn adapter_config(&self) -> HttpAdapterConfig {
        let circuit_breaker = (self.breaker_failure_threshold > 0).then(|| CircuitBreakerConfig {
            failure_threshold: self.breaker_failure_threshold,
            reset_timeout_secs: self.breaker_reset_secs,
            ..Default::default()
        });

        let mut adapter = HttpAdapterConfig::new(self.base_url.clone())
            .with_auth(self.auth())
            .with_timeout_secs(self.timeout_secs)
            .with_circuit_breaker(circuit_breaker);
        adapter.system.api_version = self.api_version.clone();
        adapter
    }
}
