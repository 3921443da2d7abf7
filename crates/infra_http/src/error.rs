//! Error mapping
//!
//! Backend responses are mapped to `PortError` variants:
//! - 404 -> `PortError::NotFound`, carrying the backend's message if any
//! - 400/422 -> `PortError::Validation`
//! - 409 -> `PortError::Conflict`
//! - 401/403 -> `PortError::Unauthorized`
//! - 429 -> `PortError::RateLimited`
//! - 5xx -> `PortError::ServiceUnavailable`
//! - Timeouts -> `PortError::Timeout`
//! - Other -> `PortError::Internal`

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use core_kernel::PortError;

/// Errors raised while building the adapter
#[derive(Debug, Error)]
pub enum HttpAdapterError {
    #[error("Invalid header {name}: {message}")]
    InvalidHeader { name: String, message: String },

    #[error("HTTP client could not be built: {0}")]
    Client(#[from] reqwest::Error),
}

/// Error body as the backend sends it; different endpoints use different keys
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
    title: Option<String>,
}

/// The backend's own message in an error body, if it sent one
///
/// Tries the JSON keys `message`, `error` and `title`, then a non-JSON body.
pub(crate) fn backend_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .message
        .or(parsed.error)
        .or(parsed.title)
        .filter(|m| !m.trim().is_empty())
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty() && !trimmed.starts_with('{')).then(|| trimmed.to_string())
        })
}

/// Extracts the human-readable message from an error response body
///
/// Falls back to the status reason when the body says nothing.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    backend_message(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unexpected response")
            .to_string()
    })
}

/// Maps a non-success response to a `PortError`
pub(crate) fn map_status(
    status: StatusCode,
    body: &str,
    resource: &str,
    target: &str,
    retry_after_secs: Option<u64>,
) -> PortError {
    if status == StatusCode::NOT_FOUND {
        return PortError::not_found(resource, target).with_backend_message(backend_message(body));
    }
    let message = error_message(status, body);
    match status.as_u16() {
        400 | 422 => PortError::validation(message),
        409 => PortError::conflict(message),
        401 | 403 => PortError::Unauthorized { message },
        429 => PortError::RateLimited {
            retry_after_secs: retry_after_secs.unwrap_or(1),
        },
        500..=599 => PortError::ServiceUnavailable { service: message },
        _ => PortError::internal(format!("Unexpected status {}: {}", status, message)),
    }
}

/// Maps a transport-level failure to a `PortError`
pub(crate) fn map_transport(error: reqwest::Error, operation: &str, timeout_ms: u64) -> PortError {
    if error.is_timeout() {
        PortError::Timeout {
            operation: operation.to_string(),
            duration_ms: timeout_ms,
        }
    } else if error.is_connect() || error.is_request() {
        PortError::Connection {
            message: format!("{}: {}", operation, error),
            source: Some(Box::new(error)),
        }
    } else {
        PortError::Internal {
            message: format!("{}: {}", operation, error),
            source: Some(Box::new(error)),
        }
    }
}
