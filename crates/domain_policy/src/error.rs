//! Policy domain errors
//!
//! Errors raised while turning a draft into a request. Server-side rejections
//! of a submission are classified separately in `submission`.

use thiserror::Error;

use core_kernel::{PortError, TemporalError};

/// Errors that can occur in the policy domain
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Required field is missing
    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),

    /// The draft's dates do not form a valid period
    #[error("Invalid policy period: {0}")]
    InvalidPeriod(#[from] TemporalError),

    /// The operation needs a form in create mode
    #[error("Operation not available while editing policy {0}")]
    EditingExistingPolicy(String),

    /// A backend call made on behalf of the form failed
    #[error("Backend error: {0}")]
    Backend(#[from] PortError),
}

impl PolicyError {
    /// Returns true if the error was detected locally, before any request
    pub fn is_local(&self) -> bool {
        !matches!(self, PolicyError::Backend(_))
    }
}
