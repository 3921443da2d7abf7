//! Submission dispatcher
//!
//! Turns a form into the backend's create or update request and sends it.
//! Identity fields (dealer, customer, vehicle) are fixed once a policy
//! exists, so an update carries only the policy type and the dates.
//!
//! # Error taxonomy
//!
//! | Backend says                            | Outcome                                   |
//! |-----------------------------------------|-------------------------------------------|
//! | warning: no active policy series        | advisory notice, submission succeeds      |
//! | rejection: no active policy series      | `SubmissionError::NoActivePolicySeries`, advisory |
//! | policy type not found                   | `SubmissionError::PolicyTypeNotFound`     |
//! | anything else                           | `SubmissionError::Server` (raw text)      |
//!
//! Only [`SubmissionError::is_blocking`] errors stop the operator; the
//! advisory one is shown as a notice.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

use core_kernel::{CurrencyId, CustomerId, DealerId, OperationMetadata, PolicyId, PortError, VehicleId};
use domain_reference::PolicyTypeCode;

use crate::error::PolicyError;
use crate::form::{FormMode, PolicyForm};
use crate::ports::PolicyPort;
use crate::record::PolicyRecord;

/// Body of `POST /policies`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePolicyRequest {
    pub dealer_id: DealerId,
    pub customer_id: CustomerId,
    pub vehicle_id: VehicleId,
    pub policy_type: PolicyTypeCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_id: Option<CurrencyId>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium: Option<Decimal>,
}

/// Body of `PUT /policies/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePolicyRequest {
    pub policy_type: PolicyTypeCode,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A request ready to be dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionRequest {
    Create(CreatePolicyRequest),
    Update {
        id: PolicyId,
        request: UpdatePolicyRequest,
    },
}

impl SubmissionRequest {
    /// Shapes the request for the form's mode
    ///
    /// # Errors
    ///
    /// `PolicyError::MissingRequiredField` for an incomplete draft and
    /// `PolicyError::InvalidPeriod` when the end date does not follow the start.
    pub fn from_form(form: &PolicyForm) -> Result<Self, PolicyError> {
        let draft = form.draft();
        let policy_type = draft
            .policy_type()
            .cloned()
            .ok_or(PolicyError::MissingRequiredField("policyType"))?;
        let period = draft.period()?;

        match form.mode() {
            FormMode::Create => Ok(SubmissionRequest::Create(CreatePolicyRequest {
                dealer_id: draft.dealer_id().ok_or(PolicyError::MissingRequiredField("dealerId"))?,
                customer_id: draft
                    .customer_id()
                    .ok_or(PolicyError::MissingRequiredField("customerId"))?,
                vehicle_id: draft
                    .vehicle_id()
                    .ok_or(PolicyError::MissingRequiredField("vehicleId"))?,
                policy_type,
                currency_id: draft.currency_id(),
                start_date: period.start(),
                end_date: period.end(),
                duration_days: draft.duration_days(),
                premium: form.effective_premium(),
            })),
            FormMode::Edit(id) => Ok(SubmissionRequest::Update {
                id,
                request: UpdatePolicyRequest {
                    policy_type,
                    start_date: period.start(),
                    end_date: period.end(),
                },
            }),
        }
    }

    pub fn is_create(&self) -> bool {
        matches!(self, SubmissionRequest::Create(_))
    }
}

/// What a backend message is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// The dealer has no active policy series; the backend provisions one
    NoActivePolicySeries,
    /// The requested policy type has no mapping on the backend
    PolicyTypeNotFound,
    Other,
}

impl IssueKind {
    /// Classifies a backend message by its wording
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("policy series") {
            IssueKind::NoActivePolicySeries
        } else if lower.contains("policy type") && lower.contains("not found") {
            IssueKind::PolicyTypeNotFound
        } else {
            IssueKind::Other
        }
    }
}

/// A non-blocking remark shown after a successful submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: IssueKind,
    pub message: String,
}

/// Result of a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub policy: PolicyRecord,
    pub created: bool,
    pub notices: Vec<Notice>,
}

/// Submission failures
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The draft was rejected locally; nothing was sent
    #[error("Invalid draft: {0}")]
    Invalid(#[from] PolicyError),

    /// Another submission is still outstanding
    #[error("A submission is already in progress")]
    AlreadyInFlight,

    #[error("{0}")]
    PolicyTypeNotFound(String),

    /// The dealer has no active policy series; nothing was stored, but the
    /// backend provisions a series so the operator can retry
    #[error("{0}")]
    NoActivePolicySeries(String),

    /// Any other backend failure, with the backend's own message
    #[error("{0}")]
    Server(String),
}

impl SubmissionError {
    fn from_port(error: PortError) -> Self {
        let message = error.server_message();
        match IssueKind::classify(&message) {
            IssueKind::PolicyTypeNotFound => SubmissionError::PolicyTypeNotFound(message),
            IssueKind::NoActivePolicySeries => SubmissionError::NoActivePolicySeries(message),
            IssueKind::Other => SubmissionError::Server(message),
        }
    }

    /// False for failures that are only advisory
    pub fn is_blocking(&self) -> bool {
        !matches!(self, SubmissionError::NoActivePolicySeries(_))
    }

    /// The notice to show in place of an advisory failure
    pub fn advisory(&self) -> Option<Notice> {
        match self {
            SubmissionError::NoActivePolicySeries(message) => Some(Notice {
                kind: IssueKind::NoActivePolicySeries,
                message: message.clone(),
            }),
            _ => None,
        }
    }
}

/// Releases the in-flight flag when dropped
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Sends submissions through a [`PolicyPort`], one at a time
#[derive(Debug)]
pub struct SubmissionDispatcher<S: ?Sized> {
    port: Arc<S>,
    metadata: Option<OperationMetadata>,
    in_flight: AtomicBool,
}

impl<S: PolicyPort + ?Sized> SubmissionDispatcher<S> {
    pub fn new(port: Arc<S>) -> Self {
        Self {
            port,
            metadata: None,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_metadata(mut self, metadata: OperationMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// True while a submission is outstanding (the submit control is disabled)
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Sends a request and classifies the backend's answer
    pub async fn dispatch(
        &self,
        request: SubmissionRequest,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or(SubmissionError::AlreadyInFlight)?;
        let created = request.is_create();

        let result = match request {
            SubmissionRequest::Create(body) => {
                tracing::info!(
                    dealer_id = %body.dealer_id,
                    policy_type = %body.policy_type,
                    "submitting new policy"
                );
                self.port.create_policy(body, self.metadata.clone()).await
            }
            SubmissionRequest::Update { id, request } => {
                tracing::info!(policy_id = %id, "submitting policy update");
                self.port.update_policy(id, request, self.metadata.clone()).await
            }
        };

        let receipt = result.map_err(|e| {
            let error = SubmissionError::from_port(e);
            if error.is_blocking() {
                tracing::warn!(error = %error, "submission rejected");
            } else {
                tracing::info!(error = %error, "submission not stored, advisory only");
            }
            error
        })?;

        let notices: Vec<Notice> = receipt
            .warnings
            .into_iter()
            .map(|message| Notice {
                kind: IssueKind::classify(&message),
                message,
            })
            .collect();
        for notice in &notices {
            tracing::info!(kind = ?notice.kind, message = %notice.message, "submission advisory");
        }

        Ok(SubmissionOutcome {
            policy: receipt.policy,
            created,
            notices,
        })
    }

    /// Builds the request from a form and dispatches it
    pub async fn submit(&self, form: &PolicyForm) -> Result<SubmissionOutcome, SubmissionError> {
        let request = SubmissionRequest::from_form(form)?;
        self.dispatch(request).await
    }
}
