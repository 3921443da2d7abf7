//! Policy Form Domain
//!
//! This crate implements the client-side workflow for creating and editing a
//! vehicle policy against the brokerage backend.
//!
//! # Components
//!
//! - **Form state**: [`PolicyForm`] holds the [`PolicyDraft`] and derives
//!   dependent fields (end date from duration, cleared selections)
//! - **Lookups**: customers and vehicles are fetched keyed by their parent
//! - **Price suggestion**: a complete draft is priced by the backend and the
//!   total offered as the default premium
//! - **Submission**: [`SubmissionDispatcher`] shapes create vs. update
//!   requests and classifies backend errors
//!
//! # Form lifecycle
//!
//! ```text
//! new ──edit fields──> complete draft ──submit──> Edit(policy id)
//!  ▲                                                   │
//!  └──────────── edit(record) ─────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_policy::PolicyFormService;
//!
//! let service = PolicyFormService::new(lookups, pricing, policies);
//! let mut form = service.new_form();
//! form.set_dealer(Some(dealer_id));
//! form.set_customer(Some(customer_id));
//! form.set_vehicle(Some(vehicle_id));
//! form.set_policy_type(Some("Kasko".into()));
//! form.set_start_date(Some(start));
//! form.set_duration_days(Some(30));
//! service.sync(&mut form).await;
//! let outcome = service.submit(&mut form).await?;
//! ```

pub mod draft;
pub mod form;
pub mod record;
pub mod ports;
pub mod submission;
pub mod services;
pub mod error;

pub use draft::PolicyDraft;
pub use form::{FetchOutcome, FetchRequest, FormMode, PolicyForm};
pub use record::{PolicyRecord, SubmissionReceipt};
pub use ports::PolicyPort;
pub use submission::{
    CreatePolicyRequest, IssueKind, Notice, SubmissionDispatcher, SubmissionError,
    SubmissionOutcome, SubmissionRequest, UpdatePolicyRequest,
};
pub use services::PolicyFormService;
pub use error::PolicyError;
