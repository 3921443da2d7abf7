//! Policies as the backend reports them

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CurrencyId, CustomerId, DealerId, PolicyId, VehicleId};
use domain_reference::PolicyTypeCode;

/// A stored policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRecord {
    pub id: PolicyId,
    /// Number issued from the dealer's policy series
    #[serde(default)]
    pub policy_number: Option<String>,
    pub dealer_id: DealerId,
    pub customer_id: CustomerId,
    pub vehicle_id: VehicleId,
    pub policy_type: PolicyTypeCode,
    #[serde(default)]
    pub currency_id: Option<CurrencyId>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub duration_days: Option<u32>,
    #[serde(default)]
    pub premium: Option<Decimal>,
}

/// Result of a successful create or update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub policy: PolicyRecord,
    /// Non-blocking remarks from the backend
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl SubmissionReceipt {
    pub fn new(policy: PolicyRecord) -> Self {
        Self {
            policy,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}
