//! Policy draft
//!
//! The field values of the policy form. A draft is only mutated through
//! [`PolicyForm`](crate::form::PolicyForm), which keeps the derived fields
//! consistent; this module provides read access and the projections the
//! form needs (price request, policy period).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CurrencyId, CustomerId, DealerId, PolicyPeriod, VehicleId};
use domain_pricing::PriceCalculationRequest;
use domain_reference::PolicyTypeCode;

use crate::error::PolicyError;
use crate::record::PolicyRecord;

/// Field values of a policy being created or edited
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDraft {
    pub(crate) dealer_id: Option<DealerId>,
    pub(crate) customer_id: Option<CustomerId>,
    pub(crate) vehicle_id: Option<VehicleId>,
    pub(crate) policy_type: Option<PolicyTypeCode>,
    pub(crate) currency_id: Option<CurrencyId>,
    pub(crate) start_date: Option<NaiveDate>,
    pub(crate) end_date: Option<NaiveDate>,
    pub(crate) duration_days: Option<u32>,
    /// Premium typed by the user; never written by price calculation
    pub(crate) premium: Option<Decimal>,
}

impl PolicyDraft {
    /// An empty draft
    pub fn new() -> Self {
        Self::default()
    }

    /// A draft pre-filled from a stored policy
    pub fn from_record(record: &PolicyRecord) -> Self {
        Self {
            dealer_id: Some(record.dealer_id),
            customer_id: Some(record.customer_id),
            vehicle_id: Some(record.vehicle_id),
            policy_type: Some(record.policy_type.clone()),
            currency_id: record.currency_id,
            start_date: Some(record.start_date),
            end_date: Some(record.end_date),
            duration_days: record.duration_days,
            premium: record.premium,
        }
    }

    pub fn dealer_id(&self) -> Option<DealerId> {
        self.dealer_id
    }

    pub fn customer_id(&self) -> Option<CustomerId> {
        self.customer_id
    }

    pub fn vehicle_id(&self) -> Option<VehicleId> {
        self.vehicle_id
    }

    pub fn policy_type(&self) -> Option<&PolicyTypeCode> {
        self.policy_type.as_ref()
    }

    pub fn currency_id(&self) -> Option<CurrencyId> {
        self.currency_id
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn duration_days(&self) -> Option<u32> {
        self.duration_days
    }

    pub fn premium(&self) -> Option<Decimal> {
        self.premium
    }

    /// The price calculation inputs, once every required one is present
    ///
    /// Requires customer, vehicle, policy type, start date and end date.
    pub fn price_request(&self) -> Option<PriceCalculationRequest> {
        Some(PriceCalculationRequest {
            customer_id: self.customer_id?,
            vehicle_id: self.vehicle_id?,
            policy_type: self.policy_type.clone()?,
            currency: self.currency_id,
            start_date: self.start_date?,
            end_date: self.end_date?,
            duration_days: self.duration_days,
        })
    }

    /// The validated policy period
    pub fn period(&self) -> Result<PolicyPeriod, PolicyError> {
        let start = self.start_date.ok_or(PolicyError::MissingRequiredField("startDate"))?;
        let end = self.end_date.ok_or(PolicyError::MissingRequiredField("endDate"))?;
        Ok(PolicyPeriod::new(start, end)?)
    }
}
