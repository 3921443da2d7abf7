//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use core_kernel::{CurrencyId, CustomerId, DealerId, PolicyId, VehicleId};
use domain_policy::{PolicyForm, PolicyRecord};
use domain_reference::PolicyTypeCode;

use crate::fixtures::{IdFixtures, TemporalFixtures};

/// Builder for stored policies
pub struct PolicyRecordBuilder {
    record: PolicyRecord,
}

impl Default for PolicyRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyRecordBuilder {
    /// A one-year Kasko policy of D1/C1/V1
    pub fn new() -> Self {
        Self {
            record: PolicyRecord {
                id: IdFixtures::policy(),
                policy_number: Some("POL-000042".to_string()),
                dealer_id: IdFixtures::dealer(),
                customer_id: IdFixtures::customer(),
                vehicle_id: IdFixtures::vehicle(),
                policy_type: "Kasko".into(),
                currency_id: Some(IdFixtures::currency_try()),
                start_date: TemporalFixtures::policy_start(),
                end_date: TemporalFixtures::year_end(),
                duration_days: None,
                premium: None,
            },
        }
    }

    pub fn with_id(mut self, id: PolicyId) -> Self {
        self.record.id = id;
        self
    }

    pub fn with_dealer(mut self, dealer_id: DealerId) -> Self {
        self.record.dealer_id = dealer_id;
        self
    }

    pub fn with_customer(mut self, customer_id: CustomerId) -> Self {
        self.record.customer_id = customer_id;
        self
    }

    pub fn with_vehicle(mut self, vehicle_id: VehicleId) -> Self {
        self.record.vehicle_id = vehicle_id;
        self
    }

    pub fn with_policy_type(mut self, code: impl Into<PolicyTypeCode>) -> Self {
        self.record.policy_type = code.into();
        self
    }

    pub fn with_period(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.record.start_date = start;
        self.record.end_date = end;
        self
    }

    pub fn with_premium(mut self, premium: Decimal) -> Self {
        self.record.premium = Some(premium);
        self
    }

    pub fn build(self) -> PolicyRecord {
        self.record
    }
}

/// Builder for create-mode forms
///
/// Applies the selections through the form's own setters, so dependent
/// fields are derived exactly as they would be interactively.
pub struct PolicyFormBuilder {
    dealer_id: Option<DealerId>,
    customer_id: Option<CustomerId>,
    vehicle_id: Option<VehicleId>,
    policy_type: Option<PolicyTypeCode>,
    currency_id: Option<CurrencyId>,
    start_date: Option<NaiveDate>,
    duration_days: Option<u32>,
    end_date: Option<NaiveDate>,
    premium: Option<Decimal>,
}

impl Default for PolicyFormBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyFormBuilder {
    /// An empty form
    pub fn new() -> Self {
        Self {
            dealer_id: None,
            customer_id: None,
            vehicle_id: None,
            policy_type: None,
            currency_id: None,
            start_date: None,
            duration_days: None,
            end_date: None,
            premium: None,
        }
    }

    /// D1/C1/V1, Kasko, 30 days from 2024-01-01
    pub fn complete() -> Self {
        Self::new()
            .dealer(IdFixtures::dealer())
            .customer(IdFixtures::customer())
            .vehicle(IdFixtures::vehicle())
            .policy_type("Kasko")
            .start_date(TemporalFixtures::policy_start())
            .duration_days(30)
    }

    pub fn dealer(mut self, id: DealerId) -> Self {
        self.dealer_id = Some(id);
        self
    }

    pub fn customer(mut self, id: CustomerId) -> Self {
        self.customer_id = Some(id);
        self
    }

    pub fn vehicle(mut self, id: VehicleId) -> Self {
        self.vehicle_id = Some(id);
        self
    }

    pub fn policy_type(mut self, code: impl Into<PolicyTypeCode>) -> Self {
        self.policy_type = Some(code.into());
        self
    }

    pub fn currency(mut self, id: CurrencyId) -> Self {
        self.currency_id = Some(id);
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn duration_days(mut self, days: u32) -> Self {
        self.duration_days = Some(days);
        self
    }

    /// Sets the end date by hand, after the duration
    pub fn end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    pub fn premium(mut self, premium: Decimal) -> Self {
        self.premium = Some(premium);
        self
    }

    pub fn build(self) -> PolicyForm {
        let mut form = PolicyForm::new();
        form.set_dealer(self.dealer_id);
        form.set_customer(self.customer_id);
        form.set_vehicle(self.vehicle_id);
        form.set_policy_type(self.policy_type);
        form.set_currency(self.currency_id);
        form.set_start_date(self.start_date);
        if self.duration_days.is_some() {
            form.set_duration_days(self.duration_days);
        }
        if self.end_date.is_some() {
            form.set_end_date(self.end_date);
        }
        form.set_premium(self.premium);
        form
    }
}
