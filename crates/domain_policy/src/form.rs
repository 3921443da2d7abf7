//! Policy form state controller
//!
//! `PolicyForm` owns a [`PolicyDraft`] plus the keyed lookups that feed its
//! select controls, and propagates derived state on every change:
//!
//! - a new dealer clears customer and vehicle
//! - a new customer clears vehicle
//! - duration (or start date) recomputes the end date while creating
//! - a manual end date drops the duration
//! - the price query is keyed by the full pricing input, so any change to it
//!   asks for a fresh price; editing an existing policy never does
//!
//! Remote fetches are driven from outside: [`PolicyForm::begin_fetches`]
//! hands out one ticket per slot that needs data and
//! [`PolicyForm::apply`] stores the answer. Answers for a key the form has
//! since moved away from are dropped.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use core_kernel::{
    end_date_for, CurrencyId, CustomerId, DealerId, KeyedQuery, PolicyId, QueryState,
    QueryTicket, VehicleId,
};
use domain_pricing::{CalculatedPrice, PriceCalculationRequest};
use domain_reference::{CurrencyOption, Customer, Dealer, PolicyType, PolicyTypeCode, Vehicle};

use crate::draft::PolicyDraft;
use crate::record::PolicyRecord;

/// Whether the form creates a new policy or edits a stored one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(PolicyId),
}

/// A fetch the form is waiting for
#[derive(Debug, Clone)]
pub enum FetchRequest {
    Dealers(QueryTicket<()>),
    PolicyTypes(QueryTicket<()>),
    Currencies(QueryTicket<()>),
    Customers(QueryTicket<DealerId>),
    Vehicles(QueryTicket<CustomerId>),
    Price(QueryTicket<PriceCalculationRequest>),
}

/// The answer to a [`FetchRequest`]
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Dealers(QueryTicket<()>, Result<Vec<Dealer>, String>),
    PolicyTypes(QueryTicket<()>, Result<Vec<PolicyType>, String>),
    Currencies(QueryTicket<()>, Result<Vec<CurrencyOption>, String>),
    Customers(QueryTicket<DealerId>, Result<Vec<Customer>, String>),
    Vehicles(QueryTicket<CustomerId>, Result<Vec<Vehicle>, String>),
    Price(QueryTicket<PriceCalculationRequest>, Result<CalculatedPrice, String>),
}

/// State of the policy create/edit form
#[derive(Debug, Clone)]
pub struct PolicyForm {
    mode: FormMode,
    draft: PolicyDraft,
    dealers: KeyedQuery<(), Vec<Dealer>>,
    policy_types: KeyedQuery<(), Vec<PolicyType>>,
    currencies: KeyedQuery<(), Vec<CurrencyOption>>,
    customers: KeyedQuery<DealerId, Vec<Customer>>,
    vehicles: KeyedQuery<CustomerId, Vec<Vehicle>>,
    price: KeyedQuery<PriceCalculationRequest, CalculatedPrice>,
}

impl Default for PolicyForm {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyForm {
    /// An empty form for a new policy
    pub fn new() -> Self {
        Self::with_draft(FormMode::Create, PolicyDraft::new())
    }

    /// A form editing a stored policy
    pub fn edit(record: &PolicyRecord) -> Self {
        Self::with_draft(FormMode::Edit(record.id), PolicyDraft::from_record(record))
    }

    fn with_draft(mode: FormMode, draft: PolicyDraft) -> Self {
        let mut form = Self {
            mode,
            draft,
            dealers: KeyedQuery::new(),
            policy_types: KeyedQuery::new(),
            currencies: KeyedQuery::new(),
            customers: KeyedQuery::new(),
            vehicles: KeyedQuery::new(),
            price: KeyedQuery::new(),
        };
        form.dealers.set_key(Some(()));
        form.policy_types.set_key(Some(()));
        form.currencies.set_key(Some(()));
        form.refresh_keys();
        form
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub fn draft(&self) -> &PolicyDraft {
        &self.draft
    }

    // ------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------

    /// Chooses the dealer; a different dealer clears customer and vehicle
    pub fn set_dealer(&mut self, dealer_id: Option<DealerId>) {
        if self.identity_locked("dealer") || self.draft.dealer_id == dealer_id {
            return;
        }
        self.draft.dealer_id = dealer_id;
        self.draft.customer_id = None;
        self.draft.vehicle_id = None;
        tracing::debug!(dealer_id = ?dealer_id, "dealer changed, customer and vehicle cleared");
        self.refresh_keys();
    }

    /// Chooses the customer; a different customer clears the vehicle
    pub fn set_customer(&mut self, customer_id: Option<CustomerId>) {
        if self.identity_locked("customer") || self.draft.customer_id == customer_id {
            return;
        }
        self.draft.customer_id = customer_id;
        self.draft.vehicle_id = None;
        tracing::debug!(customer_id = ?customer_id, "customer changed, vehicle cleared");
        self.refresh_keys();
    }

    pub fn set_vehicle(&mut self, vehicle_id: Option<VehicleId>) {
        if self.identity_locked("vehicle") {
            return;
        }
        self.draft.vehicle_id = vehicle_id;
        self.refresh_keys();
    }

    pub fn set_policy_type(&mut self, policy_type: Option<PolicyTypeCode>) {
        self.draft.policy_type = policy_type;
        self.refresh_keys();
    }

    pub fn set_currency(&mut self, currency_id: Option<CurrencyId>) {
        self.draft.currency_id = currency_id;
        self.refresh_keys();
    }

    pub fn set_start_date(&mut self, start_date: Option<NaiveDate>) {
        self.draft.start_date = start_date;
        self.derive_end_date();
        self.refresh_keys();
    }

    /// Sets the end date by hand, which drops the duration
    pub fn set_end_date(&mut self, end_date: Option<NaiveDate>) {
        self.draft.end_date = end_date;
        self.draft.duration_days = None;
        self.refresh_keys();
    }

    /// Sets the duration; while creating, the end date follows it
    pub fn set_duration_days(&mut self, duration_days: Option<u32>) {
        self.draft.duration_days = duration_days;
        self.derive_end_date();
        self.refresh_keys();
    }

    /// Sets the premium typed by the user (`None` clears it)
    pub fn set_premium(&mut self, premium: Option<Decimal>) {
        self.draft.premium = premium;
    }

    fn identity_locked(&self, field: &'static str) -> bool {
        if let FormMode::Edit(policy_id) = self.mode {
            tracing::debug!(%policy_id, field, "identity fields are fixed after creation, change ignored");
            return true;
        }
        false
    }

    fn derive_end_date(&mut self) {
        if self.is_editing() {
            return;
        }
        if let (Some(start), Some(days)) = (self.draft.start_date, self.draft.duration_days) {
            if let Some(end) = end_date_for(start, days) {
                self.draft.end_date = Some(end);
            }
        }
    }

    fn refresh_keys(&mut self) {
        self.customers.set_key(self.draft.dealer_id);
        self.vehicles.set_key(self.draft.customer_id);
        let price_key = match self.mode {
            FormMode::Create => self.draft.price_request(),
            FormMode::Edit(_) => None,
        };
        if self.price.set_key(price_key) && self.price.key().is_some() {
            tracing::debug!("pricing inputs changed, price requested");
        }
    }

    // ------------------------------------------------------------------
    // Option sets and derived values
    // ------------------------------------------------------------------

    pub fn dealers(&self) -> &[Dealer] {
        self.dealers.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn policy_types(&self) -> &[PolicyType] {
        self.policy_types.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn currencies(&self) -> &[CurrencyOption] {
        self.currencies.data().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Customers of the chosen dealer (empty until loaded or on failure)
    pub fn customers(&self) -> &[Customer] {
        self.customers.data().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Vehicles of the chosen customer (empty until loaded or on failure)
    pub fn vehicles(&self) -> &[Vehicle] {
        self.vehicles.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn customers_state(&self) -> &QueryState<Vec<Customer>> {
        self.customers.state()
    }

    pub fn vehicles_state(&self) -> &QueryState<Vec<Vehicle>> {
        self.vehicles.state()
    }

    pub fn price_state(&self) -> &QueryState<CalculatedPrice> {
        self.price.state()
    }

    /// The customer select is usable once the dealer's customers loaded
    pub fn customer_select_enabled(&self) -> bool {
        self.draft.dealer_id.is_some() && self.customers.is_ready()
    }

    /// The vehicle select is usable once the customer's vehicles loaded
    pub fn vehicle_select_enabled(&self) -> bool {
        self.customer_select_enabled()
            && self.draft.customer_id.is_some()
            && self.vehicles.is_ready()
    }

    /// The latest calculated price for the current inputs
    pub fn calculated_price(&self) -> Option<&CalculatedPrice> {
        self.price.data()
    }

    /// The premium offered as a default (placeholder) for the premium field
    pub fn suggested_premium(&self) -> Option<Decimal> {
        self.calculated_price().map(CalculatedPrice::suggested_premium)
    }

    /// The premium that will be submitted: typed value first, else the suggestion
    pub fn effective_premium(&self) -> Option<Decimal> {
        self.draft.premium.or_else(|| self.suggested_premium())
    }

    // ------------------------------------------------------------------
    // Fetch protocol
    // ------------------------------------------------------------------

    /// Tickets for every slot that needs data, in cascade order
    pub fn begin_fetches(&mut self) -> Vec<FetchRequest> {
        let mut requests = Vec::new();
        if let Some(t) = self.dealers.begin() {
            requests.push(FetchRequest::Dealers(t));
        }
        if let Some(t) = self.policy_types.begin() {
            requests.push(FetchRequest::PolicyTypes(t));
        }
        if let Some(t) = self.currencies.begin() {
            requests.push(FetchRequest::Currencies(t));
        }
        if let Some(t) = self.customers.begin() {
            requests.push(FetchRequest::Customers(t));
        }
        if let Some(t) = self.vehicles.begin() {
            requests.push(FetchRequest::Vehicles(t));
        }
        if let Some(t) = self.price.begin() {
            requests.push(FetchRequest::Price(t));
        }
        requests
    }

    /// Stores a fetch result; returns false if it was stale and dropped
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        let applied = match outcome {
            FetchOutcome::Dealers(t, r) => self.dealers.complete(t, r),
            FetchOutcome::PolicyTypes(t, r) => self.policy_types.complete(t, r),
            FetchOutcome::Currencies(t, r) => self.currencies.complete(t, r),
            FetchOutcome::Customers(t, r) => self.customers.complete(t, r),
            FetchOutcome::Vehicles(t, r) => self.vehicles.complete(t, r),
            FetchOutcome::Price(t, r) => self.price.complete(t, r),
        };
        if !applied {
            tracing::debug!("stale fetch result discarded");
        }
        applied
    }

    /// Marks the vehicle list for refetching (after a vehicle was added)
    pub fn invalidate_vehicles(&mut self) {
        self.vehicles.invalidate();
    }

    /// Replaces the form with the stored policy returned by the backend
    pub fn accept(&mut self, record: &PolicyRecord) {
        *self = Self::edit(record);
    }
}
