//! Policy form service
//!
//! Wires the form to its three collaborators: the cascading lookup resolver,
//! the price requester and the submission dispatcher. The form itself stays
//! a plain state machine; this service performs the fetches it asks for.

use std::sync::Arc;

use core_kernel::{OperationMetadata, PolicyId, PortError};
use domain_pricing::{PriceRequester, PricingPort};
use domain_reference::{CascadingResolver, LookupPort, NewVehicle, Vehicle};

use crate::error::PolicyError;
use crate::form::{FetchOutcome, FetchRequest, FormMode, PolicyForm};
use crate::ports::PolicyPort;
use crate::submission::{SubmissionDispatcher, SubmissionError, SubmissionOutcome};

/// Upper bound on fetch rounds per sync; one round settles a form that is
/// not being edited concurrently.
const MAX_SYNC_ROUNDS: usize = 4;

/// Drives policy forms against the backend ports
///
/// # Example
///
/// ```rust,ignore
/// let service = PolicyFormService::new(lookups, pricing, policies);
/// let mut form = service.new_form();
/// form.set_dealer(Some(dealer_id));
/// service.sync(&mut form).await;
/// let outcome = service.submit(&mut form).await?;
/// ```
pub struct PolicyFormService<L: ?Sized, P: ?Sized, S: ?Sized> {
    resolver: CascadingResolver<L>,
    pricing: PriceRequester<P>,
    policies: Arc<S>,
    dispatcher: SubmissionDispatcher<S>,
    metadata: Option<OperationMetadata>,
}

impl<L, P, S> PolicyFormService<L, P, S>
where
    L: LookupPort + ?Sized,
    P: PricingPort + ?Sized,
    S: PolicyPort + ?Sized,
{
    pub fn new(lookups: Arc<L>, pricing: Arc<P>, policies: Arc<S>) -> Self {
        Self {
            resolver: CascadingResolver::new(lookups),
            pricing: PriceRequester::new(pricing),
            dispatcher: SubmissionDispatcher::new(policies.clone()),
            policies,
            metadata: None,
        }
    }

    /// Attaches metadata (e.g. a correlation id) to every backend call
    pub fn with_metadata(mut self, metadata: OperationMetadata) -> Self {
        self.resolver = self.resolver.with_metadata(metadata.clone());
        self.pricing = self.pricing.with_metadata(metadata.clone());
        self.dispatcher = self.dispatcher.with_metadata(metadata.clone());
        self.metadata = Some(metadata);
        self
    }

    pub fn resolver(&self) -> &CascadingResolver<L> {
        &self.resolver
    }

    pub fn pricing(&self) -> &PriceRequester<P> {
        &self.pricing
    }

    pub fn dispatcher(&self) -> &SubmissionDispatcher<S> {
        &self.dispatcher
    }

    /// An empty form for a new policy
    pub fn new_form(&self) -> PolicyForm {
        PolicyForm::new()
    }

    /// A form pre-filled from a stored policy
    pub async fn edit_form(&self, id: PolicyId) -> Result<PolicyForm, PortError> {
        let record = self.policies.get_policy(id, self.metadata.clone()).await?;
        Ok(PolicyForm::edit(&record))
    }

    /// Performs one requested fetch
    pub async fn fetch(&self, request: FetchRequest) -> FetchOutcome {
        fn text<T>(result: Result<T, PortError>) -> Result<T, String> {
            result.map_err(|e| e.server_message())
        }

        match request {
            FetchRequest::Dealers(t) => FetchOutcome::Dealers(t, text(self.resolver.dealers().await)),
            FetchRequest::PolicyTypes(t) => {
                FetchOutcome::PolicyTypes(t, text(self.resolver.policy_types().await))
            }
            FetchRequest::Currencies(t) => {
                FetchOutcome::Currencies(t, text(self.resolver.currencies().await))
            }
            FetchRequest::Customers(t) => {
                let dealer_id = *t.key();
                FetchOutcome::Customers(t, text(self.resolver.customers_of(dealer_id).await))
            }
            FetchRequest::Vehicles(t) => {
                let customer_id = *t.key();
                FetchOutcome::Vehicles(t, text(self.resolver.vehicles_of(customer_id).await))
            }
            FetchRequest::Price(t) => {
                let result = self.pricing.calculate(t.key()).await;
                FetchOutcome::Price(t, text(result))
            }
        }
    }

    /// Runs every fetch the form is waiting for, in cascade order
    pub async fn sync(&self, form: &mut PolicyForm) {
        for _ in 0..MAX_SYNC_ROUNDS {
            let requests = form.begin_fetches();
            if requests.is_empty() {
                return;
            }
            for request in requests {
                let outcome = self.fetch(request).await;
                form.apply(outcome);
            }
        }
    }

    /// Registers a vehicle for the form's customer and selects it
    pub async fn add_vehicle(
        &self,
        form: &mut PolicyForm,
        plate_number: &str,
        brand: &str,
        model: &str,
    ) -> Result<Vehicle, PolicyError> {
        if let FormMode::Edit(id) = form.mode() {
            return Err(PolicyError::EditingExistingPolicy(id.to_string()));
        }
        let customer_id = form
            .draft()
            .customer_id()
            .ok_or(PolicyError::MissingRequiredField("customerId"))?;

        let vehicle = self
            .resolver
            .add_vehicle(NewVehicle::new(customer_id, plate_number, brand, model))
            .await?;

        form.invalidate_vehicles();
        form.set_vehicle(Some(vehicle.id));
        self.sync(form).await;
        Ok(vehicle)
    }

    /// Submits the form; on success the form switches to editing the stored policy
    pub async fn submit(&self, form: &mut PolicyForm) -> Result<SubmissionOutcome, SubmissionError> {
        let outcome = self.dispatcher.submit(form).await?;
        form.accept(&outcome.policy);
        Ok(outcome)
    }
}
