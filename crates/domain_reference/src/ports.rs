//! Reference Data Ports
//!
//! The `LookupPort` trait is everything the console needs from the backend's
//! reference data endpoints. The REST adapter lives in `infra_http`; an
//! in-memory mock is available for tests behind the `mock` feature.

use async_trait::async_trait;

use core_kernel::{CustomerId, DealerId, DomainPort, OperationMetadata, PortError};

use crate::model::{CurrencyOption, Customer, Dealer, NewVehicle, PolicyType, Vehicle};

/// Port for the backend's reference data
#[async_trait]
pub trait LookupPort: DomainPort {
    /// Lists all dealers
    async fn list_dealers(
        &self,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Dealer>, PortError>;

    /// Lists the customers registered under a dealer
    async fn list_customers(
        &self,
        dealer_id: DealerId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Customer>, PortError>;

    /// Lists the vehicles owned by a customer
    async fn list_vehicles(
        &self,
        customer_id: CustomerId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Vehicle>, PortError>;

    /// Lists the policy types the backend can issue
    async fn list_policy_types(
        &self,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<PolicyType>, PortError>;

    /// Lists the currencies policies can be priced in
    async fn list_currencies(
        &self,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<CurrencyOption>, PortError>;

    /// Registers a new vehicle for a customer
    ///
    /// # Returns
    ///
    /// The created vehicle with its backend-assigned id
    async fn create_vehicle(
        &self,
        request: NewVehicle,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vehicle, PortError>;
}

/// Mock implementation of LookupPort for testing
///
/// Holds reference data in memory, counts calls per operation and can be told
/// to fail specific operations.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use tokio::sync::RwLock;

    use core_kernel::VehicleId;

    /// Operations of the lookup port, used for call counting and failure injection
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum LookupOp {
        Dealers,
        Customers,
        Vehicles,
        PolicyTypes,
        Currencies,
        CreateVehicle,
    }

    /// In-memory mock implementation of LookupPort
    #[derive(Debug, Default)]
    pub struct MockLookupPort {
        dealers: Vec<Dealer>,
        customers: RwLock<HashMap<DealerId, Vec<Customer>>>,
        vehicles: RwLock<HashMap<CustomerId, Vec<Vehicle>>>,
        policy_types: Vec<PolicyType>,
        currencies: Vec<CurrencyOption>,
        failing: RwLock<HashSet<LookupOp>>,
        calls: RwLock<HashMap<LookupOp, usize>>,
    }

    impl MockLookupPort {
        /// Creates an empty mock port
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dealer(mut self, dealer: Dealer) -> Self {
            self.dealers.push(dealer);
            self
        }

        pub fn with_customer(mut self, dealer_id: DealerId, customer: Customer) -> Self {
            self.customers.get_mut().entry(dealer_id).or_default().push(customer);
            self
        }

        pub fn with_vehicle(mut self, customer_id: CustomerId, vehicle: Vehicle) -> Self {
            self.vehicles.get_mut().entry(customer_id).or_default().push(vehicle);
            self
        }

        pub fn with_policy_type(mut self, policy_type: PolicyType) -> Self {
            self.policy_types.push(policy_type);
            self
        }

        pub fn with_currency(mut self, currency: CurrencyOption) -> Self {
            self.currencies.push(currency);
            self
        }

        /// Makes every subsequent call of `op` fail with a service error
        pub async fn fail(&self, op: LookupOp) {
            self.failing.write().await.insert(op);
        }

        /// Restores normal behaviour for `op`
        pub async fn recover(&self, op: LookupOp) {
            self.failing.write().await.remove(&op);
        }

        /// Number of times `op` has been called
        pub async fn call_count(&self, op: LookupOp) -> usize {
            self.calls.read().await.get(&op).copied().unwrap_or(0)
        }

        async fn record(&self, op: LookupOp) -> Result<(), PortError> {
            *self.calls.write().await.entry(op).or_insert(0) += 1;
            if self.failing.read().await.contains(&op) {
                return Err(PortError::ServiceUnavailable {
                    service: format!("mock lookup {:?}", op),
                });
            }
            Ok(())
        }
    }

    impl DomainPort for MockLookupPort {}

    #[async_trait]
    impl LookupPort for MockLookupPort {
        async fn list_dealers(
            &self,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Vec<Dealer>, PortError> {
            self.record(LookupOp::Dealers).await?;
            Ok(self.dealers.clone())
        }

        async fn list_customers(
            &self,
            dealer_id: DealerId,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Vec<Customer>, PortError> {
            self.record(LookupOp::Customers).await?;
            Ok(self.customers.read().await.get(&dealer_id).cloned().unwrap_or_default())
        }

        async fn list_vehicles(
            &self,
            customer_id: CustomerId,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Vec<Vehicle>, PortError> {
            self.record(LookupOp::Vehicles).await?;
            Ok(self.vehicles.read().await.get(&customer_id).cloned().unwrap_or_default())
        }

        async fn list_policy_types(
            &self,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Vec<PolicyType>, PortError> {
            self.record(LookupOp::PolicyTypes).await?;
            Ok(self.policy_types.clone())
        }

        async fn list_currencies(
            &self,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Vec<CurrencyOption>, PortError> {
            self.record(LookupOp::Currencies).await?;
            Ok(self.currencies.clone())
        }

        async fn create_vehicle(
            &self,
            request: NewVehicle,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Vehicle, PortError> {
            self.record(LookupOp::CreateVehicle).await?;

            let mut vehicles = self.vehicles.write().await;
            let owned = vehicles.entry(request.customer_id).or_default();
            if owned.iter().any(|v| v.plate_number == request.plate_number) {
                return Err(PortError::conflict(format!(
                    "Vehicle with plate {} already exists",
                    request.plate_number
                )));
            }

            let vehicle = Vehicle {
                id: VehicleId::new_v7(),
                plate_number: request.plate_number,
                brand: request.brand,
                model: request.model,
            };
            owned.push(vehicle.clone());
            Ok(vehicle)
        }
    }
}
