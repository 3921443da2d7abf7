//! Cascading lookup resolver
//!
//! Resolves the option sets of the policy form in dependency order:
//! dealers, then the customers of the chosen dealer, then the vehicles of the
//! chosen customer. Results are cached per parent key, so going back to a
//! dealer that was already visited does not hit the backend again. Failed
//! fetches are never cached.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::RwLock;
use validator::Validate;

use core_kernel::{CustomerId, DealerId, OperationMetadata, PortError};

use crate::model::{CurrencyOption, Customer, Dealer, NewVehicle, PolicyType, Vehicle};
use crate::ports::LookupPort;

/// List cache keyed by parent id
#[derive(Debug)]
struct LookupCache<K, V> {
    entries: RwLock<HashMap<K, Vec<V>>>,
}

impl<K, V> Default for LookupCache<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Clone + std::fmt::Debug, V: Clone> LookupCache<K, V> {
    async fn get_or_fetch<F, Fut>(&self, key: K, what: &'static str, fetch: F) -> Result<Vec<V>, PortError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<V>, PortError>>,
    {
        if let Some(hit) = self.entries.read().await.get(&key) {
            tracing::trace!(lookup = what, key = ?key, "lookup cache hit");
            return Ok(hit.clone());
        }

        match fetch().await {
            Ok(fresh) => {
                tracing::debug!(lookup = what, key = ?key, count = fresh.len(), "lookup fetched");
                self.entries.write().await.insert(key, fresh.clone());
                Ok(fresh)
            }
            Err(e) => {
                tracing::warn!(lookup = what, key = ?key, error = %e, "lookup failed");
                Err(e)
            }
        }
    }

    async fn invalidate(&self, key: &K) {
        self.entries.write().await.remove(key);
    }
}

/// Resolves dealer → customer → vehicle option sets through a [`LookupPort`]
///
/// # Example
///
/// ```rust,ignore
/// let resolver = CascadingResolver::new(Arc::new(adapter));
/// let dealers = resolver.dealers().await?;
/// let customers = resolver.customers_of(dealers[0].id).await?;
/// ```
#[derive(Debug)]
pub struct CascadingResolver<L: ?Sized> {
    port: Arc<L>,
    metadata: Option<OperationMetadata>,
    dealers: LookupCache<(), Dealer>,
    customers: LookupCache<DealerId, Customer>,
    vehicles: LookupCache<CustomerId, Vehicle>,
    policy_types: LookupCache<(), PolicyType>,
    currencies: LookupCache<(), CurrencyOption>,
}

impl<L: LookupPort + ?Sized> CascadingResolver<L> {
    pub fn new(port: Arc<L>) -> Self {
        Self {
            port,
            metadata: None,
            dealers: LookupCache::default(),
            customers: LookupCache::default(),
            vehicles: LookupCache::default(),
            policy_types: LookupCache::default(),
            currencies: LookupCache::default(),
        }
    }

    /// Attaches metadata (e.g. a correlation id) to every backend call
    pub fn with_metadata(mut self, metadata: OperationMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub async fn dealers(&self) -> Result<Vec<Dealer>, PortError> {
        self.dealers
            .get_or_fetch((), "dealers", || self.port.list_dealers(self.metadata.clone()))
            .await
    }

    /// Customers registered under `dealer_id`
    pub async fn customers_of(&self, dealer_id: DealerId) -> Result<Vec<Customer>, PortError> {
        self.customers
            .get_or_fetch(dealer_id, "customers", || {
                self.port.list_customers(dealer_id, self.metadata.clone())
            })
            .await
    }

    /// Vehicles owned by `customer_id`
    pub async fn vehicles_of(&self, customer_id: CustomerId) -> Result<Vec<Vehicle>, PortError> {
        self.vehicles
            .get_or_fetch(customer_id, "vehicles", || {
                self.port.list_vehicles(customer_id, self.metadata.clone())
            })
            .await
    }

    pub async fn policy_types(&self) -> Result<Vec<PolicyType>, PortError> {
        self.policy_types
            .get_or_fetch((), "policy_types", || {
                self.port.list_policy_types(self.metadata.clone())
            })
            .await
    }

    pub async fn currencies(&self) -> Result<Vec<CurrencyOption>, PortError> {
        self.currencies
            .get_or_fetch((), "currencies", || self.port.list_currencies(self.metadata.clone()))
            .await
    }

    /// Registers a vehicle and drops the owner's cached vehicle list
    ///
    /// The request is validated locally before anything is sent.
    pub async fn add_vehicle(&self, request: NewVehicle) -> Result<Vehicle, PortError> {
        if let Err(errors) = request.validate() {
            return Err(PortError::validation(errors.to_string()));
        }

        let customer_id = request.customer_id;
        let vehicle = self.port.create_vehicle(request, self.metadata.clone()).await?;
        self.vehicles.invalidate(&customer_id).await;

        tracing::info!(customer_id = %customer_id, vehicle_id = %vehicle.id, "vehicle registered");
        Ok(vehicle)
    }
}
