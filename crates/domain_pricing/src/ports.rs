//! Pricing Ports
//!
//! `PricingPort` fronts the backend's price calculation endpoint.

use async_trait::async_trait;

use core_kernel::{DomainPort, OperationMetadata, PortError};

use crate::price::{CalculatedPrice, PriceCalculationRequest};

/// Port for the backend's price calculation
#[async_trait]
pub trait PricingPort: DomainPort {
    /// Calculates the price for a fully specified draft
    ///
    /// # Errors
    ///
    /// `PortError::NotFound` when no price list matches the request
    async fn calculate_price(
        &self,
        request: PriceCalculationRequest,
        metadata: Option<OperationMetadata>,
    ) -> Result<CalculatedPrice, PortError>;
}

/// Mock implementation of PricingPort for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    use domain_reference::PolicyTypeCode;

    /// In-memory price lists keyed by policy type
    #[derive(Debug, Default)]
    pub struct MockPricingPort {
        price_lists: RwLock<HashMap<PolicyTypeCode, CalculatedPrice>>,
        requests: RwLock<Vec<PriceCalculationRequest>>,
    }

    impl MockPricingPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every request for `policy_type` is answered with `price`
        pub fn with_price(mut self, policy_type: impl Into<PolicyTypeCode>, price: CalculatedPrice) -> Self {
            self.price_lists.get_mut().insert(policy_type.into(), price);
            self
        }

        /// Removes the price list for `policy_type`
        pub async fn remove_price(&self, policy_type: &PolicyTypeCode) {
            self.price_lists.write().await.remove(policy_type);
        }

        /// Requests received so far, oldest first
        pub async fn requests(&self) -> Vec<PriceCalculationRequest> {
            self.requests.read().await.clone()
        }
    }

    impl DomainPort for MockPricingPort {}

    #[async_trait]
    impl PricingPort for MockPricingPort {
        async fn calculate_price(
            &self,
            request: PriceCalculationRequest,
            _metadata: Option<OperationMetadata>,
        ) -> Result<CalculatedPrice, PortError> {
            self.requests.write().await.push(request.clone());
            self.price_lists
                .read()
                .await
                .get(&request.policy_type)
                .cloned()
                .ok_or_else(|| PortError::not_found("PriceList", &request.policy_type))
        }
    }
}
