//! Price derivation requester
//!
//! Sends price calculation requests for complete drafts and caches the
//! answers per request. A failed calculation (typically: no price list for
//! the combination) is not fatal; the caller simply leaves the premium to
//! manual entry.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use core_kernel::{OperationMetadata, PortError};

use crate::ports::PricingPort;
use crate::price::{CalculatedPrice, PriceCalculationRequest};

/// Issues price calculations through a [`PricingPort`]
#[derive(Debug)]
pub struct PriceRequester<P: ?Sized> {
    port: Arc<P>,
    metadata: Option<OperationMetadata>,
    cache: RwLock<HashMap<PriceCalculationRequest, CalculatedPrice>>,
}

impl<P: PricingPort + ?Sized> PriceRequester<P> {
    pub fn new(port: Arc<P>) -> Self {
        Self {
            port,
            metadata: None,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Attaches metadata (e.g. a correlation id) to every backend call
    pub fn with_metadata(mut self, metadata: OperationMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Calculates a price
    ///
    /// A failure is logged and returned; callers leave the premium to manual
    /// entry rather than aborting.
    pub async fn calculate(
        &self,
        request: &PriceCalculationRequest,
    ) -> Result<CalculatedPrice, PortError> {
        if let Some(hit) = self.cache.read().await.get(request) {
            return Ok(hit.clone());
        }

        let price = self
            .port
            .calculate_price(request.clone(), self.metadata.clone())
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    policy_type = %request.policy_type,
                    error = %e,
                    "price calculation unavailable, premium left for manual entry"
                );
            })?;

        tracing::debug!(
            customer_id = %request.customer_id,
            vehicle_id = %request.vehicle_id,
            policy_type = %request.policy_type,
            total = %price.total,
            "price calculated"
        );
        if !price.is_consistent() {
            tracing::warn!(total = %price.total, "calculated total differs from base price plus taxes");
        }

        self.cache.write().await.insert(request.clone(), price.clone());
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::MockPricingPort;
    use crate::price::CurrencyInfo;
    use chrono::NaiveDate;
    use core_kernel::{CurrencyCode, CustomerId, Money, VehicleId};
    use domain_reference::PolicyTypeCode;
    use rust_decimal_macros::dec;

    fn price(total: rust_decimal::Decimal) -> CalculatedPrice {
        let code = CurrencyCode::new("TRY").unwrap();
        let money = |amount| Money::new(amount, code.clone());
        CalculatedPrice {
            base_price: money(total - dec!(100)),
            taxes: money(dec!(100)),
            total: money(total),
            currency: CurrencyInfo { id: None, code: code.clone(), symbol: Some("₺".to_string()) },
            dealer_commission: money(dec!(50)),
            observer_commission: money(dec!(10)),
            prices_in_other_currencies: vec![],
        }
    }

    fn request(policy_type: &str) -> PriceCalculationRequest {
        PriceCalculationRequest {
            customer_id: CustomerId::new(),
            vehicle_id: VehicleId::new(),
            policy_type: PolicyTypeCode::new(policy_type),
            currency: None,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            duration_days: Some(30),
        }
    }

    #[tokio::test]
    async fn test_identical_requests_are_sent_once() {
        let port = Arc::new(MockPricingPort::new().with_price("Kasko", price(dec!(1500))));
        let requester = PriceRequester::new(port.clone());
        let kasko = request("Kasko");

        assert_eq!(requester.calculate(&kasko).await.unwrap().total.amount(), dec!(1500));
        assert!(requester.calculate(&kasko).await.is_ok());
        assert_eq!(port.requests().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let port = Arc::new(MockPricingPort::new());
        let requester = PriceRequester::new(port.clone());
        let traffic = request("Traffic");

        assert!(requester.calculate(&traffic).await.unwrap_err().is_not_found());
        assert!(requester.calculate(&traffic).await.is_err());
        assert_eq!(port.requests().await.len(), 2);
    }
}
