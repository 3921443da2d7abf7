//! Price calculation request and result
//!
//! The backend owns the price lists; the console only asks for a price for a
//! concrete customer/vehicle/type/period combination and shows the answer as
//! a suggestion.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CurrencyCode, CurrencyId, CustomerId, Money, MoneyError, VehicleId};
use domain_reference::PolicyTypeCode;

/// Inputs of a price calculation
///
/// Also serves as the cache key: two equal requests yield the same price.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceCalculationRequest {
    pub customer_id: CustomerId,
    pub vehicle_id: VehicleId,
    pub policy_type: PolicyTypeCode,
    pub currency: Option<CurrencyId>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_days: Option<u32>,
}

/// Currency a price was calculated in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyInfo {
    pub id: Option<CurrencyId>,
    pub code: CurrencyCode,
    pub symbol: Option<String>,
}

/// Price returned by the backend's pricing endpoint
///
/// Read-only; used only as the default premium of a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedPrice {
    pub base_price: Money,
    pub taxes: Money,
    pub total: Money,
    pub currency: CurrencyInfo,
    pub dealer_commission: Money,
    pub observer_commission: Money,
    #[serde(default)]
    pub prices_in_other_currencies: Vec<Money>,
}

impl CalculatedPrice {
    /// The total rounded to cents, as offered for the premium field
    pub fn suggested_premium(&self) -> Decimal {
        self.total.round_to_cents().amount()
    }

    /// Looks up the converted total for another currency
    pub fn price_in(&self, code: &CurrencyCode) -> Option<&Money> {
        if self.total.currency() == code {
            return Some(&self.total);
        }
        self.prices_in_other_currencies
            .iter()
            .find(|price| price.currency() == code)
    }

    /// Sum of base price and taxes
    pub fn gross(&self) -> Result<Money, MoneyError> {
        self.base_price.checked_add(&self.taxes)
    }

    /// True when `base + taxes` equals the reported total
    pub fn is_consistent(&self) -> bool {
        self.gross()
            .map(|gross| gross.round_to_cents() == self.total.round_to_cents())
            .unwrap_or(false)
    }
}
