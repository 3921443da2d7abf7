//! Backend Data Transfer Objects
//!
//! Reference data, policy records and request bodies share their wire shape
//! with the domain types and are (de)serialized directly. Only the responses
//! whose shape differs from the domain are decoded through the DTOs here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CurrencyCode, CurrencyId, Money, PortError};
use domain_policy::{PolicyRecord, SubmissionReceipt};
use domain_pricing::{CalculatedPrice, CurrencyInfo};

/// Response of `POST /pricing/calculate`
///
/// Amounts are plain decimals in the response currency.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceResponseDto {
    pub base_price: Decimal,
    pub taxes: Decimal,
    pub total: Decimal,
    pub currency: CurrencyDto,
    #[serde(default)]
    pub dealer_commission: Decimal,
    #[serde(default)]
    pub observer_commission: Decimal,
    #[serde(default)]
    pub prices_in_other_currencies: Vec<ConvertedPriceDto>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyDto {
    #[serde(default)]
    pub id: Option<CurrencyId>,
    pub code: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

/// The total converted into another currency
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedPriceDto {
    pub currency_code: String,
    pub total: Decimal,
}

fn currency_code(code: &str) -> Result<CurrencyCode, PortError> {
    CurrencyCode::new(code).map_err(|e| PortError::Transformation {
        message: format!("price response: {}", e),
    })
}

impl TryFrom<PriceResponseDto> for CalculatedPrice {
    type Error = PortError;

    fn try_from(dto: PriceResponseDto) -> Result<Self, Self::Error> {
        let code = currency_code(&dto.currency.code)?;
        let prices_in_other_currencies = dto
            .prices_in_other_currencies
            .into_iter()
            .map(|p| Ok(Money::new(p.total, currency_code(&p.currency_code)?)))
            .collect::<Result<Vec<_>, PortError>>()?;

        Ok(CalculatedPrice {
            base_price: Money::new(dto.base_price, code.clone()),
            taxes: Money::new(dto.taxes, code.clone()),
            total: Money::new(dto.total, code.clone()),
            dealer_commission: Money::new(dto.dealer_commission, code.clone()),
            observer_commission: Money::new(dto.observer_commission, code.clone()),
            currency: CurrencyInfo {
                id: dto.currency.id,
                code,
                symbol: dto.currency.symbol,
            },
            prices_in_other_currencies,
        })
    }
}

/// Response of `POST /policies` and `PUT /policies/{id}`: the stored policy
/// with any warnings alongside its fields
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PolicyResponseDto {
    #[serde(flatten)]
    pub policy: PolicyRecord,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl From<PolicyResponseDto> for SubmissionReceipt {
    fn from(dto: PolicyResponseDto) -> Self {
        SubmissionReceipt {
            policy: dto.policy,
            warnings: dto.warnings,
        }
    }
}
