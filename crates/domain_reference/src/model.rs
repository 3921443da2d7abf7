//! Reference data as published by the backend
//!
//! These types mirror the backend's JSON (camelCase) so adapters can decode
//! them directly. The console never edits them, except for registering a new
//! vehicle through [`NewVehicle`].

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use core_kernel::{CurrencyCode, CurrencyId, CustomerId, DealerId, VehicleId};

/// An insurance sales intermediary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dealer {
    pub id: DealerId,
    pub name: String,
    pub code: String,
}

impl fmt::Display for Dealer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

/// A customer registered under a dealer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.full_name(), self.national_id)
    }
}

/// A vehicle owned by a customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: VehicleId,
    pub plate_number: String,
    pub brand: String,
    pub model: String,
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} {}", self.plate_number, self.brand, self.model)
    }
}

/// Code of a policy type as the backend names it (e.g. "Kasko", "Traffic")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyTypeCode(String);

impl PolicyTypeCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PolicyTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PolicyTypeCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// A policy type offered by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyType {
    pub code: PolicyTypeCode,
    pub name: String,
}

/// A currency policies can be priced in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyOption {
    pub id: CurrencyId,
    pub code: CurrencyCode,
    #[serde(default)]
    pub symbol: Option<String>,
}

/// Request to register a vehicle for a customer ("add vehicle")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewVehicle {
    pub customer_id: CustomerId,
    #[validate(length(min = 2, max = 16, message = "plate number must be 2-16 characters"))]
    pub plate_number: String,
    #[validate(length(min = 1, max = 64, message = "brand is required"))]
    pub brand: String,
    #[validate(length(min = 1, max = 64, message = "model is required"))]
    pub model: String,
}

impl NewVehicle {
    /// Creates a request with the plate normalised (trimmed, upper case, no inner spaces)
    pub fn new(
        customer_id: CustomerId,
        plate_number: impl AsRef<str>,
        brand: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let plate_number = plate_number
            .as_ref()
            .split_whitespace()
            .collect::<String>()
            .to_uppercase();
        Self {
            customer_id,
            plate_number,
            brand: brand.into().trim().to_string(),
            model: model.into().trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_vehicle_normalises_plate() {
        let request = NewVehicle::new(CustomerId::new(), " 34 abc 123 ", "Fiat ", "Egea");
        assert_eq!(request.plate_number, "34ABC123");
        assert_eq!(request.brand, "Fiat");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_new_vehicle_requires_brand_and_model() {
        let request = NewVehicle::new(CustomerId::new(), "34ABC123", "", "");
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("brand"));
        assert!(fields.contains_key("model"));
        assert!(!fields.contains_key("plate_number"));
    }

    #[test]
    fn test_customer_display() {
        let customer = Customer {
            id: CustomerId::new(),
            first_name: "Ayse".to_string(),
            last_name: "Yilmaz".to_string(),
            national_id: "12345678901".to_string(),
        };
        assert_eq!(customer.to_string(), "Ayse Yilmaz - 12345678901");
    }
}
