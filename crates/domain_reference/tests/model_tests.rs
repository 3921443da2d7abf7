//! Wire-format tests for reference data
//!
//! The backend speaks camelCase JSON; these tests pin the field names the
//! console depends on.

use core_kernel::{CustomerId, DealerId, VehicleId};
use domain_reference::{CurrencyOption, Customer, Dealer, NewVehicle, PolicyType, Vehicle};
use serde_json::json;

#[test]
fn test_dealer_from_backend_json() {
    let id = DealerId::new();
    let dealer: Dealer = serde_json::from_value(json!({
        "id": id.as_uuid().to_string(),
        "name": "Marmara Sigorta Aracilik",
        "code": "MSA"
    }))
    .unwrap();

    assert_eq!(dealer.id, id);
    assert_eq!(dealer.to_string(), "Marmara Sigorta Aracilik (MSA)");
}

#[test]
fn test_customer_from_backend_json() {
    let customer: Customer = serde_json::from_value(json!({
        "id": CustomerId::new().as_uuid().to_string(),
        "firstName": "Zeynep",
        "lastName": "Arslan",
        "nationalId": "10000000146"
    }))
    .unwrap();

    assert_eq!(customer.full_name(), "Zeynep Arslan");
}

#[test]
fn test_vehicle_from_backend_json() {
    let vehicle: Vehicle = serde_json::from_value(json!({
        "id": VehicleId::new().as_uuid().to_string(),
        "plateNumber": "34ABC123",
        "brand": "Ford",
        "model": "Focus"
    }))
    .unwrap();

    assert_eq!(vehicle.to_string(), "34ABC123 - Ford Focus");
}

#[test]
fn test_policy_type_and_currency() {
    let policy_type: PolicyType =
        serde_json::from_value(json!({"code": "Kasko", "name": "Kasko Sigortasi"})).unwrap();
    assert_eq!(policy_type.code.as_str(), "Kasko");

    let currency: CurrencyOption = serde_json::from_value(json!({
        "id": core_kernel::CurrencyId::new().as_uuid().to_string(),
        "code": "try"
    }))
    .unwrap();
    assert_eq!(currency.code.as_str(), "TRY");
    assert!(currency.symbol.is_none());
}

#[test]
fn test_new_vehicle_serialises_camel_case() {
    let owner = CustomerId::new();
    let value = serde_json::to_value(NewVehicle::new(owner, "35 ab 77", "Opel", "Astra")).unwrap();

    assert_eq!(value["customerId"], json!(owner.as_uuid().to_string()));
    assert_eq!(value["plateNumber"], json!("35AB77"));
}
