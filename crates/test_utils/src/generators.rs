//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use core_kernel::{CustomerId, DealerId, VehicleId};
use domain_reference::PolicyTypeCode;

/// Strategy for policy start dates between 2000 and 2099
pub fn start_date_strategy() -> impl Strategy<Value = NaiveDate> {
    // Days from 2000-01-01
    (0i64..36_500i64).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + chrono::Duration::days(offset)
    })
}

/// Strategy for policy durations of one day up to ten years
pub fn duration_strategy() -> impl Strategy<Value = u32> {
    1u32..=3_650u32
}

/// Strategy for policy type codes
pub fn policy_type_strategy() -> impl Strategy<Value = PolicyTypeCode> {
    prop_oneof![
        Just(PolicyTypeCode::new("Kasko")),
        Just(PolicyTypeCode::new("Traffic")),
        "[A-Z][a-z]{2,10}".prop_map(PolicyTypeCode::new),
    ]
}

pub fn dealer_id_strategy() -> impl Strategy<Value = DealerId> {
    any::<u128>().prop_map(|n| DealerId::from_uuid(Uuid::from_u128(n)))
}

pub fn customer_id_strategy() -> impl Strategy<Value = CustomerId> {
    any::<u128>().prop_map(|n| CustomerId::from_uuid(Uuid::from_u128(n)))
}

pub fn vehicle_id_strategy() -> impl Strategy<Value = VehicleId> {
    any::<u128>().prop_map(|n| VehicleId::from_uuid(Uuid::from_u128(n)))
}

/// Strategy for premiums typed by a user (0.01 to 1,000,000.00)
pub fn premium_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}
