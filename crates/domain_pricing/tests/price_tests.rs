//! Calculated price tests
//!
//! - Suggested premium rounding
//! - Cross-currency lookup
//! - Consistency between base price, taxes and total

use core_kernel::{CurrencyCode, Money};
use domain_pricing::{CalculatedPrice, CurrencyInfo};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn code(c: &str) -> CurrencyCode {
    CurrencyCode::new(c).unwrap()
}

fn price(base: Decimal, taxes: Decimal, total: Decimal) -> CalculatedPrice {
    let money = |amount| Money::new(amount, code("TRY"));
    CalculatedPrice {
        base_price: money(base),
        taxes: money(taxes),
        total: money(total),
        currency: CurrencyInfo { id: None, code: code("TRY"), symbol: None },
        dealer_commission: money(dec!(120)),
        observer_commission: money(dec!(15)),
        prices_in_other_currencies: vec![
            Money::new(dec!(41.20), code("EUR")),
            Money::new(dec!(44.75), code("USD")),
        ],
    }
}

#[test]
fn test_suggested_premium_is_rounded_to_cents() {
    let p = price(dec!(1200.004), dec!(216.001), dec!(1416.005));
    assert_eq!(p.suggested_premium(), dec!(1416.00));
}

#[test]
fn test_price_in_other_currency() {
    let p = price(dec!(1200), dec!(216), dec!(1416));
    assert_eq!(p.price_in(&code("EUR")).unwrap().amount(), dec!(41.20));
    assert_eq!(p.price_in(&code("TRY")).unwrap().amount(), dec!(1416));
    assert!(p.price_in(&code("GBP")).is_none());
}

#[test]
fn test_consistency_check() {
    assert!(price(dec!(1200), dec!(216), dec!(1416)).is_consistent());
    assert!(!price(dec!(1200), dec!(216), dec!(1500)).is_consistent());
}

#[test]
fn test_price_serialises_for_display() {
    let value = serde_json::to_value(price(dec!(1200), dec!(216), dec!(1416))).unwrap();
    assert!(value.get("dealerCommission").is_some());
    assert!(value.get("pricesInOtherCurrencies").is_some());
}
