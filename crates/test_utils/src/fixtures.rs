//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the brokerage backend's entities.
//! Identifiers are fixed so assertions can name them; only the fake-based
//! helpers produce varying data.

use chrono::NaiveDate;
use fake::faker::company::en::CompanyName;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rust_decimal_macros::dec;
use uuid::Uuid;

use core_kernel::{CurrencyCode, CurrencyId, CustomerId, DealerId, Money, PolicyId, VehicleId};
use domain_policy::ports::mock::MockPolicyPort;
use domain_pricing::ports::mock::MockPricingPort;
use domain_pricing::{CalculatedPrice, CurrencyInfo};
use domain_reference::ports::mock::MockLookupPort;
use domain_reference::{CurrencyOption, Customer, Dealer, PolicyType, Vehicle};

/// Fixture for identifiers
pub struct IdFixtures;

impl IdFixtures {
    /// Dealer "D1"
    pub fn dealer() -> DealerId {
        DealerId::from_uuid(Uuid::from_u128(0xD1))
    }

    /// A second dealer without customers of its own
    pub fn other_dealer() -> DealerId {
        DealerId::from_uuid(Uuid::from_u128(0xD2))
    }

    /// Customer "C1" of dealer D1
    pub fn customer() -> CustomerId {
        CustomerId::from_uuid(Uuid::from_u128(0xC1))
    }

    /// Customer "C2" of dealer D1
    pub fn other_customer() -> CustomerId {
        CustomerId::from_uuid(Uuid::from_u128(0xC2))
    }

    /// Vehicle "V1" of customer C1
    pub fn vehicle() -> VehicleId {
        VehicleId::from_uuid(Uuid::from_u128(0x71))
    }

    pub fn currency_try() -> CurrencyId {
        CurrencyId::from_uuid(Uuid::from_u128(0x949))
    }

    pub fn currency_eur() -> CurrencyId {
        CurrencyId::from_uuid(Uuid::from_u128(0x978))
    }

    pub fn policy() -> PolicyId {
        PolicyId::from_uuid(Uuid::from_u128(0xB01))
    }
}

/// Fixture for dates
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Standard policy start date (Jan 1, 2024)
    pub fn policy_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    /// Start plus 30 days (Jan 31, 2024)
    pub fn thirty_days_later() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
    }

    /// End of a one-year policy starting on the standard date
    pub fn year_end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
    }
}

/// Fixture for reference data
pub struct ReferenceFixtures;

impl ReferenceFixtures {
    pub fn dealer() -> Dealer {
        Dealer {
            id: IdFixtures::dealer(),
            name: "Anadolu Motors".to_string(),
            code: "D1".to_string(),
        }
    }

    pub fn other_dealer() -> Dealer {
        Dealer {
            id: IdFixtures::other_dealer(),
            name: "Ege Oto".to_string(),
            code: "D2".to_string(),
        }
    }

    pub fn customer() -> Customer {
        Customer {
            id: IdFixtures::customer(),
            first_name: "Ayse".to_string(),
            last_name: "Yilmaz".to_string(),
            national_id: "10000000146".to_string(),
        }
    }

    pub fn other_customer() -> Customer {
        Customer {
            id: IdFixtures::other_customer(),
            first_name: "Mehmet".to_string(),
            last_name: "Demir".to_string(),
            national_id: "20000000282".to_string(),
        }
    }

    pub fn vehicle() -> Vehicle {
        Vehicle {
            id: IdFixtures::vehicle(),
            plate_number: "34ABC123".to_string(),
            brand: "Renault".to_string(),
            model: "Clio".to_string(),
        }
    }

    pub fn kasko() -> PolicyType {
        PolicyType {
            code: "Kasko".into(),
            name: "Comprehensive (Kasko)".to_string(),
        }
    }

    pub fn traffic() -> PolicyType {
        PolicyType {
            code: "Traffic".into(),
            name: "Compulsory Traffic".to_string(),
        }
    }

    pub fn currency_try() -> CurrencyOption {
        CurrencyOption {
            id: IdFixtures::currency_try(),
            code: MoneyFixtures::try_code(),
            symbol: Some("₺".to_string()),
        }
    }

    pub fn currency_eur() -> CurrencyOption {
        CurrencyOption {
            id: IdFixtures::currency_eur(),
            code: MoneyFixtures::eur_code(),
            symbol: Some("€".to_string()),
        }
    }

    /// A dealer with a random company name
    pub fn fake_dealer() -> Dealer {
        let name: String = CompanyName().fake();
        Dealer {
            id: DealerId::new(),
            code: name.chars().filter(|c| c.is_ascii_alphabetic()).take(4).collect::<String>().to_uppercase(),
            name,
        }
    }

    /// A customer with random names
    pub fn fake_customer() -> Customer {
        Customer {
            id: CustomerId::new(),
            first_name: FirstName().fake(),
            last_name: LastName().fake(),
            national_id: (10_000_000_000u64..99_999_999_999u64).fake::<u64>().to_string(),
        }
    }
}

/// Fixture for money and prices
pub struct MoneyFixtures;

impl MoneyFixtures {
    pub fn try_code() -> CurrencyCode {
        CurrencyCode::new("TRY").unwrap()
    }

    pub fn eur_code() -> CurrencyCode {
        CurrencyCode::new("EUR").unwrap()
    }

    /// Kasko price: 1000.00 + 180.00 tax = 1180.00 TRY
    pub fn kasko_price() -> CalculatedPrice {
        let code = Self::try_code();
        CalculatedPrice {
            base_price: Money::new(dec!(1000.00), code.clone()),
            taxes: Money::new(dec!(180.00), code.clone()),
            total: Money::new(dec!(1180.00), code.clone()),
            currency: CurrencyInfo {
                id: Some(IdFixtures::currency_try()),
                code: code.clone(),
                symbol: Some("₺".to_string()),
            },
            dealer_commission: Money::new(dec!(100.00), code.clone()),
            observer_commission: Money::new(dec!(20.00), code),
            prices_in_other_currencies: vec![Money::new(dec!(34.50), Self::eur_code())],
        }
    }

    /// Traffic price: 400.00 + 72.00 tax = 472.00 TRY
    pub fn traffic_price() -> CalculatedPrice {
        let code = Self::try_code();
        CalculatedPrice {
            base_price: Money::new(dec!(400.00), code.clone()),
            taxes: Money::new(dec!(72.00), code.clone()),
            total: Money::new(dec!(472.00), code.clone()),
            currency: CurrencyInfo {
                id: Some(IdFixtures::currency_try()),
                code: code.clone(),
                symbol: Some("₺".to_string()),
            },
            dealer_commission: Money::new(dec!(40.00), code.clone()),
            observer_commission: Money::zero(code),
            prices_in_other_currencies: Vec::new(),
        }
    }
}

/// Fixture for mock backends populated with the standard reference data
///
/// Dealer D1 has customers C1 and C2; C1 owns vehicle V1. Kasko and Traffic
/// are offered and priced; D2 has no customers and no policy series.
pub struct BackendFixtures;

impl BackendFixtures {
    pub fn lookup_port() -> MockLookupPort {
        MockLookupPort::new()
            .with_dealer(ReferenceFixtures::dealer())
            .with_dealer(ReferenceFixtures::other_dealer())
            .with_customer(IdFixtures::dealer(), ReferenceFixtures::customer())
            .with_customer(IdFixtures::dealer(), ReferenceFixtures::other_customer())
            .with_vehicle(IdFixtures::customer(), ReferenceFixtures::vehicle())
            .with_policy_type(ReferenceFixtures::kasko())
            .with_policy_type(ReferenceFixtures::traffic())
            .with_currency(ReferenceFixtures::currency_try())
            .with_currency(ReferenceFixtures::currency_eur())
    }

    pub fn pricing_port() -> MockPricingPort {
        MockPricingPort::new()
            .with_price("Kasko", MoneyFixtures::kasko_price())
            .with_price("Traffic", MoneyFixtures::traffic_price())
    }

    pub fn policy_port() -> MockPolicyPort {
        MockPolicyPort::new()
            .with_policy_types(["Kasko", "Traffic"])
            .with_series_for([IdFixtures::dealer()])
    }
}
