//! Reference Data Domain
//!
//! Dealers, customers, vehicles, policy types and currencies are owned by the
//! brokerage backend. This crate models them, defines the port used to read
//! them, and resolves the dependent option sets of the policy form:
//!
//! ```text
//! dealers ──(dealerId)──> customers ──(customerId)──> vehicles
//! ```
//!
//! Each child list is keyed by its parent id, so choosing another dealer
//! invalidates the customer list and everything below it.

pub mod model;
pub mod ports;
pub mod resolver;

pub use model::{
    CurrencyOption, Customer, Dealer, NewVehicle, PolicyType, PolicyTypeCode, Vehicle,
};
pub use ports::LookupPort;
pub use resolver::CascadingResolver;
