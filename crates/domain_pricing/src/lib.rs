//! Pricing Domain
//!
//! The brokerage backend calculates premiums from its price lists. This crate
//! describes the calculation request and result, the port used to reach the
//! pricing endpoint, and the requester that derives a default premium for a
//! policy draft once all pricing inputs are known.

pub mod price;
pub mod ports;
pub mod requester;

pub use price::{CalculatedPrice, CurrencyInfo, PriceCalculationRequest};
pub use ports::PricingPort;
pub use requester::PriceRequester;
