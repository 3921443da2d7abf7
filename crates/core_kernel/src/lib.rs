//! Core Kernel - Foundational types shared by the broker console crates
//!
//! This crate provides the building blocks used across all domain modules:
//! - Strongly-typed identifiers for backend entities
//! - Money with precise decimal arithmetic and backend currency codes
//! - Policy periods at day granularity
//! - Keyed query slots that discard stale responses
//! - Port abstractions shared by every adapter

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod query;
pub mod ports;

pub use money::{Money, CurrencyCode, MoneyError};
pub use temporal::{PolicyPeriod, TemporalError, end_date_for};
pub use identifiers::{
    DealerId, CustomerId, VehicleId, PolicyId, CurrencyId,
};
pub use query::{KeyedQuery, QueryState, QueryTicket};
pub use ports::{
    PortError, DomainPort, OperationMetadata, HealthCheckable, HealthCheckResult,
    AdapterHealth, CircuitBreakerConfig, ExternalSystemConfig, ExternalAuthConfig,
};
