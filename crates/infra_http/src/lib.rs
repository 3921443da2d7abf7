//! HTTP Infrastructure Layer
//!
//! REST adapter for the brokerage backend. [`BrokerHttpAdapter`] implements
//! the lookup, pricing and policy ports with `reqwest`, maps HTTP failures to
//! `PortError` and guards the backend with a circuit breaker.

pub mod adapter;
pub mod config;
pub mod dto;
pub mod error;
mod circuit_breaker;
mod ports;

pub use adapter::BrokerHttpAdapter;
pub use config::{HttpAdapterConfig, CORRELATION_ID_HEADER};
pub use error::HttpAdapterError;
