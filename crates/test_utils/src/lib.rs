//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! policy console test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built reference data, prices and populated mock ports
//! - `builders`: Builder patterns for policy records and forms
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
