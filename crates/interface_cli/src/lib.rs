//! Policy Console
//!
//! Command-line front end for the policy form workflow. Commands list the
//! backend's reference data, quote a draft, and create or update policies
//! through [`domain_policy::PolicyFormService`] over the HTTP adapter.

pub mod cli;
pub mod commands;
pub mod config;
pub mod output;

pub use cli::{Cli, Commands, DraftArgs, OutputFormat};
pub use commands::{execute, run, CommandOutput};
pub use config::{ConsoleConfig, ConsoleConfigError};
