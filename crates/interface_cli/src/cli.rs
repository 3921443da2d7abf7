//! CLI definition using clap

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CurrencyId, CustomerId, DealerId, PolicyId, VehicleId};
use domain_policy::PolicyForm;

/// Output format for results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "policy-console")]
#[command(version)]
#[command(about = "Create and edit vehicle policies against the brokerage backend")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (overrides BROKER_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format (table, json)
    #[arg(long, short = 'f', global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Correlation id sent with every backend call; generated when absent
    #[arg(long, global = true)]
    pub correlation_id: Option<String>,

    /// Verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List dealers
    Dealers,

    /// List the customers of a dealer
    Customers {
        /// Dealer id (bare uuid or DLR-<uuid>)
        #[arg(long)]
        dealer: DealerId,
    },

    /// List the vehicles of a customer
    Vehicles {
        /// Customer id
        #[arg(long)]
        customer: CustomerId,
    },

    /// List policy types
    PolicyTypes,

    /// List currencies
    Currencies,

    /// Register a vehicle for a customer
    AddVehicle {
        /// Owning customer id
        #[arg(long)]
        customer: CustomerId,

        /// Plate number (spaces are removed, letters upper-cased)
        #[arg(long)]
        plate: String,

        #[arg(long)]
        brand: String,

        #[arg(long)]
        model: String,
    },

    /// Ask the backend for a price without creating anything
    Quote {
        #[command(flatten)]
        draft: DraftArgs,
    },

    /// Create a policy; the premium defaults to the calculated price
    Create {
        #[command(flatten)]
        draft: DraftArgs,

        /// Premium to submit instead of the calculated price
        #[arg(long)]
        premium: Option<Decimal>,
    },

    /// Change the type or period of an existing policy
    Update {
        /// Policy id
        #[arg(long)]
        policy: PolicyId,

        /// New policy type code
        #[arg(long = "type")]
        policy_type: Option<String>,

        /// New start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// New end date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
    },

    /// Check that the backend is reachable
    Health,
}

/// Fields of a new policy draft
#[derive(Debug, Clone, Args)]
pub struct DraftArgs {
    #[arg(long)]
    pub dealer: DealerId,

    #[arg(long)]
    pub customer: CustomerId,

    #[arg(long)]
    pub vehicle: VehicleId,

    /// Policy type code (e.g. Kasko, Traffic)
    #[arg(long = "type")]
    pub policy_type: String,

    #[arg(long)]
    pub currency: Option<CurrencyId>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// Duration in days; the end date is derived from it
    #[arg(long, conflicts_with = "end")]
    pub duration: Option<u32>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,
}

impl DraftArgs {
    /// Fills a form in cascade order, parents before children
    pub fn apply_to(&self, form: &mut PolicyForm) {
        form.set_dealer(Some(self.dealer));
        form.set_customer(Some(self.customer));
        form.set_vehicle(Some(self.vehicle));
        form.set_policy_type(Some(self.policy_type.as_str().into()));
        form.set_currency(self.currency);
        form.set_start_date(Some(self.start));
        if let Some(days) = self.duration {
            form.set_duration_days(Some(days));
        }
        if let Some(end) = self.end {
            form.set_end_date(Some(end));
        }
    }
}
