//! Policy Console - command-line binary
//!
//! # Usage
//!
//! ```bash
//! policy-console dealers
//! policy-console customers --dealer <uuid>
//! policy-console quote --dealer <uuid> --customer <uuid> --vehicle <uuid> \
//!     --type Kasko --start 2024-01-01 --duration 30
//! policy-console create ... --premium 1500
//! policy-console update --policy <uuid> --end 2024-06-30
//! ```
//!
//! # Environment Variables
//!
//! * `BROKER_BASE_URL` - Backend base URL (default: http://localhost:8080/api)
//! * `BROKER_API_TOKEN` - Bearer token
//! * `BROKER_API_KEY` / `BROKER_API_KEY_HEADER` - API key and its header (default: X-Api-Key)
//! * `BROKER_USERNAME` / `BROKER_PASSWORD` - Basic auth credentials
//! * `BROKER_TIMEOUT_SECS` - Request timeout in seconds (default: 30)
//! * `BROKER_OPERATOR` - Operator name recorded with each call
//! * `BROKER_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use interface_cli::{commands, Cli, ConsoleConfig};

#[tokio::main]
async fn main() {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match ConsoleConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let log_level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    init_tracing(log_level);

    if let Err(e) = commands::execute(cli, config).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Initializes tracing; logs go to stderr so stdout carries only results
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}
