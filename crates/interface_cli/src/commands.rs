//! Command handlers
//!
//! Each command runs the policy form workflow through [`PolicyFormService`]
//! and returns a [`CommandOutput`]; printing is left to `output`.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;

use core_kernel::{HealthCheckResult, HealthCheckable, OperationMetadata, QueryState};
use domain_policy::{
    Notice, PolicyForm, PolicyFormService, PolicyPort, PolicyRecord, SubmissionOutcome,
};
use domain_pricing::{CalculatedPrice, PriceCalculationRequest, PricingPort};
use domain_reference::{
    CurrencyOption, Customer, Dealer, LookupPort, NewVehicle, PolicyType, Vehicle,
};
use infra_http::BrokerHttpAdapter;

use crate::cli::{Cli, Commands, DraftArgs};
use crate::config::ConsoleConfig;
use crate::output;

/// Price quoted for a draft
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteReport {
    pub request: PriceCalculationRequest,
    pub price: CalculatedPrice,
    pub suggested_premium: Decimal,
}

/// Stored policy after a create or update
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReport {
    pub created: bool,
    pub policy: PolicyRecord,
    pub notices: Vec<Notice>,
}

impl From<SubmissionOutcome> for SubmissionReport {
    fn from(outcome: SubmissionOutcome) -> Self {
        Self {
            created: outcome.created,
            policy: outcome.policy,
            notices: outcome.notices,
        }
    }
}

/// Result of a command, serialized as-is for JSON output
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CommandOutput {
    Dealers(Vec<Dealer>),
    Customers(Vec<Customer>),
    Vehicles(Vec<Vehicle>),
    PolicyTypes(Vec<PolicyType>),
    Currencies(Vec<CurrencyOption>),
    Vehicle(Vehicle),
    Quote(QuoteReport),
    Submission(SubmissionReport),
    /// The backend declined the submission with an advisory; nothing was stored
    Advisory(Notice),
    Health(HealthCheckResult),
}

/// Metadata attached to every backend call of this invocation
pub fn operation_metadata(cli: &Cli, config: &ConsoleConfig) -> OperationMetadata {
    let correlation_id = cli
        .correlation_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let metadata = OperationMetadata::with_correlation_id(correlation_id);
    match &config.operator {
        Some(operator) => metadata.initiated_by(operator.clone()),
        None => metadata,
    }
}

/// Execute CLI command against the configured backend
pub async fn execute(cli: Cli, mut config: ConsoleConfig) -> Result<()> {
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }

    let adapter = Arc::new(
        BrokerHttpAdapter::new(config.adapter_config()).context("building backend client")?,
    );
    let metadata = operation_metadata(&cli, &config);
    tracing::debug!(
        base_url = adapter.base_url(),
        correlation_id = ?metadata.correlation_id,
        "console starting"
    );

    let service = PolicyFormService::new(adapter.clone(), adapter.clone(), adapter.clone())
        .with_metadata(metadata);
    let result = run(&service, adapter.as_ref(), cli.command).await?;
    output::emit(cli.format, &result)
}

/// Runs one command; `health` answers the `health` command
pub async fn run<L, P, S>(
    service: &PolicyFormService<L, P, S>,
    health: &dyn HealthCheckable,
    command: Commands,
) -> Result<CommandOutput>
where
    L: LookupPort + ?Sized,
    P: PricingPort + ?Sized,
    S: PolicyPort + ?Sized,
{
    let resolver = service.resolver();
    let output = match command {
        Commands::Dealers => CommandOutput::Dealers(resolver.dealers().await?),
        Commands::Customers { dealer } => {
            CommandOutput::Customers(resolver.customers_of(dealer).await?)
        }
        Commands::Vehicles { customer } => {
            CommandOutput::Vehicles(resolver.vehicles_of(customer).await?)
        }
        Commands::PolicyTypes => CommandOutput::PolicyTypes(resolver.policy_types().await?),
        Commands::Currencies => CommandOutput::Currencies(resolver.currencies().await?),
        Commands::AddVehicle {
            customer,
            plate,
            brand,
            model,
        } => {
            let vehicle = resolver
                .add_vehicle(NewVehicle::new(customer, plate, brand, model))
                .await?;
            CommandOutput::Vehicle(vehicle)
        }
        Commands::Quote { draft } => CommandOutput::Quote(quote(service, &draft).await?),
        Commands::Create { draft, premium } => create(service, &draft, premium).await?,
        Commands::Update {
            policy,
            policy_type,
            start,
            end,
        } => {
            let mut form = service.edit_form(policy).await?;
            if let Some(code) = policy_type {
                form.set_policy_type(Some(code.as_str().into()));
            }
            if start.is_some() {
                form.set_start_date(start);
            }
            if end.is_some() {
                form.set_end_date(end);
            }
            service.sync(&mut form).await;
            warn_unknown_policy_type(&form);
            submit(service, &mut form).await?
        }
        Commands::Health => CommandOutput::Health(health.health_check().await),
    };
    Ok(output)
}

async fn quote<L, P, S>(service: &PolicyFormService<L, P, S>, draft: &DraftArgs) -> Result<QuoteReport>
where
    L: LookupPort + ?Sized,
    P: PricingPort + ?Sized,
    S: PolicyPort + ?Sized,
{
    let mut form = service.new_form();
    draft.apply_to(&mut form);
    form.draft().period().context("cannot price the draft")?;
    let request = form
        .draft()
        .price_request()
        .context("cannot price the draft: customer, vehicle or policy type is missing")?;

    service.sync(&mut form).await;
    match form.price_state() {
        QueryState::Ready(price) => Ok(QuoteReport {
            request,
            suggested_premium: price.suggested_premium(),
            price: price.clone(),
        }),
        QueryState::Failed(message) => bail!("price calculation failed: {}", message),
        QueryState::Idle | QueryState::Loading => bail!("no price was calculated"),
    }
}

async fn create<L, P, S>(
    service: &PolicyFormService<L, P, S>,
    draft: &DraftArgs,
    premium: Option<Decimal>,
) -> Result<CommandOutput>
where
    L: LookupPort + ?Sized,
    P: PricingPort + ?Sized,
    S: PolicyPort + ?Sized,
{
    let mut form = service.new_form();
    draft.apply_to(&mut form);
    form.set_premium(premium);

    service.sync(&mut form).await;
    warn_unknown_policy_type(&form);
    if let QueryState::Failed(message) = form.price_state() {
        tracing::warn!(%message, "no price suggestion; submitting without it");
    }

    submit(service, &mut form).await
}

/// Submits the form; an advisory rejection is reported instead of failing
async fn submit<L, P, S>(
    service: &PolicyFormService<L, P, S>,
    form: &mut PolicyForm,
) -> Result<CommandOutput>
where
    L: LookupPort + ?Sized,
    P: PricingPort + ?Sized,
    S: PolicyPort + ?Sized,
{
    match service.submit(form).await {
        Ok(outcome) => Ok(CommandOutput::Submission(outcome.into())),
        Err(e) => match e.advisory() {
            Some(notice) => Ok(CommandOutput::Advisory(notice)),
            None => Err(e.into()),
        },
    }
}

/// The backend is the authority on policy types; an unlisted code is only logged
fn warn_unknown_policy_type(form: &PolicyForm) {
    let Some(code) = form.draft().policy_type() else {
        return;
    };
    let types = form.policy_types();
    if !types.is_empty() && !types.iter().any(|t| &t.code == code) {
        tracing::warn!(policy_type = %code, "policy type is not in the backend's list");
    }
}
