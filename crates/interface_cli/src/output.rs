//! Output formatting

use anyhow::Result;

use domain_policy::PolicyRecord;

use crate::cli::OutputFormat;
use crate::commands::{CommandOutput, QuoteReport, SubmissionReport};

/// Prints a command result to stdout
pub fn emit(format: OutputFormat, output: &CommandOutput) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(output)?),
        OutputFormat::Table => print!("{}", render_table(output)),
    }
    Ok(())
}

/// Plain-text rendering used by the table format
pub fn render_table(output: &CommandOutput) -> String {
    let mut out = String::new();
    match output {
        CommandOutput::Dealers(dealers) => {
            for dealer in dealers {
                out.push_str(&format!("{}  {}\n", dealer.id.as_uuid(), dealer));
            }
        }
        CommandOutput::Customers(customers) => {
            for customer in customers {
                out.push_str(&format!("{}  {}\n", customer.id.as_uuid(), customer));
            }
        }
        CommandOutput::Vehicles(vehicles) => {
            for vehicle in vehicles {
                out.push_str(&format!("{}  {}\n", vehicle.id.as_uuid(), vehicle));
            }
        }
        CommandOutput::PolicyTypes(types) => {
            for policy_type in types {
                out.push_str(&format!("{:<12} {}\n", policy_type.code.as_str(), policy_type.name));
            }
        }
        CommandOutput::Currencies(currencies) => {
            for currency in currencies {
                let symbol = currency.symbol.as_deref().unwrap_or("");
                out.push_str(&format!("{}  {} {}\n", currency.id.as_uuid(), currency.code, symbol));
            }
        }
        CommandOutput::Vehicle(vehicle) => {
            out.push_str(&format!("Registered {}  {}\n", vehicle.id.as_uuid(), vehicle));
        }
        CommandOutput::Quote(report) => render_quote(&mut out, report),
        CommandOutput::Submission(report) => render_submission(&mut out, report),
        CommandOutput::Advisory(notice) => {
            out.push_str("Nothing was stored\n");
            out.push_str(&format!("note: {}\n", notice.message));
        }
        CommandOutput::Health(result) => {
            out.push_str(&format!("{:?} ({} ms)\n", result.status, result.latency_ms));
            if let Some(message) = &result.message {
                out.push_str(&format!("{}\n", message));
            }
        }
    }
    out
}

fn render_quote(out: &mut String, report: &QuoteReport) {
    let price = &report.price;
    out.push_str(&format!(
        "Period:      {} .. {}\n",
        report.request.start_date, report.request.end_date
    ));
    out.push_str(&format!("Base price:  {}\n", price.base_price));
    out.push_str(&format!("Taxes:       {}\n", price.taxes));
    out.push_str(&format!("Total:       {}\n", price.total));
    out.push_str(&format!("Dealer comm: {}\n", price.dealer_commission));
    for converted in &price.prices_in_other_currencies {
        out.push_str(&format!("             {}\n", converted));
    }
    out.push_str(&format!("Suggested premium: {}\n", report.suggested_premium));
}

fn render_submission(out: &mut String, report: &SubmissionReport) {
    let verb = if report.created { "Created" } else { "Updated" };
    out.push_str(&format!("{} policy {}\n", verb, report.policy.id.as_uuid()));
    render_policy(out, &report.policy);
    for notice in &report.notices {
        out.push_str(&format!("note: {}\n", notice.message));
    }
}

fn render_policy(out: &mut String, policy: &PolicyRecord) {
    if let Some(number) = &policy.policy_number {
        out.push_str(&format!("Number:  {}\n", number));
    }
    out.push_str(&format!("Type:    {}\n", policy.policy_type));
    out.push_str(&format!("Period:  {} .. {}\n", policy.start_date, policy.end_date));
    if let Some(premium) = policy.premium {
        out.push_str(&format!("Premium: {}\n", premium));
    }
}
