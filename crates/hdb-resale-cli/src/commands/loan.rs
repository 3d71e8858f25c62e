use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use hdb_resale_core::loan::amortization::{self, AmortizationInput, DEFAULT_RATE_PERCENT};

use crate::input;

/// Arguments for a standalone amortization schedule
#[derive(Args)]
pub struct AmortizeArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 2.6)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, default_value = "25")]
    pub term: u32,

    /// Date of the first instalment (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Emit only the schedule rows
    #[arg(long)]
    pub schedule_only: bool,
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let amort_input: AmortizationInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        AmortizationInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args.rate.unwrap_or(DEFAULT_RATE_PERCENT),
            term_years: args.term,
            first_payment_date: args.start_date,
        }
    };

    let result = amortization::build_amortization_schedule(&amort_input)?;
    if args.schedule_only {
        return Ok(serde_json::to_value(result.result.schedule)?);
    }
    Ok(serde_json::to_value(result)?)
}
