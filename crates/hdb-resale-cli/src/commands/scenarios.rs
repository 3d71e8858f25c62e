use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use hdb_resale_core::pipeline::PurchaseAnalysisInput;
use hdb_resale_core::scenarios::sensitivity::{
    self, SensitivityInput, SensitivityMetric, SweepRange,
};

use crate::input;

/// Arguments for selling price x holding period sensitivity
#[derive(Args)]
pub struct SensitivityArgs {
    /// Path to JSON file: a full sensitivity input, or with --prices a base scenario
    #[arg(long)]
    pub input: String,

    /// Selling price sweep in format min:max:step (e.g. "400000:600000:50000")
    #[arg(long)]
    pub prices: Option<String>,

    /// Comma-separated holding periods in years
    #[arg(long, default_value = "5,10,15")]
    pub holding: String,

    /// Metric: return_on_capital, annualized_return_on_capital, cash_proceeds, annualized_growth
    #[arg(long, default_value = "annualized_return_on_capital")]
    pub metric: String,
}

fn parse_sweep(raw: &str) -> Result<SweepRange, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() != 3 {
        return Err(format!("Price sweep must be min:max:step, got '{}'", raw).into());
    }
    Ok(SweepRange {
        min: parts[0].parse::<Decimal>()?,
        max: parts[1].parse::<Decimal>()?,
        step: parts[2].parse::<Decimal>()?,
    })
}

fn parse_holding(raw: &str) -> Result<Vec<u32>, Box<dyn std::error::Error>> {
    raw.split(',')
        .map(|s| s.trim().parse::<u32>().map_err(|e| e.into()))
        .collect()
}

fn parse_metric(name: &str) -> Result<SensitivityMetric, Box<dyn std::error::Error>> {
    Ok(serde_json::from_value(Value::String(name.to_string()))
        .map_err(|_| format!("Unknown metric '{}'", name))?)
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sens_input: SensitivityInput = match args.prices {
        Some(ref prices) => {
            let base: PurchaseAnalysisInput = input::file::read_json(&args.input)?;
            SensitivityInput {
                base,
                selling_prices: parse_sweep(prices)?,
                holding_periods: parse_holding(&args.holding)?,
                metric: parse_metric(&args.metric)?,
            }
        }
        None => input::file::read_json(&args.input)?,
    };

    let result = sensitivity::run_sensitivity(&sens_input)?;
    Ok(serde_json::to_value(result)?)
}
