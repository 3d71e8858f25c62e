use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use hdb_resale_core::pipeline::{self, LoanInputs, PurchaseAnalysisInput};
use hdb_resale_core::purchase::downpayment::{self, DownpaymentInput, PurchaseInputs};
use hdb_resale_core::purchase::grants::GrantInputs;
use hdb_resale_core::purchase::stamp_duty::{self, StampDutyInput};
use hdb_resale_core::resale::projection::ResaleInputs;

use crate::input;

/// Arguments for the full purchase-to-resale analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// First-Timer grant
    #[arg(long, default_value = "0")]
    pub first_timer_grant: Decimal,

    /// Enhanced Housing grant
    #[arg(long, default_value = "0")]
    pub enhanced_grant: Decimal,

    /// Proximity Housing grant
    #[arg(long, default_value = "0")]
    pub proximity_grant: Decimal,

    /// Purchase price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Valuation (defaults to the purchase price)
    #[arg(long)]
    pub valuation: Option<Decimal>,

    /// Stretch the loan tenure (lower loan-to-value, 30-year cap)
    #[arg(long)]
    pub stretch: bool,

    /// Eligible loan (defaults to the loan required)
    #[arg(long)]
    pub loan_eligible: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 2.6)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years (defaults to the tenure maximum)
    #[arg(long)]
    pub term: Option<u32>,

    /// Selling price (defaults to the purchase price)
    #[arg(long)]
    pub selling_price: Option<Decimal>,

    /// Holding period in years
    #[arg(long, default_value = "5")]
    pub holding_period: u32,

    /// Completion date (YYYY-MM-DD); dates the schedule and exit
    #[arg(long)]
    pub purchase_date: Option<NaiveDate>,

    /// Leave the amortization schedule out of the output
    #[arg(long)]
    pub no_schedule: bool,
}

/// Arguments for buyer's stamp duty
#[derive(Args)]
pub struct StampDutyArgs {
    /// Purchase price
    #[arg(long)]
    pub price: Decimal,
}

/// Arguments for the downpayment split
#[derive(Args)]
pub struct DownpaymentArgs {
    /// Valuation
    #[arg(long)]
    pub valuation: Decimal,

    /// Stretch the loan tenure
    #[arg(long)]
    pub stretch: bool,

    /// Total grants applied against the fund portion
    #[arg(long, default_value = "0")]
    pub grants: Decimal,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut analysis_input: PurchaseAnalysisInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        let price = args.price.ok_or("--price is required (or provide --input)")?;
        let mut loan = LoanInputs {
            principal_eligible: args.loan_eligible,
            term_years: args.term,
            ..LoanInputs::default()
        };
        if let Some(rate) = args.rate {
            loan.annual_rate_percent = rate;
        }
        PurchaseAnalysisInput {
            grants: GrantInputs {
                first_timer: args.first_timer_grant,
                enhanced: args.enhanced_grant,
                proximity: args.proximity_grant,
            },
            purchase: PurchaseInputs {
                purchase_price: price,
                valuation: args.valuation.unwrap_or(price),
                stretch_tenure: args.stretch,
            },
            loan,
            resale: ResaleInputs {
                selling_price: args.selling_price,
                holding_period_years: args.holding_period,
            },
            purchase_date: args.purchase_date,
            include_schedule: true,
        }
    };
    if args.no_schedule {
        analysis_input.include_schedule = false;
    }

    let result = pipeline::analyze_purchase(&analysis_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_stamp_duty(args: StampDutyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let result = stamp_duty::calculate_stamp_duty(&StampDutyInput {
        purchase_price: args.price,
    })?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_downpayment(args: DownpaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let result = downpayment::split_downpayment_for(&DownpaymentInput {
        valuation: args.valuation,
        stretch_tenure: args.stretch,
        total_grants: args.grants,
    })?;
    Ok(serde_json::to_value(result)?)
}
