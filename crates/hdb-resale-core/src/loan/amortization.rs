//! Fixed-rate loan amortization.
//!
//! A level monthly instalment is derived from the annuity formula and the
//! loan is then walked forward period by period, splitting each instalment
//! into interest on the running balance and principal. Every row also
//! carries the penalty a lender would levy for redeeming the balance at
//! that point.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::HdbResaleError;
use crate::time_value::{annuity_payment, months_in_years};
use crate::types::{percent_to_rate, with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::HdbResaleResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Early-redemption penalty as a share of the outstanding balance.
pub const PREPAYMENT_PENALTY_RATE: Rate = dec!(0.015);

pub const DEFAULT_RATE_PERCENT: Percent = dec!(2.6);
pub const MIN_RATE_PERCENT: Percent = dec!(1.0);
pub const MIN_TERM_YEARS: u32 = 5;
/// Longest term a standalone schedule will walk.
pub const MAX_SCHEDULE_TERM_YEARS: u32 = 50;

const MONTHS_PER_YEAR: u32 = 12;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The loan as granted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Loan needed: loan portion + fund portion - grants, floored at zero.
    pub principal_required: Money,
    /// Loan the lender will actually grant; never more than required.
    pub principal_eligible: Money,
    /// Annual interest rate as a percentage (2.6 = 2.6%).
    pub annual_rate_percent: Percent,
    pub term_years: u32,
}

impl LoanTerms {
    pub fn amortization_input(&self, first_payment_date: Option<NaiveDate>) -> AmortizationInput {
        AmortizationInput {
            principal: self.principal_eligible,
            annual_rate_percent: self.annual_rate_percent,
            term_years: self.term_years,
            first_payment_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub term_years: u32,
    /// Date of the first instalment; rows are dated monthly from here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_payment_date: Option<NaiveDate>,
}

/// One monthly period of the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationEntry {
    /// Loan year, 1-indexed: ceil(period / 12).
    pub year: u32,
    /// Month, 1-indexed.
    pub period: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
    pub payment_amount: Money,
    pub principal_component: Money,
    pub interest_component: Money,
    /// Balance after this period's payment.
    pub remaining_balance: Money,
    pub estimated_prepayment_penalty: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSchedule {
    pub monthly_payment: Money,
    pub number_of_payments: u32,
    pub total_payments: Money,
    pub total_interest: Money,
    pub schedule: Vec<AmortizationEntry>,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Monthly rate from an annual percentage: (pct / 100) / 12.
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    percent_to_rate(annual_rate_percent) / Decimal::from(MONTHS_PER_YEAR)
}

/// Number of monthly instalments over a term.
pub fn number_of_payments(term_years: u32) -> HdbResaleResult<u32> {
    months_in_years(term_years)
}

/// Loan year a 1-indexed period falls in.
pub fn loan_year(period: u32) -> u32 {
    period.div_ceil(MONTHS_PER_YEAR)
}

/// Level monthly instalment for the loan. A zero rate amortizes straight-line.
pub fn monthly_payment(
    principal: Money,
    annual_rate_percent: Percent,
    term_years: u32,
) -> HdbResaleResult<Money> {
    annuity_payment(
        principal,
        monthly_rate(annual_rate_percent),
        number_of_payments(term_years)?,
    )
}

/// Instalment and lifetime totals without walking the rows; `schedule` is
/// left empty.
pub fn summarize_loan(input: &AmortizationInput) -> HdbResaleResult<LoanSchedule> {
    let n = number_of_payments(input.term_years)?;
    let payment = monthly_payment(input.principal, input.annual_rate_percent, input.term_years)?;
    let total_payments = payment.checked_mul(Decimal::from(n)).ok_or_else(|| {
        HdbResaleError::DegenerateInput {
            context: format!("total of {n} payments of {payment}"),
        }
    })?;

    Ok(LoanSchedule {
        monthly_payment: payment,
        number_of_payments: n,
        total_payments,
        total_interest: total_payments - input.principal,
        schedule: Vec::new(),
    })
}

/// Produce the full schedule. Deterministic: the same input always yields
/// the same rows, so callers recompute rather than cache.
pub fn amortize(input: &AmortizationInput) -> HdbResaleResult<LoanSchedule> {
    let mut loan = summarize_loan(input)?;
    let r = monthly_rate(input.annual_rate_percent);
    let payment = loan.monthly_payment;

    let mut schedule = Vec::with_capacity(loan.number_of_payments as usize);
    let mut balance = input.principal;

    for period in 1..=loan.number_of_payments {
        let interest = balance * r;
        let principal_component = payment - interest;
        balance -= principal_component;

        let payment_date = match input.first_payment_date {
            Some(first) => Some(nth_payment_date(first, period)?),
            None => None,
        };

        schedule.push(AmortizationEntry {
            year: loan_year(period),
            period,
            payment_date,
            payment_amount: payment,
            principal_component,
            interest_component: interest,
            remaining_balance: balance,
            estimated_prepayment_penalty: balance * PREPAYMENT_PENALTY_RATE,
        });
    }

    loan.schedule = schedule;
    Ok(loan)
}

fn nth_payment_date(first: NaiveDate, period: u32) -> HdbResaleResult<NaiveDate> {
    first
        .checked_add_months(Months::new(period - 1))
        .ok_or_else(|| {
            HdbResaleError::DateError(format!("payment date for period {period} out of range"))
        })
}

/// Amortize a standalone loan, validating the terms first.
pub fn build_amortization_schedule(
    input: &AmortizationInput,
) -> HdbResaleResult<ComputationOutput<LoanSchedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.principal < Decimal::ZERO {
        return Err(HdbResaleError::InvalidInput {
            field: "principal".into(),
            reason: "Principal cannot be negative".into(),
        });
    }
    if input.annual_rate_percent < Decimal::ZERO {
        return Err(HdbResaleError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    if input.term_years == 0 || input.term_years > MAX_SCHEDULE_TERM_YEARS {
        return Err(HdbResaleError::InvalidInput {
            field: "term_years".into(),
            reason: format!("Term must be between 1 and {MAX_SCHEDULE_TERM_YEARS} years"),
        });
    }
    if input.annual_rate_percent.is_zero() {
        warnings.push("Zero interest rate: principal amortized straight-line".into());
    }

    let schedule = amortize(input)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Rate Annuity Amortization",
        input,
        warnings,
        elapsed,
        schedule,
    ))
}
