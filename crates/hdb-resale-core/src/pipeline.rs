//! The full purchase-to-resale computation.
//!
//! Stages run strictly in order, each a pure function of the raw inputs and
//! the records produced before it:
//!
//! 1. grants → total subsidy
//! 2. downpayment split and principal required
//! 3. amortization of the eligible loan
//! 4. buyer's stamp duty
//! 5. upfront cash outlay
//! 6. exit projection (outstanding loan, fund refund, cash proceeds)
//! 7. returns
//!
//! [`analyze_purchase`] is the validation boundary: the stage functions
//! trust their inputs, so every domain constraint is checked here first.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::HdbResaleError;
use crate::loan::amortization::{
    amortize, summarize_loan, AmortizationEntry, LoanTerms, DEFAULT_RATE_PERCENT,
    MIN_RATE_PERCENT, MIN_TERM_YEARS,
};
use crate::purchase::cash_outlay::{aggregate_cash_outlay, CashOutlay, CashOutlayInput};
use crate::purchase::downpayment::{
    principal_required, split_downpayment, DownpaymentSplit, PurchaseInputs, Tenure, PRICE_FLOOR,
};
use crate::purchase::grants::{total_grants, GrantInputs};
use crate::purchase::stamp_duty::buyer_stamp_duty;
use crate::resale::projection::{
    project_resale, ProjectionInput, ResaleInputs, ResaleProjection, MIN_HOLDING_PERIOD_YEARS,
};
use crate::resale::returns::{calculate_returns, ReturnInput, ReturnSummary};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::HdbResaleResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

fn default_rate_percent() -> Percent {
    DEFAULT_RATE_PERCENT
}

fn default_include_schedule() -> bool {
    true
}

/// Loan choices. Missing values fall back to the full required loan, the
/// default rate, and the longest term the tenure allows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInputs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal_eligible: Option<Money>,
    #[serde(default = "default_rate_percent")]
    pub annual_rate_percent: Percent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_years: Option<u32>,
}

impl Default for LoanInputs {
    fn default() -> Self {
        LoanInputs {
            principal_eligible: None,
            annual_rate_percent: default_rate_percent(),
            term_years: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseAnalysisInput {
    #[serde(default)]
    pub grants: GrantInputs,
    pub purchase: PurchaseInputs,
    #[serde(default)]
    pub loan: LoanInputs,
    #[serde(default)]
    pub resale: ResaleInputs,
    /// Completion date; the first instalment falls one month later.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default = "default_include_schedule")]
    pub include_schedule: bool,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSummary {
    #[serde(flatten)]
    pub terms: LoanTerms,
    pub monthly_payment: Money,
    pub number_of_payments: u32,
    pub total_payments: Money,
    pub total_interest: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseAnalysisOutput {
    pub total_grants: Money,
    pub tenure: Tenure,
    pub cash_over_valuation: Money,
    pub downpayment: DownpaymentSplit,
    pub loan: LoanSummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<AmortizationEntry>,
    pub stamp_duty: Money,
    pub cash_outlay: CashOutlay,
    pub resale: ResaleProjection,
    pub returns: ReturnSummary,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Validate the scenario and run every stage.
pub fn analyze_purchase(
    input: &PurchaseAnalysisInput,
) -> HdbResaleResult<ComputationOutput<PurchaseAnalysisOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;
    let output = compute_all(input, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Resale Flat Purchase, Financing and Exit Return Analysis",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Run stages 1–7 without the field-level validation of [`analyze_purchase`].
///
/// Still rejects an eligible loan above the required loan, which can only be
/// checked once the split is known.
pub fn compute_all(
    input: &PurchaseAnalysisInput,
    warnings: &mut Vec<String>,
) -> HdbResaleResult<PurchaseAnalysisOutput> {
    let purchase = &input.purchase;
    let tenure = purchase.tenure();

    // --- 1. Grants ---
    let grants_total = total_grants(&input.grants);

    // --- 2. Downpayment ---
    let cash_over_valuation = purchase.cash_over_valuation();
    if cash_over_valuation > Decimal::ZERO {
        warnings.push(format!(
            "Purchase price exceeds valuation by {cash_over_valuation}; the difference is payable in cash"
        ));
    }
    let downpayment = split_downpayment(purchase.valuation, tenure);
    let required = principal_required(&downpayment, grants_total);
    let eligible = input.loan.principal_eligible.unwrap_or(required);
    if eligible > required {
        return Err(HdbResaleError::InvalidInput {
            field: "loan.principal_eligible".into(),
            reason: format!("Eligible loan cannot exceed the loan required ({required})"),
        });
    }

    let terms = LoanTerms {
        principal_required: required,
        principal_eligible: eligible,
        annual_rate_percent: input.loan.annual_rate_percent,
        term_years: input.loan.term_years.unwrap_or(tenure.max_term_years()),
    };

    // --- 3. Amortization ---
    let first_payment_date = match input.purchase_date {
        Some(d) => Some(d.checked_add_months(Months::new(1)).ok_or_else(|| {
            HdbResaleError::DateError(format!("first payment after {d} out of range"))
        })?),
        None => None,
    };
    let amortization_input = terms.amortization_input(first_payment_date);
    let loan_schedule = if input.include_schedule {
        amortize(&amortization_input)?
    } else {
        summarize_loan(&amortization_input)?
    };

    // --- 4. Stamp duty ---
    let stamp_duty = buyer_stamp_duty(purchase.purchase_price);

    // --- 5. Cash outlay ---
    let cash_outlay = aggregate_cash_outlay(&CashOutlayInput {
        cash_over_valuation,
        stamp_duty,
        cash_downpayment: downpayment.cash_portion,
        principal_required: terms.principal_required,
        principal_eligible: terms.principal_eligible,
    });
    if cash_outlay.loan_shortfall > Decimal::ZERO {
        warnings.push(format!(
            "Loan shortfall of {} must be paid in cash",
            cash_outlay.loan_shortfall
        ));
    }

    // --- 6. Exit projection ---
    let selling_price = input.resale.selling_price.unwrap_or(purchase.purchase_price);
    let holding_period_years = input.resale.holding_period_years;
    let resale = project_resale(
        &ProjectionInput {
            monthly_payment: loan_schedule.monthly_payment,
            annual_rate_percent: terms.annual_rate_percent,
            principal_eligible: terms.principal_eligible,
            term_years: terms.term_years,
            total_grants: grants_total,
            selling_price,
            holding_period_years,
            purchase_date: input.purchase_date,
        },
        warnings,
    )?;

    // --- 7. Returns ---
    let metrics = calculate_returns(
        &ReturnInput {
            selling_price,
            purchase_price: purchase.purchase_price,
            cash_proceeds: resale.cash_proceeds,
            total_cash_outlay: cash_outlay.total,
            holding_period_years,
        },
        warnings,
    )?;
    let returns = ReturnSummary::new(&resale, metrics);

    Ok(PurchaseAnalysisOutput {
        total_grants: grants_total,
        tenure,
        cash_over_valuation,
        downpayment,
        loan: LoanSummary {
            terms,
            monthly_payment: loan_schedule.monthly_payment,
            number_of_payments: loan_schedule.number_of_payments,
            total_payments: loan_schedule.total_payments,
            total_interest: loan_schedule.total_interest,
        },
        schedule: loan_schedule.schedule,
        stamp_duty,
        cash_outlay,
        resale,
        returns,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &PurchaseAnalysisInput) -> HdbResaleResult<()> {
    input.grants.validate()?;

    let purchase = &input.purchase;
    if purchase.purchase_price < PRICE_FLOOR {
        return Err(HdbResaleError::InvalidInput {
            field: "purchase.purchase_price".into(),
            reason: format!("Purchase price must be at least {PRICE_FLOOR}"),
        });
    }
    if purchase.valuation < PRICE_FLOOR {
        return Err(HdbResaleError::InvalidInput {
            field: "purchase.valuation".into(),
            reason: format!("Valuation must be at least {PRICE_FLOOR}"),
        });
    }
    if purchase.valuation > purchase.purchase_price {
        return Err(HdbResaleError::InvalidInput {
            field: "purchase.valuation".into(),
            reason: "Valuation cannot exceed the purchase price".into(),
        });
    }

    let loan = &input.loan;
    if let Some(eligible) = loan.principal_eligible {
        if eligible < Decimal::ZERO {
            return Err(HdbResaleError::InvalidInput {
                field: "loan.principal_eligible".into(),
                reason: "Eligible loan cannot be negative".into(),
            });
        }
    }
    if loan.annual_rate_percent < MIN_RATE_PERCENT {
        return Err(HdbResaleError::InvalidInput {
            field: "loan.annual_rate_percent".into(),
            reason: format!("Interest rate must be at least {MIN_RATE_PERCENT}%"),
        });
    }
    if let Some(term) = loan.term_years {
        let max_term = purchase.tenure().max_term_years();
        if term < MIN_TERM_YEARS || term > max_term {
            return Err(HdbResaleError::InvalidInput {
                field: "loan.term_years".into(),
                reason: format!("Term must be between {MIN_TERM_YEARS} and {max_term} years"),
            });
        }
    }

    let resale = &input.resale;
    if resale.holding_period_years < MIN_HOLDING_PERIOD_YEARS {
        return Err(HdbResaleError::InvalidInput {
            field: "resale.holding_period_years".into(),
            reason: format!("Holding period must be at least {MIN_HOLDING_PERIOD_YEARS} years"),
        });
    }
    if let Some(price) = resale.selling_price {
        if price < Decimal::ZERO {
            return Err(HdbResaleError::InvalidInput {
                field: "resale.selling_price".into(),
                reason: "Selling price cannot be negative".into(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_input() -> PurchaseAnalysisInput {
        PurchaseAnalysisInput {
            grants: GrantInputs::default(),
            purchase: PurchaseInputs {
                purchase_price: dec!(300000),
                valuation: dec!(300000),
                stretch_tenure: false,
            },
            loan: LoanInputs::default(),
            resale: ResaleInputs::default(),
            purchase_date: None,
            include_schedule: true,
        }
    }

    #[test]
    fn test_defaults_resolve_from_tenure() {
        let out = analyze_purchase(&sample_input()).unwrap();
        let loan = &out.result.loan;
        assert_eq!(loan.terms.principal_required, dec!(285000));
        assert_eq!(loan.terms.principal_eligible, dec!(285000));
        assert_eq!(loan.terms.annual_rate_percent, dec!(2.6));
        assert_eq!(loan.terms.term_years, 25);
        assert_eq!(out.result.schedule.len(), 300);
    }

    #[test]
    fn test_stretched_defaults_to_thirty_years() {
        let mut input = sample_input();
        input.purchase.stretch_tenure = true;
        let out = analyze_purchase(&input).unwrap();
        assert_eq!(out.result.loan.terms.term_years, 30);
        assert_eq!(out.result.loan.terms.principal_required, dec!(270000));
    }

    #[test]
    fn test_eligible_above_required_rejected() {
        let mut input = sample_input();
        input.loan.principal_eligible = Some(dec!(285001));
        match analyze_purchase(&input).unwrap_err() {
            HdbResaleError::InvalidInput { field, .. } => {
                assert_eq!(field, "loan.principal_eligible")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_schedule_can_be_omitted() {
        let mut input = sample_input();
        input.include_schedule = false;
        let out = analyze_purchase(&input).unwrap();
        assert!(out.result.schedule.is_empty());
        assert_eq!(out.result.loan.number_of_payments, 300);
    }

    #[test]
    fn test_omitted_schedule_keeps_loan_figures() {
        let full = analyze_purchase(&sample_input()).unwrap();
        let mut input = sample_input();
        input.include_schedule = false;
        let lean = analyze_purchase(&input).unwrap();
        assert_eq!(lean.result.loan.monthly_payment, full.result.loan.monthly_payment);
        assert_eq!(lean.result.loan.total_interest, full.result.loan.total_interest);
        assert_eq!(lean.result.returns, full.result.returns);
    }

    #[test]
    fn test_extreme_rate_returns_error() {
        let mut input = sample_input();
        input.loan.annual_rate_percent = dec!(300);
        assert!(matches!(
            analyze_purchase(&input).unwrap_err(),
            HdbResaleError::DegenerateInput { .. }
        ));
    }

    #[test]
    fn test_extreme_holding_period_returns_error() {
        let mut input = sample_input();
        input.grants.first_timer = dec!(80000);
        input.resale.holding_period_years = 4000;
        assert!(matches!(
            analyze_purchase(&input).unwrap_err(),
            HdbResaleError::DegenerateInput { .. }
        ));

        input.resale.holding_period_years = u32::MAX;
        assert!(matches!(
            analyze_purchase(&input).unwrap_err(),
            HdbResaleError::DegenerateInput { .. }
        ));
    }
}
