//! Exit-date position: what is still owed to the lender and to the
//! retirement fund when the flat is sold, and the cash left over.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::HdbResaleError;
use crate::loan::amortization::{monthly_rate, number_of_payments, PREPAYMENT_PENALTY_RATE};
use crate::time_value::{fv, months_in_years};
use crate::types::{Money, Percent, Rate};
use crate::HdbResaleResult;

/// Annual interest the retirement fund charges on amounts used for housing.
pub const FUND_ACCRUAL_RATE: Rate = dec!(0.025);

pub const MIN_HOLDING_PERIOD_YEARS: u32 = 5;

const MONTHS_PER_YEAR: u32 = 12;

fn default_holding_period() -> u32 {
    MIN_HOLDING_PERIOD_YEARS
}

/// Sale-side inputs. A missing selling price means "sell at cost".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResaleInputs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selling_price: Option<Money>,
    #[serde(default = "default_holding_period")]
    pub holding_period_years: u32,
}

impl Default for ResaleInputs {
    fn default() -> Self {
        ResaleInputs {
            selling_price: None,
            holding_period_years: default_holding_period(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub monthly_payment: Money,
    pub annual_rate_percent: Percent,
    pub principal_eligible: Money,
    pub term_years: u32,
    pub total_grants: Money,
    pub selling_price: Money,
    pub holding_period_years: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResaleProjection {
    pub months_elapsed: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_date: Option<NaiveDate>,
    pub outstanding_loan_balance: Money,
    /// Redemption penalty estimate at exit. Reported only, not deducted.
    pub prepayment_penalty_at_exit: Money,
    /// Grants refunded to the fund with accrued interest.
    pub fund_balance_with_accrual: Money,
    pub cash_proceeds: Money,
    pub loan_repaid_before_exit: bool,
}

/// Loan balance after `months` level payments:
/// P(1+m)^k - pmt((1+m)^k - 1)/m, or P - pmt*k at a zero rate.
pub fn outstanding_balance(
    principal: Money,
    monthly_payment: Money,
    annual_rate_percent: Percent,
    months: u32,
) -> HdbResaleResult<Money> {
    fv(
        monthly_rate(annual_rate_percent),
        months,
        monthly_payment,
        -principal,
    )
}

/// Grants compounded monthly at the fund accrual rate with no further
/// contributions.
pub fn fund_balance_with_accrual(total_grants: Money, months: u32) -> HdbResaleResult<Money> {
    if total_grants.is_zero() {
        return Ok(Decimal::ZERO);
    }
    fv(
        FUND_ACCRUAL_RATE / Decimal::from(MONTHS_PER_YEAR),
        months,
        Decimal::ZERO,
        -total_grants,
    )
}

pub fn project_resale(
    input: &ProjectionInput,
    warnings: &mut Vec<String>,
) -> HdbResaleResult<ResaleProjection> {
    let months = months_in_years(input.holding_period_years)?;
    let loan_repaid = months >= number_of_payments(input.term_years)?;

    let outstanding = if loan_repaid {
        warnings.push(format!(
            "Holding period of {} years reaches the {}-year loan term; loan fully repaid at exit",
            input.holding_period_years, input.term_years
        ));
        Decimal::ZERO
    } else {
        outstanding_balance(
            input.principal_eligible,
            input.monthly_payment,
            input.annual_rate_percent,
            months,
        )?
    };

    let fund_balance = fund_balance_with_accrual(input.total_grants, months)?;
    let cash_proceeds = input.selling_price - outstanding - fund_balance;
    if cash_proceeds < Decimal::ZERO {
        warnings.push(format!(
            "Sale does not cover the outstanding loan and fund refund: cash proceeds {}",
            cash_proceeds.round_dp(2)
        ));
    }

    let exit_date = match input.purchase_date {
        Some(d) => Some(d.checked_add_months(Months::new(months)).ok_or_else(|| {
            HdbResaleError::DateError(format!("exit date {months} months after {d} out of range"))
        })?),
        None => None,
    };

    Ok(ResaleProjection {
        months_elapsed: months,
        exit_date,
        outstanding_loan_balance: outstanding,
        prepayment_penalty_at_exit: outstanding * PREPAYMENT_PENALTY_RATE,
        fund_balance_with_accrual: fund_balance,
        cash_proceeds,
        loan_repaid_before_exit: loan_repaid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::amortization::{amortize, AmortizationInput};

    fn sample_input() -> ProjectionInput {
        ProjectionInput {
            monthly_payment: crate::loan::amortization::monthly_payment(
                dec!(285000),
                dec!(2.6),
                25,
            )
            .unwrap(),
            annual_rate_percent: dec!(2.6),
            principal_eligible: dec!(285000),
            term_years: 25,
            total_grants: Decimal::ZERO,
            selling_price: dec!(300000),
            holding_period_years: 5,
            purchase_date: None,
        }
    }

    #[test]
    fn test_outstanding_balance_after_five_years() {
        let mut warnings = Vec::new();
        let p = project_resale(&sample_input(), &mut warnings).unwrap();
        assert_eq!(p.months_elapsed, 60);
        assert!((p.outstanding_loan_balance - dec!(241770.19)).abs() < dec!(0.01));
        assert!((p.cash_proceeds - dec!(58229.81)).abs() < dec!(0.01));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_closed_form_matches_schedule_row() {
        let input = sample_input();
        let schedule = amortize(&AmortizationInput {
            principal: input.principal_eligible,
            annual_rate_percent: input.annual_rate_percent,
            term_years: input.term_years,
            first_payment_date: None,
        })
        .unwrap();
        let closed = outstanding_balance(
            input.principal_eligible,
            input.monthly_payment,
            input.annual_rate_percent,
            60,
        )
        .unwrap();
        let row = &schedule.schedule[59];
        assert!((closed - row.remaining_balance).abs() < dec!(0.0001));
    }

    #[test]
    fn test_fund_accrual() {
        let fund = fund_balance_with_accrual(dec!(50000), 60).unwrap();
        assert!((fund - dec!(56650.06)).abs() < dec!(0.01));
        assert_eq!(fund_balance_with_accrual(Decimal::ZERO, 60).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_penalty_at_exit() {
        let mut warnings = Vec::new();
        let p = project_resale(&sample_input(), &mut warnings).unwrap();
        assert_eq!(
            p.prepayment_penalty_at_exit,
            p.outstanding_loan_balance * dec!(0.015)
        );
    }

    #[test]
    fn test_loan_repaid_before_exit() {
        let mut input = sample_input();
        input.holding_period_years = 30;
        let mut warnings = Vec::new();
        let p = project_resale(&input, &mut warnings).unwrap();
        assert!(p.loan_repaid_before_exit);
        assert_eq!(p.outstanding_loan_balance, Decimal::ZERO);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_exit_date() {
        let mut input = sample_input();
        input.purchase_date = NaiveDate::from_ymd_opt(2024, 3, 15);
        let mut warnings = Vec::new();
        let p = project_resale(&input, &mut warnings).unwrap();
        assert_eq!(p.exit_date, NaiveDate::from_ymd_opt(2029, 3, 15));
    }

    #[test]
    fn test_negative_proceeds_warn() {
        let mut input = sample_input();
        input.selling_price = dec!(200000);
        let mut warnings = Vec::new();
        let p = project_resale(&input, &mut warnings).unwrap();
        assert!(p.cash_proceeds < Decimal::ZERO);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_millennial_holding_with_grants_is_degenerate() {
        let mut input = sample_input();
        input.total_grants = dec!(80000);
        input.holding_period_years = 4000;
        let mut warnings = Vec::new();
        assert!(matches!(
            project_resale(&input, &mut warnings).unwrap_err(),
            HdbResaleError::DegenerateInput { .. }
        ));
    }

    #[test]
    fn test_holding_period_month_count_overflow() {
        let mut input = sample_input();
        input.holding_period_years = u32::MAX;
        let mut warnings = Vec::new();
        assert!(matches!(
            project_resale(&input, &mut warnings).unwrap_err(),
            HdbResaleError::DegenerateInput { .. }
        ));
    }
}
