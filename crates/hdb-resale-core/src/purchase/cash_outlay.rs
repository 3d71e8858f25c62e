use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Money;

pub const VALUATION_FEE: Money = dec!(120);
pub const SUBMISSION_FEE: Money = dec!(80);
pub const PURCHASE_LEGAL_FEE: Money = dec!(1788);

/// Inputs to the upfront cash total, all produced by earlier stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashOutlayInput {
    pub cash_over_valuation: Money,
    pub stamp_duty: Money,
    pub cash_downpayment: Money,
    pub principal_required: Money,
    pub principal_eligible: Money,
}

/// Itemised one-time cash costs of the purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashOutlay {
    pub cash_over_valuation: Money,
    pub valuation_fee: Money,
    pub submission_fee: Money,
    pub stamp_duty: Money,
    pub legal_fee: Money,
    pub cash_downpayment: Money,
    /// Part of the required loan the lender will not cover, paid in cash.
    pub loan_shortfall: Money,
    pub total: Money,
}

/// Loan the buyer must fund in cash; never negative, so an over-eligible
/// loan cannot reduce the outlay.
pub fn loan_shortfall(principal_required: Money, principal_eligible: Money) -> Money {
    (principal_required - principal_eligible).max(Decimal::ZERO)
}

pub fn aggregate_cash_outlay(input: &CashOutlayInput) -> CashOutlay {
    let shortfall = loan_shortfall(input.principal_required, input.principal_eligible);
    let total = input.cash_over_valuation
        + VALUATION_FEE
        + SUBMISSION_FEE
        + input.stamp_duty
        + PURCHASE_LEGAL_FEE
        + input.cash_downpayment
        + shortfall;

    CashOutlay {
        cash_over_valuation: input.cash_over_valuation,
        valuation_fee: VALUATION_FEE,
        submission_fee: SUBMISSION_FEE,
        stamp_duty: input.stamp_duty,
        legal_fee: PURCHASE_LEGAL_FEE,
        cash_downpayment: input.cash_downpayment,
        loan_shortfall: shortfall,
        total,
    }
}
