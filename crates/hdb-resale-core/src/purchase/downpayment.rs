//! Downpayment split across cash, retirement fund and loan.
//!
//! The split is a fixed fraction triple of the valuation, selected by the
//! tenure mode. Stretching the tenure lowers the loan-to-value and raises
//! the maximum loan term.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::HdbResaleResult;

/// Neither purchase price nor valuation may fall below this.
pub const PRICE_FLOOR: Money = dec!(200000);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Loan tenure mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tenure {
    #[default]
    Standard,
    Stretched,
}

impl Tenure {
    pub fn from_stretch(stretch_tenure: bool) -> Self {
        if stretch_tenure {
            Tenure::Stretched
        } else {
            Tenure::Standard
        }
    }

    /// Cash / fund / loan fractions of the valuation. Always sums to 1.
    pub fn fractions(self) -> DownpaymentFractions {
        match self {
            Tenure::Standard => DownpaymentFractions {
                cash: dec!(0.05),
                fund: dec!(0.20),
                loan: dec!(0.75),
            },
            Tenure::Stretched => DownpaymentFractions {
                cash: dec!(0.10),
                fund: dec!(0.35),
                loan: dec!(0.55),
            },
        }
    }

    /// Longest loan term allowed under this tenure.
    pub fn max_term_years(self) -> u32 {
        match self {
            Tenure::Standard => 25,
            Tenure::Stretched => 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DownpaymentFractions {
    pub cash: Rate,
    pub fund: Rate,
    pub loan: Rate,
}

/// Purchase-side inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseInputs {
    pub purchase_price: Money,
    /// Assessed value; must not exceed the purchase price.
    pub valuation: Money,
    #[serde(default)]
    pub stretch_tenure: bool,
}

impl PurchaseInputs {
    pub fn tenure(&self) -> Tenure {
        Tenure::from_stretch(self.stretch_tenure)
    }

    /// Amount above valuation, payable in cash.
    pub fn cash_over_valuation(&self) -> Money {
        self.purchase_price - self.valuation
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownpaymentSplit {
    pub cash_portion: Money,
    pub fund_portion: Money,
    pub loan_portion: Money,
}

/// Standalone downpayment query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownpaymentInput {
    pub valuation: Money,
    #[serde(default)]
    pub stretch_tenure: bool,
    /// Grants applied against the fund portion when deriving the loan required.
    #[serde(default)]
    pub total_grants: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownpaymentOutput {
    pub tenure: Tenure,
    pub fractions: DownpaymentFractions,
    pub split: DownpaymentSplit,
    pub principal_required: Money,
    pub max_term_years: u32,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Multiply the tenure's fraction triple by the valuation.
pub fn split_downpayment(valuation: Money, tenure: Tenure) -> DownpaymentSplit {
    let f = tenure.fractions();
    DownpaymentSplit {
        cash_portion: valuation * f.cash,
        fund_portion: valuation * f.fund,
        loan_portion: valuation * f.loan,
    }
}

/// Loan needed once grants have covered part of the fund portion, floored at zero.
pub fn principal_required(split: &DownpaymentSplit, total_grants: Money) -> Money {
    (split.loan_portion + split.fund_portion - total_grants).max(Decimal::ZERO)
}

/// Downpayment split wrapped in the standard output envelope.
pub fn split_downpayment_for(
    input: &DownpaymentInput,
) -> HdbResaleResult<ComputationOutput<DownpaymentOutput>> {
    let start = Instant::now();

    let tenure = Tenure::from_stretch(input.stretch_tenure);
    let split = split_downpayment(input.valuation, tenure);
    let principal_required = principal_required(&split, input.total_grants);

    let output = DownpaymentOutput {
        tenure,
        fractions: tenure.fractions(),
        split,
        principal_required,
        max_term_years: tenure.max_term_years(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Downpayment Split by Tenure",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_split() {
        let s = split_downpayment(dec!(300000), Tenure::Standard);
        assert_eq!(s.cash_portion, dec!(15000));
        assert_eq!(s.fund_portion, dec!(60000));
        assert_eq!(s.loan_portion, dec!(225000));
    }

    #[test]
    fn test_stretched_split() {
        let s = split_downpayment(dec!(400000), Tenure::Stretched);
        assert_eq!(s.cash_portion, dec!(40000));
        assert_eq!(s.fund_portion, dec!(140000));
        assert_eq!(s.loan_portion, dec!(220000));
    }

    #[test]
    fn test_fractions_sum_to_one() {
        for t in [Tenure::Standard, Tenure::Stretched] {
            let f = t.fractions();
            assert_eq!(f.cash + f.fund + f.loan, Decimal::ONE);
        }
    }

    #[test]
    fn test_term_cap_by_tenure() {
        assert_eq!(Tenure::Standard.max_term_years(), 25);
        assert_eq!(Tenure::Stretched.max_term_years(), 30);
    }

    #[test]
    fn test_principal_required_floors_at_zero() {
        let s = split_downpayment(dec!(200000), Tenure::Standard);
        // loan 150k + fund 40k = 190k, grants exceed it
        assert_eq!(principal_required(&s, dec!(230000)), Decimal::ZERO);
        assert_eq!(principal_required(&s, dec!(50000)), dec!(140000));
    }

    #[test]
    fn test_cash_over_valuation() {
        let p = PurchaseInputs {
            purchase_price: dec!(520000),
            valuation: dec!(500000),
            stretch_tenure: false,
        };
        assert_eq!(p.cash_over_valuation(), dec!(20000));
        assert_eq!(p.tenure(), Tenure::Standard);
    }

    #[test]
    fn test_split_downpayment_for_envelope() {
        let input = DownpaymentInput {
            valuation: dec!(300000),
            stretch_tenure: true,
            total_grants: Decimal::ZERO,
        };
        let out = split_downpayment_for(&input).unwrap();
        assert_eq!(out.result.tenure, Tenure::Stretched);
        assert_eq!(out.result.max_term_years, 30);
        assert_eq!(out.result.principal_required, dec!(270000));
    }
}
