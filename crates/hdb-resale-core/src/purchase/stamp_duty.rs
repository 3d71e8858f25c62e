//! Buyer's stamp duty: a progressive marginal-bracket tax on the purchase price.
//!
//! Each bracket is evaluated as `price * rate - offset`, where the offset is
//! the cumulative saving from lower brackets. This equals taxing only the
//! slice of the price inside each bracket at that bracket's rate, and keeps
//! the duty continuous at every boundary.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::HdbResaleError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::HdbResaleResult;

/// One marginal bracket; `upper` is inclusive, `None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StampDutyBracket {
    pub upper: Option<Money>,
    pub rate: Rate,
    pub offset: Money,
}

pub const STAMP_DUTY_BRACKETS: [StampDutyBracket; 6] = [
    StampDutyBracket {
        upper: Some(dec!(180000)),
        rate: dec!(0.01),
        offset: dec!(0),
    },
    StampDutyBracket {
        upper: Some(dec!(360000)),
        rate: dec!(0.02),
        offset: dec!(1800),
    },
    StampDutyBracket {
        upper: Some(dec!(1000000)),
        rate: dec!(0.03),
        offset: dec!(5400),
    },
    StampDutyBracket {
        upper: Some(dec!(1500000)),
        rate: dec!(0.04),
        offset: dec!(15400),
    },
    StampDutyBracket {
        upper: Some(dec!(3000000)),
        rate: dec!(0.05),
        offset: dec!(30400),
    },
    StampDutyBracket {
        upper: None,
        rate: dec!(0.06),
        offset: dec!(60400),
    },
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampDutyInput {
    pub purchase_price: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampDutyOutput {
    pub purchase_price: Money,
    pub stamp_duty: Money,
    /// Rate applied to the last dollar of the price.
    pub marginal_rate: Rate,
    /// Duty as a share of the whole price.
    pub effective_rate: Rate,
}

/// The bracket a price falls in.
pub fn bracket_for(purchase_price: Money) -> &'static StampDutyBracket {
    STAMP_DUTY_BRACKETS
        .iter()
        .find(|b| b.upper.map_or(true, |upper| purchase_price <= upper))
        .unwrap_or(&STAMP_DUTY_BRACKETS[STAMP_DUTY_BRACKETS.len() - 1])
}

/// Buyer's stamp duty payable on `purchase_price`.
///
/// Undefined for negative prices; callers pass a validated price.
pub fn buyer_stamp_duty(purchase_price: Money) -> Money {
    let bracket = bracket_for(purchase_price);
    purchase_price * bracket.rate - bracket.offset
}

/// Stamp duty with marginal and effective rates, in the standard envelope.
pub fn calculate_stamp_duty(
    input: &StampDutyInput,
) -> HdbResaleResult<ComputationOutput<StampDutyOutput>> {
    let start = Instant::now();

    if input.purchase_price < Decimal::ZERO {
        return Err(HdbResaleError::InvalidInput {
            field: "purchase_price".into(),
            reason: "Purchase price cannot be negative".into(),
        });
    }

    let stamp_duty = buyer_stamp_duty(input.purchase_price);
    let effective_rate = if input.purchase_price.is_zero() {
        Decimal::ZERO
    } else {
        stamp_duty / input.purchase_price
    };

    let output = StampDutyOutput {
        purchase_price: input.purchase_price,
        stamp_duty,
        marginal_rate: bracket_for(input.purchase_price).rate,
        effective_rate,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Buyer's Stamp Duty (Progressive Marginal Brackets)",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}
