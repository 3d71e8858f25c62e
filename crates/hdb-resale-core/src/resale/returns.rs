//! Selling costs, property growth and return on the cash actually put in.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::HdbResaleError;
use crate::resale::projection::ResaleProjection;
use crate::time_value::annualize_ratio;
use crate::types::{Money, Rate};
use crate::HdbResaleResult;

pub const SELLING_LEGAL_FEE: Money = dec!(1400);
pub const SELLING_SUBMISSION_FEE: Money = dec!(80);
/// Agent commission as a share of the selling price.
pub const AGENT_FEE_RATE: Rate = dec!(0.02);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnInput {
    pub selling_price: Money,
    pub purchase_price: Money,
    pub cash_proceeds: Money,
    pub total_cash_outlay: Money,
    pub holding_period_years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellingCosts {
    pub legal_fee: Money,
    pub submission_fee: Money,
    pub agent_fee: Money,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnMetrics {
    pub selling_costs: SellingCosts,
    /// Cash proceeds less selling costs and the original cash outlay.
    pub net_profit: Money,
    pub growth: Rate,
    pub annualized_growth: Rate,
    pub return_on_capital: Rate,
    pub annualized_return_on_capital: Rate,
}

/// Everything the buyer needs to judge the exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSummary {
    pub outstanding_loan_balance: Money,
    pub fund_balance_with_accrual: Money,
    pub cash_proceeds: Money,
    pub selling_costs: SellingCosts,
    pub net_profit: Money,
    pub growth: Rate,
    pub annualized_growth: Rate,
    pub return_on_capital: Rate,
    pub annualized_return_on_capital: Rate,
}

impl ReturnSummary {
    pub fn new(projection: &ResaleProjection, metrics: ReturnMetrics) -> Self {
        ReturnSummary {
            outstanding_loan_balance: projection.outstanding_loan_balance,
            fund_balance_with_accrual: projection.fund_balance_with_accrual,
            cash_proceeds: projection.cash_proceeds,
            selling_costs: metrics.selling_costs,
            net_profit: metrics.net_profit,
            growth: metrics.growth,
            annualized_growth: metrics.annualized_growth,
            return_on_capital: metrics.return_on_capital,
            annualized_return_on_capital: metrics.annualized_return_on_capital,
        }
    }
}

pub fn selling_costs(selling_price: Money) -> SellingCosts {
    let agent_fee = selling_price * AGENT_FEE_RATE;
    SellingCosts {
        legal_fee: SELLING_LEGAL_FEE,
        submission_fee: SELLING_SUBMISSION_FEE,
        agent_fee,
        total: SELLING_LEGAL_FEE + SELLING_SUBMISSION_FEE + agent_fee,
    }
}

/// Growth and return on capital over the holding period.
///
/// A zero purchase price or zero cash outlay has no defined return and is
/// reported as [`HdbResaleError::DegenerateInput`].
pub fn calculate_returns(
    input: &ReturnInput,
    warnings: &mut Vec<String>,
) -> HdbResaleResult<ReturnMetrics> {
    if input.holding_period_years == 0 {
        return Err(HdbResaleError::InvalidInput {
            field: "holding_period_years".into(),
            reason: "Holding period must be at least 1 year".into(),
        });
    }
    if input.purchase_price.is_zero() {
        return Err(HdbResaleError::DegenerateInput {
            context: "property growth (zero purchase price)".into(),
        });
    }
    if input.total_cash_outlay.is_zero() {
        return Err(HdbResaleError::DegenerateInput {
            context: "return on capital (zero cash outlay)".into(),
        });
    }

    let h = input.holding_period_years;
    let costs = selling_costs(input.selling_price);

    let price_ratio = input.selling_price / input.purchase_price;
    let growth = price_ratio - Decimal::ONE;
    let annualized_growth = annualize_ratio(price_ratio, h)?.unwrap_or(-Decimal::ONE);

    let net_profit = input.cash_proceeds - costs.total - input.total_cash_outlay;
    let return_on_capital = net_profit / input.total_cash_outlay;
    let annualized_return_on_capital =
        match annualize_ratio(Decimal::ONE + return_on_capital, h)? {
            Some(r) => r,
            None => {
                warnings.push(format!(
                    "Return on capital of {}% loses all capital; annualized return reported as -100%",
                    (return_on_capital * Decimal::ONE_HUNDRED).round_dp(2)
                ));
                -Decimal::ONE
            }
        };

    Ok(ReturnMetrics {
        selling_costs: costs,
        net_profit,
        growth,
        annualized_growth,
        return_on_capital,
        annualized_return_on_capital,
    })
}
