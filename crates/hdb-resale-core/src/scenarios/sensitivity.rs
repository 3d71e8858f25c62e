use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::HdbResaleError;
use crate::pipeline::{analyze_purchase, compute_all, PurchaseAnalysisInput, PurchaseAnalysisOutput};
use crate::resale::projection::MIN_HOLDING_PERIOD_YEARS;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::HdbResaleResult;

const MAX_SWEEP_POINTS: usize = 1000;

/// Inclusive sweep of selling prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepRange {
    pub min: Money,
    pub max: Money,
    pub step: Money,
}

/// Output metric evaluated in every cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityMetric {
    ReturnOnCapital,
    #[default]
    AnnualizedReturnOnCapital,
    CashProceeds,
    AnnualizedGrowth,
}

impl SensitivityMetric {
    fn extract(self, out: &PurchaseAnalysisOutput) -> Decimal {
        match self {
            SensitivityMetric::ReturnOnCapital => out.returns.return_on_capital,
            SensitivityMetric::AnnualizedReturnOnCapital => {
                out.returns.annualized_return_on_capital
            }
            SensitivityMetric::CashProceeds => out.returns.cash_proceeds,
            SensitivityMetric::AnnualizedGrowth => out.returns.annualized_growth,
        }
    }
}

/// Selling price × holding period grid around a base scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityInput {
    pub base: PurchaseAnalysisInput,
    pub selling_prices: SweepRange,
    pub holding_periods: Vec<u32>,
    #[serde(default)]
    pub metric: SensitivityMetric,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityOutput {
    pub metric: SensitivityMetric,
    pub selling_prices: Vec<Money>,
    pub holding_periods: Vec<u32>,
    /// matrix[i][j] = metric at selling_prices[i], holding_periods[j]
    pub matrix: Vec<Vec<Decimal>>,
    pub base_case_value: Decimal,
    /// Cell nearest the base scenario (row, col)
    pub base_case_position: (usize, usize),
}

/// Generate the sweep values from min to max with step, always ending on max.
fn generate_sweep_values(range: &SweepRange) -> HdbResaleResult<Vec<Money>> {
    if range.step <= Decimal::ZERO {
        return Err(HdbResaleError::InvalidInput {
            field: "selling_prices.step".into(),
            reason: "Step must be positive".into(),
        });
    }
    if range.min < Decimal::ZERO {
        return Err(HdbResaleError::InvalidInput {
            field: "selling_prices.min".into(),
            reason: "Selling price cannot be negative".into(),
        });
    }
    if range.min > range.max {
        return Err(HdbResaleError::InvalidInput {
            field: "selling_prices".into(),
            reason: "Min must be <= max".into(),
        });
    }

    let too_many = || HdbResaleError::InvalidInput {
        field: "selling_prices.step".into(),
        reason: format!("Sweep exceeds {MAX_SWEEP_POINTS} points"),
    };

    let mut values = Vec::new();
    let mut current = range.min;
    while current <= range.max {
        if values.len() == MAX_SWEEP_POINTS {
            return Err(too_many());
        }
        values.push(current);
        match current.checked_add(range.step) {
            Some(next) => current = next,
            None => break,
        }
    }
    if let Some(&last) = values.last() {
        if last < range.max {
            if values.len() == MAX_SWEEP_POINTS {
                return Err(too_many());
            }
            values.push(range.max);
        }
    }

    Ok(values)
}

/// Find the closest index to a target value.
fn closest_index(values: &[Decimal], target: Decimal) -> usize {
    values
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| (**v - target).abs())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Re-run the pipeline for every (selling price, holding period) pair.
pub fn run_sensitivity(
    input: &SensitivityInput,
) -> HdbResaleResult<ComputationOutput<SensitivityOutput>> {
    let start = Instant::now();

    if input.holding_periods.is_empty() {
        return Err(HdbResaleError::InvalidInput {
            field: "holding_periods".into(),
            reason: "At least one holding period is required".into(),
        });
    }
    if let Some(h) = input
        .holding_periods
        .iter()
        .find(|h| **h < MIN_HOLDING_PERIOD_YEARS)
    {
        return Err(HdbResaleError::InvalidInput {
            field: "holding_periods".into(),
            reason: format!("Holding period {h} is below {MIN_HOLDING_PERIOD_YEARS} years"),
        });
    }
    let prices = generate_sweep_values(&input.selling_prices)?;

    let mut base = input.base.clone();
    base.include_schedule = false;
    let base_run = analyze_purchase(&base)?;
    let warnings = base_run.warnings;
    let base_case_value = input.metric.extract(&base_run.result);

    let mut matrix = Vec::with_capacity(prices.len());
    for price in &prices {
        let mut row = Vec::with_capacity(input.holding_periods.len());
        for holding in &input.holding_periods {
            let mut cell = base.clone();
            cell.resale.selling_price = Some(*price);
            cell.resale.holding_period_years = *holding;
            let mut cell_warnings = Vec::new();
            let out = compute_all(&cell, &mut cell_warnings)?;
            row.push(input.metric.extract(&out));
        }
        matrix.push(row);
    }

    let base_price = base
        .resale
        .selling_price
        .unwrap_or(base.purchase.purchase_price);
    let holdings: Vec<Decimal> = input
        .holding_periods
        .iter()
        .map(|h| Decimal::from(*h))
        .collect();
    let base_case_position = (
        closest_index(&prices, base_price),
        closest_index(&holdings, Decimal::from(base.resale.holding_period_years)),
    );

    let output = SensitivityOutput {
        metric: input.metric,
        selling_prices: prices,
        holding_periods: input.holding_periods.clone(),
        matrix,
        base_case_value,
        base_case_position,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Selling Price x Holding Period Sensitivity",
        input,
        warnings,
        elapsed,
        output,
    ))
}
