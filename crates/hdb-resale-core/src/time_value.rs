use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::HdbResaleError;
use crate::types::{Money, Rate};
use crate::HdbResaleResult;

const ROOT_TOLERANCE: Decimal = dec!(0.000000000000000001);
const MAX_ROOT_ITERATIONS: u32 = 100;
const MONTHS_PER_YEAR: u32 = 12;

/// Months in a whole number of years.
pub fn months_in_years(years: u32) -> HdbResaleResult<u32> {
    years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| overflow(&format!("{years} years in months")))
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
///
/// A factor beyond the range of `Decimal` is a [`HdbResaleError::DegenerateInput`].
pub fn compound(rate: Rate, n: u32) -> HdbResaleResult<Decimal> {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE + rate;
    for _ in 0..n {
        result = result
            .checked_mul(factor)
            .ok_or_else(|| overflow(&format!("compounding {rate} over {n} periods")))?;
    }
    Ok(result)
}

/// Future Value, spreadsheet sign convention: money paid out is negative.
///
/// `fv(r, n, pmt, -P)` is the balance still owed on a loan of `P` after `n`
/// payments of `pmt`; `fv(r, n, 0, -X)` is `X` compounded for `n` periods.
pub fn fv(rate: Rate, nper: u32, pmt: Money, present_value: Money) -> HdbResaleResult<Money> {
    let context = || overflow(&format!("future value over {nper} periods"));

    if rate.is_zero() {
        let paid = pmt.checked_mul(Decimal::from(nper)).ok_or_else(context)?;
        let total = present_value.checked_add(paid).ok_or_else(context)?;
        return Ok(-total);
    }

    let factor = compound(rate, nper)?;
    let annuity_factor = (factor - Decimal::ONE)
        .checked_div(rate)
        .ok_or_else(context)?;

    let grown = present_value.checked_mul(factor).ok_or_else(context)?;
    let paid = pmt.checked_mul(annuity_factor).ok_or_else(context)?;
    let total = grown.checked_add(paid).ok_or_else(context)?;
    Ok(-total)
}

/// Level payment that retires `principal` over `nper` periods:
/// P * r(1+r)^n / ((1+r)^n - 1), or P / n when the rate is zero.
pub fn annuity_payment(principal: Money, rate: Rate, nper: u32) -> HdbResaleResult<Money> {
    if nper == 0 {
        return Err(HdbResaleError::DegenerateInput {
            context: "annuity payment over zero periods".into(),
        });
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    let factor = compound(rate, nper)?;
    let denominator = factor - Decimal::ONE;

    if denominator.is_zero() {
        return Err(HdbResaleError::DegenerateInput {
            context: "annuity payment denominator".into(),
        });
    }

    let scaled = principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(factor))
        .ok_or_else(|| overflow(&format!("annuity payment at {rate} per period")))?;
    Ok(scaled / denominator)
}

/// Compute the nth root of `x` via Newton's method: x^(1/n).
///
/// `x` must be positive; callers handle the non-positive case themselves.
pub fn nth_root(x: Decimal, n: u32) -> HdbResaleResult<Decimal> {
    if n <= 1 || x.is_zero() {
        return Ok(x);
    }

    let context = || overflow(&format!("root {n} of {x}"));
    let n_dec = Decimal::from(n);
    let n_minus_1 = n_dec - Decimal::ONE;

    // Initial guess: 1 + (x - 1) / n  (first-order Taylor)
    let mut guess = Decimal::ONE + (x - Decimal::ONE) / n_dec;

    for _ in 0..MAX_ROOT_ITERATIONS {
        let mut power = Decimal::ONE;
        for _ in 0..(n - 1) {
            power = power.checked_mul(guess).ok_or_else(context)?;
        }
        if power.is_zero() {
            break;
        }
        let step = n_minus_1.checked_mul(guess).ok_or_else(context)?;
        let quotient = x.checked_div(power).ok_or_else(context)?;
        let next = step.checked_add(quotient).ok_or_else(context)? / n_dec;
        let delta = (next - guess).abs();
        guess = next;
        if delta < ROOT_TOLERANCE {
            break;
        }
    }

    Ok(guess)
}

/// Annualize a multi-year growth ratio: ratio^(1/years) - 1.
///
/// Returns `None` when the ratio is not positive, where no real annual rate exists.
pub fn annualize_ratio(ratio: Decimal, years: u32) -> HdbResaleResult<Option<Rate>> {
    if ratio <= Decimal::ZERO {
        return Ok(None);
    }
    Ok(Some(nth_root(ratio, years)? - Decimal::ONE))
}

fn overflow(what: &str) -> HdbResaleError {
    HdbResaleError::DegenerateInput {
        context: format!("{what} exceeds the representable range"),
    }
}
