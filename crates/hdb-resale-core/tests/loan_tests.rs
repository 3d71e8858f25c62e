use chrono::NaiveDate;
use hdb_resale_core::loan::amortization::{
    amortize, build_amortization_schedule, monthly_payment, AmortizationInput,
};
use hdb_resale_core::HdbResaleError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn reference_loan() -> AmortizationInput {
    AmortizationInput {
        principal: dec!(285000),
        annual_rate_percent: dec!(2.6),
        term_years: 25,
        first_payment_date: None,
    }
}

#[test]
fn test_reference_payment_and_schedule() {
    let out = build_amortization_schedule(&reference_loan()).unwrap();
    let s = &out.result;

    // Annuity formula: 285000 * r(1+r)^300 / ((1+r)^300 - 1), r = 0.026/12
    assert!((s.monthly_payment - dec!(1292.96)).abs() < dec!(0.01));
    assert_eq!(s.schedule.len(), 300);
    assert!(s.schedule[299].remaining_balance.abs() < dec!(0.000001));
    assert!(out.warnings.is_empty());
}

#[test]
fn test_every_row_splits_payment_exactly() {
    let s = amortize(&reference_loan()).unwrap();
    for row in &s.schedule {
        let sum = row.principal_component + row.interest_component;
        assert!(
            (sum - row.payment_amount).abs() < dec!(0.000000000001),
            "period {}",
            row.period
        );
        assert_eq!(row.payment_amount, s.monthly_payment);
    }
}

#[test]
fn test_balance_strictly_decreasing() {
    let s = amortize(&reference_loan()).unwrap();
    let mut previous = dec!(285000);
    for row in &s.schedule {
        assert!(row.remaining_balance < previous, "period {}", row.period);
        previous = row.remaining_balance;
    }
}

#[test]
fn test_interest_share_falls_over_time() {
    let s = amortize(&reference_loan()).unwrap();
    assert!(s.schedule[0].interest_component > s.schedule[150].interest_component);
    assert!(s.schedule[150].interest_component > s.schedule[299].interest_component);
}

#[test]
fn test_penalty_tracks_balance() {
    let s = amortize(&reference_loan()).unwrap();
    let row = &s.schedule[59];
    assert_eq!(row.year, 5);
    assert_eq!(
        row.estimated_prepayment_penalty,
        row.remaining_balance * dec!(0.015)
    );
}

#[test]
fn test_recomputation_is_idempotent() {
    let a = amortize(&reference_loan()).unwrap();
    let b = amortize(&reference_loan()).unwrap();
    assert_eq!(a.schedule, b.schedule);
    assert_eq!(a.total_interest, b.total_interest);
}

#[test]
fn test_dated_schedule_last_payment() {
    let mut input = reference_loan();
    input.first_payment_date = NaiveDate::from_ymd_opt(2025, 2, 1);
    let s = amortize(&input).unwrap();
    assert_eq!(
        s.schedule[299].payment_date,
        NaiveDate::from_ymd_opt(2050, 1, 1)
    );
}

#[test]
fn test_zero_principal_has_zero_schedule() {
    let mut input = reference_loan();
    input.principal = Decimal::ZERO;
    let s = amortize(&input).unwrap();
    assert_eq!(s.monthly_payment, Decimal::ZERO);
    assert_eq!(s.total_interest, Decimal::ZERO);
    assert!(s.schedule.iter().all(|r| r.remaining_balance.is_zero()));
}

#[test]
fn test_negative_rate_rejected() {
    let mut input = reference_loan();
    input.annual_rate_percent = dec!(-0.5);
    assert!(matches!(
        build_amortization_schedule(&input).unwrap_err(),
        HdbResaleError::InvalidInput { .. }
    ));
}

#[test]
fn test_shorter_term_pays_more_monthly_less_interest() {
    let long = monthly_payment(dec!(285000), dec!(2.6), 25).unwrap();
    let short = monthly_payment(dec!(285000), dec!(2.6), 15).unwrap();
    assert!(short > long);
    assert!(short * dec!(180) < long * dec!(300));
}
