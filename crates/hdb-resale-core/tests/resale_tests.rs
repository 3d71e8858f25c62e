use hdb_resale_core::loan::amortization::monthly_payment;
use hdb_resale_core::resale::projection::{
    fund_balance_with_accrual, outstanding_balance, project_resale, ProjectionInput,
};
use hdb_resale_core::resale::returns::{calculate_returns, ReturnInput};
use hdb_resale_core::HdbResaleError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Exit projection
// ===========================================================================

fn grant_scenario() -> ProjectionInput {
    ProjectionInput {
        monthly_payment: monthly_payment(dec!(360000), dec!(2.6), 25).unwrap(),
        annual_rate_percent: dec!(2.6),
        principal_eligible: dec!(360000),
        term_years: 25,
        total_grants: dec!(100000),
        selling_price: dec!(600000),
        holding_period_years: 10,
        purchase_date: None,
    }
}

#[test]
fn test_ten_year_exit_with_grants() {
    let mut warnings = Vec::new();
    let p = project_resale(&grant_scenario(), &mut warnings).unwrap();

    assert_eq!(p.months_elapsed, 120);
    assert!((p.outstanding_loan_balance - dec!(243215.72)).abs() < dec!(0.01));
    assert!((p.fund_balance_with_accrual - dec!(128369.15)).abs() < dec!(0.01));
    assert!((p.cash_proceeds - dec!(228415.12)).abs() < dec!(0.01));
    assert!(!p.loan_repaid_before_exit);
}

#[test]
fn test_balance_at_exit_is_below_principal() {
    let input = grant_scenario();
    for years in [5, 10, 15, 20] {
        let bal = outstanding_balance(
            input.principal_eligible,
            input.monthly_payment,
            input.annual_rate_percent,
            years * 12,
        )
        .unwrap();
        assert!(bal > Decimal::ZERO && bal < input.principal_eligible);
    }
}

#[test]
fn test_fund_accrual_grows_with_holding_period() {
    let five = fund_balance_with_accrual(dec!(100000), 60).unwrap();
    let ten = fund_balance_with_accrual(dec!(100000), 120).unwrap();
    assert!(five > dec!(100000));
    assert!(ten > five);
}

// ===========================================================================
// Returns
// ===========================================================================

#[test]
fn test_returns_for_grant_scenario() {
    let mut warnings = Vec::new();
    let m = calculate_returns(
        &ReturnInput {
            selling_price: dec!(600000),
            purchase_price: dec!(520000),
            cash_proceeds: dec!(228415.12),
            total_cash_outlay: dec!(72188),
            holding_period_years: 10,
        },
        &mut warnings,
    )
    .unwrap();

    assert_eq!(m.selling_costs.total, dec!(13480));
    assert!((m.growth - dec!(0.153846)).abs() < dec!(0.000001));
    assert!((m.annualized_growth - dec!(0.014413)).abs() < dec!(0.000001));
    assert!((m.return_on_capital - dec!(1.977436)).abs() < dec!(0.000001));
    assert!((m.annualized_return_on_capital - dec!(0.115281)).abs() < dec!(0.000001));
}

#[test]
fn test_price_drop_gives_negative_growth() {
    let mut warnings = Vec::new();
    let m = calculate_returns(
        &ReturnInput {
            selling_price: dec!(270000),
            purchase_price: dec!(300000),
            cash_proceeds: dec!(28000),
            total_cash_outlay: dec!(21188),
            holding_period_years: 5,
        },
        &mut warnings,
    )
    .unwrap();
    assert_eq!(m.growth, dec!(-0.1));
    assert!(m.annualized_growth < Decimal::ZERO);
    assert!(m.annualized_growth > dec!(-0.1));
}

#[test]
fn test_zero_purchase_price_is_degenerate() {
    let mut warnings = Vec::new();
    let err = calculate_returns(
        &ReturnInput {
            selling_price: dec!(300000),
            purchase_price: Decimal::ZERO,
            cash_proceeds: dec!(1000),
            total_cash_outlay: dec!(1000),
            holding_period_years: 5,
        },
        &mut warnings,
    )
    .unwrap_err();
    assert!(matches!(err, HdbResaleError::DegenerateInput { .. }));
}
