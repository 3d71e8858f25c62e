//! Housing grants credited to the buyer's retirement fund.
//!
//! Grants reduce the loan needed to complete the purchase, but the fund
//! must be refunded with accrued interest on resale (see
//! [`crate::resale::projection`]).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::HdbResaleError;
use crate::types::Money;
use crate::HdbResaleResult;

/// Maximum First-Timer grant.
pub const FIRST_TIMER_GRANT_CAP: Money = dec!(80000);

/// Maximum Enhanced Housing grant.
pub const ENHANCED_GRANT_CAP: Money = dec!(120000);

/// Maximum Proximity Housing grant.
pub const PROXIMITY_GRANT_CAP: Money = dec!(30000);

/// The three independent grant components. Absent fields default to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrantInputs {
    #[serde(default)]
    pub first_timer: Money,
    #[serde(default)]
    pub enhanced: Money,
    #[serde(default)]
    pub proximity: Money,
}

impl GrantInputs {
    /// Check every component lies within `[0, cap]`.
    pub fn validate(&self) -> HdbResaleResult<()> {
        check_component("grants.first_timer", self.first_timer, FIRST_TIMER_GRANT_CAP)?;
        check_component("grants.enhanced", self.enhanced, ENHANCED_GRANT_CAP)?;
        check_component("grants.proximity", self.proximity, PROXIMITY_GRANT_CAP)
    }
}

fn check_component(field: &str, amount: Money, cap: Money) -> HdbResaleResult<()> {
    if amount < Decimal::ZERO || amount > cap {
        return Err(HdbResaleError::InvalidInput {
            field: field.into(),
            reason: format!("Grant must be between 0 and {cap}"),
        });
    }
    Ok(())
}

/// Sum of all selected grants. Does not re-validate the caps.
pub fn total_grants(grants: &GrantInputs) -> Money {
    grants.first_timer + grants.enhanced + grants.proximity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_grants_sums_components() {
        let g = GrantInputs {
            first_timer: dec!(80000),
            enhanced: dec!(35000),
            proximity: dec!(20000),
        };
        assert_eq!(total_grants(&g), dec!(135000));
    }

    #[test]
    fn test_default_grants_are_zero() {
        assert_eq!(total_grants(&GrantInputs::default()), Decimal::ZERO);
    }

    #[test]
    fn test_validate_rejects_over_cap() {
        let g = GrantInputs {
            proximity: dec!(30001),
            ..Default::default()
        };
        match g.validate().unwrap_err() {
            HdbResaleError::InvalidInput { field, .. } => assert_eq!(field, "grants.proximity"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_accepts_caps_exactly() {
        let g = GrantInputs {
            first_timer: FIRST_TIMER_GRANT_CAP,
            enhanced: ENHANCED_GRANT_CAP,
            proximity: PROXIMITY_GRANT_CAP,
        };
        assert!(g.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative() {
        let g = GrantInputs {
            enhanced: dec!(-1),
            ..Default::default()
        };
        assert!(g.validate().is_err());
    }
}
