use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::errors::{PlanError, Result};

/// periodic (monthly) rate from an optional annual rate
///
/// An absent rate means "schedule not computable yet", never zero; callers
/// must not render a schedule off this error.
pub fn periodic_rate(annual_rate: Option<Rate>) -> Result<Rate> {
    annual_rate
        .map(|r| r.monthly_rate())
        .ok_or(PlanError::NotComputable { missing: "annual rate" })
}

/// fixed monthly installment for the standard annuity:
/// PMT = P * r * (1 + r)^n / ((1 + r)^n - 1)
///
/// A zero rate degenerates the formula and is special-cased to straight-line
/// repayment P / n. Pure and idempotent; re-invoked with the capitalized
/// principal after a moratorium span.
pub fn monthly_installment(principal: Money, annual_rate: Rate, tenure_months: u32) -> Result<Money> {
    if tenure_months == 0 {
        return Err(PlanError::NotComputable { missing: "tenure" });
    }

    let monthly_rate = annual_rate.monthly_rate().as_decimal();

    if monthly_rate.is_zero() {
        return Ok(principal / Decimal::from(tenure_months));
    }

    let mut compound = Decimal::ONE;
    let base = Decimal::ONE + monthly_rate;
    for _ in 0..tenure_months {
        compound *= base;
    }

    let numerator = principal.as_decimal() * monthly_rate * compound;
    let denominator = compound - Decimal::ONE;

    Ok(Money::from_decimal(numerator / denominator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_installment() {
        // 100,000 at 12% over 12 months
        let pmt = monthly_installment(
            Money::from_major(100_000),
            Rate::from_percentage(12),
            12,
        )
        .unwrap();
        assert!((pmt.as_decimal() - dec!(8884.88)).abs() < dec!(0.01));
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let pmt = monthly_installment(Money::from_major(120_000), Rate::ZERO, 12).unwrap();
        assert_eq!(pmt, Money::from_major(10_000));
    }

    #[test]
    fn test_zero_tenure_not_computable() {
        let result = monthly_installment(Money::from_major(100_000), Rate::from_percentage(12), 0);
        assert!(matches!(result, Err(PlanError::NotComputable { .. })));
    }

    #[test]
    fn test_absent_rate_not_computable() {
        assert!(matches!(
            periodic_rate(None),
            Err(PlanError::NotComputable { .. })
        ));
        let monthly = periodic_rate(Some(Rate::from_percentage(12))).unwrap();
        assert_eq!(monthly.as_decimal(), dec!(0.01));
    }

    #[test]
    fn test_idempotent_reinvocation() {
        let principal = Money::from_major(100_000);
        let rate = Rate::from_percentage(12);
        let first = monthly_installment(principal, rate, 12).unwrap();
        let second = monthly_installment(principal, rate, 12).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_installments_repay_principal_plus_interest() {
        // n * pmt covers principal and total accrued interest within tolerance
        let principal = Money::from_major(100_000);
        let rate = Rate::from_percentage(12);
        let pmt = monthly_installment(principal, rate, 12).unwrap();
        let total = pmt * dec!(12);
        assert!((total.as_decimal() - dec!(106618.6)).abs() < dec!(1));
    }
}
