use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::decimal::{Money, Rate};
use crate::errors::{PlanError, Result};
use crate::types::DerivedFinancials;

/// GST applied on top of the target price and on interest
pub const GST_PERCENT: Decimal = dec!(18);

/// billing price as a multiple of the target price (1 + GST)
pub const GST_FACTOR: Decimal = dec!(1.18);

/// placeholder annual rate (1%) used for the net-sales-value preview before
/// a real rate has been entered; avoids propagating an absent rate into the
/// derived display fields
const PREVIEW_RATE_PERCENT: Decimal = dec!(1);

/// linear per-rate-point factor for the net-sales-value back-solve.
///
/// The back-solve deliberately inverts a GST-inclusive simple-interest
/// approximation (1.18 x 1% per rate point = 0.0118), not the annuity math
/// used by the schedule. The two disagree by construction; the approximation
/// is the accepted contract for this edit path.
const LINEAR_NSV_FACTOR: Decimal = dec!(0.0118);

/// derive GST add-on and total billing price from a target price
pub fn billing_from_target(target_price: Money) -> (Money, Money) {
    let gst_add_on = target_price.percentage(GST_PERCENT);
    (gst_add_on, target_price + gst_add_on)
}

/// re-derive target price and GST add-on from an edited billing price
pub fn target_from_billing(billing_price: Money) -> (Money, Money) {
    let target_price = billing_price / GST_FACTOR;
    let gst_add_on = target_price.percentage(GST_PERCENT);
    (target_price, gst_add_on)
}

/// principal implied by an advance payment against the billing price;
/// rejects an advance at or above the billing price without mutating anything
pub fn principal_from_advance(billing_price: Money, advance: Money) -> Result<Money> {
    if advance.is_negative() {
        return Err(PlanError::InvalidAmount {
            field: "advance_amount",
            value: advance,
        });
    }
    if advance >= billing_price {
        return Err(PlanError::AdvanceExceedsBillingPrice {
            advance,
            billing_price,
        });
    }
    Ok(billing_price - advance)
}

/// advance implied by a directly edited principal
pub fn advance_from_principal(billing_price: Money, principal: Money) -> Result<Money> {
    if principal.is_negative() {
        return Err(PlanError::InvalidAmount {
            field: "principal",
            value: principal,
        });
    }
    Ok(billing_price - principal)
}

/// GST-inclusive simple-interest preview of the net sales value
///
/// Uses the placeholder 1% rate when no rate is set, so the preview is
/// always well-defined. This is a display identity, not the annuity total.
pub fn net_sales_value(principal: Money, advance: Money, rate: Option<Rate>) -> DerivedFinancials {
    let rate_percent = rate
        .map(|r| r.as_percentage())
        .unwrap_or(PREVIEW_RATE_PERCENT);

    let interest = principal.percentage(rate_percent);
    let interest_gst = interest.percentage(GST_PERCENT);
    let total_interest = interest + interest_gst;
    let total_paid_with_interest = principal + total_interest;
    let net_sales_value = total_paid_with_interest + advance;

    DerivedFinancials {
        interest,
        interest_gst,
        total_interest,
        total_paid_with_interest,
        net_sales_value,
    }
}

/// back-solve the principal from an edited net sales value using the named
/// linear approximation
pub fn principal_from_net_sales_value(
    net_sales_value: Money,
    advance: Money,
    rate: Rate,
) -> Result<Money> {
    if net_sales_value.is_negative() {
        return Err(PlanError::InvalidAmount {
            field: "net_sales_value",
            value: net_sales_value,
        });
    }
    let divisor = Decimal::ONE + LINEAR_NSV_FACTOR * rate.as_percentage();
    Ok((net_sales_value - advance) / divisor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_billing_decomposition_round_trips() {
        let (gst, billing) = billing_from_target(Money::from_major(100_000));
        assert_eq!(gst, Money::from_major(18_000));
        assert_eq!(billing, Money::from_major(118_000));

        let (target, gst_back) = target_from_billing(billing);
        assert_eq!(target, Money::from_major(100_000));
        assert_eq!(gst_back, gst);
    }

    #[test]
    fn test_advance_edit_recomputes_principal() {
        let billing = Money::from_major(120_000);
        let principal = principal_from_advance(billing, Money::from_major(30_000)).unwrap();
        assert_eq!(principal, Money::from_major(90_000));
    }

    #[test]
    fn test_advance_at_or_above_billing_rejected() {
        let billing = Money::from_major(120_000);
        assert!(matches!(
            principal_from_advance(billing, Money::from_major(130_000)),
            Err(PlanError::AdvanceExceedsBillingPrice { .. })
        ));
        assert!(matches!(
            principal_from_advance(billing, billing),
            Err(PlanError::AdvanceExceedsBillingPrice { .. })
        ));
    }

    #[test]
    fn test_net_sales_value_identity() {
        let derived = net_sales_value(
            Money::from_major(100_000),
            Money::from_major(20_000),
            Some(Rate::from_percentage(12)),
        );
        assert_eq!(derived.interest, Money::from_major(12_000));
        assert_eq!(derived.interest_gst, Money::from_major(2_160));
        assert_eq!(derived.total_interest, Money::from_major(14_160));
        assert_eq!(derived.total_paid_with_interest, Money::from_major(114_160));
        assert_eq!(derived.net_sales_value, Money::from_major(134_160));
    }

    #[test]
    fn test_preview_uses_one_percent_when_rate_unset() {
        let derived = net_sales_value(Money::from_major(100_000), Money::ZERO, None);
        assert_eq!(derived.interest, Money::from_major(1_000));
        assert_eq!(derived.total_interest, Money::from_major(1_180));
    }

    #[test]
    fn test_back_solve_inverts_the_linear_identity() {
        // the forward identity at 12%: nsv = advance + principal * (1 + 0.0118 * 12)
        let derived = net_sales_value(
            Money::from_major(100_000),
            Money::from_major(20_000),
            Some(Rate::from_percentage(12)),
        );
        let principal = principal_from_net_sales_value(
            derived.net_sales_value,
            Money::from_major(20_000),
            Rate::from_percentage(12),
        )
        .unwrap();
        assert!((principal - Money::from_major(100_000)).abs() < Money::ONE);
    }
}
