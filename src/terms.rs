use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::reconcile;

/// mutable loan parameters for one calculation session
///
/// Seeded from an externally fetched target price and mutated one field at a
/// time by the session's edit operations. Spans of `None` mean "not
/// configured" and behave as zero months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub target_price: Money,
    pub gst_add_on: Money,
    pub total_billing_price: Money,
    pub advance_amount: Money,
    pub principal: Money,
    pub annual_rate: Option<Rate>,
    pub tenure_months: Option<u32>,
    pub grace_months: Option<u32>,
    pub moratorium_months: Option<u32>,
}

impl LoanTerms {
    /// seed terms from a target price; GST and billing price are derived,
    /// everything editable starts at zero
    pub fn from_target_price(target_price: Money) -> Self {
        let (gst_add_on, total_billing_price) = reconcile::billing_from_target(target_price);
        Self {
            target_price,
            gst_add_on,
            total_billing_price,
            advance_amount: Money::ZERO,
            principal: Money::ZERO,
            annual_rate: None,
            tenure_months: None,
            grace_months: None,
            moratorium_months: None,
        }
    }

    /// grace span in months, None normalized to zero
    pub fn grace(&self) -> u32 {
        self.grace_months.unwrap_or(0)
    }

    /// moratorium span in months, None normalized to zero
    pub fn moratorium(&self) -> u32 {
        self.moratorium_months.unwrap_or(0)
    }

    /// full schedule length: tenure plus grace plus moratorium
    pub fn total_periods(&self) -> Option<u32> {
        self.tenure_months
            .map(|t| t + self.grace() + self.moratorium())
    }

    /// whether a schedule can be built from the current terms
    pub fn schedule_ready(&self) -> bool {
        self.annual_rate.is_some()
            && self.tenure_months.map(|t| t > 0).unwrap_or(false)
            && !self.principal.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_derives_gst_and_billing() {
        let terms = LoanTerms::from_target_price(Money::from_major(100_000));
        assert_eq!(terms.gst_add_on, Money::from_major(18_000));
        assert_eq!(terms.total_billing_price, Money::from_major(118_000));
        assert_eq!(terms.advance_amount, Money::ZERO);
        assert_eq!(terms.principal, Money::ZERO);
    }

    #[test]
    fn test_total_periods_includes_spans() {
        let mut terms = LoanTerms::from_target_price(Money::from_major(100_000));
        assert_eq!(terms.total_periods(), None);

        terms.tenure_months = Some(12);
        terms.grace_months = Some(2);
        terms.moratorium_months = Some(3);
        assert_eq!(terms.total_periods(), Some(17));
    }

    #[test]
    fn test_schedule_ready_requires_rate_tenure_principal() {
        let mut terms = LoanTerms::from_target_price(Money::from_major(100_000));
        assert!(!terms.schedule_ready());

        terms.principal = Money::from_major(90_000);
        terms.annual_rate = Some(Rate::from_percentage(12));
        assert!(!terms.schedule_ready());

        terms.tenure_months = Some(12);
        assert!(terms.schedule_ready());
    }
}
