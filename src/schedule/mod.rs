mod builder;
mod dates;
mod installment;

pub use builder::{Schedule, ScheduleBuilder};
pub use dates::first_of_next_months;
pub use installment::{monthly_installment, periodic_rate};

use crate::types::AccrualRegime;

/// upper bound on `tenure + grace + moratorium`; realistic terms run tens to
/// low hundreds of months, anything beyond this is rejected as input error
pub const MAX_SCHEDULE_MONTHS: u32 = 600;

/// classify a 0-based row index against the configured grace and moratorium
/// spans; pure so regime selection is testable apart from the accrual math
pub fn regime_for(index: u32, grace: u32, moratorium: u32) -> AccrualRegime {
    if index < grace {
        AccrualRegime::Grace
    } else if index < grace + moratorium {
        AccrualRegime::Moratorium
    } else {
        AccrualRegime::Amortizing {
            capitalize: grace + moratorium > 0 && index == grace + moratorium,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_spans_is_plain_amortization() {
        for i in 0..12 {
            assert_eq!(regime_for(i, 0, 0), AccrualRegime::Amortizing { capitalize: false });
        }
    }

    #[test]
    fn test_grace_then_amortizing() {
        assert_eq!(regime_for(0, 2, 0), AccrualRegime::Grace);
        assert_eq!(regime_for(1, 2, 0), AccrualRegime::Grace);
        assert_eq!(regime_for(2, 2, 0), AccrualRegime::Amortizing { capitalize: true });
        assert_eq!(regime_for(3, 2, 0), AccrualRegime::Amortizing { capitalize: false });
    }

    #[test]
    fn test_moratorium_without_grace() {
        assert_eq!(regime_for(0, 0, 3), AccrualRegime::Moratorium);
        assert_eq!(regime_for(2, 0, 3), AccrualRegime::Moratorium);
        assert_eq!(regime_for(3, 0, 3), AccrualRegime::Amortizing { capitalize: true });
    }

    #[test]
    fn test_grace_takes_precedence_over_moratorium() {
        // grace 2, moratorium 3: rows 0-1 grace, 2-4 moratorium, 5 capitalizes
        assert_eq!(regime_for(1, 2, 3), AccrualRegime::Grace);
        assert_eq!(regime_for(2, 2, 3), AccrualRegime::Moratorium);
        assert_eq!(regime_for(4, 2, 3), AccrualRegime::Moratorium);
        assert_eq!(regime_for(5, 2, 3), AccrualRegime::Amortizing { capitalize: true });
        assert_eq!(regime_for(6, 2, 3), AccrualRegime::Amortizing { capitalize: false });
    }
}
