use chrono::{Datelike, NaiveDate};

use crate::errors::{PlanError, Result};

/// due dates for the next `count` calendar months: the first day of each
/// month, month 1 being the month after `today`
///
/// Pure in `today`; rollover is plain modular month/year arithmetic.
pub fn first_of_next_months(today: NaiveDate, count: u32) -> Result<Vec<NaiveDate>> {
    let year = today.year();
    let month0 = today.month0();

    let mut dates = Vec::with_capacity(count as usize);
    for i in 1..=count {
        let shifted = month0 + i;
        let due_year = year + (shifted / 12) as i32;
        let due_month = shifted % 12 + 1;

        let date = NaiveDate::from_ymd_opt(due_year, due_month, 1).ok_or_else(|| {
            PlanError::InvalidDate {
                message: format!("no first-of-month for {}-{}", due_year, due_month),
            }
        })?;
        dates.push(date);
    }

    Ok(dates)
}
