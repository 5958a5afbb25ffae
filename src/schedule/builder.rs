use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{PlanError, Result};
use crate::schedule::{first_of_next_months, monthly_installment, regime_for, MAX_SCHEDULE_MONTHS};
use crate::terms::LoanTerms;
use crate::types::{AccrualRegime, ScheduleRow};

/// complete payment schedule for one set of terms
///
/// Rebuilt from scratch on every parameter edit; rows are never patched in
/// place because moratorium capitalization can shift the base for every
/// subsequent row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub rows: Vec<ScheduleRow>,
    /// installment in effect for the amortizing rows; differs from the
    /// pre-build installment whenever moratorium interest was capitalized
    pub monthly_installment: Money,
    /// interest deferred during the moratorium span, capitalized at the
    /// first amortizing row
    pub accrued_moratorium_interest: Money,
    pub total_interest: Money,
    pub total_payment: Money,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// walks the due dates and produces one row per date, carrying the previous
/// closing balance forward and applying one accrual regime per row
pub struct ScheduleBuilder {
    principal: Money,
    annual_rate: Rate,
    tenure_months: u32,
    grace_months: u32,
    moratorium_months: u32,
}

impl ScheduleBuilder {
    pub fn new(
        principal: Money,
        annual_rate: Rate,
        tenure_months: u32,
        grace_months: u32,
        moratorium_months: u32,
    ) -> Self {
        Self {
            principal,
            annual_rate,
            tenure_months,
            grace_months,
            moratorium_months,
        }
    }

    /// builder from the session terms; absent rate or tenure means the
    /// schedule is not computable yet
    pub fn from_terms(terms: &LoanTerms) -> Result<Self> {
        let annual_rate = terms
            .annual_rate
            .ok_or(PlanError::NotComputable { missing: "annual rate" })?;
        let tenure_months = terms
            .tenure_months
            .ok_or(PlanError::NotComputable { missing: "tenure" })?;

        Ok(Self::new(
            terms.principal,
            annual_rate,
            tenure_months,
            terms.grace(),
            terms.moratorium(),
        ))
    }

    /// single forward pass over `tenure + grace + moratorium` months
    ///
    /// The moratorium accumulator and the running balance are fold state
    /// local to this call; nothing survives between builds.
    pub fn build(&self, today: NaiveDate) -> Result<Schedule> {
        if self.principal.is_negative() {
            return Err(PlanError::InvalidAmount {
                field: "principal",
                value: self.principal,
            });
        }

        let total_months = self
            .tenure_months
            .saturating_add(self.grace_months)
            .saturating_add(self.moratorium_months);
        if total_months > MAX_SCHEDULE_MONTHS {
            return Err(PlanError::SpanTooLong {
                field: "schedule length",
                months: total_months,
                max: MAX_SCHEDULE_MONTHS,
            });
        }

        let monthly_rate = self.annual_rate.monthly_rate().as_decimal();
        let due_dates = first_of_next_months(today, total_months)?;

        let mut installment = monthly_installment(self.principal, self.annual_rate, self.tenure_months)?;
        let mut deferred_interest = Money::ZERO;
        let mut previous_closing = self.principal;
        let mut rows = Vec::with_capacity(due_dates.len());

        for (i, due_date) in due_dates.into_iter().enumerate() {
            let index = i as u32;
            let regime = regime_for(index, self.grace_months, self.moratorium_months);

            let row = match regime {
                AccrualRegime::Grace => ScheduleRow {
                    sequence_number: index + 1,
                    due_date,
                    regime,
                    opening_principal: self.principal,
                    period_interest: Money::ZERO,
                    installment: Money::ZERO,
                    principal_paid: Money::ZERO,
                    closing_principal: self.principal,
                },
                AccrualRegime::Moratorium => {
                    // without a preceding grace span, deferred interest
                    // accrues on the configured principal each month; a grace
                    // span switches accrual to the carried balance
                    let opening = if self.grace_months == 0 {
                        self.principal
                    } else {
                        previous_closing
                    };
                    let interest = Money::from_decimal(opening.as_decimal() * monthly_rate);
                    deferred_interest += interest;

                    ScheduleRow {
                        sequence_number: index + 1,
                        due_date,
                        regime,
                        opening_principal: opening,
                        period_interest: interest,
                        installment: Money::ZERO,
                        principal_paid: -interest,
                        closing_principal: opening + interest,
                    }
                }
                AccrualRegime::Amortizing { capitalize } => {
                    let opening = if capitalize {
                        // deferred interest folds into the principal and the
                        // installment is re-solved for the original tenure
                        let capitalized = self.principal + deferred_interest;
                        installment =
                            monthly_installment(capitalized, self.annual_rate, self.tenure_months)?;
                        capitalized
                    } else if index == 0 {
                        self.principal
                    } else {
                        previous_closing
                    };

                    let interest = Money::from_decimal(opening.as_decimal() * monthly_rate);
                    let principal_paid = installment - interest;
                    let closing = (opening - principal_paid).max(Money::ZERO);

                    ScheduleRow {
                        sequence_number: index + 1,
                        due_date,
                        regime,
                        opening_principal: opening,
                        period_interest: interest,
                        installment,
                        principal_paid,
                        closing_principal: closing,
                    }
                }
            };

            previous_closing = row.closing_principal;
            rows.push(row);
        }

        let total_interest = rows
            .iter()
            .map(|r| r.period_interest)
            .fold(Money::ZERO, |acc, x| acc + x);

        let total_payment = rows
            .iter()
            .map(|r| r.installment)
            .fold(Money::ZERO, |acc, x| acc + x);

        Ok(Schedule {
            rows,
            monthly_installment: installment,
            accrued_moratorium_interest: deferred_interest,
            total_interest,
            total_payment,
        })
    }
}
