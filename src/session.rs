use hourglass_rs::SafeTimeProvider;

use crate::decimal::{Money, Rate};
use crate::errors::{PlanError, Result};
use crate::events::{Event, EventStore};
use crate::reconcile;
use crate::schedule::{monthly_installment, Schedule, ScheduleBuilder, MAX_SCHEDULE_MONTHS};
use crate::terms::LoanTerms;
use crate::types::{DerivedFinancials, PlanValues, RecordId};
use crate::upstream::{PlanRepository, PriceSource};

/// one interactive calculation session
///
/// Owns the terms, the current schedule, and the diagnostic event stream.
/// Every edit runs to completion before the next is processed; the schedule
/// is always replaced whole, never patched.
pub struct PlanSession {
    record_id: RecordId,
    enabled: bool,
    seed_price: Money,
    terms: LoanTerms,
    monthly_installment: Money,
    derived: DerivedFinancials,
    schedule: Option<Schedule>,
    pub events: EventStore,
}

impl PlanSession {
    /// start a session: fetch the seed target price once and derive the
    /// billing decomposition from it
    ///
    /// The enabled flag comes from the host's role/margin check and is not
    /// recomputed here. A failed seed fetch leaves the target price at zero
    /// and records a diagnostic event.
    pub fn start(record_id: RecordId, enabled: bool, price_source: &dyn PriceSource) -> Self {
        let mut events = EventStore::new();

        let seed_price = match price_source.target_price(record_id) {
            Ok(price) => price,
            Err(err) => {
                events.emit(Event::SeedFetchFailed {
                    record_id,
                    message: err.to_string(),
                });
                Money::ZERO
            }
        };

        let terms = LoanTerms::from_target_price(seed_price);
        events.emit(Event::SessionSeeded {
            record_id,
            target_price: seed_price,
            billing_price: terms.total_billing_price,
        });

        Self {
            record_id,
            enabled,
            seed_price,
            terms,
            monthly_installment: Money::ZERO,
            derived: DerivedFinancials::default(),
            schedule: None,
            events,
        }
    }

    pub fn record_id(&self) -> RecordId {
        self.record_id
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn terms(&self) -> &LoanTerms {
        &self.terms
    }

    pub fn schedule(&self) -> Option<&Schedule> {
        self.schedule.as_ref()
    }

    pub fn monthly_installment(&self) -> Money {
        self.monthly_installment
    }

    pub fn derived(&self) -> DerivedFinancials {
        self.derived
    }

    /// edit the advance amount
    ///
    /// Rejects an advance at or above the billing price without touching the
    /// principal; otherwise the principal is re-derived and, when a rate is
    /// set, the net-sales-value preview is refreshed.
    pub fn set_advance(&mut self, advance: Money) -> Result<DerivedFinancials> {
        self.ensure_enabled()?;

        let principal = reconcile::principal_from_advance(self.terms.total_billing_price, advance)?;
        self.terms.advance_amount = advance;
        self.terms.principal = principal;
        self.events.emit(Event::AdvanceUpdated { advance, principal });

        if self.terms.annual_rate.is_some() {
            self.refresh_derived();
        }
        Ok(self.derived)
    }

    /// edit the principal directly; the advance absorbs the difference
    pub fn set_principal(
        &mut self,
        principal: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<DerivedFinancials> {
        self.ensure_enabled()?;

        let advance = reconcile::advance_from_principal(self.terms.total_billing_price, principal)?;
        self.terms.principal = principal;
        self.terms.advance_amount = advance;
        self.events.emit(Event::PrincipalUpdated { principal, advance });

        if self.terms.annual_rate.is_some() {
            self.rebuild_if_ready(time_provider)?;
            self.refresh_derived();
        }
        Ok(self.derived)
    }

    /// edit the tenure; zero clears it and zeroes the installment
    pub fn set_tenure(
        &mut self,
        tenure_months: u32,
        time_provider: &SafeTimeProvider,
    ) -> Result<DerivedFinancials> {
        self.ensure_enabled()?;
        check_span("tenure", tenure_months)?;

        self.terms.tenure_months = (tenure_months > 0).then_some(tenure_months);
        self.events.emit(Event::TenureUpdated {
            tenure_months: self.terms.tenure_months,
        });

        match (self.terms.annual_rate, self.terms.tenure_months) {
            (Some(rate), Some(tenure)) => {
                self.monthly_installment =
                    monthly_installment(self.terms.principal, rate, tenure)?;
                self.events.emit(Event::InstallmentRecalculated {
                    principal: self.terms.principal,
                    monthly_installment: self.monthly_installment,
                });
                self.rebuild_if_ready(time_provider)?;
            }
            _ => {
                self.monthly_installment = Money::ZERO;
            }
        }
        Ok(self.derived)
    }

    /// edit the annual rate; zero is a valid rate (straight-line repayment)
    pub fn set_rate(
        &mut self,
        annual_rate: Rate,
        time_provider: &SafeTimeProvider,
    ) -> Result<DerivedFinancials> {
        self.ensure_enabled()?;

        self.terms.annual_rate = Some(annual_rate);
        self.events.emit(Event::RateUpdated {
            annual_rate: self.terms.annual_rate,
        });

        if let Some(tenure) = self.terms.tenure_months {
            self.monthly_installment =
                monthly_installment(self.terms.principal, annual_rate, tenure)?;
            self.events.emit(Event::InstallmentRecalculated {
                principal: self.terms.principal,
                monthly_installment: self.monthly_installment,
            });
        }

        self.rebuild_if_ready(time_provider)?;
        self.refresh_derived();
        Ok(self.derived)
    }

    /// edit the grace span; zero normalizes to "not configured"
    pub fn set_grace(
        &mut self,
        grace_months: u32,
        time_provider: &SafeTimeProvider,
    ) -> Result<DerivedFinancials> {
        self.ensure_enabled()?;
        check_span("grace", grace_months)?;

        self.terms.grace_months = (grace_months > 0).then_some(grace_months);
        self.emit_spans();
        self.rebuild_if_ready(time_provider)?;
        Ok(self.derived)
    }

    /// edit the moratorium span; zero normalizes to "not configured"
    pub fn set_moratorium(
        &mut self,
        moratorium_months: u32,
        time_provider: &SafeTimeProvider,
    ) -> Result<DerivedFinancials> {
        self.ensure_enabled()?;
        check_span("moratorium", moratorium_months)?;

        self.terms.moratorium_months = (moratorium_months > 0).then_some(moratorium_months);
        self.emit_spans();
        self.rebuild_if_ready(time_provider)?;
        Ok(self.derived)
    }

    /// edit the net sales value: back-solve the principal through the linear
    /// approximation and re-derive billing, target and GST from the new
    /// advance/principal sum
    pub fn set_net_sales_value(
        &mut self,
        net_sales_value: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<DerivedFinancials> {
        self.ensure_enabled()?;

        let rate = self
            .terms
            .annual_rate
            .ok_or(PlanError::NotComputable { missing: "annual rate" })?;

        let principal = reconcile::principal_from_net_sales_value(
            net_sales_value,
            self.terms.advance_amount,
            rate,
        )?;
        self.terms.principal = principal;
        self.events.emit(Event::NetSalesValueEdited {
            net_sales_value,
            back_solved_principal: principal,
        });

        self.rebuild_if_ready(time_provider)?;

        self.terms.total_billing_price = self.terms.advance_amount + principal;
        let (target_price, gst_add_on) =
            reconcile::target_from_billing(self.terms.total_billing_price);
        self.terms.target_price = target_price;
        self.terms.gst_add_on = gst_add_on;

        self.refresh_derived();
        Ok(self.derived)
    }

    /// rebuild the schedule from the current terms
    ///
    /// On failure the previous valid schedule is retained and the error is
    /// surfaced; a partial schedule never escapes the builder.
    pub fn rebuild_schedule(&mut self, time_provider: &SafeTimeProvider) -> Result<&Schedule> {
        self.ensure_enabled()?;
        self.do_rebuild(time_provider)?;
        match self.schedule.as_ref() {
            Some(schedule) => Ok(schedule),
            None => Err(PlanError::ScheduleComputation {
                message: "no schedule after rebuild".to_string(),
            }),
        }
    }

    /// restore the post-seed state: billing re-derived from the seeded
    /// target price, editable fields zeroed, schedule cleared
    pub fn reset(&mut self) {
        self.terms = LoanTerms::from_target_price(self.seed_price);
        self.monthly_installment = Money::ZERO;
        self.derived = DerivedFinancials::default();
        self.schedule = None;
        self.events.emit(Event::SessionReset {
            record_id: self.record_id,
        });
    }

    /// final values contract for the persistence collaborator
    pub fn plan_values(&self) -> PlanValues {
        PlanValues {
            record_id: self.record_id,
            total_billing_price: self.terms.total_billing_price,
            advance_amount: self.terms.advance_amount,
            principal: self.terms.principal,
            annual_rate: self.terms.annual_rate,
            tenure_months: self.terms.tenure_months,
            monthly_installment: self.monthly_installment,
            net_sales_value: self.derived.net_sales_value,
        }
    }

    /// hand the plan values to the repository; failure is non-fatal and the
    /// session keeps its state for a retry
    pub fn persist(&mut self, repository: &dyn PlanRepository) -> Result<()> {
        self.ensure_enabled()?;

        let values = self.plan_values();
        repository.persist(&values)?;
        self.events.emit(Event::ValuesPersisted {
            record_id: self.record_id,
            net_sales_value: values.net_sales_value,
        });
        Ok(())
    }

    fn ensure_enabled(&self) -> Result<()> {
        if self.enabled {
            Ok(())
        } else {
            Err(PlanError::CalculatorDisabled)
        }
    }

    fn emit_spans(&mut self) {
        self.events.emit(Event::SpansUpdated {
            grace_months: self.terms.grace_months,
            moratorium_months: self.terms.moratorium_months,
        });
    }

    fn refresh_derived(&mut self) {
        self.derived = reconcile::net_sales_value(
            self.terms.principal,
            self.terms.advance_amount,
            self.terms.annual_rate,
        );
    }

    /// rebuild only once rate, tenure and principal are all present; edits
    /// that leave the terms incomplete are not schedule errors
    fn rebuild_if_ready(&mut self, time_provider: &SafeTimeProvider) -> Result<()> {
        if self.terms.schedule_ready() {
            self.do_rebuild(time_provider)?;
        }
        Ok(())
    }

    fn do_rebuild(&mut self, time_provider: &SafeTimeProvider) -> Result<()> {
        let today = time_provider.now().date_naive();

        let built = ScheduleBuilder::from_terms(&self.terms).and_then(|b| b.build(today));
        let schedule = match built {
            Ok(schedule) => schedule,
            Err(err) => {
                self.events.emit(Event::ScheduleRebuildFailed {
                    message: err.to_string(),
                });
                return Err(err);
            }
        };

        if !schedule.accrued_moratorium_interest.is_zero() {
            self.events.emit(Event::MoratoriumInterestCapitalized {
                deferred_interest: schedule.accrued_moratorium_interest,
                new_principal: self.terms.principal + schedule.accrued_moratorium_interest,
                new_installment: schedule.monthly_installment,
            });
        }

        // the builder may have re-solved the installment mid-schedule
        self.monthly_installment = schedule.monthly_installment;
        self.events.emit(Event::ScheduleRebuilt {
            rows: schedule.len(),
            total_interest: schedule.total_interest,
        });
        self.schedule = Some(schedule);
        Ok(())
    }
}

/// months spans come from free-form user input; anything past the schedule
/// limit is rejected before it can touch the terms
fn check_span(field: &'static str, months: u32) -> Result<()> {
    if months > MAX_SCHEDULE_MONTHS {
        return Err(PlanError::SpanTooLong {
            field,
            months,
            max: MAX_SCHEDULE_MONTHS,
        });
    }
    Ok(())
}
