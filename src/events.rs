use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::RecordId;

/// all events that can be emitted by a plan session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // lifecycle events
    SessionSeeded {
        record_id: RecordId,
        target_price: Money,
        billing_price: Money,
    },
    SeedFetchFailed {
        record_id: RecordId,
        message: String,
    },
    SessionReset {
        record_id: RecordId,
    },

    // edit events
    AdvanceUpdated {
        advance: Money,
        principal: Money,
    },
    PrincipalUpdated {
        principal: Money,
        advance: Money,
    },
    TenureUpdated {
        tenure_months: Option<u32>,
    },
    RateUpdated {
        annual_rate: Option<Rate>,
    },
    SpansUpdated {
        grace_months: Option<u32>,
        moratorium_months: Option<u32>,
    },
    NetSalesValueEdited {
        net_sales_value: Money,
        back_solved_principal: Money,
    },

    // computation events
    InstallmentRecalculated {
        principal: Money,
        monthly_installment: Money,
    },
    MoratoriumInterestCapitalized {
        deferred_interest: Money,
        new_principal: Money,
        new_installment: Money,
    },
    ScheduleRebuilt {
        rows: usize,
        total_interest: Money,
    },
    ScheduleRebuildFailed {
        message: String,
    },

    // persistence events
    ValuesPersisted {
        record_id: RecordId,
        net_sales_value: Money,
    },
}

/// event store for collecting events during session operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
