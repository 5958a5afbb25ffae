use thiserror::Error;

use crate::decimal::Money;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("advance payment cannot exceed total billing price: advance {advance}, billing price {billing_price}")]
    AdvanceExceedsBillingPrice {
        advance: Money,
        billing_price: Money,
    },

    #[error("invalid amount for {field}: {value}")]
    InvalidAmount {
        field: &'static str,
        value: Money,
    },

    #[error("schedule not computable: {missing} not set")]
    NotComputable {
        missing: &'static str,
    },

    #[error("span too long for {field}: {months} months exceeds the {max} month limit")]
    SpanTooLong {
        field: &'static str,
        months: u32,
        max: u32,
    },

    #[error("schedule computation failed: {message}")]
    ScheduleComputation {
        message: String,
    },

    #[error("invalid due date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("seed price fetch failed: {message}")]
    SeedFetch {
        message: String,
    },

    #[error("failed to persist plan values: {message}")]
    Persistence {
        message: String,
    },

    #[error("calculator is not enabled for this session")]
    CalculatorDisabled,
}

pub type Result<T> = std::result::Result<T, PlanError>;
