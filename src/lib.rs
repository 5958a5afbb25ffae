pub mod decimal;
pub mod errors;
pub mod events;
pub mod reconcile;
pub mod schedule;
pub mod session;
pub mod terms;
pub mod types;
pub mod upstream;

// re-export key types
pub use decimal::{Money, Rate};
pub use errors::{PlanError, Result};
pub use events::{Event, EventStore};
pub use schedule::{
    monthly_installment, periodic_rate, Schedule, ScheduleBuilder, MAX_SCHEDULE_MONTHS,
};
pub use session::PlanSession;
pub use terms::LoanTerms;
pub use types::{AccrualRegime, DerivedFinancials, PlanValues, RecordId, ScheduleRow};
pub use upstream::{PlanRepository, PriceSource};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
