use crate::decimal::Money;
use crate::errors::Result;
use crate::types::{PlanValues, RecordId};

/// one-shot source of the seed target price for a record
///
/// Fetch failure is non-fatal to the session: the target price stays at zero
/// and the user can continue once upstream recovers.
pub trait PriceSource {
    fn target_price(&self, record_id: RecordId) -> Result<Money>;
}

/// sink for the final plan values; the storage format is the host's concern
pub trait PlanRepository {
    fn persist(&self, values: &PlanValues) -> Result<()>;
}
