use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};

/// unique identifier for the record a plan session is attached to
pub type RecordId = Uuid;

/// accrual regime for a single schedule row, selected by index arithmetic
/// over the configured grace and moratorium spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccrualRegime {
    /// no interest accrues, no payment is made, balance carried unchanged
    Grace,
    /// interest accrues on the opening balance but is deferred, not paid
    Moratorium,
    /// standard annuity amortization; `capitalize` marks the first row after
    /// the grace/moratorium span, where deferred interest folds into the
    /// principal and the installment is re-solved
    Amortizing { capitalize: bool },
}

/// single row of the payment schedule, immutable once produced
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub sequence_number: u32,
    pub due_date: NaiveDate,
    pub regime: AccrualRegime,
    pub opening_principal: Money,
    pub period_interest: Money,
    pub installment: Money,
    pub principal_paid: Money,
    pub closing_principal: Money,
}

/// derived display quantities, recomputed on every principal or rate change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DerivedFinancials {
    pub interest: Money,
    pub interest_gst: Money,
    pub total_interest: Money,
    pub total_paid_with_interest: Money,
    pub net_sales_value: Money,
}

/// final values handed to the persistence collaborator; the storage format
/// is the host application's concern, this tuple is the contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanValues {
    pub record_id: RecordId,
    pub total_billing_price: Money,
    pub advance_amount: Money,
    pub principal: Money,
    pub annual_rate: Option<Rate>,
    pub tenure_months: Option<u32>,
    pub monthly_installment: Money,
    pub net_sales_value: Money,
}
