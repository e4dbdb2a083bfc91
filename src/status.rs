use chrono::{DateTime, Utc};

use crate::calendar::Calendar;
use crate::decimal::Money;
pub use crate::types::LoanStatus;

/// everything the status of a loan depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusInputs {
    pub closed_at: Option<DateTime<Utc>>,
    pub total_paid: Money,
    pub total_payable: Money,
    pub due_date: DateTime<Utc>,
}

/// classify a loan; first matching rule wins
///
/// 1. closed: manually closed, or paid in full
/// 2. due-today: due date is today, even with a partial payment
/// 3. overdue: past due with nothing paid
/// 4. partially-paid: something paid, before or after the due date
/// 5. active
///
/// Rule 2 shadows rule 4 on the due date itself. That precedence is
/// kept as-is pending a product decision.
pub fn classify(inputs: &StatusInputs, today: DateTime<Utc>, calendar: &Calendar) -> LoanStatus {
    if inputs.closed_at.is_some() || inputs.total_paid >= inputs.total_payable {
        return LoanStatus::Closed;
    }

    let today = calendar.day_floor(today);
    let due = calendar.day_floor(inputs.due_date);

    if today == due {
        return LoanStatus::DueToday;
    }

    let has_partial = inputs.total_paid.is_positive();

    if has_partial {
        LoanStatus::PartiallyPaid
    } else if today > due {
        LoanStatus::Overdue
    } else {
        LoanStatus::Active
    }
}
