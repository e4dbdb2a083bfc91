use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::Calendar;
use crate::decimal::Money;

/// the fixed fee is spread over this many days to get the daily penalty rate
pub const PENALTY_DIVISOR_DAYS: u32 = 30;

/// penalty accrued once a loan passes its due date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverduePenalty {
    /// fixed interest / 30, charged per whole day past due
    pub daily_rate: Money,
    pub days_overdue: u32,
    pub amount: Money,
}

impl OverduePenalty {
    /// penalty for a loan with the given fixed fee and due date, as of an instant
    pub fn assess(
        fixed_interest: Money,
        due_date: DateTime<Utc>,
        as_of: DateTime<Utc>,
        calendar: &Calendar,
    ) -> Self {
        let days_overdue = calendar.days_since(as_of, due_date);
        Self::for_days(fixed_interest, days_overdue)
    }

    /// penalty for a known number of days past due
    pub fn for_days(fixed_interest: Money, days_overdue: u32) -> Self {
        let divisor = Decimal::from(PENALTY_DIVISOR_DAYS);
        let daily_rate = fixed_interest / divisor;

        // scale before dividing so the rate's rounding is not multiplied up
        let amount = if days_overdue > 0 {
            fixed_interest.times(days_overdue) / divisor
        } else {
            Money::ZERO
        };

        Self {
            daily_rate,
            days_overdue,
            amount,
        }
    }

    pub fn is_overdue(&self) -> bool {
        self.days_overdue > 0
    }
}
