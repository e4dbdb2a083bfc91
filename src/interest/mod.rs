pub mod penalty;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::Calendar;
use crate::decimal::Money;
use crate::loan::Loan;

pub use penalty::{OverduePenalty, PENALTY_DIVISOR_DAYS};

/// terms the interest depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterestTerms {
    pub principal: Money,
    pub fixed_interest: Money,
    pub start_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

impl From<&Loan> for InterestTerms {
    fn from(loan: &Loan) -> Self {
        Self {
            principal: loan.principal,
            fixed_interest: loan.fixed_interest,
            start_date: loan.start_date,
            due_date: loan.due_date,
        }
    }
}

/// interest and payable figures for one loan at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestBreakdown {
    /// the fixed fee
    pub base_interest: Money,
    pub daily_interest_rate: Money,
    pub days_overdue: u32,
    /// penalty accrued past the due date
    pub extra_interest: Money,
    pub total_interest: Money,
    pub total_payable: Money,
}

/// simple, fixed-fee interest with a linear daily penalty after the due date
#[derive(Debug, Clone, Copy, Default)]
pub struct InterestCalculator {
    calendar: Calendar,
}

impl InterestCalculator {
    pub fn new(calendar: Calendar) -> Self {
        Self { calendar }
    }

    pub fn calculate(&self, terms: &InterestTerms, as_of: DateTime<Utc>) -> InterestBreakdown {
        let penalty = OverduePenalty::assess(terms.fixed_interest, terms.due_date, as_of, &self.calendar);

        let total_interest = terms.fixed_interest + penalty.amount;

        InterestBreakdown {
            base_interest: terms.fixed_interest,
            daily_interest_rate: penalty.daily_rate,
            days_overdue: penalty.days_overdue,
            extra_interest: penalty.amount,
            total_interest,
            total_payable: terms.principal + total_interest,
        }
    }
}
