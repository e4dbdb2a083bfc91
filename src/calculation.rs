use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::calendar::Calendar;
use crate::config::LedgerConfig;
use crate::decimal::Money;
use crate::interest::{InterestCalculator, InterestTerms};
use crate::loan::Loan;
use crate::status::{classify, StatusInputs};
use crate::types::LoanStatus;

/// a loan together with every figure derived from it at one instant
///
/// Never persisted. Recompute it whenever it is needed: status and
/// interest move with the calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanCalculation {
    pub loan: Loan,
    pub status: LoanStatus,
    pub days_active: u32,
    pub days_overdue: u32,
    pub base_interest: Money,
    pub extra_interest: Money,
    pub total_interest: Money,
    pub total_payable: Money,
    pub total_paid: Money,
    pub remaining_balance: Money,
    pub daily_interest_rate: Money,
}

impl LoanCalculation {
    pub fn is_closed(&self) -> bool {
        self.status == LoanStatus::Closed
    }

    /// amount collected beyond the principal, capped at the interest owed
    pub fn interest_collected(&self) -> Money {
        (self.total_paid - self.loan.principal).clamp_between(Money::ZERO, self.total_interest)
    }
}

/// entry point for every derived view of loans
///
/// Stateless apart from the calendar, so one engine can serve any number
/// of render passes. Each call takes the instant explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoanEngine {
    calendar: Calendar,
}

impl LoanEngine {
    pub fn new(calendar: Calendar) -> Self {
        Self { calendar }
    }

    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::new(Calendar::from_config(&config.calendar))
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    /// derive status, interest and balances for one loan
    pub fn assemble(&self, loan: &Loan, as_of: DateTime<Utc>) -> LoanCalculation {
        let terms = InterestTerms::from(loan);
        let days_active = self.calendar.days_since(as_of, terms.start_date);

        let interest = InterestCalculator::new(self.calendar).calculate(&terms, as_of);

        let total_paid = loan.total_paid();
        // overpayment is absorbed, never reported as credit
        let remaining_balance = (interest.total_payable - total_paid).clamp_non_negative();

        let status = classify(
            &StatusInputs {
                closed_at: loan.closed_at,
                total_paid,
                total_payable: interest.total_payable,
                due_date: loan.due_date,
            },
            as_of,
            &self.calendar,
        );

        LoanCalculation {
            loan: loan.clone(),
            status,
            days_active,
            days_overdue: interest.days_overdue,
            base_interest: interest.base_interest,
            extra_interest: interest.extra_interest,
            total_interest: interest.total_interest,
            total_payable: interest.total_payable,
            total_paid,
            remaining_balance,
            daily_interest_rate: interest.daily_interest_rate,
        }
    }

    /// assemble against the provider's current instant
    pub fn assemble_at(&self, loan: &Loan, time_provider: &SafeTimeProvider) -> LoanCalculation {
        self.assemble(loan, time_provider.now())
    }

    /// assemble every loan against the same instant
    pub fn assemble_all(&self, loans: &[Loan], as_of: DateTime<Utc>) -> Vec<LoanCalculation> {
        loans.iter().map(|loan| self.assemble(loan, as_of)).collect()
    }
}

/// assemble with the default (UTC) calendar
pub fn assemble(loan: &Loan, as_of: DateTime<Utc>) -> LoanCalculation {
    LoanEngine::default().assemble(loan, as_of)
}
