use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::calculation::{LoanCalculation, LoanEngine};
use crate::decimal::Money;
use crate::loan::Loan;
use crate::types::LoanStatus;

/// portfolio-wide totals, re-derivable from the loan collection at any instant
///
/// The counts overlap on purpose: a partially-paid loan past its due date
/// counts as both active and overdue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_money_lent: Money,
    pub total_interest_expected: Money,
    /// interest actually collected on closed loans
    pub total_interest_earned: Money,
    /// still to be collected on open loans
    pub total_pending: Money,
    pub active_loans: u32,
    pub overdue_loans: u32,
    pub closed_loans: u32,
    pub total_loans: u32,
}

impl DashboardSummary {
    /// fold one assembled loan into the totals
    pub fn include(&mut self, calc: &LoanCalculation) {
        self.total_loans += 1;
        self.total_money_lent += calc.loan.principal;
        self.total_interest_expected += calc.total_interest;

        if calc.is_closed() {
            self.closed_loans += 1;
            self.total_interest_earned += calc.interest_collected();
            return;
        }

        self.total_pending += calc.remaining_balance;

        if needs_attention(calc) {
            self.overdue_loans += 1;
        }

        if matches!(
            calc.status,
            LoanStatus::Active | LoanStatus::DueToday | LoanStatus::PartiallyPaid
        ) {
            self.active_loans += 1;
        }
    }

    /// summary over already-assembled loans
    pub fn from_calculations<'a, I>(calculations: I) -> Self
    where
        I: IntoIterator<Item = &'a LoanCalculation>,
    {
        let mut summary = Self::default();
        for calc in calculations {
            summary.include(calc);
        }
        summary
    }
}

/// overdue, or partially paid and past the due date
fn needs_attention(calc: &LoanCalculation) -> bool {
    match calc.status {
        LoanStatus::Overdue => true,
        LoanStatus::PartiallyPaid => calc.days_overdue > 0,
        _ => false,
    }
}

impl LoanEngine {
    /// assemble every loan at one instant and fold the results
    pub fn aggregate(&self, loans: &[Loan], as_of: DateTime<Utc>) -> DashboardSummary {
        let mut summary = DashboardSummary::default();
        for loan in loans {
            let calc = self.assemble(loan, as_of);
            trace!(loan_id = %loan.id, status = %calc.status, "dashboard fold");
            summary.include(&calc);
        }
        summary
    }

    /// aggregate against the provider's current instant, read once
    pub fn aggregate_at(&self, loans: &[Loan], time_provider: &SafeTimeProvider) -> DashboardSummary {
        self.aggregate(loans, time_provider.now())
    }
}

/// aggregate with the default (UTC) calendar
pub fn aggregate(loans: &[Loan], as_of: DateTime<Utc>) -> DashboardSummary {
    LoanEngine::default().aggregate(loans, as_of)
}
