use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculation::{LoanCalculation, LoanEngine};
use crate::loan::Loan;
use crate::types::LoanStatus;

/// status filter for the loan list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoanFilter {
    #[default]
    All,
    /// active or due today
    Active,
    Overdue,
    Closed,
    /// partially paid
    Partial,
}

impl LoanFilter {
    pub fn matches(&self, status: LoanStatus) -> bool {
        match self {
            LoanFilter::All => true,
            LoanFilter::Active => matches!(status, LoanStatus::Active | LoanStatus::DueToday),
            LoanFilter::Overdue => status == LoanStatus::Overdue,
            LoanFilter::Closed => status == LoanStatus::Closed,
            LoanFilter::Partial => status == LoanStatus::PartiallyPaid,
        }
    }
}

/// sort order for the loan list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoanSort {
    #[default]
    Newest,
    Oldest,
    AmountHigh,
    AmountLow,
    DueSoon,
}

/// rank used to float loans needing attention to the top
fn attention_rank(status: LoanStatus) -> u8 {
    match status {
        LoanStatus::DueToday => 0,
        LoanStatus::Overdue => 1,
        LoanStatus::Active => 2,
        LoanStatus::PartiallyPaid => 3,
        LoanStatus::Closed => 4,
    }
}

/// search, filter and order a loan list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanQuery {
    pub search: String,
    pub filter: LoanFilter,
    pub sort: LoanSort,
}

impl LoanQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    pub fn filter(mut self, filter: LoanFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn sort(mut self, sort: LoanSort) -> Self {
        self.sort = sort;
        self
    }

    /// name and notes match case-insensitively, phone as typed
    pub fn matches_search(&self, loan: &Loan) -> bool {
        if self.search.is_empty() {
            return true;
        }

        let needle = self.search.to_lowercase();
        let name_hit = loan.borrower.name.to_lowercase().contains(&needle);
        let phone_hit = loan
            .borrower
            .phone
            .as_deref()
            .is_some_and(|phone| phone.contains(self.search.as_str()));
        let notes_hit = loan
            .notes
            .as_deref()
            .is_some_and(|notes| notes.to_lowercase().contains(&needle));

        name_hit || phone_hit || notes_hit
    }

    /// assemble, filter, sort, then prioritise by status
    pub fn run(&self, engine: &LoanEngine, loans: &[Loan], as_of: DateTime<Utc>) -> Vec<LoanCalculation> {
        let mut rows: Vec<LoanCalculation> = loans
            .iter()
            .filter(|loan| self.matches_search(loan))
            .map(|loan| engine.assemble(loan, as_of))
            .filter(|calc| self.filter.matches(calc.status))
            .collect();

        match self.sort {
            LoanSort::Newest => rows.sort_by(|a, b| b.loan.created_at.cmp(&a.loan.created_at)),
            LoanSort::Oldest => rows.sort_by(|a, b| a.loan.created_at.cmp(&b.loan.created_at)),
            LoanSort::AmountHigh => rows.sort_by(|a, b| b.loan.principal.cmp(&a.loan.principal)),
            LoanSort::AmountLow => rows.sort_by(|a, b| a.loan.principal.cmp(&b.loan.principal)),
            LoanSort::DueSoon => rows.sort_by(|a, b| a.loan.due_date.cmp(&b.loan.due_date)),
        }

        // stable, so the chosen order survives within each status
        rows.sort_by_key(|calc| attention_rank(calc.status));
        rows
    }
}
