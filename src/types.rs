use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for a payment
pub type PaymentId = Uuid;

/// loan status, derived fresh on every read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoanStatus {
    /// before the due date, nothing paid yet
    Active,
    /// due date is today
    DueToday,
    /// past the due date, nothing paid yet
    Overdue,
    /// something paid, balance still owed
    PartiallyPaid,
    /// closed manually or paid in full
    Closed,
}

impl LoanStatus {
    /// short badge label
    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Active => "Active",
            LoanStatus::DueToday => "Due Today",
            LoanStatus::Overdue => "Overdue",
            LoanStatus::PartiallyPaid => "Partial",
            LoanStatus::Closed => "Closed",
        }
    }

    /// kebab-case identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "active",
            LoanStatus::DueToday => "due-today",
            LoanStatus::Overdue => "overdue",
            LoanStatus::PartiallyPaid => "partially-paid",
            LoanStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// kind of a timeline entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimelineEventKind {
    LoanCreated,
    DueDate,
    Payment,
    Overdue,
    Closed,
}
