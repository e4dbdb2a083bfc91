use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{LoanId, PaymentId};

/// every mutation the ledger performs, in the order it happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerEvent {
    // loan lifecycle
    LoanCreated {
        loan_id: LoanId,
        borrower: String,
        principal: Money,
        fixed_interest: Money,
        due_date: DateTime<Utc>,
        timestamp: DateTime<Utc>,
    },
    LoanUpdated {
        loan_id: LoanId,
        due_date_recomputed: bool,
        timestamp: DateTime<Utc>,
    },
    LoanExtended {
        loan_id: LoanId,
        old_due_date: DateTime<Utc>,
        new_due_date: DateTime<Utc>,
        timestamp: DateTime<Utc>,
    },
    LoanClosed {
        loan_id: LoanId,
        timestamp: DateTime<Utc>,
    },
    LoanDeleted {
        loan_id: LoanId,
        payments_removed: usize,
        timestamp: DateTime<Utc>,
    },

    // payments
    PaymentRecorded {
        loan_id: LoanId,
        payment_id: PaymentId,
        amount: Money,
        date: DateTime<Utc>,
        timestamp: DateTime<Utc>,
    },
    PaymentDeleted {
        loan_id: LoanId,
        payment_id: PaymentId,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
}

impl LedgerEvent {
    /// the loan this event concerns
    pub fn loan_id(&self) -> LoanId {
        match self {
            LedgerEvent::LoanCreated { loan_id, .. }
            | LedgerEvent::LoanUpdated { loan_id, .. }
            | LedgerEvent::LoanExtended { loan_id, .. }
            | LedgerEvent::LoanClosed { loan_id, .. }
            | LedgerEvent::LoanDeleted { loan_id, .. }
            | LedgerEvent::PaymentRecorded { loan_id, .. }
            | LedgerEvent::PaymentDeleted { loan_id, .. } => *loan_id,
        }
    }
}
