use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::decimal::Money;
use crate::types::{LoanId, PaymentId};

/// person the money was lent to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borrower {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Borrower {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// a repayment recorded against a loan; immutable once created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub loan_id: LoanId,
    pub amount: Money,
    /// when the money changed hands, may be backdated
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// a loan record as the ledger persists it
///
/// `due_date` is ground truth: it is set once at creation and only moved
/// by an explicit extension, never re-derived from `start_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: LoanId,
    pub borrower: Borrower,
    pub principal: Money,
    /// flat fee owed for the first term
    pub fixed_interest: Money,
    pub start_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Loan {
    /// sum of all recorded payments
    pub fn total_paid(&self) -> Money {
        self.payments.iter().map(|p| p.amount).sum()
    }

    pub fn is_manually_closed(&self) -> bool {
        self.closed_at.is_some()
    }
}

/// input for creating a loan; the ledger assigns id, due date and timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLoan {
    pub borrower: Borrower,
    pub principal: Money,
    pub fixed_interest: Money,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewLoan {
    pub fn new(
        borrower: Borrower,
        principal: Money,
        fixed_interest: Money,
        start_date: DateTime<Utc>,
    ) -> Self {
        Self {
            borrower,
            principal,
            fixed_interest,
            start_date,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// input for recording a payment; `date` defaults to the current instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPayment {
    pub amount: Money,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewPayment {
    pub fn new(amount: Money) -> Self {
        Self {
            amount,
            date: None,
            notes: None,
        }
    }

    pub fn on(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// partial update of a loan; `None` leaves a field untouched
///
/// `notes: Some(None)` clears the notes. In JSON an absent `notes` key
/// leaves them alone and `"notes": null` clears them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanPatch {
    pub borrower: Option<Borrower>,
    pub principal: Option<Money>,
    pub fixed_interest: Option<Money>,
    pub start_date: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "present_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<Option<String>>,
}

/// a key that is present, even as `null`, becomes `Some`
fn present_field<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl LoanPatch {
    pub fn is_empty(&self) -> bool {
        self.borrower.is_none()
            && self.principal.is_none()
            && self.fixed_interest.is_none()
            && self.start_date.is_none()
            && self.notes.is_none()
    }
}
