use thiserror::Error;

use crate::decimal::Money;
use crate::types::{LoanId, PaymentId};

/// errors raised by the ledger before data reaches the calculation engine
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid principal: {amount} (must be greater than zero)")]
    InvalidPrincipal {
        amount: Money,
    },

    #[error("invalid fixed interest: {amount} (must not be negative)")]
    InvalidInterest {
        amount: Money,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("borrower name must not be empty")]
    EmptyBorrowerName,

    #[error("loan not found: {id}")]
    LoanNotFound {
        id: LoanId,
    },

    #[error("payment {payment_id} not found on loan {loan_id}")]
    PaymentNotFound {
        loan_id: LoanId,
        payment_id: PaymentId,
    },

    #[error("duplicate loan id: {id}")]
    DuplicateLoan {
        id: LoanId,
    },

    #[error("duplicate payment {payment_id} on loan {loan_id}")]
    DuplicatePayment {
        loan_id: LoanId,
        payment_id: PaymentId,
    },

    #[error("payment {payment_id} belongs to loan {payment_loan_id}, not {loan_id}")]
    PaymentLoanMismatch {
        loan_id: LoanId,
        payment_id: PaymentId,
        payment_loan_id: LoanId,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
