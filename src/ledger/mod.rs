pub mod events;
pub mod memory;

use std::collections::HashSet;

use hourglass_rs::SafeTimeProvider;

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::loan::{Borrower, Loan, LoanPatch, NewLoan, NewPayment, Payment};
use crate::types::{LoanId, PaymentId};

pub use events::LedgerEvent;
pub use memory::InMemoryLoanStore;

/// read/write contract for loans and their payments
///
/// The calculation engine never touches storage: whatever implements this
/// hands plain `Loan` values to it. Mutations take the clock so
/// created/updated/closed stamps are testable.
pub trait LoanStore {
    /// create a loan with no payments; due date is start date plus one term
    fn create_loan(&mut self, new_loan: NewLoan, time_provider: &SafeTimeProvider) -> Result<Loan>;

    fn get_loan(&self, id: LoanId) -> Result<Loan>;

    /// every loan, newest first
    fn list_loans(&self) -> Vec<Loan>;

    /// apply a partial patch; the due date moves only if the start date changes
    fn update_loan(&mut self, id: LoanId, patch: LoanPatch, time_provider: &SafeTimeProvider) -> Result<Loan>;

    /// push the due date out by one term
    fn extend_loan(&mut self, id: LoanId, time_provider: &SafeTimeProvider) -> Result<Loan>;

    /// mark closed; an already-closed loan keeps its original close time
    fn close_loan(&mut self, id: LoanId, time_provider: &SafeTimeProvider) -> Result<Loan>;

    /// remove a loan and all of its payments
    fn delete_loan(&mut self, id: LoanId, time_provider: &SafeTimeProvider) -> Result<()>;

    fn add_payment(
        &mut self,
        loan_id: LoanId,
        payment: NewPayment,
        time_provider: &SafeTimeProvider,
    ) -> Result<Payment>;

    fn delete_payment(
        &mut self,
        loan_id: LoanId,
        payment_id: PaymentId,
        time_provider: &SafeTimeProvider,
    ) -> Result<()>;
}

pub(crate) fn validate_borrower(borrower: &Borrower) -> Result<()> {
    if borrower.name.trim().is_empty() {
        return Err(LedgerError::EmptyBorrowerName);
    }
    Ok(())
}

pub(crate) fn validate_principal(amount: Money) -> Result<()> {
    if !amount.is_positive() {
        return Err(LedgerError::InvalidPrincipal { amount });
    }
    Ok(())
}

pub(crate) fn validate_interest(amount: Money) -> Result<()> {
    if amount.is_negative() {
        return Err(LedgerError::InvalidInterest { amount });
    }
    Ok(())
}

pub(crate) fn validate_payment_amount(amount: Money) -> Result<()> {
    if !amount.is_positive() {
        return Err(LedgerError::InvalidPaymentAmount { amount });
    }
    Ok(())
}

pub(crate) fn validate_new_loan(new_loan: &NewLoan) -> Result<()> {
    validate_borrower(&new_loan.borrower)?;
    validate_principal(new_loan.principal)?;
    validate_interest(new_loan.fixed_interest)
}

pub(crate) fn validate_patch(patch: &LoanPatch) -> Result<()> {
    if let Some(borrower) = &patch.borrower {
        validate_borrower(borrower)?;
    }
    if let Some(principal) = patch.principal {
        validate_principal(principal)?;
    }
    if let Some(fixed_interest) = patch.fixed_interest {
        validate_interest(fixed_interest)?;
    }
    Ok(())
}

/// every loan handed to the engine must pass this
///
/// Payments must carry a positive amount, a unique id and the id of the
/// loan that holds them.
pub fn validate_loan(loan: &Loan) -> Result<()> {
    validate_borrower(&loan.borrower)?;
    validate_principal(loan.principal)?;
    validate_interest(loan.fixed_interest)?;

    let mut seen = HashSet::with_capacity(loan.payments.len());
    for payment in &loan.payments {
        validate_payment_amount(payment.amount)?;
        if payment.loan_id != loan.id {
            return Err(LedgerError::PaymentLoanMismatch {
                loan_id: loan.id,
                payment_id: payment.id,
                payment_loan_id: payment.loan_id,
            });
        }
        if !seen.insert(payment.id) {
            return Err(LedgerError::DuplicatePayment {
                loan_id: loan.id,
                payment_id: payment.id,
            });
        }
    }
    Ok(())
}

/// validate a whole book: every loan, and no loan id twice
pub fn validate_book(loans: &[Loan]) -> Result<()> {
    let mut seen = HashSet::with_capacity(loans.len());
    for loan in loans {
        validate_loan(loan)?;
        if !seen.insert(loan.id) {
            return Err(LedgerError::DuplicateLoan { id: loan.id });
        }
    }
    Ok(())
}
