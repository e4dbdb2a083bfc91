use hourglass_rs::SafeTimeProvider;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::calendar::Calendar;
use crate::config::LedgerConfig;
use crate::errors::{LedgerError, Result};
use crate::loan::{Loan, LoanPatch, NewLoan, NewPayment, Payment};
use crate::types::{LoanId, PaymentId};

use super::events::LedgerEvent;
use super::{validate_book, validate_new_loan, validate_patch, validate_payment_amount, LoanStore};

/// loan store held in memory, newest loan first
///
/// Every mutation replaces a whole loan record, so readers never see a
/// half-applied change.
#[derive(Debug, Default)]
pub struct InMemoryLoanStore {
    config: LedgerConfig,
    calendar: Calendar,
    loans: Vec<Loan>,
    events: Vec<LedgerEvent>,
}

impl InMemoryLoanStore {
    pub fn new(config: LedgerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            calendar: Calendar::from_config(&config.calendar),
            config,
            loans: Vec::new(),
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// borrow the loans without cloning, newest first
    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }

    /// events recorded since the last `take_events`, oldest first
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// recorded events concerning one loan
    pub fn events_for(&self, loan_id: LoanId) -> impl Iterator<Item = &LedgerEvent> + '_ {
        self.events.iter().filter(move |event| event.loan_id() == loan_id)
    }

    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: LedgerEvent) {
        trace!(loan_id = %event.loan_id(), "ledger event");
        self.events.push(event);
    }

    /// serialize the whole book as a json array of loans
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.loans)?)
    }

    /// restore a book written by `to_json_pretty`
    pub fn from_json(config: LedgerConfig, json: &str) -> Result<Self> {
        let loans: Vec<Loan> = serde_json::from_str(json)?;
        validate_book(&loans)?;

        let mut store = Self::new(config)?;
        debug!(loans = loans.len(), "restored loan book");
        store.loans = loans;
        Ok(store)
    }

    fn position(&self, id: LoanId) -> Result<usize> {
        self.loans.iter().position(|loan| loan.id == id).ok_or_else(|| {
            warn!(loan_id = %id, "loan not found");
            LedgerError::LoanNotFound { id }
        })
    }

    /// replace one loan with an edited copy
    fn replace<F>(&mut self, id: LoanId, edit: F) -> Result<Loan>
    where
        F: FnOnce(&mut Loan) -> Result<()>,
    {
        let index = self.position(id)?;
        let mut updated = self.loans[index].clone();
        edit(&mut updated)?;
        self.loans[index] = updated.clone();
        Ok(updated)
    }
}

impl LoanStore for InMemoryLoanStore {
    fn create_loan(&mut self, new_loan: NewLoan, time_provider: &SafeTimeProvider) -> Result<Loan> {
        validate_new_loan(&new_loan)?;

        let now = time_provider.now();
        let loan = Loan {
            id: Uuid::new_v4(),
            due_date: self.calendar.add_days(new_loan.start_date, self.config.term_days),
            borrower: new_loan.borrower,
            principal: new_loan.principal,
            fixed_interest: new_loan.fixed_interest,
            start_date: new_loan.start_date,
            notes: new_loan.notes,
            payments: Vec::new(),
            closed_at: None,
            created_at: now,
            updated_at: now,
        };

        debug!(
            loan_id = %loan.id,
            principal = %loan.principal,
            fixed_interest = %loan.fixed_interest,
            due_date = %loan.due_date,
            "loan created"
        );
        self.emit(LedgerEvent::LoanCreated {
            loan_id: loan.id,
            borrower: loan.borrower.name.clone(),
            principal: loan.principal,
            fixed_interest: loan.fixed_interest,
            due_date: loan.due_date,
            timestamp: now,
        });

        self.loans.insert(0, loan.clone());
        Ok(loan)
    }

    fn get_loan(&self, id: LoanId) -> Result<Loan> {
        let index = self.position(id)?;
        Ok(self.loans[index].clone())
    }

    fn list_loans(&self) -> Vec<Loan> {
        self.loans.clone()
    }

    fn update_loan(&mut self, id: LoanId, patch: LoanPatch, time_provider: &SafeTimeProvider) -> Result<Loan> {
        validate_patch(&patch)?;

        let now = time_provider.now();
        let calendar = self.calendar;
        let term_days = self.config.term_days;
        let mut due_date_recomputed = false;

        let loan = self.replace(id, |loan| {
            if let Some(borrower) = patch.borrower {
                loan.borrower = borrower;
            }
            if let Some(principal) = patch.principal {
                loan.principal = principal;
            }
            if let Some(fixed_interest) = patch.fixed_interest {
                loan.fixed_interest = fixed_interest;
            }
            if let Some(notes) = patch.notes {
                loan.notes = notes;
            }
            if let Some(start_date) = patch.start_date {
                if start_date != loan.start_date {
                    loan.start_date = start_date;
                    loan.due_date = calendar.add_days(start_date, term_days);
                    due_date_recomputed = true;
                }
            }
            loan.updated_at = now;
            Ok(())
        })?;

        debug!(loan_id = %id, due_date_recomputed, "loan updated");
        self.emit(LedgerEvent::LoanUpdated {
            loan_id: id,
            due_date_recomputed,
            timestamp: now,
        });
        Ok(loan)
    }

    fn extend_loan(&mut self, id: LoanId, time_provider: &SafeTimeProvider) -> Result<Loan> {
        let now = time_provider.now();
        let calendar = self.calendar;
        let term_days = self.config.term_days;
        let mut old_due_date = None;

        let loan = self.replace(id, |loan| {
            old_due_date = Some(loan.due_date);
            loan.due_date = calendar.add_days(loan.due_date, term_days);
            loan.updated_at = now;
            Ok(())
        })?;

        let old_due_date = old_due_date.unwrap_or(loan.due_date);
        debug!(loan_id = %id, old_due_date = %old_due_date, new_due_date = %loan.due_date, "loan extended");
        self.emit(LedgerEvent::LoanExtended {
            loan_id: id,
            old_due_date,
            new_due_date: loan.due_date,
            timestamp: now,
        });
        Ok(loan)
    }

    fn close_loan(&mut self, id: LoanId, time_provider: &SafeTimeProvider) -> Result<Loan> {
        let now = time_provider.now();
        let mut newly_closed = false;

        let loan = self.replace(id, |loan| {
            if loan.closed_at.is_none() {
                loan.closed_at = Some(now);
                loan.updated_at = now;
                newly_closed = true;
            }
            Ok(())
        })?;

        if newly_closed {
            debug!(loan_id = %id, "loan closed");
            self.emit(LedgerEvent::LoanClosed {
                loan_id: id,
                timestamp: now,
            });
        } else {
            debug!(loan_id = %id, "loan already closed");
        }
        Ok(loan)
    }

    fn delete_loan(&mut self, id: LoanId, time_provider: &SafeTimeProvider) -> Result<()> {
        let index = self.position(id)?;
        let removed = self.loans.remove(index);

        debug!(loan_id = %id, payments_removed = removed.payments.len(), "loan deleted");
        self.emit(LedgerEvent::LoanDeleted {
            loan_id: id,
            payments_removed: removed.payments.len(),
            timestamp: time_provider.now(),
        });
        Ok(())
    }

    fn add_payment(
        &mut self,
        loan_id: LoanId,
        payment: NewPayment,
        time_provider: &SafeTimeProvider,
    ) -> Result<Payment> {
        validate_payment_amount(payment.amount)?;

        let now = time_provider.now();
        let recorded = Payment {
            id: Uuid::new_v4(),
            loan_id,
            amount: payment.amount,
            date: payment.date.unwrap_or(now),
            notes: payment.notes,
            created_at: now,
        };

        let entry = recorded.clone();
        self.replace(loan_id, |loan| {
            loan.payments.push(entry);
            loan.updated_at = now;
            Ok(())
        })?;

        debug!(
            loan_id = %loan_id,
            payment_id = %recorded.id,
            amount = %recorded.amount,
            "payment recorded"
        );
        self.emit(LedgerEvent::PaymentRecorded {
            loan_id,
            payment_id: recorded.id,
            amount: recorded.amount,
            date: recorded.date,
            timestamp: now,
        });
        Ok(recorded)
    }

    fn delete_payment(
        &mut self,
        loan_id: LoanId,
        payment_id: PaymentId,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        let now = time_provider.now();
        let mut removed_amount = None;

        self.replace(loan_id, |loan| {
            let index = loan
                .payments
                .iter()
                .position(|p| p.id == payment_id)
                .ok_or(LedgerError::PaymentNotFound { loan_id, payment_id })?;
            removed_amount = Some(loan.payments.remove(index).amount);
            loan.updated_at = now;
            Ok(())
        })
        .map_err(|err| {
            if let LedgerError::PaymentNotFound { .. } = &err {
                warn!(loan_id = %loan_id, payment_id = %payment_id, "payment not found");
            }
            err
        })?;

        if let Some(amount) = removed_amount {
            debug!(loan_id = %loan_id, payment_id = %payment_id, amount = %amount, "payment deleted");
            self.emit(LedgerEvent::PaymentDeleted {
                loan_id,
                payment_id,
                amount,
                timestamp: now,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::LoanEngine;
    use crate::decimal::Money;
    use crate::loan::Borrower;
    use crate::types::LoanStatus;
    use chrono::{Duration, TimeZone, Utc};
    use hourglass_rs::TimeSource;

    fn clock() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
        ))
    }

    fn store() -> InMemoryLoanStore {
        InMemoryLoanStore::new(LedgerConfig::default()).unwrap()
    }

    fn new_loan(name: &str, time: &SafeTimeProvider) -> NewLoan {
        NewLoan::new(
            Borrower::new(name).with_phone("90000 00000"),
            Money::from_major(10_000),
            Money::from_major(500),
            time.now(),
        )
    }

    #[test]
    fn test_create_sets_due_date_and_stamps() {
        let time = clock();
        let mut store = store();

        let loan = store.create_loan(new_loan("Asha", &time), &time).unwrap();

        assert_eq!(loan.due_date, time.now() + Duration::days(30));
        assert_eq!(loan.created_at, time.now());
        assert_eq!(loan.updated_at, time.now());
        assert!(loan.payments.is_empty());
        assert!(loan.closed_at.is_none());
        assert_eq!(store.get_loan(loan.id).unwrap(), loan);
        assert!(matches!(store.take_events()[0], LedgerEvent::LoanCreated { .. }));
    }

    #[test]
    fn test_create_rejects_invalid_input() {
        let time = clock();
        let mut store = store();

        let mut bad = new_loan("Asha", &time);
        bad.principal = Money::ZERO;
        assert!(matches!(store.create_loan(bad, &time), Err(LedgerError::InvalidPrincipal { .. })));
        assert!(store.is_empty());
        assert!(store.events().is_empty());
    }

    #[test]
    fn test_list_newest_first() {
        let time = clock();
        let control = time.test_control().unwrap();
        let mut store = store();

        let first = store.create_loan(new_loan("First", &time), &time).unwrap();
        control.advance(Duration::days(1));
        let second = store.create_loan(new_loan("Second", &time), &time).unwrap();

        let ids: Vec<_> = store.list_loans().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn test_update_recomputes_due_only_on_start_change() {
        let time = clock();
        let control = time.test_control().unwrap();
        let mut store = store();
        let loan = store.create_loan(new_loan("Asha", &time), &time).unwrap();
        let extended = store.extend_loan(loan.id, &time).unwrap();

        control.advance(Duration::hours(2));
        let renamed = store
            .update_loan(
                loan.id,
                LoanPatch {
                    borrower: Some(Borrower::new("Asha K")),
                    start_date: Some(loan.start_date),
                    notes: Some(Some("family".to_string())),
                    ..Default::default()
                },
                &time,
            )
            .unwrap();
        // same start date keeps the extended due date
        assert_eq!(renamed.due_date, extended.due_date);
        assert_eq!(renamed.borrower.name, "Asha K");
        assert_eq!(renamed.notes.as_deref(), Some("family"));
        assert_eq!(renamed.updated_at, time.now());

        let new_start = loan.start_date + Duration::days(3);
        let moved = store
            .update_loan(
                loan.id,
                LoanPatch {
                    start_date: Some(new_start),
                    notes: Some(None),
                    ..Default::default()
                },
                &time,
            )
            .unwrap();
        assert_eq!(moved.due_date, new_start + Duration::days(30));
        assert!(moved.notes.is_none());
    }

    #[test]
    fn test_extend_adds_one_term() {
        let time = clock();
        let mut store = store();
        let loan = store.create_loan(new_loan("Asha", &time), &time).unwrap();

        let extended = store.extend_loan(loan.id, &time).unwrap();
        assert_eq!(extended.due_date, loan.due_date + Duration::days(30));

        let events = store.take_events();
        assert!(matches!(
            events.last(),
            Some(LedgerEvent::LoanExtended { old_due_date, .. }) if *old_due_date == loan.due_date
        ));
    }

    #[test]
    fn test_close_is_idempotent() {
        let time = clock();
        let control = time.test_control().unwrap();
        let mut store = store();
        let loan = store.create_loan(new_loan("Asha", &time), &time).unwrap();

        control.advance(Duration::days(3));
        let closed = store.close_loan(loan.id, &time).unwrap();
        let closed_at = closed.closed_at.unwrap();

        control.advance(Duration::days(3));
        let again = store.close_loan(loan.id, &time).unwrap();
        assert_eq!(again.closed_at, Some(closed_at));

        let closes = store
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, LedgerEvent::LoanClosed { .. }))
            .count();
        assert_eq!(closes, 1);
    }

    #[test]
    fn test_payments_append_and_delete() {
        let time = clock();
        let control = time.test_control().unwrap();
        let mut store = store();
        let loan = store.create_loan(new_loan("Asha", &time), &time).unwrap();

        control.advance(Duration::days(5));
        let backdated = loan.start_date + Duration::days(2);
        let first = store
            .add_payment(loan.id, NewPayment::new(Money::from_major(4_000)).on(backdated), &time)
            .unwrap();
        let second = store
            .add_payment(loan.id, NewPayment::new(Money::from_major(1_000)).with_notes("cash"), &time)
            .unwrap();

        assert_eq!(first.date, backdated);
        assert_eq!(first.created_at, time.now());
        assert_eq!(second.date, time.now());

        let stored = store.get_loan(loan.id).unwrap();
        let ids: Vec<_> = stored.payments.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert_eq!(stored.total_paid(), Money::from_major(5_000));

        store.delete_payment(loan.id, first.id, &time).unwrap();
        assert_eq!(store.get_loan(loan.id).unwrap().total_paid(), Money::from_major(1_000));

        let missing = store.delete_payment(loan.id, first.id, &time);
        assert!(matches!(missing, Err(LedgerError::PaymentNotFound { .. })));
    }

    #[test]
    fn test_payment_validation() {
        let time = clock();
        let mut store = store();
        let loan = store.create_loan(new_loan("Asha", &time), &time).unwrap();

        let zero = store.add_payment(loan.id, NewPayment::new(Money::ZERO), &time);
        assert!(matches!(zero, Err(LedgerError::InvalidPaymentAmount { .. })));

        let orphan = store.add_payment(Uuid::new_v4(), NewPayment::new(Money::ONE), &time);
        assert!(matches!(orphan, Err(LedgerError::LoanNotFound { .. })));
    }

    #[test]
    fn test_delete_cascades_payments() {
        let time = clock();
        let mut store = store();
        let loan = store.create_loan(new_loan("Asha", &time), &time).unwrap();
        store.add_payment(loan.id, NewPayment::new(Money::from_major(100)), &time).unwrap();
        store.add_payment(loan.id, NewPayment::new(Money::from_major(200)), &time).unwrap();

        store.delete_loan(loan.id, &time).unwrap();

        assert!(store.is_empty());
        assert!(matches!(store.get_loan(loan.id), Err(LedgerError::LoanNotFound { .. })));
        assert!(matches!(
            store.take_events().last(),
            Some(LedgerEvent::LoanDeleted { payments_removed: 2, .. })
        ));
    }

    #[test]
    fn test_json_round_trip_preserves_engine_view() {
        let time = clock();
        let control = time.test_control().unwrap();
        let mut store = store();
        let loan = store.create_loan(new_loan("Asha", &time), &time).unwrap();
        store.add_payment(loan.id, NewPayment::new(Money::from_major(3_000)), &time).unwrap();
        control.advance(Duration::days(35));

        let json = store.to_json_pretty().unwrap();
        assert!(json.contains("\"fixedInterest\""));

        let restored = InMemoryLoanStore::from_json(LedgerConfig::default(), &json).unwrap();
        let engine = LoanEngine::default();
        let before = engine.assemble(&store.get_loan(loan.id).unwrap(), time.now());
        let after = engine.assemble(&restored.get_loan(loan.id).unwrap(), time.now());

        assert_eq!(before, after);
        assert_eq!(after.status, LoanStatus::PartiallyPaid);
    }

    #[test]
    fn test_from_json_rejects_invalid_loans() {
        let time = clock();
        let mut store = store();
        store.create_loan(new_loan("Asha", &time), &time).unwrap();
        let json = store.to_json_pretty().unwrap().replace("\"10000\"", "\"-10000\"");

        let err = InMemoryLoanStore::from_json(LedgerConfig::default(), &json).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidPrincipal { .. }));
    }

    #[test]
    fn test_from_json_rejects_inconsistent_snapshots() {
        let time = clock();
        let mut store = store();
        let loan = store.create_loan(new_loan("Asha", &time), &time).unwrap();
        store.add_payment(loan.id, NewPayment::new(Money::from_major(700)), &time).unwrap();
        let stored = store.get_loan(loan.id).unwrap();

        let twice = serde_json::to_string(&vec![stored.clone(), stored.clone()]).unwrap();
        let err = InMemoryLoanStore::from_json(LedgerConfig::default(), &twice).unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateLoan { .. }));

        let mut moved = stored.clone();
        moved.id = Uuid::new_v4();
        let foreign = serde_json::to_string(&vec![moved]).unwrap();
        let err = InMemoryLoanStore::from_json(LedgerConfig::default(), &foreign).unwrap_err();
        assert!(matches!(err, LedgerError::PaymentLoanMismatch { .. }));
    }

    #[test]
    fn test_events_filtered_by_loan() {
        let time = clock();
        let mut store = store();
        let asha = store.create_loan(new_loan("Asha", &time), &time).unwrap();
        let bina = store.create_loan(new_loan("Bina", &time), &time).unwrap();
        store.add_payment(asha.id, NewPayment::new(Money::from_major(250)), &time).unwrap();
        store.close_loan(bina.id, &time).unwrap();

        assert_eq!(store.events().len(), 4);
        assert_eq!(store.events_for(asha.id).count(), 2);
        assert!(store
            .events_for(bina.id)
            .all(|e| matches!(e, LedgerEvent::LoanCreated { .. } | LedgerEvent::LoanClosed { .. })));

        store.take_events();
        assert!(store.events().is_empty());
    }

    #[test]
    fn test_engine_sees_implicit_close_without_closed_at() {
        let time = clock();
        let mut store = store();
        let loan = store.create_loan(new_loan("Asha", &time), &time).unwrap();
        store.add_payment(loan.id, NewPayment::new(Money::from_major(10_500)), &time).unwrap();

        let stored = store.get_loan(loan.id).unwrap();
        assert!(stored.closed_at.is_none());
        assert_eq!(LoanEngine::default().assemble(&stored, time.now()).status, LoanStatus::Closed);
    }
}
