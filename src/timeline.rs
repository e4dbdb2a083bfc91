use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::calculation::LoanEngine;
use crate::decimal::Money;
use crate::format::format_currency;
use crate::loan::Loan;
pub use crate::types::TimelineEventKind;

/// one entry in a loan's history, for display only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TimelineEventKind,
    pub date: DateTime<Utc>,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
    pub is_completed: bool,
}

impl LoanEngine {
    /// a loan's lifecycle, most recent first
    ///
    /// Events on the same instant keep the order they were generated in:
    /// created, due date, payments in recorded order, overdue, closed.
    pub fn timeline(&self, loan: &Loan, as_of: DateTime<Utc>) -> Vec<TimelineEvent> {
        let calc = self.assemble(loan, as_of);
        let calendar = self.calendar();

        let mut events = Vec::with_capacity(loan.payments.len() + 4);

        events.push(TimelineEvent {
            id: format!("{}-created", loan.id),
            kind: TimelineEventKind::LoanCreated,
            date: loan.start_date,
            title: "Loan Given".to_string(),
            description: format!(
                "Lent {} to {}",
                format_currency(loan.principal),
                loan.borrower.name
            ),
            amount: Some(loan.principal),
            is_completed: true,
        });

        let due_amount = loan.principal + loan.fixed_interest;
        let due_passed = calendar.day_floor(loan.due_date) <= calendar.day_floor(as_of);
        events.push(TimelineEvent {
            id: format!("{}-due", loan.id),
            kind: TimelineEventKind::DueDate,
            date: loan.due_date,
            title: if due_passed { "Due Date Passed" } else { "Due Date" }.to_string(),
            description: format!("Payment of {} due", format_currency(due_amount)),
            amount: Some(due_amount),
            is_completed: due_passed,
        });

        for payment in &loan.payments {
            let description = match &payment.notes {
                Some(notes) if !notes.is_empty() => notes.clone(),
                _ => format!("Received {}", format_currency(payment.amount)),
            };
            events.push(TimelineEvent {
                id: payment.id.to_string(),
                kind: TimelineEventKind::Payment,
                date: payment.date,
                title: "Payment Received".to_string(),
                description,
                amount: Some(payment.amount),
                is_completed: true,
            });
        }

        if calc.days_overdue > 0 && !calc.is_closed() {
            // dated at the due date, when the penalty started
            events.push(TimelineEvent {
                id: format!("{}-overdue", loan.id),
                kind: TimelineEventKind::Overdue,
                date: loan.due_date,
                title: "Loan Overdue".to_string(),
                description: format!(
                    "{} days overdue. Extra interest: {}",
                    calc.days_overdue,
                    format_currency(calc.extra_interest)
                ),
                amount: Some(calc.extra_interest),
                is_completed: true,
            });
        }

        if loan.closed_at.is_some() || calc.is_closed() {
            events.push(TimelineEvent {
                id: format!("{}-closed", loan.id),
                kind: TimelineEventKind::Closed,
                date: loan.closed_at.unwrap_or(as_of),
                title: "Loan Closed".to_string(),
                description: format!("Total collected: {}", format_currency(calc.total_paid)),
                amount: Some(calc.total_paid),
                is_completed: true,
            });
        }

        // stable, so ties keep generation order
        events.sort_by(|a, b| b.date.cmp(&a.date));
        events
    }

    /// timeline against the provider's current instant, read once
    pub fn timeline_at(&self, loan: &Loan, time_provider: &SafeTimeProvider) -> Vec<TimelineEvent> {
        self.timeline(loan, time_provider.now())
    }
}

/// timeline with the default (UTC) calendar
pub fn timeline(loan: &Loan, as_of: DateTime<Utc>) -> Vec<TimelineEvent> {
    LoanEngine::default().timeline(loan, as_of)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::fixtures::*;
    use chrono::Duration;

    fn kinds(events: &[TimelineEvent]) -> Vec<TimelineEventKind> {
        events.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_fresh_loan() {
        let loan = standard_loan();
        let events = timeline(&loan, day(5));

        assert_eq!(kinds(&events), vec![TimelineEventKind::DueDate, TimelineEventKind::LoanCreated]);

        let due = &events[0];
        assert_eq!(due.title, "Due Date");
        assert!(!due.is_completed);
        assert_eq!(due.amount, Some(Money::from_major(10_500)));
        assert_eq!(due.description, "Payment of ₹10,500 due");

        let created = &events[1];
        assert!(created.is_completed);
        assert_eq!(created.id, format!("{}-created", loan.id));
        assert_eq!(created.description, "Lent ₹10,000 to Asha");
    }

    #[test]
    fn test_due_date_passed_on_due_day() {
        let loan = standard_loan();
        let events = timeline(&loan, day(30) - Duration::hours(9));
        let due = events.iter().find(|e| e.kind == TimelineEventKind::DueDate).unwrap();
        assert!(due.is_completed);
        assert_eq!(due.title, "Due Date Passed");
    }

    #[test]
    fn test_overdue_event_dated_at_due_date() {
        let loan = standard_loan();
        let events = timeline(&loan, day(40));

        let overdue = events.iter().find(|e| e.kind == TimelineEventKind::Overdue).unwrap();
        assert_eq!(overdue.date, loan.due_date);
        assert_eq!(overdue.amount.unwrap().round_dp(2), Money::from_str_exact("166.67").unwrap());
        assert_eq!(overdue.description, "10 days overdue. Extra interest: ₹166.67");
        assert!(events.iter().all(|e| e.kind != TimelineEventKind::Closed));
    }

    #[test]
    fn test_same_instant_keeps_generation_order() {
        let loan = standard_loan();
        let events = timeline(&loan, day(40));
        // due date and overdue share an instant; due date was generated first
        assert_eq!(
            kinds(&events),
            vec![TimelineEventKind::DueDate, TimelineEventKind::Overdue, TimelineEventKind::LoanCreated]
        );
    }

    #[test]
    fn test_payments_and_implicit_close() {
        let mut loan = standard_loan();
        pay(&mut loan, Money::from_major(5_000), day(8));
        pay(&mut loan, Money::from_major(5_500), day(20));
        loan.payments[0].notes = Some("first half, UPI".to_string());

        let as_of = day(22);
        let events = timeline(&loan, as_of);

        assert_eq!(
            kinds(&events),
            vec![
                TimelineEventKind::DueDate,
                TimelineEventKind::Closed,
                TimelineEventKind::Payment,
                TimelineEventKind::Payment,
                TimelineEventKind::LoanCreated,
            ]
        );

        let closed = &events[1];
        assert_eq!(closed.date, as_of);
        assert_eq!(closed.amount, Some(Money::from_major(10_500)));
        assert_eq!(closed.description, "Total collected: ₹10,500");

        assert_eq!(events[2].description, "Received ₹5,500");
        assert_eq!(events[3].description, "first half, UPI");
        assert_eq!(events[3].id, loan.payments[0].id.to_string());
    }

    #[test]
    fn test_manual_close_uses_closed_at_and_hides_overdue() {
        let mut loan = standard_loan();
        loan.closed_at = Some(day(45));
        let events = timeline(&loan, day(60));

        let closed = events.iter().find(|e| e.kind == TimelineEventKind::Closed).unwrap();
        assert_eq!(closed.date, day(45));
        assert_eq!(closed.amount, Some(Money::ZERO));
        assert!(events.iter().all(|e| e.kind != TimelineEventKind::Overdue));
        assert_eq!(events[0].kind, TimelineEventKind::Closed);
    }

    #[test]
    fn test_serializes_kind_as_type() {
        let events = timeline(&standard_loan(), day(1));
        let json = serde_json::to_value(&events[0]).unwrap();
        assert_eq!(json["type"], "due-date");
        assert_eq!(json["isCompleted"], false);
    }
}
