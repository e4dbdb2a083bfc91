/// time control - watch one loan move through its statuses
use chrono::{Duration, TimeZone, Utc};
use loan_ledger_rs::{
    format_currency, format_date, Borrower, InMemoryLoanStore, LedgerConfig, LoanEngine, LoanStore,
    Money, NewLoan, NewPayment, SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== time control ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
    ));
    let controller = time.test_control().unwrap();
    let engine = LoanEngine::default();
    let mut store = InMemoryLoanStore::new(LedgerConfig::default())?;

    let loan = store.create_loan(
        NewLoan::new(Borrower::new("Asha"), Money::from_major(10_000), Money::from_major(500), time.now()),
        &time,
    )?;

    for (days, label) in [(10, "day 10"), (20, "due date"), (10, "10 days late")] {
        controller.advance(Duration::days(days));
        let calc = engine.assemble_at(&store.get_loan(loan.id)?, &time);
        println!(
            "{:<13} {:<10} extra {:>8}  payable {:>10}",
            label,
            calc.status.label(),
            format_currency(calc.extra_interest),
            format_currency(calc.total_payable),
        );
    }

    let owed = engine.assemble_at(&store.get_loan(loan.id)?, &time).remaining_balance;
    store.add_payment(loan.id, NewPayment::new(owed).with_notes("settled in cash"), &time)?;

    println!("\ntimeline:");
    for event in engine.timeline_at(&store.get_loan(loan.id)?, &time) {
        println!(
            "  {}  {:<16} {}",
            format_date(event.date, engine.calendar()),
            event.title,
            event.description
        );
    }

    Ok(())
}
