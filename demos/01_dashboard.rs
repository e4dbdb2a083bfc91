/// dashboard - portfolio totals and a loan list ordered by attention
use chrono::{Duration, TimeZone, Utc};
use loan_ledger_rs::{
    format_currency, Borrower, InMemoryLoanStore, LedgerConfig, LoanEngine, LoanFilter, LoanQuery,
    LoanSort, LoanStore, Money, NewLoan, NewPayment, SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== dashboard ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
    ));
    let config = LedgerConfig::india();
    let engine = LoanEngine::from_config(&config);
    let mut store = InMemoryLoanStore::new(config)?;

    let today = time.now();
    let lend = |name: &str, principal: i64, fee: i64, days_ago: i64| {
        NewLoan::new(
            Borrower::new(name),
            Money::from_major(principal),
            Money::from_major(fee),
            today - Duration::days(days_ago),
        )
    };

    store.create_loan(lend("Kiran", 8_000, 400, 45), &time)?;
    store.create_loan(lend("Meera", 3_000, 150, 30), &time)?;
    store.create_loan(lend("Dev", 20_000, 1_000, 5), &time)?;

    let sunil = store.create_loan(lend("Sunil", 5_000, 250, 40), &time)?;
    store.add_payment(sunil.id, NewPayment::new(Money::from_major(2_000)).on(today - Duration::days(20)), &time)?;

    let lata = store.create_loan(lend("Lata", 1_000, 50, 25), &time)?;
    store.add_payment(lata.id, NewPayment::new(Money::from_major(1_050)), &time)?;

    let summary = engine.aggregate(store.loans(), today);
    println!("lent:              {}", format_currency(summary.total_money_lent));
    println!("interest expected: {}", format_currency(summary.total_interest_expected));
    println!("interest earned:   {}", format_currency(summary.total_interest_earned));
    println!("pending:           {}", format_currency(summary.total_pending));
    println!(
        "loans: {} total, {} active, {} overdue, {} closed\n",
        summary.total_loans, summary.active_loans, summary.overdue_loans, summary.closed_loans
    );

    let rows = LoanQuery::new()
        .filter(LoanFilter::All)
        .sort(LoanSort::AmountHigh)
        .run(&engine, store.loans(), today);

    for row in rows {
        println!(
            "{:<8} {:<10} payable {:>10}  remaining {:>10}",
            row.loan.borrower.name,
            row.status.label(),
            format_currency(row.total_payable),
            format_currency(row.remaining_balance),
        );
    }

    Ok(())
}
