/// quick start - lend money, record a payment, read the figures
use loan_ledger_rs::{
    format_currency, Borrower, InMemoryLoanStore, LedgerConfig, LoanEngine, LoanStore, Money,
    NewLoan, NewPayment, SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);
    let mut store = InMemoryLoanStore::new(LedgerConfig::default())?;

    let loan = store.create_loan(
        NewLoan::new(
            Borrower::new("Asha").with_phone("98765 43210"),
            Money::from_major(10_000),
            Money::from_major(500),
            time.now(),
        ),
        &time,
    )?;
    store.add_payment(loan.id, NewPayment::new(Money::from_major(2_500)), &time)?;

    let calc = LoanEngine::default().assemble(&store.get_loan(loan.id)?, time.now());

    println!("status: {}", calc.status.label());
    println!("total payable: {}", format_currency(calc.total_payable));
    println!("paid so far: {}", format_currency(calc.total_paid));
    println!("remaining: {}", format_currency(calc.remaining_balance));

    Ok(())
}
