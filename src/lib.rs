pub mod calculation;
pub mod calendar;
pub mod config;
pub mod dashboard;
pub mod decimal;
pub mod errors;
pub mod format;
pub mod interest;
pub mod ledger;
pub mod loan;
pub mod query;
pub mod status;
pub mod timeline;
pub mod types;

// re-export key types
pub use calculation::{assemble, LoanCalculation, LoanEngine};
pub use calendar::Calendar;
pub use config::{CalendarConfig, LedgerConfig};
pub use dashboard::{aggregate, DashboardSummary};
pub use decimal::Money;
pub use errors::{LedgerError, Result};
pub use format::{format_currency, format_date, format_date_relative};
pub use interest::{InterestBreakdown, InterestCalculator, InterestTerms, OverduePenalty};
pub use ledger::{InMemoryLoanStore, LedgerEvent, LoanStore};
pub use loan::{Borrower, Loan, LoanPatch, NewLoan, NewPayment, Payment};
pub use query::{LoanFilter, LoanQuery, LoanSort};
pub use status::{classify, StatusInputs};
pub use timeline::{timeline, TimelineEvent};
pub use types::{LoanId, LoanStatus, PaymentId, TimelineEventKind};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
