//! The aggregation engine.
//!
//! Pure, deterministic, reference-date-parameterized views over a transaction
//! set. No I/O and no stored state: the same inputs always produce the same
//! outputs, regardless of call order or what was computed before. Amounts
//! arrive already rounded to two decimals; these functions do plain decimal
//! arithmetic and never re-round.

pub mod bills;
pub mod budget;
pub mod monthly;
pub mod summary;
pub mod testing;

pub use bills::upcoming_bills;
pub use budget::{budget_progress, budget_status, BudgetStatus};
pub use monthly::{category_expenses, monthly_expenses, monthly_income};
pub use summary::{account_totals, financial_summary, goal_progress, AccountTotals, FinancialSummary};
