//! Fixture builders for aggregation tests.
//!
//! Kept as a public module so the service crate's scenario tests can build
//! the same entities without repeating literals.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use model::entities::prelude::*;

static FIXTURE_ID: AtomicU64 = AtomicU64::new(0);

pub const OWNER: &str = "owner-1";
pub const ACCOUNT_ID: &str = "account-1";

fn next_id(prefix: &str) -> String {
    let current = FIXTURE_ID.fetch_add(1, Ordering::SeqCst);
    format!("{prefix}-{current}")
}

fn amount(value: &str) -> Decimal {
    value.parse().expect("fixture amount should parse")
}

fn date(value: &str) -> NaiveDate {
    value.parse().expect("fixture date should parse")
}

fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

pub fn income(value: &str, on: &str, frequency: Frequency) -> Income {
    Income {
        id: next_id("income"),
        owner: OWNER.to_string(),
        bank_account_id: ACCOUNT_ID.to_string(),
        amount: amount(value),
        date: date(on),
        source: "Salary".to_string(),
        frequency,
        created_at: created_at(),
    }
}

/// A plain non-recurring expense.
pub fn expense(value: &str, on: &str, category: &str) -> Expense {
    Expense {
        id: next_id("expense"),
        owner: OWNER.to_string(),
        bank_account_id: ACCOUNT_ID.to_string(),
        amount: amount(value),
        date: date(on),
        category: category.to_string(),
        frequency: Frequency::OneTime,
        is_recurring: false,
        next_due_date: None,
        created_at: created_at(),
    }
}

pub fn recurring_expense(value: &str, on: &str, category: &str, frequency: Frequency) -> Expense {
    Expense {
        is_recurring: true,
        frequency,
        ..expense(value, on, category)
    }
}

/// A recurring expense with a due date, as the upcoming-bills view sees it.
pub fn bill(value: &str, category: &str, due: &str) -> Expense {
    Expense {
        next_due_date: Some(date(due)),
        ..recurring_expense(value, "2025-01-01", category, Frequency::Monthly)
    }
}

pub fn account(nickname: &str, total_income: &str, total_expense: &str) -> BankAccount {
    let total_income = amount(total_income);
    let total_expense = amount(total_expense);
    BankAccount {
        id: ACCOUNT_ID.to_string(),
        owner: OWNER.to_string(),
        nickname: nickname.to_string(),
        created_at: created_at(),
        starting_balance: Decimal::ZERO,
        total_income,
        total_expense,
        current_balance: total_income - total_expense,
    }
}

pub fn budget(category: &str, value: &str, period: BudgetPeriod, threshold: &str) -> Budget {
    Budget {
        id: next_id("budget"),
        owner: OWNER.to_string(),
        category: category.to_string(),
        budget_amount: amount(value),
        period,
        alert_threshold: amount(threshold),
        created_at: created_at(),
    }
}

pub fn goal(title: &str, target: &str, auto_tracked: &str) -> SavingsGoal {
    SavingsGoal {
        id: next_id("goal"),
        owner: OWNER.to_string(),
        title: title.to_string(),
        target_amount: amount(target),
        bank_account_id: Some(ACCOUNT_ID.to_string()),
        auto_tracked_amount: amount(auto_tracked),
        created_at: created_at(),
    }
}
