//! Shared fixtures for coordinator scenario tests.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use model::entities::prelude::*;
use store::MemoryLedgerStore;

use crate::coordinator::{Coordinator, NewBankAccount, NewExpense, NewIncome};

pub const OWNER: &str = "owner-1";

pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

/// A coordinator wired to a fresh in-memory store, plus a second handle to
/// that store acting as "another device" on the same remote data.
pub fn new_session() -> (Coordinator, Arc<MemoryLedgerStore>) {
    let store = Arc::new(MemoryLedgerStore::new());
    let coordinator = Coordinator::new_with_today(store.clone(), OWNER, fixed_today());
    (coordinator, store)
}

pub fn amount(value: &str) -> Decimal {
    value.parse().expect("fixture amount should parse")
}

pub fn account_request(nickname: &str, starting_balance: &str) -> NewBankAccount {
    NewBankAccount {
        nickname: nickname.to_string(),
        starting_balance: amount(starting_balance),
    }
}

pub fn income_request(value: &str) -> NewIncome {
    NewIncome {
        amount: amount(value),
        date: fixed_today(),
        source: "Salary".to_string(),
        frequency: Frequency::OneTime,
    }
}

pub fn expense_request(value: &str, category: &str) -> NewExpense {
    NewExpense {
        amount: amount(value),
        date: fixed_today(),
        category: category.to_string(),
        frequency: Frequency::OneTime,
        is_recurring: false,
        next_due_date: None,
    }
}
