//! This file serves as the root for all entity modules.
//! The entities mirror the documents held by the remote ledger store,
//! decoded into typed Rust structs at the store boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod bank_account;
pub mod budget;
pub mod expense;
pub mod income;
pub mod savings_goal;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::bank_account::BankAccount;
    pub use super::budget::{Budget, BudgetPeriod};
    pub use super::expense::Expense;
    pub use super::income::{Frequency, Income};
    pub use super::savings_goal::SavingsGoal;
    pub use super::EntityKind;
}

/// The kind of entity a store document holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    BankAccount,
    Income,
    Expense,
    Budget,
    SavingsGoal,
}

impl EntityKind {
    /// The collection name used by the ledger store for this kind.
    pub fn collection_name(&self) -> &'static str {
        match self {
            EntityKind::BankAccount => "bank_accounts",
            EntityKind::Income => "incomes",
            EntityKind::Expense => "expenses",
            EntityKind::Budget => "budgets",
            EntityKind::SavingsGoal => "savings_goals",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection_name())
    }
}
