//! State shapes shared with the presentation layer.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use model::entities::prelude::*;

/// Which channel a working-set row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    /// Applied locally and not yet confirmed by a remote snapshot.
    LocalPending,
    /// Delivered (or overwritten) by the remote snapshot channel.
    RemoteConfirmed,
}

/// A working-set row tagged with its source channel.
///
/// The tag makes the two-source merge explicit: a remote snapshot replaces
/// the whole collection with `RemoteConfirmed` rows, so convergence can be
/// asserted deterministically instead of inferred from event timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tracked<T> {
    pub entity: T,
    pub origin: Origin,
}

impl<T> Tracked<T> {
    pub fn local(entity: T) -> Self {
        Self {
            entity,
            origin: Origin::LocalPending,
        }
    }

    pub fn remote(entity: T) -> Self {
        Self {
            entity,
            origin: Origin::RemoteConfirmed,
        }
    }
}

/// Read-only state consumed by the presentation layer.
///
/// Refreshed on every recomputation. Consumers never mutate aggregates
/// directly; they call coordinator operations instead.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PublishedState {
    pub bank_accounts: Vec<BankAccount>,
    pub selected_bank_account: Option<BankAccount>,
    pub incomes: Vec<Income>,
    pub expenses: Vec<Expense>,
    pub budgets: Vec<Budget>,
    pub savings_goals: Vec<SavingsGoal>,
    /// Derived budget consumption percentages, never stored on the budgets.
    pub budget_progress_by_budget_id: HashMap<String, Decimal>,
    /// Set while the remote channel is failing; aggregates may be stale
    /// until resubscription succeeds.
    pub sync_error: Option<String>,
}
