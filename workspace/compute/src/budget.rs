use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use model::entities::prelude::*;

use crate::monthly::category_expenses;

/// Consumption classification for one budget in its current period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetStatus {
    /// Spend is below the alert threshold.
    OnTrack,
    /// Spend reached the alert threshold but the budget is not exhausted.
    AlmostThere,
    /// Spend reached or passed the full budget amount.
    OverBudget,
}

/// Percentage of `budget.budget_amount` consumed by matching expenses in the
/// month of `ref_date`.
///
/// A zero budget amount yields zero progress rather than a division.
pub fn budget_progress<'a, E>(expenses: E, budget: &Budget, ref_date: NaiveDate) -> Decimal
where
    E: IntoIterator<Item = &'a Expense>,
{
    if budget.budget_amount.is_zero() {
        return Decimal::ZERO;
    }
    let spent = category_expenses(expenses, &budget.category, ref_date);
    spent / budget.budget_amount * Decimal::ONE_HUNDRED
}

/// Classifies progress against the budget's alert threshold.
pub fn budget_status(progress: Decimal, alert_threshold: Decimal) -> BudgetStatus {
    if progress >= Decimal::ONE_HUNDRED {
        BudgetStatus::OverBudget
    } else if progress >= alert_threshold {
        BudgetStatus::AlmostThere
    } else {
        BudgetStatus::OnTrack
    }
}
