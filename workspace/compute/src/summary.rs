use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use model::entities::prelude::*;

use crate::monthly::monthly_expenses;

/// Derived lifetime totals for one account's transaction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTotals {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    /// Always `total_income - total_expense`.
    pub current_balance: Decimal,
}

/// Sums an account's full transaction set into lifetime totals.
pub fn account_totals<'a, I, E>(incomes: I, expenses: E) -> AccountTotals
where
    I: IntoIterator<Item = &'a Income>,
    E: IntoIterator<Item = &'a Expense>,
{
    let total_income: Decimal = incomes.into_iter().map(|income| income.amount).sum();
    let total_expense: Decimal = expenses.into_iter().map(|expense| expense.amount).sum();
    AccountTotals {
        total_income,
        total_expense,
        current_balance: total_income - total_expense,
    }
}

/// Month-level financial overview for the selected account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// The account's running lifetime income total (which includes the
    /// starting balance). Not month-windowed, unlike `total_expenses`;
    /// downstream consumers rely on exactly this pairing.
    pub total_income: Decimal,
    /// Month-windowed expense total.
    pub total_expenses: Decimal,
    pub savings: Decimal,
    /// Percent of income kept. Zero when there is no income; negative when
    /// the month spent more than the lifetime income figure.
    pub savings_rate: Decimal,
    /// Combined ceiling across monthly-period budgets.
    pub monthly_budget: Decimal,
    /// `monthly_budget - total_expenses`.
    pub remaining_budget: Decimal,
}

/// Builds the financial overview from the account and its transaction set.
///
/// `total_income` is read from the authoritative account record rather than
/// recomputed from the month window.
pub fn financial_summary<'a, E, B>(
    expenses: E,
    budgets: B,
    selected_account: &BankAccount,
    ref_date: NaiveDate,
) -> FinancialSummary
where
    E: IntoIterator<Item = &'a Expense>,
    B: IntoIterator<Item = &'a Budget>,
{
    let total_income = selected_account.total_income;
    let total_expenses = monthly_expenses(expenses, ref_date);
    let savings = total_income - total_expenses;
    let savings_rate = if total_income.is_zero() {
        Decimal::ZERO
    } else {
        savings / total_income * Decimal::ONE_HUNDRED
    };
    let monthly_budget: Decimal = budgets
        .into_iter()
        .filter(|budget| budget.period == BudgetPeriod::Monthly)
        .map(|budget| budget.budget_amount)
        .sum();
    debug!(
        account_id = %selected_account.id,
        %total_income,
        %total_expenses,
        "financial summary computed"
    );

    FinancialSummary {
        total_income,
        total_expenses,
        savings,
        savings_rate,
        monthly_budget,
        remaining_budget: monthly_budget - total_expenses,
    }
}

/// Percent of a goal's target covered by its auto-tracked amount, capped at
/// 100. A zero target yields zero progress.
pub fn goal_progress(goal: &SavingsGoal) -> Decimal {
    if goal.target_amount.is_zero() {
        return Decimal::ZERO;
    }
    (goal.auto_tracked_amount / goal.target_amount * Decimal::ONE_HUNDRED)
        .min(Decimal::ONE_HUNDRED)
}
