use chrono::{Duration, NaiveDate};

use model::entities::prelude::*;

/// Recurring expenses falling due within the horizon, soonest first.
///
/// Only recurring expenses carrying a `next_due_date` participate. The
/// window is inclusive on both ends.
pub fn upcoming_bills<'a, E>(expenses: E, today: NaiveDate, horizon_days: i64) -> Vec<&'a Expense>
where
    E: IntoIterator<Item = &'a Expense>,
{
    let horizon = today + Duration::days(horizon_days);
    let mut bills: Vec<&Expense> = expenses
        .into_iter()
        .filter(|expense| expense.is_recurring)
        .filter(|expense| {
            matches!(expense.next_due_date, Some(due) if due >= today && due <= horizon)
        })
        .collect();
    bills.sort_by_key(|expense| expense.next_due_date);
    bills
}
