use chrono::NaiveDate;
use rust_decimal::Decimal;

use common::{same_month, yearly_to_monthly};
use model::entities::prelude::*;

/// Income attributable to the month of `ref_date`.
///
/// Monthly incomes count in full and yearly incomes contribute a twelfth;
/// one-time entries count only when their date falls inside the window.
pub fn monthly_income<'a, I>(incomes: I, ref_date: NaiveDate) -> Decimal
where
    I: IntoIterator<Item = &'a Income>,
{
    incomes.into_iter().fold(Decimal::ZERO, |total, income| {
        total
            + match income.frequency {
                Frequency::Monthly => income.amount,
                Frequency::Yearly => yearly_to_monthly(income.amount),
                Frequency::OneTime | Frequency::None => {
                    if same_month(income.date, ref_date) {
                        income.amount
                    } else {
                        Decimal::ZERO
                    }
                }
            }
    })
}

/// Expenses attributable to the month of `ref_date`.
///
/// Recurring-monthly expenses count in full and recurring-yearly ones a
/// twelfth. Every non-recurring expense dated inside the window counts,
/// whatever its frequency field says.
pub fn monthly_expenses<'a, E>(expenses: E, ref_date: NaiveDate) -> Decimal
where
    E: IntoIterator<Item = &'a Expense>,
{
    expenses.into_iter().fold(Decimal::ZERO, |total, expense| {
        let share = if expense.is_recurring {
            match expense.frequency {
                Frequency::Monthly => expense.amount,
                Frequency::Yearly => yearly_to_monthly(expense.amount),
                Frequency::OneTime | Frequency::None => {
                    if same_month(expense.date, ref_date) {
                        expense.amount
                    } else {
                        Decimal::ZERO
                    }
                }
            }
        } else if same_month(expense.date, ref_date) {
            expense.amount
        } else {
            Decimal::ZERO
        };
        total + share
    })
}

/// Monthly expenses narrowed to a single category.
pub fn category_expenses<'a, E>(expenses: E, category: &str, ref_date: NaiveDate) -> Decimal
where
    E: IntoIterator<Item = &'a Expense>,
{
    monthly_expenses(
        expenses
            .into_iter()
            .filter(|expense| expense.category == category),
        ref_date,
    )
}
