use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decode::Document;
use crate::entities::income::Frequency;
use crate::entities::EntityKind;
use crate::error::ValidationError;

/// Money leaving a bank account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    /// The user who owns this expense.
    pub owner: String,
    /// The account this expense belongs to for its whole lifetime.
    pub bank_account_id: String,
    /// Non-negative, rounded to two decimals at input time.
    pub amount: Decimal,
    pub date: NaiveDate,
    /// Spending category, e.g. "food". Budgets match on this.
    pub category: String,
    pub frequency: Frequency,
    /// Recurring expenses aggregate by frequency; non-recurring ones count
    /// whenever their date falls in the reference month.
    pub is_recurring: bool,
    /// Next due date for recurring expenses, used by upcoming-bills views.
    pub next_due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Document for Expense {
    const KIND: EntityKind = EntityKind::Expense;

    fn validate(&self) -> Result<(), ValidationError> {
        if self.owner.trim().is_empty() {
            return Err(ValidationError::MissingField("owner"));
        }
        if self.bank_account_id.trim().is_empty() {
            return Err(ValidationError::MissingField("bank_account_id"));
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::MissingField("category"));
        }
        if self.amount < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount {
                field: "amount",
                value: self.amount,
            });
        }
        Ok(())
    }
}
