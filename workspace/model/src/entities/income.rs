use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decode::Document;
use crate::entities::EntityKind;
use crate::error::ValidationError;

/// How often a transaction repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    /// No recurrence recorded. Aggregated like a one-time entry.
    None,
    Monthly,
    Yearly,
    OneTime,
}

/// Money coming into a bank account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: String,
    /// The user who owns this income.
    pub owner: String,
    /// The account this income belongs to for its whole lifetime.
    pub bank_account_id: String,
    /// Non-negative, rounded to two decimals at input time.
    pub amount: Decimal,
    pub date: NaiveDate,
    /// Where the money came from, e.g. "Salary".
    pub source: String,
    pub frequency: Frequency,
    pub created_at: DateTime<Utc>,
}

impl Document for Income {
    const KIND: EntityKind = EntityKind::Income;

    fn validate(&self) -> Result<(), ValidationError> {
        if self.owner.trim().is_empty() {
            return Err(ValidationError::MissingField("owner"));
        }
        if self.bank_account_id.trim().is_empty() {
            return Err(ValidationError::MissingField("bank_account_id"));
        }
        if self.source.trim().is_empty() {
            return Err(ValidationError::MissingField("source"));
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
