use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decode::Document;
use crate::entities::EntityKind;
use crate::error::ValidationError;

/// A bank account owned by a single user.
///
/// The three totals are derived state maintained by the coordinator:
/// `current_balance == total_income - total_expense` holds after every
/// recomputation, and `total_income` includes the starting balance because a
/// synthetic "Initial Balance" income is seeded at account creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: String,
    /// The user who owns this account.
    pub owner: String,
    /// Display name shown in account pickers.
    pub nickname: String,
    pub created_at: DateTime<Utc>,
    /// Balance snapshot taken at creation time. Immutable afterwards.
    pub starting_balance: Decimal,
    /// Lifetime income total, including the synthetic initial-balance income.
    pub total_income: Decimal,
    /// Lifetime expense total.
    pub total_expense: Decimal,
    /// Always `total_income - total_expense` after recomputation.
    pub current_balance: Decimal,
}

impl Document for BankAccount {
    const KIND: EntityKind = EntityKind::BankAccount;

    fn validate(&self) -> Result<(), ValidationError> {
        if self.owner.trim().is_empty() {
            return Err(ValidationError::MissingField("owner"));
        }
        if self.nickname.trim().is_empty() {
            return Err(ValidationError::MissingField("nickname"));
        }
        if self.starting_balance < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount {
                field: "starting_balance",
                value: self.starting_balance,
            });
        }
        Ok(())
    }
}
