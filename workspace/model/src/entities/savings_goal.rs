use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decode::Document;
use crate::entities::EntityKind;
use crate::error::ValidationError;

/// A savings target with an auto-tracked progress projection.
///
/// `auto_tracked_amount` is a cached projection of the scope's current
/// savings, refreshed whenever the scope's totals change. It is never
/// negative and never authoritative.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: String,
    /// The user who owns this goal.
    pub owner: String,
    /// Unique per owner, compared case-insensitively.
    pub title: String,
    pub target_amount: Decimal,
    /// Account scope. None means the goal applies account-agnostically.
    pub bank_account_id: Option<String>,
    /// Latest non-negative savings figure for the goal's scope.
    pub auto_tracked_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl SavingsGoal {
    /// Title form used for the per-owner uniqueness check.
    pub fn normalized_title(&self) -> String {
        self.title.trim().to_lowercase()
    }

    /// Whether the given account contributes to this goal's projection.
    pub fn in_scope(&self, account_id: &str) -> bool {
        match &self.bank_account_id {
            Some(scoped) => scoped == account_id,
            None => true,
        }
    }
}

impl Document for SavingsGoal {
    const KIND: EntityKind = EntityKind::SavingsGoal;

    fn validate(&self) -> Result<(), ValidationError> {
        if self.owner.trim().is_empty() {
            return Err(ValidationError::MissingField("owner"));
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        if self.target_amount < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount {
                field: "target_amount",
                value: self.target_amount,
            });
        }
        if self.auto_tracked_amount < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount {
                field: "auto_tracked_amount",
                value: self.auto_tracked_amount,
            });
        }
        Ok(())
    }
}
