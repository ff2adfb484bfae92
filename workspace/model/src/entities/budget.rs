use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decode::Document;
use crate::entities::EntityKind;
use crate::error::ValidationError;

/// Enum for budget periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Monthly,
    Yearly,
}

/// A spending ceiling for one category.
///
/// Progress against the ceiling is derived on demand by the aggregation
/// engine and is never stored on the budget itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    /// The user who owns this budget.
    pub owner: String,
    /// Expense category this budget constrains.
    pub category: String,
    pub budget_amount: Decimal,
    pub period: BudgetPeriod,
    /// Percent of the budget at which consumers should start warning.
    pub alert_threshold: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Document for Budget {
    const KIND: EntityKind = EntityKind::Budget;

    fn validate(&self) -> Result<(), ValidationError> {
        if self.owner.trim().is_empty() {
            return Err(ValidationError::MissingField("owner"));
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::MissingField("category"));
        }
        if self.budget_amount < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount {
                field: "budget_amount",
                value: self.budget_amount,
            });
        }
        if self.alert_threshold < Decimal::ZERO || self.alert_threshold > Decimal::ONE_HUNDRED {
            return Err(ValidationError::ThresholdOutOfRange(self.alert_threshold));
        }
        Ok(())
    }
}
