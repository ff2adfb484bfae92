//! Savings goal operations.

use std::collections::HashSet;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use common::round_amount;
use model::decode::Document;
use model::entities::prelude::*;
use model::ValidationError;

use super::Coordinator;
use crate::error::{CoordinatorError, Result};

/// Request for creating a savings goal.
#[derive(Debug, Clone)]
pub struct NewSavingsGoal {
    pub title: String,
    pub target_amount: Decimal,
    /// Account scope. None makes the goal account-agnostic.
    pub bank_account_id: Option<String>,
}

/// Request for replacing a goal's user-editable fields.
#[derive(Debug, Clone)]
pub struct UpdateSavingsGoal {
    pub id: String,
    pub title: String,
    pub target_amount: Decimal,
}

impl Coordinator {
    /// Creates a goal seeded with the current scope's savings figure.
    ///
    /// A title already used by this owner (compared case-insensitively)
    /// makes the call a warning no-op.
    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn add_savings_goal(&mut self, request: NewSavingsGoal) -> Result<()> {
        let normalized = request.title.trim().to_lowercase();
        if self
            .savings_goals
            .iter()
            .any(|goal| goal.normalized_title() == normalized)
        {
            warn!(title = %request.title, "duplicate savings goal title ignored");
            return Ok(());
        }

        let scope = request
            .bank_account_id
            .clone()
            .or_else(|| self.selection.selected_id().map(str::to_string));
        let seeded = scope
            .as_deref()
            .and_then(|id| self.bank_accounts.iter().find(|account| account.id == id))
            .map(|account| account.current_balance.max(Decimal::ZERO))
            .unwrap_or(Decimal::ZERO);

        let goal = SavingsGoal {
            id: Uuid::new_v4().to_string(),
            owner: self.owner.clone(),
            title: request.title,
            target_amount: round_amount(request.target_amount),
            bank_account_id: request.bank_account_id,
            auto_tracked_amount: seeded,
            created_at: Utc::now(),
        };
        goal.validate()?;
        self.persist(EntityKind::SavingsGoal, &goal.id, &goal).await?;
        info!(id = %goal.id, title = %goal.title, "savings goal created");

        self.savings_goals.push(goal);
        self.refresh_published();
        Ok(())
    }

    #[instrument(skip(self, request), fields(id = %request.id))]
    pub async fn update_savings_goal(&mut self, request: UpdateSavingsGoal) -> Result<()> {
        let position = self
            .savings_goals
            .iter()
            .position(|goal| goal.id == request.id)
            .ok_or_else(|| CoordinatorError::UnknownEntity {
                kind: EntityKind::SavingsGoal,
                id: request.id.clone(),
            })?;

        // A rename must not collide with another goal's title.
        let normalized = request.title.trim().to_lowercase();
        if self
            .savings_goals
            .iter()
            .any(|goal| goal.id != request.id && goal.normalized_title() == normalized)
        {
            return Err(ValidationError::DuplicateGoalTitle(request.title).into());
        }

        let mut goal = self.savings_goals[position].clone();
        goal.title = request.title;
        goal.target_amount = round_amount(request.target_amount);
        goal.validate()?;
        self.persist(EntityKind::SavingsGoal, &goal.id, &goal).await?;
        debug!(id = %goal.id, "savings goal updated");

        self.savings_goals[position] = goal;
        self.refresh_published();
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_savings_goal(&mut self, id: &str) -> Result<()> {
        if !self.savings_goals.iter().any(|goal| goal.id == id) {
            return Err(CoordinatorError::UnknownEntity {
                kind: EntityKind::SavingsGoal,
                id: id.to_string(),
            });
        }
        self.store.delete(EntityKind::SavingsGoal, &self.owner, id).await?;
        self.savings_goals.retain(|goal| goal.id != id);
        debug!(id, "savings goal deleted");
        self.refresh_published();
        Ok(())
    }

    /// Loads the owner's savings goals, deleting any duplicate titles found
    /// durably. The earliest created goal wins.
    pub(crate) async fn load_savings_goals(&mut self) -> Result<()> {
        let mut goals: Vec<SavingsGoal> = self.load_collection(None).await?;
        goals.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        for goal in goals {
            if seen.insert(goal.normalized_title()) {
                kept.push(goal);
            } else {
                warn!(id = %goal.id, title = %goal.title, "duplicate savings goal removed at load");
                self.store
                    .delete(EntityKind::SavingsGoal, &self.owner, &goal.id)
                    .await?;
            }
        }
        self.savings_goals = kept;
        Ok(())
    }
}
