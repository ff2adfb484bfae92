//! Budget CRUD.
//!
//! Budget progress is never stored; it is recomputed into the published
//! state whenever budgets or expenses change.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use common::round_amount;
use model::decode::Document;
use model::entities::prelude::*;

use super::Coordinator;
use crate::error::{CoordinatorError, Result};

/// Request for creating a spending ceiling on one category.
#[derive(Debug, Clone)]
pub struct NewBudget {
    pub category: String,
    pub budget_amount: Decimal,
    pub period: BudgetPeriod,
    pub alert_threshold: Decimal,
}

/// Request for replacing a budget's user-editable fields.
#[derive(Debug, Clone)]
pub struct UpdateBudget {
    pub id: String,
    pub category: String,
    pub budget_amount: Decimal,
    pub period: BudgetPeriod,
    pub alert_threshold: Decimal,
}

impl Coordinator {
    #[instrument(skip(self, request), fields(category = %request.category))]
    pub async fn add_budget(&mut self, request: NewBudget) -> Result<Budget> {
        let budget = Budget {
            id: Uuid::new_v4().to_string(),
            owner: self.owner.clone(),
            category: request.category,
            budget_amount: round_amount(request.budget_amount),
            period: request.period,
            alert_threshold: request.alert_threshold,
            created_at: Utc::now(),
        };
        budget.validate()?;
        self.persist(EntityKind::Budget, &budget.id, &budget).await?;
        info!(id = %budget.id, category = %budget.category, "budget created");

        self.budgets.push(budget.clone());
        self.refresh_published();
        Ok(budget)
    }

    #[instrument(skip(self, request), fields(id = %request.id))]
    pub async fn update_budget(&mut self, request: UpdateBudget) -> Result<()> {
        let position = self
            .budgets
            .iter()
            .position(|budget| budget.id == request.id)
            .ok_or_else(|| CoordinatorError::UnknownEntity {
                kind: EntityKind::Budget,
                id: request.id.clone(),
            })?;

        let mut budget = self.budgets[position].clone();
        budget.category = request.category;
        budget.budget_amount = round_amount(request.budget_amount);
        budget.period = request.period;
        budget.alert_threshold = request.alert_threshold;
        budget.validate()?;
        self.persist(EntityKind::Budget, &budget.id, &budget).await?;
        debug!(id = %budget.id, "budget updated");

        self.budgets[position] = budget;
        self.refresh_published();
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_budget(&mut self, id: &str) -> Result<()> {
        if !self.budgets.iter().any(|budget| budget.id == id) {
            return Err(CoordinatorError::UnknownEntity {
                kind: EntityKind::Budget,
                id: id.to_string(),
            });
        }
        self.store.delete(EntityKind::Budget, &self.owner, id).await?;
        self.budgets.retain(|budget| budget.id != id);
        debug!(id, "budget deleted");
        self.refresh_published();
        Ok(())
    }
}
