//! Income and expense mutations.
//!
//! Both transaction kinds are treated uniformly: validate, persist the raw
//! entity, apply it to the working set as locally pending, then recompute the
//! owning account's totals and dependent goal projections. The working set is
//! untouched when validation or the entity persist fails.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use common::round_amount;
use model::decode::Document;
use model::entities::prelude::*;

use super::Coordinator;
use crate::error::{CoordinatorError, Result};
use crate::schemas::Tracked;

/// Source label of the synthetic income that folds an account's starting
/// balance into its income total.
pub const INITIAL_BALANCE_SOURCE: &str = "Initial Balance";

/// Request for recording a new income on the selected account.
#[derive(Debug, Clone)]
pub struct NewIncome {
    pub amount: Decimal,
    pub date: NaiveDate,
    pub source: String,
    pub frequency: Frequency,
}

/// Request for replacing an income's user-editable fields.
///
/// The owning account is not among them: a transaction belongs to one bank
/// account for its whole lifetime.
#[derive(Debug, Clone)]
pub struct UpdateIncome {
    pub id: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub source: String,
    pub frequency: Frequency,
}

/// Request for recording a new expense on the selected account.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category: String,
    pub frequency: Frequency,
    pub is_recurring: bool,
    pub next_due_date: Option<NaiveDate>,
}

/// Request for replacing an expense's user-editable fields.
#[derive(Debug, Clone)]
pub struct UpdateExpense {
    pub id: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category: String,
    pub frequency: Frequency,
    pub is_recurring: bool,
    pub next_due_date: Option<NaiveDate>,
}

impl Coordinator {
    #[instrument(skip(self, request))]
    pub async fn add_income(&mut self, request: NewIncome) -> Result<Income> {
        let account_id = self.require_selected()?;
        let income = Income {
            id: Uuid::new_v4().to_string(),
            owner: self.owner.clone(),
            bank_account_id: account_id.clone(),
            amount: round_amount(request.amount),
            date: request.date,
            source: request.source,
            frequency: request.frequency,
            created_at: Utc::now(),
        };
        income.validate()?;
        self.persist(EntityKind::Income, &income.id, &income).await?;
        info!(id = %income.id, amount = %income.amount, "income recorded");

        self.incomes.push(Tracked::local(income.clone()));
        self.recompute_account_totals(&account_id).await?;
        Ok(income)
    }

    #[instrument(skip(self, request), fields(id = %request.id))]
    pub async fn update_income(&mut self, request: UpdateIncome) -> Result<()> {
        let position = self
            .incomes
            .iter()
            .position(|tracked| tracked.entity.id == request.id)
            .ok_or_else(|| CoordinatorError::UnknownEntity {
                kind: EntityKind::Income,
                id: request.id.clone(),
            })?;

        let mut income = self.incomes[position].entity.clone();
        income.amount = round_amount(request.amount);
        income.date = request.date;
        income.source = request.source;
        income.frequency = request.frequency;
        income.validate()?;
        self.persist(EntityKind::Income, &income.id, &income).await?;
        debug!(id = %income.id, "income updated");

        let account_id = income.bank_account_id.clone();
        self.incomes[position] = Tracked::local(income);
        self.recompute_account_totals(&account_id).await
    }

    #[instrument(skip(self))]
    pub async fn delete_income(&mut self, id: &str) -> Result<()> {
        let position = self
            .incomes
            .iter()
            .position(|tracked| tracked.entity.id == id)
            .ok_or_else(|| CoordinatorError::UnknownEntity {
                kind: EntityKind::Income,
                id: id.to_string(),
            })?;
        self.store.delete(EntityKind::Income, &self.owner, id).await?;
        let removed = self.incomes.remove(position);
        debug!(id, "income deleted");
        self.recompute_account_totals(&removed.entity.bank_account_id).await
    }

    #[instrument(skip(self, request))]
    pub async fn add_expense(&mut self, request: NewExpense) -> Result<Expense> {
        let account_id = self.require_selected()?;
        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            owner: self.owner.clone(),
            bank_account_id: account_id.clone(),
            amount: round_amount(request.amount),
            date: request.date,
            category: request.category,
            frequency: request.frequency,
            is_recurring: request.is_recurring,
            next_due_date: request.next_due_date,
            created_at: Utc::now(),
        };
        expense.validate()?;
        self.persist(EntityKind::Expense, &expense.id, &expense).await?;
        info!(id = %expense.id, amount = %expense.amount, "expense recorded");

        self.expenses.push(Tracked::local(expense.clone()));
        self.recompute_account_totals(&account_id).await?;
        Ok(expense)
    }

    #[instrument(skip(self, request), fields(id = %request.id))]
    pub async fn update_expense(&mut self, request: UpdateExpense) -> Result<()> {
        let position = self
            .expenses
            .iter()
            .position(|tracked| tracked.entity.id == request.id)
            .ok_or_else(|| CoordinatorError::UnknownEntity {
                kind: EntityKind::Expense,
                id: request.id.clone(),
            })?;

        let mut expense = self.expenses[position].entity.clone();
        expense.amount = round_amount(request.amount);
        expense.date = request.date;
        expense.category = request.category;
        expense.frequency = request.frequency;
        expense.is_recurring = request.is_recurring;
        expense.next_due_date = request.next_due_date;
        expense.validate()?;
        self.persist(EntityKind::Expense, &expense.id, &expense).await?;
        debug!(id = %expense.id, "expense updated");

        let account_id = expense.bank_account_id.clone();
        self.expenses[position] = Tracked::local(expense);
        self.recompute_account_totals(&account_id).await
    }

    #[instrument(skip(self))]
    pub async fn delete_expense(&mut self, id: &str) -> Result<()> {
        let position = self
            .expenses
            .iter()
            .position(|tracked| tracked.entity.id == id)
            .ok_or_else(|| CoordinatorError::UnknownEntity {
                kind: EntityKind::Expense,
                id: id.to_string(),
            })?;
        self.store.delete(EntityKind::Expense, &self.owner, id).await?;
        let removed = self.expenses.remove(position);
        debug!(id, "expense deleted");
        self.recompute_account_totals(&removed.entity.bank_account_id).await
    }
}
