//! Two-channel reconciliation and totals recomputation.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{debug, instrument, trace, warn};

use model::decode::decode_collection;
use model::entities::prelude::*;
use store::Snapshot;

use super::Coordinator;
use crate::error::{CoordinatorError, Result};
use crate::schemas::{PublishedState, Tracked};

impl Coordinator {
    /// Drains every queued remote snapshot, oldest first, and reconciles
    /// each one against the working set. Returns how many were applied.
    pub async fn process_pending_snapshots(&mut self) -> Result<usize> {
        let mut pending = Vec::new();
        for subscription in &mut self.subscriptions {
            while let Some(snapshot) = subscription.try_next() {
                pending.push(snapshot);
            }
        }
        let count = pending.len();
        for snapshot in pending {
            self.apply_snapshot(snapshot).await?;
        }
        Ok(count)
    }

    /// Applies one full-collection snapshot to the working set.
    ///
    /// The matching collection is replaced wholesale: an optimistic local
    /// row the snapshot does not contain is gone afterwards. The remote
    /// channel is authoritative once its round-trip completes.
    #[instrument(skip(self, snapshot), fields(kind = %snapshot.kind, account_id = %snapshot.account_id))]
    pub async fn apply_snapshot(&mut self, snapshot: Snapshot) -> Result<()> {
        let Some(selected) = self.selection.selected_id() else {
            warn!("snapshot dropped, no account selected");
            return Ok(());
        };
        if snapshot.account_id != selected {
            // The unsubscribe-before-resubscribe discipline should make this
            // unreachable; a stale event is dropped rather than applied.
            warn!("snapshot dropped, wrong account scope");
            return Ok(());
        }

        let account_id = snapshot.account_id.clone();
        match snapshot.kind {
            EntityKind::Income => {
                let incomes = decode_collection::<Income>(snapshot.documents)?;
                trace!(rows = incomes.len(), "income collection replaced");
                self.incomes = incomes.into_iter().map(Tracked::remote).collect();
            }
            EntityKind::Expense => {
                let expenses = decode_collection::<Expense>(snapshot.documents)?;
                trace!(rows = expenses.len(), "expense collection replaced");
                self.expenses = expenses.into_iter().map(Tracked::remote).collect();
            }
            other => {
                warn!(%other, "snapshot for unwatched collection dropped");
                return Ok(());
            }
        }
        self.recompute_account_totals(&account_id).await
    }

    /// Derives the account's lifetime totals from the merged working set,
    /// persists the updated account, then refreshes every savings goal whose
    /// scope includes the account.
    ///
    /// Idempotent: unchanged inputs produce identical totals and projections.
    #[instrument(skip(self))]
    pub async fn recompute_account_totals(&mut self, account_id: &str) -> Result<()> {
        let totals = compute::account_totals(
            self.incomes
                .iter()
                .map(|tracked| &tracked.entity)
                .filter(|income| income.bank_account_id == account_id),
            self.expenses
                .iter()
                .map(|tracked| &tracked.entity)
                .filter(|expense| expense.bank_account_id == account_id),
        );
        debug!(
            total_income = %totals.total_income,
            total_expense = %totals.total_expense,
            "account totals recomputed"
        );

        let account = self
            .bank_accounts
            .iter_mut()
            .find(|account| account.id == account_id)
            .ok_or_else(|| CoordinatorError::UnknownEntity {
                kind: EntityKind::BankAccount,
                id: account_id.to_string(),
            })?;
        account.total_income = totals.total_income;
        account.total_expense = totals.total_expense;
        account.current_balance = totals.current_balance;
        let updated = account.clone();
        self.persist(EntityKind::BankAccount, &updated.id, &updated).await?;

        // The goal projection is a cached, never-negative view of the
        // scope's savings.
        let tracked_amount = totals.current_balance.max(Decimal::ZERO);
        let mut refreshed = Vec::new();
        for goal in self
            .savings_goals
            .iter_mut()
            .filter(|goal| goal.in_scope(account_id))
        {
            if goal.auto_tracked_amount != tracked_amount {
                goal.auto_tracked_amount = tracked_amount;
                refreshed.push(goal.clone());
            }
        }
        for goal in refreshed {
            trace!(id = %goal.id, amount = %goal.auto_tracked_amount, "goal projection refreshed");
            self.persist(EntityKind::SavingsGoal, &goal.id, &goal).await?;
        }

        self.refresh_published();
        Ok(())
    }

    /// Rebuilds the read-only state handed to the presentation layer.
    pub(crate) fn refresh_published(&mut self) {
        let expenses: Vec<Expense> = self
            .expenses
            .iter()
            .map(|tracked| tracked.entity.clone())
            .collect();
        let mut budget_progress_by_budget_id = HashMap::new();
        for budget in &self.budgets {
            budget_progress_by_budget_id.insert(
                budget.id.clone(),
                compute::budget_progress(expenses.iter(), budget, self.today),
            );
        }
        self.published = PublishedState {
            bank_accounts: self.bank_accounts.clone(),
            selected_bank_account: self.selected_account().cloned(),
            incomes: self
                .incomes
                .iter()
                .map(|tracked| tracked.entity.clone())
                .collect(),
            expenses,
            budgets: self.budgets.clone(),
            savings_goals: self.savings_goals.clone(),
            budget_progress_by_budget_id,
            sync_error: self.sync_error.clone(),
        };
    }
}
