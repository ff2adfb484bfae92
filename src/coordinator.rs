//! The consistency coordinator.
//!
//! Keeps `BankAccount` totals and dependent `SavingsGoal` projections
//! consistent with the income/expense sets across two concurrent update
//! channels: synchronous local mutations and the remote snapshot feed. All
//! recomputation runs synchronously inside whichever handler triggered it;
//! the only suspension points are the awaits on the ledger store.

mod accounts;
mod budgets;
mod goals;
mod reconcile;
mod transactions;

pub use accounts::NewBankAccount;
pub use budgets::{NewBudget, UpdateBudget};
pub use goals::{NewSavingsGoal, UpdateSavingsGoal};
pub use transactions::{
    NewExpense, NewIncome, UpdateExpense, UpdateIncome, INITIAL_BALANCE_SOURCE,
};

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use compute::FinancialSummary;
use model::decode::{decode_collection, Document};
use model::entities::prelude::*;
use store::{CollectionSubscription, LedgerStore};

use crate::error::{CoordinatorError, Result};
use crate::schemas::{PublishedState, Tracked};
use crate::selection::Selection;

/// The stateful core of the system, one instance per authenticated session.
///
/// Owns the working set for the currently selected account. The presentation
/// layer consumes [`Coordinator::published_state`] and calls the mutation
/// operations; it never touches the working set directly.
pub struct Coordinator {
    store: Arc<dyn LedgerStore>,
    owner: String,
    /// Reference date for month-windowed aggregation, fixed per session so
    /// derived views stay reproducible.
    today: NaiveDate,
    selection: Selection,
    bank_accounts: Vec<BankAccount>,
    incomes: Vec<Tracked<Income>>,
    expenses: Vec<Tracked<Expense>>,
    budgets: Vec<Budget>,
    savings_goals: Vec<SavingsGoal>,
    subscriptions: Vec<CollectionSubscription>,
    sync_error: Option<String>,
    published: PublishedState,
}

impl Coordinator {
    /// Creates a session-scoped coordinator using the current date as the
    /// aggregation reference date.
    pub fn new(store: Arc<dyn LedgerStore>, owner: &str) -> Self {
        Self::new_with_today(store, owner, Utc::now().date_naive())
    }

    /// Creates a coordinator with a fixed reference date.
    pub fn new_with_today(store: Arc<dyn LedgerStore>, owner: &str, today: NaiveDate) -> Self {
        Self {
            store,
            owner: owner.to_string(),
            today,
            selection: Selection::NoAccountSelected,
            bank_accounts: Vec::new(),
            incomes: Vec::new(),
            expenses: Vec::new(),
            budgets: Vec::new(),
            savings_goals: Vec::new(),
            subscriptions: Vec::new(),
            sync_error: None,
            published: PublishedState::default(),
        }
    }

    /// Loads the owner's durable state and applies the default selection
    /// rule: the first account wins when nothing is selected yet.
    #[instrument(skip(self), fields(owner = %self.owner))]
    pub async fn load_session(&mut self) -> Result<()> {
        info!("loading session state");
        self.bank_accounts = self.load_collection(None).await?;
        self.budgets = self.load_collection(None).await?;
        self.load_savings_goals().await?;

        if self.selection.apply_default(&self.bank_accounts) {
            let selected = self.selection.selected_id().map(str::to_string);
            self.rescope(selected).await?;
        } else {
            self.refresh_published();
        }
        Ok(())
    }

    /// Switches the working scope to another account (or to none).
    ///
    /// The previous scope's remote listeners are torn down before the new
    /// ones attach, and the new scope is fully recomputed.
    pub async fn set_selected_account(&mut self, account_id: Option<&str>) -> Result<()> {
        if let Some(id) = account_id {
            if !self.bank_accounts.iter().any(|account| account.id == id) {
                return Err(CoordinatorError::UnknownEntity {
                    kind: EntityKind::BankAccount,
                    id: id.to_string(),
                });
            }
        }
        if self.selection.select(account_id.map(str::to_string)) {
            debug!(?account_id, "selection changed, rescoping");
            self.rescope(account_id.map(str::to_string)).await?;
        }
        Ok(())
    }

    /// Recomputes the selected scope end to end: totals, goal projections,
    /// and the published aggregates.
    pub async fn recompute_all(&mut self) -> Result<()> {
        match self.selection.selected_id().map(str::to_string) {
            Some(account_id) => self.recompute_account_totals(&account_id).await,
            None => {
                self.refresh_published();
                Ok(())
            }
        }
    }

    /// Month-level overview for the selected account, or None without one.
    pub fn financial_summary(&self) -> Option<FinancialSummary> {
        let account = self.selected_account()?;
        Some(compute::financial_summary(
            self.expenses.iter().map(|tracked| &tracked.entity),
            self.budgets.iter(),
            account,
            self.today,
        ))
    }

    /// Recurring expenses due within the horizon, soonest first.
    pub fn upcoming_bills(&self, horizon_days: i64) -> Vec<&Expense> {
        compute::upcoming_bills(
            self.expenses.iter().map(|tracked| &tracked.entity),
            self.today,
            horizon_days,
        )
    }

    pub fn published_state(&self) -> &PublishedState {
        &self.published
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_account(&self) -> Option<&BankAccount> {
        self.selection
            .selected_id()
            .and_then(|id| self.bank_accounts.iter().find(|account| account.id == id))
    }

    pub fn bank_accounts(&self) -> &[BankAccount] {
        &self.bank_accounts
    }

    /// The income working set with its two-source merge tags.
    pub fn incomes(&self) -> &[Tracked<Income>] {
        &self.incomes
    }

    /// The expense working set with its two-source merge tags.
    pub fn expenses(&self) -> &[Tracked<Expense>] {
        &self.expenses
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn savings_goals(&self) -> &[SavingsGoal] {
        &self.savings_goals
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Re-scopes the remote channels and the transaction working set.
    ///
    /// Old listeners must be gone before the new ones attach: a snapshot
    /// from the previous scope must never be processed against the new one.
    async fn rescope(&mut self, account_id: Option<String>) -> Result<()> {
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
        self.incomes.clear();
        self.expenses.clear();

        if let Some(account_id) = account_id {
            for kind in [EntityKind::Income, EntityKind::Expense] {
                match self.store.subscribe(&self.owner, &account_id, kind).await {
                    Ok(subscription) => self.subscriptions.push(subscription),
                    Err(err) => {
                        warn!(%kind, %account_id, error = %err, "resubscription failed");
                        self.sync_error = Some(err.to_string());
                        self.refresh_published();
                        return Err(CoordinatorError::Subscription(err.to_string()));
                    }
                }
            }
            self.sync_error = None;
            // The subscriptions' initial snapshots carry the current
            // collection contents and drive the first recomputation.
            self.process_pending_snapshots().await?;
        }
        self.recompute_all().await
    }

    /// Lists and decodes one of the owner's collections.
    async fn load_collection<T: Document>(&self, account_scope: Option<&str>) -> Result<Vec<T>> {
        let documents = self
            .store
            .list_for_owner(T::KIND, &self.owner, account_scope)
            .await?;
        Ok(decode_collection(documents)?)
    }

    /// Serializes an entity and writes it through to the ledger store.
    pub(crate) async fn persist<T: Serialize>(
        &self,
        kind: EntityKind,
        id: &str,
        entity: &T,
    ) -> Result<()> {
        let document = serde_json::to_value(entity)?;
        self.store.create_or_replace(kind, &self.owner, id, document).await?;
        Ok(())
    }

    pub(crate) fn require_selected(&self) -> Result<String> {
        self.selection
            .selected_id()
            .map(str::to_string)
            .ok_or(CoordinatorError::NoAccountSelected)
    }
}
