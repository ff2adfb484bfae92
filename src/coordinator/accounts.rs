//! Bank account lifecycle.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use common::round_amount;
use model::decode::Document;
use model::entities::prelude::*;

use super::transactions::{NewIncome, INITIAL_BALANCE_SOURCE};
use super::Coordinator;
use crate::error::{CoordinatorError, Result};

/// Request for opening a new bank account.
#[derive(Debug, Clone)]
pub struct NewBankAccount {
    pub nickname: String,
    pub starting_balance: Decimal,
}

impl Coordinator {
    /// Creates an account, makes it the selected scope, and seeds the
    /// synthetic initial-balance income that folds `starting_balance` into
    /// the income total.
    #[instrument(skip(self, request), fields(nickname = %request.nickname))]
    pub async fn add_bank_account(&mut self, request: NewBankAccount) -> Result<BankAccount> {
        let account = BankAccount {
            id: Uuid::new_v4().to_string(),
            owner: self.owner.clone(),
            nickname: request.nickname,
            created_at: Utc::now(),
            starting_balance: round_amount(request.starting_balance),
            total_income: Decimal::ZERO,
            total_expense: Decimal::ZERO,
            current_balance: Decimal::ZERO,
        };
        account.validate()?;
        self.persist(EntityKind::BankAccount, &account.id, &account).await?;
        info!(id = %account.id, nickname = %account.nickname, "bank account created");
        self.bank_accounts.push(account.clone());

        self.set_selected_account(Some(&account.id)).await?;

        if account.starting_balance > Decimal::ZERO {
            self.add_income(NewIncome {
                amount: account.starting_balance,
                date: self.today,
                source: INITIAL_BALANCE_SOURCE.to_string(),
                frequency: Frequency::OneTime,
            })
            .await?;
        }

        // Hand back the account with its seeded totals.
        self.bank_accounts
            .iter()
            .find(|candidate| candidate.id == account.id)
            .cloned()
            .ok_or(CoordinatorError::UnknownEntity {
                kind: EntityKind::BankAccount,
                id: account.id,
            })
    }

    /// Deletes an account. When it was the selected one, the next remaining
    /// account becomes selected, or none when the list emptied.
    #[instrument(skip(self))]
    pub async fn delete_bank_account(&mut self, id: &str) -> Result<()> {
        if !self.bank_accounts.iter().any(|account| account.id == id) {
            return Err(CoordinatorError::UnknownEntity {
                kind: EntityKind::BankAccount,
                id: id.to_string(),
            });
        }
        self.store.delete(EntityKind::BankAccount, &self.owner, id).await?;
        self.bank_accounts.retain(|account| account.id != id);
        info!(id, "bank account deleted");

        if self.selection.apply_deletion(id, &self.bank_accounts) {
            let next = self.selection.selected_id().map(str::to_string);
            debug!(?next, "selection moved after deletion");
            self.rescope(next).await?;
        } else {
            self.refresh_published();
        }
        Ok(())
    }
}
