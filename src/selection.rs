//! Account selection state machine.

use model::entities::prelude::*;

/// Which bank account the session is currently scoped to.
///
/// Aggregate views always reflect the selected account's transaction set;
/// every transition into `AccountSelected` must be followed by a
/// resubscription of the remote channels and a full recomputation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    NoAccountSelected,
    AccountSelected(String),
}

impl Selection {
    pub fn selected_id(&self) -> Option<&str> {
        match self {
            Selection::NoAccountSelected => None,
            Selection::AccountSelected(id) => Some(id),
        }
    }

    /// Explicit selection. Returns true when the scope actually changed.
    pub fn select(&mut self, id: Option<String>) -> bool {
        let next = match id {
            Some(id) => Selection::AccountSelected(id),
            None => Selection::NoAccountSelected,
        };
        if *self == next {
            return false;
        }
        *self = next;
        true
    }

    /// Applies the default-selection rule after the account list loads:
    /// when nothing is selected yet and accounts exist, the first one wins.
    /// Returns true when the scope changed.
    pub fn apply_default(&mut self, accounts: &[BankAccount]) -> bool {
        if self.selected_id().is_some() {
            return false;
        }
        match accounts.first() {
            Some(account) => self.select(Some(account.id.clone())),
            None => false,
        }
    }

    /// Reacts to an account deletion: when the deleted account was selected,
    /// the next remaining account is selected, or none when the list
    /// emptied. Returns true when the scope changed.
    pub fn apply_deletion(&mut self, deleted_id: &str, remaining: &[BankAccount]) -> bool {
        if self.selected_id() != Some(deleted_id) {
            return false;
        }
        self.select(remaining.first().map(|account| account.id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compute::testing::account;

    fn named(id: &str) -> BankAccount {
        BankAccount {
            id: id.to_string(),
            ..account("Checking", "0", "0")
        }
    }

    #[test]
    fn test_apply_default_selects_first_account_once() {
        let accounts = vec![named("a"), named("b")];
        let mut selection = Selection::NoAccountSelected;

        assert!(selection.apply_default(&accounts));
        assert_eq!(selection.selected_id(), Some("a"));

        // An already-selected scope is left alone.
        assert!(!selection.apply_default(&accounts));
    }

    #[test]
    fn test_apply_default_with_no_accounts_stays_unselected() {
        let mut selection = Selection::NoAccountSelected;
        assert!(!selection.apply_default(&[]));
        assert_eq!(selection.selected_id(), None);
    }

    #[test]
    fn test_select_reports_actual_changes_only() {
        let mut selection = Selection::NoAccountSelected;
        assert!(selection.select(Some("a".to_string())));
        assert!(!selection.select(Some("a".to_string())));
        assert!(selection.select(None));
        assert!(!selection.select(None));
    }

    #[test]
    fn test_apply_deletion_moves_to_next_remaining() {
        let mut selection = Selection::AccountSelected("a".to_string());
        let remaining = vec![named("b")];
        assert!(selection.apply_deletion("a", &remaining));
        assert_eq!(selection.selected_id(), Some("b"));
    }

    #[test]
    fn test_apply_deletion_of_last_account_unselects() {
        let mut selection = Selection::AccountSelected("a".to_string());
        assert!(selection.apply_deletion("a", &[]));
        assert_eq!(selection.selected_id(), None);
    }

    #[test]
    fn test_apply_deletion_of_unselected_account_is_ignored() {
        let mut selection = Selection::AccountSelected("a".to_string());
        let remaining = vec![named("a"), named("c")];
        assert!(!selection.apply_deletion("b", &remaining));
        assert_eq!(selection.selected_id(), Some("a"));
    }
}
