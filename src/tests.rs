//! Scenario tests exercising the coordinator's public operations end to end
//! against the in-memory ledger store.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::json;

use compute::{budget_status, BudgetStatus};
use model::entities::prelude::*;
use model::ValidationError;
use store::{LedgerStore, Snapshot};

use crate::coordinator::{NewSavingsGoal, UpdateSavingsGoal, INITIAL_BALANCE_SOURCE};
use crate::error::CoordinatorError;
use crate::schemas::Origin;
use crate::test_utils::{
    account_request, amount, expense_request, fixed_today, income_request, new_session, OWNER,
};

fn assert_balance_identity(coordinator: &crate::Coordinator) {
    let account = coordinator
        .selected_account()
        .expect("Scenario should have a selected account");
    assert_eq!(
        account.current_balance,
        account.total_income - account.total_expense
    );
}

/// Creating an account with a starting balance seeds exactly one synthetic
/// initial-balance income, which drives the totals.
#[tokio::test]
async fn test_new_account_seeds_initial_balance_income() {
    let (mut coordinator, _store) = new_session();
    let account = coordinator
        .add_bank_account(account_request("Checking", "1000.00"))
        .await
        .expect("Should create account");

    let synthetic: Vec<_> = coordinator
        .incomes()
        .iter()
        .filter(|tracked| tracked.entity.source == INITIAL_BALANCE_SOURCE)
        .collect();
    assert_eq!(synthetic.len(), 1);
    assert_eq!(synthetic[0].entity.amount, amount("1000.00"));

    assert_eq!(account.total_income, amount("1000.00"));
    assert_eq!(account.total_expense, Decimal::ZERO);
    assert_eq!(account.current_balance, amount("1000.00"));
}

/// `current_balance == total_income - total_expense` after every mutation
/// reachable through the public operations.
#[tokio::test]
async fn test_balance_identity_holds_through_mutations() {
    let (mut coordinator, _store) = new_session();
    coordinator
        .add_bank_account(account_request("Checking", "500.00"))
        .await
        .expect("Should create account");
    assert_balance_identity(&coordinator);

    let income = coordinator
        .add_income(income_request("200.00"))
        .await
        .expect("Should add income");
    assert_balance_identity(&coordinator);

    let expense = coordinator
        .add_expense(expense_request("100.00", "food"))
        .await
        .expect("Should add expense");
    assert_balance_identity(&coordinator);

    coordinator
        .update_income(crate::coordinator::UpdateIncome {
            id: income.id.clone(),
            amount: amount("250.00"),
            date: fixed_today(),
            source: "Salary".to_string(),
            frequency: Frequency::OneTime,
        })
        .await
        .expect("Should update income");
    assert_balance_identity(&coordinator);

    coordinator
        .delete_expense(&expense.id)
        .await
        .expect("Should delete expense");
    assert_balance_identity(&coordinator);

    let account = coordinator.selected_account().expect("Account selected");
    assert_eq!(account.total_income, amount("750.00"));
    assert_eq!(account.current_balance, amount("750.00"));
}

/// Recomputing twice with unchanged inputs produces identical output.
#[tokio::test]
async fn test_recompute_account_totals_is_idempotent() {
    let (mut coordinator, _store) = new_session();
    coordinator
        .add_bank_account(account_request("Checking", "1000.00"))
        .await
        .expect("Should create account");
    coordinator
        .add_expense(expense_request("123.45", "food"))
        .await
        .expect("Should add expense");

    let account_id = coordinator
        .selected_account()
        .expect("Account selected")
        .id
        .clone();
    coordinator
        .recompute_account_totals(&account_id)
        .await
        .expect("First recompute should succeed");
    let first = coordinator.published_state().clone();

    coordinator
        .recompute_account_totals(&account_id)
        .await
        .expect("Second recompute should succeed");
    let second = coordinator.published_state();

    assert_eq!(first.selected_bank_account, second.selected_bank_account);
    assert_eq!(first.savings_goals, second.savings_goals);
    assert_eq!(
        first.budget_progress_by_budget_id,
        second.budget_progress_by_budget_id
    );
}

/// Amounts round to two decimals at input time, and aggregates see the
/// rounded value.
#[tokio::test]
async fn test_expense_amounts_round_at_input() {
    let (mut coordinator, _store) = new_session();
    coordinator
        .add_bank_account(account_request("Checking", "0"))
        .await
        .expect("Should create account");
    coordinator
        .add_expense(expense_request("250.555", "food"))
        .await
        .expect("Should add expense");

    let stored = &coordinator.expenses()[0].entity;
    assert_eq!(stored.amount, amount("250.56"));

    let spent = compute::category_expenses(
        coordinator.expenses().iter().map(|tracked| &tracked.entity),
        "food",
        fixed_today(),
    );
    assert_eq!(spent, amount("250.56"));
}

/// Two matching expenses totalling 850 against a 1000 budget give 85%
/// progress, which sits in the "almost there" band for an 80% threshold.
#[tokio::test]
async fn test_budget_progress_and_status_classification() {
    let (mut coordinator, _store) = new_session();
    coordinator
        .add_bank_account(account_request("Checking", "0"))
        .await
        .expect("Should create account");
    coordinator
        .add_expense(expense_request("500.00", "food"))
        .await
        .expect("Should add expense");
    coordinator
        .add_expense(expense_request("350.00", "food"))
        .await
        .expect("Should add expense");

    let budget = coordinator
        .add_budget(crate::coordinator::NewBudget {
            category: "food".to_string(),
            budget_amount: amount("1000.00"),
            period: BudgetPeriod::Monthly,
            alert_threshold: amount("80"),
        })
        .await
        .expect("Should add budget");

    let progress = coordinator.published_state().budget_progress_by_budget_id[&budget.id];
    assert_eq!(progress, amount("85"));
    assert_eq!(
        budget_status(progress, budget.alert_threshold),
        BudgetStatus::AlmostThere
    );
}

/// An account that spent more than its lifetime income reports negative
/// savings and a negative savings rate.
#[tokio::test]
async fn test_financial_summary_with_negative_savings() {
    let (mut coordinator, _store) = new_session();
    coordinator
        .add_bank_account(account_request("Checking", "0"))
        .await
        .expect("Should create account");
    coordinator
        .add_income(income_request("5000.00"))
        .await
        .expect("Should add income");
    coordinator
        .add_expense(expense_request("6000.00", "rent"))
        .await
        .expect("Should add expense");

    let summary = coordinator
        .financial_summary()
        .expect("Summary needs a selected account");
    assert_eq!(summary.savings, amount("-1000.00"));
    assert_eq!(summary.savings_rate, amount("-20"));
}

#[tokio::test]
async fn test_financial_summary_absent_without_selection() {
    let (coordinator, _store) = new_session();
    assert!(coordinator.financial_summary().is_none());
}

/// A remote snapshot that omits a locally-added expense wins: the working
/// set matches the snapshot exactly and totals recompute from its contents.
#[tokio::test]
async fn test_remote_snapshot_supersedes_optimistic_state() {
    let (mut coordinator, store) = new_session();
    coordinator
        .add_bank_account(account_request("Checking", "0"))
        .await
        .expect("Should create account");
    let expense = coordinator
        .add_expense(expense_request("100.00", "food"))
        .await
        .expect("Should add expense");
    assert_eq!(coordinator.expenses()[0].origin, Origin::LocalPending);

    // Another device removes the expense; the echo of the local write and
    // the removal snapshot are both queued, in that order.
    store
        .delete(EntityKind::Expense, OWNER, &expense.id)
        .await
        .expect("Remote delete should succeed");
    let applied = coordinator
        .process_pending_snapshots()
        .await
        .expect("Snapshots should apply");
    assert!(applied >= 2);

    assert!(coordinator.expenses().is_empty());
    let account = coordinator.selected_account().expect("Account selected");
    assert_eq!(account.total_expense, Decimal::ZERO);
    assert_eq!(account.current_balance, Decimal::ZERO);
}

/// Once the remote echo of a local write arrives, the row flips from
/// locally pending to remote-confirmed without changing the totals.
#[tokio::test]
async fn test_local_rows_confirm_after_remote_echo() {
    let (mut coordinator, _store) = new_session();
    coordinator
        .add_bank_account(account_request("Checking", "1000.00"))
        .await
        .expect("Should create account");
    assert_eq!(coordinator.incomes()[0].origin, Origin::LocalPending);

    coordinator
        .process_pending_snapshots()
        .await
        .expect("Echo should apply");

    assert_eq!(coordinator.incomes().len(), 1);
    assert_eq!(coordinator.incomes()[0].origin, Origin::RemoteConfirmed);
    let account = coordinator.selected_account().expect("Account selected");
    assert_eq!(account.total_income, amount("1000.00"));
}

/// The second goal with the same case-insensitive title is a no-op.
#[tokio::test]
async fn test_duplicate_goal_title_is_a_no_op() {
    let (mut coordinator, store) = new_session();
    coordinator
        .add_bank_account(account_request("Checking", "0"))
        .await
        .expect("Should create account");

    coordinator
        .add_savings_goal(NewSavingsGoal {
            title: "Vacation".to_string(),
            target_amount: amount("2000.00"),
            bank_account_id: None,
        })
        .await
        .expect("First goal should be created");
    coordinator
        .add_savings_goal(NewSavingsGoal {
            title: " vacation ".to_string(),
            target_amount: amount("9999.00"),
            bank_account_id: None,
        })
        .await
        .expect("Duplicate should be ignored, not fail");

    assert_eq!(coordinator.savings_goals().len(), 1);
    assert_eq!(coordinator.savings_goals()[0].title, "Vacation");
    let stored = store
        .list_for_owner(EntityKind::SavingsGoal, OWNER, None)
        .await
        .expect("Should list goals");
    assert_eq!(stored.len(), 1);
}

/// Renaming a goal onto another goal's title is a validation error.
#[tokio::test]
async fn test_goal_rename_collision_is_rejected() {
    let (mut coordinator, _store) = new_session();
    coordinator
        .add_bank_account(account_request("Checking", "0"))
        .await
        .expect("Should create account");
    for title in ["Vacation", "Laptop"] {
        coordinator
            .add_savings_goal(NewSavingsGoal {
                title: title.to_string(),
                target_amount: amount("1000.00"),
                bank_account_id: None,
            })
            .await
            .expect("Goal should be created");
    }
    let laptop_id = coordinator.savings_goals()[1].id.clone();

    let result = coordinator
        .update_savings_goal(UpdateSavingsGoal {
            id: laptop_id,
            title: "VACATION".to_string(),
            target_amount: amount("1000.00"),
        })
        .await;
    assert!(matches!(
        result,
        Err(CoordinatorError::Validation(
            ValidationError::DuplicateGoalTitle(_)
        ))
    ));
}

/// The goal projection clamps at zero when the scope's balance is negative,
/// and follows the balance otherwise.
#[tokio::test]
async fn test_goal_projection_is_never_negative() {
    let (mut coordinator, _store) = new_session();
    coordinator
        .add_bank_account(account_request("Checking", "1000.00"))
        .await
        .expect("Should create account");
    coordinator
        .add_savings_goal(NewSavingsGoal {
            title: "Vacation".to_string(),
            target_amount: amount("2000.00"),
            bank_account_id: None,
        })
        .await
        .expect("Goal should be created");
    assert_eq!(
        coordinator.savings_goals()[0].auto_tracked_amount,
        amount("1000.00")
    );

    coordinator
        .add_expense(expense_request("1800.00", "rent"))
        .await
        .expect("Should add expense");
    assert_eq!(coordinator.savings_goals()[0].auto_tracked_amount, Decimal::ZERO);

    coordinator
        .add_income(income_request("1000.00"))
        .await
        .expect("Should add income");
    assert_eq!(
        coordinator.savings_goals()[0].auto_tracked_amount,
        amount("200.00")
    );
}

/// Deleting the selected account selects the next remaining one, and the
/// last deletion leaves the session unselected.
#[tokio::test]
async fn test_deleting_selected_account_moves_selection() {
    let (mut coordinator, _store) = new_session();
    let first = coordinator
        .add_bank_account(account_request("Checking", "100.00"))
        .await
        .expect("Should create account");
    let second = coordinator
        .add_bank_account(account_request("Savings", "50.00"))
        .await
        .expect("Should create account");
    assert_eq!(coordinator.selection().selected_id(), Some(second.id.as_str()));

    coordinator
        .delete_bank_account(&second.id)
        .await
        .expect("Should delete account");
    assert_eq!(coordinator.selection().selected_id(), Some(first.id.as_str()));
    // The new scope's aggregates come from the first account's transactions.
    let account = coordinator.selected_account().expect("Account selected");
    assert_eq!(account.current_balance, amount("100.00"));

    coordinator
        .delete_bank_account(&first.id)
        .await
        .expect("Should delete account");
    assert_eq!(coordinator.selection().selected_id(), None);
    assert!(coordinator.published_state().selected_bank_account.is_none());
    assert!(coordinator.expenses().is_empty());
    assert!(coordinator.incomes().is_empty());
}

/// Switching the selected account unsubscribes the old scope first: a write
/// to the previous account's collections never reaches the new working set.
#[tokio::test]
async fn test_rescoping_drops_the_previous_accounts_channel() {
    let (mut coordinator, store) = new_session();
    let first = coordinator
        .add_bank_account(account_request("Checking", "100.00"))
        .await
        .expect("Should create account");
    let second = coordinator
        .add_bank_account(account_request("Savings", "50.00"))
        .await
        .expect("Should create account");

    coordinator
        .set_selected_account(Some(&first.id))
        .await
        .expect("Should switch selection");
    assert_eq!(coordinator.incomes().len(), 1);

    // Another device records an income on the now-unwatched second account.
    let foreign = Income {
        id: "income-foreign".to_string(),
        owner: OWNER.to_string(),
        bank_account_id: second.id.clone(),
        amount: amount("9999.00"),
        date: fixed_today(),
        source: "Bonus".to_string(),
        frequency: Frequency::OneTime,
        created_at: Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap(),
    };
    store
        .create_or_replace(
            EntityKind::Income,
            OWNER,
            &foreign.id,
            serde_json::to_value(&foreign).expect("Should serialize income"),
        )
        .await
        .expect("Remote write should succeed");

    coordinator
        .process_pending_snapshots()
        .await
        .expect("Snapshots should apply");
    let account = coordinator.selected_account().expect("Account selected");
    assert_eq!(account.id, first.id);
    assert_eq!(account.total_income, amount("100.00"));
    assert!(coordinator
        .incomes()
        .iter()
        .all(|tracked| tracked.entity.bank_account_id == first.id));
}

/// Validation failures reject the mutation before the working set or the
/// store see anything.
#[tokio::test]
async fn test_validation_rejects_before_mutation() {
    let (mut coordinator, store) = new_session();
    coordinator
        .add_bank_account(account_request("Checking", "0"))
        .await
        .expect("Should create account");

    let result = coordinator.add_income(income_request("-5.00")).await;
    assert!(matches!(
        result,
        Err(CoordinatorError::Validation(
            ValidationError::NegativeAmount { .. }
        ))
    ));
    assert!(coordinator.incomes().is_empty());
    let stored = store
        .list_for_owner(EntityKind::Income, OWNER, None)
        .await
        .expect("Should list incomes");
    assert!(stored.is_empty());
}

/// A failed entity persist leaves the working set untouched (atomic reject).
#[tokio::test]
async fn test_storage_failure_leaves_working_set_untouched() {
    let (mut coordinator, store) = new_session();
    coordinator
        .add_bank_account(account_request("Checking", "0"))
        .await
        .expect("Should create account");

    store.fail_next_write();
    let result = coordinator.add_expense(expense_request("100.00", "food")).await;
    assert!(matches!(result, Err(CoordinatorError::Storage(_))));

    assert!(coordinator.expenses().is_empty());
    let account = coordinator.selected_account().expect("Account selected");
    assert_eq!(account.total_expense, Decimal::ZERO);
}

/// Duplicate goal titles discovered at load time are deleted durably,
/// keeping the earliest created goal.
#[tokio::test]
async fn test_duplicate_goals_are_cleaned_at_load() {
    let (mut coordinator, store) = new_session();

    let earliest = SavingsGoal {
        id: "goal-earliest".to_string(),
        owner: OWNER.to_string(),
        title: "Vacation".to_string(),
        target_amount: amount("1000.00"),
        bank_account_id: None,
        auto_tracked_amount: Decimal::ZERO,
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    };
    let duplicate = SavingsGoal {
        id: "goal-duplicate".to_string(),
        title: "VACATION".to_string(),
        created_at: Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
        ..earliest.clone()
    };
    for goal in [&earliest, &duplicate] {
        store
            .create_or_replace(
                EntityKind::SavingsGoal,
                OWNER,
                &goal.id,
                serde_json::to_value(goal).expect("Should serialize goal"),
            )
            .await
            .expect("Should seed goal");
    }

    coordinator.load_session().await.expect("Session should load");

    assert_eq!(coordinator.savings_goals().len(), 1);
    assert_eq!(coordinator.savings_goals()[0].id, earliest.id);
    let stored = store
        .list_for_owner(EntityKind::SavingsGoal, OWNER, None)
        .await
        .expect("Should list goals");
    assert_eq!(stored.len(), 1);
}

/// A snapshot carrying a malformed document is rejected wholesale; the
/// working set keeps its previous contents.
#[tokio::test]
async fn test_malformed_snapshot_is_rejected() {
    let (mut coordinator, _store) = new_session();
    coordinator
        .add_bank_account(account_request("Checking", "0"))
        .await
        .expect("Should create account");
    coordinator
        .add_expense(expense_request("100.00", "food"))
        .await
        .expect("Should add expense");

    let selected = coordinator
        .selected_account()
        .expect("Account selected")
        .id
        .clone();
    let result = coordinator
        .apply_snapshot(Snapshot {
            kind: EntityKind::Expense,
            account_id: selected,
            documents: vec![json!({"unexpected": "shape"})],
        })
        .await;
    assert!(matches!(
        result,
        Err(CoordinatorError::Validation(
            ValidationError::MalformedDocument { .. }
        ))
    ));
    assert_eq!(coordinator.expenses().len(), 1);
}

#[tokio::test]
async fn test_selecting_an_unknown_account_fails() {
    let (mut coordinator, _store) = new_session();
    let result = coordinator.set_selected_account(Some("missing")).await;
    assert!(matches!(
        result,
        Err(CoordinatorError::UnknownEntity {
            kind: EntityKind::BankAccount,
            ..
        })
    ));
}
