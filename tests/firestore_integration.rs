// SPDX-License-Identifier: MIT

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running.
//! Run with: ./scripts/test-with-emulator.sh
//!
//! The emulator provides a clean state for each test run.

use hsa_ledger::models::{
    AccountType, BankTokens, ExpenseCategory, ExpenseRecord, ProfileParameters, User,
};

mod common;
use common::test_db;

/// Generate a unique user ID for test isolation.
fn unique_user_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("test-user-{}", nanos)
}

fn test_user(user_id: &str) -> User {
    User {
        user_id: user_id.to_string(),
        email: Some("test@example.com".to_string()),
        name: "Test User".to_string(),
        picture: None,
        created_at: "2026-01-15T10:00:00Z".to_string(),
        last_active: "2026-01-15T10:00:00Z".to_string(),
        deletion_requested_at: None,
    }
}

fn test_expense(user_id: &str, suffix: &str, date: &str, amount: f64) -> ExpenseRecord {
    ExpenseRecord {
        id: format!("{}-exp-{}", user_id, suffix),
        user_id: user_id.to_string(),
        description: "Integration test expense".to_string(),
        amount,
        date_of_service: date.to_string(),
        date_of_service_end: None,
        tax_year: None,
        reimbursed: false,
        reimbursed_amount: None,
        reimbursed_date: None,
        account_type: AccountType::Hsa,
        category: ExpenseCategory::Medical,
        receipt_urls: vec![],
        eob_urls: vec![],
        invoice_urls: vec![],
        statement_urls: vec![],
        created_at: "2026-01-15T10:00:00Z".to_string(),
        updated_at: "2026-01-15T10:00:00Z".to_string(),
    }
}

#[tokio::test]
async fn test_user_roundtrip() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();

    let before = db.get_user(&user_id).await.unwrap();
    assert!(before.is_none(), "User should not exist before creation");

    let user = test_user(&user_id);
    db.upsert_user(&user).await.unwrap();

    let fetched = db.get_user(&user_id).await.unwrap().unwrap();
    assert_eq!(fetched.user_id, user_id);
    assert_eq!(fetched.name, "Test User");
    assert_eq!(fetched.email, Some("test@example.com".to_string()));
}

#[tokio::test]
async fn test_profile_roundtrip_and_update() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();

    assert!(db.get_profile(&user_id).await.unwrap().is_none());

    let mut profile = ProfileParameters {
        current_balance: 5000.0,
        annual_contribution: 4150.0,
        annual_return_pct: 7.0,
        time_horizon_years: 20,
        federal_tax_pct: 22.0,
        state_tax_pct: 5.0,
    };
    db.set_profile(&user_id, &profile).await.unwrap();

    let fetched = db.get_profile(&user_id).await.unwrap().unwrap();
    assert_eq!(fetched.current_balance, 5000.0);
    assert_eq!(fetched.time_horizon_years, 20);

    // Overwrite in place
    profile.current_balance = 6200.5;
    db.set_profile(&user_id, &profile).await.unwrap();

    let updated = db.get_profile(&user_id).await.unwrap().unwrap();
    assert_eq!(updated.current_balance, 6200.5);
}

#[tokio::test]
async fn test_expense_listing_is_scoped_and_ordered() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();
    let other_id = unique_user_id();

    db.set_expense(&test_expense(&user_id, "a", "2026-01-10", 100.0))
        .await
        .unwrap();
    db.set_expense(&test_expense(&user_id, "b", "2026-03-05", 200.0))
        .await
        .unwrap();
    db.set_expense(&test_expense(&user_id, "c", "2025-11-20", 300.0))
        .await
        .unwrap();
    db.set_expense(&test_expense(&other_id, "d", "2026-02-01", 400.0))
        .await
        .unwrap();

    let expenses = db.list_expenses_for_user(&user_id, None).await.unwrap();
    assert_eq!(expenses.len(), 3, "Must not see the other user's expense");

    let dates: Vec<&str> = expenses.iter().map(|e| e.date_of_service.as_str()).collect();
    assert_eq!(dates, vec!["2026-03-05", "2026-01-10", "2025-11-20"]);

    let limited = db.list_expenses_for_user(&user_id, Some(2)).await.unwrap();
    assert_eq!(limited.len(), 2);
}

#[tokio::test]
async fn test_expense_delete() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();

    let expense = test_expense(&user_id, "del", "2026-01-10", 50.0);
    db.set_expense(&expense).await.unwrap();
    assert!(db.get_expense(&expense.id).await.unwrap().is_some());

    db.delete_expense(&expense.id).await.unwrap();
    assert!(db.get_expense(&expense.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_bank_tokens_roundtrip() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();

    assert!(db.get_bank_tokens(&user_id).await.unwrap().is_none());

    let tokens = BankTokens {
        access_token: "access-sandbox-123".to_string(),
        item_id: "item-456".to_string(),
        linked_at: "2026-01-15T10:00:00Z".to_string(),
    };
    db.set_bank_tokens(&user_id, &tokens).await.unwrap();

    let fetched = db.get_bank_tokens(&user_id).await.unwrap().unwrap();
    assert_eq!(fetched.access_token, "access-sandbox-123");
    assert_eq!(fetched.item_id, "item-456");

    db.delete_bank_tokens(&user_id).await.unwrap();
    assert!(db.get_bank_tokens(&user_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_user_data_removes_everything() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();

    db.upsert_user(&test_user(&user_id)).await.unwrap();
    db.set_profile(&user_id, &ProfileParameters::default())
        .await
        .unwrap();
    db.set_bank_tokens(
        &user_id,
        &BankTokens {
            access_token: "tok".to_string(),
            item_id: "item".to_string(),
            linked_at: "2026-01-15T10:00:00Z".to_string(),
        },
    )
    .await
    .unwrap();
    for i in 0..5 {
        db.set_expense(&test_expense(
            &user_id,
            &i.to_string(),
            "2026-01-10",
            10.0 * (i + 1) as f64,
        ))
        .await
        .unwrap();
    }

    let deleted = db.delete_user_data(&user_id).await.unwrap();
    assert_eq!(deleted, 5);

    assert!(db.get_user(&user_id).await.unwrap().is_none());
    assert!(db.get_profile(&user_id).await.unwrap().is_none());
    assert!(db.get_bank_tokens(&user_id).await.unwrap().is_none());
    assert!(db
        .list_expenses_for_user(&user_id, None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_delete_user_data_is_idempotent() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();

    // Deleting a user that never existed succeeds with zero expenses
    let deleted = db.delete_user_data(&user_id).await.unwrap();
    assert_eq!(deleted, 0);
}
