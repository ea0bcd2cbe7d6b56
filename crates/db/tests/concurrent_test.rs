//! Concurrent access tests for the transfer engine.
//!
//! These run on Postgres with a multi-connection pool, so transactions really
//! overlap. They verify that:
//! - Two concurrent debits that together exceed a balance never both succeed
//! - Many concurrent transfers among a closed set of accounts conserve the total
//! - Opposite transfers between the same pair of accounts never deadlock
//! - No balance is ever negative after commit

#![allow(clippy::items_after_statements)]
#![allow(clippy::cast_possible_wrap)]

mod common;

use std::sync::Arc;

use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::TransactionTrait;
use tokio::sync::Barrier;

use paylane_core::payment::{
    ExternalPaymentRequest, InternalTransferRequest, PaymentError, RecipientDetails,
};
use paylane_db::repositories::{AccountRepository, PaymentRepository};

use common::{balance_of, engine, open_account, setup_db};

fn internal(from: &str, to: &str, amount: Decimal) -> InternalTransferRequest {
    InternalTransferRequest {
        from_account: from.to_string(),
        to_account: to.to_string(),
        amount,
        currency: "USD".to_string(),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_conditional_debit_is_atomic_across_transactions() {
    let db = setup_db().await;
    let account = open_account(&db, "USD", dec!(100.00)).await;

    // Both transactions are open before either debits, without any row lock.
    let barrier = Arc::new(Barrier::new(2));
    let mut handles = Vec::new();
    for _ in 0..2 {
        let db = db.clone();
        let barrier = Arc::clone(&barrier);
        let id = account.id;
        handles.push(tokio::spawn(async move {
            let accounts = AccountRepository::new(db.clone());
            let txn = db.begin().await.expect("Failed to begin");
            barrier.wait().await;
            let rows = accounts
                .conditional_debit(&txn, id, dec!(60.00))
                .await
                .expect("Failed to debit");
            txn.commit().await.expect("Failed to commit");
            rows
        }));
    }

    let rows: u64 = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .sum();

    assert_eq!(rows, 1, "exactly one debit may apply");
    assert_eq!(balance_of(&db, &account).await, dec!(40.00));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_debits_exceeding_balance_exactly_one_wins() {
    let db = setup_db().await;
    let engine = engine(&db);
    let source = open_account(&db, "USD", dec!(100.00)).await;
    let first = open_account(&db, "USD", dec!(0)).await;
    let second = open_account(&db, "USD", dec!(0)).await;

    let barrier = Arc::new(Barrier::new(2));
    let mut handles = Vec::new();
    for target in [&first, &second] {
        let engine = engine.clone();
        let barrier = Arc::clone(&barrier);
        let request = internal(&source.id.to_string(), &target.id.to_string(), dec!(60.00));
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            engine.internal_transfer(&request).await
        }));
    }

    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(PaymentError::InsufficientBalance(id)) if *id == source.id))
        .count();
    assert_eq!(successes, 1, "exactly one debit may win: {results:?}");
    assert_eq!(rejected, 1, "the other must see insufficient balance: {results:?}");

    assert_eq!(balance_of(&db, &source).await, dec!(40.00));
    let credited = balance_of(&db, &first).await + balance_of(&db, &second).await;
    assert_eq!(credited, dec!(60.00));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_external_sends_never_overdraw() {
    let db = setup_db().await;
    let engine = engine(&db);
    let source = open_account(&db, "USD", dec!(500.00)).await;

    const SENDS: usize = 20;
    let barrier = Arc::new(Barrier::new(SENDS));
    let mut handles = Vec::with_capacity(SENDS);
    for _ in 0..SENDS {
        let engine = engine.clone();
        let barrier = Arc::clone(&barrier);
        let request = ExternalPaymentRequest {
            from_account: source.id.to_string(),
            amount: dec!(75.00),
            currency: "USD".to_string(),
            transaction_type: "MOBILE_MONEY".to_string(),
            recipient: RecipientDetails {
                number: "0771234567".to_string(),
                name: "Jane Smith".to_string(),
            },
        };
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            engine.external_payment(&request).await
        }));
    }

    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    // 500 / 75 = 6 sends fit, leaving 50.
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 6);
    assert!(
        results
            .iter()
            .filter(|r| r.is_err())
            .all(|r| matches!(r, Err(PaymentError::InsufficientBalance(_))))
    );
    assert_eq!(balance_of(&db, &source).await, dec!(50.00));
    assert_eq!(
        PaymentRepository::new(db.clone())
            .count_for_account(source.id)
            .await
            .unwrap(),
        6
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_transfers_conserve_total() {
    let db = setup_db().await;
    let engine = engine(&db);

    let mut accounts = Vec::new();
    for _ in 0..4 {
        accounts.push(open_account(&db, "USD", dec!(250.00)).await);
    }
    let total_before = dec!(1000.00);

    const TRANSFERS: usize = 60;
    let mut handles = Vec::with_capacity(TRANSFERS);
    for i in 0..TRANSFERS {
        let from = &accounts[i % accounts.len()];
        // 3i + 1 and i never agree mod 4, so source and destination differ.
        let to = &accounts[(i * 3 + 1) % accounts.len()];
        let engine = engine.clone();
        let amount = Decimal::new(((i % 7) as i64 + 1) * 25, 0) + dec!(0.10);
        let request = internal(&from.id.to_string(), &to.id.to_string(), amount);
        handles.push(tokio::spawn(async move {
            engine.internal_transfer(&request).await
        }));
    }

    for joined in join_all(handles).await {
        match joined.expect("task panicked") {
            Ok(_) | Err(PaymentError::InsufficientBalance(_)) => {}
            Err(other) => panic!("unexpected failure: {other:?}"),
        }
    }

    let mut total_after = Decimal::ZERO;
    for account in &accounts {
        let balance = balance_of(&db, account).await;
        assert!(balance >= Decimal::ZERO, "negative balance: {balance}");
        total_after += balance;
    }
    assert_eq!(total_after, total_before);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_opposite_transfers_do_not_deadlock() {
    let db = setup_db().await;
    let engine = engine(&db);
    let a = open_account(&db, "USD", dec!(1000.00)).await;
    let b = open_account(&db, "USD", dec!(1000.00)).await;

    const TRANSFERS: usize = 40;
    let barrier = Arc::new(Barrier::new(TRANSFERS));
    let mut handles = Vec::with_capacity(TRANSFERS);
    for i in 0..TRANSFERS {
        let (from, to) = if i % 2 == 0 { (&a, &b) } else { (&b, &a) };
        let request = internal(&from.id.to_string(), &to.id.to_string(), dec!(10.01));
        let engine = engine.clone();
        let barrier = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            engine.internal_transfer(&request).await
        }));
    }

    for joined in join_all(handles).await {
        let result = joined.expect("task panicked");
        assert!(result.is_ok(), "opposite transfer failed: {result:?}");
    }

    assert_eq!(balance_of(&db, &a).await, dec!(1000.00));
    assert_eq!(balance_of(&db, &b).await, dec!(1000.00));
}
