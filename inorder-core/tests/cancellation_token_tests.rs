// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use inorder_core::CancellationToken;
use std::time::Duration;

#[test]
fn test_new_token_not_cancelled() {
    assert!(!CancellationToken::new().is_cancelled());
}

#[test]
fn test_cancel_is_idempotent() {
    let token = CancellationToken::new();
    token.cancel();
    token.cancel();
    assert!(token.is_cancelled());
}

#[test]
fn test_clone_shares_state() {
    let token = CancellationToken::new();
    let clone = token.clone();

    clone.cancel();

    assert!(token.is_cancelled());
}

#[tokio::test]
async fn test_cancelled_wakes_waiter() -> anyhow::Result<()> {
    let token = CancellationToken::new();
    let waiter = {
        let token = token.clone();
        tokio::spawn(async move { token.cancelled().await })
    };

    tokio::task::yield_now().await;
    token.cancel();

    tokio::time::timeout(Duration::from_secs(1), waiter).await??;
    Ok(())
}

#[tokio::test]
async fn test_cancelled_returns_immediately_when_already_cancelled() {
    let token = CancellationToken::new();
    token.cancel();

    token.cancelled().await;
}

#[tokio::test]
async fn test_run_until_cancelled_completes_without_cancel() {
    let token = CancellationToken::new();

    let output = token.run_until_cancelled(async { 42 }).await;

    assert_eq!(output, Some(42));
}

#[tokio::test(start_paused = true)]
async fn test_run_until_cancelled_drops_pending_work() {
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        canceller.cancel();
    });

    let output = token
        .run_until_cancelled(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            "finished"
        })
        .await;

    assert_eq!(output, None);
}
