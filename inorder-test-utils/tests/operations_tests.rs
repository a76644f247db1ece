// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use inorder_test_utils::test_data::{result_rus, result_rust};
use inorder_test_utils::{delayed, delayed_failure, delayed_ok, gated, Recorder, TestError};
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn delayed_settles_after_its_delay() {
    let start = Instant::now();

    let value = delayed(result_rust(), 250).await;

    assert_eq!(value, result_rust());
    assert!(start.elapsed() >= Duration::from_millis(250));
}

#[tokio::test(start_paused = true)]
async fn delayed_failure_yields_test_error() {
    let outcome = delayed_failure::<u32>("backend down", 10).await;

    assert_eq!(outcome, Err(TestError::new("backend down")));
    assert_eq!(delayed_ok(5, 10).await, Ok(5));
}

#[tokio::test(start_paused = true)]
async fn gated_waits_for_gate() -> anyhow::Result<()> {
    let (gate, operation) = gated(result_rus());
    let task = tokio::spawn(operation);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(!task.is_finished());

    gate.open();
    assert_eq!(task.await?, result_rus());
    Ok(())
}

#[test]
fn recorder_clones_share_storage() {
    let recorder = Recorder::<u32>::new();
    let on_value = recorder.clone().on_value();

    on_value(1);
    on_value(2);

    assert_eq!(recorder.values(), vec![1, 2]);
    assert!(recorder.failures().is_empty());
    assert!(!recorder.is_empty());
}
