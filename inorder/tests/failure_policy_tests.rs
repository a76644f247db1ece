// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use inorder::{FailurePolicy, InOrderError, KeyRegistry, SequencerConfig, Settlement};
use inorder_test_utils::{
    assert_no_element_emitted, delayed_failure, delayed_ok, expect_next_error, expect_next_value,
    Recorder,
};
use std::error::Error;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
#[error("search backend unavailable")]
struct BackendUnavailable;

#[tokio::test(start_paused = true)]
async fn current_failure_is_surfaced_by_default() -> anyhow::Result<()> {
    // Arrange
    let registry = KeyRegistry::<u32>::new();
    let handle = registry.subscribe("k");
    let mut results = handle.results().subscribe()?;

    // Act
    let ticket = handle.try_push(async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Err::<u32, _>(BackendUnavailable)
    })?;

    // Assert
    assert_eq!(ticket.await, Settlement::FailureSurfaced);
    let error = expect_next_error(&mut results).await;
    assert!(matches!(error, InOrderError::OperationFailed { ref key, .. } if key == "k"));
    assert_eq!(
        error.source().map(|source| source.to_string()),
        Some("search backend unavailable".to_string())
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn failure_does_not_close_the_key() -> anyhow::Result<()> {
    // Arrange
    let registry = KeyRegistry::<u32>::new();
    let handle = registry.subscribe("k");
    let mut results = handle.results().subscribe()?;

    // Act
    handle.try_push(delayed_failure::<u32>("first attempt", 10))?.await;
    handle.try_push(delayed_ok(2, 10))?.await;

    // Assert
    expect_next_error(&mut results).await;
    expect_next_value(&mut results, 2).await;
    assert!(!handle.is_released());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn superseded_failure_is_discarded_silently() -> anyhow::Result<()> {
    // Arrange
    let registry = KeyRegistry::<u32>::new();
    let recorder = Recorder::new();
    let handle = registry.subscribe_with_error("k", recorder.on_value(), recorder.on_error());

    // Act
    let failing = handle.try_push(delayed_failure::<u32>("stale failure", 10))?;
    let winning = handle.try_push(delayed_ok(1, 100))?;

    // Assert
    assert_eq!(failing.await, Settlement::Superseded);
    assert_eq!(winning.await, Settlement::Delivered);
    assert_eq!(recorder.values(), vec![1]);
    assert!(recorder.failures().is_empty());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn error_callback_receives_surfaced_failure() -> anyhow::Result<()> {
    // Arrange
    let registry = KeyRegistry::<u32>::new();
    let recorder = Recorder::new();
    let handle = registry.subscribe_with_error("k", recorder.on_value(), recorder.on_error());

    // Act
    handle.try_push(delayed_failure::<u32>("boom", 10))?.await;

    // Assert
    assert!(recorder.values().is_empty());
    let failures = recorder.failures();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].to_string().contains("boom"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn value_only_subscriber_skips_failures() -> anyhow::Result<()> {
    // Arrange
    let registry = KeyRegistry::<u32>::new();
    let recorder = Recorder::new();
    let handle = registry.subscribe_with("k", recorder.on_value());

    // Act
    let ticket = handle.try_push(delayed_failure::<u32>("boom", 10))?;

    // Assert
    assert_eq!(ticket.await, Settlement::FailureSurfaced);
    assert!(recorder.is_empty());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn drop_policy_delivers_nothing_on_failure() -> anyhow::Result<()> {
    // Arrange
    let registry = KeyRegistry::<u32>::with_config(
        SequencerConfig::new().with_failure_policy(FailurePolicy::Drop),
    );
    let handle = registry.subscribe("k");
    let mut results = handle.results().subscribe()?;

    // Act
    let ticket = handle.try_push(delayed_failure::<u32>("ignored", 10))?;

    // Assert
    assert_eq!(ticket.await, Settlement::FailureDropped);
    assert_no_element_emitted(&mut results, 1_000).await;
    assert_eq!(registry.stats("k").map(|s| s.failed), Some(1));
    Ok(())
}

async fn panics_after(delay_ms: u64, message: &'static str) -> u32 {
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    panic!("{message}")
}

#[tokio::test(start_paused = true)]
async fn current_panic_is_surfaced_as_failure() -> anyhow::Result<()> {
    // Arrange
    let registry = KeyRegistry::<u32>::new();
    let handle = registry.subscribe("k");
    let mut results = handle.stream()?;

    // Act
    let ticket = handle.push(panics_after(10, "index out of bounds"))?;

    // Assert
    assert_eq!(ticket.await, Settlement::FailureSurfaced);
    let error = expect_next_error(&mut results).await;
    assert!(matches!(
        error,
        InOrderError::OperationPanicked { ref key, ref message }
            if key == "k" && message == "index out of bounds"
    ));
    assert!(!handle.has_pending());
    assert_eq!(registry.stats("k").map(|s| s.failed), Some(1));
    assert_eq!(registry.stats("k").map(|s| s.cancelled), Some(0));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn key_keeps_working_after_a_panic() -> anyhow::Result<()> {
    // Arrange
    let registry = KeyRegistry::<u32>::new();
    let recorder = Recorder::new();
    let handle = registry.subscribe_with_error("k", recorder.on_value(), recorder.on_error());

    // Act
    handle.push(panics_after(10, "boom"))?.await;
    handle.try_push(delayed_ok(5, 10))?.await;

    // Assert
    assert_eq!(recorder.values(), vec![5]);
    assert_eq!(recorder.failures().len(), 1);
    assert!(!handle.is_released());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn drop_policy_swallows_panics() -> anyhow::Result<()> {
    // Arrange
    let registry = KeyRegistry::<u32>::with_config(
        SequencerConfig::new().with_failure_policy(FailurePolicy::Drop),
    );
    let handle = registry.subscribe("k");
    let mut results = handle.stream()?;

    // Act
    let ticket = handle.push(panics_after(10, "ignored"))?;

    // Assert
    assert_eq!(ticket.await, Settlement::FailureDropped);
    assert_no_element_emitted(&mut results, 1_000).await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn superseded_panic_is_discarded() -> anyhow::Result<()> {
    // Arrange
    let registry = KeyRegistry::<u32>::new();
    let recorder = Recorder::new();
    let handle = registry.subscribe_with_error("k", recorder.on_value(), recorder.on_error());

    // Act
    let stale = handle.push(panics_after(10, "stale"))?;
    let fresh = handle.push(async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        7
    })?;

    // Assert
    assert_eq!(stale.await, Settlement::Superseded);
    assert_eq!(fresh.await, Settlement::Delivered);
    assert_eq!(recorder.values(), vec![7]);
    assert!(recorder.failures().is_empty());
    Ok(())
}
