// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use inorder::{KeyRegistry, SequencerConfig, Settlement, SupersedePolicy};
use inorder_test_utils::{delayed, Recorder};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn finishing_flag(
    delay_ms: u64,
    value: u32,
) -> (Arc<AtomicBool>, impl std::future::Future<Output = u32>) {
    let finished = Arc::new(AtomicBool::new(false));
    let flag = finished.clone();
    let operation = async move {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        flag.store(true, Ordering::SeqCst);
        value
    };
    (finished, operation)
}

#[tokio::test(start_paused = true)]
async fn discard_policy_lets_superseded_work_finish() -> anyhow::Result<()> {
    // Arrange
    let registry = KeyRegistry::<u32>::new();
    let recorder = Recorder::new();
    let handle = registry.subscribe_with("k", recorder.on_value());
    let (finished, slow) = finishing_flag(500, 1);

    // Act
    let stale = handle.push(slow)?;
    handle.push(delayed(2, 10))?.await;

    // Assert
    assert_eq!(stale.await, Settlement::Superseded);
    assert!(finished.load(Ordering::SeqCst));
    assert_eq!(recorder.values(), vec![2]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn cancel_policy_drops_superseded_work() -> anyhow::Result<()> {
    // Arrange
    let registry = KeyRegistry::<u32>::with_config(
        SequencerConfig::new().with_supersede_policy(SupersedePolicy::Cancel),
    );
    let recorder = Recorder::new();
    let handle = registry.subscribe_with("k", recorder.on_value());
    let (finished, slow) = finishing_flag(500, 1);

    // Act
    let stale = handle.push(slow)?;
    let fresh = handle.push(delayed(2, 10))?;

    // Assert
    assert_eq!(stale.await, Settlement::Cancelled);
    assert_eq!(fresh.await, Settlement::Delivered);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(!finished.load(Ordering::SeqCst));
    assert_eq!(recorder.values(), vec![2]);
    assert_eq!(registry.stats("k").map(|s| s.cancelled), Some(1));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn cancel_policy_stops_in_flight_work_on_release() -> anyhow::Result<()> {
    // Arrange
    let registry = KeyRegistry::<u32>::with_config(
        SequencerConfig::new().with_supersede_policy(SupersedePolicy::Cancel),
    );
    let handle = registry.subscribe("k");
    let (finished, slow) = finishing_flag(500, 1);
    let ticket = handle.push(slow)?;

    // Act
    registry.unsubscribe("k");

    // Assert
    assert_eq!(ticket.await, Settlement::Released);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(!finished.load(Ordering::SeqCst));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn cancel_policy_keeps_delivery_semantics() -> anyhow::Result<()> {
    // Arrange
    let registry = KeyRegistry::<u32>::with_config(
        SequencerConfig::new().with_supersede_policy(SupersedePolicy::Cancel),
    );
    let recorder = Recorder::new();
    let handle = registry.subscribe_with("k", recorder.on_value());

    // Act: the single operation is never superseded, so it still delivers
    let ticket = handle.push(delayed(9, 100))?;

    // Assert
    assert_eq!(ticket.await, Settlement::Delivered);
    assert_eq!(recorder.values(), vec![9]);
    Ok(())
}
