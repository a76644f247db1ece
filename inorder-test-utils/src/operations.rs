// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::future::Future;
use futures::channel::oneshot;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Test error: {0}")]
pub struct TestError(pub String);

impl TestError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Settles with `value` after `delay_ms`. Deterministic under `tokio::time::pause`.
pub fn delayed<T>(value: T, delay_ms: u64) -> impl Future<Output = T> + Send + 'static
where
    T: Send + 'static,
{
    async move {
        sleep(Duration::from_millis(delay_ms)).await;
        value
    }
}

/// Fallible flavour of [`delayed`] that succeeds.
pub fn delayed_ok<T>(
    value: T,
    delay_ms: u64,
) -> impl Future<Output = Result<T, TestError>> + Send + 'static
where
    T: Send + 'static,
{
    async move {
        sleep(Duration::from_millis(delay_ms)).await;
        Ok(value)
    }
}

/// Settles with a [`TestError`] after `delay_ms`.
pub fn delayed_failure<T>(
    message: &str,
    delay_ms: u64,
) -> impl Future<Output = Result<T, TestError>> + Send + 'static
where
    T: Send + 'static,
{
    let error = TestError::new(message);
    async move {
        sleep(Duration::from_millis(delay_ms)).await;
        Err(error)
    }
}

/// Releases a [`gated`] operation.
#[derive(Debug)]
pub struct Gate {
    tx: oneshot::Sender<()>,
}

impl Gate {
    /// Let the gated operation settle.
    pub fn open(self) {
        let _ = self.tx.send(());
    }
}

/// An operation that settles with `value` only once its [`Gate`] is opened.
///
/// Dropping the gate without opening it leaves the operation pending forever.
pub fn gated<T>(value: T) -> (Gate, impl Future<Output = T> + Send + 'static)
where
    T: Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    let operation = async move {
        if rx.await.is_err() {
            futures::future::pending::<()>().await;
        }
        value
    };
    (Gate { tx }, operation)
}
