// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! One-shot cancellation signal for in-flight operations.
//!
//! The sequencer hands a token to every operation it spawns. Under the
//! `Cancel` supersede policy the previous operation's token fires as soon as a
//! newer one is pushed, and the operation future is dropped at its next
//! suspension point. Releasing a key fires the token of whatever is in flight.

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use event_listener::{Event, EventListener};
use futures::future::{self, Either};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared, clonable cancellation flag. Firing any clone fires them all.
///
/// ```
/// use inorder_core::CancellationToken;
///
/// # #[tokio::main]
/// # async fn main() {
/// let token = CancellationToken::new();
/// let watched = token.clone();
/// let watcher = tokio::spawn(async move { watched.cancelled().await });
///
/// token.cancel();
/// assert!(watcher.await.is_ok());
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    shared: Arc<Shared>,
}

#[derive(Debug, Default)]
struct Shared {
    fired: AtomicBool,
    wakeup: Event,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the token and wake every waiter. Firing twice is harmless.
    pub fn cancel(&self) {
        // Store before notify: woken waiters re-check the flag
        self.shared.fired.store(true, Ordering::Release);
        self.shared.wakeup.notify(usize::MAX);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.shared.fired.load(Ordering::Acquire)
    }

    /// Resolves once the token has fired; immediately if it already has.
    pub fn cancelled(&self) -> Cancelled<'_> {
        Cancelled {
            token: self,
            waiting: None,
        }
    }

    /// Race `operation` against the token.
    ///
    /// `Some(output)` if the operation finished first. `None` if the token
    /// fired first, in which case the operation has been dropped unfinished.
    ///
    /// ```
    /// use inorder_core::CancellationToken;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let token = CancellationToken::new();
    /// token.cancel();
    ///
    /// let outcome = token.run_until_cancelled(std::future::pending::<u32>()).await;
    /// assert_eq!(outcome, None);
    /// # }
    /// ```
    pub async fn run_until_cancelled<F>(&self, operation: F) -> Option<F::Output>
    where
        F: Future,
    {
        if self.is_cancelled() {
            return None;
        }

        let operation = core::pin::pin!(operation);
        match future::select(operation, self.cancelled()).await {
            Either::Left((output, _)) => Some(output),
            Either::Right(((), _)) => None,
        }
    }
}

/// Future behind [`CancellationToken::cancelled`].
#[derive(Debug)]
pub struct Cancelled<'a> {
    token: &'a CancellationToken,
    waiting: Option<EventListener>,
}

impl Future for Cancelled<'_> {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        while !self.token.is_cancelled() {
            let Some(listener) = self.waiting.as_mut() else {
                // Listen first, then loop back to the flag: a cancel() landing
                // in between is still observed
                self.waiting = Some(self.token.shared.wakeup.listen());
                continue;
            };

            if Pin::new(listener).poll(cx).is_pending() {
                return Poll::Pending;
            }
            self.waiting = None;
        }
        Poll::Ready(())
    }
}
