// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! How a pushed operation ended, reported back to whoever pushed it.
//!
//! Subscribers only ever see accepted results. The [`Ticket`] returned by `push`
//! is the side door for callers that want to know *why* nothing was delivered.

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::channel::oneshot;

/// Final outcome of one pushed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Its value was forwarded to the key's subscribers.
    Delivered,
    /// It failed or panicked while current and the failure was forwarded to subscribers.
    FailureSurfaced,
    /// It failed or panicked while current and the failure was logged and dropped.
    FailureDropped,
    /// A newer operation was pushed for the key before it settled.
    Superseded,
    /// It was dropped before settling (supersede policy `Cancel`, or runtime shutdown).
    Cancelled,
    /// The key was released before it settled.
    Released,
}

impl Settlement {
    /// `true` if subscribers observed something from this operation.
    #[must_use]
    pub const fn reached_subscribers(self) -> bool {
        matches!(self, Self::Delivered | Self::FailureSurfaced)
    }
}

/// Awaitable receipt for a pushed operation.
///
/// Dropping a ticket has no effect on the operation.
#[derive(Debug)]
pub struct Ticket {
    key: String,
    sequence: u64,
    rx: oneshot::Receiver<Settlement>,
}

impl Ticket {
    pub(crate) fn new(key: String, sequence: u64, rx: oneshot::Receiver<Settlement>) -> Self {
        Self { key, sequence, rx }
    }

    /// Key the operation was pushed under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Sequence number assigned to the operation at push time.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl Future for Ticket {
    type Output = Settlement;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Settlement> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(settlement)) => Poll::Ready(settlement),
            // The task never reported back: its runtime shut down first
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Settlement::Cancelled),
            Poll::Pending => Poll::Pending,
        }
    }
}
