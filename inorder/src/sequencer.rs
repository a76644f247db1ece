// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Latest-wins arbitration for a single key.
//!
//! Every `push` synchronously installs a new sequence number into the key's
//! [`PendingSlot`] and spawns the operation. When the operation settles, the
//! sequencer checks the slot: only the operation that is still current forwards
//! its outcome to the [`ResultChannel`]. Everything else is discarded.
//!
//! Issuance order picks the winner; completion order only decides when the
//! winner's value shows up.

use crate::config::{FailurePolicy, SupersedePolicy};
use crate::pending_slot::PendingSlot;
use crate::settlement::{Settlement, Ticket};
use crate::stats::{Counters, KeyStats};
use crate::SequencerConfig;
use core::convert::Infallible;
use core::future::Future;
use futures::channel::oneshot;
use futures::FutureExt;
use inorder_core::{CancellationToken, InOrderError, IntoInOrderError, Result, ResultChannel};
use parking_lot::ReentrantMutex;
use std::any::Any;
use std::error::Error as StdError;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Pending slot and result channel of one key, plus the logic tying them together.
///
/// Usually obtained through a [`KeyRegistry`](crate::KeyRegistry); it can also be
/// used standalone when only one key is needed.
pub struct Sequencer<T: Clone + Send + 'static> {
    key: String,
    slot: PendingSlot,
    channel: ResultChannel<T>,
    config: SequencerConfig,
    counters: Counters,
    // Serializes settlement against release. Held while subscriber callbacks
    // run; re-entrant so they may push or release on their own key.
    delivery: ReentrantMutex<()>,
}

impl<T: Clone + Send + 'static> Sequencer<T> {
    /// Creates an active sequencer with a settled placeholder and no subscribers.
    pub fn new(key: impl Into<String>, config: SequencerConfig) -> Arc<Self> {
        Arc::new(Self {
            key: key.into(),
            slot: PendingSlot::new(),
            channel: ResultChannel::new(),
            config,
            counters: Counters::default(),
            delivery: ReentrantMutex::new(()),
        })
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The key's multicast result channel.
    #[must_use]
    pub fn results(&self) -> ResultChannel<T> {
        self.channel.clone()
    }

    #[must_use]
    pub fn current_sequence(&self) -> u64 {
        self.slot.current()
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.slot.is_released()
    }

    /// `true` while the current operation is still running.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.slot.has_pending()
    }

    /// `true` until a newer operation supersedes `ticket`'s, or the key is released.
    #[must_use]
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.key() == self.key && self.slot.is_current(ticket.sequence())
    }

    #[must_use]
    pub fn stats(&self) -> KeyStats {
        self.counters.snapshot(self.slot.current())
    }

    /// Pushes an infallible operation. See [`Sequencer::try_push`].
    ///
    /// # Errors
    ///
    /// Same as [`Sequencer::try_push`].
    pub fn push<Fut>(self: &Arc<Self>, operation: Fut) -> Result<Ticket>
    where
        Fut: Future<Output = T> + Send + 'static,
    {
        self.try_push(async move { Ok::<T, Infallible>(operation.await) })
    }

    /// Makes `operation` the current one for this key and starts driving it.
    ///
    /// The previous operation is superseded before this returns. The operation is
    /// spawned on the ambient tokio runtime.
    ///
    /// # Errors
    ///
    /// - `InOrderError::NoRuntime` when called outside a tokio runtime
    /// - `InOrderError::KeyReleased` when the key has been released
    pub fn try_push<Fut, E>(self: &Arc<Self>, operation: Fut) -> Result<Ticket>
    where
        Fut: Future<Output = core::result::Result<T, E>> + Send + 'static,
        E: StdError + Send + Sync + 'static,
    {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| InOrderError::NoRuntime)?;

        let token = CancellationToken::new();
        let installed = self
            .slot
            .install(token.clone())
            .ok_or_else(|| InOrderError::key_released(self.key.as_str()))?;
        self.counters.record_push();

        if let Some(previous) = installed.previous {
            trace!(
                "key '{}': operation #{} supersedes an in-flight operation",
                self.key,
                installed.sequence
            );
            if self.config.supersede_policy == SupersedePolicy::Cancel {
                previous.cancel();
            }
        }

        let sequence = installed.sequence;
        let (tx, rx) = oneshot::channel();
        let sequencer = Arc::clone(self);

        runtime.spawn(async move {
            let guarded = AssertUnwindSafe(operation).catch_unwind();
            let settlement = match token.run_until_cancelled(guarded).await {
                Some(Ok(outcome)) => sequencer.settle(
                    sequence,
                    outcome.map_err(|e| e.into_operation_failure(&sequencer.key)),
                ),
                Some(Err(payload)) => sequencer.settle(
                    sequence,
                    Err(InOrderError::operation_panicked(
                        sequencer.key.as_str(),
                        panic_message(&*payload),
                    )),
                ),
                None => sequencer.settle_cancelled(sequence),
            };
            // The caller may have dropped its ticket
            let _ = tx.send(settlement);
        });

        Ok(Ticket::new(self.key.clone(), sequence, rx))
    }

    fn settle(&self, sequence: u64, outcome: Result<T>) -> Settlement {
        let _delivery = self.delivery.lock();

        let settlement = if self.slot.is_released() {
            Settlement::Released
        } else if !self.slot.complete(sequence) {
            trace!("key '{}': discarding superseded operation #{}", self.key, sequence);
            Settlement::Superseded
        } else {
            self.forward(outcome)
        };

        self.counters.record(settlement);
        settlement
    }

    fn forward(&self, outcome: Result<T>) -> Settlement {
        let (sent, delivered) = match outcome {
            Ok(value) => (self.channel.next(value), Settlement::Delivered),
            Err(error) => match self.config.failure_policy {
                FailurePolicy::Surface => (self.channel.error(error), Settlement::FailureSurfaced),
                FailurePolicy::Drop => {
                    warn!("key '{}': dropping failed operation: {}", self.key, error);
                    return Settlement::FailureDropped;
                }
            },
        };

        match sent {
            Ok(()) => delivered,
            Err(closed) => {
                debug!("key '{}': {}", self.key, closed);
                Settlement::Released
            }
        }
    }

    fn settle_cancelled(&self, sequence: u64) -> Settlement {
        let _delivery = self.delivery.lock();
        let settlement = if self.slot.is_released() {
            Settlement::Released
        } else {
            // A cancelled operation is superseded or released by construction
            self.slot.complete(sequence);
            Settlement::Cancelled
        };
        self.counters.record(settlement);
        settlement
    }

    /// Releases the key: closes the result channel, refuses further pushes and,
    /// under [`SupersedePolicy::Cancel`], cancels the in-flight operation.
    ///
    /// Once this returns, no subscriber attached before the release receives
    /// anything else. Idempotent.
    ///
    /// Waits for a delivery in progress on this key to finish. A subscriber
    /// callback may release its own key, but must not release another key
    /// whose callbacks can in turn release this one: the two deliveries would
    /// wait on each other.
    pub fn release(&self) {
        let _delivery = self.delivery.lock();
        if self.slot.is_released() {
            return;
        }

        if let Some(in_flight) = self.slot.release() {
            if self.config.supersede_policy == SupersedePolicy::Cancel {
                in_flight.cancel();
            }
        }
        self.channel.close();
        debug!("key '{}' released", self.key);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

impl<T: Clone + Send + 'static> core::fmt::Debug for Sequencer<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Sequencer")
            .field("key", &self.key)
            .field("slot", &self.slot)
            .field("channel", &self.channel)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
