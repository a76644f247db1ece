// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::settlement::Ticket;
use crate::Sequencer;
use core::future::Future;
use inorder_core::{Result, ResultChannel, ResultStream};
use std::error::Error as StdError;
use std::sync::Arc;

/// What [`KeyRegistry::subscribe`](crate::KeyRegistry::subscribe) hands back:
/// a way to push operations for a key and the key's result channel.
///
/// Handles are cheap to clone. All handles obtained for a key while it stays
/// active share the same pending slot and channel. Once the key is released,
/// its handles are dead for good: `push` fails with
/// [`InOrderError::KeyReleased`](inorder_core::InOrderError::KeyReleased).
pub struct SubscribeHandle<T: Clone + Send + 'static> {
    sequencer: Arc<Sequencer<T>>,
}

impl<T: Clone + Send + 'static> SubscribeHandle<T> {
    pub(crate) fn new(sequencer: Arc<Sequencer<T>>) -> Self {
        Self { sequencer }
    }

    /// Push an operation; it supersedes every operation pushed before it.
    ///
    /// # Errors
    ///
    /// `KeyReleased` if the key was released, `NoRuntime` outside a tokio runtime.
    pub fn push<Fut>(&self, operation: Fut) -> Result<Ticket>
    where
        Fut: Future<Output = T> + Send + 'static,
    {
        self.sequencer.push(operation)
    }

    /// Push a fallible operation. Its failure is handled per the registry's
    /// [`FailurePolicy`](crate::FailurePolicy).
    ///
    /// # Errors
    ///
    /// `KeyReleased` if the key was released, `NoRuntime` outside a tokio runtime.
    pub fn try_push<Fut, E>(&self, operation: Fut) -> Result<Ticket>
    where
        Fut: Future<Output = core::result::Result<T, E>> + Send + 'static,
        E: StdError + Send + Sync + 'static,
    {
        self.sequencer.try_push(operation)
    }

    /// The key's result channel; subscribe to it as a stream or with callbacks.
    #[must_use]
    pub fn results(&self) -> ResultChannel<T> {
        self.sequencer.results()
    }

    /// Subscribe to the key's results as a stream.
    ///
    /// # Errors
    ///
    /// `ChannelClosed` if the key has been released.
    pub fn stream(&self) -> Result<ResultStream<T>> {
        self.sequencer
            .results()
            .subscribe()
            .map_err(|closed| closed.for_key(self.key()))
    }

    #[must_use]
    pub fn key(&self) -> &str {
        self.sequencer.key()
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.sequencer.is_released()
    }

    #[must_use]
    pub fn current_sequence(&self) -> u64 {
        self.sequencer.current_sequence()
    }

    /// `true` while the key's current operation is still running.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.sequencer.has_pending()
    }

    /// `true` until a newer operation is pushed for the key or the key is released.
    #[must_use]
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.sequencer.is_current(ticket)
    }

    /// `true` if both handles are bound to the same pending slot and channel.
    #[must_use]
    pub fn same_key_state(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.sequencer, &other.sequencer)
    }
}

impl<T: Clone + Send + 'static> Clone for SubscribeHandle<T> {
    fn clone(&self) -> Self {
        Self {
            sequencer: Arc::clone(&self.sequencer),
        }
    }
}

impl<T: Clone + Send + 'static> core::fmt::Debug for SubscribeHandle<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SubscribeHandle")
            .field("key", &self.key())
            .field("released", &self.is_released())
            .finish()
    }
}
