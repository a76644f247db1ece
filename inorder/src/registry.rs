// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Key registry: owns one [`Sequencer`] per active key.
//!
//! ## Key lifecycle
//!
//! ```text
//! UNINITIALIZED ──subscribe / push──► ACTIVE ──unsubscribe──► (entry removed)
//!       ▲                                                          │
//!       └──────────────────────────────────────────────────────────┘
//! ```
//!
//! A released key leaves nothing behind: subscribing to it again starts from a
//! fresh pending slot and a fresh channel, with no memory of earlier operations
//! or subscribers.

use crate::handle::SubscribeHandle;
use crate::settlement::Ticket;
use crate::stats::KeyStats;
use crate::{Sequencer, SequencerConfig};
use core::future::Future;
use inorder_core::result_channel::value_callback;
use inorder_core::{InOrderError, Result, StreamItem};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::error::Error as StdError;
use std::sync::Arc;

type ItemCallback<T> = Arc<dyn Fn(StreamItem<T>) + Send + Sync + 'static>;

/// Maps keys to their sequencers, creating them on first use and tearing them
/// down on [`KeyRegistry::unsubscribe`].
///
/// The registry is an ordinary owned value; keep one wherever the results are
/// consumed. Dropping it releases every key.
///
/// # Example
///
/// ```
/// use inorder::KeyRegistry;
/// use futures::StreamExt;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> inorder::Result<()> {
/// let registry = KeyRegistry::<&'static str>::new();
/// let handle = registry.subscribe("search");
/// let mut results = handle.results().subscribe().unwrap();
///
/// // The slow, older request loses even though it finishes last
/// handle.push(async {
///     tokio::time::sleep(Duration::from_millis(50)).await;
///     "stale"
/// })?;
/// handle.push(async { "fresh" })?;
///
/// assert_eq!(results.next().await.unwrap().unwrap(), "fresh");
/// # Ok(())
/// # }
/// ```
pub struct KeyRegistry<T: Clone + Send + 'static> {
    entries: RwLock<HashMap<String, Arc<Sequencer<T>>>>,
    config: SequencerConfig,
}

impl<T: Clone + Send + 'static> KeyRegistry<T> {
    /// Creates an empty registry with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SequencerConfig::default())
    }

    /// Creates an empty registry whose keys all use `config`.
    #[must_use]
    pub fn with_config(config: SequencerConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> SequencerConfig {
        self.config
    }

    fn entry(&self, key: &str) -> Arc<Sequencer<T>> {
        if let Some(existing) = self.entries.read().get(key) {
            return Arc::clone(existing);
        }

        let mut entries = self.entries.write();
        let sequencer = entries.entry(key.to_owned()).or_insert_with(|| {
            debug!("key '{}' activated", key);
            Sequencer::new(key, self.config)
        });
        Arc::clone(sequencer)
    }

    /// Returns a handle for `key`, activating the key if needed.
    ///
    /// Repeated calls for an active key return handles bound to the same state.
    pub fn subscribe(&self, key: &str) -> SubscribeHandle<T> {
        SubscribeHandle::new(self.entry(key))
    }

    /// Like [`subscribe`](Self::subscribe), attaching `on_value` to the key's results.
    ///
    /// Surfaced failures reaching `on_value`'s subscription are logged. Use
    /// [`subscribe_with_error`](Self::subscribe_with_error) to observe them.
    pub fn subscribe_with<F>(&self, key: &str, on_value: F) -> SubscribeHandle<T>
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.attach(key, Arc::new(value_callback(key.to_owned(), on_value)))
    }

    /// Like [`subscribe`](Self::subscribe), attaching a value callback and a failure callback.
    pub fn subscribe_with_error<F, OnError>(
        &self,
        key: &str,
        on_value: F,
        on_error: OnError,
    ) -> SubscribeHandle<T>
    where
        F: Fn(T) + Send + Sync + 'static,
        OnError: Fn(InOrderError) + Send + Sync + 'static,
    {
        self.attach(
            key,
            Arc::new(move |item: StreamItem<T>| match item {
                StreamItem::Value(value) => on_value(value),
                StreamItem::Error(error) => on_error(error),
            }),
        )
    }

    fn attach(&self, key: &str, callback: ItemCallback<T>) -> SubscribeHandle<T> {
        loop {
            let sequencer = self.entry(key);
            let callback = Arc::clone(&callback);
            // Retry if the key is released between lookup and attach
            if sequencer
                .results()
                .subscribe_fn(move |item| callback(item))
                .is_ok()
            {
                return SubscribeHandle::new(sequencer);
            }
        }
    }

    /// Pushes an operation for `key`, activating the key if needed.
    ///
    /// # Errors
    ///
    /// `NoRuntime` outside a tokio runtime. `KeyReleased` only if the key is
    /// released concurrently with this call.
    pub fn push<Fut>(&self, key: &str, operation: Fut) -> Result<Ticket>
    where
        Fut: Future<Output = T> + Send + 'static,
    {
        self.entry(key).push(operation)
    }

    /// Pushes a fallible operation for `key`, activating the key if needed.
    ///
    /// # Errors
    ///
    /// Same as [`push`](Self::push).
    pub fn try_push<Fut, E>(&self, key: &str, operation: Fut) -> Result<Ticket>
    where
        Fut: Future<Output = core::result::Result<T, E>> + Send + 'static,
        E: StdError + Send + Sync + 'static,
    {
        self.entry(key).try_push(operation)
    }

    /// Releases `key`: closes its channel, detaching every subscriber, and drops
    /// its pending slot. Doing this on an inactive key is a no-op.
    pub fn unsubscribe(&self, key: &str) {
        let removed = self.entries.write().remove(key);
        match removed {
            Some(sequencer) => sequencer.release(),
            None => trace!("unsubscribe on inactive key '{}' ignored", key),
        }
    }

    /// Releases every key.
    pub fn clear(&self) {
        let drained: Vec<_> = self.entries.write().drain().collect();
        for (_, sequencer) in drained {
            sequencer.release();
        }
    }

    #[must_use]
    pub fn is_active(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Active keys, sorted.
    #[must_use]
    pub fn active_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Counters for an active key.
    #[must_use]
    pub fn stats(&self, key: &str) -> Option<KeyStats> {
        self.entries.read().get(key).map(|sequencer| sequencer.stats())
    }
}

impl<T: Clone + Send + 'static> Default for KeyRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> Drop for KeyRegistry<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: Clone + Send + 'static> core::fmt::Debug for KeyRegistry<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KeyRegistry")
            .field("keys", &self.active_keys())
            .field("config", &self.config)
            .finish()
    }
}
