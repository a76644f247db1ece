// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Hot, multi-subscriber result channel.
//!
//! A [`ResultChannel`] broadcasts each accepted [`StreamItem<T>`] to all active subscribers.
//!
//! ## Characteristics
//!
//! - **Hot**: Late subscribers do not receive past items, only items sent after subscribing.
//! - **Two subscriber kinds**: streams (unbounded channels) and callbacks.
//! - **Unbounded**: No backpressure; a slow stream subscriber buffers.
//! - **Thread-safe**: Cheap to clone; all clones share the same internal state.
//! - **Error items do not close**: A [`StreamItem::Error`] is just another delivery.
//!   Only [`ResultChannel::close`] ends the subscriber streams.
//!
//! ## Example
//!
//! ```
//! use inorder_core::{ResultChannel, StreamItem};
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let channel = ResultChannel::<i32>::new();
//!
//! let mut stream = channel.subscribe().unwrap();
//!
//! channel.next(1).unwrap();
//! channel.next(2).unwrap();
//! channel.close();
//!
//! assert_eq!(stream.next().await, Some(StreamItem::Value(1)));
//! assert_eq!(stream.next().await, Some(StreamItem::Value(2)));
//! assert_eq!(stream.next().await, None);
//! # }
//! ```

use crate::{ChannelError, InOrderError, StreamItem};
use core::fmt;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::Stream;
use parking_lot::Mutex;
use std::sync::Arc;

type Callback<T> = Arc<dyn Fn(StreamItem<T>) + Send + Sync + 'static>;

/// Identifies a callback subscriber so it can be detached again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

struct ChannelState<T> {
    closed: bool,
    senders: Vec<UnboundedSender<StreamItem<T>>>,
    callbacks: Vec<(SubscriberId, Callback<T>)>,
    next_id: u64,
}

/// Stream of accepted items handed to a stream subscriber.
///
/// Ends when the channel is closed.
#[derive(Debug)]
pub struct ResultStream<T> {
    rx: UnboundedReceiver<StreamItem<T>>,
}

impl<T> Stream for ResultStream<T> {
    type Item = StreamItem<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.rx).poll_next(cx)
    }
}

/// A hot multicast channel delivering accepted results to every current subscriber.
///
/// See the [module documentation](self) for examples and more details.
pub struct ResultChannel<T: Clone + Send + 'static> {
    state: Arc<Mutex<ChannelState<T>>>,
}

impl<T: Clone + Send + 'static> ResultChannel<T> {
    /// Creates a new open channel with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ChannelState {
                closed: false,
                senders: Vec::new(),
                callbacks: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Subscribe and receive a stream of `StreamItem<T>`.
    /// Late subscribers do not receive previously sent items.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::Closed` if the channel has been closed.
    pub fn subscribe(&self) -> Result<ResultStream<T>, ChannelError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(ChannelError::Closed);
        }

        let (tx, rx) = mpsc::unbounded();
        state.senders.push(tx);
        Ok(ResultStream { rx })
    }

    /// Attach a callback invoked synchronously for every item sent from now on.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::Closed` if the channel has been closed.
    pub fn subscribe_fn<F>(&self, callback: F) -> Result<SubscriberId, ChannelError>
    where
        F: Fn(StreamItem<T>) + Send + Sync + 'static,
    {
        let mut state = self.state.lock();
        if state.closed {
            return Err(ChannelError::Closed);
        }

        let id = SubscriberId(state.next_id);
        state.next_id += 1;
        state.callbacks.push((id, Arc::new(callback)));
        Ok(id)
    }

    /// Detach a callback. Returns `false` if it was not attached.
    pub fn unsubscribe_fn(&self, id: SubscriberId) -> bool {
        let mut state = self.state.lock();
        let before = state.callbacks.len();
        state.callbacks.retain(|(existing, _)| *existing != id);
        state.callbacks.len() != before
    }

    /// Send an item to all active subscribers.
    ///
    /// Stream subscribers whose receiving end was dropped are pruned. Callbacks run
    /// after the channel lock is released, so a callback may subscribe, detach or
    /// close without deadlocking.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::Closed` if the channel has been closed.
    pub fn send(&self, item: StreamItem<T>) -> Result<(), ChannelError> {
        let callbacks: Vec<Callback<T>> = {
            let mut state = self.state.lock();
            if state.closed {
                return Err(ChannelError::Closed);
            }

            state
                .senders
                .retain(|tx| tx.unbounded_send(item.clone()).is_ok());

            state
                .callbacks
                .iter()
                .map(|(_, callback)| Arc::clone(callback))
                .collect()
        };

        for callback in callbacks {
            callback(item.clone());
        }
        Ok(())
    }

    /// Send a value to all active subscribers.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::Closed` if the channel has been closed.
    pub fn next(&self, value: T) -> Result<(), ChannelError> {
        self.send(StreamItem::Value(value))
    }

    /// Send a failure to all active subscribers. The channel stays open.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::Closed` if the channel has been closed.
    pub fn error(&self, err: InOrderError) -> Result<(), ChannelError> {
        self.send(StreamItem::Error(err))
    }

    /// Closes the channel, completing all subscriber streams and detaching all callbacks.
    ///
    /// Closing is idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        if core::mem::replace(&mut state.closed, true) {
            return;
        }

        debug!(
            "result channel closed with {} subscriber(s)",
            state.senders.len() + state.callbacks.len()
        );
        state.senders.clear();
        state.callbacks.clear();
    }

    /// Returns `true` if the channel has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Returns the number of currently attached subscribers (streams and callbacks).
    ///
    /// Dropped streams are removed lazily, on the next `send()`.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let state = self.state.lock();
        state.senders.len() + state.callbacks.len()
    }
}

impl<T: Clone + Send + 'static> Default for ResultChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> Clone for ResultChannel<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Clone + Send + 'static> fmt::Debug for ResultChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ResultChannel")
            .field("closed", &state.closed)
            .field("streams", &state.senders.len())
            .field("callbacks", &state.callbacks.len())
            .finish()
    }
}

/// Subscriber callback for a value-only consumer.
///
/// Failures reaching such a subscriber are logged rather than dropped without a trace.
pub fn value_callback<T, F>(
    key: String,
    on_value: F,
) -> impl Fn(StreamItem<T>) + Send + Sync + 'static
where
    T: 'static,
    F: Fn(T) + Send + Sync + 'static,
{
    move |item| match item {
        StreamItem::Value(value) => on_value(value),
        StreamItem::Error(err) => {
            warn!("failure for key '{}' reached a value-only subscriber: {}", key, err);
        }
    }
}
