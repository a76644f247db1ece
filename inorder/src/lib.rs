// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! # inorder
//!
//! Key-scoped, latest-wins sequencing of asynchronous results.
//!
//! ## Overview
//!
//! Push asynchronous operations against a key (say, "the latest search for field X")
//! and only the result of the *most recently pushed* operation is ever delivered to
//! the key's subscribers, even when an older operation finishes later. Older
//! operations are superseded the moment a newer one is pushed.
//!
//! - [`KeyRegistry`]: maps keys to their state, created on first use, torn down on `unsubscribe`
//! - [`SubscribeHandle`]: pushes operations for one key and exposes its results
//! - [`Sequencer`]: the pending slot plus result channel of one key
//! - [`PendingSlot`]: the per-key "current operation" marker, by sequence number
//! - [`ResultChannel`]: hot multicast of accepted results to streams and callbacks
//! - [`Ticket`] / [`Settlement`]: per-push outcome, including "superseded"
//!
//! ## Quick Start
//!
//! ```rust
//! use inorder::KeyRegistry;
//! use std::sync::{Arc, Mutex};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> inorder::Result<()> {
//! let registry = KeyRegistry::<String>::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = seen.clone();
//!
//! let handle = registry.subscribe_with("field-x", move |value| {
//!     sink.lock().unwrap().push(value);
//! });
//!
//! let slow = handle.push(async {
//!     tokio::time::sleep(Duration::from_millis(30)).await;
//!     "v1".to_string()
//! })?;
//! let fast = handle.push(async { "v2".to_string() })?;
//!
//! assert!(fast.await.reached_subscribers());
//! assert!(!slow.await.reached_subscribers());
//! assert_eq!(*seen.lock().unwrap(), vec!["v2".to_string()]);
//! # Ok(())
//! # }
//! ```

#[macro_use]
mod logging;

pub mod config;
pub mod handle;
pub mod pending_slot;
pub mod registry;
pub mod sequencer;
pub mod settlement;
pub mod stats;

pub use self::config::{FailurePolicy, SequencerConfig, SupersedePolicy};
pub use self::handle::SubscribeHandle;
pub use self::pending_slot::PendingSlot;
pub use self::registry::KeyRegistry;
pub use self::sequencer::Sequencer;
pub use self::settlement::{Settlement, Ticket};
pub use self::stats::KeyStats;

pub use inorder_core::{
    CancellationToken, ChannelError, InOrderError, IntoInOrderError, ResultChannel, ResultStream,
    StreamItem, SubscriberId,
};
pub use inorder_error::Result;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        FailurePolicy, KeyRegistry, SequencerConfig, Settlement, StreamItem, SubscribeHandle,
        SupersedePolicy,
    };
}
