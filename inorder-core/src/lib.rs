// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core building blocks shared by the inorder crates.
//!
//! - [`StreamItem`]: a value or a surfaced failure, as delivered to subscribers
//! - [`ResultChannel`]: hot multicast channel feeding stream and callback subscribers
//! - [`CancellationToken`]: runtime-agnostic cooperative cancellation

#[macro_use]
pub mod logging;

pub mod cancellation_token;
pub mod channel_error;
pub mod result_channel;
pub mod stream_item;

pub use self::cancellation_token::CancellationToken;
pub use self::channel_error::ChannelError;
pub use self::result_channel::{ResultChannel, ResultStream, SubscriberId};
pub use self::stream_item::StreamItem;
pub use inorder_error::{InOrderError, IntoInOrderError, Result, SharedError};
