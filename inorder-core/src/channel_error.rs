// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt;
use inorder_error::InOrderError;

/// Errors specific to result channel operations (lifecycle and broadcasting).
///
/// Distinct from [`InOrderError`](inorder_error::InOrderError), which describes
/// failures of the sequencer itself. Use [`ChannelError::for_key`] to turn a closed
/// channel into `InOrderError::ChannelClosed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The channel has been closed and cannot accept new items or subscribers.
    Closed,
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "Result channel is closed"),
        }
    }
}

impl std::error::Error for ChannelError {}

impl ChannelError {
    /// Attach the key of the channel that refused the operation.
    #[must_use]
    pub fn for_key(self, key: impl Into<String>) -> InOrderError {
        match self {
            Self::Closed => InOrderError::channel_closed(key),
        }
    }
}
