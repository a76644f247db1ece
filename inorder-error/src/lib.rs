// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Error types for the inorder result sequencer
//!
//! This crate defines the root [`InOrderError`] type shared by every inorder crate.
//! A superseded operation is *not* an error: its output is discarded silently and
//! never reaches this type. Everything that can genuinely fail (an operation settling
//! with a failure or a panic, pushing through a released key, missing runtime) is a
//! variant here.
//!
//! # Examples
//!
//! ```
//! use inorder_error::{InOrderError, Result};
//!
//! fn lookup(active: bool) -> Result<()> {
//!     if active {
//!         Ok(())
//!     } else {
//!         Err(InOrderError::key_released("search"))
//!     }
//! }
//!
//! assert!(lookup(false).is_err());
//! ```

use std::error::Error as StdError;
use std::sync::Arc;

/// Shared, cloneable error source.
///
/// Failures are multicast to every subscriber of a key, so the underlying error is
/// reference-counted instead of boxed.
pub type SharedError = Arc<dyn StdError + Send + Sync>;

/// Root error type for all inorder operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum InOrderError {
    /// An operation settled with a failure while it was still the current one for its key
    #[error("Operation for key '{key}' failed: {source}")]
    OperationFailed {
        /// Key the operation was pushed under
        key: String,
        /// The failure produced by the operation
        #[source]
        source: SharedError,
    },

    /// A push was attempted through a handle whose key has been released
    ///
    /// Releasing a key is final for the handles bound to it; subscribing again
    /// yields a fresh handle.
    #[error("Key '{key}' has been released")]
    KeyReleased {
        /// Key that was released
        key: String,
    },

    /// The result channel of a key was closed while an operation was settling
    #[error("Result channel for key '{key}' is closed")]
    ChannelClosed {
        /// Key whose channel closed
        key: String,
    },

    /// An operation was pushed outside of an async runtime
    #[error("No async runtime available to drive the operation")]
    NoRuntime,

    /// An operation panicked while it was still the current one for its key
    #[error("Operation for key '{key}' panicked: {message}")]
    OperationPanicked {
        /// Key the operation was pushed under
        key: String,
        /// Panic payload, when it was a string
        message: String,
    },
}

impl InOrderError {
    /// Wrap the failure of an operation pushed under `key`
    pub fn operation_failed(
        key: impl Into<String>,
        error: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::OperationFailed {
            key: key.into(),
            source: Arc::new(error),
        }
    }

    /// Create a released-key error
    pub fn key_released(key: impl Into<String>) -> Self {
        Self::KeyReleased { key: key.into() }
    }

    /// Create a closed-channel error
    pub fn channel_closed(key: impl Into<String>) -> Self {
        Self::ChannelClosed { key: key.into() }
    }

    /// Record a panic raised by an operation pushed under `key`
    pub fn operation_panicked(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OperationPanicked {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Key this error relates to, if any
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::OperationFailed { key, .. }
            | Self::OperationPanicked { key, .. }
            | Self::KeyReleased { key }
            | Self::ChannelClosed { key } => Some(key),
            Self::NoRuntime => None,
        }
    }

    /// Check if this is a recoverable error
    ///
    /// Operation failures are recoverable: the next push for the key may succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::OperationFailed { .. } | Self::OperationPanicked { .. } | Self::NoRuntime
        )
    }

    /// Check if this error indicates a permanent failure
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(self, Self::KeyReleased { .. } | Self::ChannelClosed { .. })
    }
}

/// Specialized Result type for inorder operations
pub type Result<T> = std::result::Result<T, InOrderError>;

/// Extension trait for converting errors into `InOrderError`
pub trait IntoInOrderError {
    /// Convert this error into the failure of an operation pushed under `key`
    fn into_operation_failure(self, key: &str) -> InOrderError;
}

impl<E: StdError + Send + Sync + 'static> IntoInOrderError for E {
    fn into_operation_failure(self, key: &str) -> InOrderError {
        InOrderError::operation_failed(key, self)
    }
}
