// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Per-registry sequencing policies.

/// What happens when the *current* operation for a key settles with a failure.
///
/// Failures of superseded operations are always discarded, exactly like their values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Multicast the failure to subscribers as [`StreamItem::Error`](inorder_core::StreamItem::Error).
    #[default]
    Surface,
    /// Log the failure and deliver nothing.
    Drop,
}

/// What happens to an in-flight operation once a newer one is pushed for its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SupersedePolicy {
    /// Let the superseded operation run to completion and discard its output.
    #[default]
    Discard,
    /// Drop the superseded operation at its next suspension point.
    ///
    /// Also applies to the in-flight operation of a key that is released.
    /// Delivery semantics are identical to `Discard`; only wasted work differs.
    Cancel,
}

/// Configuration shared by every key of a [`KeyRegistry`](crate::KeyRegistry).
///
/// ```
/// use inorder::{FailurePolicy, SequencerConfig, SupersedePolicy};
///
/// let config = SequencerConfig::new()
///     .with_failure_policy(FailurePolicy::Drop)
///     .with_supersede_policy(SupersedePolicy::Cancel);
///
/// assert_eq!(config.failure_policy, FailurePolicy::Drop);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SequencerConfig {
    pub failure_policy: FailurePolicy,
    pub supersede_policy: SupersedePolicy,
}

impl SequencerConfig {
    /// Surface failures, let superseded work finish.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    #[must_use]
    pub const fn with_supersede_policy(mut self, policy: SupersedePolicy) -> Self {
        self.supersede_policy = policy;
        self
    }
}
