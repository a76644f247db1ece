// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::Settlement;
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of a key's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyStats {
    pub pushed: u64,
    pub delivered: u64,
    pub superseded: u64,
    pub failed: u64,
    pub cancelled: u64,
    /// Sequence number of the current operation (0 before the first push).
    pub current_sequence: u64,
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    pushed: AtomicU64,
    delivered: AtomicU64,
    superseded: AtomicU64,
    failed: AtomicU64,
    cancelled: AtomicU64,
}

impl Counters {
    pub(crate) fn record_push(&self) {
        self.pushed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record(&self, settlement: Settlement) {
        let counter = match settlement {
            Settlement::Delivered => &self.delivered,
            Settlement::FailureSurfaced | Settlement::FailureDropped => &self.failed,
            Settlement::Superseded => &self.superseded,
            Settlement::Cancelled => &self.cancelled,
            Settlement::Released => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, current_sequence: u64) -> KeyStats {
        KeyStats {
            pushed: self.pushed.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            superseded: self.superseded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            current_sequence,
        }
    }
}
