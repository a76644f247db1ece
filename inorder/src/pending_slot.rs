// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use inorder_core::CancellationToken;
use parking_lot::Mutex;

/// Sequence number of the already-settled placeholder a fresh slot starts with.
pub const PLACEHOLDER_SEQUENCE: u64 = 0;

/// Holds the single operation that is current for a key.
///
/// Operations are identified by a sequence number handed out at install time,
/// strictly increasing per slot. Installing is the only way to change which
/// operation is current, and it always overwrites.
#[derive(Debug)]
pub struct PendingSlot {
    state: Mutex<SlotState>,
}

#[derive(Debug)]
struct SlotState {
    current: u64,
    released: bool,
    in_flight: Option<CancellationToken>,
}

/// Result of installing a new operation.
#[derive(Debug)]
pub struct Installed {
    /// Sequence number assigned to the new operation.
    pub sequence: u64,
    /// Cancellation handle of the operation that was still in flight, if any.
    pub previous: Option<CancellationToken>,
}

impl PendingSlot {
    /// Creates a slot seeded with the settled placeholder: nothing is in flight.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                current: PLACEHOLDER_SEQUENCE,
                released: false,
                in_flight: None,
            }),
        }
    }

    /// Makes a new operation current, superseding whatever was there.
    ///
    /// Returns `None` once the slot has been released.
    pub fn install(&self, token: CancellationToken) -> Option<Installed> {
        let mut state = self.state.lock();
        if state.released {
            return None;
        }

        state.current += 1;
        let previous = state.in_flight.replace(token);
        Some(Installed {
            sequence: state.current,
            previous,
        })
    }

    /// `true` while `sequence` is the latest installed operation and the slot is live.
    #[must_use]
    pub fn is_current(&self, sequence: u64) -> bool {
        let state = self.state.lock();
        !state.released && state.current == sequence
    }

    /// Marks `sequence` as settled.
    ///
    /// Returns `true` if it was still current, in which case its value may be
    /// forwarded. Returns `false` for a superseded or released operation.
    pub fn complete(&self, sequence: u64) -> bool {
        let mut state = self.state.lock();
        if state.released || state.current != sequence {
            return false;
        }

        state.in_flight = None;
        true
    }

    /// Sequence number of the current operation.
    #[must_use]
    pub fn current(&self) -> u64 {
        self.state.lock().current
    }

    /// `true` while the current operation has not settled yet.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.state.lock().in_flight.is_some()
    }

    /// Releases the slot. Every later install is refused.
    ///
    /// Returns the in-flight operation's token on the first call only.
    pub fn release(&self) -> Option<CancellationToken> {
        let mut state = self.state.lock();
        state.released = true;
        state.in_flight.take()
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.state.lock().released
    }
}

impl Default for PendingSlot {
    fn default() -> Self {
        Self::new()
    }
}
