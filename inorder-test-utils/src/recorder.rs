// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use inorder_core::InOrderError;
use parking_lot::Mutex;
use std::sync::Arc;

/// Collects values and failures handed to callback subscribers.
///
/// Clones share the same storage.
#[derive(Debug)]
pub struct Recorder<T> {
    values: Arc<Mutex<Vec<T>>>,
    failures: Arc<Mutex<Vec<InOrderError>>>,
}

impl<T: Clone + Send + 'static> Recorder<T> {
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Value callback suitable for `subscribe_with`.
    pub fn on_value(&self) -> impl Fn(T) + Send + Sync + 'static {
        let values = Arc::clone(&self.values);
        move |value| values.lock().push(value)
    }

    /// Failure callback suitable for `subscribe_with_error`.
    pub fn on_error(&self) -> impl Fn(InOrderError) + Send + Sync + 'static {
        let failures = Arc::clone(&self.failures);
        move |error| failures.lock().push(error)
    }

    pub fn values(&self) -> Vec<T> {
        self.values.lock().clone()
    }

    pub fn failures(&self) -> Vec<InOrderError> {
        self.failures.lock().clone()
    }

    /// `true` if nothing at all was received.
    pub fn is_empty(&self) -> bool {
        self.values.lock().is_empty() && self.failures.lock().is_empty()
    }
}

impl<T: Clone + Send + 'static> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            values: Arc::clone(&self.values),
            failures: Arc::clone(&self.failures),
        }
    }
}
