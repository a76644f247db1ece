// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use inorder_error::InOrderError;

/// An accepted result: either the value of the winning operation or its surfaced failure.
///
/// Unlike a terminating stream error, a `StreamItem::Error` does not close the
/// result channel. The next operation pushed for the same key may still deliver.
#[derive(Debug, Clone)]
pub enum StreamItem<T> {
    /// Output of the operation that was current when it settled
    Value(T),
    /// Failure of the operation that was current when it settled
    Error(InOrderError),
}

/// Two values compare by content. Failures carry opaque sources, so an
/// `Error` item equals nothing, itself included.
impl<T: PartialEq> PartialEq for StreamItem<T> {
    fn eq(&self, other: &Self) -> bool {
        matches!((self, other), (Self::Value(left), Self::Value(right)) if left == right)
    }
}

impl<T> StreamItem<T> {
    pub const fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Borrow the delivered value, if any.
    pub const fn value(&self) -> Option<&T> {
        if let Self::Value(value) = self {
            Some(value)
        } else {
            None
        }
    }

    /// Borrow the surfaced failure, if any.
    pub const fn error(&self) -> Option<&InOrderError> {
        if let Self::Error(error) = self {
            Some(error)
        } else {
            None
        }
    }

    /// The delivered value; failures become `None`.
    pub fn ok(self) -> Option<T> {
        self.into_result().ok()
    }

    /// The surfaced failure; values become `None`.
    pub fn err(self) -> Option<InOrderError> {
        self.into_result().err()
    }

    /// Transform the value, passing failures through untouched.
    pub fn map<U, F>(self, f: F) -> StreamItem<U>
    where
        F: FnOnce(T) -> U,
    {
        self.into_result().map(f).into()
    }

    pub fn into_result(self) -> Result<T, InOrderError> {
        self.into()
    }

    /// # Panics
    ///
    /// If the item carries a failure.
    pub fn unwrap(self) -> T {
        self.into_result()
            .unwrap_or_else(|error| panic!("expected a delivered value, got failure: {error}"))
    }
}

impl<T> From<Result<T, InOrderError>> for StreamItem<T> {
    fn from(outcome: Result<T, InOrderError>) -> Self {
        outcome.map_or_else(Self::Error, Self::Value)
    }
}

impl<T> From<StreamItem<T>> for Result<T, InOrderError> {
    fn from(item: StreamItem<T>) -> Self {
        match item {
            StreamItem::Value(value) => Ok(value),
            StreamItem::Error(error) => Err(error),
        }
    }
}
