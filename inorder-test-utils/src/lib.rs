// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the inorder crates.
//!
//! For development and testing only.
//!
//! # Key Types
//!
//! - [`operations`]: operations that settle after a delay, fail, or wait on a [`Gate`]
//! - [`Recorder`]: collects what callback subscribers receive
//! - [`helpers`]: stream assertions
//! - [`test_data`]: search-result fixtures
//!
//! # Example
//!
//! ```rust
//! use inorder_test_utils::{gated, test_data::result_rust};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let (gate, operation) = gated(result_rust());
//! gate.open();
//! assert_eq!(operation.await, result_rust());
//! # }
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod helpers;
pub mod operations;
pub mod recorder;
pub mod test_data;

pub use helpers::{assert_no_element_emitted, expect_next_error, expect_next_value};
pub use operations::{delayed, delayed_failure, delayed_ok, gated, Gate, TestError};
pub use recorder::Recorder;
pub use test_data::SearchResult;
