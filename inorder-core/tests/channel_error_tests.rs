// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use inorder_core::{ChannelError, InOrderError};
use std::error::Error;

#[test]
fn test_channel_error_closed_display() {
    assert_eq!(ChannelError::Closed.to_string(), "Result channel is closed");
}

#[test]
fn test_channel_error_debug() {
    assert_eq!(format!("{:?}", ChannelError::Closed), "Closed");
}

#[test]
fn test_channel_error_implements_error_trait() {
    let error = ChannelError::Closed;
    let _: &dyn Error = &error;
    assert!(error.source().is_none());
}

#[test]
fn test_channel_error_for_key() {
    let error = ChannelError::Closed.for_key("search");
    assert!(matches!(error, InOrderError::ChannelClosed { ref key } if key == "search"));
    assert!(error.is_permanent());
}
