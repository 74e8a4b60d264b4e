// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// Errors raised when setting up a [`ResizeSubscription`](crate::ResizeSubscription).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResizeError {
    /// The host environment has no native resize-notification facility.
    EnvironmentUnsupported,
}

impl fmt::Display for ResizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvironmentUnsupported => {
                f.write_str("the host environment does not provide resize notifications")
            }
        }
    }
}

impl core::error::Error for ResizeError {}
