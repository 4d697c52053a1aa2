// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use thiserror::Error;

use crate::id::OverlayId;

/// Failure reported by an asynchronous open/close gate.
///
/// A failed gate never lets the transition through; the overlay logs the
/// error and stays in its current state.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GateError {
    /// The producer of the decision went away without answering.
    #[error("gate was dropped before producing a decision")]
    Canceled,
    /// The gate ran and reported a failure.
    #[error("gate failed: {0}")]
    Failed(String),
}

impl From<futures::channel::oneshot::Canceled> for GateError {
    fn from(_: futures::channel::oneshot::Canceled) -> Self {
        Self::Canceled
    }
}

/// Errors raised by the [overlay registry](crate::registry::OverlayRegistry).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Another live overlay already uses this id.
    #[error("overlay id `{0}` is already registered")]
    DuplicateId(OverlayId),
}
