// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Open/close gates.
//!
//! A gate is asked before an overlay opens or closes and may veto the
//! transition. It answers either immediately or through a future:
//!
//! ```
//! use understory_overlay::gate::{Gate, GateOutcome};
//!
//! let mut confirm = Gate::sync(|| true);
//! assert!(matches!(confirm.evaluate(), GateOutcome::Ready(true)));
//!
//! let mut later = Gate::deferred(|| async { Ok(false) });
//! assert!(matches!(later.evaluate(), GateOutcome::Deferred(_)));
//! ```

use core::fmt;
use core::future::Future;

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use crate::error::GateError;

/// A decision that is still being computed.
pub type GateFuture = LocalBoxFuture<'static, Result<bool, GateError>>;

/// What a gate answered.
pub enum GateOutcome {
    /// The decision is known now.
    Ready(bool),
    /// The decision arrives later.
    Deferred(GateFuture),
}

impl fmt::Debug for GateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(allowed) => f.debug_tuple("Ready").field(allowed).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// A callable consulted before a transition.
pub struct Gate {
    check: Box<dyn FnMut() -> GateOutcome>,
}

impl fmt::Debug for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate").finish_non_exhaustive()
    }
}

impl Gate {
    /// A gate from a callable returning either kind of outcome.
    pub fn new(check: impl FnMut() -> GateOutcome + 'static) -> Self {
        Self {
            check: Box::new(check),
        }
    }

    /// A gate that answers immediately.
    pub fn sync(mut check: impl FnMut() -> bool + 'static) -> Self {
        Self::new(move || GateOutcome::Ready(check()))
    }

    /// A gate that answers through a future.
    pub fn deferred<F, Fut>(mut check: F) -> Self
    where
        F: FnMut() -> Fut + 'static,
        Fut: Future<Output = Result<bool, GateError>> + 'static,
    {
        Self::new(move || GateOutcome::Deferred(check().boxed_local()))
    }

    /// Ask the gate.
    pub fn evaluate(&mut self) -> GateOutcome {
        (self.check)()
    }
}
