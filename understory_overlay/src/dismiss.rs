// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outside-interaction dismissal.
//!
//! While an overlay is open its [`DismissalCoordinator`] sees every pointer and
//! touch input on the page, in capture order, and decides whether the input
//! means "close". Inputs inside the overlay's trigger or content, or inside a
//! child overlay nested in it, never dismiss. A touch sequence that moved is a
//! scroll gesture and never dismisses either.

use crate::id::OverlayId;
use crate::registry::OverlayRegistry;
use crate::surface::Surface;

/// Kind of page-level input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerKind {
    /// Mouse or pen press.
    PointerDown,
    /// A finger touched the screen.
    TouchStart,
    /// A touching finger moved.
    TouchMove,
    /// A finger left the screen.
    TouchEnd,
}

/// One input and the element it was dispatched to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PointerInput<E> {
    /// What happened.
    pub kind: PointerKind,
    /// Innermost element under the input.
    pub target: E,
}

impl<E> PointerInput<E> {
    /// A mouse or pen press.
    pub fn pointer_down(target: E) -> Self {
        Self {
            kind: PointerKind::PointerDown,
            target,
        }
    }

    /// A touch input of the given kind.
    pub fn touch(kind: PointerKind, target: E) -> Self {
        Self { kind, target }
    }
}

/// Decision for one input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Leave the overlay alone.
    Ignore,
    /// Close the overlay without restoring focus.
    Dismiss,
}

/// Per-overlay dismissal state.
#[derive(Clone, Debug, Default)]
pub struct DismissalCoordinator {
    active: bool,
    touch_capable: bool,
    watching_moves: bool,
    has_moved: bool,
}

impl DismissalCoordinator {
    /// Create an inactive coordinator. Touch inputs are only considered when
    /// `touch_capable` is set.
    pub fn new(touch_capable: bool) -> Self {
        Self {
            touch_capable,
            ..Default::default()
        }
    }

    /// Start listening. Calling this while active has no effect.
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Stop listening and forget any touch gesture in progress.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.watching_moves = false;
        self.has_moved = false;
    }

    /// Returns true while listening.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns true while a touch sequence is being watched for movement.
    pub fn is_watching_moves(&self) -> bool {
        self.active && self.watching_moves
    }

    /// Returns true if touch inputs are considered.
    pub fn is_touch_capable(&self) -> bool {
        self.touch_capable
    }

    /// Classify one input for overlay `id`.
    pub fn handle<S>(
        &mut self,
        input: PointerInput<S::Element>,
        surface: &S,
        registry: &OverlayRegistry<S::Element>,
        id: &OverlayId,
    ) -> Verdict
    where
        S: Surface,
    {
        if !self.active {
            return Verdict::Ignore;
        }
        match input.kind {
            PointerKind::PointerDown => {}
            _ if !self.touch_capable => return Verdict::Ignore,
            PointerKind::TouchStart => {
                self.watching_moves = true;
                return Verdict::Ignore;
            }
            PointerKind::TouchMove => {
                if self.watching_moves {
                    self.has_moved = true;
                    self.watching_moves = false;
                }
                return Verdict::Ignore;
            }
            PointerKind::TouchEnd => {
                self.watching_moves = false;
            }
        }

        if self.has_moved {
            self.has_moved = false;
            tracing::trace!(overlay = %id, "ignoring input after touch scroll");
            return Verdict::Ignore;
        }
        if registry.owns(surface, id, input.target) {
            tracing::trace!(overlay = %id, target = ?input.target, "input inside overlay");
            return Verdict::Ignore;
        }
        tracing::trace!(overlay = %id, target = ?input.target, "outside input dismisses");
        Verdict::Dismiss
    }
}
