// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay identity: ids and the allocators that mint them.

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

/// Stable identifier of one overlay instance.
///
/// The floating content's id is derived from it with [`OverlayId::content_id`],
/// which is how triggers, panels, and nested overlays find each other.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct OverlayId(String);

impl OverlayId {
    /// Wrap an explicit id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id of the floating content element: `<overlay-id>-content`.
    pub fn content_id(&self) -> String {
        format!("{}-content", self.0)
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of fresh overlay ids.
pub trait IdAllocator {
    /// Returns an id no earlier call has returned.
    fn allocate(&self) -> OverlayId;
}

/// Counter-backed allocator producing `overlay-1`, `overlay-2`, ...
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

static GLOBAL: SequentialIds = SequentialIds::starting_at(1);

impl SequentialIds {
    /// An allocator whose first id uses `first`.
    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// The process-wide allocator used when an overlay has no explicit id.
    pub fn global() -> &'static Self {
        &GLOBAL
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdAllocator for SequentialIds {
    fn allocate(&self) -> OverlayId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        OverlayId(format!("overlay-{n}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_count_up() {
        let ids = SequentialIds::default();
        assert_eq!(ids.allocate().as_str(), "overlay-1");
        assert_eq!(ids.allocate().as_str(), "overlay-2");
    }

    #[test]
    fn content_id_is_derived() {
        let id = OverlayId::new("menu");
        assert_eq!(id.content_id(), "menu-content");
        assert_eq!(id.to_string(), "menu");
    }

    #[test]
    fn global_allocator_never_repeats() {
        let a = SequentialIds::global().allocate();
        let b = SequentialIds::global().allocate();
        assert_ne!(a, b);
    }
}
