// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the box tree: node identifiers, flags, and node geometry.

use kurbo::Rect;

/// Identifier for a node in the tree.
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// ### Newer
///
/// A `NodeId` is considered newer than another when it has a higher generation.
/// If generations are equal, the one with the higher slot index is considered newer.
/// This total order is used only for deterministic tie-breaks in
/// [hit testing](crate::Tree::hit_test_point).
///
/// ### Liveness
///
/// Use [`Tree::is_alive`](crate::Tree::is_alive) to check whether a `NodeId` still refers to a live node.
/// Stale `NodeId`s never alias a different live node because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Node flags controlling visibility, picking, and focus.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is visible.
        const VISIBLE   = 0b0000_0001;
        /// Node is pickable (participates in hit testing).
        const PICKABLE  = 0b0000_0010;
        /// Node can take keyboard focus.
        const FOCUSABLE = 0b0000_0100;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

/// Geometry and flags for a node.
#[derive(Clone, Debug)]
pub struct LocalNode {
    /// Bounding box in viewport coordinates, as measured by layout.
    pub bounds: Rect,
    /// Z-order; higher is drawn on top.
    pub z_index: i32,
    /// Visibility, picking, and focus flags.
    ///
    /// See [`NodeFlags`] for available bits and how they interact with
    /// [`QueryFilter`](crate::QueryFilter).
    pub flags: NodeFlags,
}

impl Default for LocalNode {
    fn default() -> Self {
        Self {
            bounds: Rect::ZERO,
            z_index: 0,
            flags: NodeFlags::default(),
        }
    }
}
