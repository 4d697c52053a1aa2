// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_box_tree --heading-base-level=0

//! Understory Box Tree: a Kurbo-native tree of boxes.
//!
//! Understory Box Tree is a reusable building block for UIs: it records which box sits inside which,
//! where each box is on screen, and which one a pointer lands on.
//!
//! - Represents a hierarchy of regions with bounds, z-order, and flags.
//! - Answers containment and ancestry questions ("is this node inside that panel?").
//! - Provides hit testing over viewport-space bounds.
//! - Deep-copies subtrees, for example to keep a snapshot of a panel around while it animates out.
//!
//! ## Where this fits: three-tree model
//!
//! We’re standardizing on a simple separation of concerns for UI stacks.
//! - Widget tree: interaction/state.
//! - Box tree: geometry and hierarchy (this crate).
//! - Render tree: display list (future crate).
//!
//! Overlays such as dropdowns (see `understory_overlay`) use the box tree as their view of the page:
//! bounds feed placement, and containment decides whether a click happened inside a panel.
//!
//! ## Not a layout engine
//!
//! This crate does not perform layout (measurement or arrangement).
//! Upstream code is expected to compute positions and sizes using whatever layout system you choose
//! and then update this tree with the resulting viewport-space boxes and z-order.
//!
//! ## API overview
//!
//! - [`Tree`]: container managing nodes.
//! - [`LocalNode`]: per-node data (bounds, z, flags).
//! - [`NodeFlags`]: visibility, picking, and focus controls.
//! - [`NodeId`]: generational handle of a node.
//! - [`QueryFilter`]: restricts hit results (visible/pickable).
//!
//! Key operations:
//! - [`Tree::insert`](Tree::insert) → [`NodeId`]
//! - [`Tree::set_bounds`](Tree::set_bounds) / [`Tree::reparent`](Tree::reparent)
//! - [`Tree::contains`](Tree::contains) and [`Tree::ancestors`](Tree::ancestors).
//! - [`Tree::hit_test_point`](Tree::hit_test_point).
//! - [`Tree::clone_subtree`](Tree::clone_subtree).
//!
//! ## Example
//!
//! ```rust
//! use understory_box_tree::{Tree, LocalNode, QueryFilter};
//! use kurbo::{Rect, Point};
//!
//! // Build a small tree.
//! let mut tree = Tree::new();
//!
//! let root = tree.insert(
//!     None,
//!     LocalNode { bounds: Rect::new(0.0, 0.0, 200.0, 200.0), ..Default::default() },
//! );
//!
//! let a = tree.insert(
//!     Some(root),
//!     LocalNode { bounds: Rect::new(10.0, 10.0, 60.0, 60.0), z_index: 0, ..Default::default() },
//! );
//!
//! let b = tree.insert(
//!     Some(root),
//!     LocalNode { bounds: Rect::new(40.0, 40.0, 120.0, 120.0), z_index: 10, ..Default::default() },
//! );
//!
//! // Hit-test prefers the higher z-index (node B).
//! let filter = QueryFilter { visible_only: true, pickable_only: true, within: None };
//! let hit = tree.hit_test_point(Point::new(50.0, 50.0), filter).unwrap();
//! assert_eq!(hit.node, b);
//! assert_eq!(hit.path, vec![root, b]);
//!
//! // Containment is inclusive and follows the hierarchy, not the geometry.
//! assert!(tree.contains(root, a));
//! assert!(!tree.contains(a, b));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod tree;
mod types;

pub use tree::{Hit, QueryFilter, Tree};
pub use types::{LocalNode, NodeFlags, NodeId};
