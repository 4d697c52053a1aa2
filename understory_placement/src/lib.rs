// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_placement --heading-base-level=0

//! Understory Placement: where to put a dropdown.
//!
//! Given a trigger box, the natural size of a floating panel, and the viewport,
//! this crate decides which side of the trigger the panel goes on and emits the
//! coordinates that realize that choice.
//!
//! - [`calculate_position`]: page-absolute coordinates for panels hosted in a
//!   shared top-level outlet.
//! - [`calculate_in_place_position`]: the partial placement needed by panels
//!   rendered in normal flow beside their trigger.
//! - [`Positioner`]: a seam for custom rules, with [`DefaultPositioner`].
//!
//! ## Stability under recomputation
//!
//! Overlays recompute placement on every scroll, resize, and content mutation.
//! Feeding the previous result back through
//! [`PlacementOptions::previous_horizontal`] and
//! [`PlacementOptions::previous_vertical`] keeps the answer stable: identical
//! geometry yields the identical placement, and a panel only changes side when
//! its current side stops fitting.
//!
//! ## Not a layout engine
//!
//! Inputs are already-measured axis-aligned boxes in viewport coordinates.
//! There is no collision avoidance between several panels.
//!
//! ## Example
//!
//! ```
//! use kurbo::{Rect, Size};
//! use understory_placement::{
//!     calculate_position, HorizontalAnchor, HorizontalPosition, PlacementOptions,
//!     VerticalPosition, Viewport,
//! };
//!
//! // A trigger close to the right edge of a 600px wide viewport.
//! let trigger = Rect::new(500.0, 100.0, 600.0, 130.0);
//! let panel = Size::new(300.0, 150.0);
//! let out = calculate_position(
//!     trigger,
//!     panel,
//!     Viewport::new(600.0, 800.0),
//!     &PlacementOptions::default(),
//! );
//!
//! assert_eq!(out.horizontal, HorizontalPosition::Right);
//! assert_eq!(out.vertical, VerticalPosition::Below);
//! assert_eq!(out.style.anchor, HorizontalAnchor::Right(0.0));
//! assert_eq!(out.style.top, 130.0);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod calculate;
mod types;

pub use calculate::{
    DefaultPositioner, Positioner, calculate_in_place_position, calculate_position,
};
pub use types::{
    HorizontalAnchor, HorizontalPosition, HorizontalPreference, InPlacePlacement,
    PlacementOptions, PlacementStyle, ResolvedPlacement, VerticalPosition, VerticalPreference,
    Viewport,
};
