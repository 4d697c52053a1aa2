// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host seam: what an overlay needs from the page it lives on.
//!
//! An overlay never owns the page. Every operation that reads geometry or
//! mutates elements borrows a [`Surface`] for the duration of the call, so
//! many overlays can share one page.

use core::fmt::Debug;
use core::hash::Hash;

use kurbo::Rect;
use understory_placement::{
    HorizontalAnchor, HorizontalPosition, InPlacePlacement, ResolvedPlacement, VerticalPosition,
    Viewport,
};

/// Access to the rendered page.
pub trait Surface {
    /// Handle of one element on the page.
    type Element: Copy + Eq + Hash + Debug;

    /// Current viewport size and page scroll.
    fn viewport(&self) -> Viewport;

    /// Bounding box in viewport coordinates, or `None` when the element is not
    /// attached to the document.
    fn bounds(&self, element: Self::Element) -> Option<Rect>;

    /// Parent element, if any.
    fn parent_of(&self, element: Self::Element) -> Option<Self::Element>;

    /// Returns true if `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: Self::Element, node: Self::Element) -> bool;

    /// Returns true if the element can take keyboard focus.
    fn is_focusable(&self, element: Self::Element) -> bool;

    /// Move keyboard focus to the element.
    fn focus(&mut self, element: Self::Element);

    /// Write placement coordinates straight onto the element's style.
    ///
    /// Implementations must clear `right` when writing `left` and vice versa.
    fn apply_style(&mut self, element: Self::Element, changes: &PositionChanges);

    /// Add a class to the element.
    fn add_class(&mut self, element: Self::Element, class: &str);

    /// Remove a class from the element.
    fn remove_class(&mut self, element: Self::Element, class: &str);

    /// Returns true if the element carries the class.
    fn has_class(&self, element: Self::Element, class: &str) -> bool;

    /// Returns true while a CSS-style animation is running on the element.
    fn is_animating(&self, element: Self::Element) -> bool;

    /// Deep-copy the element and insert the copy under the same parent.
    fn clone_element(&mut self, element: Self::Element) -> Option<Self::Element>;

    /// Detach and drop the element.
    fn remove_element(&mut self, element: Self::Element);

    /// Take the element off the page, or put it back where it was.
    ///
    /// A hidden element has no bounds and takes no pointer input. Hiding an
    /// element that is already hidden, or showing one that is not, does
    /// nothing.
    fn set_hidden(&mut self, element: Self::Element, hidden: bool);

    /// Returns the shared overlay outlet, creating it on first use.
    ///
    /// Every overlay calls this when constructed; only the first call creates
    /// anything.
    fn ensure_outlet(&mut self) -> Self::Element;
}

/// Placement produced by one reposition, as published to the host.
///
/// Fields left `None` were not resolved by the calculation that produced
/// this value; in-place panels only resolve the parts that differ from
/// normal flow.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PositionChanges {
    /// Resolved horizontal alignment.
    pub horizontal: Option<HorizontalPosition>,
    /// Resolved vertical side.
    pub vertical: Option<VerticalPosition>,
    /// Top coordinate.
    pub top: Option<f64>,
    /// Left or right offset.
    pub anchor: Option<HorizontalAnchor>,
    /// Explicit width.
    pub width: Option<f64>,
}

impl PositionChanges {
    /// Returns true if these changes carry style coordinates.
    pub fn has_style(&self) -> bool {
        self.top.is_some()
    }
}

impl From<ResolvedPlacement> for PositionChanges {
    fn from(p: ResolvedPlacement) -> Self {
        Self {
            horizontal: Some(p.horizontal),
            vertical: Some(p.vertical),
            top: Some(p.style.top),
            anchor: Some(p.style.anchor),
            width: p.style.width,
        }
    }
}

impl From<InPlacePlacement> for PositionChanges {
    fn from(p: InPlacePlacement) -> Self {
        Self {
            horizontal: p.horizontal,
            vertical: p.vertical,
            top: p.top,
            anchor: None,
            width: None,
        }
    }
}
