// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`Surface`] over an Understory box tree.
//!
//! ## Feature
//!
//! Enable with `box_tree_adapter` (on by default).
//!
//! ## Notes
//!
//! [`SceneSurface`] models a page as a box tree with a single document root.
//! Nodes outside the document's subtree count as detached and have no bounds.
//! Node bounds are viewport coordinates, as the box tree stores them; the
//! page scroll is tracked separately and only feeds [`Surface::viewport`].
//!
//! Classes, applied styles, focus and running animations are kept in side
//! tables keyed by [`NodeId`], since the box tree only stores geometry.
//! Hidden elements are detached from the document and remember their parent
//! so showing them puts them back.

use std::collections::{HashMap, HashSet};

use kurbo::{Point, Rect, Vec2};
use understory_box_tree::{LocalNode, NodeFlags, NodeId, QueryFilter, Tree};
use understory_placement::{HorizontalAnchor, Viewport};

use crate::surface::{PositionChanges, Surface};

/// Style properties written by [`Surface::apply_style`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AppliedStyle {
    /// `top`.
    pub top: Option<f64>,
    /// `left`; cleared whenever `right` is written.
    pub left: Option<f64>,
    /// `right`; cleared whenever `left` is written.
    pub right: Option<f64>,
    /// `width`.
    pub width: Option<f64>,
}

/// A page backed by a box tree.
#[derive(Debug)]
pub struct SceneSurface {
    tree: Tree,
    document: NodeId,
    outlet: Option<NodeId>,
    viewport: Viewport,
    classes: HashMap<NodeId, Vec<String>>,
    styles: HashMap<NodeId, AppliedStyle>,
    animating: HashSet<NodeId>,
    hidden: HashMap<NodeId, NodeId>,
    focused: Option<NodeId>,
}

impl SceneSurface {
    /// Create an empty page with a viewport of the given size.
    pub fn new(width: f64, height: f64) -> Self {
        let mut tree = Tree::new();
        let document = tree.insert(
            None,
            LocalNode {
                bounds: Rect::new(0.0, 0.0, width, height),
                ..Default::default()
            },
        );
        Self {
            tree,
            document,
            outlet: None,
            viewport: Viewport::new(width, height),
            classes: HashMap::new(),
            styles: HashMap::new(),
            animating: HashSet::new(),
            hidden: HashMap::new(),
            focused: None,
        }
    }

    /// The document root.
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// The underlying tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Mutable access to the underlying tree, for layout updates.
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// Add an element with the given viewport-space bounds as the last child
    /// of `parent`.
    pub fn insert(&mut self, parent: NodeId, bounds: Rect) -> NodeId {
        self.tree.insert(
            Some(parent),
            LocalNode {
                bounds,
                ..Default::default()
            },
        )
    }

    /// Move an element to new viewport-space bounds.
    pub fn set_bounds(&mut self, element: NodeId, bounds: Rect) {
        self.tree.set_bounds(element, bounds);
    }

    /// Take an element out of the document without dropping it.
    pub fn detach(&mut self, element: NodeId) {
        self.tree.reparent(element, None);
    }

    /// Put a detached element back under `parent`.
    pub fn attach(&mut self, element: NodeId, parent: NodeId) {
        self.tree.reparent(element, Some(parent));
    }

    /// Returns true if the element is live and inside the document.
    pub fn is_attached(&self, element: NodeId) -> bool {
        self.tree.contains(self.document, element)
    }

    /// Allow or forbid keyboard focus on an element.
    pub fn set_focusable(&mut self, element: NodeId, focusable: bool) {
        if let Some(mut flags) = self.tree.flags(element) {
            flags.set(NodeFlags::FOCUSABLE, focusable);
            self.tree.set_flags(element, flags);
        }
    }

    /// Returns true while the element is hidden through [`Surface::set_hidden`].
    pub fn is_hidden(&self, element: NodeId) -> bool {
        self.hidden.contains_key(&element)
    }

    /// The element holding keyboard focus.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused.filter(|el| self.is_attached(*el))
    }

    /// Mark an element as running an animation, or not.
    pub fn set_animating(&mut self, element: NodeId, animating: bool) {
        if animating {
            self.animating.insert(element);
        } else {
            self.animating.remove(&element);
        }
    }

    /// Resize the viewport.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport.size = kurbo::Size::new(width, height);
    }

    /// Scroll the page to an absolute offset.
    ///
    /// Bounds are viewport-relative, so every element moves by the opposite
    /// of the scroll delta.
    pub fn scroll_to(&mut self, left: f64, top: f64) {
        let delta = Vec2::new(left, top) - self.viewport.scroll;
        self.viewport.scroll = Vec2::new(left, top);
        let mut stack = vec![self.document];
        while let Some(node) = stack.pop() {
            if node != self.document
                && let Some(bounds) = self.tree.bounds(node)
            {
                self.tree.set_bounds(node, bounds - delta);
            }
            stack.extend_from_slice(self.tree.children(node));
        }
    }

    /// Style last written to an element.
    pub fn applied_style(&self, element: NodeId) -> Option<AppliedStyle> {
        self.styles.get(&element).copied()
    }

    /// Forget the style written to an element.
    pub fn clear_applied_style(&mut self, element: NodeId) {
        self.styles.remove(&element);
    }

    /// Classes on an element, in the order they were added.
    pub fn classes(&self, element: NodeId) -> &[String] {
        self.classes.get(&element).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Innermost attached element under a viewport-space point.
    pub fn element_at(&self, pt: Point) -> Option<NodeId> {
        let filter = QueryFilter {
            visible_only: true,
            pickable_only: true,
            within: Some(self.document),
        };
        self.tree.hit_test_point(pt, filter).map(|hit| hit.node)
    }

    fn copy_attributes(&mut self, from: NodeId, to: NodeId) {
        if let Some(classes) = self.classes.get(&from).cloned() {
            self.classes.insert(to, classes);
        }
        if let Some(style) = self.styles.get(&from).copied() {
            self.styles.insert(to, style);
        }
        let pairs: Vec<(NodeId, NodeId)> = self
            .tree
            .children(from)
            .iter()
            .copied()
            .zip(self.tree.children(to).iter().copied())
            .collect();
        for (a, b) in pairs {
            self.copy_attributes(a, b);
        }
    }

    fn forget(&mut self, element: NodeId) {
        let mut stack = vec![element];
        while let Some(node) = stack.pop() {
            self.classes.remove(&node);
            self.styles.remove(&node);
            self.animating.remove(&node);
            self.hidden.remove(&node);
            if self.focused == Some(node) {
                self.focused = None;
            }
            stack.extend_from_slice(self.tree.children(node));
        }
    }
}

impl Surface for SceneSurface {
    type Element = NodeId;

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn bounds(&self, element: NodeId) -> Option<Rect> {
        if !self.is_attached(element) {
            return None;
        }
        self.tree.bounds(element)
    }

    fn parent_of(&self, element: NodeId) -> Option<NodeId> {
        self.tree.parent_of(element)
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.tree.contains(ancestor, node)
    }

    fn is_focusable(&self, element: NodeId) -> bool {
        self.tree
            .flags(element)
            .is_some_and(|f| f.contains(NodeFlags::FOCUSABLE))
    }

    fn focus(&mut self, element: NodeId) {
        if self.is_focusable(element) {
            self.focused = Some(element);
        }
    }

    fn apply_style(&mut self, element: NodeId, changes: &PositionChanges) {
        if !self.tree.is_alive(element) {
            return;
        }
        let style = self.styles.entry(element).or_default();
        if let Some(top) = changes.top {
            style.top = Some(top);
        }
        match changes.anchor {
            Some(HorizontalAnchor::Left(left)) => {
                style.left = Some(left);
                style.right = None;
            }
            Some(HorizontalAnchor::Right(right)) => {
                style.right = Some(right);
                style.left = None;
            }
            None => {}
        }
        if let Some(width) = changes.width {
            style.width = Some(width);
        }
    }

    fn add_class(&mut self, element: NodeId, class: &str) {
        if !self.tree.is_alive(element) {
            return;
        }
        let classes = self.classes.entry(element).or_default();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_owned());
        }
    }

    fn remove_class(&mut self, element: NodeId, class: &str) {
        if let Some(classes) = self.classes.get_mut(&element) {
            classes.retain(|c| c != class);
        }
    }

    fn has_class(&self, element: NodeId, class: &str) -> bool {
        self.classes(element).iter().any(|c| c == class)
    }

    fn is_animating(&self, element: NodeId) -> bool {
        self.animating.contains(&element)
    }

    fn clone_element(&mut self, element: NodeId) -> Option<NodeId> {
        let parent = self.tree.parent_of(element);
        let copy = self.tree.clone_subtree(element, parent)?;
        self.copy_attributes(element, copy);
        Some(copy)
    }

    fn remove_element(&mut self, element: NodeId) {
        self.forget(element);
        self.tree.remove(element);
    }

    fn set_hidden(&mut self, element: NodeId, hidden: bool) {
        if hidden {
            if self.hidden.contains_key(&element) {
                return;
            }
            if let Some(parent) = self.tree.parent_of(element) {
                self.hidden.insert(element, parent);
                self.tree.reparent(element, None);
            }
        } else if let Some(parent) = self.hidden.remove(&element)
            && self.tree.is_alive(parent)
        {
            self.tree.reparent(element, Some(parent));
        }
    }

    fn ensure_outlet(&mut self) -> NodeId {
        if let Some(outlet) = self.outlet.filter(|o| self.tree.is_alive(*o)) {
            return outlet;
        }
        let bounds = self.tree.bounds(self.document).unwrap_or(Rect::ZERO);
        let outlet = self.tree.insert_first(
            self.document,
            LocalNode {
                bounds,
                // The outlet only hosts content; it never takes pointer hits itself.
                flags: NodeFlags::VISIBLE,
                ..Default::default()
            },
        );
        self.outlet = Some(outlet);
        outlet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outlet_is_created_once_as_first_child() {
        let mut s = SceneSurface::new(800.0, 600.0);
        let body = s.document();
        let existing = s.insert(body, Rect::new(0.0, 0.0, 10.0, 10.0));
        let outlet = s.ensure_outlet();
        assert_eq!(s.ensure_outlet(), outlet);
        assert_eq!(s.tree().children(body), &[outlet, existing]);
    }

    #[test]
    fn detached_elements_have_no_bounds() {
        let mut s = SceneSurface::new(800.0, 600.0);
        let el = s.insert(s.document(), Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(s.bounds(el).is_some());
        s.detach(el);
        assert_eq!(s.bounds(el), None);
        s.attach(el, s.document());
        assert!(s.bounds(el).is_some());
    }

    #[test]
    fn left_and_right_are_exclusive() {
        let mut s = SceneSurface::new(800.0, 600.0);
        let el = s.insert(s.document(), Rect::ZERO);
        s.apply_style(
            el,
            &PositionChanges {
                top: Some(5.0),
                anchor: Some(HorizontalAnchor::Left(10.0)),
                ..Default::default()
            },
        );
        s.apply_style(
            el,
            &PositionChanges {
                anchor: Some(HorizontalAnchor::Right(3.0)),
                ..Default::default()
            },
        );
        let style = s.applied_style(el).unwrap();
        assert_eq!(style.left, None);
        assert_eq!(style.right, Some(3.0));
        assert_eq!(style.top, Some(5.0));
    }

    #[test]
    fn clone_copies_classes_deeply() {
        let mut s = SceneSurface::new(800.0, 600.0);
        let body = s.document();
        let panel = s.insert(body, Rect::new(0.0, 0.0, 100.0, 100.0));
        let item = s.insert(panel, Rect::new(0.0, 0.0, 100.0, 20.0));
        s.add_class(panel, "panel");
        s.add_class(item, "item");

        let copy = s.clone_element(panel).unwrap();
        assert_eq!(s.parent_of(copy), Some(body));
        assert!(s.has_class(copy, "panel"));
        let copied_item = s.tree().children(copy)[0];
        assert!(s.has_class(copied_item, "item"));

        s.remove_element(copy);
        assert!(!s.is_attached(copy));
        assert!(s.has_class(panel, "panel"));
    }

    #[test]
    fn scrolling_moves_elements_and_viewport() {
        let mut s = SceneSurface::new(800.0, 600.0);
        let el = s.insert(s.document(), Rect::new(10.0, 500.0, 20.0, 510.0));
        s.scroll_to(0.0, 200.0);
        assert_eq!(s.viewport().scroll, Vec2::new(0.0, 200.0));
        assert_eq!(s.bounds(el), Some(Rect::new(10.0, 300.0, 20.0, 310.0)));
    }

    #[test]
    fn element_at_skips_outlet() {
        let mut s = SceneSurface::new(800.0, 600.0);
        let outlet = s.ensure_outlet();
        let panel = s.insert(outlet, Rect::new(100.0, 100.0, 200.0, 200.0));
        assert_eq!(s.element_at(Point::new(150.0, 150.0)), Some(panel));
        assert_eq!(s.element_at(Point::new(400.0, 400.0)), Some(s.document()));
    }

    #[test]
    fn hidden_elements_leave_the_page_until_shown() {
        let mut s = SceneSurface::new(800.0, 600.0);
        let outlet = s.ensure_outlet();
        let panel = s.insert(outlet, Rect::new(100.0, 100.0, 200.0, 200.0));
        let item = s.insert(panel, Rect::new(100.0, 100.0, 200.0, 120.0));

        s.set_hidden(panel, true);
        s.set_hidden(panel, true);
        assert!(s.is_hidden(panel));
        assert_eq!(s.bounds(panel), None);
        assert_eq!(s.bounds(item), None);
        assert_eq!(s.element_at(Point::new(150.0, 110.0)), Some(s.document()));

        s.set_hidden(panel, false);
        assert!(!s.is_hidden(panel));
        assert_eq!(s.parent_of(panel), Some(outlet));
        assert_eq!(s.element_at(Point::new(150.0, 110.0)), Some(item));
        // Showing a visible element changes nothing.
        s.set_hidden(panel, false);
        assert_eq!(s.parent_of(panel), Some(outlet));
    }

    #[test]
    fn focus_requires_focusable() {
        let mut s = SceneSurface::new(800.0, 600.0);
        let el = s.insert(s.document(), Rect::ZERO);
        s.focus(el);
        assert_eq!(s.focused(), None);
        s.set_focusable(el, true);
        s.focus(el);
        assert_eq!(s.focused(), Some(el));
    }
}
