// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay registry: which trigger and content belong to which overlay.
//!
//! Dismissal needs to answer "does this click belong to me, perhaps through a
//! child overlay?". The registry records, for every live overlay, its trigger,
//! its floating content while mounted, whether it is open, and an optional
//! explicit parent, so that question is answered by lookups rather than by
//! scanning the page. Content of a closed overlay belongs to nobody.

use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use crate::error::RegistryError;
use crate::id::OverlayId;
use crate::surface::Surface;

/// What the registry knows about one overlay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayEntry<E> {
    /// The element that opens and closes the overlay.
    pub trigger: E,
    /// The floating content, while it is mounted.
    pub content: Option<E>,
    /// Overlay this one is nested in, when declared explicitly.
    pub parent: Option<OverlayId>,
    /// Whether the overlay is open.
    pub open: bool,
}

/// Registry of live overlays on one page.
#[derive(Clone, Debug)]
pub struct OverlayRegistry<E> {
    entries: HashMap<OverlayId, OverlayEntry<E>>,
    contents: HashMap<E, OverlayId>,
}

/// A registry shared by every overlay on a page.
pub type SharedRegistry<E> = Rc<RefCell<OverlayRegistry<E>>>;

impl<E> Default for OverlayRegistry<E> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            contents: HashMap::new(),
        }
    }
}

impl<E: Copy + Eq + Hash> OverlayRegistry<E> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry ready to be shared between overlays.
    pub fn new_shared() -> SharedRegistry<E> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Number of registered overlays.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no overlay is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a new overlay.
    pub fn register(
        &mut self,
        id: OverlayId,
        trigger: E,
        parent: Option<OverlayId>,
    ) -> Result<(), RegistryError> {
        if self.entries.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }
        self.entries.insert(
            id,
            OverlayEntry {
                trigger,
                content: None,
                parent,
                open: false,
            },
        );
        Ok(())
    }

    /// Forget an overlay. Returns its entry if it was registered.
    pub fn unregister(&mut self, id: &OverlayId) -> Option<OverlayEntry<E>> {
        let entry = self.entries.remove(id)?;
        if let Some(content) = entry.content {
            self.contents.remove(&content);
        }
        Some(entry)
    }

    /// Record the overlay's mounted content, or `None` once it is gone.
    ///
    /// Unknown ids are ignored.
    pub fn set_content(&mut self, id: &OverlayId, content: Option<E>) {
        let Some(entry) = self.entries.get_mut(id) else {
            return;
        };
        if let Some(old) = entry.content.take() {
            self.contents.remove(&old);
        }
        if let Some(new) = content {
            self.contents.insert(new, id.clone());
        }
        entry.content = content;
    }

    /// Record the overlay opening or closing.
    ///
    /// Unknown ids are ignored.
    pub fn set_open(&mut self, id: &OverlayId, open: bool) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.open = open;
        }
    }

    /// Look up an overlay.
    pub fn entry(&self, id: &OverlayId) -> Option<&OverlayEntry<E>> {
        self.entries.get(id)
    }

    /// The overlay whose content element is exactly `content`.
    pub fn overlay_for_content(&self, content: E) -> Option<&OverlayId> {
        self.contents.get(&content)
    }

    /// The nearest open overlay whose content is `node` or one of its
    /// ancestors.
    pub fn enclosing_overlay<S>(&self, surface: &S, node: E) -> Option<&OverlayId>
    where
        S: Surface<Element = E>,
    {
        let mut cursor = Some(node);
        while let Some(el) = cursor {
            if let Some(id) = self.contents.get(&el)
                && self.entries.get(id).is_some_and(|e| e.open)
            {
                return Some(id);
            }
            cursor = surface.parent_of(el);
        }
        None
    }

    /// Returns true if `node` belongs to overlay `id`, either directly or
    /// through any chain of overlays nested inside it.
    ///
    /// A node belongs to an overlay when it lies inside the overlay's trigger
    /// or, while open, its content. It belongs transitively when it lies
    /// inside an open child overlay whose trigger belongs, or whose declared
    /// parent is the overlay or belongs to it in turn.
    pub fn owns<S>(&self, surface: &S, id: &OverlayId, node: E) -> bool
    where
        S: Surface<Element = E>,
    {
        let Some(entry) = self.entries.get(id) else {
            return false;
        };
        let inside = |el: E| {
            surface.contains(entry.trigger, el)
                || entry
                    .content
                    .is_some_and(|c| entry.open && surface.contains(c, el))
        };

        let mut cursor = node;
        // Each step moves to a different overlay, so the walk is bounded.
        for _ in 0..=self.entries.len() {
            if inside(cursor) {
                return true;
            }
            let Some(nested) = self.enclosing_overlay(surface, cursor) else {
                return false;
            };
            let Some(mut top) = self.entries.get(nested) else {
                return false;
            };
            // Declared parents link overlays whose triggers were moved out
            // of the parent's content.
            for _ in 0..self.entries.len() {
                match &top.parent {
                    Some(parent) if parent == id => return true,
                    Some(parent) => match self.entries.get(parent) {
                        Some(entry) => top = entry,
                        None => break,
                    },
                    None => break,
                }
            }
            let next = top.trigger;
            if next == cursor {
                return false;
            }
            cursor = next;
        }
        false
    }
}
