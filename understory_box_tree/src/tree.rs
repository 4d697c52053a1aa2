// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, updates, queries.

use alloc::vec::Vec;
use kurbo::{Point, Rect};

use crate::types::{LocalNode, NodeFlags, NodeId};

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-level region tree.
pub struct Tree {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.len();
        let free = self.free_list.len();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .finish_non_exhaustive()
    }
}

/// Results of a hit test.
#[derive(Clone, Debug)]
pub struct Hit {
    /// The matched node.
    pub node: NodeId,
    /// Path from root to node (inclusive).
    pub path: Vec<NodeId>,
}

/// Filters applied during hit testing.
///
/// Used by [`Tree::hit_test_point`].
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryFilter {
    /// If true, only consider nodes marked [`NodeFlags::VISIBLE`].
    pub visible_only: bool,
    /// If true, only consider nodes marked [`NodeFlags::PICKABLE`].
    pub pickable_only: bool,
    /// If set, only consider this node and its descendants.
    pub within: Option<NodeId>,
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: LocalNode,
}

impl Node {
    fn new(generation: u32, local: LocalNode) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            local,
        }
    }
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Returns true if the tree has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a new node as the last child of `parent` (or as a root if `None`).
    ///
    /// A stale `parent` inserts the node as a root.
    pub fn insert(&mut self, parent: Option<NodeId>, local: LocalNode) -> NodeId {
        let id = self.allocate(local);
        if let Some(p) = parent.filter(|p| self.is_alive(*p)) {
            self.link_parent(id, p, None);
        }
        id
    }

    /// Insert a new node as the first child of `parent`.
    pub fn insert_first(&mut self, parent: NodeId, local: LocalNode) -> NodeId {
        let id = self.allocate(local);
        if self.is_alive(parent) {
            self.link_parent(id, parent, Some(0));
        }
        id
    }

    /// Remove a node (and its subtree) from the tree.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Reparent `id` under `new_parent`.
    ///
    /// Moving a node underneath its own subtree is ignored.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(p) = new_parent
            && (!self.is_alive(p) || self.contains(id, p))
        {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent {
            self.link_parent(id, p, None);
        }
    }

    /// Update bounds.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.bounds = bounds;
        }
    }

    /// Update z index.
    pub fn set_z_index(&mut self, id: NodeId, z: i32) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.z_index = z;
        }
    }

    /// Update node flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.flags = flags;
        }
    }

    /// Returns the bounds of a node if the identifier is live.
    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        self.node_opt(id).map(|n| n.local.bounds)
    }

    /// Returns the flags of a node if the identifier is live.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.node_opt(id).map(|n| n.local.flags)
    }

    /// Returns the z-index of a node if the identifier is live.
    pub fn z_index(&self, id: NodeId) -> Option<i32> {
        self.node_opt(id).map(|n| n.local.z_index)
    }

    /// Returns the parent of a live node.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Returns the children of a live node in insertion order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Iterate `id` and its ancestors, innermost first.
    ///
    /// Yields nothing for a stale identifier.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let start = self.is_alive(id).then_some(id);
        core::iter::successors(start, move |&n| self.parent_of(n))
    }

    /// Returns the root of the subtree holding `id`.
    pub fn root_of(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id).last()
    }

    /// Returns true if `node` is `ancestor` or lies anywhere beneath it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.is_alive(ancestor) && self.ancestors(node).any(|n| n == ancestor)
    }

    /// Path from root to `id` (inclusive). Empty for a stale identifier.
    pub fn path(&self, id: NodeId) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = self.ancestors(id).collect();
        out.reverse();
        out
    }

    /// Deep-copy the subtree rooted at `id` and attach the copy under `parent`.
    ///
    /// Returns the identifier of the copied root, or `None` if `id` is stale.
    pub fn clone_subtree(&mut self, id: NodeId, parent: Option<NodeId>) -> Option<NodeId> {
        let local = self.node_opt(id)?.local.clone();
        let children = self.node(id).children.clone();
        let copy = self.insert(parent, local);
        for child in children {
            let _ = self.clone_subtree(child, Some(copy));
        }
        Some(copy)
    }

    /// Hit test a viewport-space point. Returns the topmost node.
    ///
    /// If multiple nodes overlap with the same `z_index`, the newer [`NodeId`] wins.
    pub fn hit_test_point(&self, pt: Point, filter: QueryFilter) -> Option<Hit> {
        let mut best: Option<(NodeId, i32)> = None;
        for (i, slot) in self.nodes.iter().enumerate() {
            let Some(node) = slot.as_ref() else {
                continue;
            };
            if filter.visible_only && !node.local.flags.contains(NodeFlags::VISIBLE) {
                continue;
            }
            if filter.pickable_only && !node.local.flags.contains(NodeFlags::PICKABLE) {
                continue;
            }
            if !node.local.bounds.contains(pt) {
                continue;
            }
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            let id = NodeId::new(i as u32, node.generation);
            if let Some(root) = filter.within
                && !self.contains(root, id)
            {
                continue;
            }
            match best {
                None => best = Some((id, node.local.z_index)),
                Some((best_id, z_best)) => {
                    let z = node.local.z_index;
                    if z > z_best || (z == z_best && Self::id_is_newer(id, best_id)) {
                        best = Some((id, z));
                    }
                }
            }
        }
        best.map(|(node, _)| Hit {
            node,
            path: self.path(node),
        })
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    /// See [`NodeId`] docs for the generational semantics.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    // --- internals ---

    #[inline]
    fn id_is_newer(a: NodeId, b: NodeId) -> bool {
        (a.generation() > b.generation()) || (a.generation() == b.generation() && a.0 > b.0)
    }

    fn allocate(&mut self, local: LocalNode) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, local));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, local)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Access a node; panics if `id` is stale.
    fn node(&self, id: NodeId) -> &Node {
        self.node_opt(id).expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.generation()).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.generation() {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId, at: Option<usize>) {
        if let Some(p) = self.node_opt_mut(parent) {
            match at {
                Some(i) => p.children.insert(i.min(p.children.len()), id),
                None => p.children.push(id),
            }
        }
        if let Some(n) = self.node_opt_mut(id) {
            n.parent = Some(parent);
        }
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.node_opt_mut(id) {
            n.parent = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn boxed(x0: f64, y0: f64, x1: f64, y1: f64) -> LocalNode {
        LocalNode {
            bounds: Rect::new(x0, y0, x1, y1),
            ..Default::default()
        }
    }

    const PICK: QueryFilter = QueryFilter {
        visible_only: true,
        pickable_only: true,
        within: None,
    };

    #[test]
    fn insert_and_hit_test() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 200.0, 200.0));
        let _a = tree.insert(Some(root), boxed(10.0, 10.0, 60.0, 60.0));
        let b = tree.insert(
            Some(root),
            LocalNode {
                z_index: 10,
                ..boxed(40.0, 40.0, 120.0, 120.0)
            },
        );

        let hit = tree.hit_test_point(Point::new(50.0, 50.0), PICK).unwrap();
        assert_eq!(hit.node, b, "topmost by z should win");
        assert_eq!(hit.path.first().copied(), Some(root));
        assert_eq!(hit.path.last().copied(), Some(b));
    }

    #[test]
    fn unpickable_nodes_are_skipped() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 100.0, 100.0));
        let veil = tree.insert(
            Some(root),
            LocalNode {
                flags: NodeFlags::VISIBLE,
                z_index: 5,
                ..boxed(0.0, 0.0, 100.0, 100.0)
            },
        );
        let hit = tree.hit_test_point(Point::new(5.0, 5.0), PICK).unwrap();
        assert_eq!(hit.node, root);
        let any = tree
            .hit_test_point(Point::new(5.0, 5.0), QueryFilter::default())
            .unwrap();
        assert_eq!(any.node, veil);
    }

    #[test]
    fn hit_test_within_subtree() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 100.0, 100.0));
        let loose = tree.insert(None, boxed(0.0, 0.0, 50.0, 50.0));
        let any = tree.hit_test_point(Point::new(5.0, 5.0), PICK).unwrap();
        assert_eq!(any.node, loose);
        let filter = QueryFilter {
            within: Some(root),
            ..PICK
        };
        let hit = tree.hit_test_point(Point::new(5.0, 5.0), filter).unwrap();
        assert_eq!(hit.node, root);
    }

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 1.0, 1.0));
        let a = tree.insert(Some(root), boxed(0.0, 0.0, 1.0, 1.0));

        assert!(tree.is_alive(root));
        assert!(tree.is_alive(a));

        // Remove child; id becomes stale.
        tree.remove(a);
        assert!(!tree.is_alive(a));
        assert!(tree.children(root).is_empty());

        // Reuse slot by inserting a new node; old id must remain stale; new id is live.
        let b = tree.insert(Some(root), boxed(0.0, 0.0, 1.0, 1.0));
        assert!(tree.is_alive(b));
        assert!(!tree.is_alive(a));
        if a.0 == b.0 {
            assert!(b.1 > a.1, "generation must increase on reuse");
        }
    }

    #[test]
    fn newer_than_semantics() {
        let old = NodeId::new(10, 1);
        let newer_same_slot = NodeId::new(10, 2);
        let same_gen_higher_slot = NodeId::new(11, 2);
        let same_gen_lower_slot = NodeId::new(9, 2);

        assert!(Tree::id_is_newer(newer_same_slot, old));
        assert!(Tree::id_is_newer(same_gen_higher_slot, newer_same_slot));
        assert!(!Tree::id_is_newer(same_gen_lower_slot, newer_same_slot));
    }

    #[test]
    fn hit_equal_z_newer_wins() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 200.0, 200.0));
        let a = tree.insert(Some(root), boxed(40.0, 40.0, 120.0, 120.0));
        let b = tree.insert(Some(root), boxed(40.0, 40.0, 120.0, 120.0));

        let hit1 = tree.hit_test_point(Point::new(60.0, 60.0), PICK).unwrap();
        let expected1 = if Tree::id_is_newer(b, a) { b } else { a };
        assert_eq!(hit1.node, expected1);

        // Reusing a's slot bumps the generation, so c beats b.
        tree.remove(a);
        let c = tree.insert(Some(root), boxed(40.0, 40.0, 120.0, 120.0));
        assert!(Tree::id_is_newer(c, b));
        let hit2 = tree.hit_test_point(Point::new(60.0, 60.0), PICK).unwrap();
        assert_eq!(hit2.node, c, "newer id should win on equal z");
    }

    #[test]
    fn accessors_respect_liveness() {
        let mut tree = Tree::new();
        let node = tree.insert(
            None,
            LocalNode {
                z_index: 7,
                ..boxed(0.0, 0.0, 1.0, 1.0)
            },
        );
        assert_eq!(tree.z_index(node), Some(7));
        assert_eq!(tree.bounds(node), Some(Rect::new(0.0, 0.0, 1.0, 1.0)));
        tree.remove(node);
        assert_eq!(tree.z_index(node), None, "stale ids must return None");
        assert_eq!(tree.bounds(node), None);
        assert_eq!(tree.flags(node), None);
        assert_eq!(tree.ancestors(node).count(), 0);
    }

    #[test]
    fn containment_and_ancestry() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 100.0, 100.0));
        let a = tree.insert(Some(root), boxed(0.0, 0.0, 50.0, 50.0));
        let b = tree.insert(Some(a), boxed(0.0, 0.0, 10.0, 10.0));
        let other = tree.insert(None, boxed(0.0, 0.0, 10.0, 10.0));

        assert!(tree.contains(root, b));
        assert!(tree.contains(a, a), "containment is inclusive");
        assert!(!tree.contains(b, a));
        assert!(!tree.contains(other, b));
        assert_eq!(tree.path(b), vec![root, a, b]);
        assert_eq!(tree.root_of(b), Some(root));
        assert_eq!(tree.root_of(other), Some(other));
    }

    #[test]
    fn reparent_refuses_cycles() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 100.0, 100.0));
        let a = tree.insert(Some(root), boxed(0.0, 0.0, 50.0, 50.0));
        let b = tree.insert(Some(a), boxed(0.0, 0.0, 10.0, 10.0));

        tree.reparent(a, Some(b));
        assert_eq!(tree.parent_of(a), Some(root));

        tree.reparent(b, None);
        assert_eq!(tree.parent_of(b), None);
        assert!(tree.children(a).is_empty());
    }

    #[test]
    fn insert_first_puts_child_in_front() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 100.0, 100.0));
        let a = tree.insert(Some(root), LocalNode::default());
        let b = tree.insert_first(root, LocalNode::default());
        assert_eq!(tree.children(root), &[b, a]);
    }

    #[test]
    fn clone_subtree_copies_structure() {
        let mut tree = Tree::new();
        let root = tree.insert(None, boxed(0.0, 0.0, 100.0, 100.0));
        let panel = tree.insert(
            Some(root),
            LocalNode {
                z_index: 3,
                ..boxed(10.0, 10.0, 60.0, 60.0)
            },
        );
        let _item = tree.insert(Some(panel), boxed(10.0, 10.0, 60.0, 20.0));

        let copy = tree.clone_subtree(panel, Some(root)).unwrap();
        assert_ne!(copy, panel);
        assert_eq!(tree.parent_of(copy), Some(root));
        assert_eq!(tree.bounds(copy), tree.bounds(panel));
        assert_eq!(tree.z_index(copy), Some(3));
        assert_eq!(tree.children(copy).len(), 1);
        assert_eq!(tree.len(), 5);

        tree.remove(copy);
        assert_eq!(tree.len(), 3);
    }
}
