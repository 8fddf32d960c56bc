// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node arena: structure, cached world rectangles, visibility and dirty levels.

use smallvec::SmallVec;

use crate::backend::SurfaceHandle;
use crate::behavior::Behavior;
use crate::event::EventKinds;
use crate::geometry::PixelRect;
use crate::transform::Transform;
use crate::types::{Capabilities, DirtyLevel, NodeId};

pub(crate) type Children = SmallVec<[NodeId; 4]>;

/// Drawable state: the offscreen surface and what must happen to it.
#[derive(Clone, Debug, Default)]
pub(crate) struct Sprite {
    pub(crate) surface: Option<SurfaceHandle>,
    pub(crate) surface_size: (u32, u32),
    pub(crate) dirty: DirtyLevel,
    /// Screen area this sprite covered at the last composite.
    pub(crate) presented: Option<PixelRect>,
}

impl Sprite {
    pub(crate) fn mark(&mut self, level: DirtyLevel) {
        self.dirty = self.dirty.max(level);
    }
}

#[derive(Debug)]
pub(crate) struct Node {
    generation: u32,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Children,
    pub(crate) transform: Transform,
    pub(crate) enabled: bool,
    pub(crate) visible: bool,
    pub(crate) world_rect: PixelRect,
    pub(crate) sprite: Option<Sprite>,
    pub(crate) kinds: EventKinds,
    pub(crate) capabilities: Capabilities,
    pub(crate) class_name: &'static str,
    /// `None` while the behavior is lent out to a callback.
    pub(crate) behavior: Option<Box<dyn Behavior>>,
    pub(crate) faulted: bool,
    pub(crate) transient: bool,
    /// Children were added, removed, reordered or resized.
    pub(crate) children_changed: bool,
}

impl Node {
    pub(crate) fn new(
        transform: Transform,
        enabled: bool,
        transient: bool,
        behavior: Box<dyn Behavior>,
    ) -> Self {
        let capabilities = behavior.capabilities();
        Self {
            generation: 0,
            parent: None,
            children: Children::new(),
            transform,
            enabled,
            visible: false,
            world_rect: PixelRect::ZERO,
            sprite: capabilities
                .contains(Capabilities::DRAWABLE)
                .then(Sprite::default),
            kinds: behavior.event_kinds(),
            capabilities,
            class_name: behavior.class_name(),
            behavior: Some(behavior),
            faulted: false,
            transient,
            children_changed: false,
        }
    }
}

/// Generational arena of nodes plus the ordered top-level list.
///
/// Parents own their children through the `children` sequence; everything
/// else refers to nodes by [`NodeId`].
pub(crate) struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    roots: Children,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("roots", &self.roots)
            .finish_non_exhaustive()
    }
}

impl Tree {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            roots: Children::new(),
        }
    }

    /// Inserts `node` as the last child of `parent` (or as a top-level node).
    ///
    /// The caller has checked that `parent` is alive and accepts children.
    pub(crate) fn insert(&mut self, parent: Option<NodeId>, mut node: Node) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.generations.push(1);
            self.nodes.push(None);
            (self.nodes.len() - 1, 1)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId::new(idx as u32, generation);

        node.generation = generation;
        node.parent = parent;
        node.transform.owner = Some(id);
        self.nodes[idx] = Some(node);
        self.siblings_mut(parent).push(id);

        if let Some(p) = parent {
            self.node_mut(p).children_changed = true;
        }
        let origin = self.parent_origin(id);
        let parent_visible = parent.is_none_or(|p| self.shows_children(p));
        let node = self.node_mut(id);
        node.world_rect = node.transform.rect().translate(origin.0, origin.1);
        node.visible = node.enabled && parent_visible;
        if let Some(sprite) = node.sprite.as_mut() {
            sprite.mark(DirtyLevel::FullResize);
        }
        id
    }

    /// Detaches `id` from its parent and frees its slot.
    ///
    /// Children are not touched; the caller removes them first.
    pub(crate) fn take(&mut self, id: NodeId) -> Option<Node> {
        if !self.is_alive(id) {
            return None;
        }
        let parent = self.node(id).parent;
        self.siblings_mut(parent).retain(|c| *c != id);
        if let Some(p) = parent.and_then(|p| self.get_mut(p)) {
            p.children_changed = true;
        }
        let mut node = self.nodes[id.idx()].take()?;
        node.transform.owner = None;
        self.free_list.push(id.idx());
        Some(node)
    }

    pub(crate) fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    /// Access a live node; panics if `id` is stale.
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.get(id).expect("dangling NodeId")
    }

    /// Access a live node mutably; panics if `id` is stale.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.get_mut(id).expect("dangling NodeId")
    }

    pub(crate) fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub(crate) fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub(crate) fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// The children of `parent`, or the top-level list for `None`.
    pub(crate) fn siblings(&self, parent: Option<NodeId>) -> &[NodeId] {
        match parent {
            Some(p) => self.children_of(p),
            None => &self.roots,
        }
    }

    pub(crate) fn siblings_mut(&mut self, parent: Option<NodeId>) -> &mut Children {
        match parent {
            Some(p) => &mut self.node_mut(p).children,
            None => &mut self.roots,
        }
    }

    /// Top-left of the parent's world rectangle; the origin for top-level nodes.
    fn parent_origin(&self, id: NodeId) -> (i32, i32) {
        self.node(id)
            .parent
            .map_or((0, 0), |p| self.node(p).world_rect.origin())
    }

    pub(crate) fn mark_dirty(&mut self, id: NodeId, level: DirtyLevel) {
        if let Some(sprite) = self.get_mut(id).and_then(|n| n.sprite.as_mut()) {
            sprite.mark(level);
        }
    }

    pub(crate) fn mark_subtree_dirty(&mut self, id: NodeId, level: DirtyLevel) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            self.mark_dirty(id, level);
            stack.extend(self.children_of(id).iter().copied());
        }
    }

    /// Change notification from a node's [`Transform`].
    ///
    /// Re-derives the world rectangle from the parent's cached one. A size
    /// change forces a full resize of the node's surface; a move translates
    /// every descendant's cached rectangle by the same delta and marks the
    /// subtree for redraw. A zero net change does nothing.
    pub(crate) fn transform_changed(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        let origin = self.parent_origin(id);
        let node = self.node_mut(id);
        let new = node.transform.rect().translate(origin.0, origin.1);
        let old = node.world_rect;
        if new == old {
            return;
        }
        node.world_rect = new;
        let resized = (new.width, new.height) != (old.width, old.height);
        if let Some(sprite) = node.sprite.as_mut() {
            sprite.mark(if resized {
                DirtyLevel::FullResize
            } else {
                DirtyLevel::Redraw
            });
        }
        if resized && let Some(p) = node.parent {
            self.node_mut(p).children_changed = true;
        }

        let (dx, dy) = (new.x - old.x, new.y - old.y);
        if dx == 0 && dy == 0 {
            return;
        }
        let mut stack: Vec<NodeId> = self.node(id).children.to_vec();
        while let Some(child) = stack.pop() {
            let child = self.node_mut(child);
            child.world_rect = child.world_rect.translate(dx, dy);
            if let Some(sprite) = child.sprite.as_mut() {
                sprite.mark(DirtyLevel::Redraw);
            }
            stack.extend(child.children.iter().copied());
        }
    }

    /// Sets a node's own flag and recomputes visibility for its whole subtree.
    pub(crate) fn set_enabled(&mut self, id: NodeId, enabled: bool) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        node.enabled = enabled;
        self.refresh_visibility(id);
    }

    /// Marks or clears a node's fault. A faulted node stays visible as a
    /// placeholder; its descendants are hidden until the fault is cleared.
    pub(crate) fn set_faulted(&mut self, id: NodeId, faulted: bool) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        if node.faulted != faulted {
            node.faulted = faulted;
            self.refresh_visibility(id);
        }
    }

    /// Whether children of `id` may be visible at all.
    fn shows_children(&self, id: NodeId) -> bool {
        let node = self.node(id);
        node.visible && !node.faulted
    }

    /// Recomputes visibility for the subtree at `id`.
    ///
    /// A node is visible iff it and every ancestor are enabled and no ancestor
    /// is faulted. Sprites whose visibility flips are marked for redraw.
    fn refresh_visibility(&mut self, id: NodeId) {
        let shown = self.node(id).parent.is_none_or(|p| self.shows_children(p));
        let mut stack = vec![(id, shown)];
        while let Some((id, shown)) = stack.pop() {
            let node = self.node_mut(id);
            let visible = node.enabled && shown;
            if node.visible != visible {
                node.visible = visible;
                if let Some(sprite) = node.sprite.as_mut() {
                    sprite.mark(DirtyLevel::Redraw);
                }
            }
            let shows = visible && !node.faulted;
            stack.extend(node.children.iter().map(|&c| (c, shows)));
        }
    }

    /// Moves `id` within its parent's children to `index`, clamped to the end.
    pub(crate) fn move_within_parent(&mut self, id: NodeId, index: usize) {
        let parent = self.node(id).parent;
        let siblings = self.siblings_mut(parent);
        let Some(from) = siblings.iter().position(|&c| c == id) else {
            return;
        };
        siblings.remove(from);
        let to = index.min(siblings.len());
        siblings.insert(to, id);
        if from != to {
            if let Some(p) = parent {
                self.node_mut(p).children_changed = true;
            }
            self.mark_subtree_dirty(id, DirtyLevel::Redraw);
        }
    }

    pub(crate) fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent_of(id);
        while let Some(p) = current {
            depth += 1;
            current = self.parent_of(p);
        }
        depth
    }

    /// Live ids in paint order: parents before children, siblings in order.
    pub(crate) fn paint_order(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children_of(id).iter().rev().copied());
        }
        out
    }

    pub(crate) fn next_depth_first(&self, current: NodeId) -> Option<NodeId> {
        if !self.is_alive(current) {
            return None;
        }
        if let Some(&first_child) = self.children_of(current).first() {
            return Some(first_child);
        }
        let mut node = current;
        loop {
            if let Some(next) = self.next_sibling(node) {
                return Some(next);
            }
            node = self.parent_of(node)?;
        }
    }

    pub(crate) fn prev_depth_first(&self, current: NodeId) -> Option<NodeId> {
        if !self.is_alive(current) {
            return None;
        }
        if let Some(prev) = self.prev_sibling(current) {
            return Some(self.last_in_subtree(prev));
        }
        self.parent_of(current)
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let siblings = self.siblings(self.parent_of(node));
        let pos = siblings.iter().position(|&id| id == node)?;
        siblings.get(pos + 1).copied()
    }

    fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        let siblings = self.siblings(self.parent_of(node));
        let pos = siblings.iter().position(|&id| id == node)?;
        pos.checked_sub(1).map(|p| siblings[p])
    }

    fn last_in_subtree(&self, mut node: NodeId) -> NodeId {
        while let Some(&last) = self.children_of(node).last() {
            node = last;
        }
        node
    }
}
