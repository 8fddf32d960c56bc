// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene: node tree, handler registry, per-frame update and draw.

use core::any::Any;

use kurbo::Point;
use tracing::{debug, error, trace, warn};

use crate::backend::{Backend, SurfaceHandle};
use crate::behavior::{Behavior, NodeCx, PaintCx, Scrollable};
use crate::class::{ClassRegistry, Props};
use crate::config::EngineConfig;
use crate::draw_group::{DrawGroup, Layer};
use crate::error::{NodeError, SceneError};
use crate::event::Event;
use crate::geometry::PixelRect;
use crate::registry::HandlerRegistry;
use crate::transform::{Transform, TransformMut};
use crate::tree::{Node, Tree};
use crate::types::{Capabilities, DirtyLevel, NodeId};

/// Initial state of a node being constructed.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeInit {
    /// Position, size and anchor relative to the parent.
    pub transform: Transform,
    /// The node's own enabled flag.
    pub enabled: bool,
    /// Transient nodes are built by their parent and left out of saved records.
    pub transient: bool,
}

impl Default for NodeInit {
    fn default() -> Self {
        Self::new(Transform::default())
    }
}

impl NodeInit {
    /// An enabled, persistent node with `transform`.
    #[must_use]
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            enabled: true,
            transient: false,
        }
    }

    /// A top-left anchored node at `(x, y)` sized `width` × `height`.
    #[must_use]
    pub fn at(x: f64, y: f64, width: i32, height: i32) -> Self {
        Self::new(Transform::new(x, y, width, height))
    }

    /// Starts the node disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Marks the node transient.
    #[must_use]
    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }
}

/// A request to replace the running scene, polled by the host.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneRequest {
    /// Name of the scene to open.
    pub name: String,
    /// Arguments for the new scene.
    pub args: Props,
}

/// A retained tree of nodes drawn through a dirty-rectangle compositor.
///
/// A frame is `handle_event` for each input event, then [`Scene::update`],
/// then [`Scene::draw`]. All three run on one thread and never overlap.
///
/// ```rust
/// use arbor_scene::{Backend, Color, HeadlessBackend, NodeInit, Scene, SpriteNode};
///
/// let mut scene = Scene::new(64, 64);
/// let mut backend = HeadlessBackend::new(64, 64);
/// let sprite = scene
///     .construct(None, NodeInit::at(8.0, 8.0, 16, 16), SpriteNode::new(Color::WHITE))
///     .unwrap();
///
/// scene.draw(&mut backend);
/// assert_eq!(backend.pixel(backend.screen(), 10, 10), Some(Color::WHITE));
///
/// // Nothing changed, nothing to present.
/// assert!(scene.draw(&mut backend).is_empty());
///
/// // Moving the sprite repaints its old and new areas only.
/// scene.transform_mut(sprite).unwrap().set_x(40.0);
/// let areas = scene.draw(&mut backend);
/// assert_eq!(areas.len(), 2);
/// ```
#[derive(Debug)]
pub struct Scene {
    tree: Tree,
    handlers: HandlerRegistry,
    draw_group: DrawGroup,
    classes: ClassRegistry,
    config: EngineConfig,
    /// Surfaces of removed nodes, freed at the next draw.
    released: Vec<SurfaceHandle>,
    scene_request: Option<SceneRequest>,
}

impl Scene {
    /// An empty scene for a `width` × `height` display with default settings.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(EngineConfig {
            display_width: width,
            display_height: height,
            ..EngineConfig::default()
        })
    }

    /// An empty scene using `config`.
    ///
    /// A configured `entry_scene` is queued as the first [`SceneRequest`].
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        let scene_request = config.entry_scene.clone().map(|name| SceneRequest {
            name,
            args: Props::new(),
        });
        Self {
            tree: Tree::new(),
            handlers: HandlerRegistry::new(),
            draw_group: DrawGroup::new(
                config.display_width,
                config.display_height,
                config.background,
            ),
            classes: ClassRegistry::new(),
            config,
            released: Vec::new(),
            scene_request,
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Classes constructible by name.
    #[must_use]
    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    /// Mutable access to the class registry, for registering more classes.
    pub fn classes_mut(&mut self) -> &mut ClassRegistry {
        &mut self.classes
    }

    /// The event routing table.
    #[must_use]
    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// The compositor.
    #[must_use]
    pub fn draw_group(&self) -> &DrawGroup {
        &self.draw_group
    }

    /// Asks the host to switch to the scene `name` once the current frame is
    /// done. A later request in the same frame replaces an earlier one.
    pub fn request_scene(&mut self, name: impl Into<String>, args: Props) {
        let name = name.into();
        if let Some(previous) = &self.scene_request {
            debug!(previous = %previous.name, next = %name, "scene request replaced");
        }
        self.scene_request = Some(SceneRequest { name, args });
    }

    /// The pending scene switch, if any. Hosts poll this after each frame.
    pub fn take_scene_request(&mut self) -> Option<SceneRequest> {
        self.scene_request.take()
    }

    // --- construction and removal ---

    /// Constructs a node as the last child of `parent` (or as a top-level node).
    ///
    /// The node is registered for the event kinds its behavior declares. Fails
    /// without touching the tree if the parent is stale or cannot hold children.
    pub fn construct<B: Behavior>(
        &mut self,
        parent: Option<NodeId>,
        init: NodeInit,
        behavior: B,
    ) -> Result<NodeId, SceneError> {
        self.construct_boxed(parent, init, Box::new(behavior))
    }

    /// [`Scene::construct`] for an already boxed behavior.
    pub fn construct_boxed(
        &mut self,
        parent: Option<NodeId>,
        init: NodeInit,
        behavior: Box<dyn Behavior>,
    ) -> Result<NodeId, SceneError> {
        if let Some(p) = parent {
            let node = self.tree.get(p).ok_or(SceneError::StaleParent(p))?;
            if !node.capabilities.contains(Capabilities::CHILDREN) {
                return Err(SceneError::LeafParent {
                    parent: p,
                    class: node.class_name,
                });
            }
        }
        let node = Node::new(init.transform, init.enabled, init.transient, behavior);
        let kinds = node.kinds;
        let class = node.class_name;
        let id = self.tree.insert(parent, node);
        self.handlers.register(id, kinds);
        debug!(?id, ?parent, class, "constructed node");
        Ok(id)
    }

    /// Constructs a node of a registered class.
    pub fn construct_class(
        &mut self,
        class: &str,
        parent: Option<NodeId>,
        init: NodeInit,
        props: &Props,
    ) -> Result<NodeId, SceneError> {
        let factory = self.classes.get(class)?;
        factory(self, parent, init, props)
    }

    /// Removes a node and its whole subtree.
    ///
    /// Children go first. Each removed node is unregistered from the handler
    /// registry, detached from its parent, and its transform is detached from
    /// it; screen areas it covered are repainted at the next draw. Returns the
    /// detached transform of `id`, or `None` (with a diagnostic) if `id` was
    /// already removed.
    pub fn remove(&mut self, id: NodeId) -> Option<Transform> {
        if !self.tree.is_alive(id) {
            warn!(?id, "remove: node is not alive");
            return None;
        }
        for child in self.tree.children_of(id).to_vec() {
            self.remove(child);
        }
        let node = self.tree.take(id)?;
        if !node.kinds.is_empty() {
            self.handlers.unregister(id, node.kinds);
        }
        if let Some(sprite) = node.sprite {
            if let Some(presented) = sprite.presented {
                self.draw_group.add(presented);
            }
            if let Some(surface) = sprite.surface {
                self.released.push(surface);
            }
        }
        debug!(?id, class = node.class_name, "removed node");
        Some(node.transform)
    }

    // --- lookups ---

    /// Returns `true` if `id` refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.tree.is_alive(id)
    }

    /// Top-level nodes in paint order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        self.tree.roots()
    }

    /// Children in paint order; empty for stale ids.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.tree.children_of(id)
    }

    /// Parent of a live node; `None` for top-level nodes and stale ids.
    #[must_use]
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.tree.parent_of(id)
    }

    /// Number of ancestors; top-level nodes have depth 0.
    #[must_use]
    pub fn depth(&self, id: NodeId) -> usize {
        self.tree.depth(id)
    }

    /// Class name of a live node.
    #[must_use]
    pub fn class_name(&self, id: NodeId) -> Option<&'static str> {
        self.tree.get(id).map(|n| n.class_name)
    }

    /// Capabilities of a live node.
    #[must_use]
    pub fn capabilities(&self, id: NodeId) -> Option<Capabilities> {
        self.tree.get(id).map(|n| n.capabilities)
    }

    /// Returns `true` for transient nodes.
    #[must_use]
    pub fn is_transient(&self, id: NodeId) -> bool {
        self.tree.get(id).is_some_and(|n| n.transient)
    }

    /// Next node in depth-first order, crossing into following top-level nodes.
    #[must_use]
    pub fn next_depth_first(&self, id: NodeId) -> Option<NodeId> {
        self.tree.next_depth_first(id)
    }

    /// Previous node in depth-first order.
    #[must_use]
    pub fn prev_depth_first(&self, id: NodeId) -> Option<NodeId> {
        self.tree.prev_depth_first(id)
    }

    /// Every live node in paint order.
    #[must_use]
    pub fn nodes(&self) -> Vec<NodeId> {
        self.tree.paint_order()
    }

    // --- geometry ---

    /// The node's transform.
    #[must_use]
    pub fn transform(&self, id: NodeId) -> Option<&Transform> {
        self.tree.get(id).map(|n| &n.transform)
    }

    /// Mutable access to the node's transform.
    ///
    /// Position and size setters update the node's world rectangle immediately
    /// and translate the cached rectangles of every descendant; see
    /// [`TransformMut`].
    pub fn transform_mut(&mut self, id: NodeId) -> Option<TransformMut<'_>> {
        self.tree
            .is_alive(id)
            .then(|| TransformMut::new(&mut self.tree, id))
    }

    /// The node's rectangle in root coordinates.
    #[must_use]
    pub fn world_rect(&self, id: NodeId) -> Option<PixelRect> {
        self.tree.get(id).map(|n| n.world_rect)
    }

    /// Topmost visible node whose world rectangle contains `point`.
    ///
    /// Ancestor clips apply; faulted nodes hide their descendants.
    #[must_use]
    pub fn hit_test_point(&self, point: Point) -> Option<NodeId> {
        let mut best = None;
        let mut stack: Vec<(NodeId, Option<PixelRect>)> =
            self.tree.roots().iter().rev().map(|&id| (id, None)).collect();
        while let Some((id, clip)) = stack.pop() {
            let node = self.tree.node(id);
            if !node.visible {
                continue;
            }
            if clip.is_none_or(|c| c.contains(point)) && node.world_rect.contains(point) {
                best = Some(id);
            }
            if node.faulted {
                continue;
            }
            let child_clip = if node.capabilities.contains(Capabilities::CLIPS_CHILDREN) {
                Some(clip.map_or(node.world_rect, |c| {
                    c.intersect(node.world_rect).unwrap_or(PixelRect::ZERO)
                }))
            } else {
                clip
            };
            stack.extend(node.children.iter().rev().map(|&c| (c, child_clip)));
        }
        best
    }

    // --- enabled / visible ---

    /// The node's own flag; `false` for stale ids.
    #[must_use]
    pub fn is_enabled(&self, id: NodeId) -> bool {
        self.tree.get(id).is_some_and(|n| n.enabled)
    }

    /// `true` iff the node and every ancestor are enabled and no ancestor is
    /// faulted; `false` for stale ids.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.tree.get(id).is_some_and(|n| n.visible)
    }

    /// Sets the node's own flag and recomputes visibility of its subtree.
    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) {
        if !self.tree.is_alive(id) {
            warn!(?id, "set_enabled: node is not alive");
            return;
        }
        self.tree.set_enabled(id, enabled);
    }

    // --- dirty state ---

    /// Dirty level of a drawable node.
    #[must_use]
    pub fn dirty_level(&self, id: NodeId) -> Option<DirtyLevel> {
        self.tree
            .get(id)
            .and_then(|n| n.sprite.as_ref())
            .map(|s| s.dirty)
    }

    /// Raises a drawable node's dirty level. Non-drawable nodes are ignored.
    pub fn mark_dirty(&mut self, id: NodeId, level: DirtyLevel) {
        self.tree.mark_dirty(id, level);
    }

    /// Queues a screen area for repaint at the next draw.
    pub fn repaint_rect(&mut self, rect: PixelRect) {
        self.draw_group.add(rect);
    }

    /// Repaints the whole screen at the next draw.
    pub fn invalidate_all(&mut self) {
        self.draw_group.invalidate_all();
    }

    /// Returns `true` if the node's update or paint failed.
    #[must_use]
    pub fn is_faulted(&self, id: NodeId) -> bool {
        self.tree.get(id).is_some_and(|n| n.faulted)
    }

    /// Gives a faulted node another chance to update and paint, and shows its
    /// descendants again.
    pub fn clear_fault(&mut self, id: NodeId) {
        if self.is_faulted(id) {
            self.tree.set_faulted(id, false);
            self.tree.mark_subtree_dirty(id, DirtyLevel::Redraw);
        }
    }

    fn fault(&mut self, id: NodeId, err: &NodeError) {
        let Some(node) = self.tree.get(id) else {
            return;
        };
        error!(?id, class = node.class_name, %err, "node failed; drawing placeholder");
        self.tree.set_faulted(id, true);
        self.tree.mark_subtree_dirty(id, DirtyLevel::Redraw);
    }

    /// Returns whether the children of `id` were added, removed, reordered or
    /// resized since the last call, and clears the flag.
    ///
    /// Containers that lay out their children use this to skip work on frames
    /// where nothing structural happened.
    pub fn take_children_changed(&mut self, id: NodeId) -> bool {
        self.tree
            .get_mut(id)
            .is_some_and(|n| core::mem::take(&mut n.children_changed))
    }

    // --- ordering ---

    /// Moves `node` to just before `sibling` in their parent's children.
    pub fn order_before(&mut self, node: NodeId, sibling: NodeId) -> Result<(), SceneError> {
        for id in [node, sibling] {
            if !self.tree.is_alive(id) {
                return Err(SceneError::StaleNode(id));
            }
        }
        let parent = self.tree.parent_of(node);
        if parent != self.tree.parent_of(sibling) {
            return Err(SceneError::NotSibling {
                node,
                other: sibling,
            });
        }
        if node == sibling {
            return Ok(());
        }
        let siblings = self.tree.siblings(parent);
        let from = position(siblings, node);
        let to = position(siblings, sibling);
        self.tree
            .move_within_parent(node, if from < to { to - 1 } else { to });
        Ok(())
    }

    /// Moves `node` to `index` among its siblings. Negative indices count from
    /// the end (`-1` is last); out of range indices clamp.
    pub fn move_to_index(&mut self, node: NodeId, index: isize) -> Result<(), SceneError> {
        if !self.tree.is_alive(node) {
            return Err(SceneError::StaleNode(node));
        }
        let len = self.tree.siblings(self.tree.parent_of(node)).len();
        let resolved = if index < 0 {
            len.saturating_sub(index.unsigned_abs())
        } else {
            index.unsigned_abs()
        };
        self.tree
            .move_within_parent(node, resolved.min(len.saturating_sub(1)));
        Ok(())
    }

    // --- behaviors ---

    /// The node's behavior as `T`, unless it is another type or currently lent out.
    #[must_use]
    pub fn behavior<T: Behavior>(&self, id: NodeId) -> Option<&T> {
        let behavior: &dyn Behavior = self.tree.get(id)?.behavior.as_deref()?;
        (behavior as &dyn Any).downcast_ref::<T>()
    }

    /// Mutable form of [`Scene::behavior`].
    ///
    /// Changing what the behavior paints does not mark the node dirty; call
    /// [`Scene::mark_dirty`] as well.
    pub fn behavior_mut<T: Behavior>(&mut self, id: NodeId) -> Option<&mut T> {
        let behavior: &mut dyn Behavior = self.tree.get_mut(id)?.behavior.as_deref_mut()?;
        (behavior as &mut dyn Any).downcast_mut::<T>()
    }

    /// Runs `f` with the node's behavior as `T` and the scene.
    ///
    /// The behavior is lent out of the node for the call and put back afterwards
    /// if the node is still alive.
    pub fn with_behavior_mut<T: Behavior, R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut T, &mut Self) -> R,
    ) -> Option<R> {
        self.lend(id, |behavior, scene| {
            (behavior as &mut dyn Any)
                .downcast_mut::<T>()
                .map(|t| f(t, scene))
        })
        .flatten()
    }

    /// Constructor arguments of a live node, from its behavior.
    #[must_use]
    pub fn properties(&self, id: NodeId) -> Option<Props> {
        self.tree
            .get(id)?
            .behavior
            .as_ref()
            .map(|b| b.properties())
    }

    /// Runs `f` with the node's behavior as a [`Scrollable`] and the scene.
    ///
    /// Returns `None` if the behavior does not scroll, or is lent out.
    pub fn with_scrollable<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut dyn Scrollable, &mut Self) -> R,
    ) -> Option<R> {
        self.lend(id, |behavior, scene| {
            behavior.as_scrollable().map(|list| f(list, scene))
        })
        .flatten()
    }

    fn lend<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut dyn Behavior, &mut Self) -> R,
    ) -> Option<R> {
        let mut behavior = self.tree.get_mut(id)?.behavior.take()?;
        let out = f(behavior.as_mut(), self);
        if let Some(node) = self.tree.get_mut(id) {
            node.behavior = Some(behavior);
        }
        Some(out)
    }

    // --- frame phases ---

    /// Routes one event.
    ///
    /// `Expose` repaints the whole screen and `Resize` resizes the compositor
    /// first. The event then goes to every node registered for its kind, in
    /// registration order, skipping nodes that are not visible or are faulted.
    /// Descendants of a faulted node are not visible, so they are skipped too,
    /// as are nodes removed by an earlier handler.
    pub fn handle_event(&mut self, event: &Event) {
        match *event {
            Event::Expose => self.draw_group.invalidate_all(),
            Event::Resize { width, height } => self.draw_group.resize(width, height),
            _ => {}
        }
        let kind = event.kind();
        let targets = self.handlers.handlers(kind).to_vec();
        for id in targets {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            if !node.visible || node.faulted {
                continue;
            }
            trace!(?id, ?kind, "dispatching event");
            self.lend(id, |behavior, scene| {
                behavior.event(&mut NodeCx::new(scene, id), event);
            });
        }
    }

    /// Routes a batch of events in order.
    pub fn handle_events<'a>(&mut self, events: impl IntoIterator<Item = &'a Event>) {
        for event in events {
            self.handle_event(event);
        }
    }

    /// Runs every visible node's update, parents first.
    ///
    /// A node's children are read after its own update returns, so children a
    /// parent enables or adds during its update are updated in the same frame.
    /// Disabled subtrees are skipped. A node whose update fails is marked
    /// faulted: it is drawn as a placeholder, its descendants are hidden, and
    /// it is no longer updated until [`Scene::clear_fault`].
    pub fn update(&mut self) {
        let mut stack: Vec<NodeId> = self.tree.roots().iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if !self
                .tree
                .get(id)
                .is_some_and(|n| n.visible && !n.faulted)
            {
                continue;
            }
            let result = self.lend(id, |behavior, scene| {
                behavior.update(&mut NodeCx::new(scene, id))
            });
            if let Some(Err(err)) = result {
                self.fault(id, &err);
                continue;
            }
            stack.extend(self.tree.children_of(id).iter().rev().copied());
        }
    }

    /// Draws one frame and returns the screen areas that were repainted.
    ///
    /// Phase one walks the whole tree in paint order. Each visible drawable
    /// node with a dirty level repaints its surface, reallocating it first if
    /// its size changed. Drawable nodes that became hidden have their last
    /// area queued for repaint; hidden nodes keep their dirty level until
    /// they are visible again. Phase two repaints the queued areas from the
    /// visible surfaces and resets dirty levels.
    ///
    /// With no mutation since the last call, the result is empty.
    pub fn draw(&mut self, backend: &mut dyn Backend) -> Vec<PixelRect> {
        for surface in self.released.drain(..) {
            backend.release_surface(surface);
        }

        let screen = self.draw_group.screen();
        let mut layers = Vec::new();
        let mut stack: Vec<(NodeId, PixelRect, bool)> = self
            .tree
            .roots()
            .iter()
            .rev()
            .map(|&id| (id, screen, true))
            .collect();

        while let Some((id, clip, parent_shown)) = stack.pop() {
            let node = self.tree.node(id);
            let shown = parent_shown && node.visible;
            let world = node.world_rect;
            let drawable = node.sprite.is_some();

            if drawable {
                if shown {
                    if let Some(layer) = self.draw_sprite(backend, id, world.intersect(clip)) {
                        layers.push(layer);
                    }
                } else if let Some(sprite) = self.tree.node_mut(id).sprite.as_mut()
                    && let Some(old) = sprite.presented.take()
                {
                    self.draw_group.add(old);
                }
            }

            let node = self.tree.node(id);
            let child_clip = if node.capabilities.contains(Capabilities::CLIPS_CHILDREN) {
                clip.intersect(world).unwrap_or(PixelRect::ZERO)
            } else {
                clip
            };
            let children_shown = shown && !node.faulted;
            stack.extend(
                node.children
                    .iter()
                    .rev()
                    .map(|&c| (c, child_clip, children_shown)),
            );
        }

        self.draw_group.compose(backend, &layers)
    }

    /// Brings one visible drawable node's surface up to date and records the
    /// areas it changed.
    fn draw_sprite(
        &mut self,
        backend: &mut dyn Backend,
        id: NodeId,
        target: Option<PixelRect>,
    ) -> Option<Layer> {
        let max_extent = self.config.max_surface_extent;
        let placeholder = self.config.placeholder;
        let node = self.tree.node_mut(id);
        let size = node.transform.surface_size(max_extent);
        let world = node.world_rect;
        let sprite = node.sprite.as_mut()?;

        let mut changed = false;
        let mut newly_faulted = false;
        if sprite.dirty > DirtyLevel::Clean || sprite.surface.is_none() {
            let surface = match sprite.surface {
                Some(surface) => {
                    if sprite.surface_size != size {
                        backend.resize_surface(surface, size.0, size.1);
                    }
                    surface
                }
                None => backend.allocate_surface(size.0, size.1),
            };
            sprite.surface = Some(surface);
            sprite.surface_size = size;

            let mut failed = node.faulted;
            if !failed && let Some(behavior) = node.behavior.as_mut() {
                let mut cx = PaintCx::new(&mut *backend, surface, size);
                if let Err(err) = behavior.paint(&mut cx) {
                    error!(?id, class = node.class_name, %err, "paint failed; drawing placeholder");
                    newly_faulted = true;
                    failed = true;
                }
            }
            if failed {
                backend.fill(surface, placeholder);
            }
            changed = true;
        }

        if sprite.presented != target {
            changed = true;
        }
        if changed {
            if let Some(old) = sprite.presented {
                self.draw_group.add(old);
            }
            if let Some(new) = target {
                self.draw_group.add(new);
            }
        }
        sprite.presented = target;
        sprite.dirty = DirtyLevel::Clean;

        let surface = sprite.surface;
        if newly_faulted {
            self.tree.set_faulted(id, true);
        }
        let surface = surface?;
        target.map(|visible| Layer {
            surface,
            world,
            visible,
        })
    }
}

fn position(siblings: &[NodeId], id: NodeId) -> usize {
    siblings.iter().position(|&c| c == id).unwrap_or(siblings.len())
}
