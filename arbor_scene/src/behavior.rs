// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-class node behavior and the contexts it runs in.

use core::any::Any;
use core::fmt::Debug;
use core::ops::Range;

use arbor_list::{ScrollAlign, ScrollOutcome, Thumb};
use kurbo::Point;

use crate::backend::{Backend, SurfaceHandle};
use crate::class::Props;
use crate::error::{NodeError, SceneError};
use crate::event::{Event, EventKinds};
use crate::geometry::PixelRect;
use crate::scene::Scene;
use crate::transform::{Transform, TransformMut};
use crate::types::{Capabilities, Color, DirtyLevel, Font, NodeId};

/// What a node class does beyond being a tree node.
///
/// The scene asks for [`capabilities`](Behavior::capabilities),
/// [`event_kinds`](Behavior::event_kinds) and
/// [`class_name`](Behavior::class_name) once, at construction; changing their
/// answers later has no effect.
///
/// While one of the callbacks runs, the behavior is lent out of its node:
/// [`Scene::behavior`] returns `None` for that node until the callback returns.
pub trait Behavior: Any + Debug {
    /// Class name used in records and by the class registry.
    fn class_name(&self) -> &'static str;

    /// What the node can do. Defaults to holding children and nothing else.
    fn capabilities(&self) -> Capabilities {
        Capabilities::CHILDREN
    }

    /// Event kinds routed to [`event`](Behavior::event).
    fn event_kinds(&self) -> EventKinds {
        EventKinds::empty()
    }

    /// Handles one event. Only called while the node is visible.
    fn event(&mut self, cx: &mut NodeCx<'_>, event: &Event) {
        let _ = (cx, event);
    }

    /// Per-frame update. Only called while the node is visible.
    ///
    /// An error marks the node faulted.
    fn update(&mut self, cx: &mut NodeCx<'_>) -> Result<(), NodeError> {
        let _ = cx;
        Ok(())
    }

    /// Repaints the node's surface. Only called for drawable nodes.
    ///
    /// An error marks the node faulted and replaces the surface with a placeholder.
    fn paint(&mut self, cx: &mut PaintCx<'_>) -> Result<(), NodeError> {
        let _ = cx;
        Ok(())
    }

    /// Constructor arguments that rebuild this node through its class factory.
    fn properties(&self) -> Props {
        Props::new()
    }

    /// The behavior as a [`Scrollable`], for nodes that scroll their children.
    ///
    /// Reached through [`Scene::with_scrollable`] without knowing the concrete
    /// type. Defaults to `None`.
    fn as_scrollable(&mut self) -> Option<&mut dyn Scrollable> {
        None
    }
}

/// Scrolling operations of a node that virtualizes its children.
///
/// `id` is always the node whose behavior this is.
pub trait Scrollable {
    /// Scrolls by `delta` pixels, clamped into the limits, and lays the items
    /// out again. A node whose content fits is locked and does not move.
    fn scroll_by(&mut self, scene: &mut Scene, id: NodeId, delta: f64) -> ScrollOutcome;

    /// Scrolls so the scrollbar thumb's center sits `position` pixels down the
    /// track.
    fn scroll_thumb_to(&mut self, scene: &mut Scene, id: NodeId, position: f64) -> ScrollOutcome;

    /// Scrolls item `index` into view. Returns the distance moved.
    fn scroll_to_index(
        &mut self,
        scene: &mut Scene,
        id: NodeId,
        index: usize,
        align: ScrollAlign,
    ) -> f64;

    /// Synchronizes with the children and repositions the ones in view.
    fn relayout(&mut self, scene: &mut Scene, id: NodeId);

    /// Current scroll offset.
    fn scroll_offset(&self) -> f64;

    /// Indexes of the items currently realized.
    fn indexes_in_view(&mut self) -> Range<usize>;

    /// `(0, max(0, content - viewport))`.
    fn scroll_limits(&mut self) -> (f64, f64);

    /// Scrollbar thumb geometry.
    fn thumb(&mut self) -> Thumb;

    /// Returns `true` when the content fits and scrolling is a no-op.
    fn is_locked(&mut self) -> bool;

    /// The attached scrollbar node.
    fn scrollbar(&self) -> Option<NodeId>;

    /// Attaches or detaches a scrollbar node.
    fn set_scrollbar(&mut self, scrollbar: Option<NodeId>);
}

/// Access to the scene from inside a node's event or update callback.
#[derive(Debug)]
pub struct NodeCx<'a> {
    scene: &'a mut Scene,
    id: NodeId,
}

impl<'a> NodeCx<'a> {
    pub(crate) fn new(scene: &'a mut Scene, id: NodeId) -> Self {
        Self { scene, id }
    }

    /// The node being called.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Read access to the scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        self.scene
    }

    /// Write access to the scene.
    pub fn scene_mut(&mut self) -> &mut Scene {
        self.scene
    }

    /// The node's cached world rectangle; empty if the node was removed.
    #[must_use]
    pub fn world_rect(&self) -> PixelRect {
        self.scene.world_rect(self.id).unwrap_or_default()
    }

    /// Returns `true` if `point` lies inside the node's world rectangle.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        self.world_rect().contains(point)
    }

    /// The node's transform.
    #[must_use]
    pub fn transform(&self) -> Option<&Transform> {
        self.scene.transform(self.id)
    }

    /// Mutable access to the node's transform.
    pub fn transform_mut(&mut self) -> Option<TransformMut<'_>> {
        self.scene.transform_mut(self.id)
    }

    /// Marks the node's surface for repaint.
    pub fn request_redraw(&mut self) {
        self.scene.mark_dirty(self.id, DirtyLevel::Redraw);
    }
}

/// A node's offscreen surface, lent to [`Behavior::paint`].
pub struct PaintCx<'a> {
    backend: &'a mut dyn Backend,
    surface: SurfaceHandle,
    width: u32,
    height: u32,
}

impl Debug for PaintCx<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PaintCx")
            .field("surface", &self.surface)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl<'a> PaintCx<'a> {
    pub(crate) fn new(
        backend: &'a mut dyn Backend,
        surface: SurfaceHandle,
        (width, height): (u32, u32),
    ) -> Self {
        Self {
            backend,
            surface,
            width,
            height,
        }
    }

    /// The surface being painted.
    #[must_use]
    pub const fn surface(&self) -> SurfaceHandle {
        self.surface
    }

    /// Surface size in pixels.
    #[must_use]
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The whole surface as a rectangle at the origin.
    #[must_use]
    pub fn bounds(&self) -> PixelRect {
        PixelRect::from_size(self.width, self.height)
    }

    /// The backend, for anything the helpers below do not cover.
    pub fn backend_mut(&mut self) -> &mut dyn Backend {
        self.backend
    }

    /// Fills the whole surface.
    pub fn fill(&mut self, color: Color) {
        self.backend.fill(self.surface, color);
    }

    /// Fills part of the surface.
    pub fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        self.backend.fill_rect(self.surface, rect, color);
    }

    /// Size of `text` in `font`.
    #[must_use]
    pub fn measure_text(&self, text: &str, font: &Font) -> (u32, u32) {
        self.backend.measure_text(text, font)
    }

    /// Draws `text` with its top-left at `position`.
    pub fn draw_text(&mut self, text: &str, position: (i32, i32), color: Color, font: &Font) {
        self.backend
            .draw_text(self.surface, text, position, color, font);
    }

    /// Draws `text` centered on the surface.
    pub fn draw_text_centered(&mut self, text: &str, color: Color, font: &Font) {
        let (tw, th) = self.measure_text(text, font);
        let x = centered(self.width, tw);
        let y = centered(self.height, th);
        self.draw_text(text, (x, y), color, font);
    }
}

fn centered(outer: u32, inner: u32) -> i32 {
    let outer = i64::from(outer);
    let inner = i64::from(inner);
    i32::try_from((outer - inner) / 2).unwrap_or(0)
}

/// A plain container: children and a transform, nothing drawn.
///
/// Registered as class `Node`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Group;

impl Group {
    /// Class name.
    pub const CLASS: &'static str = "Node";
}

impl Behavior for Group {
    fn class_name(&self) -> &'static str {
        Self::CLASS
    }
}

/// A drawable rectangle filled with one color.
///
/// Registered as class `SpriteNode`; its constructor argument is `fill_color`.
#[derive(Clone, Copy, Debug)]
pub struct SpriteNode {
    /// Fill color.
    pub fill_color: Color,
}

impl SpriteNode {
    /// Class name.
    pub const CLASS: &'static str = "SpriteNode";

    /// A sprite filled with `fill_color`.
    #[must_use]
    pub const fn new(fill_color: Color) -> Self {
        Self { fill_color }
    }

    /// Builds from constructor arguments; `fill_color` defaults to white.
    pub fn from_props(props: &Props) -> Result<Self, SceneError> {
        Ok(Self::new(
            props.get_color("fill_color")?.unwrap_or(Color::WHITE),
        ))
    }
}

impl Behavior for SpriteNode {
    fn class_name(&self) -> &'static str {
        Self::CLASS
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::CHILDREN | Capabilities::DRAWABLE
    }

    fn paint(&mut self, cx: &mut PaintCx<'_>) -> Result<(), NodeError> {
        cx.fill(self.fill_color);
        Ok(())
    }

    fn properties(&self) -> Props {
        Props::new().with("fill_color", self.fill_color)
    }
}
