// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor-relative position and size of a node.

use core::ops::Deref;

use tracing::warn;

use crate::geometry::PixelRect;
use crate::tree::Tree;
use crate::types::NodeId;

/// Well-known anchor points.
pub mod anchor {
    /// Top-left corner.
    pub const TOP_LEFT: (f64, f64) = (0.0, 0.0);
    /// Center of the rectangle.
    pub const CENTER: (f64, f64) = (0.5, 0.5);
    /// Bottom-right corner.
    pub const BOTTOM_RIGHT: (f64, f64) = (1.0, 1.0);
}

/// Position, size and anchor of a node relative to its parent's top-left corner.
///
/// `(x, y)` locates the *anchor point*: the point at fraction
/// `(anchor_x, anchor_y)` of the node's size. The top-left corner is therefore
/// `(x - width * anchor_x, y - height * anchor_y)`. Anchors outside `[0, 1]` are
/// allowed and place the rectangle entirely to one side of `(x, y)`.
///
/// Changing the anchor rewrites `x`/`y` so the rectangle does not move, and
/// changing the size keeps the anchor point fixed.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    x: f64,
    y: f64,
    width: i32,
    height: i32,
    anchor_x: f64,
    anchor_y: f64,
    pub(crate) owner: Option<NodeId>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0, 0)
    }
}

impl Transform {
    /// Creates a top-left anchored transform.
    #[must_use]
    pub fn new(x: f64, y: f64, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: clamp_extent(width),
            height: clamp_extent(height),
            anchor_x: 0.0,
            anchor_y: 0.0,
            owner: None,
        }
    }

    /// Sets the anchor, keeping `x`/`y` as given (so the rectangle moves).
    ///
    /// Use this while building a transform; [`Transform::set_anchor`] instead
    /// keeps the rectangle in place.
    #[must_use]
    pub fn with_anchor(mut self, anchor_x: f64, anchor_y: f64) -> Self {
        self.anchor_x = anchor_x;
        self.anchor_y = anchor_y;
        self
    }

    /// Builds a transform whose [`rect`](Self::rect) is `rect` with the given anchor.
    #[must_use]
    pub fn from_rect(rect: PixelRect, (anchor_x, anchor_y): (f64, f64)) -> Self {
        Self {
            x: f64::from(rect.x) + f64::from(rect.width) * anchor_x,
            y: f64::from(rect.y) + f64::from(rect.height) * anchor_y,
            width: rect.width,
            height: rect.height,
            anchor_x,
            anchor_y,
            owner: None,
        }
    }

    /// The node this transform notifies, if it is attached.
    #[must_use]
    pub const fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    /// Horizontal position of the anchor point.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Vertical position of the anchor point.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Width in pixels, never negative.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height in pixels, never negative.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// `(x, y)`.
    #[must_use]
    pub const fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// `(width, height)`.
    #[must_use]
    pub const fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// `(anchor_x, anchor_y)`.
    #[must_use]
    pub const fn anchor(&self) -> (f64, f64) {
        (self.anchor_x, self.anchor_y)
    }

    /// The pixel rectangle relative to the parent's top-left corner.
    ///
    /// Edges are `floor(x - width * anchor_x)` and `floor(y - height * anchor_y)`.
    #[must_use]
    pub fn rect(&self) -> PixelRect {
        let (x, y) = self.rect_position();
        PixelRect::new(x, y, self.width, self.height)
    }

    /// Top-left corner of [`rect`](Self::rect).
    #[must_use]
    pub fn rect_position(&self) -> (i32, i32) {
        (
            to_pixel(self.x - f64::from(self.width) * self.anchor_x),
            to_pixel(self.y - f64::from(self.height) * self.anchor_y),
        )
    }

    /// Dimensions of a surface backing this transform, each in `0..=max_extent`.
    #[must_use]
    pub fn surface_size(&self, max_extent: u32) -> (u32, u32) {
        let clamp = |v: i32| u32::try_from(v).unwrap_or(0).min(max_extent);
        (clamp(self.width), clamp(self.height))
    }

    /// Sets `x`.
    pub fn set_x(&mut self, x: f64) {
        self.x = x;
    }

    /// Sets `y`.
    pub fn set_y(&mut self, y: f64) {
        self.y = y;
    }

    /// Sets `(x, y)`.
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// Sets the width, clamping negative values to zero.
    pub fn set_width(&mut self, width: i32) {
        self.width = clamp_extent(width);
    }

    /// Sets the height, clamping negative values to zero.
    pub fn set_height(&mut self, height: i32) {
        self.height = clamp_extent(height);
    }

    /// Sets `(width, height)`, clamping negative values to zero.
    pub fn set_size(&mut self, width: i32, height: i32) {
        self.width = clamp_extent(width);
        self.height = clamp_extent(height);
    }

    /// Moves the horizontal anchor, shifting `x` so the rectangle stays put.
    pub fn set_anchor_x(&mut self, anchor_x: f64) {
        self.x += (anchor_x - self.anchor_x) * f64::from(self.width);
        self.anchor_x = anchor_x;
    }

    /// Moves the vertical anchor, shifting `y` so the rectangle stays put.
    pub fn set_anchor_y(&mut self, anchor_y: f64) {
        self.y += (anchor_y - self.anchor_y) * f64::from(self.height);
        self.anchor_y = anchor_y;
    }

    /// Moves both anchors, keeping the rectangle in place.
    pub fn set_anchor(&mut self, anchor_x: f64, anchor_y: f64) {
        self.set_anchor_x(anchor_x);
        self.set_anchor_y(anchor_y);
    }

    /// Returns a copy that is not attached to any node.
    #[must_use]
    pub fn detached(&self) -> Self {
        Self {
            owner: None,
            ..self.clone()
        }
    }
}

fn clamp_extent(v: i32) -> i32 {
    if v < 0 {
        warn!(value = v, "negative transform extent clamped to zero");
        0
    } else {
        v
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Float to int casts saturate; pixel coordinates stay far inside i32."
)]
fn to_pixel(v: f64) -> i32 {
    v.floor() as i32
}

/// Mutable access to an attached node's [`Transform`].
///
/// Position and size setters store the new value and then notify the owning
/// node, which recomputes its world rectangle and propagates the change (see
/// [`Scene::transform_mut`](crate::Scene::transform_mut)). Anchor setters only
/// rewrite `x`/`y` and do not notify, since the rectangle does not move.
#[derive(Debug)]
pub struct TransformMut<'a> {
    tree: &'a mut Tree,
    id: NodeId,
}

impl<'a> TransformMut<'a> {
    pub(crate) fn new(tree: &'a mut Tree, id: NodeId) -> Self {
        Self { tree, id }
    }

    fn edit(&mut self, f: impl FnOnce(&mut Transform)) {
        let transform = &mut self.tree.node_mut(self.id).transform;
        f(transform);
        let owner = transform.owner;
        if let Some(owner) = owner {
            self.tree.transform_changed(owner);
        }
    }

    /// Sets `x` and notifies the owner.
    pub fn set_x(&mut self, x: f64) {
        self.edit(|t| t.set_x(x));
    }

    /// Sets `y` and notifies the owner.
    pub fn set_y(&mut self, y: f64) {
        self.edit(|t| t.set_y(y));
    }

    /// Sets `(x, y)` and notifies the owner once.
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.edit(|t| t.set_position(x, y));
    }

    /// Sets the width and notifies the owner.
    pub fn set_width(&mut self, width: i32) {
        self.edit(|t| t.set_width(width));
    }

    /// Sets the height and notifies the owner.
    pub fn set_height(&mut self, height: i32) {
        self.edit(|t| t.set_height(height));
    }

    /// Sets `(width, height)` and notifies the owner once.
    pub fn set_size(&mut self, width: i32, height: i32) {
        self.edit(|t| t.set_size(width, height));
    }

    /// Moves the horizontal anchor without moving the rectangle. No notification.
    pub fn set_anchor_x(&mut self, anchor_x: f64) {
        self.tree.node_mut(self.id).transform.set_anchor_x(anchor_x);
    }

    /// Moves the vertical anchor without moving the rectangle. No notification.
    pub fn set_anchor_y(&mut self, anchor_y: f64) {
        self.tree.node_mut(self.id).transform.set_anchor_y(anchor_y);
    }

    /// Moves both anchors without moving the rectangle. No notification.
    pub fn set_anchor(&mut self, anchor_x: f64, anchor_y: f64) {
        self.tree
            .node_mut(self.id)
            .transform
            .set_anchor(anchor_x, anchor_y);
    }
}

impl Deref for TransformMut<'_> {
    type Target = Transform;

    fn deref(&self) -> &Transform {
        &self.tree.node(self.id).transform
    }
}

#[cfg(test)]
mod tests {
    use super::{Transform, anchor};
    use crate::geometry::PixelRect;

    #[test]
    fn rect_subtracts_anchor_fraction() {
        let t = Transform::new(50.0, 40.0, 20, 10).with_anchor(0.5, 1.0);
        assert_eq!(t.rect(), PixelRect::new(40, 30, 20, 10));
    }

    #[test]
    fn rect_round_trips_through_from_rect() {
        let anchors = [anchor::TOP_LEFT, anchor::CENTER, anchor::BOTTOM_RIGHT, (-0.5, 1.5)];
        let originals = [
            Transform::new(10.0, 20.0, 30, 40),
            Transform::new(-7.0, 3.0, 11, 5),
            Transform::new(0.0, 0.0, 0, 0),
        ];
        for original in &originals {
            for &(ax, ay) in &anchors {
                let mut t = original.clone();
                t.set_anchor(ax, ay);
                let rebuilt = Transform::from_rect(t.rect(), (ax, ay));
                assert_eq!(rebuilt.rect(), t.rect(), "anchor ({ax}, {ay})");
                assert!((rebuilt.x() - t.x()).abs() < 1.0, "x within rounding");
                assert!((rebuilt.y() - t.y()).abs() < 1.0, "y within rounding");
                assert_eq!(rebuilt.size(), t.size());
            }
        }
    }

    #[test]
    fn extents_never_go_negative() {
        let mut t = Transform::new(0.0, 0.0, -5, 3);
        assert_eq!(t.size(), (0, 3));
        t.set_height(-1);
        t.set_width(-100);
        assert_eq!(t.size(), (0, 0));
        assert_eq!(t.surface_size(8192), (0, 0));

        t.set_size(10_000, 20);
        assert_eq!(t.surface_size(8192), (8192, 20));
    }

    #[test]
    fn anchor_change_keeps_the_rectangle_in_place() {
        let mut t = Transform::new(12.0, 8.0, 40, 20);
        let before = t.rect();
        for (ax, ay) in [(0.5, 0.5), (1.0, 0.0), (-1.0, 2.0), (0.0, 0.0)] {
            t.set_anchor(ax, ay);
            assert_eq!(t.rect(), before, "anchor ({ax}, {ay})");
        }
        t.set_anchor(0.5, 0.5);
        assert_eq!(t.position(), (32.0, 18.0));
    }

    #[test]
    fn resize_keeps_the_anchor_point() {
        let mut t = Transform::new(100.0, 100.0, 20, 20).with_anchor(0.5, 0.5);
        t.set_size(40, 10);
        assert_eq!(t.position(), (100.0, 100.0));
        assert_eq!(t.rect(), PixelRect::new(80, 95, 40, 10));
    }
}
