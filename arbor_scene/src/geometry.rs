// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer pixel rectangles.

use kurbo::{Point, Rect};

/// An axis-aligned rectangle on the pixel grid.
///
/// `width` and `height` are never negative; constructors clamp them to zero.
/// A rectangle with zero area is *empty* and never intersects anything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl PixelRect {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    /// Creates a rectangle, clamping negative sizes to zero.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: if width < 0 { 0 } else { width },
            height: if height < 0 { 0 } else { height },
        }
    }

    /// Creates a rectangle at the origin covering `width` × `height`.
    #[must_use]
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, saturate(width), saturate(height))
    }

    /// Right edge (exclusive).
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Top-left corner.
    #[must_use]
    pub const fn origin(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Returns `true` if the rectangle covers no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Returns the rectangle moved by `(dx, dy)`.
    #[must_use]
    pub const fn translate(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            width: self.width,
            height: self.height,
        }
    }

    /// Returns `true` if the point lies inside the rectangle.
    ///
    /// The left and top edges are inclusive, the right and bottom edges exclusive.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= f64::from(self.x)
            && point.y >= f64::from(self.y)
            && point.x < f64::from(self.right())
            && point.y < f64::from(self.bottom())
    }

    /// Returns the overlap of two rectangles, or `None` if they do not overlap.
    #[must_use]
    pub fn intersect(&self, other: Self) -> Option<Self> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        let r = Self::new(x0, y0, x1 - x0, y1 - y0);
        (!r.is_empty()).then_some(r)
    }

    /// Returns `true` if the two rectangles share at least one pixel.
    #[must_use]
    pub fn intersects(&self, other: Self) -> bool {
        self.intersect(other).is_some()
    }

    /// Returns the smallest rectangle covering both.
    ///
    /// Empty rectangles do not contribute.
    #[must_use]
    pub fn union(&self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return *self;
        }
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Converts to a floating point [`Rect`].
    #[must_use]
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.right()),
            f64::from(self.bottom()),
        )
    }
}

impl From<PixelRect> for Rect {
    fn from(r: PixelRect) -> Self {
        r.to_rect()
    }
}

pub(crate) fn saturate(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::PixelRect;
    use kurbo::{Point, Rect};

    #[test]
    fn negative_sizes_clamp_to_zero() {
        let r = PixelRect::new(3, 4, -10, 5);
        assert_eq!(r.width, 0);
        assert!(r.is_empty());
    }

    #[test]
    fn intersect_and_union() {
        let a = PixelRect::new(0, 0, 10, 10);
        let b = PixelRect::new(5, 5, 10, 10);
        assert_eq!(a.intersect(b), Some(PixelRect::new(5, 5, 5, 5)));
        assert_eq!(a.union(b), PixelRect::new(0, 0, 15, 15));

        let c = PixelRect::new(10, 0, 5, 5);
        assert_eq!(a.intersect(c), None, "touching edges do not overlap");
        assert_eq!(a.union(PixelRect::ZERO), a);
    }

    #[test]
    fn contains_is_half_open() {
        let r = PixelRect::new(10, 10, 5, 5);
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(14.5, 14.5)));
        assert!(!r.contains(Point::new(15.0, 12.0)));
        assert_eq!(r.to_rect(), Rect::new(10.0, 10.0, 15.0, 15.0));
    }
}
