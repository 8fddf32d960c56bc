// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core extent model traits and the visible window computation.

use core::cmp;
use core::ops::Range;

/// Result of a visibility query over a 1D strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleWindow {
    /// First index in view (inclusive).
    pub start: usize,
    /// One past the last index in view (exclusive), including the trailing item.
    pub end: usize,

    /// Total extent of items before `start`.
    pub before_extent: f64,
    /// Total extent of items at or after `end`.
    pub after_extent: f64,
    /// Total extent of the entire strip (all items `0..len`).
    pub content_extent: f64,
}

impl VisibleWindow {
    /// A window with no items and no content.
    pub const EMPTY: Self = Self {
        start: 0,
        end: 0,
        before_extent: 0.0,
        after_extent: 0.0,
        content_extent: 0.0,
    };

    /// Returns `true` if there are no items in view.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Number of items in view.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// The index range in view.
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// A 1D model over a dense strip of items, indexed `0..len`.
///
/// Methods that consult prefix sums take `&mut self` so implementations can
/// keep internal caches without interior mutability.
pub trait ExtentModel {
    /// Number of items in this strip.
    fn len(&self) -> usize;

    /// Returns `true` if there are no items in this strip.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total extent of the entire strip.
    fn total_extent(&mut self) -> f64;

    /// Span of a single item. Never negative.
    fn extent_of(&mut self, index: usize) -> f64;

    /// Offset of the start of the given item from the start of the strip.
    ///
    /// Implementations must guarantee that `offset_of(0) == 0` and that
    /// `offset_of(i + 1) >= offset_of(i) + extent_of(i)`.
    fn offset_of(&mut self, index: usize) -> f64;

    /// Given an offset, find the index of the item at or before it, clamped
    /// into `0..len`.
    fn index_at_offset(&mut self, offset: f64) -> usize;
}

/// An [`ExtentModel`] whose logical length can be resized.
///
/// Newly added items have extent `0.0` until explicitly updated.
pub trait ResizableExtentModel: ExtentModel {
    /// Ensures that the model can represent `len` items.
    fn set_len(&mut self, len: usize);
}

/// Compute the items in view for a scroll offset and viewport extent.
///
/// The returned range covers every item whose span intersects
/// `[scroll_offset, scroll_offset + viewport_extent)`, plus one trailing item
/// after the last intersecting one (for grid models, the whole trailing track).
/// The trailing item keeps partially scrolled tiles realized while the window
/// moves by less than one span.
pub fn compute_visible_window<M>(
    model: &mut M,
    scroll_offset: f64,
    viewport_extent: f64,
) -> VisibleWindow
where
    M: ExtentModel + ?Sized,
{
    let len = model.len();
    if len == 0 {
        return VisibleWindow::EMPTY;
    }

    let content_extent = model.total_extent().max(0.0);
    if content_extent == 0.0 {
        // All items collapsed; treat as an empty strip.
        return VisibleWindow::EMPTY;
    }

    let min = scroll_offset.max(0.0).min(content_extent);
    let max = (min + viewport_extent.max(0.0)).min(content_extent);

    let mut start = cmp::min(model.index_at_offset(min), len - 1);
    while start > 0 && model.offset_of(start) > min {
        start -= 1;
    }

    let mut end = start;
    while end < len && model.offset_of(end) < max {
        end += 1;
    }
    if end == start && end < len {
        // Zero-extent viewport still realizes the item at the offset.
        end += 1;
    }

    // Trailing item: everything that starts where the next item starts.
    if end < len {
        let trailing = model.offset_of(end);
        while end < len && model.offset_of(end) == trailing {
            end += 1;
        }
    }

    let before_extent = model.offset_of(start);
    let end_start = if end < len {
        model.offset_of(end)
    } else {
        content_extent
    };

    VisibleWindow {
        start,
        end,
        before_extent,
        after_extent: (content_extent - end_start).max(0.0),
        content_extent,
    }
}

/// A strip where every item spans the same `pitch`.
///
/// Offsets, indexes and the visible window are all answered in O(1), and the
/// locked state reduces to comparing `len * pitch` with the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedExtentModel {
    len: usize,
    pitch: f64,
}

impl FixedExtentModel {
    /// `len` items of `pitch` pixels each. Negative pitches become zero.
    #[must_use]
    pub fn new(len: usize, pitch: f64) -> Self {
        Self {
            len,
            pitch: pitch.max(0.0),
        }
    }

    /// The span shared by every item.
    #[must_use]
    pub const fn pitch(&self) -> f64 {
        self.pitch
    }

    /// Changes the shared span. Negative pitches become zero.
    pub fn set_pitch(&mut self, pitch: f64) {
        debug_assert!(pitch.is_finite(), "item pitch must be finite, got {pitch:?}");
        self.pitch = pitch.max(0.0);
    }

    /// Returns `true` when all items fit in `viewport`, so scrolling is a no-op.
    #[must_use]
    pub fn fits(&self, viewport: f64) -> bool {
        self.content() <= viewport.max(0.0)
    }

    /// Items in view at `scroll_offset`, plus the trailing item.
    ///
    /// Agrees with [`compute_visible_window`] without scanning offsets.
    #[must_use]
    pub fn window(&self, scroll_offset: f64, viewport: f64) -> Range<usize> {
        let content = self.content();
        if self.len == 0 || content == 0.0 {
            return 0..0;
        }
        let top = scroll_offset.clamp(0.0, content);
        let bottom = (top + viewport.max(0.0)).min(content);
        let start = self.slot(top).min(self.len - 1);
        // Items starting before `bottom` intersect; at least the one at `top`.
        let intersecting = self.slot_ceil(bottom).max(start + 1);
        start..(intersecting + 1).min(self.len)
    }

    #[allow(
        clippy::cast_precision_loss,
        reason = "Item counts stay far below 2^52."
    )]
    fn content(&self) -> f64 {
        self.pitch * self.len as f64
    }

    fn slot(&self, offset: f64) -> usize {
        if self.pitch <= 0.0 {
            return 0;
        }
        to_index((offset / self.pitch).floor())
    }

    fn slot_ceil(&self, offset: f64) -> usize {
        if self.pitch <= 0.0 {
            return 0;
        }
        to_index((offset / self.pitch).ceil())
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "Callers clamp the result into the strip right away."
)]
fn to_index(ratio: f64) -> usize {
    if ratio <= 0.0 { 0 } else { ratio as usize }
}

impl ExtentModel for FixedExtentModel {
    fn len(&self) -> usize {
        self.len
    }

    fn total_extent(&mut self) -> f64 {
        self.content()
    }

    fn extent_of(&mut self, _index: usize) -> f64 {
        self.pitch
    }

    #[allow(
        clippy::cast_precision_loss,
        reason = "Item counts stay far below 2^52."
    )]
    fn offset_of(&mut self, index: usize) -> f64 {
        self.pitch * index as f64
    }

    fn index_at_offset(&mut self, offset: f64) -> usize {
        self.slot(offset).min(self.len.saturating_sub(1))
    }
}

impl ResizableExtentModel for FixedExtentModel {
    fn set_len(&mut self, len: usize) {
        self.len = len;
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ExtentModel, FixedExtentModel, ResizableExtentModel, VisibleWindow, compute_visible_window,
    };

    #[derive(Clone, Debug)]
    struct SimpleModel {
        extents: Vec<f64>,
    }

    impl SimpleModel {
        fn new(extents: &[f64]) -> Self {
            Self {
                extents: extents.to_vec(),
            }
        }
    }

    impl ExtentModel for SimpleModel {
        fn len(&self) -> usize {
            self.extents.len()
        }

        fn total_extent(&mut self) -> f64 {
            self.extents.iter().copied().sum()
        }

        fn extent_of(&mut self, index: usize) -> f64 {
            self.extents.get(index).copied().unwrap_or(0.0)
        }

        fn offset_of(&mut self, index: usize) -> f64 {
            self.extents.iter().take(index).copied().sum()
        }

        fn index_at_offset(&mut self, offset: f64) -> usize {
            let mut pos = 0.0;
            for (i, extent) in self.extents.iter().copied().enumerate() {
                if pos + extent > offset {
                    return i;
                }
                pos += extent;
            }
            self.extents.len().saturating_sub(1)
        }
    }

    #[test]
    fn empty_model_yields_empty_window() {
        let mut model = SimpleModel::new(&[]);
        let window = compute_visible_window(&mut model, 0.0, 100.0);
        assert_eq!(window, VisibleWindow::EMPTY);
    }

    #[test]
    fn window_includes_one_trailing_item() {
        // Three items of 10; a 10 unit viewport at 5 intersects items 0 and 1.
        let mut model = SimpleModel::new(&[10.0, 10.0, 10.0, 10.0]);
        let window = compute_visible_window(&mut model, 5.0, 10.0);
        assert_eq!(window.start, 0);
        assert_eq!(window.end, 3, "items 0 and 1 intersect, item 2 trails");
        assert_eq!(window.before_extent, 0.0);
        assert_eq!(window.after_extent, 10.0);
        assert_eq!(window.content_extent, 40.0);
    }

    #[test]
    fn trailing_item_is_clamped_at_the_end() {
        let mut model = SimpleModel::new(&[10.0, 10.0, 10.0]);
        let window = compute_visible_window(&mut model, 10.0, 20.0);
        assert_eq!(window.range(), 1..3);
        assert_eq!(window.after_extent, 0.0);
    }

    #[test]
    fn variable_extents_start_at_the_containing_item() {
        let mut model = SimpleModel::new(&[5.0, 40.0, 5.0, 5.0, 5.0]);
        let window = compute_visible_window(&mut model, 20.0, 10.0);
        // Offset 20 lies inside item 1 (5..45); the viewport ends inside it too.
        assert_eq!(window.start, 1);
        assert_eq!(window.end, 3);
        assert_eq!(window.before_extent, 5.0);
    }

    #[test]
    fn collapsed_items_produce_an_empty_window() {
        let mut model = SimpleModel::new(&[0.0, 0.0]);
        let window = compute_visible_window(&mut model, 0.0, 50.0);
        assert!(window.is_empty());
    }

    #[test]
    fn fixed_window_matches_the_scanning_window() {
        // 100 tiles of 20 in a 150 viewport, scrolled by two tiles.
        let mut model = FixedExtentModel::new(100, 20.0);
        assert_eq!(model.window(40.0, 150.0), 2..11);
        for (offset, viewport) in [(0.0, 150.0), (35.0, 150.0), (1850.0, 150.0), (5.0, 0.0)] {
            let scanned = compute_visible_window(&mut model, offset, viewport).range();
            assert_eq!(model.window(offset, viewport), scanned, "{offset} {viewport}");
        }
    }

    #[test]
    fn fixed_lookups_clamp_into_the_strip() {
        let mut model = FixedExtentModel::new(5, 10.0);
        assert_eq!(model.total_extent(), 50.0);
        assert_eq!(model.offset_of(3), 30.0);
        assert_eq!(model.index_at_offset(-20.0), 0);
        assert_eq!(model.index_at_offset(49.9), 4);
        assert_eq!(model.index_at_offset(100.0), 4);

        model.set_pitch(-3.0);
        assert_eq!(model.pitch(), 0.0);
        assert_eq!(model.index_at_offset(25.0), 0);
        assert!(model.window(0.0, 10.0).is_empty());
    }

    #[test]
    fn fixed_strip_fits_when_content_is_no_longer_than_the_viewport() {
        let mut model = FixedExtentModel::new(3, 10.0);
        assert!(model.fits(30.0));
        assert!(!model.fits(29.0));
        model.set_len(0);
        assert!(model.fits(0.0));
    }
}
