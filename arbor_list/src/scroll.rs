// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scroll controller that owns an [`ExtentModel`] and the scroll state.

use core::ops::Range;

use crate::{ExtentModel, VisibleWindow, compute_visible_window};

/// Alignment mode when scrolling a specific index into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAlign {
    /// Align the start of the item with the start of the viewport.
    Start,
    /// Center the item within the viewport.
    Center,
    /// Align the end of the item with the end of the viewport.
    End,
    /// Move just enough to make the item fully visible.
    Nearest,
}

/// What a call to [`ScrollWindow::scroll_by`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollOutcome {
    /// The distance actually scrolled after clamping into the limits.
    pub applied: f64,
    /// `true` when the content fits the viewport and scrolling is a no-op.
    pub locked: bool,
}

impl ScrollOutcome {
    /// Returns `true` if the scroll offset changed.
    #[must_use]
    pub fn moved(&self) -> bool {
        self.applied != 0.0
    }
}

/// Scrollbar thumb geometry along the scroll axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thumb {
    /// Offset of the thumb from the start of the track.
    pub offset: f64,
    /// Length of the thumb.
    pub extent: f64,
}

/// Scroll state over a virtualized strip of items.
///
/// The window keeps the scroll offset inside
/// `(0, max(0, total_extent - viewport_extent))` and caches the last computed
/// [`VisibleWindow`].
#[derive(Debug)]
pub struct ScrollWindow<M: ExtentModel> {
    model: M,
    scroll_offset: f64,
    viewport_extent: f64,

    dirty: bool,
    last_window: VisibleWindow,
}

impl<M: ExtentModel> ScrollWindow<M> {
    /// Creates a window at offset zero over `model` with the given viewport extent.
    #[must_use]
    pub fn new(model: M, viewport_extent: f64) -> Self {
        Self {
            model,
            scroll_offset: 0.0,
            viewport_extent: viewport_extent.max(0.0),
            dirty: true,
            last_window: VisibleWindow::EMPTY,
        }
    }

    /// Returns a shared reference to the underlying model.
    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Returns a mutable reference to the underlying model, marking the cached
    /// window dirty.
    ///
    /// Call [`ScrollWindow::clamp_scroll_to_content`] afterwards if the content
    /// may have shrunk.
    pub fn model_mut(&mut self) -> &mut M {
        self.dirty = true;
        &mut self.model
    }

    /// Returns the current scroll offset.
    #[must_use]
    pub const fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Returns the current viewport extent.
    #[must_use]
    pub const fn viewport_extent(&self) -> f64 {
        self.viewport_extent
    }

    /// Sets the viewport extent and re-clamps the scroll offset.
    pub fn set_viewport_extent(&mut self, extent: f64) {
        let extent = extent.max(0.0);
        if extent != self.viewport_extent {
            self.viewport_extent = extent;
            self.dirty = true;
            self.clamp_scroll_to_content();
        }
    }

    /// Total extent of the content.
    pub fn content_extent(&mut self) -> f64 {
        self.model.total_extent().max(0.0)
    }

    /// The allowed scroll range: `(0, max(0, total - viewport))`.
    pub fn scroll_limits(&mut self) -> (f64, f64) {
        let total = self.content_extent();
        (0.0, (total - self.viewport_extent).max(0.0))
    }

    /// Ratio of the viewport to the content extent.
    ///
    /// Empty content reports `f64::INFINITY`.
    pub fn fill_ratio(&mut self) -> f64 {
        let total = self.content_extent();
        if total <= 0.0 {
            f64::INFINITY
        } else {
            self.viewport_extent / total
        }
    }

    /// Returns `true` when all content fits in the viewport, making scrolling
    /// a no-op.
    pub fn is_locked(&mut self) -> bool {
        self.fill_ratio() >= 1.0
    }

    /// Sets the scroll offset, clamped into [`ScrollWindow::scroll_limits`].
    ///
    /// Returns the distance actually moved.
    pub fn set_scroll_offset(&mut self, offset: f64) -> f64 {
        let (min, max) = self.scroll_limits();
        let offset = offset.clamp(min, max);
        let applied = offset - self.scroll_offset;
        if applied != 0.0 {
            self.scroll_offset = offset;
            self.dirty = true;
        }
        applied
    }

    /// Scrolls by `delta`, clamped into the limits.
    pub fn scroll_by(&mut self, delta: f64) -> ScrollOutcome {
        let locked = self.is_locked();
        let applied = if locked {
            self.set_scroll_offset(0.0)
        } else {
            self.set_scroll_offset(self.scroll_offset + delta)
        };
        ScrollOutcome { applied, locked }
    }

    /// Re-clamps the scroll offset after the content or viewport changed.
    ///
    /// Returns the distance moved.
    pub fn clamp_scroll_to_content(&mut self) -> f64 {
        self.set_scroll_offset(self.scroll_offset)
    }

    /// Computes or returns the cached visible window.
    #[must_use]
    pub fn visible_window(&mut self) -> VisibleWindow {
        if self.dirty {
            self.last_window =
                compute_visible_window(&mut self.model, self.scroll_offset, self.viewport_extent);
            self.dirty = false;
        }
        self.last_window
    }

    /// The minimal contiguous index range intersecting the viewport, plus one
    /// trailing item.
    pub fn indexes_in_view(&mut self) -> Range<usize> {
        self.visible_window().range()
    }

    /// Scrollbar thumb geometry for a track as long as the viewport.
    ///
    /// The thumb is `viewport² / total` long and starts at
    /// `(scroll_offset / total) * viewport`. When the content fits, the thumb
    /// fills the track.
    pub fn thumb(&mut self) -> Thumb {
        let total = self.content_extent();
        let viewport = self.viewport_extent;
        if total <= viewport || total <= 0.0 {
            return Thumb {
                offset: 0.0,
                extent: viewport,
            };
        }
        Thumb {
            offset: self.scroll_offset / total * viewport,
            extent: viewport * viewport / total,
        }
    }

    /// Scroll offset that places the thumb's center at `position` along the track.
    pub fn offset_for_thumb_center(&mut self, position: f64) -> f64 {
        let total = self.content_extent();
        let viewport = self.viewport_extent;
        if viewport <= 0.0 {
            return 0.0;
        }
        let thumb = self.thumb();
        (position - thumb.extent / 2.0) / viewport * total
    }

    /// Start offset and extent of item `index` along the scroll axis.
    ///
    /// Unlike going through [`ScrollWindow::model_mut`], this keeps the cached
    /// visible window.
    pub fn item_span(&mut self, index: usize) -> (f64, f64) {
        (self.model.offset_of(index), self.model.extent_of(index))
    }

    /// Returns `true` if the given index is fully within the viewport.
    #[must_use]
    pub fn is_index_fully_visible(&mut self, index: usize) -> bool {
        if index >= self.model.len() {
            return false;
        }
        let item_start = self.model.offset_of(index);
        let item_end = item_start + self.model.extent_of(index);
        item_start >= self.scroll_offset && item_end <= self.scroll_offset + self.viewport_extent
    }

    /// Returns `true` if the given index overlaps the viewport at all.
    #[must_use]
    pub fn is_index_partially_visible(&mut self, index: usize) -> bool {
        if index >= self.model.len() {
            return false;
        }
        let item_start = self.model.offset_of(index);
        let item_end = item_start + self.model.extent_of(index);
        item_end > self.scroll_offset && item_start < self.scroll_offset + self.viewport_extent
    }

    /// Scrolls so that item `index` is brought into view using the given alignment.
    ///
    /// Returns the distance moved.
    pub fn scroll_to_index(&mut self, index: usize, align: ScrollAlign) -> f64 {
        let len = self.model.len();
        if len == 0 {
            return self.set_scroll_offset(0.0);
        }
        let idx = index.min(len - 1);
        let item_start = self.model.offset_of(idx);
        let item_end = item_start + self.model.extent_of(idx);
        let viewport = self.viewport_extent;

        let new_offset = match align {
            ScrollAlign::Start => item_start,
            ScrollAlign::End => item_end - viewport,
            ScrollAlign::Center => (item_start + item_end) / 2.0 - viewport / 2.0,
            ScrollAlign::Nearest => {
                let current = self.scroll_offset;
                if item_start >= current && item_end <= current + viewport {
                    current
                } else if item_start < current {
                    item_start
                } else {
                    item_end - viewport
                }
            }
        };
        self.set_scroll_offset(new_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::{ScrollAlign, ScrollWindow};
    use crate::{FixedExtentModel, PrefixSumExtentModel};

    #[test]
    fn uniform_tiles_scrolled_by_two_tiles() {
        let mut window = ScrollWindow::new(FixedExtentModel::new(100, 20.0), 150.0);
        let outcome = window.scroll_by(40.0);
        assert_eq!(outcome.applied, 40.0);
        assert!(!outcome.locked);

        let range = window.indexes_in_view();
        assert_eq!(range.start, 2);
        // ceil(150 / 20) + 1
        assert!(range.len() >= 9, "got {range:?}");
        assert_eq!(range, 2..11);
    }

    #[test]
    fn scrolling_is_clamped_into_limits() {
        let mut window = ScrollWindow::new(FixedExtentModel::new(10, 10.0), 30.0);
        assert_eq!(window.scroll_limits(), (0.0, 70.0));

        let outcome = window.scroll_by(500.0);
        assert_eq!(outcome.applied, 70.0);
        assert_eq!(window.scroll_offset(), 70.0);

        let outcome = window.scroll_by(-1000.0);
        assert_eq!(outcome.applied, -70.0);
        assert_eq!(window.scroll_offset(), 0.0);

        let outcome = window.scroll_by(-5.0);
        assert!(!outcome.moved());
    }

    #[test]
    fn fitting_content_locks_scrolling() {
        let mut window = ScrollWindow::new(FixedExtentModel::new(2, 10.0), 30.0);
        assert!(window.is_locked());
        assert_eq!(window.scroll_limits(), (0.0, 0.0));
        let outcome = window.scroll_by(15.0);
        assert!(outcome.locked);
        assert!(!outcome.moved());

        // Exactly fitting content is locked as well.
        let mut window = ScrollWindow::new(FixedExtentModel::new(3, 10.0), 30.0);
        assert!(window.is_locked());
    }

    #[test]
    fn thumb_tracks_scroll_offset() {
        // 200 units of content in a 50 unit viewport.
        let mut window = ScrollWindow::new(FixedExtentModel::new(20, 10.0), 50.0);
        let thumb = window.thumb();
        assert_eq!(thumb.extent, 12.5);
        assert_eq!(thumb.offset, 0.0);

        window.scroll_by(100.0);
        let thumb = window.thumb();
        assert_eq!(thumb.offset, 25.0);

        // Dragging the thumb center back to where it is keeps the offset.
        let center = thumb.offset + thumb.extent / 2.0;
        assert_eq!(window.offset_for_thumb_center(center), 100.0);
    }

    #[test]
    fn shrinking_content_reclamps_offset() {
        let mut window = ScrollWindow::new(PrefixSumExtentModel::new(), 20.0);
        window.model_mut().rebuild([10_u32; 10], |v| f64::from(*v));
        window.scroll_by(80.0);
        assert_eq!(window.scroll_offset(), 80.0);

        window.model_mut().set_len(4);
        assert_eq!(window.clamp_scroll_to_content(), -60.0);
        assert_eq!(window.indexes_in_view(), 2..4);
    }

    #[test]
    fn scroll_to_index_alignment_behaves_as_expected() {
        let mut window = ScrollWindow::new(FixedExtentModel::new(10, 10.0), 30.0);

        window.scroll_to_index(3, ScrollAlign::Start);
        assert_eq!(window.scroll_offset(), 30.0);

        window.scroll_to_index(3, ScrollAlign::End);
        assert_eq!(window.scroll_offset(), 10.0);

        window.scroll_to_index(3, ScrollAlign::Center);
        assert_eq!(window.scroll_offset(), 20.0);

        assert_eq!(window.scroll_to_index(3, ScrollAlign::Nearest), 0.0);
        assert!(window.is_index_fully_visible(3));
        assert!(window.is_index_partially_visible(4));
        assert!(!window.is_index_partially_visible(6));
    }
}
