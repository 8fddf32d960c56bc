// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor List: scroll windows over dense strips of items.
//!
//! This crate holds the index/pixel arithmetic behind Arbor's scrollable list
//! layouts. It knows nothing about nodes or drawing; the list widgets in
//! `arbor_widgets` own a [`ScrollWindow`] and translate its answers into node
//! positions and enabled flags.
//!
//! The core concepts are:
//!
//! - [`ExtentModel`]: a 1D strip of items indexed `0..len`, each with a span
//!   (extent) along the scroll axis.
//! - [`FixedExtentModel`]: every item has the same span, so index↔pixel mapping
//!   is O(1).
//! - [`GridTrackModel`]: adapts a per-track model (rows of a vertical grid) to
//!   per-cell indices, for uniform grids of tiles.
//! - [`PrefixSumExtentModel`]: each item has its own span; offsets come from a
//!   lazily maintained prefix sum.
//! - [`compute_visible_window`]: the minimal contiguous index range intersecting
//!   the viewport, plus one trailing item (or track) so partially visible tiles
//!   are always realized.
//! - [`ScrollWindow`]: scroll offset, viewport extent, clamped scrolling, the
//!   locked state when content fits, and scrollbar thumb geometry.
//!
//! ## Minimal example
//!
//! ```rust
//! use arbor_list::{FixedExtentModel, ScrollWindow};
//!
//! // 100 tiles, each 20 pixels tall, in a 150 pixel viewport.
//! let mut window = ScrollWindow::new(FixedExtentModel::new(100, 20.0), 150.0);
//! window.scroll_by(40.0);
//!
//! let range = window.indexes_in_view();
//! assert_eq!(range.start, 2);
//! assert!(range.len() >= 9);
//! assert_eq!(window.scroll_limits(), (0.0, 1850.0));
//! ```
//!
//! For variable spans, use [`PrefixSumExtentModel`] and feed measured sizes back
//! with [`PrefixSumExtentModel::set_extent`] or [`PrefixSumExtentModel::rebuild`].
//!
//! All extents and offsets are in pixels along the scroll axis and are expected
//! to be finite. Negative extents are clamped to zero.

mod grid_track;
mod model;
mod prefix_sum;
mod scroll;

pub use grid_track::GridTrackModel;
pub use model::{
    ExtentModel, FixedExtentModel, ResizableExtentModel, VisibleWindow, compute_visible_window,
};
pub use prefix_sum::PrefixSumExtentModel;
pub use scroll::{ScrollAlign, ScrollOutcome, ScrollWindow, Thumb};
