// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform tile grids: a per-track model viewed as a flat run of cells.
//!
//! The scroll axis moves over *tracks* (rows of a vertically scrolling grid,
//! columns of a horizontally scrolling one) while the list's children are a
//! flat sequence of *cells*. A cell shares the offset and extent of the track
//! that holds it, so the visible window always covers whole tracks.

use core::num::NonZeroUsize;

use crate::{ExtentModel, ResizableExtentModel};

/// Adapts a per-track [`ExtentModel`] into a per-cell model for tile grids.
#[derive(Debug, Clone)]
pub struct GridTrackModel<M: ResizableExtentModel> {
    track_model: M,
    cells_per_track: NonZeroUsize,
    len: usize,
}

impl<M: ResizableExtentModel> GridTrackModel<M> {
    /// Creates a grid of `len` cells laid out `cells_per_track` to a track.
    ///
    /// The track model is resized to `ceil(len / cells_per_track)` tracks. The
    /// last track may be partially filled and still has the full track extent.
    #[must_use]
    pub fn new(track_model: M, cells_per_track: NonZeroUsize, len: usize) -> Self {
        let mut grid = Self {
            track_model,
            cells_per_track,
            len,
        };
        let tracks = grid.track_count();
        grid.track_model.set_len(tracks);
        grid
    }

    /// Returns a shared reference to the underlying track model.
    #[must_use]
    pub fn track_model(&self) -> &M {
        &self.track_model
    }

    /// Returns a mutable reference to the underlying track model.
    pub fn track_model_mut(&mut self) -> &mut M {
        &mut self.track_model
    }

    /// Returns the number of cells per track.
    #[must_use]
    pub const fn cells_per_track(&self) -> usize {
        self.cells_per_track.get()
    }

    /// Sets the number of cells per track and resizes the track model.
    pub fn set_cells_per_track(&mut self, cells_per_track: NonZeroUsize) {
        self.cells_per_track = cells_per_track;
        let tracks = self.track_count();
        self.track_model.set_len(tracks);
    }

    /// Sets the total number of cells and resizes the track model.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        let tracks = self.track_count();
        self.track_model.set_len(tracks);
    }

    /// Returns the track index containing `cell_index`.
    #[must_use]
    pub const fn track_of_cell(&self, cell_index: usize) -> usize {
        cell_index / self.cells_per_track.get()
    }

    /// Returns the position of `cell_index` within its track.
    #[must_use]
    pub const fn cell_in_track(&self, cell_index: usize) -> usize {
        cell_index % self.cells_per_track.get()
    }

    /// Returns the number of tracks needed to hold every cell.
    #[must_use]
    pub const fn track_count(&self) -> usize {
        if self.len == 0 {
            return 0;
        }
        self.len.div_ceil(self.cells_per_track.get())
    }

    fn clamped_track(&self, index: usize) -> usize {
        let track = self.track_of_cell(index.min(self.len.saturating_sub(1)));
        debug_assert!(
            track < self.track_model.len(),
            "GridTrackModel track index out of bounds: track={track}, len={}",
            self.track_model.len()
        );
        track
    }
}

impl<M: ResizableExtentModel> ExtentModel for GridTrackModel<M> {
    fn len(&self) -> usize {
        self.len
    }

    fn total_extent(&mut self) -> f64 {
        self.track_model.total_extent()
    }

    fn extent_of(&mut self, index: usize) -> f64 {
        if self.len == 0 {
            return 0.0;
        }
        let track = self.clamped_track(index);
        self.track_model.extent_of(track)
    }

    fn offset_of(&mut self, index: usize) -> f64 {
        if self.len == 0 {
            return 0.0;
        }
        let track = self.clamped_track(index);
        self.track_model.offset_of(track)
    }

    fn index_at_offset(&mut self, offset: f64) -> usize {
        if self.len == 0 {
            return 0;
        }
        self.track_model
            .index_at_offset(offset)
            .saturating_mul(self.cells_per_track.get())
            .min(self.len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::GridTrackModel;
    use crate::{ExtentModel, FixedExtentModel, compute_visible_window};
    use core::num::NonZeroUsize;

    fn grid(columns: usize, len: usize) -> GridTrackModel<FixedExtentModel> {
        GridTrackModel::new(
            FixedExtentModel::new(0, 10.0),
            NonZeroUsize::new(columns).unwrap(),
            len,
        )
    }

    #[test]
    fn cells_map_onto_tracks() {
        let grid = grid(4, 10);
        assert_eq!(grid.track_count(), 3);
        assert_eq!(grid.track_of_cell(3), 0);
        assert_eq!(grid.track_of_cell(4), 1);
        assert_eq!(grid.cell_in_track(7), 3);
    }

    #[test]
    fn cells_share_their_track_offset() {
        let mut grid = grid(4, 10);
        assert_eq!(grid.total_extent(), 30.0);
        assert_eq!(grid.offset_of(3), 0.0);
        assert_eq!(grid.offset_of(4), 10.0);
        // The last, partial track still has the full extent.
        assert_eq!(grid.offset_of(9), 20.0);
        assert_eq!(grid.extent_of(9), 10.0);
    }

    #[test]
    fn index_at_offset_resolves_to_first_cell_in_track() {
        let mut grid = grid(4, 10);
        assert_eq!(grid.index_at_offset(5.0), 0);
        assert_eq!(grid.index_at_offset(19.9), 4);
        assert_eq!(grid.index_at_offset(100.0), 8);
    }

    #[test]
    fn visible_window_covers_whole_tracks() {
        // 3 columns, 30 cells → 10 tracks of 10. A 15 unit viewport touches
        // tracks 0 and 1; track 2 trails.
        let mut grid = grid(3, 30);
        let window = compute_visible_window(&mut grid, 0.0, 15.0);
        assert_eq!(window.range(), 0..9);

        let window = compute_visible_window(&mut grid, 12.0, 15.0);
        assert_eq!(window.range(), 3..12);
    }
}
