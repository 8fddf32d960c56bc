// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Variable-size strips: per-item extents with a lazily maintained prefix sum.

use crate::{ExtentModel, ResizableExtentModel};

/// An [`ExtentModel`] backed by per-item extents and a lazily maintained
/// prefix-sum cache.
///
/// Each item's own size determines its span. Changing one extent only
/// invalidates the prefix sums from that index onwards, and they are rebuilt
/// on the next query that reaches past it.
#[derive(Clone, Default, Debug)]
pub struct PrefixSumExtentModel {
    extents: Vec<f64>,
    prefix_starts: Vec<f64>,
    dirty_from: Option<usize>,
}

impl PrefixSumExtentModel {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extents: Vec::new(),
            prefix_starts: Vec::new(),
            dirty_from: Some(0),
        }
    }

    /// Rebuilds the extents from a sequence of items and a size function.
    ///
    /// Any previous extents are discarded.
    pub fn rebuild<T, I>(&mut self, items: I, size_fn: impl Fn(&T) -> f64)
    where
        I: IntoIterator<Item = T>,
    {
        self.extents.clear();
        self.dirty_from = Some(0);
        for item in items {
            let extent = size_fn(&item);
            debug_assert!(
                extent.is_finite(),
                "PrefixSumExtentModel extents must be finite; got {extent:?}"
            );
            self.extents.push(extent.max(0.0));
        }
        self.prefix_starts.resize(self.extents.len(), 0.0);
    }

    /// Ensures storage for `len` items. Newly added items receive extent `0.0`.
    pub fn set_len(&mut self, len: usize) {
        let old_len = self.extents.len();
        self.extents.resize(len, 0.0);
        self.prefix_starts.resize(len, 0.0);
        self.dirty_from = Some(self.dirty_from.unwrap_or(old_len).min(old_len).min(len));
    }

    /// Updates the extent of a single item and marks prefix sums dirty from it.
    ///
    /// Returns `true` if the stored extent changed.
    pub fn set_extent(&mut self, index: usize, extent: f64) -> bool {
        if index >= self.extents.len() {
            self.set_len(index + 1);
        }
        debug_assert!(
            extent.is_finite(),
            "PrefixSumExtentModel extents must be finite; got {extent:?}"
        );
        let extent = extent.max(0.0);
        if self.extents[index] == extent {
            return false;
        }
        self.extents[index] = extent;
        self.dirty_from = Some(self.dirty_from.unwrap_or(index).min(index));
        true
    }

    /// Returns the extent of `index`, or `0.0` past the end.
    #[must_use]
    pub fn extent_at(&self, index: usize) -> f64 {
        self.extents.get(index).copied().unwrap_or(0.0)
    }

    /// Returns the offset of `index` from the start of the strip.
    pub fn offset_at(&mut self, index: usize) -> f64 {
        if index == 0 || self.extents.is_empty() {
            return 0.0;
        }
        if index >= self.extents.len() {
            return self.total_extent();
        }
        self.ensure_prefix_through(index);
        self.prefix_starts[index]
    }

    fn ensure_prefix_through(&mut self, through: usize) {
        let len = self.extents.len();
        if len == 0 || through >= len {
            return;
        }
        let dirty_from = match self.dirty_from {
            Some(d) if d <= through => d,
            _ => return,
        };

        let mut pos = if dirty_from == 0 {
            0.0
        } else {
            self.prefix_starts[dirty_from - 1] + self.extents[dirty_from - 1]
        };
        for i in dirty_from..=through {
            self.prefix_starts[i] = pos;
            pos += self.extents[i];
        }

        self.dirty_from = if through + 1 >= len {
            None
        } else {
            Some(through + 1)
        };
    }
}

impl ExtentModel for PrefixSumExtentModel {
    fn len(&self) -> usize {
        self.extents.len()
    }

    fn total_extent(&mut self) -> f64 {
        let len = self.extents.len();
        if len == 0 {
            return 0.0;
        }
        let last = len - 1;
        self.ensure_prefix_through(last);
        self.prefix_starts[last] + self.extents[last]
    }

    fn extent_of(&mut self, index: usize) -> f64 {
        self.extent_at(index)
    }

    fn offset_of(&mut self, index: usize) -> f64 {
        self.offset_at(index)
    }

    fn index_at_offset(&mut self, offset: f64) -> usize {
        let len = self.extents.len();
        if len == 0 {
            return 0;
        }
        self.ensure_prefix_through(len - 1);
        let target = offset.max(0.0);
        match self.prefix_starts.binary_search_by(|pos| {
            pos.partial_cmp(&target)
                .unwrap_or(core::cmp::Ordering::Equal)
        }) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        }
    }
}

impl ResizableExtentModel for PrefixSumExtentModel {
    fn set_len(&mut self, len: usize) {
        self.set_len(len);
    }
}

#[cfg(test)]
mod tests {
    use super::{ExtentModel, PrefixSumExtentModel};

    #[test]
    fn grows_and_reports_extents() {
        let mut model = PrefixSumExtentModel::new();
        model.set_len(3);
        model.set_extent(0, 10.0);
        model.set_extent(1, 20.0);
        model.set_extent(2, 30.0);

        assert_eq!(model.len(), 3);
        assert_eq!(model.total_extent(), 60.0);
        assert_eq!(model.offset_of(1), 10.0);
        assert_eq!(model.offset_of(2), 30.0);
        assert_eq!(model.offset_of(3), 60.0, "past the end is the total");
        assert_eq!(model.extent_of(1), 20.0);
    }

    #[test]
    fn changing_one_extent_shifts_later_offsets() {
        let mut model = PrefixSumExtentModel::new();
        model.rebuild([10_u32, 10, 10, 10], |v| f64::from(*v));
        assert_eq!(model.offset_of(3), 30.0);

        assert!(model.set_extent(1, 25.0));
        assert!(!model.set_extent(1, 25.0), "same extent is not a change");
        assert_eq!(model.offset_of(1), 10.0);
        assert_eq!(model.offset_of(3), 45.0);
        assert_eq!(model.total_extent(), 55.0);
    }

    #[test]
    fn index_lookup_uses_prefix_sums() {
        let mut model = PrefixSumExtentModel::new();
        model.rebuild([10_u32, 20, 30], |v| f64::from(*v));

        assert_eq!(model.index_at_offset(0.0), 0);
        assert_eq!(model.index_at_offset(9.0), 0);
        assert_eq!(model.index_at_offset(10.0), 1);
        assert_eq!(model.index_at_offset(29.0), 1);
        assert_eq!(model.index_at_offset(35.0), 2);
        assert_eq!(model.index_at_offset(500.0), 2);
    }

    #[test]
    fn negative_extents_are_clamped_to_zero() {
        let mut model = PrefixSumExtentModel::new();
        model.set_len(2);
        model.set_extent(0, -5.0);
        assert_eq!(model.extent_of(0), 0.0);
    }
}
