// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Virtualized scrollable list layouts.
//!
//! A list node owns a [`ScrollWindow`] over its item children (every child that
//! is not transient). On each update it positions the items inside the visible
//! window relative to the scroll offset and enables them; items outside the
//! window are disabled so they neither update nor draw. The list clips its
//! children, so partially visible items are cut at its edges.
//!
//! A steady frame touches only the items entering, leaving or inside the
//! window. The whole item list is walked again only after children were added,
//! removed, reordered or resized, or the list width changed.
//!
//! Two layouts are provided:
//!
//! - [`GridList`]: uniform tiles laid out in rows of as many columns as fit the
//!   list width. Index↔pixel mapping is O(1).
//! - [`VariableList`]: a single column where each item's own height (plus the
//!   spacing) is its span.

use core::fmt::Debug;
use core::mem;
use core::num::NonZeroUsize;
use core::ops::Range;
use std::rc::Rc;

use arbor_list::{
    ExtentModel, FixedExtentModel, GridTrackModel, PrefixSumExtentModel, ScrollAlign,
    ScrollOutcome, ScrollWindow, Thumb,
};
use arbor_scene::{
    Behavior, Capabilities, DirtyLevel, Event, EventKinds, NodeCx, NodeError, NodeId, PaintCx,
    Props, Scene, SceneError, Scrollable, Transform,
};
use tracing::{debug, trace, warn};

use crate::scrollbar::Scrollbar;
use crate::style::Style;

/// How a list maps its items onto the scroll axis and the cross axis.
pub trait ListLayout: Debug + 'static {
    /// The extent model the list scrolls over.
    type Model: ExtentModel + Debug + 'static;

    /// Class name of lists with this layout.
    const CLASS: &'static str;

    /// An empty model.
    fn new_model(&self) -> Self::Model;

    /// Brings the model in line with the current items and list width.
    ///
    /// Called only after the items changed or the width changed. Returns
    /// `true` if any span changed.
    fn sync(
        &self,
        window: &mut ScrollWindow<Self::Model>,
        scene: &Scene,
        items: &[NodeId],
        width: i32,
    ) -> bool;

    /// Offset of item `index` along the cross axis.
    fn cross_offset(&self, model: &Self::Model, index: usize) -> f64;

    /// Size imposed on every item, if any.
    fn item_size(&self) -> Option<(i32, i32)> {
        None
    }

    /// Layout constructor arguments.
    fn properties(&self, props: &mut Props);
}

/// Fixed-size tiles in as many columns as fit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniformGrid {
    /// Tile width; also the column pitch.
    pub tile_width: i32,
    /// Tile height; also the row pitch.
    pub tile_height: i32,
}

impl UniformGrid {
    fn columns(&self, width: i32) -> NonZeroUsize {
        usize::try_from(width / self.tile_width.max(1))
            .ok()
            .and_then(NonZeroUsize::new)
            .unwrap_or(NonZeroUsize::MIN)
    }
}

impl ListLayout for UniformGrid {
    type Model = GridTrackModel<FixedExtentModel>;

    const CLASS: &'static str = "GridList";

    fn new_model(&self) -> Self::Model {
        let rows = FixedExtentModel::new(0, f64::from(self.tile_height));
        GridTrackModel::new(rows, NonZeroUsize::MIN, 0)
    }

    fn sync(
        &self,
        window: &mut ScrollWindow<Self::Model>,
        _scene: &Scene,
        items: &[NodeId],
        width: i32,
    ) -> bool {
        let columns = self.columns(width);
        let model = window.model();
        if model.cells_per_track() == columns.get() && model.len() == items.len() {
            return false;
        }
        let model = window.model_mut();
        model.set_cells_per_track(columns);
        model.set_len(items.len());
        true
    }

    fn cross_offset(&self, model: &Self::Model, index: usize) -> f64 {
        let column = i32::try_from(model.cell_in_track(index)).unwrap_or(0);
        f64::from(column.saturating_mul(self.tile_width))
    }

    fn item_size(&self) -> Option<(i32, i32)> {
        Some((self.tile_width, self.tile_height))
    }

    fn properties(&self, props: &mut Props) {
        props.insert("tile_width", self.tile_width);
        props.insert("tile_height", self.tile_height);
    }
}

/// One column of items, each spanning its own height plus the spacing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VariableColumn {
    /// Gap after every item.
    pub spacing: f64,
}

impl ListLayout for VariableColumn {
    type Model = PrefixSumExtentModel;

    const CLASS: &'static str = "VariableList";

    fn new_model(&self) -> Self::Model {
        PrefixSumExtentModel::new()
    }

    fn sync(
        &self,
        window: &mut ScrollWindow<Self::Model>,
        scene: &Scene,
        items: &[NodeId],
        _width: i32,
    ) -> bool {
        let mut changed = false;
        if window.model().len() != items.len() {
            window.model_mut().set_len(items.len());
            changed = true;
        }
        for (index, &item) in items.iter().enumerate() {
            let height = scene.transform(item).map_or(0, Transform::height);
            let extent = f64::from(height.max(0)) + self.spacing;
            if window.model().extent_at(index) != extent {
                changed |= window.model_mut().set_extent(index, extent);
            }
        }
        changed
    }

    fn cross_offset(&self, _model: &Self::Model, _index: usize) -> f64 {
        0.0
    }

    fn properties(&self, props: &mut Props) {
        props.insert("spacing", self.spacing);
    }
}

/// A list node with the layout `L`.
#[derive(Debug)]
pub struct ScrollList<L: ListLayout> {
    layout: L,
    window: ScrollWindow<L::Model>,
    style: Rc<Style>,
    scrollbar: Option<NodeId>,
    /// Item children, transient ones excluded.
    items: Vec<NodeId>,
    /// Indexes enabled and placed by the last relayout.
    realized: Range<usize>,
    /// Width the layout was last synced at; `None` before the first relayout.
    synced_width: Option<i32>,
}

/// A uniform grid of tiles.
pub type GridList = ScrollList<UniformGrid>;

/// A column of variable height items.
pub type VariableList = ScrollList<VariableColumn>;

impl GridList {
    /// A grid of `tile_width` × `tile_height` tiles.
    #[must_use]
    pub fn grid(tile_width: i32, tile_height: i32) -> Self {
        Self::with_layout(UniformGrid {
            tile_width: tile_width.max(0),
            tile_height: tile_height.max(0),
        })
    }

    /// Builds from constructor arguments: `tile_width`, `tile_height` (default 32),
    /// and style colors.
    pub fn from_props(props: &Props) -> Result<Self, SceneError> {
        let tile_width = int_prop(props, "tile_width", 32)?;
        let tile_height = int_prop(props, "tile_height", 32)?;
        Ok(Self::grid(tile_width, tile_height).with_style(Rc::new(Style::from_props(props))))
    }
}

impl VariableList {
    /// A column with `spacing` pixels after each item.
    #[must_use]
    pub fn column(spacing: f64) -> Self {
        Self::with_layout(VariableColumn {
            spacing: spacing.max(0.0),
        })
    }

    /// Builds from constructor arguments: `spacing` and style colors.
    pub fn from_props(props: &Props) -> Result<Self, SceneError> {
        let spacing = props.get_f64("spacing")?.unwrap_or(0.0);
        Ok(Self::column(spacing).with_style(Rc::new(Style::from_props(props))))
    }
}

impl<L: ListLayout> ScrollList<L> {
    /// A list with `layout`, scrolled to the top.
    #[must_use]
    pub fn with_layout(layout: L) -> Self {
        let model = layout.new_model();
        Self {
            layout,
            window: ScrollWindow::new(model, 0.0),
            style: Rc::new(Style::new()),
            scrollbar: None,
            items: Vec::new(),
            realized: 0..0,
            synced_width: None,
        }
    }

    /// Replaces the style.
    #[must_use]
    pub fn with_style(mut self, style: Rc<Style>) -> Self {
        self.style = style;
        self
    }

    /// The layout.
    #[must_use]
    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// The scroll window.
    #[must_use]
    pub fn window(&self) -> &ScrollWindow<L::Model> {
        &self.window
    }

    fn after_scroll(&mut self, scene: &mut Scene, id: NodeId, applied: f64) -> ScrollOutcome {
        let locked = self.window.is_locked();
        if applied != 0.0 {
            debug!(?id, applied, offset = self.window.scroll_offset(), "list scrolled");
            self.relayout(scene, id);
        }
        ScrollOutcome { applied, locked }
    }

    /// Item children of the list, in order.
    #[must_use]
    pub fn items(&self) -> &[NodeId] {
        &self.items
    }

    /// Disables items leaving the window, then places and enables the ones in
    /// it. With `all`, every item outside the window is checked instead of
    /// only the previously realized ones.
    fn place_items(&mut self, scene: &mut Scene, all: bool) {
        let range = self.window.indexes_in_view();
        let previous = mem::replace(&mut self.realized, range.clone());
        let leaving: Vec<NodeId> = if all {
            self.items
                .iter()
                .enumerate()
                .filter(|(index, _)| !range.contains(index))
                .map(|(_, &item)| item)
                .collect()
        } else {
            previous
                .filter(|index| !range.contains(index))
                .filter_map(|index| self.items.get(index).copied())
                .collect()
        };
        for item in leaving {
            if scene.is_enabled(item) {
                scene.set_enabled(item, false);
            }
        }

        let scroll = self.window.scroll_offset();
        let size = self.layout.item_size();
        for index in range {
            let Some(&item) = self.items.get(index) else {
                break;
            };
            let (offset, _) = self.window.item_span(index);
            let x = self.layout.cross_offset(self.window.model(), index);
            place(scene, item, (x, offset - scroll), size);
            if !scene.is_enabled(item) {
                scene.set_enabled(item, true);
            }
        }
    }

    fn sync_scrollbar(&mut self, scene: &mut Scene, id: NodeId) {
        let Some(bar) = self.scrollbar else {
            return;
        };
        if scene.parent_of(bar) != Some(id) || scene.class_name(bar) != Some(Scrollbar::CLASS) {
            debug!(?id, ?bar, "scrollbar detached");
            self.scrollbar = None;
            return;
        }
        let (width, height) = scene.transform(id).map_or((0, 0), Transform::size);
        let x = f64::from(width);
        let misplaced = scene.transform(bar).is_some_and(|t| {
            t.anchor() != (1.0, 0.0) || t.position() != (x, 0.0) || t.height() != height
        });
        if misplaced && let Some(mut t) = scene.transform_mut(bar) {
            t.set_anchor(1.0, 0.0);
            t.set_position(x, 0.0);
            t.set_height(height);
        }
        if scene.children(id).last() != Some(&bar)
            && let Err(err) = scene.move_to_index(bar, -1)
        {
            warn!(?id, ?bar, %err, "could not raise scrollbar");
        }

        let thumb = self.window.thumb();
        let locked = self.window.is_locked();
        // `None` while the bar itself is calling in; it refreshes from the outcome.
        scene.with_behavior_mut::<Scrollbar, _>(bar, |scrollbar, scene| {
            if scrollbar.sync(thumb, locked) {
                scene.mark_dirty(bar, DirtyLevel::Redraw);
            }
        });
    }
}

impl<L: ListLayout> Scrollable for ScrollList<L> {
    fn scroll_by(&mut self, scene: &mut Scene, id: NodeId, delta: f64) -> ScrollOutcome {
        let outcome = self.window.scroll_by(delta);
        if outcome.locked {
            debug!(?id, delta, "list scroll locked");
        }
        self.after_scroll(scene, id, outcome.applied)
    }

    fn scroll_thumb_to(&mut self, scene: &mut Scene, id: NodeId, position: f64) -> ScrollOutcome {
        let target = self.window.offset_for_thumb_center(position);
        let applied = self.window.set_scroll_offset(target);
        self.after_scroll(scene, id, applied)
    }

    fn scroll_to_index(
        &mut self,
        scene: &mut Scene,
        id: NodeId,
        index: usize,
        align: ScrollAlign,
    ) -> f64 {
        let applied = self.window.scroll_to_index(index, align);
        self.after_scroll(scene, id, applied).applied
    }

    fn relayout(&mut self, scene: &mut Scene, id: NodeId) {
        let Some((width, height)) = scene.transform(id).map(Transform::size) else {
            return;
        };
        let restructured = scene.take_children_changed(id) || self.synced_width.is_none();
        if restructured {
            self.items = scene
                .children(id)
                .iter()
                .copied()
                .filter(|&c| !scene.is_transient(c))
                .collect();
            trace!(?id, items = self.items.len(), "list items collected");
        }

        self.window.set_viewport_extent(f64::from(height));
        if (restructured || self.synced_width != Some(width))
            && self.layout.sync(&mut self.window, scene, &self.items, width)
        {
            self.window.clamp_scroll_to_content();
        }
        self.synced_width = Some(width);
        self.place_items(scene, restructured);
        self.sync_scrollbar(scene, id);
        // Sizing items and the scrollbar is the list's own doing.
        scene.take_children_changed(id);
    }

    fn scroll_offset(&self) -> f64 {
        self.window.scroll_offset()
    }

    fn indexes_in_view(&mut self) -> Range<usize> {
        self.window.indexes_in_view()
    }

    fn scroll_limits(&mut self) -> (f64, f64) {
        self.window.scroll_limits()
    }

    fn thumb(&mut self) -> Thumb {
        self.window.thumb()
    }

    fn is_locked(&mut self) -> bool {
        self.window.is_locked()
    }

    fn scrollbar(&self) -> Option<NodeId> {
        self.scrollbar
    }

    fn set_scrollbar(&mut self, scrollbar: Option<NodeId>) {
        self.scrollbar = scrollbar;
    }
}

impl<L: ListLayout> Behavior for ScrollList<L> {
    fn class_name(&self) -> &'static str {
        L::CLASS
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::CHILDREN | Capabilities::DRAWABLE | Capabilities::CLIPS_CHILDREN
    }

    fn event_kinds(&self) -> EventKinds {
        EventKinds::WHEEL
    }

    fn event(&mut self, cx: &mut NodeCx<'_>, event: &Event) {
        // With a scrollbar attached, the bar handles the wheel for both.
        if let Event::Wheel { position, delta } = *event
            && self.scrollbar.is_none()
            && cx.contains(position)
        {
            let id = cx.id();
            self.scroll_by(cx.scene_mut(), id, delta.y);
        }
    }

    fn update(&mut self, cx: &mut NodeCx<'_>) -> Result<(), NodeError> {
        let id = cx.id();
        self.relayout(cx.scene_mut(), id);
        Ok(())
    }

    fn paint(&mut self, cx: &mut PaintCx<'_>) -> Result<(), NodeError> {
        cx.fill(self.style.color("background")?);
        Ok(())
    }

    fn properties(&self) -> Props {
        let mut props = self.style.to_props();
        self.layout.properties(&mut props);
        if self.scrollbar.is_some() {
            props.insert("scrollbar", true);
        }
        props
    }

    fn as_scrollable(&mut self) -> Option<&mut dyn Scrollable> {
        Some(self)
    }
}

/// Scrolls the list node `id` by `delta` pixels.
pub fn scroll_by(scene: &mut Scene, id: NodeId, delta: f64) -> Option<ScrollOutcome> {
    scene.with_scrollable(id, |list, scene| list.scroll_by(scene, id, delta))
}

/// Scrolls item `index` of the list node `id` into view.
pub fn scroll_to_index(
    scene: &mut Scene,
    id: NodeId,
    index: usize,
    align: ScrollAlign,
) -> Option<f64> {
    scene.with_scrollable(id, |list, scene| {
        list.scroll_to_index(scene, id, index, align)
    })
}

/// Indexes of the items the list node `id` currently realizes.
pub fn indexes_in_view(scene: &mut Scene, id: NodeId) -> Option<Range<usize>> {
    scene.with_scrollable(id, |list, _| list.indexes_in_view())
}

fn place(scene: &mut Scene, item: NodeId, (x, y): (f64, f64), size: Option<(i32, i32)>) {
    let Some(current) = scene.transform(item) else {
        return;
    };
    let moved = current.anchor() != (0.0, 0.0) || current.position() != (x, y);
    let resized = size.is_some_and(|s| current.size() != s);
    if !moved && !resized {
        return;
    }
    let Some(mut t) = scene.transform_mut(item) else {
        return;
    };
    if let Some((width, height)) = size.filter(|_| resized) {
        t.set_size(width, height);
    }
    if moved {
        t.set_anchor(0.0, 0.0);
        t.set_position(x, y);
    }
}

fn int_prop(props: &Props, name: &str, default: i32) -> Result<i32, SceneError> {
    let Some(value) = props.get_i64(name)? else {
        return Ok(default);
    };
    i32::try_from(value).map_err(|_| SceneError::InvalidArgument {
        name: name.to_owned(),
        reason: format!("{value} does not fit in 32 bits"),
    })
}
