// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Widgets: styled interactive widgets and scrollable lists for Arbor scenes.
//!
//! - [`Style`]: cascading named colors, fonts and numbers, with state variants
//!   (`background_hovered`, `color_locked`, ...) derived from the base value.
//! - [`Interaction`]: the `Idle → Hovered → Selected → Idle` pointer state
//!   machine, with [`State::Locked`] reachable from anywhere. Clicks fire on
//!   release inside the widget, never on the press.
//! - [`Button`], [`Toggle`], [`TextEntry`]: drawable widgets that repaint on
//!   every state change.
//! - [`GridList`], [`VariableList`]: virtualized lists that lay out only the
//!   items in view, and [`Scrollbar`] to drive them.
//!
//! Widgets are plain [`Behavior`](arbor_scene::Behavior)s; construct them with
//! [`Scene::construct`](arbor_scene::Scene::construct), or by class name after
//! [`register_builtin`].
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use arbor_scene::{Event, NodeInit, PointerButton, Scene};
//! use arbor_widgets::{Button, State};
//! use kurbo::Point;
//!
//! let mut scene = Scene::new(320, 240);
//! let clicks = Rc::new(Cell::new(0));
//! let counter = Rc::clone(&clicks);
//! let button = scene
//!     .construct(
//!         None,
//!         NodeInit::at(10.0, 10.0, 80, 24),
//!         Button::new("Start").on_click(move |_| counter.set(counter.get() + 1)),
//!     )
//!     .unwrap();
//!
//! let at = Point::new(20.0, 20.0);
//! scene.handle_event(&Event::PointerDown { position: at, button: PointerButton::Primary });
//! assert_eq!(clicks.get(), 0);
//! scene.handle_event(&Event::PointerUp { position: at, button: PointerButton::Primary });
//! assert_eq!(clicks.get(), 1);
//! assert_eq!(scene.behavior::<Button>(button).unwrap().state(), State::Idle);
//! ```

mod button;
mod list;
mod press;
mod scrollbar;
mod state;
mod style;
mod text_entry;

use arbor_scene::{
    Behavior, ClassRegistry, DirtyLevel, NodeId, NodeInit, Props, Scene, SceneError,
};

pub use arbor_scene::Scrollable;
pub use button::{Button, ClickCallback, Toggle, ToggleCallback};
pub use list::{
    GridList, ListLayout, ScrollList, UniformGrid, VariableColumn, VariableList, indexes_in_view,
    scroll_by, scroll_to_index,
};
pub use press::{Press, PressResult, PressTracker};
pub use scrollbar::{DEFAULT_SCROLLBAR_MARGIN, DEFAULT_SCROLLBAR_WIDTH, Scrollbar};
pub use state::{Interaction, State, Transition};
pub use style::{
    BACKGROUND_DEFAULT, CHECKED_SHIFT, COLOR_DEFAULT, HOVERED_SHIFT, LOCKED_SATURATION,
    LOCKED_SHIFT, SELECTED_SHIFT, Style, StyleError, StyleValue, desaturate, modify_color,
};
pub use text_entry::{CompleteCallback, EditCallback, TextEntry};

/// Edits the widget `id` as `T` and marks it for repaint.
///
/// Returns `None` if the node is not a `T` or its behavior is lent out.
pub fn edit_widget<T: Behavior, R>(
    scene: &mut Scene,
    id: NodeId,
    f: impl FnOnce(&mut T) -> R,
) -> Option<R> {
    let out = f(scene.behavior_mut::<T>(id)?);
    scene.mark_dirty(id, DirtyLevel::Redraw);
    Some(out)
}

/// Registers `Button`, `Toggle`, `TextEntry`, `GridList` and `VariableList`.
///
/// List classes accept a `scrollbar` boolean argument that attaches a
/// [`Scrollbar`].
pub fn register_builtin(classes: &mut ClassRegistry) {
    classes.register(Button::CLASS, |scene, parent, init, props| {
        let button = Button::from_props(props)?;
        scene.construct(parent, init, button)
    });
    classes.register(Toggle::CLASS, |scene, parent, init, props| {
        let toggle = Toggle::from_props(props)?;
        scene.construct(parent, init, toggle)
    });
    classes.register(TextEntry::CLASS, |scene, parent, init, props| {
        let entry = TextEntry::from_props(props)?;
        scene.construct(parent, init, entry)
    });
    classes.register(UniformGrid::CLASS, |scene, parent, init, props| {
        let list = GridList::from_props(props)?;
        construct_list(scene, parent, init, props, list)
    });
    classes.register(VariableColumn::CLASS, |scene, parent, init, props| {
        let list = VariableList::from_props(props)?;
        construct_list(scene, parent, init, props, list)
    });
}

fn construct_list<L: ListLayout>(
    scene: &mut Scene,
    parent: Option<NodeId>,
    init: NodeInit,
    props: &Props,
    list: ScrollList<L>,
) -> Result<NodeId, SceneError> {
    let id = scene.construct(parent, init, list)?;
    if props.get_bool("scrollbar")?.unwrap_or(false)
        && let Err(err) = Scrollbar::new().attach(scene, id)
    {
        scene.remove(id);
        return Err(err);
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::{Button, GridList, Scrollbar, register_builtin};
    use arbor_scene::{NodeInit, Props, Scene};

    #[test]
    fn builtin_classes_are_registered() {
        let mut scene = Scene::new(10, 10);
        register_builtin(scene.classes_mut());
        for class in ["Button", "Toggle", "TextEntry", "GridList", "VariableList"] {
            assert!(scene.classes().contains(class), "{class}");
        }
    }

    #[test]
    fn lists_rebuild_their_scrollbar_from_properties() {
        let mut scene = Scene::new(100, 100);
        register_builtin(scene.classes_mut());
        let props = Props::new()
            .with("tile_width", 10)
            .with("tile_height", 10)
            .with("scrollbar", true);
        let list = scene
            .construct_class("GridList", None, NodeInit::at(0.0, 0.0, 50, 50), &props)
            .unwrap();
        let bar = scene
            .with_scrollable(list, |l, _| l.scrollbar())
            .flatten()
            .unwrap();
        assert_eq!(scene.class_name(bar), Some(Scrollbar::CLASS));

        let saved = scene.properties(list).unwrap();
        assert_eq!(saved.get_bool("scrollbar"), Ok(Some(true)));
        assert_eq!(saved.get_i64("tile_width"), Ok(Some(10)));
        assert!(scene.behavior::<GridList>(list).is_some());
    }

    #[test]
    fn bad_arguments_leave_no_node() {
        let mut scene = Scene::new(100, 100);
        register_builtin(scene.classes_mut());
        let props = Props::new().with("label", 3);
        assert!(
            scene
                .construct_class(Button::CLASS, None, NodeInit::default(), &props)
                .is_err()
        );
        assert!(scene.roots().is_empty());
    }

    #[test]
    fn edit_widget_marks_redraw() {
        let mut scene = Scene::new(100, 100);
        let id = scene
            .construct(None, NodeInit::at(0.0, 0.0, 10, 10), Button::new("a"))
            .unwrap();
        let mut backend = arbor_scene::HeadlessBackend::new(100, 100);
        scene.draw(&mut backend);
        super::edit_widget::<Button, _>(&mut scene, id, |b| b.set_label("b"));
        assert_eq!(scene.dirty_level(id), Some(arbor_scene::DirtyLevel::Redraw));
        assert_eq!(scene.behavior::<Button>(id).unwrap().label(), "b");
    }
}
