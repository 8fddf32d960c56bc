// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Push buttons and toggles.

use core::fmt;
use std::rc::Rc;

use arbor_scene::{
    Behavior, Capabilities, Event, EventKinds, NodeCx, NodeError, PaintCx, Props, SceneError,
};
use tracing::debug;

use crate::state::{Interaction, State};
use crate::style::Style;

/// Called when a button is clicked.
pub type ClickCallback = Box<dyn FnMut(&mut NodeCx<'_>)>;

/// Called with the new value when a toggle flips.
pub type ToggleCallback = Box<dyn FnMut(&mut NodeCx<'_>, bool)>;

/// A labelled push button.
///
/// The click callback runs on release of the primary button while the pointer
/// is still inside, never on the press. Colors come from the style's
/// `background` and `color` keys for the current [`State`].
///
/// Setters called between frames take effect at the next update, which marks
/// the node for redraw.
pub struct Button {
    label: String,
    style: Rc<Style>,
    interaction: Interaction,
    on_click: Option<ClickCallback>,
    repaint: bool,
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("label", &self.label)
            .field("state", &self.interaction.state())
            .field("on_click", &self.on_click.is_some())
            .finish_non_exhaustive()
    }
}

impl Button {
    /// Class name.
    pub const CLASS: &'static str = "Button";

    /// An idle button with the default style.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            style: Rc::new(Style::new()),
            interaction: Interaction::new(),
            on_click: None,
            repaint: false,
        }
    }

    /// Builds from constructor arguments: `label`, `locked`, and style colors.
    pub fn from_props(props: &Props) -> Result<Self, SceneError> {
        let mut button = Self::new(props.get_str("label")?.unwrap_or_default())
            .with_style(Rc::new(Style::from_props(props)));
        if props.get_bool("locked")?.unwrap_or(false) {
            button.set_locked(true);
        }
        Ok(button)
    }

    /// Replaces the style.
    #[must_use]
    pub fn with_style(mut self, style: Rc<Style>) -> Self {
        self.style = style;
        self
    }

    /// Sets the click callback.
    #[must_use]
    pub fn on_click(mut self, callback: impl FnMut(&mut NodeCx<'_>) + 'static) -> Self {
        self.set_on_click(callback);
        self
    }

    /// Replaces the click callback.
    pub fn set_on_click(&mut self, callback: impl FnMut(&mut NodeCx<'_>) + 'static) {
        self.on_click = Some(Box::new(callback));
    }

    /// The label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Replaces the label.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
        self.repaint = true;
    }

    /// The style.
    #[must_use]
    pub fn style(&self) -> &Rc<Style> {
        &self.style
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> State {
        self.interaction.state()
    }

    /// Locks or unlocks the button. Returns `true` if the state changed.
    pub fn set_locked(&mut self, locked: bool) -> bool {
        let changed = self.interaction.set_locked(locked);
        self.repaint |= changed;
        changed
    }
}

impl Behavior for Button {
    fn class_name(&self) -> &'static str {
        Self::CLASS
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::DRAWABLE
    }

    fn event_kinds(&self) -> EventKinds {
        EventKinds::POINTER
    }

    fn event(&mut self, cx: &mut NodeCx<'_>, event: &Event) {
        let transition = self.interaction.pointer(event, cx.world_rect());
        if transition.changed {
            cx.request_redraw();
        }
        if transition.clicked {
            debug!(id = ?cx.id(), label = %self.label, "button clicked");
            if let Some(callback) = self.on_click.as_mut() {
                callback(cx);
            }
        }
    }

    fn update(&mut self, cx: &mut NodeCx<'_>) -> Result<(), NodeError> {
        if core::mem::take(&mut self.repaint) {
            cx.request_redraw();
        }
        Ok(())
    }

    fn paint(&mut self, cx: &mut PaintCx<'_>) -> Result<(), NodeError> {
        let state = self.state();
        let background = self.style.color_by_state("background", state)?;
        let color = self.style.color_by_state("color", state)?;
        let font = self.style.font("font")?;
        cx.fill(background);
        cx.draw_text_centered(&self.label, color, &font);
        Ok(())
    }

    fn properties(&self) -> Props {
        let mut props = self.style.to_props().with("label", self.label.as_str());
        if self.state() == State::Locked {
            props.insert("locked", true);
        }
        props
    }
}

/// A button with an on/off value that flips on every click.
///
/// While checked, colors come from `background_checked` and `color_checked`,
/// which derive from the base keys unless set explicitly.
pub struct Toggle {
    label: String,
    checked: bool,
    style: Rc<Style>,
    interaction: Interaction,
    on_toggle: Option<ToggleCallback>,
    repaint: bool,
}

impl fmt::Debug for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toggle")
            .field("label", &self.label)
            .field("checked", &self.checked)
            .field("state", &self.interaction.state())
            .finish_non_exhaustive()
    }
}

impl Toggle {
    /// Class name.
    pub const CLASS: &'static str = "Toggle";

    /// An unchecked toggle.
    #[must_use]
    pub fn new(label: impl Into<String>, checked: bool) -> Self {
        Self {
            label: label.into(),
            checked,
            style: Rc::new(Style::new()),
            interaction: Interaction::new(),
            on_toggle: None,
            repaint: false,
        }
    }

    /// Builds from constructor arguments: `label`, `checked`, and style colors.
    pub fn from_props(props: &Props) -> Result<Self, SceneError> {
        Ok(Self::new(
            props.get_str("label")?.unwrap_or_default(),
            props.get_bool("checked")?.unwrap_or(false),
        )
        .with_style(Rc::new(Style::from_props(props))))
    }

    /// Replaces the style.
    #[must_use]
    pub fn with_style(mut self, style: Rc<Style>) -> Self {
        self.style = style;
        self
    }

    /// Sets the callback run with the new value after each flip.
    #[must_use]
    pub fn on_toggle(mut self, callback: impl FnMut(&mut NodeCx<'_>, bool) + 'static) -> Self {
        self.on_toggle = Some(Box::new(callback));
        self
    }

    /// The current value.
    #[must_use]
    pub const fn checked(&self) -> bool {
        self.checked
    }

    /// Sets the value without running the callback.
    pub fn set_checked(&mut self, checked: bool) {
        self.repaint |= self.checked != checked;
        self.checked = checked;
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> State {
        self.interaction.state()
    }

    /// Locks or unlocks the toggle. Returns `true` if the state changed.
    pub fn set_locked(&mut self, locked: bool) -> bool {
        let changed = self.interaction.set_locked(locked);
        self.repaint |= changed;
        changed
    }

    fn key(&self, base: &str) -> String {
        if self.checked {
            format!("{base}_checked")
        } else {
            base.to_owned()
        }
    }
}

impl Behavior for Toggle {
    fn class_name(&self) -> &'static str {
        Self::CLASS
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::DRAWABLE
    }

    fn event_kinds(&self) -> EventKinds {
        EventKinds::POINTER
    }

    fn event(&mut self, cx: &mut NodeCx<'_>, event: &Event) {
        let transition = self.interaction.pointer(event, cx.world_rect());
        if transition.clicked {
            self.checked = !self.checked;
            debug!(id = ?cx.id(), checked = self.checked, "toggle flipped");
            if let Some(callback) = self.on_toggle.as_mut() {
                callback(cx, self.checked);
            }
        }
        if transition.changed || transition.clicked {
            cx.request_redraw();
        }
    }

    fn update(&mut self, cx: &mut NodeCx<'_>) -> Result<(), NodeError> {
        if core::mem::take(&mut self.repaint) {
            cx.request_redraw();
        }
        Ok(())
    }

    fn paint(&mut self, cx: &mut PaintCx<'_>) -> Result<(), NodeError> {
        let state = self.state();
        let background = self
            .style
            .color_by_state(&self.key("background"), state)?;
        let color = self.style.color_by_state(&self.key("color"), state)?;
        let font = self.style.font("font")?;
        cx.fill(background);
        cx.draw_text_centered(&self.label, color, &font);
        Ok(())
    }

    fn properties(&self) -> Props {
        self.style
            .to_props()
            .with("label", self.label.as_str())
            .with("checked", self.checked)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::{Button, Toggle};
    use crate::state::State;
    use crate::style::{BACKGROUND_DEFAULT, Style, modify_color};
    use arbor_scene::{
        Backend, DirtyLevel, Event, HeadlessBackend, NodeInit, PointerButton, Scene,
    };
    use kurbo::Point;

    fn pointer_down(x: f64, y: f64) -> Event {
        Event::PointerDown {
            position: Point::new(x, y),
            button: PointerButton::Primary,
        }
    }

    fn pointer_up(x: f64, y: f64) -> Event {
        Event::PointerUp {
            position: Point::new(x, y),
            button: PointerButton::Primary,
        }
    }

    #[test]
    fn click_on_release_inside_then_idle() {
        let mut scene = Scene::new(100, 100);
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        let id = scene
            .construct(
                None,
                NodeInit::at(10.0, 10.0, 40, 20),
                Button::new("Play").on_click(move |_| counter.set(counter.get() + 1)),
            )
            .unwrap();

        scene.handle_events(&[pointer_down(20.0, 15.0), pointer_up(25.0, 18.0)]);
        assert_eq!(clicks.get(), 1);
        assert_eq!(scene.behavior::<Button>(id).unwrap().state(), State::Idle);
    }

    #[test]
    fn drag_off_does_not_click() {
        let mut scene = Scene::new(100, 100);
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        let id = scene
            .construct(
                None,
                NodeInit::at(0.0, 0.0, 40, 20),
                Button::new("Quit").on_click(move |_| counter.set(counter.get() + 1)),
            )
            .unwrap();
        scene.handle_events(&[
            pointer_down(5.0, 5.0),
            Event::PointerMove {
                position: Point::new(80.0, 80.0),
            },
            pointer_up(80.0, 80.0),
        ]);
        assert_eq!(clicks.get(), 0);
        assert_eq!(scene.behavior::<Button>(id).unwrap().state(), State::Idle);
    }

    #[test]
    fn transitions_request_redraw_and_paint_by_state() {
        let mut scene = Scene::new(100, 100);
        let mut backend = HeadlessBackend::new(100, 100);
        let id = scene
            .construct(None, NodeInit::at(0.0, 0.0, 40, 20), Button::new(""))
            .unwrap();
        scene.draw(&mut backend);
        assert_eq!(scene.dirty_level(id), Some(DirtyLevel::Clean));

        scene.handle_event(&Event::PointerMove {
            position: Point::new(1.0, 1.0),
        });
        assert_eq!(scene.dirty_level(id), Some(DirtyLevel::Redraw));
        scene.draw(&mut backend);
        assert_eq!(
            backend.pixel(backend.screen(), 1, 1),
            Some(modify_color(BACKGROUND_DEFAULT, -14.4))
        );
    }

    #[test]
    fn locked_buttons_ignore_input() {
        let mut scene = Scene::new(100, 100);
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        let id = scene
            .construct(
                None,
                NodeInit::at(0.0, 0.0, 40, 20),
                Button::new("x").on_click(move |_| counter.set(counter.get() + 1)),
            )
            .unwrap();
        crate::edit_widget::<Button, _>(&mut scene, id, |b| b.set_locked(true));
        scene.handle_events(&[pointer_down(5.0, 5.0), pointer_up(5.0, 5.0)]);
        assert_eq!(clicks.get(), 0);
        assert_eq!(scene.properties(id).unwrap().get_bool("locked"), Ok(Some(true)));
    }

    #[test]
    fn setters_repaint_at_the_next_update() {
        let mut scene = Scene::new(100, 100);
        let mut backend = HeadlessBackend::new(100, 100);
        let button = scene
            .construct(None, NodeInit::at(0.0, 0.0, 40, 20), Button::new(""))
            .unwrap();
        let toggle = scene
            .construct(None, NodeInit::at(50.0, 0.0, 40, 20), Toggle::new("", false))
            .unwrap();
        scene.update();
        scene.draw(&mut backend);

        assert!(scene.behavior_mut::<Button>(button).unwrap().set_locked(true));
        scene.behavior_mut::<Toggle>(toggle).unwrap().set_checked(true);
        scene.update();
        assert_eq!(scene.dirty_level(button), Some(DirtyLevel::Redraw));
        assert_eq!(scene.dirty_level(toggle), Some(DirtyLevel::Redraw));

        scene.draw(&mut backend);
        let locked = Style::new()
            .color_by_state("background", State::Locked)
            .unwrap();
        assert_eq!(backend.pixel(backend.screen(), 1, 1), Some(locked));

        // Nothing pending: the next frame is clean.
        scene.update();
        assert_eq!(scene.dirty_level(button), Some(DirtyLevel::Clean));
    }

    #[test]
    fn toggle_flips_and_reports() {
        let mut scene = Scene::new(100, 100);
        let seen = Rc::new(Cell::new(None));
        let sink = Rc::clone(&seen);
        let id = scene
            .construct(
                None,
                NodeInit::at(0.0, 0.0, 40, 20),
                Toggle::new("Sound", false).on_toggle(move |_, v| sink.set(Some(v))),
            )
            .unwrap();
        scene.handle_events(&[pointer_down(5.0, 5.0), pointer_up(5.0, 5.0)]);
        assert_eq!(seen.get(), Some(true));
        assert!(scene.behavior::<Toggle>(id).unwrap().checked());
        scene.handle_events(&[pointer_down(5.0, 5.0), pointer_up(5.0, 5.0)]);
        assert_eq!(seen.get(), Some(false));
    }

    #[test]
    fn checked_toggles_use_the_checked_background() {
        let mut scene = Scene::new(50, 50);
        let mut backend = HeadlessBackend::new(50, 50);
        scene
            .construct(None, NodeInit::at(0.0, 0.0, 10, 10), Toggle::new("", true))
            .unwrap();
        scene.draw(&mut backend);
        assert_eq!(
            backend.pixel(backend.screen(), 2, 2),
            Some(modify_color(BACKGROUND_DEFAULT, -20.0))
        );
    }
}
