// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-line text entry.

use core::fmt;
use std::rc::Rc;

use arbor_scene::{
    Behavior, Capabilities, Event, EventKinds, Key, KeyInput, Modifiers, NodeCx, NodeError,
    PaintCx, PointerButton, Props, SceneError,
};
use tracing::{debug, trace};

use crate::state::State;
use crate::style::Style;

/// Called with the buffer and the key that completed the entry.
pub type CompleteCallback = Box<dyn FnMut(&mut NodeCx<'_>, &str, Key)>;

/// Called with the buffer after every accepted edit.
pub type EditCallback = Box<dyn FnMut(&mut NodeCx<'_>, &str)>;

/// Horizontal inset of the text.
const TEXT_INSET: i32 = 4;

/// A focusable one-line text buffer.
///
/// Pressing inside selects the entry, pressing outside deselects it. While
/// selected, typed characters are appended if the allow-list (when set)
/// accepts them, `Backspace` removes the last character, `Ctrl+Backspace`
/// clears the buffer, and `Enter`, `Escape` or `Tab` run the completion
/// callback and return to idle. The edit callback runs only when the buffer
/// actually changed.
pub struct TextEntry {
    text: String,
    allowed: Option<String>,
    state: State,
    style: Rc<Style>,
    on_complete: Option<CompleteCallback>,
    on_edit: Option<EditCallback>,
    repaint: bool,
}

impl fmt::Debug for TextEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextEntry")
            .field("text", &self.text)
            .field("allowed", &self.allowed)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl TextEntry {
    /// Class name.
    pub const CLASS: &'static str = "TextEntry";

    /// An idle entry holding `text`.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            allowed: None,
            state: State::Idle,
            style: Rc::new(Style::new()),
            on_complete: None,
            on_edit: None,
            repaint: false,
        }
    }

    /// Builds from constructor arguments: `text`, `allowed`, and style colors.
    pub fn from_props(props: &Props) -> Result<Self, SceneError> {
        let mut entry = Self::new(props.get_str("text")?.unwrap_or_default())
            .with_style(Rc::new(Style::from_props(props)));
        entry.allowed = props.get_str("allowed")?.map(str::to_owned);
        Ok(entry)
    }

    /// Replaces the style.
    #[must_use]
    pub fn with_style(mut self, style: Rc<Style>) -> Self {
        self.style = style;
        self
    }

    /// Only accept characters contained in `allowed`.
    #[must_use]
    pub fn with_allowed(mut self, allowed: impl Into<String>) -> Self {
        self.allowed = Some(allowed.into());
        self
    }

    /// Sets the completion callback.
    #[must_use]
    pub fn on_complete(
        mut self,
        callback: impl FnMut(&mut NodeCx<'_>, &str, Key) + 'static,
    ) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Sets the per-edit callback.
    #[must_use]
    pub fn on_edit(mut self, callback: impl FnMut(&mut NodeCx<'_>, &str) + 'static) -> Self {
        self.on_edit = Some(Box::new(callback));
        self
    }

    /// The buffer.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the buffer without running callbacks.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.repaint = true;
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    /// Locks or unlocks the entry. Returns `true` if the state changed.
    pub fn set_locked(&mut self, locked: bool) -> bool {
        let next = match (locked, self.state) {
            (true, State::Locked) => return false,
            (true, _) => State::Locked,
            (false, State::Locked) => State::Idle,
            (false, _) => return false,
        };
        self.state = next;
        self.repaint = true;
        true
    }

    /// Returns `true` if `c` may be typed.
    #[must_use]
    pub fn accepts(&self, c: char) -> bool {
        !c.is_control() && self.allowed.as_ref().is_none_or(|a| a.contains(c))
    }

    fn pointer(&mut self, cx: &mut NodeCx<'_>, event: &Event) -> bool {
        let Some(position) = event.position() else {
            return false;
        };
        let inside = cx.contains(position);
        let last = self.state;
        match *event {
            Event::PointerDown {
                button: PointerButton::Primary,
                ..
            } => {
                self.state = if inside { State::Selected } else { State::Idle };
            }
            Event::PointerMove { .. } => {
                if inside && self.state == State::Idle {
                    self.state = State::Hovered;
                } else if !inside && self.state == State::Hovered {
                    self.state = State::Idle;
                }
            }
            _ => {}
        }
        last != self.state
    }

    fn key(&mut self, cx: &mut NodeCx<'_>, input: &KeyInput) -> bool {
        if self.state != State::Selected {
            return false;
        }
        match input.key {
            Key::Enter | Key::Escape | Key::Tab => {
                self.state = State::Idle;
                debug!(id = ?cx.id(), key = ?input.key, "text entry completed");
                if let Some(callback) = self.on_complete.as_mut() {
                    callback(cx, &self.text, input.key);
                }
                return true;
            }
            Key::Backspace if input.modifiers.contains(Modifiers::CTRL) => {
                if self.text.is_empty() {
                    return false;
                }
                self.text.clear();
            }
            Key::Backspace => {
                if self.text.pop().is_none() {
                    return false;
                }
            }
            _ => {
                let Some(typed) = input.text.as_deref().filter(|t| !t.is_empty()) else {
                    return false;
                };
                if let Some(rejected) = typed.chars().find(|&c| !self.accepts(c)) {
                    trace!(id = ?cx.id(), ?rejected, "text entry rejected keystroke");
                    return false;
                }
                self.text.push_str(typed);
            }
        }
        if let Some(callback) = self.on_edit.as_mut() {
            callback(cx, &self.text);
        }
        true
    }
}

impl Behavior for TextEntry {
    fn class_name(&self) -> &'static str {
        Self::CLASS
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::DRAWABLE
    }

    fn event_kinds(&self) -> EventKinds {
        EventKinds::POINTER_MOVE | EventKinds::POINTER_DOWN | EventKinds::KEY_DOWN
    }

    fn event(&mut self, cx: &mut NodeCx<'_>, event: &Event) {
        if self.state == State::Locked {
            return;
        }
        let changed = match event {
            Event::KeyDown(input) => self.key(cx, input),
            _ => self.pointer(cx, event),
        };
        if changed {
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
        let background = self.style.color_by_state("background", self.state)?;
        let color = self.style.color_by_state("color", self.state)?;
        let font = self.style.font("font")?;
        cx.fill(background);

        let (_, height) = cx.size();
        let (text_width, text_height) = cx.measure_text(&self.text, &font);
        let y = (i64::from(height) - i64::from(text_height)) / 2;
        let y = i32::try_from(y).unwrap_or(0);
        cx.draw_text(&self.text, (TEXT_INSET, y), color, &font);
        if self.state == State::Selected {
            let x = TEXT_INSET.saturating_add(i32::try_from(text_width).unwrap_or(i32::MAX));
            cx.draw_text("|", (x, y), color, &font);
        }
        Ok(())
    }

    fn properties(&self) -> Props {
        let mut props = self.style.to_props().with("text", self.text.as_str());
        if let Some(allowed) = &self.allowed {
            props.insert("allowed", allowed.as_str());
        }
        props
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::TextEntry;
    use crate::state::State;
    use arbor_scene::{
        DirtyLevel, Event, HeadlessBackend, Key, KeyInput, Modifiers, NodeId, NodeInit,
        PointerButton, Scene,
    };
    use kurbo::Point;

    fn press(x: f64, y: f64) -> Event {
        Event::PointerDown {
            position: Point::new(x, y),
            button: PointerButton::Primary,
        }
    }

    fn typed(s: &str) -> Vec<Event> {
        s.chars()
            .map(|c| Event::KeyDown(KeyInput::character(c)))
            .collect()
    }

    fn entry(scene: &mut Scene, widget: TextEntry) -> NodeId {
        scene
            .construct(None, NodeInit::at(0.0, 0.0, 100, 20), widget)
            .unwrap()
    }

    fn text(scene: &Scene, id: NodeId) -> String {
        scene.behavior::<TextEntry>(id).unwrap().text().to_owned()
    }

    #[test]
    fn keys_are_ignored_until_selected() {
        let mut scene = Scene::new(200, 200);
        let id = entry(&mut scene, TextEntry::new(""));
        scene.handle_events(&typed("ab"));
        assert_eq!(text(&scene, id), "");

        scene.handle_event(&press(5.0, 5.0));
        assert_eq!(scene.behavior::<TextEntry>(id).unwrap().state(), State::Selected);
        scene.handle_events(&typed("ab"));
        assert_eq!(text(&scene, id), "ab");

        scene.handle_event(&press(150.0, 150.0));
        assert_eq!(scene.behavior::<TextEntry>(id).unwrap().state(), State::Idle);
    }

    #[test]
    fn allow_list_filters_keystrokes() {
        let mut scene = Scene::new(200, 200);
        let id = entry(&mut scene, TextEntry::new("").with_allowed("0123456789"));
        scene.handle_event(&press(5.0, 5.0));
        scene.handle_events(&typed("1a2"));
        assert_eq!(text(&scene, id), "12");
    }

    #[test]
    fn backspace_and_ctrl_backspace() {
        let mut scene = Scene::new(200, 200);
        let id = entry(&mut scene, TextEntry::new("hello"));
        scene.handle_event(&press(5.0, 5.0));
        scene.handle_event(&Event::KeyDown(KeyInput::new(Key::Backspace)));
        assert_eq!(text(&scene, id), "hell");
        scene.handle_event(&Event::KeyDown(
            KeyInput::new(Key::Backspace).with_modifiers(Modifiers::CTRL),
        ));
        assert_eq!(text(&scene, id), "");
    }

    #[test]
    fn erasing_an_empty_buffer_is_not_an_edit() {
        let mut scene = Scene::new(200, 200);
        let edits = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&edits);
        let id = entry(
            &mut scene,
            TextEntry::new("").on_edit(move |_, _| *sink.borrow_mut() += 1),
        );
        scene.handle_event(&press(5.0, 5.0));
        scene.handle_event(&Event::KeyDown(
            KeyInput::new(Key::Backspace).with_modifiers(Modifiers::CTRL),
        ));
        scene.handle_event(&Event::KeyDown(KeyInput::new(Key::Backspace)));
        assert_eq!(*edits.borrow(), 0);

        scene.handle_events(&typed("a"));
        scene.handle_event(&Event::KeyDown(
            KeyInput::new(Key::Backspace).with_modifiers(Modifiers::CTRL),
        ));
        assert_eq!(*edits.borrow(), 2);
        assert_eq!(text(&scene, id), "");
    }

    #[test]
    fn locking_repaints_at_the_next_update() {
        let mut scene = Scene::new(200, 200);
        let mut backend = HeadlessBackend::new(200, 200);
        let id = entry(&mut scene, TextEntry::new("x"));
        scene.update();
        scene.draw(&mut backend);

        assert!(scene.behavior_mut::<TextEntry>(id).unwrap().set_locked(true));
        scene.update();
        assert_eq!(scene.dirty_level(id), Some(DirtyLevel::Redraw));
        scene.handle_event(&press(5.0, 5.0));
        assert_eq!(scene.behavior::<TextEntry>(id).unwrap().state(), State::Locked);
    }

    #[test]
    fn completion_keys_report_and_deselect() {
        let mut scene = Scene::new(200, 200);
        let done = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&done);
        let edits = Rc::new(RefCell::new(0));
        let edit_sink = Rc::clone(&edits);
        let id = entry(
            &mut scene,
            TextEntry::new("")
                .on_complete(move |_, text, key| sink.borrow_mut().push((text.to_owned(), key)))
                .on_edit(move |_, _| *edit_sink.borrow_mut() += 1),
        );
        scene.handle_event(&press(5.0, 5.0));
        scene.handle_events(&typed("hi"));
        scene.handle_event(&Event::KeyDown(KeyInput::new(Key::Enter)));
        assert_eq!(*done.borrow(), [("hi".to_owned(), Key::Enter)]);
        assert_eq!(*edits.borrow(), 2);
        assert_eq!(scene.behavior::<TextEntry>(id).unwrap().state(), State::Idle);

        // Further keys go nowhere until selected again.
        scene.handle_event(&Event::KeyDown(KeyInput::new(Key::Tab)));
        assert_eq!(done.borrow().len(), 1);
    }

    #[test]
    fn properties_round_trip_through_the_class_registry() {
        let mut scene = Scene::new(200, 200);
        crate::register_builtin(scene.classes_mut());
        let id = entry(&mut scene, TextEntry::new("42").with_allowed("0123456789"));
        let props = scene.properties(id).unwrap();
        let copy = scene
            .construct_class(TextEntry::CLASS, None, NodeInit::default(), &props)
            .unwrap();
        let copy = scene.behavior::<TextEntry>(copy).unwrap();
        assert_eq!(copy.text(), "42");
        assert!(!copy.accepts('x'));
    }
}
