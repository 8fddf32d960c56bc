// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interaction state shared by the pointer-driven widgets.

use arbor_scene::{Event, PixelRect, PointerButton};

use crate::press::{PressResult, PressTracker};

/// Visual state of an interactive widget.
///
/// `Idle → Hovered → Selected → Idle`, with `Locked` reachable from any state
/// and left only through an explicit unlock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum State {
    /// Not interacted with.
    #[default]
    Idle,
    /// The pointer is over the widget.
    Hovered,
    /// Pressed, or focused for text entry.
    Selected,
    /// Ignores input until unlocked.
    Locked,
}

impl State {
    /// Style key suffix for this state: `""`, `"_hovered"`, `"_selected"` or `"_locked"`.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Hovered => "_hovered",
            Self::Selected => "_selected",
            Self::Locked => "_locked",
        }
    }
}

/// What one pointer event did to an [`Interaction`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Transition {
    /// The state changed; the widget must repaint.
    pub changed: bool,
    /// A click completed.
    pub clicked: bool,
}

/// Pointer state machine for button-like widgets.
///
/// Pressing the primary button inside selects; releasing it while selected
/// clicks if the pointer is still inside, and returns to idle either way.
/// Motion hovers and unhovers an idle widget. A selected widget stays selected
/// while the pointer wanders off, until the release.
#[derive(Clone, Debug, Default)]
pub struct Interaction {
    state: State,
    press: PressTracker,
}

impl Interaction {
    /// An idle interaction.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    /// Locks or unlocks. Returns `true` if the state changed.
    ///
    /// Locking drops any active press; unlocking returns to idle.
    pub fn set_locked(&mut self, locked: bool) -> bool {
        let next = match (locked, self.state) {
            (true, State::Locked) | (false, State::Idle | State::Hovered | State::Selected) => {
                return false;
            }
            (true, _) => State::Locked,
            (false, State::Locked) => State::Idle,
        };
        self.press.cancel();
        self.state = next;
        true
    }

    /// Feeds one pointer event, with `rect` the widget's world rectangle.
    pub fn pointer(&mut self, event: &Event, rect: PixelRect) -> Transition {
        if self.state == State::Locked {
            return Transition::default();
        }
        let Some(position) = event.position() else {
            return Transition::default();
        };
        let inside = rect.contains(position);
        let last = self.state;
        let mut clicked = false;

        match *event {
            Event::PointerDown {
                button: PointerButton::Primary,
                ..
            } if inside => {
                self.press.on_down(PointerButton::Primary, position);
                self.state = State::Selected;
            }
            Event::PointerUp { button, .. } if self.state == State::Selected => {
                match self.press.on_up(button, inside) {
                    PressResult::Click => {
                        clicked = true;
                        self.state = State::Idle;
                    }
                    PressResult::Suppressed => self.state = State::Idle,
                    PressResult::NoPress => {}
                }
            }
            Event::PointerMove { .. } => {
                self.press.on_move(position);
                if inside && self.state == State::Idle {
                    self.state = State::Hovered;
                } else if !inside && self.state == State::Hovered {
                    self.state = State::Idle;
                }
            }
            _ => {}
        }

        Transition {
            changed: last != self.state,
            clicked,
        }
    }
}
