// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Press tracking: pairing a button release with the press that started it.
//!
//! A press starts on pointer down and ends on the matching release. The
//! tracker records where it started and whether the pointer has since moved
//! far enough to count as a drag, so widgets can tell clicks from drags:
//!
//! ```
//! use arbor_scene::PointerButton;
//! use arbor_widgets::{PressResult, PressTracker};
//! use kurbo::Point;
//!
//! let mut press = PressTracker::with_drag_threshold(Some(4.0));
//! press.on_down(PointerButton::Primary, Point::new(10.0, 10.0));
//! assert!(!press.on_move(Point::new(12.0, 10.0)));
//! assert!(press.on_move(Point::new(20.0, 10.0)), "threshold newly exceeded");
//!
//! // Released inside the widget, but after a drag.
//! let result = press.on_up(PointerButton::Primary, true);
//! assert_eq!(result, PressResult::Suppressed);
//! ```

use arbor_scene::PointerButton;
use kurbo::Point;

/// An active press.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Press {
    /// Button that was pressed.
    pub button: PointerButton,
    /// Pointer position at press time.
    pub down_position: Point,
    /// Latest pointer position while pressed.
    pub position: Point,
    /// `true` once the pointer moved past the drag threshold.
    pub dragged: bool,
}

/// What a release did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressResult {
    /// The release completes a click.
    Click,
    /// The release ended a press without a click.
    Suppressed,
    /// There was no matching press.
    NoPress,
}

/// Tracks one pointer's press from down to up.
#[derive(Clone, Debug, Default)]
pub struct PressTracker {
    press: Option<Press>,
    /// Distance after which a press becomes a drag and can no longer click.
    /// `None` never turns a press into a drag.
    pub drag_threshold: Option<f64>,
}

impl PressTracker {
    /// A tracker without a drag threshold: any release inside clicks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A tracker with the given drag threshold.
    #[must_use]
    pub fn with_drag_threshold(drag_threshold: Option<f64>) -> Self {
        Self {
            press: None,
            drag_threshold,
        }
    }

    /// Starts a press, replacing any active one.
    pub fn on_down(&mut self, button: PointerButton, position: Point) {
        self.press = Some(Press {
            button,
            down_position: position,
            position,
            dragged: false,
        });
    }

    /// Follows the pointer. Returns `true` if the press just became a drag.
    pub fn on_move(&mut self, position: Point) -> bool {
        let Some(press) = self.press.as_mut() else {
            return false;
        };
        press.position = position;
        if press.dragged {
            return false;
        }
        let exceeded = self
            .drag_threshold
            .is_some_and(|t| press.down_position.distance(position) > t);
        press.dragged = exceeded;
        exceeded
    }

    /// Ends the press on a release of `button`.
    ///
    /// A click needs the same button, a release `inside` the widget and no drag.
    /// Releases of other buttons leave the press active.
    pub fn on_up(&mut self, button: PointerButton, inside: bool) -> PressResult {
        match self.press {
            Some(press) if press.button == button => {
                self.press = None;
                if inside && !press.dragged {
                    PressResult::Click
                } else {
                    PressResult::Suppressed
                }
            }
            _ => PressResult::NoPress,
        }
    }

    /// Drops the active press. Returns `true` if there was one.
    pub fn cancel(&mut self) -> bool {
        self.press.take().is_some()
    }

    /// Returns `true` while a press is active.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// The active press.
    #[must_use]
    pub fn press(&self) -> Option<&Press> {
        self.press.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::{PressResult, PressTracker};
    use arbor_scene::PointerButton;
    use kurbo::Point;

    #[test]
    fn release_inside_clicks_once() {
        let mut press = PressTracker::new();
        press.on_down(PointerButton::Primary, Point::new(1.0, 1.0));
        assert!(!press.on_move(Point::new(500.0, 500.0)));
        assert_eq!(press.on_up(PointerButton::Primary, true), PressResult::Click);
        assert_eq!(press.on_up(PointerButton::Primary, true), PressResult::NoPress);
    }

    #[test]
    fn release_outside_or_other_button_does_not_click() {
        let mut press = PressTracker::new();
        press.on_down(PointerButton::Primary, Point::ZERO);
        assert_eq!(
            press.on_up(PointerButton::Secondary, true),
            PressResult::NoPress
        );
        assert!(press.is_pressed());
        assert_eq!(
            press.on_up(PointerButton::Primary, false),
            PressResult::Suppressed
        );
        assert!(!press.is_pressed());
    }

    #[test]
    fn drags_report_once_and_keep_the_latest_position() {
        let mut press = PressTracker::with_drag_threshold(Some(5.0));
        press.on_down(PointerButton::Primary, Point::ZERO);
        assert!(press.on_move(Point::new(6.0, 0.0)));
        assert!(!press.on_move(Point::new(9.0, 0.0)));
        assert_eq!(press.press().map(|p| p.position), Some(Point::new(9.0, 0.0)));
        assert!(press.cancel());
        assert!(!press.cancel());
    }
}
