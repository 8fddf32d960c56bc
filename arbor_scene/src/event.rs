// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoded input events and the kinds nodes subscribe to.

use kurbo::{Point, Vec2};

/// Pointer button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Usually the left mouse button or a touch contact.
    Primary,
    /// Usually the right mouse button.
    Secondary,
    /// Usually the wheel button.
    Middle,
    /// Any other button, by backend number.
    Other(u8),
}

bitflags::bitflags! {
    /// Keyboard modifiers held during a key event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Control.
        const CTRL  = 0b0000_0001;
        /// Shift.
        const SHIFT = 0b0000_0010;
        /// Alt / Option.
        const ALT   = 0b0000_0100;
    }
}

/// Logical key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// Tab.
    Tab,
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// A key producing a character.
    Character(char),
    /// Anything else.
    Other,
}

/// A key press or release.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyInput {
    /// The logical key.
    pub key: Key,
    /// Text the key produced, if any.
    pub text: Option<String>,
    /// Modifiers held.
    pub modifiers: Modifiers,
}

impl KeyInput {
    /// A key without text or modifiers.
    #[must_use]
    pub fn new(key: Key) -> Self {
        Self {
            key,
            text: None,
            modifiers: Modifiers::empty(),
        }
    }

    /// A character key that also produces that character as text.
    #[must_use]
    pub fn character(c: char) -> Self {
        Self {
            key: Key::Character(c),
            text: Some(c.to_string()),
            modifiers: Modifiers::empty(),
        }
    }

    /// Adds modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }
}

/// An already-decoded input event.
///
/// Pointer positions are in the scene's root coordinate space.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The pointer moved.
    PointerMove {
        /// New position.
        position: Point,
    },
    /// A button was pressed.
    PointerDown {
        /// Pointer position.
        position: Point,
        /// Which button.
        button: PointerButton,
    },
    /// A button was released.
    PointerUp {
        /// Pointer position.
        position: Point,
        /// Which button.
        button: PointerButton,
    },
    /// Scroll wheel or trackpad scroll. Positive `delta.y` scrolls content up
    /// (towards later items).
    Wheel {
        /// Pointer position.
        position: Point,
        /// Scroll amount in pixels.
        delta: Vec2,
    },
    /// A key was pressed.
    KeyDown(KeyInput),
    /// A key was released.
    KeyUp(KeyInput),
    /// The display was resized.
    Resize {
        /// New width.
        width: u32,
        /// New height.
        height: u32,
    },
    /// The display contents were lost (e.g. restore from minimize).
    Expose,
}

impl Event {
    /// The kind used to route this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::PointerMove { .. } => EventKind::PointerMove,
            Self::PointerDown { .. } => EventKind::PointerDown,
            Self::PointerUp { .. } => EventKind::PointerUp,
            Self::Wheel { .. } => EventKind::Wheel,
            Self::KeyDown(_) => EventKind::KeyDown,
            Self::KeyUp(_) => EventKind::KeyUp,
            Self::Resize { .. } => EventKind::Resize,
            Self::Expose => EventKind::Expose,
        }
    }

    /// Pointer position for pointer and wheel events.
    #[must_use]
    pub const fn position(&self) -> Option<Point> {
        match self {
            Self::PointerMove { position }
            | Self::PointerDown { position, .. }
            | Self::PointerUp { position, .. }
            | Self::Wheel { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// One routing category of [`Event`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// [`Event::PointerMove`].
    PointerMove,
    /// [`Event::PointerDown`].
    PointerDown,
    /// [`Event::PointerUp`].
    PointerUp,
    /// [`Event::Wheel`].
    Wheel,
    /// [`Event::KeyDown`].
    KeyDown,
    /// [`Event::KeyUp`].
    KeyUp,
    /// [`Event::Resize`].
    Resize,
    /// [`Event::Expose`].
    Expose,
}

impl EventKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::PointerMove,
        Self::PointerDown,
        Self::PointerUp,
        Self::Wheel,
        Self::KeyDown,
        Self::KeyUp,
        Self::Resize,
        Self::Expose,
    ];

    /// The single-bit set for this kind.
    #[must_use]
    pub const fn as_flag(self) -> EventKinds {
        match self {
            Self::PointerMove => EventKinds::POINTER_MOVE,
            Self::PointerDown => EventKinds::POINTER_DOWN,
            Self::PointerUp => EventKinds::POINTER_UP,
            Self::Wheel => EventKinds::WHEEL,
            Self::KeyDown => EventKinds::KEY_DOWN,
            Self::KeyUp => EventKinds::KEY_UP,
            Self::Resize => EventKinds::RESIZE,
            Self::Expose => EventKinds::EXPOSE,
        }
    }
}

bitflags::bitflags! {
    /// The set of event kinds a node wants delivered.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EventKinds: u8 {
        /// Pointer motion.
        const POINTER_MOVE = 1 << 0;
        /// Button press.
        const POINTER_DOWN = 1 << 1;
        /// Button release.
        const POINTER_UP   = 1 << 2;
        /// Wheel scrolling.
        const WHEEL        = 1 << 3;
        /// Key press.
        const KEY_DOWN     = 1 << 4;
        /// Key release.
        const KEY_UP       = 1 << 5;
        /// Display resize.
        const RESIZE       = 1 << 6;
        /// Display expose.
        const EXPOSE       = 1 << 7;

        /// Motion, press and release.
        const POINTER = Self::POINTER_MOVE.bits() | Self::POINTER_DOWN.bits() | Self::POINTER_UP.bits();
    }
}

impl EventKinds {
    /// Iterates the individual kinds in this set.
    pub fn kinds(self) -> impl Iterator<Item = EventKind> {
        EventKind::ALL
            .into_iter()
            .filter(move |k| self.contains(k.as_flag()))
    }
}

#[cfg(test)]
mod tests {
    use super::{Event, EventKind, EventKinds};
    use kurbo::Point;

    #[test]
    fn kinds_iterate_in_declaration_order() {
        let kinds: Vec<_> = (EventKinds::POINTER | EventKinds::KEY_DOWN).kinds().collect();
        assert_eq!(
            kinds,
            [
                EventKind::PointerMove,
                EventKind::PointerDown,
                EventKind::PointerUp,
                EventKind::KeyDown
            ]
        );
    }

    #[test]
    fn pointer_events_carry_positions() {
        let e = Event::PointerMove {
            position: Point::new(1.0, 2.0),
        };
        assert_eq!(e.kind(), EventKind::PointerMove);
        assert_eq!(e.position(), Some(Point::new(1.0, 2.0)));
        assert_eq!(Event::Expose.position(), None);
    }
}
