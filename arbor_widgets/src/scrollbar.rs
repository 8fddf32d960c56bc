// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A vertical scrollbar attached to a list.

use std::rc::Rc;

use arbor_list::Thumb;
use arbor_scene::{
    Behavior, Capabilities, Event, EventKinds, NodeCx, NodeError, NodeId, NodeInit, PaintCx,
    PixelRect, PointerButton, Props, Scene, SceneError, Transform,
};
use kurbo::Point;
use tracing::debug;

use crate::state::State;
use crate::style::Style;

/// Width used when the style does not set `width`.
pub const DEFAULT_SCROLLBAR_WIDTH: f64 = 6.0;

/// Grab margin used when the style does not set `margin`.
pub const DEFAULT_SCROLLBAR_MARGIN: f64 = 4.0;

/// A thumb on a track along the right edge of its parent list.
///
/// The bar is a transient child of the list: it is skipped by the list layout
/// and by record saving. The list pushes thumb geometry and the locked state
/// to it after every relayout.
///
/// Wheel events over the bar (within the grab margin) or over the list scroll
/// the list. Pressing within the margin jumps the thumb's center to the
/// pointer, and dragging keeps it there.
#[derive(Debug)]
pub struct Scrollbar {
    style: Rc<Style>,
    thumb: Thumb,
    locked: bool,
    dragging: bool,
}

impl Default for Scrollbar {
    fn default() -> Self {
        Self::new()
    }
}

impl Scrollbar {
    /// Class name.
    pub const CLASS: &'static str = "Scrollbar";

    /// A bar with the default style.
    #[must_use]
    pub fn new() -> Self {
        Self {
            style: Rc::new(Style::new()),
            thumb: Thumb {
                offset: 0.0,
                extent: 0.0,
            },
            locked: true,
            dragging: false,
        }
    }

    /// Replaces the style. `width` and `margin` are read from it.
    #[must_use]
    pub fn with_style(mut self, style: Rc<Style>) -> Self {
        self.style = style;
        self
    }

    /// Track width in pixels.
    #[must_use]
    pub fn width(&self) -> i32 {
        px(self.style.number_or("width", DEFAULT_SCROLLBAR_WIDTH))
    }

    /// Distance around the bar that still grabs pointer input.
    #[must_use]
    pub fn margin(&self) -> f64 {
        self.style.number_or("margin", DEFAULT_SCROLLBAR_MARGIN)
    }

    /// Current thumb geometry.
    #[must_use]
    pub const fn thumb(&self) -> Thumb {
        self.thumb
    }

    /// Returns `true` when the list's content fits and the bar is inert.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Constructs the bar as a transient child along the right edge of `list`
    /// and attaches it.
    pub fn attach(self, scene: &mut Scene, list: NodeId) -> Result<NodeId, SceneError> {
        let (width, height) = scene
            .transform(list)
            .map(Transform::size)
            .ok_or(SceneError::StaleParent(list))?;
        let transform = Transform::new(f64::from(width), 0.0, self.width(), height)
            .with_anchor(1.0, 0.0);
        let bar = scene.construct(Some(list), NodeInit::new(transform).transient(), self)?;
        let attached = scene.with_scrollable(list, |l, scene| {
            l.set_scrollbar(Some(bar));
            l.relayout(scene, list);
        });
        if attached.is_none() {
            scene.remove(bar);
            return Err(SceneError::InvalidArgument {
                name: "parent".to_owned(),
                reason: "a scrollbar needs a scrollable list parent".to_owned(),
            });
        }
        debug!(?list, ?bar, "scrollbar attached");
        Ok(bar)
    }

    /// Takes new geometry from the list. Returns `true` if anything changed.
    pub fn sync(&mut self, thumb: Thumb, locked: bool) -> bool {
        if self.thumb == thumb && self.locked == locked {
            return false;
        }
        self.thumb = thumb;
        self.locked = locked;
        if locked {
            self.dragging = false;
        }
        true
    }

    fn state(&self) -> State {
        if self.locked {
            State::Locked
        } else if self.dragging {
            State::Selected
        } else {
            State::Idle
        }
    }

    fn grabs(&self, rect: PixelRect, position: Point) -> bool {
        let margin = self.margin();
        rect.to_rect().inflate(margin, margin).contains(position)
    }
}

impl Behavior for Scrollbar {
    fn class_name(&self) -> &'static str {
        Self::CLASS
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::DRAWABLE
    }

    fn event_kinds(&self) -> EventKinds {
        EventKinds::WHEEL | EventKinds::POINTER
    }

    fn event(&mut self, cx: &mut NodeCx<'_>, event: &Event) {
        let Some(list) = cx.scene().parent_of(cx.id()) else {
            return;
        };
        let own = cx.world_rect();
        let list_rect = cx.scene().world_rect(list).unwrap_or_default();
        let was_dragging = self.dragging;

        let outcome = match *event {
            Event::Wheel { position, delta }
                if self.grabs(own, position) || list_rect.contains(position) =>
            {
                cx.scene_mut().with_scrollable(list, |l, scene| {
                    l.scroll_by(scene, list, delta.y);
                    (l.thumb(), l.is_locked())
                })
            }
            Event::PointerDown {
                position,
                button: PointerButton::Primary,
            } if !self.locked && self.grabs(own, position) => {
                self.dragging = true;
                jump(cx.scene_mut(), list, position.y - f64::from(own.y))
            }
            Event::PointerMove { position } if self.dragging => {
                jump(cx.scene_mut(), list, position.y - f64::from(own.y))
            }
            Event::PointerUp { .. } => {
                self.dragging = false;
                None
            }
            _ => None,
        };

        let synced = outcome.is_some_and(|(thumb, locked)| self.sync(thumb, locked));
        if synced || was_dragging != self.dragging {
            cx.request_redraw();
        }
    }

    fn paint(&mut self, cx: &mut PaintCx<'_>) -> Result<(), NodeError> {
        let state = self.state();
        cx.fill(self.style.color_by_state("background", state)?);
        let (width, _) = cx.size();
        let top = px(self.thumb.offset.floor());
        let bottom = px((self.thumb.offset + self.thumb.extent).ceil());
        let thumb = PixelRect::new(0, top, i32::try_from(width).unwrap_or(0), bottom - top);
        cx.fill_rect(thumb, self.style.color_by_state("color", state)?);
        Ok(())
    }

    fn properties(&self) -> Props {
        self.style.to_props()
    }
}

fn jump(scene: &mut Scene, list: NodeId, position: f64) -> Option<(Thumb, bool)> {
    scene.with_scrollable(list, |l, scene| {
        l.scroll_thumb_to(scene, list, position);
        (l.thumb(), l.is_locked())
    })
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Scrollbar geometry is small and already rounded."
)]
fn px(v: f64) -> i32 {
    v.round() as i32
}

#[cfg(test)]
mod tests {
    use super::Scrollbar;
    use crate::list::GridList;
    use arbor_scene::{
        Color, Event, NodeId, NodeInit, PixelRect, PointerButton, Scene, SpriteNode,
    };
    use kurbo::{Point, Vec2};

    fn list_with_bar(scene: &mut Scene, tiles: usize) -> (NodeId, NodeId) {
        let list = scene
            .construct(None, NodeInit::at(0.0, 0.0, 100, 100), GridList::grid(100, 20))
            .unwrap();
        for _ in 0..tiles {
            scene
                .construct(Some(list), NodeInit::default(), SpriteNode::new(Color::WHITE))
                .unwrap();
        }
        let bar = Scrollbar::new().attach(scene, list).unwrap();
        scene.update();
        (list, bar)
    }

    fn offset(scene: &mut Scene, list: NodeId) -> f64 {
        scene.with_scrollable(list, |l, _| l.scroll_offset()).unwrap()
    }

    #[test]
    fn bar_sits_on_the_right_edge_and_last() {
        let mut scene = Scene::new(200, 200);
        let (list, bar) = list_with_bar(&mut scene, 10);
        assert_eq!(scene.world_rect(bar), Some(PixelRect::new(94, 0, 6, 100)));
        assert!(scene.is_transient(bar));

        scene
            .construct(Some(list), NodeInit::default(), SpriteNode::new(Color::WHITE))
            .unwrap();
        scene.update();
        assert_eq!(scene.children(list).last(), Some(&bar));
        assert!(scene.is_visible(bar));
    }

    #[test]
    fn thumb_reflects_the_scroll_position() {
        let mut scene = Scene::new(200, 200);
        let (list, bar) = list_with_bar(&mut scene, 10);
        // 200 pixels of content in a 100 pixel viewport.
        let thumb = scene.behavior::<Scrollbar>(bar).unwrap().thumb();
        assert_eq!((thumb.offset, thumb.extent), (0.0, 50.0));

        crate::list::scroll_by(&mut scene, list, 60.0);
        let thumb = scene.behavior::<Scrollbar>(bar).unwrap().thumb();
        assert_eq!((thumb.offset, thumb.extent), (30.0, 50.0));
    }

    #[test]
    fn wheel_over_the_list_scrolls_once() {
        let mut scene = Scene::new(200, 200);
        let (list, bar) = list_with_bar(&mut scene, 10);
        scene.handle_event(&Event::Wheel {
            position: Point::new(10.0, 10.0),
            delta: Vec2::new(0.0, 20.0),
        });
        assert_eq!(offset(&mut scene, list), 20.0);
        assert_eq!(scene.behavior::<Scrollbar>(bar).unwrap().thumb().offset, 10.0);
    }

    #[test]
    fn dragging_moves_the_thumb_center() {
        let mut scene = Scene::new(200, 200);
        let (list, bar) = list_with_bar(&mut scene, 10);
        scene.handle_event(&Event::PointerDown {
            position: Point::new(97.0, 75.0),
            button: PointerButton::Primary,
        });
        // Center at 75 puts the 50 pixel thumb at 50, the end of the track.
        assert_eq!(offset(&mut scene, list), 100.0);

        scene.handle_event(&Event::PointerMove {
            position: Point::new(150.0, 45.0),
        });
        assert_eq!(offset(&mut scene, list), 40.0);

        scene.handle_event(&Event::PointerUp {
            position: Point::new(150.0, 45.0),
            button: PointerButton::Primary,
        });
        scene.handle_event(&Event::PointerMove {
            position: Point::new(150.0, 25.0),
        });
        assert_eq!(offset(&mut scene, list), 40.0);
        assert!(!scene.behavior::<Scrollbar>(bar).unwrap().is_locked());
    }

    #[test]
    fn fitting_content_locks_the_bar() {
        let mut scene = Scene::new(200, 200);
        let (list, bar) = list_with_bar(&mut scene, 3);
        assert!(scene.behavior::<Scrollbar>(bar).unwrap().is_locked());
        scene.handle_event(&Event::PointerDown {
            position: Point::new(97.0, 90.0),
            button: PointerButton::Primary,
        });
        assert_eq!(offset(&mut scene, list), 0.0);
    }

    #[test]
    fn attaching_to_a_non_list_fails_cleanly() {
        let mut scene = Scene::new(50, 50);
        let group = scene
            .construct(None, NodeInit::at(0.0, 0.0, 20, 20), arbor_scene::Group)
            .unwrap();
        assert!(Scrollbar::new().attach(&mut scene, group).is_err());
        assert!(scene.children(group).is_empty());
    }
}
