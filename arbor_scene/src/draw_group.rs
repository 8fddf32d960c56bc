// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Composition of drawable surfaces onto the screen, limited to damaged areas.

use crate::backend::{Backend, SurfaceHandle};
use crate::geometry::PixelRect;
use crate::types::Color;

/// One surface to composite, in paint order.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Layer {
    pub(crate) surface: SurfaceHandle,
    /// Where the surface's top-left lands on screen.
    pub(crate) world: PixelRect,
    /// The part of `world` left after ancestor clips.
    pub(crate) visible: PixelRect,
}

/// Accumulates screen areas that changed during a frame and repaints exactly
/// those areas from the visible surfaces.
///
/// The areas of one frame are merged until none overlap, so each screen pixel
/// is composited at most once per frame.
#[derive(Clone, Debug)]
pub struct DrawGroup {
    screen: PixelRect,
    background: Option<Color>,
    damage: Vec<PixelRect>,
    full: bool,
}

impl DrawGroup {
    /// A draw group for a `width` × `height` screen.
    ///
    /// The first composite repaints the whole screen.
    #[must_use]
    pub fn new(width: u32, height: u32, background: Option<Color>) -> Self {
        Self {
            screen: PixelRect::from_size(width, height),
            background,
            damage: Vec::new(),
            full: true,
        }
    }

    /// The screen rectangle.
    #[must_use]
    pub const fn screen(&self) -> PixelRect {
        self.screen
    }

    /// Color painted under every damaged area before surfaces are blitted.
    #[must_use]
    pub const fn background(&self) -> Option<Color> {
        self.background
    }

    /// Sets the background and repaints everything.
    pub fn set_background(&mut self, background: Option<Color>) {
        self.background = background;
        self.full = true;
    }

    /// Resizes the screen and repaints everything.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.screen = PixelRect::from_size(width, height);
        self.full = true;
    }

    /// Repaints the whole screen on the next composite.
    pub fn invalidate_all(&mut self) {
        self.full = true;
    }

    /// Queues a screen area for repaint. Areas off screen are dropped.
    pub fn add(&mut self, rect: PixelRect) {
        if let Some(rect) = rect.intersect(self.screen) {
            self.damage.push(rect);
        }
    }

    /// Returns `true` if the next composite has anything to do.
    #[must_use]
    pub fn has_damage(&self) -> bool {
        self.full || !self.damage.is_empty()
    }

    /// Repaints the queued areas and returns them.
    pub(crate) fn compose(&mut self, backend: &mut dyn Backend, layers: &[Layer]) -> Vec<PixelRect> {
        let areas = if self.full {
            vec![self.screen]
        } else {
            merge(core::mem::take(&mut self.damage))
        };
        self.damage.clear();
        self.full = false;

        let target = backend.screen();
        for &area in &areas {
            if let Some(background) = self.background {
                backend.fill_rect(target, area, background);
            }
            for layer in layers {
                let Some(hit) = layer.visible.intersect(area) else {
                    continue;
                };
                let src = hit.translate(-layer.world.x, -layer.world.y);
                backend.blit(target, layer.surface, hit.origin(), Some(src));
            }
        }
        areas
    }
}

/// Unions overlapping rectangles until no two overlap.
fn merge(mut rects: Vec<PixelRect>) -> Vec<PixelRect> {
    let mut out: Vec<PixelRect> = Vec::with_capacity(rects.len());
    while let Some(mut rect) = rects.pop() {
        // Growing `rect` can make it overlap ones already accepted.
        while let Some(pos) = out.iter().position(|r| r.intersects(rect)) {
            rect = rect.union(out.swap_remove(pos));
        }
        out.push(rect);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{DrawGroup, Layer, merge};
    use crate::backend::Backend;
    use crate::geometry::PixelRect;
    use crate::headless::HeadlessBackend;
    use crate::types::Color;

    #[test]
    fn merge_unions_chains_of_overlaps() {
        let merged = merge(vec![
            PixelRect::new(0, 0, 10, 10),
            PixelRect::new(50, 50, 5, 5),
            PixelRect::new(8, 8, 10, 10),
            PixelRect::new(16, 0, 4, 10),
        ]);
        assert_eq!(merged.len(), 2);
        assert!(merged.contains(&PixelRect::new(0, 0, 20, 18)));
        assert!(merged.contains(&PixelRect::new(50, 50, 5, 5)));
    }

    #[test]
    fn first_composite_covers_the_screen_then_only_damage() {
        let mut backend = HeadlessBackend::new(20, 20);
        let mut group = DrawGroup::new(20, 20, Some(Color::BLACK));
        assert_eq!(group.compose(&mut backend, &[]), [PixelRect::new(0, 0, 20, 20)]);
        assert!(!group.has_damage());
        assert!(group.compose(&mut backend, &[]).is_empty());

        group.add(PixelRect::new(15, 15, 10, 10));
        group.add(PixelRect::new(40, 40, 1, 1));
        assert_eq!(group.compose(&mut backend, &[]), [PixelRect::new(15, 15, 5, 5)]);
    }

    #[test]
    fn layers_are_clipped_to_their_visible_part() {
        let mut backend = HeadlessBackend::new(10, 10);
        let sprite = backend.allocate_surface(6, 6);
        backend.fill(sprite, Color::WHITE);
        let mut group = DrawGroup::new(10, 10, Some(Color::BLACK));
        let layer = Layer {
            surface: sprite,
            world: PixelRect::new(2, 2, 6, 6),
            visible: PixelRect::new(2, 2, 3, 6),
        };
        group.compose(&mut backend, &[layer]);
        let screen = backend.screen();
        assert_eq!(backend.pixel(screen, 4, 4), Some(Color::WHITE));
        assert_eq!(backend.pixel(screen, 5, 4), Some(Color::BLACK));
        assert_eq!(backend.pixel(screen, 1, 1), Some(Color::BLACK));
    }
}
