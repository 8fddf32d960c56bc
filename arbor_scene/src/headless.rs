// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory [`Backend`] for tests and tooling.

use tracing::warn;

use crate::backend::{Backend, SurfaceHandle};
use crate::geometry::PixelRect;
use crate::types::{Color, Font};

#[derive(Clone, Debug)]
struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    text: Vec<String>,
}

impl PixelBuffer {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::rgba(0, 0, 0, 0); width as usize * height as usize],
            text: Vec::new(),
        }
    }

    fn bounds(&self) -> PixelRect {
        PixelRect::from_size(self.width, self.height)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        (x < self.width && y < self.height).then(|| (y * self.width + x) as usize)
    }

    fn get(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    fn put(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = blend(self.pixels[i], color);
        }
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        let Some(rect) = rect.intersect(self.bounds()) else {
            return;
        };
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                if let Some(i) = self.index(x, y) {
                    self.pixels[i] = color;
                }
            }
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "The weighted mean of two u8 channels fits in u8."
)]
fn blend(dst: Color, src: Color) -> Color {
    match src.a {
        255 => src,
        0 => dst,
        a => {
            let a = u16::from(a);
            let mix = |d: u8, s: u8| ((u16::from(s) * a + u16::from(d) * (255 - a)) / 255) as u8;
            Color::rgba(
                mix(dst.r, src.r),
                mix(dst.g, src.g),
                mix(dst.b, src.b),
                dst.a.max(src.a),
            )
        }
    }
}

/// Software surfaces held in memory.
///
/// Text renders as one solid box per non-whitespace character, each
/// `size / 2` wide and `size` tall, and is also recorded per surface so tests
/// can read back what was drawn.
///
/// ```rust
/// use arbor_scene::{Backend, Color, HeadlessBackend};
///
/// let mut backend = HeadlessBackend::new(4, 4);
/// let screen = backend.screen();
/// backend.fill(screen, Color::WHITE);
/// assert_eq!(backend.pixel(screen, 3, 3), Some(Color::WHITE));
/// ```
#[derive(Clone, Debug)]
pub struct HeadlessBackend {
    surfaces: Vec<Option<PixelBuffer>>,
    free_list: Vec<usize>,
    blit_count: usize,
}

impl HeadlessBackend {
    /// Creates a backend whose screen is `width` × `height`.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surfaces: vec![Some(PixelBuffer::new(width, height))],
            free_list: Vec::new(),
            blit_count: 0,
        }
    }

    /// Resizes the screen, as a window system would.
    pub fn resize_screen(&mut self, width: u32, height: u32) {
        let screen = self.screen();
        self.resize_surface(screen, width, height);
    }

    /// Reads one pixel. `None` outside the surface or for unknown handles.
    #[must_use]
    pub fn pixel(&self, surface: SurfaceHandle, x: i32, y: i32) -> Option<Color> {
        self.buffer(surface)?.get(x, y)
    }

    /// Size of a live surface.
    #[must_use]
    pub fn surface_size(&self, surface: SurfaceHandle) -> Option<(u32, u32)> {
        self.buffer(surface).map(|b| (b.width, b.height))
    }

    /// Text drawn onto a surface since it was last filled.
    #[must_use]
    pub fn text(&self, surface: SurfaceHandle) -> &[String] {
        self.buffer(surface).map_or(&[], |b| b.text.as_slice())
    }

    /// Number of live offscreen surfaces (the screen is not counted).
    #[must_use]
    pub fn live_surfaces(&self) -> usize {
        self.surfaces.iter().skip(1).filter(|s| s.is_some()).count()
    }

    /// Number of blits issued so far.
    #[must_use]
    pub const fn blit_count(&self) -> usize {
        self.blit_count
    }

    fn buffer(&self, surface: SurfaceHandle) -> Option<&PixelBuffer> {
        self.surfaces.get(surface.0 as usize)?.as_ref()
    }

    fn buffer_mut(&mut self, surface: SurfaceHandle) -> Option<&mut PixelBuffer> {
        let buffer = self
            .surfaces
            .get_mut(surface.0 as usize)
            .and_then(Option::as_mut);
        if buffer.is_none() {
            warn!(?surface, "headless backend: unknown surface");
        }
        buffer
    }
}

impl Backend for HeadlessBackend {
    fn screen(&self) -> SurfaceHandle {
        SurfaceHandle(0)
    }

    fn screen_size(&self) -> (u32, u32) {
        self.surface_size(self.screen()).unwrap_or((0, 0))
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "Surface counts stay far below u32::MAX."
    )]
    fn allocate_surface(&mut self, width: u32, height: u32) -> SurfaceHandle {
        let buffer = Some(PixelBuffer::new(width, height));
        if let Some(idx) = self.free_list.pop() {
            self.surfaces[idx] = buffer;
            SurfaceHandle(idx as u32)
        } else {
            self.surfaces.push(buffer);
            SurfaceHandle((self.surfaces.len() - 1) as u32)
        }
    }

    fn resize_surface(&mut self, surface: SurfaceHandle, width: u32, height: u32) {
        let Some(buffer) = self.buffer_mut(surface) else {
            return;
        };
        if (buffer.width, buffer.height) == (width, height) {
            return;
        }
        let mut resized = PixelBuffer::new(width, height);
        for y in 0..buffer.height.min(height) {
            for x in 0..buffer.width.min(width) {
                let src = (y * buffer.width + x) as usize;
                let dst = (y * width + x) as usize;
                resized.pixels[dst] = buffer.pixels[src];
            }
        }
        resized.text = core::mem::take(&mut buffer.text);
        *buffer = resized;
    }

    fn release_surface(&mut self, surface: SurfaceHandle) {
        let idx = surface.0 as usize;
        if idx == 0 {
            warn!("headless backend: refusing to release the screen");
            return;
        }
        if let Some(slot) = self.surfaces.get_mut(idx)
            && slot.take().is_some()
        {
            self.free_list.push(idx);
        }
    }

    fn fill(&mut self, surface: SurfaceHandle, color: Color) {
        if let Some(buffer) = self.buffer_mut(surface) {
            buffer.pixels.fill(color);
            buffer.text.clear();
        }
    }

    fn fill_rect(&mut self, surface: SurfaceHandle, rect: PixelRect, color: Color) {
        if let Some(buffer) = self.buffer_mut(surface) {
            buffer.fill_rect(rect, color);
        }
    }

    fn blit(
        &mut self,
        dst: SurfaceHandle,
        src: SurfaceHandle,
        position: (i32, i32),
        area: Option<PixelRect>,
    ) {
        let Some(source) = self.buffer(src).cloned() else {
            warn!(?src, "headless backend: unknown blit source");
            return;
        };
        let area = area.unwrap_or_else(|| source.bounds());
        let Some(area) = area.intersect(source.bounds()) else {
            return;
        };
        let Some(target) = self.buffer_mut(dst) else {
            return;
        };
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                if let Some(color) = source.get(x, y) {
                    target.put(position.0 + (x - area.x), position.1 + (y - area.y), color);
                }
            }
        }
        self.blit_count += 1;
    }

    fn measure_text(&self, text: &str, font: &Font) -> (u32, u32) {
        let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
        (chars.saturating_mul(glyph_advance(font)), font.size)
    }

    fn draw_text(
        &mut self,
        surface: SurfaceHandle,
        text: &str,
        position: (i32, i32),
        color: Color,
        font: &Font,
    ) {
        let advance = i32::try_from(glyph_advance(font)).unwrap_or(i32::MAX);
        let height = i32::try_from(font.size).unwrap_or(i32::MAX);
        let Some(buffer) = self.buffer_mut(surface) else {
            return;
        };
        let mut x = position.0;
        for c in text.chars() {
            if !c.is_whitespace() {
                let glyph = PixelRect::new(x, position.1, advance - 1, height);
                buffer.fill_rect(glyph, color);
            }
            x = x.saturating_add(advance);
        }
        buffer.text.push(text.to_owned());
    }
}

fn glyph_advance(font: &Font) -> u32 {
    (font.size / 2).max(1)
}

#[cfg(test)]
mod tests {
    use super::HeadlessBackend;
    use crate::backend::Backend;
    use crate::geometry::PixelRect;
    use crate::types::{Color, Font};

    #[test]
    fn blit_copies_the_requested_area() {
        let mut backend = HeadlessBackend::new(10, 10);
        let screen = backend.screen();
        backend.fill(screen, Color::BLACK);

        let sprite = backend.allocate_surface(4, 4);
        backend.fill(sprite, Color::WHITE);
        backend.blit(screen, sprite, (2, 3), Some(PixelRect::new(1, 1, 2, 2)));

        assert_eq!(backend.pixel(screen, 2, 3), Some(Color::WHITE));
        assert_eq!(backend.pixel(screen, 3, 4), Some(Color::WHITE));
        assert_eq!(backend.pixel(screen, 4, 4), Some(Color::BLACK));
        assert_eq!(backend.blit_count(), 1);
    }

    #[test]
    fn resize_preserves_overlap() {
        let mut backend = HeadlessBackend::new(1, 1);
        let s = backend.allocate_surface(2, 2);
        backend.fill(s, Color::WHITE);
        backend.resize_surface(s, 3, 1);
        assert_eq!(backend.surface_size(s), Some((3, 1)));
        assert_eq!(backend.pixel(s, 1, 0), Some(Color::WHITE));
        assert_eq!(backend.pixel(s, 2, 0), Some(Color::rgba(0, 0, 0, 0)));
    }

    #[test]
    fn released_slots_are_reused() {
        let mut backend = HeadlessBackend::new(1, 1);
        let a = backend.allocate_surface(1, 1);
        backend.release_surface(a);
        assert_eq!(backend.live_surfaces(), 0);
        let b = backend.allocate_surface(2, 2);
        assert_eq!(a, b);
        assert_eq!(backend.live_surfaces(), 1);
    }

    #[test]
    fn text_is_measured_and_recorded() {
        let mut backend = HeadlessBackend::new(40, 20);
        let font = Font::new("mono", 10);
        assert_eq!(backend.measure_text("abc", &font), (15, 10));
        let screen = backend.screen();
        backend.draw_text(screen, "a b", (0, 0), Color::WHITE, &font);
        assert_eq!(backend.text(screen), ["a b".to_owned()]);
        assert_eq!(backend.pixel(screen, 0, 0), Some(Color::WHITE));
        assert_eq!(backend.pixel(screen, 6, 0), Some(Color::rgba(0, 0, 0, 0)));
    }
}
