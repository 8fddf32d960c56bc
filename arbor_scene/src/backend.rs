// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The rendering capability the scene draws through.

use crate::geometry::PixelRect;
use crate::types::{Color, Font};

/// Opaque handle to a surface owned by a [`Backend`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceHandle(pub u32);

/// Surface allocation, blitting and text services.
///
/// Every call is synchronous and must not block. Handles are only meaningful
/// to the backend that issued them.
pub trait Backend {
    /// The display surface that composited frames are blitted to.
    fn screen(&self) -> SurfaceHandle;

    /// Current size of the display surface.
    fn screen_size(&self) -> (u32, u32);

    /// Allocates an offscreen surface.
    fn allocate_surface(&mut self, width: u32, height: u32) -> SurfaceHandle;

    /// Resizes a surface, keeping the overlapping part of its contents.
    fn resize_surface(&mut self, surface: SurfaceHandle, width: u32, height: u32);

    /// Frees a surface. The handle must not be used afterwards.
    fn release_surface(&mut self, surface: SurfaceHandle);

    /// Fills a whole surface.
    fn fill(&mut self, surface: SurfaceHandle, color: Color);

    /// Fills part of a surface.
    fn fill_rect(&mut self, surface: SurfaceHandle, rect: PixelRect, color: Color);

    /// Copies `src` onto `dst` with its top-left at `position`.
    ///
    /// `area`, in `src` coordinates, limits the copied region.
    fn blit(
        &mut self,
        dst: SurfaceHandle,
        src: SurfaceHandle,
        position: (i32, i32),
        area: Option<PixelRect>,
    );

    /// Size of `text` rendered in `font`.
    fn measure_text(&self, text: &str, font: &Font) -> (u32, u32);

    /// Renders `text` with its top-left at `position`.
    fn draw_text(
        &mut self,
        surface: SurfaceHandle,
        text: &str,
        position: (i32, i32),
        color: Color,
        font: &Font,
    );
}
