// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types shared across the scene: node identifiers, capabilities,
//! dirty levels, colors and fonts.

use serde::{Deserialize, Serialize};

/// Identifier for a node in the scene (generational).
///
/// An id stays valid until its node is removed. After that it is *stale*: every
/// lookup with it fails, even if the slot is reused by a later node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// What a node can do, resolved once when it is constructed.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// The node accepts children.
        const CHILDREN       = 0b0000_0001;
        /// The node owns an offscreen surface and a dirty level.
        const DRAWABLE       = 0b0000_0010;
        /// Descendants are clipped to this node's world rectangle.
        const CLIPS_CHILDREN = 0b0000_0100;
    }
}

/// How much of a drawable node's surface must be redone before the next
/// composite.
///
/// Within a frame the level only increases; drawing resets it to
/// [`DirtyLevel::Clean`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DirtyLevel {
    /// The surface is up to date.
    #[default]
    Clean = 0,
    /// The surface must be repainted.
    Redraw = 1,
    /// The surface must be reallocated to the current size and repainted.
    FullResize = 2,
}

/// An 8-bit RGBA color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha; 255 is opaque.
    #[serde(default = "opaque")]
    pub a: u8,
}

const fn opaque() -> u8 {
    255
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Neutral gray used for nodes whose own painting failed.
    pub const PLACEHOLDER: Self = Self::rgb(128, 128, 128);

    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Creates a color with alpha.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// A font request: family name and pixel size.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Font {
    /// Family name, resolved by the backend.
    pub family: String,
    /// Size in pixels.
    pub size: u32,
}

impl Font {
    /// Creates a font request.
    #[must_use]
    pub fn new(family: impl Into<String>, size: u32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("sans-serif", 16)
    }
}
