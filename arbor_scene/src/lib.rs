// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Scene: a retained-mode 2D scene graph with dirty-rectangle drawing.
//!
//! Every visual element is a node in a tree. A node has a [`Transform`]
//! (anchor-relative position and size inside its parent), an enabled flag, and
//! a [`Behavior`] that decides what the node does: hold children, draw into
//! its own offscreen surface, or react to events.
//!
//! - [`Scene`]: the tree, the event [`HandlerRegistry`] and the [`DrawGroup`]
//!   compositor. A frame is [`Scene::handle_event`] for each input event, then
//!   [`Scene::update`], then [`Scene::draw`].
//! - [`Transform`] / [`TransformMut`]: edits through [`Scene::transform_mut`]
//!   recompute the node's cached world rectangle at once and translate every
//!   descendant's rectangle by the same delta.
//! - [`DirtyLevel`]: drawable nodes repaint only when marked, and reallocate
//!   their surface only when their size changed.
//! - [`Scrollable`]: the interface of nodes that virtualize their children,
//!   reached through [`Scene::with_scrollable`] whatever the concrete type.
//! - [`Backend`]: the drawing capability the scene needs (surfaces, blits and
//!   text). [`HeadlessBackend`] implements it in memory for tests and tooling.
//! - [`ClassRegistry`], [`NodeRecord`]: construct nodes by class name and
//!   describe subtrees as flat records for an external loader/saver.
//! - [`EditorSession`]: advisory selection and a descriptor side-table for
//!   editing tools.
//!
//! ## Minimal example
//!
//! ```rust
//! use arbor_scene::{Color, Group, HeadlessBackend, NodeInit, PixelRect, Scene, SpriteNode};
//!
//! let mut scene = Scene::new(200, 100);
//! let mut backend = HeadlessBackend::new(200, 100);
//!
//! let root = scene.construct(None, NodeInit::default(), Group).unwrap();
//! let a = scene.construct(Some(root), NodeInit::at(10.0, 10.0, 50, 50), Group).unwrap();
//! let b = scene
//!     .construct(Some(a), NodeInit::at(5.0, 5.0, 10, 10), SpriteNode::new(Color::WHITE))
//!     .unwrap();
//! assert_eq!(scene.world_rect(b), Some(PixelRect::new(15, 15, 10, 10)));
//!
//! // The first frame repaints the whole screen.
//! assert_eq!(scene.draw(&mut backend), [PixelRect::new(0, 0, 200, 100)]);
//!
//! // Moving an ancestor moves the sprite; only the old and new areas repaint.
//! // Overlapping areas are merged.
//! scene.transform_mut(a).unwrap().set_position(15.0, 10.0);
//! assert_eq!(scene.world_rect(b), Some(PixelRect::new(20, 15, 10, 10)));
//! assert_eq!(scene.draw(&mut backend), [PixelRect::new(15, 15, 15, 10)]);
//! ```
//!
//! Nodes whose `update` or `paint` fails are isolated: they are drawn as a
//! neutral placeholder, their descendants are hidden, and the rest of the scene
//! keeps running.

mod backend;
mod behavior;
mod class;
mod config;
mod draw_group;
mod editor;
mod error;
mod event;
mod geometry;
mod headless;
mod record;
mod registry;
mod scene;
mod transform;
mod tree;
mod types;

pub use backend::{Backend, SurfaceHandle};
pub use behavior::{Behavior, Group, NodeCx, PaintCx, Scrollable, SpriteNode};
pub use class::{ClassFactory, ClassRegistry, PropValue, Props};
pub use config::{DEFAULT_MAX_SURFACE_EXTENT, EngineConfig};
pub use draw_group::DrawGroup;
pub use editor::{Descriptor, EditorSession, NEW_DRAWABLE_EXTENT, OutlineEntry};
pub use error::{ConfigError, NodeError, SceneError};
pub use event::{Event, EventKind, EventKinds, Key, KeyInput, Modifiers, PointerButton};
pub use geometry::PixelRect;
pub use headless::HeadlessBackend;
pub use record::{NodeRecord, TransformRecord};
pub use registry::HandlerRegistry;
pub use scene::{NodeInit, Scene, SceneRequest};
pub use transform::{Transform, TransformMut, anchor};
pub use types::{Capabilities, Color, DirtyLevel, Font, NodeId};
