// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Editor session state kept beside a scene.
//!
//! The session owns an advisory selection and a side-table mapping live nodes
//! to the descriptor a saver would write for them. Neither affects the tree:
//! the scene never consults the session, and a selected node may be removed at
//! any time, so every read re-validates it.

use hashbrown::HashMap;
use kurbo::Point;
use tracing::debug;

use crate::class::Props;
use crate::error::SceneError;
use crate::event::{Key, KeyInput};
use crate::record::TransformRecord;
use crate::scene::{NodeInit, Scene};
use crate::types::{Capabilities, NodeId};

/// Side length of drawable nodes added by the editor.
pub const NEW_DRAWABLE_EXTENT: i32 = 40;

/// What the editor knows about one node.
#[derive(Clone, Debug, PartialEq)]
pub struct Descriptor {
    /// Class name.
    pub class: String,
    /// Last synchronized geometry.
    pub transform: TransformRecord,
    /// Last synchronized enabled flag.
    pub enabled: bool,
    /// Constructor arguments.
    pub args: Props,
}

/// One row of a tree view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineEntry {
    /// The node.
    pub id: NodeId,
    /// Number of ancestors.
    pub depth: usize,
    /// Class name.
    pub class: &'static str,
    /// The node's own flag.
    pub enabled: bool,
    /// Whether the node is actually shown.
    pub visible: bool,
}

/// Selection and descriptor side-table for an editor.
#[derive(Clone, Debug, Default)]
pub struct EditorSession {
    selected: Option<NodeId>,
    descriptors: HashMap<NodeId, Descriptor>,
}

impl EditorSession {
    /// An empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node of `class` under `parent` at the parent's origin and selects it.
    ///
    /// Drawable classes start 40×40, everything else 0×0.
    pub fn add_node(
        &mut self,
        scene: &mut Scene,
        class: &str,
        parent: Option<NodeId>,
        args: Props,
    ) -> Result<NodeId, SceneError> {
        let id = scene.construct_class(class, parent, NodeInit::default(), &args)?;
        if scene
            .capabilities(id)
            .is_some_and(|c| c.contains(Capabilities::DRAWABLE))
            && let Some(mut transform) = scene.transform_mut(id)
        {
            transform.set_size(NEW_DRAWABLE_EXTENT, NEW_DRAWABLE_EXTENT);
        }
        self.track(scene, id);
        self.selected = Some(id);
        debug!(?id, class, "editor added node");
        Ok(id)
    }

    /// Starts tracking an existing node and its non-transient descendants.
    pub fn track(&mut self, scene: &Scene, id: NodeId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if scene.is_transient(id) {
                continue;
            }
            self.sync_descriptor(scene, id);
            stack.extend(scene.children(id).iter().copied());
        }
    }

    /// Refreshes the descriptor of `id` from the scene; forgets it if `id` is stale.
    pub fn sync_descriptor(&mut self, scene: &Scene, id: NodeId) {
        let (Some(class), Some(transform)) = (scene.class_name(id), scene.transform(id)) else {
            self.descriptors.remove(&id);
            return;
        };
        let descriptor = Descriptor {
            class: class.to_owned(),
            transform: transform.into(),
            enabled: scene.is_enabled(id),
            args: scene.properties(id).unwrap_or_default(),
        };
        self.descriptors.insert(id, descriptor);
    }

    /// The descriptor of a tracked node.
    #[must_use]
    pub fn descriptor(&self, id: NodeId) -> Option<&Descriptor> {
        self.descriptors.get(&id)
    }

    /// Number of tracked nodes.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.descriptors.len()
    }

    /// Drops descriptors of nodes that are no longer alive.
    pub fn prune(&mut self, scene: &Scene) {
        self.descriptors.retain(|id, _| scene.is_alive(*id));
    }

    /// Sets the selection. Purely advisory.
    pub fn set_selected(&mut self, id: Option<NodeId>) {
        self.selected = id;
    }

    /// The selected node, if it is still alive.
    #[must_use]
    pub fn selected(&self, scene: &Scene) -> Option<NodeId> {
        self.selected.filter(|&id| scene.is_alive(id))
    }

    /// Selects the topmost visible node under `point`, or clears the selection.
    pub fn select_at(&mut self, scene: &Scene, point: Point) -> Option<NodeId> {
        self.selected = scene.hit_test_point(point);
        self.selected
    }

    /// Sets a node's enabled flag and records it in its descriptor.
    pub fn set_enabled(&mut self, scene: &mut Scene, id: NodeId, enabled: bool) {
        scene.set_enabled(id, enabled);
        if self.descriptors.contains_key(&id) {
            self.sync_descriptor(scene, id);
        }
    }

    /// Editor keyboard shortcuts for the selected node.
    ///
    /// Arrow keys move it by one pixel; Delete removes it and its subtree.
    /// Returns `true` if the key was used.
    pub fn handle_key(&mut self, scene: &mut Scene, key: &KeyInput) -> bool {
        let Some(id) = self.selected(scene) else {
            self.selected = None;
            return false;
        };
        let (dx, dy) = match key.key {
            Key::ArrowLeft => (-1.0, 0.0),
            Key::ArrowRight => (1.0, 0.0),
            Key::ArrowUp => (0.0, -1.0),
            Key::ArrowDown => (0.0, 1.0),
            Key::Delete => {
                scene.remove(id);
                self.selected = None;
                self.prune(scene);
                debug!(?id, "editor deleted node");
                return true;
            }
            _ => return false,
        };
        if let Some(mut transform) = scene.transform_mut(id) {
            let (x, y) = transform.position();
            transform.set_position(x + dx, y + dy);
        }
        self.sync_descriptor(scene, id);
        true
    }

    /// Rows for a tree view of `root`'s subtree, or of the whole scene.
    ///
    /// Transient nodes are included; they are real nodes even if never saved.
    #[must_use]
    pub fn outline(&self, scene: &Scene, root: Option<NodeId>) -> Vec<OutlineEntry> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match root {
            Some(r) => vec![r],
            None => scene.roots().iter().rev().copied().collect(),
        };
        while let Some(id) = stack.pop() {
            let Some(class) = scene.class_name(id) else {
                continue;
            };
            out.push(OutlineEntry {
                id,
                depth: scene.depth(id),
                class,
                enabled: scene.is_enabled(id),
                visible: scene.is_visible(id),
            });
            stack.extend(scene.children(id).iter().rev().copied());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{EditorSession, NEW_DRAWABLE_EXTENT};
    use crate::class::Props;
    use crate::event::{Key, KeyInput};
    use crate::geometry::PixelRect;
    use crate::scene::Scene;
    use kurbo::Point;

    #[test]
    fn added_nodes_get_default_geometry_and_selection() {
        let mut scene = Scene::new(200, 200);
        let mut editor = EditorSession::new();
        let group = editor.add_node(&mut scene, "Node", None, Props::new()).unwrap();
        assert_eq!(scene.transform(group).unwrap().size(), (0, 0));

        let sprite = editor
            .add_node(&mut scene, "SpriteNode", Some(group), Props::new())
            .unwrap();
        assert_eq!(
            scene.transform(sprite).unwrap().size(),
            (NEW_DRAWABLE_EXTENT, NEW_DRAWABLE_EXTENT)
        );
        assert_eq!(editor.selected(&scene), Some(sprite));
        assert_eq!(editor.descriptor(sprite).unwrap().transform.width, 40);
        assert_eq!(editor.tracked(), 2);
    }

    #[test]
    fn arrows_nudge_and_delete_removes() {
        let mut scene = Scene::new(200, 200);
        let mut editor = EditorSession::new();
        let parent = editor.add_node(&mut scene, "Node", None, Props::new()).unwrap();
        let id = editor
            .add_node(&mut scene, "SpriteNode", Some(parent), Props::new())
            .unwrap();

        assert!(editor.handle_key(&mut scene, &KeyInput::new(Key::ArrowRight)));
        assert!(editor.handle_key(&mut scene, &KeyInput::new(Key::ArrowDown)));
        assert!(editor.handle_key(&mut scene, &KeyInput::new(Key::ArrowDown)));
        assert_eq!(scene.world_rect(id), Some(PixelRect::new(1, 2, 40, 40)));
        assert_eq!(editor.descriptor(id).unwrap().transform.y, 2.0);
        assert!(!editor.handle_key(&mut scene, &KeyInput::character('x')));

        editor.set_selected(Some(parent));
        assert!(editor.handle_key(&mut scene, &KeyInput::new(Key::Delete)));
        assert!(!scene.is_alive(id));
        assert_eq!(editor.tracked(), 0);
        assert_eq!(editor.selected(&scene), None);
        assert!(!editor.handle_key(&mut scene, &KeyInput::new(Key::ArrowLeft)));
    }

    #[test]
    fn selection_of_removed_nodes_is_dropped() {
        let mut scene = Scene::new(200, 200);
        let mut editor = EditorSession::new();
        let id = editor
            .add_node(&mut scene, "SpriteNode", None, Props::new())
            .unwrap();
        assert_eq!(editor.select_at(&scene, Point::new(10.0, 10.0)), Some(id));
        scene.remove(id);
        assert_eq!(editor.selected(&scene), None);
        assert_eq!(editor.select_at(&scene, Point::new(10.0, 10.0)), None);
    }

    #[test]
    fn outline_reports_depth_and_visibility() {
        let mut scene = Scene::new(200, 200);
        let mut editor = EditorSession::new();
        let top = editor.add_node(&mut scene, "Node", None, Props::new()).unwrap();
        let child = editor
            .add_node(&mut scene, "SpriteNode", Some(top), Props::new())
            .unwrap();
        editor.set_enabled(&mut scene, top, false);
        assert!(!editor.descriptor(top).unwrap().enabled);

        let rows = editor.outline(&scene, None);
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].id, rows[0].depth, rows[0].enabled), (top, 0, false));
        assert_eq!((rows[1].id, rows[1].depth), (child, 1));
        assert!(rows[1].enabled && !rows[1].visible);
        assert_eq!(rows[1].class, "SpriteNode");
    }
}
