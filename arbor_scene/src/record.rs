// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat node records: the persisted shape of a subtree.
//!
//! A record list is ordered parents-first. Each record names its parent by
//! index into the same list, so a file format only has to store a sequence.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::class::Props;
use crate::error::SceneError;
use crate::scene::{NodeInit, Scene};
use crate::transform::Transform;
use crate::types::NodeId;

/// Persisted form of a [`Transform`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformRecord {
    /// Anchor point x.
    pub x: f64,
    /// Anchor point y.
    pub y: f64,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
    /// Horizontal anchor fraction.
    #[serde(default)]
    pub anchor_x: f64,
    /// Vertical anchor fraction.
    #[serde(default)]
    pub anchor_y: f64,
}

impl From<&Transform> for TransformRecord {
    fn from(t: &Transform) -> Self {
        let (x, y) = t.position();
        let (width, height) = t.size();
        let (anchor_x, anchor_y) = t.anchor();
        Self {
            x,
            y,
            width,
            height,
            anchor_x,
            anchor_y,
        }
    }
}

impl From<TransformRecord> for Transform {
    fn from(r: TransformRecord) -> Self {
        Self::new(r.x, r.y, r.width, r.height).with_anchor(r.anchor_x, r.anchor_y)
    }
}

/// One node: class, geometry, enabled flag and constructor arguments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Registered class name.
    pub class: String,
    /// Index of the parent record; `None` for nodes attached to the load target.
    #[serde(default)]
    pub parent: Option<usize>,
    /// Geometry relative to the parent.
    pub transform: TransformRecord,
    /// The node's own enabled flag.
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    /// Constructor arguments.
    #[serde(default)]
    pub args: Props,
}

fn enabled_default() -> bool {
    true
}

impl Scene {
    /// Builds the nodes described by `records` under `parent`.
    ///
    /// Returns the new ids, one per record. If any record fails, every node
    /// built by this call is removed again and the error is returned.
    pub fn load_records(
        &mut self,
        parent: Option<NodeId>,
        records: &[NodeRecord],
    ) -> Result<Vec<NodeId>, SceneError> {
        let mut ids = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            match self.load_one(parent, &ids, index, record) {
                Ok(id) => ids.push(id),
                Err(err) => {
                    for &id in ids.iter().rev() {
                        if self.is_alive(id) {
                            self.remove(id);
                        }
                    }
                    return Err(err);
                }
            }
        }
        debug!(count = ids.len(), ?parent, "loaded node records");
        Ok(ids)
    }

    fn load_one(
        &mut self,
        target: Option<NodeId>,
        built: &[NodeId],
        index: usize,
        record: &NodeRecord,
    ) -> Result<NodeId, SceneError> {
        let parent = match record.parent {
            None => target,
            Some(p) => Some(
                *built
                    .get(p)
                    .ok_or(SceneError::RecordParent { index, parent: p })?,
            ),
        };
        let init = NodeInit {
            transform: record.transform.into(),
            enabled: record.enabled,
            transient: false,
        };
        self.construct_class(&record.class, parent, init, &record.args)
    }

    /// Describes a subtree as records, parents first.
    ///
    /// With `Some(root)` the first record is `root` itself (parent `None`);
    /// with `None` every top-level node is included. Transient nodes and their
    /// descendants are left out.
    #[must_use]
    pub fn save_records(&self, root: Option<NodeId>) -> Vec<NodeRecord> {
        let starts: Vec<NodeId> = match root {
            Some(r) if self.is_alive(r) => vec![r],
            Some(_) => Vec::new(),
            None => self.roots().to_vec(),
        };
        let mut out = Vec::new();
        let mut stack: Vec<(NodeId, Option<usize>)> =
            starts.into_iter().rev().map(|id| (id, None)).collect();
        while let Some((id, parent)) = stack.pop() {
            if self.is_transient(id) {
                continue;
            }
            let (Some(class), Some(transform)) = (self.class_name(id), self.transform(id)) else {
                continue;
            };
            let index = out.len();
            out.push(NodeRecord {
                class: class.to_owned(),
                parent,
                transform: transform.into(),
                enabled: self.is_enabled(id),
                args: self.properties(id).unwrap_or_default(),
            });
            stack.extend(self.children(id).iter().rev().map(|&c| (c, Some(index))));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{NodeRecord, TransformRecord};
    use crate::behavior::Group;
    use crate::class::Props;
    use crate::error::SceneError;
    use crate::geometry::PixelRect;
    use crate::scene::{NodeInit, Scene};
    use crate::types::Color;

    fn record(class: &str, parent: Option<usize>, x: f64) -> NodeRecord {
        NodeRecord {
            class: class.into(),
            parent,
            transform: TransformRecord {
                x,
                y: 0.0,
                width: 10,
                height: 10,
                anchor_x: 0.0,
                anchor_y: 0.0,
            },
            enabled: true,
            args: Props::new(),
        }
    }

    #[test]
    fn load_builds_parents_first() {
        let mut scene = Scene::new(100, 100);
        let ids = scene
            .load_records(
                None,
                &[
                    record("Node", None, 10.0),
                    record("SpriteNode", Some(0), 5.0),
                    record("SpriteNode", Some(1), 1.0),
                ],
            )
            .unwrap();
        assert_eq!(scene.roots(), &[ids[0]]);
        assert_eq!(scene.parent_of(ids[2]), Some(ids[1]));
        assert_eq!(scene.world_rect(ids[2]), Some(PixelRect::new(16, 0, 10, 10)));
    }

    #[test]
    fn failed_load_rolls_back() {
        let mut scene = Scene::new(100, 100);
        let existing = scene.construct(None, NodeInit::default(), Group).unwrap();
        let err = scene
            .load_records(
                Some(existing),
                &[record("Node", None, 0.0), record("Missing", Some(0), 0.0)],
            )
            .unwrap_err();
        assert_eq!(err, SceneError::UnknownClass("Missing".into()));
        assert!(scene.children(existing).is_empty());

        let err = scene
            .load_records(None, &[record("Node", Some(0), 0.0)])
            .unwrap_err();
        assert_eq!(err, SceneError::RecordParent { index: 0, parent: 0 });
        assert_eq!(scene.roots(), &[existing]);
    }

    #[test]
    fn save_then_load_reproduces_the_subtree() {
        let mut scene = Scene::new(100, 100);
        let mut records = vec![record("Node", None, 3.0), record("SpriteNode", Some(0), 4.0)];
        records[1].enabled = false;
        records[1].args = Props::new().with("fill_color", Color::rgb(9, 8, 7));
        records[1].transform.anchor_x = 0.5;
        let ids = scene.load_records(None, &records).unwrap();
        scene
            .construct(Some(ids[0]), NodeInit::default().transient(), Group)
            .unwrap();

        assert_eq!(scene.save_records(Some(ids[0])), records);
        assert_eq!(scene.save_records(None), records);
    }

    #[test]
    fn records_have_a_stable_json_shape() {
        let json = r#"{
            "class": "SpriteNode",
            "parent": 0,
            "transform": { "x": 1.5, "y": 2.0, "width": 3, "height": 4 },
            "args": { "fill_color": { "r": 1, "g": 2, "b": 3 } }
        }"#;
        let parsed: NodeRecord = serde_json::from_str(json).unwrap();
        assert!(parsed.enabled);
        assert_eq!(parsed.parent, Some(0));
        assert_eq!(parsed.transform.anchor_x, 0.0);
        assert_eq!(
            parsed.args.get_color("fill_color"),
            Ok(Some(Color::rgb(1, 2, 3)))
        );
    }
}
