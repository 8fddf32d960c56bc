// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Constructor arguments and the registry of node classes by name.

use std::collections::BTreeMap;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::behavior::{Group, SpriteNode};
use crate::error::SceneError;
use crate::scene::{NodeInit, Scene};
use crate::types::{Color, NodeId};

/// One constructor argument value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    /// A flag.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A float.
    Float(f64),
    /// A string.
    Text(String),
    /// A color.
    Color(Color),
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for PropValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for PropValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Color> for PropValue {
    fn from(v: Color) -> Self {
        Self::Color(v)
    }
}

/// Named constructor arguments of a node, as persisted in records.
///
/// Typed getters return `Ok(None)` for a missing argument and
/// [`SceneError::InvalidArgument`] for one of the wrong type.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Props(BTreeMap<String, PropValue>);

impl Props {
    /// No arguments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Props::insert`].
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<PropValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets an argument, replacing any previous value.
    pub fn insert(&mut self, name: &str, value: impl Into<PropValue>) {
        self.0.insert(name.to_owned(), value.into());
    }

    /// Raw access to one argument.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.0.get(name)
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Arguments in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// A boolean argument.
    pub fn get_bool(&self, name: &str) -> Result<Option<bool>, SceneError> {
        match self.get(name) {
            None => Ok(None),
            Some(PropValue::Bool(v)) => Ok(Some(*v)),
            Some(other) => Err(mismatch(name, "a boolean", other)),
        }
    }

    /// An integer argument.
    pub fn get_i64(&self, name: &str) -> Result<Option<i64>, SceneError> {
        match self.get(name) {
            None => Ok(None),
            Some(PropValue::Int(v)) => Ok(Some(*v)),
            Some(other) => Err(mismatch(name, "an integer", other)),
        }
    }

    /// A numeric argument; integers are widened.
    #[allow(
        clippy::cast_precision_loss,
        reason = "Persisted integers are small enough to be exact in f64."
    )]
    pub fn get_f64(&self, name: &str) -> Result<Option<f64>, SceneError> {
        match self.get(name) {
            None => Ok(None),
            Some(PropValue::Float(v)) => Ok(Some(*v)),
            Some(PropValue::Int(v)) => Ok(Some(*v as f64)),
            Some(other) => Err(mismatch(name, "a number", other)),
        }
    }

    /// A string argument.
    pub fn get_str(&self, name: &str) -> Result<Option<&str>, SceneError> {
        match self.get(name) {
            None => Ok(None),
            Some(PropValue::Text(v)) => Ok(Some(v)),
            Some(other) => Err(mismatch(name, "a string", other)),
        }
    }

    /// A color argument.
    pub fn get_color(&self, name: &str) -> Result<Option<Color>, SceneError> {
        match self.get(name) {
            None => Ok(None),
            Some(PropValue::Color(v)) => Ok(Some(*v)),
            Some(other) => Err(mismatch(name, "a color", other)),
        }
    }
}

fn mismatch(name: &str, expected: &str, got: &PropValue) -> SceneError {
    SceneError::invalid(name, format!("expected {expected}, got {got:?}"))
}

/// Builds a node of one class under `parent` and returns its id.
pub type ClassFactory =
    fn(&mut Scene, Option<NodeId>, NodeInit, &Props) -> Result<NodeId, SceneError>;

/// Node classes constructible by name, for loaders and editors.
#[derive(Clone, Debug)]
pub struct ClassRegistry {
    classes: HashMap<String, ClassFactory>,
}

impl Default for ClassRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Group::CLASS, |scene, parent, init, _| {
            scene.construct(parent, init, Group)
        });
        registry.register(SpriteNode::CLASS, |scene, parent, init, props| {
            let sprite = SpriteNode::from_props(props)?;
            scene.construct(parent, init, sprite)
        });
        registry
    }
}

impl ClassRegistry {
    /// A registry with the built-in `Node` and `SpriteNode` classes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with no classes at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            classes: HashMap::new(),
        }
    }

    /// Registers or replaces a class.
    pub fn register(&mut self, name: &str, factory: ClassFactory) {
        self.classes.insert(name.to_owned(), factory);
    }

    /// The factory for `name`.
    pub fn get(&self, name: &str) -> Result<ClassFactory, SceneError> {
        self.classes
            .get(name)
            .copied()
            .ok_or_else(|| SceneError::UnknownClass(name.to_owned()))
    }

    /// Returns `true` if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Registered class names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::{ClassRegistry, PropValue, Props};
    use crate::error::SceneError;
    use crate::types::Color;

    #[test]
    fn typed_getters_report_mismatches() {
        let props = Props::new()
            .with("label", "Play")
            .with("count", 3_i64)
            .with("fill_color", Color::rgb(1, 2, 3));
        assert_eq!(props.get_str("label"), Ok(Some("Play")));
        assert_eq!(props.get_f64("count"), Ok(Some(3.0)));
        assert_eq!(props.get_color("fill_color"), Ok(Some(Color::rgb(1, 2, 3))));
        assert_eq!(props.get_bool("missing"), Ok(None));
        assert!(matches!(
            props.get_i64("label"),
            Err(SceneError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn props_serialize_as_a_plain_map() {
        let props = Props::new().with("on", true).with("size", 1.5);
        let json = serde_json::to_string(&props).unwrap();
        assert_eq!(json, r#"{"on":true,"size":1.5}"#);
        let back: Props = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get("size"), Some(&PropValue::Float(1.5)));
    }

    #[test]
    fn builtins_are_registered() {
        let registry = ClassRegistry::new();
        assert_eq!(registry.names(), ["Node", "SpriteNode"]);
        assert!(matches!(
            registry.get("Nope"),
            Err(SceneError::UnknownClass(name)) if name == "Nope"
        ));
    }
}
