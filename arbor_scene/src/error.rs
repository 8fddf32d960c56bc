// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use thiserror::Error;

use crate::types::NodeId;

/// Errors from constructing, loading or reordering nodes.
///
/// A failed construction leaves no partial node behind.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    /// The requested parent has been removed.
    #[error("parent node {0:?} is not alive")]
    StaleParent(NodeId),
    /// The requested parent cannot hold children.
    #[error("node {parent:?} of class `{class}` cannot hold children")]
    LeafParent {
        /// The refused parent.
        parent: NodeId,
        /// Its class.
        class: &'static str,
    },
    /// No class is registered under this name.
    #[error("unknown node class `{0}`")]
    UnknownClass(String),
    /// A constructor argument is missing or has the wrong type.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Argument name.
        name: String,
        /// What was wrong with it.
        reason: String,
    },
    /// A record names a parent that does not precede it.
    #[error("record {index} refers to parent record {parent}, which does not precede it")]
    RecordParent {
        /// Index of the offending record.
        index: usize,
        /// The parent index it named.
        parent: usize,
    },
    /// The two nodes do not share a parent.
    #[error("{node:?} and {other:?} are not siblings")]
    NotSibling {
        /// The node being moved.
        node: NodeId,
        /// The intended neighbor.
        other: NodeId,
    },
    /// The node has been removed.
    #[error("node {0:?} is not alive")]
    StaleNode(NodeId),
}

impl SceneError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}

/// A failure inside one node's `update` or `paint`.
///
/// The scene isolates it: the node is marked faulted and drawn as a placeholder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct NodeError(pub String);

impl NodeError {
    /// Creates an error with a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Malformed engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON could not be parsed into a configuration.
    #[error("failed to parse engine configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field parsed but holds an unusable value.
    #[error("invalid engine configuration: {0}")]
    Invalid(String),
}
