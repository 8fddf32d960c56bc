// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Routing table from event kind to the nodes that asked for it.

use hashbrown::HashMap;
use tracing::warn;

use crate::event::{EventKind, EventKinds};
use crate::types::NodeId;

/// Maps each [`EventKind`] to the nodes registered for it, in registration order.
///
/// A node is registered while alive and never after removal.
#[derive(Debug, Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<EventKind, Vec<NodeId>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `id` for every kind in `kinds`. Registering twice is a no-op.
    pub fn register(&mut self, id: NodeId, kinds: EventKinds) {
        for kind in kinds.kinds() {
            let list = self.handlers.entry(kind).or_default();
            if !list.contains(&id) {
                list.push(id);
            }
        }
    }

    /// Unregisters `id` from every kind in `kinds`.
    ///
    /// Kinds the node was not registered for are reported and skipped.
    pub fn unregister(&mut self, id: NodeId, kinds: EventKinds) {
        for kind in kinds.kinds() {
            let removed = self.handlers.get_mut(&kind).is_some_and(|list| {
                let before = list.len();
                list.retain(|h| *h != id);
                list.len() != before
            });
            if !removed {
                warn!(?id, ?kind, "unregistering a handler that was not registered");
            }
        }
    }

    /// Nodes registered for `kind`, in registration order.
    #[must_use]
    pub fn handlers(&self, kind: EventKind) -> &[NodeId] {
        self.handlers.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if `id` is registered for any kind.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.handlers.values().any(|list| list.contains(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::HandlerRegistry;
    use crate::event::{EventKind, EventKinds};
    use crate::types::NodeId;

    #[test]
    fn register_keeps_order_and_dedups() {
        let mut reg = HandlerRegistry::new();
        let a = NodeId::new(0, 1);
        let b = NodeId::new(1, 1);
        reg.register(a, EventKinds::POINTER);
        reg.register(b, EventKinds::POINTER_DOWN);
        reg.register(a, EventKinds::POINTER_DOWN);
        assert_eq!(reg.handlers(EventKind::PointerDown), &[a, b]);
        assert_eq!(reg.handlers(EventKind::PointerMove), &[a]);
        assert!(reg.handlers(EventKind::Expose).is_empty());
    }

    #[test]
    fn unregister_removes_from_every_kind() {
        let mut reg = HandlerRegistry::new();
        let a = NodeId::new(0, 1);
        reg.register(a, EventKinds::POINTER | EventKinds::WHEEL);
        reg.unregister(a, EventKinds::POINTER | EventKinds::WHEEL);
        assert!(!reg.contains(a));
        // Absent handler: diagnostic only.
        reg.unregister(a, EventKinds::KEY_DOWN);
        assert!(!reg.contains(a));
    }
}
