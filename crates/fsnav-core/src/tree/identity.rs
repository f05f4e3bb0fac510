//! Canonical key → node index.

use std::collections::HashMap;

use super::arena::NodeId;

/// Index guaranteeing at most one node per canonical key.
///
/// The map only indexes; node lifetime is owned by the tree.
#[derive(Debug, Default)]
pub struct IdentityMap {
    nodes: HashMap<String, NodeId>,
}

impl IdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node registered under `key`, if any.
    pub fn resolve(&self, key: &str) -> Option<NodeId> {
        self.nodes.get(key).copied()
    }

    /// Registers `id` under `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is already registered: two live nodes for one location
    /// is a bug in the caller.
    pub fn register(&mut self, key: &str, id: NodeId) {
        let previous = self.nodes.insert(key.to_string(), id);
        assert!(
            previous.is_none(),
            "identity map already holds a node for key {key:?}"
        );
    }

    /// Removes `key`, returning the node it pointed at.
    pub fn unregister(&mut self, key: &str) -> Option<NodeId> {
        self.nodes.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}
