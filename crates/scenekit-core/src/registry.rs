//! Node registry for managing the nodes of a scene.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Result, SceneError};
use crate::node::{NodeHandle, NodeId, NodeKind};

/// Registry for managing all nodes in a scene.
///
/// Nodes are organized by kind and then by id. Ids grow monotonically, so
/// iteration within a kind follows creation order.
#[derive(Default)]
pub struct Registry {
    /// Map from kind -> (id -> node)
    nodes: HashMap<NodeKind, BTreeMap<NodeId, NodeHandle>>,
}

impl Registry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node with the registry.
    ///
    /// Returns an error if a node with the same id already exists.
    pub fn register(&mut self, node: NodeHandle) -> Result<()> {
        let id = node.id();
        if self.contains(id) {
            return Err(SceneError::InvalidNodeId(id.to_string()));
        }
        self.nodes.entry(node.kind()).or_default().insert(id, node);
        Ok(())
    }

    /// Gets a node by id.
    pub fn get(&self, id: NodeId) -> Option<&NodeHandle> {
        self.nodes.values().find_map(|m| m.get(&id))
    }

    /// Checks if a node with the given id exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Checks if any node carries the given display name.
    pub fn contains_name(&self, name: &str) -> bool {
        self.iter().any(|n| n.name() == name)
    }

    /// Removes a node by id.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeHandle> {
        self.nodes.values_mut().find_map(|m| m.remove(&id))
    }

    /// Removes all nodes from the registry.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Returns an iterator over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = &NodeHandle> {
        self.nodes.values().flat_map(BTreeMap::values)
    }

    /// Returns the total number of registered nodes.
    pub fn len(&self) -> usize {
        self.nodes.values().map(BTreeMap::len).sum()
    }

    /// Returns true if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.values().all(BTreeMap::is_empty)
    }

    /// Returns all nodes of a given kind, oldest first.
    pub fn get_all_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &NodeHandle> {
        self.nodes.get(&kind).into_iter().flat_map(BTreeMap::values)
    }

    /// Returns the oldest node of a given kind.
    pub fn first_of_kind(&self, kind: NodeKind) -> Option<&NodeHandle> {
        self.get_all_of_kind(kind).next()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").field("len", &self.len()).finish()
    }
}
