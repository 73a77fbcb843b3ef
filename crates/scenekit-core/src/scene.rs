//! The document scene.
//!
//! A [`Scene`] owns every node of an open document together with one
//! singleton [`ParameterStore`] per module. It is passed explicitly to the
//! code that needs it; there is no process-wide scene.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::error::{Result, SceneError};
use crate::events::{EventKind, Subject};
use crate::node::{Node, NodeHandle, NodeId, NodeKind};
use crate::parameters::{ParameterStore, StoreSnapshot};
use crate::registry::Registry;

#[derive(Default)]
struct SceneInner {
    registry: RefCell<Registry>,
    stores: RefCell<BTreeMap<String, Rc<ParameterStore>>>,
    events: Subject,
    next_serial: Cell<u64>,
}

/// Shared handle to a document scene.
///
/// Cloning is cheap; all clones refer to the same scene.
#[derive(Clone, Default)]
pub struct Scene {
    inner: Rc<SceneInner>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the scene event subject.
    ///
    /// Emits [`EventKind::StartClose`] and [`EventKind::EndClose`] around
    /// [`Scene::close`], and [`EventKind::Modified`] when nodes are added or
    /// removed.
    pub fn events(&self) -> &Subject {
        &self.inner.events
    }

    /// Adds a node and returns its handle.
    pub fn add_node(&self, node: Box<dyn Node>) -> NodeHandle {
        let serial = self.inner.next_serial.get() + 1;
        self.inner.next_serial.set(serial);
        let handle = NodeHandle::new(NodeId::new(serial), node);

        log::info!(
            "added {:?} node '{}' as {}",
            handle.kind(),
            handle.name(),
            handle.id()
        );
        // Serials are never reused, so registration cannot collide.
        let _ = self.inner.registry.borrow_mut().register(handle.clone());
        self.inner.events.emit(EventKind::Modified);
        handle
    }

    /// Gets a node by id.
    pub fn node(&self, id: NodeId) -> Option<NodeHandle> {
        self.inner.registry.borrow().get(id).cloned()
    }

    /// Gets a node by id, failing if it is missing.
    pub fn require_node(&self, id: NodeId) -> Result<NodeHandle> {
        self.node(id).ok_or(SceneError::NodeNotFound(id))
    }

    /// Removes a node. Returns whether it existed.
    pub fn remove_node(&self, id: NodeId) -> bool {
        let removed = self.inner.registry.borrow_mut().remove(id);
        match removed {
            Some(handle) => {
                log::info!("removed node '{}' ({id})", handle.name());
                self.inner.events.emit(EventKind::Modified);
                true
            }
            None => false,
        }
    }

    /// Returns the oldest node of a kind.
    pub fn first_node_of_kind(&self, kind: NodeKind) -> Option<NodeHandle> {
        self.inner.registry.borrow().first_of_kind(kind).cloned()
    }

    /// Returns all nodes of a kind, oldest first.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> Vec<NodeHandle> {
        self.inner
            .registry
            .borrow()
            .get_all_of_kind(kind)
            .cloned()
            .collect()
    }

    /// Returns the number of nodes in the scene.
    pub fn num_nodes(&self) -> usize {
        self.inner.registry.borrow().len()
    }

    /// Returns a node name based on `base` that no node currently uses.
    ///
    /// `base` itself if free, otherwise `base_1`, `base_2`, ...
    pub fn generate_unique_name(&self, base: &str) -> String {
        let registry = self.inner.registry.borrow();
        if !registry.contains_name(base) {
            return base.to_string();
        }
        (1..)
            .map(|i| format!("{base}_{i}"))
            .find(|candidate| !registry.contains_name(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Returns the singleton parameter store of a module, creating it on first access.
    pub fn parameter_store(&self, module: &str) -> Rc<ParameterStore> {
        let mut stores = self.inner.stores.borrow_mut();
        Rc::clone(stores.entry(module.to_string()).or_insert_with(|| {
            log::debug!("created parameter store for '{module}'");
            Rc::new(ParameterStore::new_singleton(module))
        }))
    }

    /// Returns whether a module's store has been created.
    pub fn has_parameter_store(&self, module: &str) -> bool {
        self.inner.stores.borrow().contains_key(module)
    }

    /// Closes the document.
    ///
    /// Emits [`EventKind::StartClose`], drops every node and store, then
    /// emits [`EventKind::EndClose`]. Stores handed out before the close are
    /// no longer owned by the scene; the next [`Scene::parameter_store`]
    /// call creates a fresh one.
    pub fn close(&self) {
        log::info!("closing scene");
        self.inner.events.emit(EventKind::StartClose);
        self.inner.registry.borrow_mut().clear();
        self.inner.stores.borrow_mut().clear();
        self.inner.events.emit(EventKind::EndClose);
    }

    /// Serializes every parameter store to JSON.
    pub fn save_parameters(&self) -> Result<String> {
        let snapshots: BTreeMap<String, StoreSnapshot> = self
            .inner
            .stores
            .borrow()
            .iter()
            .map(|(name, store)| (name.clone(), store.snapshot()))
            .collect();
        Ok(serde_json::to_string_pretty(&snapshots)?)
    }

    /// Restores parameter stores saved by [`Scene::save_parameters`].
    ///
    /// Each store is replaced in one batch, so observers see one
    /// notification per store.
    pub fn load_parameters(&self, json: &str) -> Result<()> {
        let snapshots: BTreeMap<String, StoreSnapshot> = serde_json::from_str(json)?;
        for (module, snapshot) in snapshots {
            self.parameter_store(&module).restore(snapshot);
        }
        Ok(())
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("nodes", &self.num_nodes())
            .field("stores", &self.inner.stores.borrow().len())
            .finish()
    }
}
