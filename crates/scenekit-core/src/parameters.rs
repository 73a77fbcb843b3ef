//! Per-module parameter stores.
//!
//! A [`ParameterStore`] holds string-valued parameters and named node
//! references for one module. Every write that changes something emits
//! [`EventKind::Modified`]; writes made between
//! [`ParameterStore::start_modify`] and [`ParameterStore::end_modify`]
//! produce a single notification once the batch closes.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SceneError};
use crate::events::{EventKind, Subject};
use crate::node::NodeId;

/// Serializable contents of a parameter store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Scalar parameters, stored as strings.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    /// Node references by role.
    #[serde(default)]
    pub references: BTreeMap<String, NodeId>,
}

/// Key/value and node-reference container owned by a scene.
#[derive(Debug)]
pub struct ParameterStore {
    name: String,
    singleton: bool,
    contents: RefCell<StoreSnapshot>,
    events: Subject,
}

impl ParameterStore {
    /// Creates a standalone, non-singleton store.
    ///
    /// Widgets refuse to attach to such a store; use
    /// [`crate::Scene::parameter_store`] to get a module's singleton.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_singleton(name, false)
    }

    pub(crate) fn new_singleton(name: impl Into<String>) -> Self {
        Self::with_singleton(name, true)
    }

    fn with_singleton(name: impl Into<String>, singleton: bool) -> Self {
        Self {
            name: name.into(),
            singleton,
            contents: RefCell::new(StoreSnapshot::default()),
            events: Subject::new(),
        }
    }

    /// Returns the store name (the owning module's name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether this is the scene-owned singleton for its module.
    pub fn is_singleton(&self) -> bool {
        self.singleton
    }

    /// Returns the event subject of this store.
    pub fn events(&self) -> &Subject {
        &self.events
    }

    /// Opens a batch. See [`Subject::start_modify`].
    pub fn start_modify(&self) -> bool {
        self.events.start_modify()
    }

    /// Closes a batch. See [`Subject::end_modify`].
    pub fn end_modify(&self, was_batching: bool) {
        self.events.end_modify(was_batching);
    }

    /// Returns a parameter value, or `None` if unset.
    pub fn parameter(&self, key: &str) -> Option<String> {
        self.contents.borrow().parameters.get(key).cloned()
    }

    /// Returns whether a parameter is set to a non-empty value.
    pub fn has_parameter(&self, key: &str) -> bool {
        self.contents
            .borrow()
            .parameters
            .get(key)
            .is_some_and(|v| !v.is_empty())
    }

    /// Parses a parameter into `T`.
    ///
    /// Returns `Ok(None)` for an unset or empty parameter and
    /// [`SceneError::InvalidParameter`] if the stored text does not parse.
    pub fn parameter_as<T: FromStr>(&self, key: &str) -> Result<Option<T>> {
        match self.parameter(key) {
            Some(value) if !value.is_empty() => value
                .parse()
                .map(Some)
                .map_err(|_| SceneError::InvalidParameter {
                    key: key.to_string(),
                    value,
                }),
            _ => Ok(None),
        }
    }

    /// Sets a parameter. Emits a modified event if the value changed.
    pub fn set_parameter(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        let changed = {
            let mut contents = self.contents.borrow_mut();
            if contents.parameters.get(&key) == Some(&value) {
                false
            } else {
                contents.parameters.insert(key, value);
                true
            }
        };
        if changed {
            self.events.emit(EventKind::Modified);
        }
    }

    /// Returns the node referenced under `role`.
    pub fn node_reference_id(&self, role: &str) -> Option<NodeId> {
        self.contents.borrow().references.get(role).copied()
    }

    /// Sets or clears the node referenced under `role`.
    ///
    /// Emits a modified event if the reference changed.
    pub fn set_node_reference_id(&self, role: impl Into<String>, id: Option<NodeId>) {
        let role = role.into();
        let changed = {
            let mut contents = self.contents.borrow_mut();
            let previous = match id {
                Some(id) => contents.references.insert(role, id),
                None => contents.references.remove(&role),
            };
            previous != id
        };
        if changed {
            self.events.emit(EventKind::Modified);
        }
    }

    /// Returns a copy of everything in the store.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.contents.borrow().clone()
    }

    /// Replaces the store contents in one batch.
    pub fn restore(&self, snapshot: StoreSnapshot) {
        let changed = {
            let mut contents = self.contents.borrow_mut();
            if *contents == snapshot {
                false
            } else {
                *contents = snapshot;
                true
            }
        };
        if changed {
            self.events.emit(EventKind::Modified);
        }
    }
}
