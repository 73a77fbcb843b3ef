//! Node trait and shared node handles.
//!
//! A [`Node`] is a piece of data in the scene, such as a markups fiducial
//! list, a scalar volume or a surface model. The scene stores every node
//! behind a [`NodeHandle`], which pairs the data with the [`Subject`] that
//! announces changes to it.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::str::FromStr;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::SceneError;
use crate::events::Subject;

/// Scene-unique identifier of a node.
///
/// Displayed and serialized as `Node<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct NodeId(u64);

impl NodeId {
    const PREFIX: &'static str = "Node";

    /// Creates an id from its serial number.
    pub const fn new(serial: u64) -> Self {
        Self(serial)
    }

    /// Returns the serial number.
    pub const fn serial(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

impl FromStr for NodeId {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(Self::PREFIX)
            .and_then(|serial| serial.parse().ok())
            .map(Self)
            .ok_or_else(|| SceneError::InvalidNodeId(s.to_string()))
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for NodeId {
    type Error = SceneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The kinds of node a scene can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    /// An ordered list of control points.
    Markups,
    /// A scalar image on a regular grid.
    Volume,
    /// A triangulated surface.
    Model,
}

/// Data stored in the scene.
pub trait Node: Any {
    /// Returns a reference to self as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns a mutable reference to self as `Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Returns the display name of this node.
    fn name(&self) -> &str;

    /// Sets the display name of this node.
    fn set_name(&mut self, name: String);

    /// Returns the kind of this node.
    fn kind(&self) -> NodeKind;

    /// Returns the axis-aligned bounding box in world coordinates.
    ///
    /// Returns `None` if the node has no spatial extent.
    fn bounds(&self) -> Option<(DVec3, DVec3)>;
}

struct NodeCell {
    id: NodeId,
    node: RefCell<Box<dyn Node>>,
    events: Subject,
}

/// Shared, cheaply clonable handle to a node in the scene.
#[derive(Clone)]
pub struct NodeHandle {
    inner: Rc<NodeCell>,
}

impl NodeHandle {
    pub(crate) fn new(id: NodeId, node: Box<dyn Node>) -> Self {
        Self {
            inner: Rc::new(NodeCell {
                id,
                node: RefCell::new(node),
                events: Subject::new(),
            }),
        }
    }

    /// Returns the node id.
    pub fn id(&self) -> NodeId {
        self.inner.id
    }

    /// Returns the node kind.
    pub fn kind(&self) -> NodeKind {
        self.inner.node.borrow().kind()
    }

    /// Returns the display name.
    pub fn name(&self) -> String {
        self.inner.node.borrow().name().to_string()
    }

    /// Renames the node and emits a modified event.
    pub fn set_name(&self, name: impl Into<String>) {
        self.inner.node.borrow_mut().set_name(name.into());
        self.inner.events.emit(crate::events::EventKind::Modified);
    }

    /// Returns the bounding box, if the node has spatial extent.
    pub fn bounds(&self) -> Option<(DVec3, DVec3)> {
        self.inner.node.borrow().bounds()
    }

    /// Returns the event subject of this node.
    pub fn events(&self) -> &Subject {
        &self.inner.events
    }

    /// Opens a batch on this node's events.
    pub fn start_modify(&self) -> bool {
        self.inner.events.start_modify()
    }

    /// Closes a batch opened by [`NodeHandle::start_modify`].
    pub fn end_modify(&self, was_batching: bool) {
        self.inner.events.end_modify(was_batching);
    }

    /// Reads the node as a concrete type.
    ///
    /// Returns `None` if the node is not a `T`. No event is emitted.
    pub fn with<T: Node, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let node = self.inner.node.borrow();
        node.as_any().downcast_ref::<T>().map(f)
    }

    /// Mutates the node as a concrete type.
    ///
    /// Returns `None` if the node is not a `T`. No event is emitted; callers
    /// emit the events that describe their change once the borrow is released.
    pub fn with_mut<T: Node, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut node = self.inner.node.borrow_mut();
        node.as_any_mut().downcast_mut::<T>().map(f)
    }

    /// Returns a non-owning reference to this node.
    pub fn downgrade(&self) -> WeakNodeHandle {
        WeakNodeHandle {
            id: self.inner.id,
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Returns whether both handles point at the same node.
    pub fn ptr_eq(&self, other: &NodeHandle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeHandle")
            .field("id", &self.inner.id)
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish()
    }
}

/// Non-owning reference to a node.
#[derive(Clone, Debug)]
pub struct WeakNodeHandle {
    id: NodeId,
    inner: Weak<NodeCell>,
}

impl WeakNodeHandle {
    /// Returns the id of the referenced node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns a handle if the node is still alive.
    pub fn upgrade(&self) -> Option<NodeHandle> {
        self.inner.upgrade().map(|inner| NodeHandle { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_round_trips_through_string() {
        let id = NodeId::new(42);
        assert_eq!(id.to_string(), "Node42");
        assert_eq!("Node42".parse::<NodeId>().unwrap(), id);
    }

    #[test]
    fn test_node_id_rejects_garbage() {
        assert!("Node".parse::<NodeId>().is_err());
        assert!("Volume3".parse::<NodeId>().is_err());
        assert!("Node-1".parse::<NodeId>().is_err());
    }

    #[test]
    fn test_node_id_serializes_as_string() {
        let json = serde_json::to_string(&NodeId::new(7)).unwrap();
        assert_eq!(json, "\"Node7\"");
        let back: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, NodeId::new(7));
    }
}
