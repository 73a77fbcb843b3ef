//! Error types for scenekit-rs.

use thiserror::Error;

use crate::node::{NodeId, NodeKind};

/// The main error type for scenekit-rs operations.
#[derive(Error, Debug)]
pub enum SceneError {
    /// A parameter store that is not the module's singleton was handed to a widget.
    #[error("parameter store '{0}' is not a singleton")]
    NotSingleton(String),

    /// A module action needs the module's parameter store, but none is attached.
    #[error("module '{0}' has no parameter store attached")]
    NotAttached(String),

    /// A node with the given id is not part of the scene.
    #[error("node '{0}' not found")]
    NodeNotFound(NodeId),

    /// A node exists but is not of the kind the operation needs.
    #[error("node '{id}' is a {actual:?} node, expected {expected:?}")]
    WrongNodeKind {
        id: NodeId,
        expected: NodeKind,
        actual: NodeKind,
    },

    /// A control point index past the end of the point list.
    #[error("control point index {index} out of range (node has {len} points)")]
    PointIndexOutOfRange { index: usize, len: usize },

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Reset was requested but nothing was stored to reset to.
    #[error("no stored positions to restore")]
    NoStoredSnapshot,

    /// A stored parameter could not be interpreted.
    #[error("invalid value '{value}' for parameter '{key}'")]
    InvalidParameter { key: String, value: String },

    /// A node identifier string could not be parsed.
    #[error("invalid node id '{0}'")]
    InvalidNodeId(String),

    /// Failed to load a model file.
    #[error("model load error: {0}")]
    ModelLoad(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for scenekit-rs operations.
pub type Result<T> = std::result::Result<T, SceneError>;
