//! Core abstractions for scenekit-rs.
//!
//! This crate provides the fundamental types used throughout scenekit-rs:
//! - [`Subject`] for synchronous publish/subscribe with batched notifications
//! - [`ParameterStore`] for per-module persisted parameters and node references
//! - [`Node`] trait and [`NodeHandle`] for data living in a scene
//! - [`Scene`] owning nodes and stores for one open document
//! - Configuration [`Options`]

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod events;
pub mod node;
pub mod options;
pub mod parameters;
pub mod registry;
pub mod scene;

pub use error::{Result, SceneError};
pub use events::{EventKind, Subject, SubscriptionId};
pub use node::{Node, NodeHandle, NodeId, NodeKind, WeakNodeHandle};
pub use options::{check_half_range, Options, PointGeneration, MAX_HALF_RANGE};
pub use parameters::{ParameterStore, StoreSnapshot};
pub use registry::Registry;
pub use scene::Scene;

// Re-export glam types for convenience
pub use glam::{DVec3, UVec3};
