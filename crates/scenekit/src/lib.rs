//! scenekit-rs: observer-synchronized teaching modules for a medical-imaging scene.
//!
//! Each module pairs a plain view struct with a persisted parameter store and,
//! optionally, one observed data node. A generic [`ModuleWidget`] keeps the
//! three consistent, while a stateless logic struct does the actual work.
//!
//! # Quick Start
//!
//! ```
//! use scenekit::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let context = Context::new();
//!     let monitor = LandmarkMonitorWidget::new(&context);
//!     monitor.enter()?;
//!
//!     // Add a fiducial list and select it in the monitor
//!     let fiducial = add_markups_fiducial(context.scene(), "F");
//!     monitor.select_fiducial(Some(fiducial.id()));
//!
//!     // The view follows the node
//!     fiducial.add_control_point(DVec3::new(1.0, 2.0, 3.0));
//!     assert_eq!(monitor.view().count_label, "Fiducial: F | Points: 1");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - A **scene** owns data nodes and one singleton **parameter store** per
//!   module.
//! - An [`ObserverBridge`] subscribes to the store and to the node the store
//!   references, renders the view on change and writes user edits back in
//!   one batch.
//! - A [`ModuleWidget`] attaches the bridge when the module is entered and
//!   follows the scene through close.
//!
//! # Modules
//!
//! - [`FiducialGeneratorWidget`] - Create a fiducial list with random points
//! - [`NodeInspectorWidget`] - Show dimensions, spacing and scalar range
//! - [`LandmarkMonitorWidget`] - Watch, lock, generate and reset landmarks
//! - [`PersistentGuiStateWidget`] - Keep a slider and a checkbox persisted
//! - [`SurfaceMeasurementWidget`] - Measure area, bounds and center of mass

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Handles return values the caller may ignore
#![allow(clippy::must_use_candidate)]
// Logic structs keep &self methods for a uniform call style
#![allow(clippy::unused_self)]

mod bridge;
mod context;
mod fiducial_generator;
mod landmark_monitor;
mod markups;
mod model;
mod module;
mod node_inspector;
mod notice;
mod persistent_state;
mod surface_measurement;
mod volume;

// Re-export core types
pub use scenekit_core::{
    error::{Result, SceneError},
    events::{EventKind, Subject, SubscriptionId},
    node::{Node, NodeHandle, NodeId, NodeKind, WeakNodeHandle},
    options::{Options, PointGeneration, MAX_HALF_RANGE},
    parameters::{ParameterStore, StoreSnapshot},
    scene::Scene,
    DVec3, UVec3,
};

// Re-export node types
pub use scenekit_structures::{ImageData, MarkupsFiducial, ScalarVolume, SurfaceModel};

pub use bridge::{ModuleView, ObserverBridge, WeakBridge};
pub use context::Context;
pub use module::{module_catalog, ModuleInfo, ModuleWidget};
pub use notice::{Notice, NoticeLevel, Notices};

pub use markups::{add_markups_fiducial, get_markups_fiducial, random_points, MarkupsHandle};
pub use model::{add_surface_model, ModelHandle};
pub use volume::{add_scalar_volume, VolumeHandle};

pub use fiducial_generator::{
    FiducialGeneratorLogic, FiducialGeneratorView, FiducialGeneratorWidget, GENERATED_COLOR,
    GENERATED_FIDUCIAL_ROLE,
};
pub use landmark_monitor::{
    decode_positions, encode_positions, LandmarkMonitorLogic, LandmarkMonitorView,
    LandmarkMonitorWidget, HAS_AUTO_GENERATED_KEY, SELECTED_FIDUCIAL_ROLE, STORED_POSITIONS_KEY,
};
pub use node_inspector::{
    Dimensions, InspectedNode, NodeInspectorLogic, NodeInspectorView, NodeInspectorWidget,
    NodeProperties, INPUT_NODE_ROLE,
};
pub use persistent_state::{
    format_bool, format_float, PersistentGuiStateLogic, PersistentGuiStateView,
    PersistentGuiStateWidget, INVERT_KEY, THRESHOLD_KEY,
};
pub use surface_measurement::{
    SurfaceMeasurementLogic, SurfaceMeasurementView, SurfaceMeasurementWidget,
    SurfaceMeasurements, SELECTED_SURFACE_ROLE,
};

/// Initializes logging from the `RUST_LOG` environment variable.
///
/// Safe to call more than once; later calls do nothing.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
