//! Surface measurement module.
//!
//! Computes area, bounding box and center of mass of a surface model on
//! request.

use crate::{
    DVec3, ModelHandle, ModuleInfo, ModuleView, ModuleWidget, NodeHandle, NodeId, Options,
    ParameterStore,
};

/// Store role of the measured surface.
pub const SELECTED_SURFACE_ROLE: &str = "SelectedSurface";

/// Results of one measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMeasurements {
    /// Total triangle area in mm².
    pub area: f64,
    /// `[xmin, xmax, ymin, ymax, zmin, zmax]`.
    pub bounds: [f64; 6],
    /// Unweighted vertex centroid.
    pub center_of_mass: DVec3,
}

impl SurfaceMeasurements {
    /// Returns the size of the bounding box along each axis.
    pub fn extent(&self) -> DVec3 {
        let b = self.bounds;
        DVec3::new(b[1] - b[0], b[3] - b[2], b[5] - b[4])
    }
}

/// Geometric measurements of surface models.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceMeasurementLogic;

impl SurfaceMeasurementLogic {
    /// Returns the surface area; zero without geometry.
    pub fn surface_area(&self, model: &ModelHandle) -> f64 {
        model.surface_area()
    }

    /// Returns the bounds; all zeros without geometry.
    pub fn bounding_box(&self, model: &ModelHandle) -> [f64; 6] {
        model.bounds_array()
    }

    /// Returns the unweighted center of mass; the origin without geometry.
    pub fn center_of_mass(&self, model: &ModelHandle) -> DVec3 {
        model.center_of_mass()
    }

    /// Computes every measurement.
    pub fn measure(&self, model: &ModelHandle) -> SurfaceMeasurements {
        SurfaceMeasurements {
            area: self.surface_area(model),
            bounds: self.bounding_box(model),
            center_of_mass: self.center_of_mass(model),
        }
    }
}

/// Controls of the surface measurement module.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SurfaceMeasurementView {
    /// Surface chosen in the selector.
    pub selected_surface: Option<NodeId>,
    pub area_label: String,
    pub bbox_label: String,
    pub center_label: String,
}

impl SurfaceMeasurementView {
    /// Shows a measurement in the result labels.
    pub fn show(&mut self, m: &SurfaceMeasurements) {
        let e = m.extent();
        let c = m.center_of_mass;
        self.area_label = format!("Area: {:.2} mm²", m.area);
        self.bbox_label = format!("Bounding box: ({:.1}, {:.1}, {:.1}) mm", e.x, e.y, e.z);
        self.center_label = format!("Center of mass: ({:.1}, {:.1}, {:.1})", c.x, c.y, c.z);
    }
}

impl ModuleView for SurfaceMeasurementView {
    const INFO: ModuleInfo = ModuleInfo {
        name: "SurfaceMeasurementTool",
        title: "Surface Measurement Tool",
        category: "Examples",
        contributors: &["scenekit-rs contributors"],
        help_text: "Computes surface area, bounding box and center of mass for model nodes.",
        acknowledgement: "Teaching example for geometry logic.",
    };
    const OBSERVED_ROLE: Option<&'static str> = Some(SELECTED_SURFACE_ROLE);

    fn new(_options: &Options) -> Self {
        Self::default()
    }

    fn update_from_store(&mut self, _store: &ParameterStore, node: Option<&NodeHandle>) {
        self.selected_surface = node.map(NodeHandle::id);
    }

    fn write_to_store(&self, store: &ParameterStore) {
        store.set_node_reference_id(SELECTED_SURFACE_ROLE, self.selected_surface);
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Widget of the surface measurement module.
pub type SurfaceMeasurementWidget = ModuleWidget<SurfaceMeasurementView>;

impl ModuleWidget<SurfaceMeasurementView> {
    /// Handles a selection change in the surface selector.
    pub fn select_surface(&self, id: Option<NodeId>) {
        self.bridge().edit_view(|view| view.selected_surface = id);
    }

    /// Handles the compute button.
    ///
    /// Shows an error notice when nothing is selected or the selection is
    /// not a surface model.
    pub fn on_compute_clicked(&self) -> Option<SurfaceMeasurements> {
        let notices = self.context().notices();
        let Some(node) = self.bridge().observed_node() else {
            notices.error("Please select a surface model node.", None);
            return None;
        };
        let measurements = notices.try_with_error_display("Failed to compute measurements.", || {
            let model = ModelHandle::from_node(node)?;
            Ok(SurfaceMeasurementLogic.measure(&model))
        })?;
        self.bridge().update_view(|view| view.show(&measurements));
        Some(measurements)
    }
}
