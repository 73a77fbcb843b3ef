//! Input node inspector module.
//!
//! Shows the dimensions, spacing and scalar range of the selected node.
//! Volumes report voxel counts; any other node with spatial extent reports
//! the size of its bounding box instead.

use std::fmt;

use crate::{
    DVec3, EventKind, ModelHandle, ModuleInfo, ModuleView, ModuleWidget, NodeHandle, NodeId,
    NodeKind, Options, ParameterStore, Scene, UVec3, VolumeHandle,
};

/// Store role of the inspected node.
pub const INPUT_NODE_ROLE: &str = "InputNode";

const PLACEHOLDER: &str = "None";
const UNAVAILABLE: &str = "N/A";

/// A node resolved to the capability the inspector uses.
#[derive(Debug, Clone)]
pub enum InspectedNode {
    /// A scalar volume.
    Volume(VolumeHandle),
    /// A surface model.
    Surface(ModelHandle),
    /// Anything else; only its bounds are used.
    Other(NodeHandle),
}

impl InspectedNode {
    /// Resolves a node's kind once.
    pub fn resolve(node: NodeHandle) -> Self {
        match node.kind() {
            NodeKind::Volume => match VolumeHandle::from_node(node.clone()) {
                Ok(volume) => Self::Volume(volume),
                Err(_) => Self::Other(node),
            },
            NodeKind::Model => match ModelHandle::from_node(node.clone()) {
                Ok(model) => Self::Surface(model),
                Err(_) => Self::Other(node),
            },
            NodeKind::Markups => Self::Other(node),
        }
    }

    /// Returns the underlying node.
    pub fn node(&self) -> &NodeHandle {
        match self {
            Self::Volume(volume) => volume.node(),
            Self::Surface(model) => model.node(),
            Self::Other(node) => node,
        }
    }
}

/// Size of a node as shown by the inspector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimensions {
    /// Voxel counts of a volume with image data.
    Voxels(UVec3),
    /// Size of the bounding box, for nodes without a voxel grid.
    Extent(DVec3),
    /// The node has neither a voxel grid nor bounds.
    Unavailable,
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Voxels(d) => write!(f, "({}, {}, {})", d.x, d.y, d.z),
            Self::Extent(e) => write!(f, "({:.3}, {:.3}, {:.3})", e.x, e.y, e.z),
            Self::Unavailable => f.write_str(UNAVAILABLE),
        }
    }
}

/// Everything the inspector reports about a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeProperties {
    /// Voxel counts or bounding box size.
    pub dimensions: Dimensions,
    /// Voxel spacing; volumes only.
    pub spacing: Option<DVec3>,
    /// Minimum and maximum voxel value; volumes with image data only.
    pub scalar_range: Option<(f64, f64)>,
}

/// Reads node properties. Never fails: missing data is reported as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeInspectorLogic;

impl NodeInspectorLogic {
    /// Returns voxel counts, the bounds extent, or [`Dimensions::Unavailable`].
    pub fn dimensions(&self, node: &InspectedNode) -> Dimensions {
        if let InspectedNode::Volume(volume) = node {
            if let Some(dims) = volume.image_dimensions() {
                return Dimensions::Voxels(dims);
            }
        }
        node.node()
            .bounds()
            .map_or(Dimensions::Unavailable, |(min, max)| {
                Dimensions::Extent(max - min)
            })
    }

    /// Returns the voxel spacing of a volume.
    pub fn spacing(&self, node: &InspectedNode) -> Option<DVec3> {
        match node {
            InspectedNode::Volume(volume) => Some(volume.spacing()),
            _ => None,
        }
    }

    /// Returns the scalar range of a volume with image data.
    pub fn scalar_range(&self, node: &InspectedNode) -> Option<(f64, f64)> {
        match node {
            InspectedNode::Volume(volume) => volume.scalar_range(),
            _ => None,
        }
    }

    /// Collects all properties of a node.
    pub fn inspect(&self, node: &InspectedNode) -> NodeProperties {
        NodeProperties {
            dimensions: self.dimensions(node),
            spacing: self.spacing(node),
            scalar_range: self.scalar_range(node),
        }
    }
}

/// Controls of the node inspector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInspectorView {
    /// Node chosen in the selector.
    pub selected_node: Option<NodeId>,
    pub dimensions_label: String,
    pub spacing_label: String,
    pub scalar_range_label: String,
}

impl NodeInspectorView {
    fn show_placeholder(&mut self) {
        self.dimensions_label = PLACEHOLDER.to_string();
        self.spacing_label = PLACEHOLDER.to_string();
        self.scalar_range_label = PLACEHOLDER.to_string();
    }

    fn show(&mut self, properties: &NodeProperties) {
        self.dimensions_label = properties.dimensions.to_string();
        self.spacing_label = properties
            .spacing
            .map_or_else(
                || UNAVAILABLE.to_string(),
                |s| format!("({:.3}, {:.3}, {:.3})", s.x, s.y, s.z),
            );
        self.scalar_range_label = properties
            .scalar_range
            .map_or_else(
                || UNAVAILABLE.to_string(),
                |(min, max)| format!("[{min:.1}, {max:.1}]"),
            );
    }
}

impl ModuleView for NodeInspectorView {
    const INFO: ModuleInfo = ModuleInfo {
        name: "InputNodeInspector",
        title: "Input Node Inspector",
        category: "Examples",
        contributors: &["scenekit-rs contributors"],
        help_text: "Displays dimensions, spacing and scalar range of the selected node.",
        acknowledgement: "Teaching example for node selection.",
    };
    const OBSERVED_ROLE: Option<&'static str> = Some(INPUT_NODE_ROLE);
    const OBSERVED_EVENTS: &'static [EventKind] = &EventKind::MARKUPS;

    fn new(_options: &Options) -> Self {
        Self {
            selected_node: None,
            dimensions_label: PLACEHOLDER.to_string(),
            spacing_label: PLACEHOLDER.to_string(),
            scalar_range_label: PLACEHOLDER.to_string(),
        }
    }

    fn initialize(&self, scene: &Scene, store: &ParameterStore) {
        if store.node_reference_id(INPUT_NODE_ROLE).is_none() {
            if let Some(volume) = scene.first_node_of_kind(NodeKind::Volume) {
                log::debug!("selecting first volume '{}'", volume.name());
                store.set_node_reference_id(INPUT_NODE_ROLE, Some(volume.id()));
            }
        }
    }

    fn update_from_store(&mut self, _store: &ParameterStore, node: Option<&NodeHandle>) {
        self.selected_node = node.map(NodeHandle::id);
        self.update_from_node(node);
    }

    fn update_from_node(&mut self, node: Option<&NodeHandle>) {
        match node {
            Some(node) => {
                let inspected = InspectedNode::resolve(node.clone());
                self.show(&NodeInspectorLogic.inspect(&inspected));
            }
            None => self.show_placeholder(),
        }
    }

    fn write_to_store(&self, store: &ParameterStore) {
        store.set_node_reference_id(INPUT_NODE_ROLE, self.selected_node);
    }

    fn clear(&mut self) {
        self.selected_node = None;
        self.show_placeholder();
    }
}

/// Widget of the input node inspector module.
pub type NodeInspectorWidget = ModuleWidget<NodeInspectorView>;

impl ModuleWidget<NodeInspectorView> {
    /// Handles a selection change in the node selector.
    pub fn select_input_node(&self, id: Option<NodeId>) {
        self.bridge().edit_view(|view| view.selected_node = id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{add_markups_fiducial, add_scalar_volume, add_surface_model, Context, ScalarVolume, SurfaceModel};

    #[test]
    fn test_volume_properties() {
        let scene = Scene::new();
        let volume = add_scalar_volume(
            &scene,
            ScalarVolume::gradient("V", UVec3::new(4, 5, 6), DVec3::new(0.5, 0.75, 1.25)),
        );
        let inspected = InspectedNode::resolve(volume.node().clone());
        assert!(matches!(inspected, InspectedNode::Volume(_)));

        let properties = NodeInspectorLogic.inspect(&inspected);
        assert_eq!(properties.dimensions, Dimensions::Voxels(UVec3::new(4, 5, 6)));
        assert_eq!(properties.spacing, Some(DVec3::new(0.5, 0.75, 1.25)));
        assert_eq!(properties.scalar_range, Some((0.0, 12.0)));
    }

    #[test]
    fn test_surface_reports_extent_only() {
        let scene = Scene::new();
        let model = add_surface_model(&scene, SurfaceModel::sphere("S", 2.0, 16, 16));
        let inspected = InspectedNode::resolve(model.node().clone());
        assert!(matches!(inspected, InspectedNode::Surface(_)));

        let properties = NodeInspectorLogic.inspect(&inspected);
        match properties.dimensions {
            Dimensions::Extent(e) => assert!((e - DVec3::splat(4.0)).abs().max_element() < 1e-9),
            other => panic!("expected extent, got {other:?}"),
        }
        assert_eq!(properties.spacing, None);
        assert_eq!(properties.scalar_range, None);
    }

    #[test]
    fn test_node_without_bounds_is_unavailable() {
        let scene = Scene::new();
        let empty = add_markups_fiducial(&scene, "F");
        let inspected = InspectedNode::resolve(empty.node().clone());
        assert!(matches!(inspected, InspectedNode::Other(_)));
        assert_eq!(NodeInspectorLogic.dimensions(&inspected), Dimensions::Unavailable);

        let volume = add_scalar_volume(&scene, ScalarVolume::new("no image"));
        let inspected = InspectedNode::resolve(volume.node().clone());
        assert_eq!(NodeInspectorLogic.dimensions(&inspected), Dimensions::Unavailable);
        assert_eq!(NodeInspectorLogic.scalar_range(&inspected), None);
        assert_eq!(NodeInspectorLogic.spacing(&inspected), Some(DVec3::ONE));
    }

    #[test]
    fn test_dimensions_display() {
        assert_eq!(Dimensions::Voxels(UVec3::new(256, 256, 130)).to_string(), "(256, 256, 130)");
        assert_eq!(
            Dimensions::Extent(DVec3::new(1.0, 2.5, 0.125)).to_string(),
            "(1.000, 2.500, 0.125)"
        );
        assert_eq!(Dimensions::Unavailable.to_string(), "N/A");
    }

    #[test]
    fn test_enter_selects_first_volume() {
        let context = Context::new();
        let scene = context.scene();
        add_surface_model(scene, SurfaceModel::sphere("S", 1.0, 8, 8));
        let volume = add_scalar_volume(
            scene,
            ScalarVolume::gradient("V", UVec3::new(2, 3, 4), DVec3::ONE),
        );

        let widget = NodeInspectorWidget::new(&context);
        widget.enter().unwrap();

        let view = widget.view();
        assert_eq!(view.selected_node, Some(volume.id()));
        assert_eq!(view.dimensions_label, "(2, 3, 4)");
        assert_eq!(view.spacing_label, "(1.000, 1.000, 1.000)");
        assert_eq!(view.scalar_range_label, "[0.0, 6.0]");
    }

    #[test]
    fn test_selection_and_node_changes_refresh_labels() {
        let context = Context::new();
        let scene = context.scene();
        let widget = NodeInspectorWidget::new(&context);
        widget.enter().unwrap();
        assert_eq!(widget.view().dimensions_label, "None");

        let model = add_surface_model(scene, SurfaceModel::new("M"));
        widget.select_input_node(Some(model.id()));
        assert_eq!(widget.view().dimensions_label, "N/A");
        assert_eq!(widget.view().spacing_label, "N/A");

        model
            .set_geometry(
                vec![DVec3::ZERO, DVec3::X, DVec3::new(0.0, 2.0, 0.0)],
                vec![[0, 1, 2]],
            )
            .unwrap();
        assert_eq!(widget.view().dimensions_label, "(1.000, 2.000, 0.000)");

        widget.select_input_node(None);
        assert_eq!(widget.view().selected_node, None);
        assert_eq!(widget.view().scalar_range_label, "None");
        assert_eq!(model.node().events().subscriber_count(), 0);
    }

    #[test]
    fn test_point_edits_refresh_markups_extent() {
        let context = Context::new();
        let fiducial = add_markups_fiducial(context.scene(), "F");
        let widget = NodeInspectorWidget::new(&context);
        widget.enter().unwrap();
        widget.select_input_node(Some(fiducial.id()));
        assert_eq!(widget.view().dimensions_label, "N/A");

        fiducial.add_control_point(DVec3::ZERO);
        assert_eq!(widget.view().dimensions_label, "(0.000, 0.000, 0.000)");

        fiducial.add_control_point(DVec3::new(2.0, 4.0, 6.0));
        assert_eq!(widget.view().dimensions_label, "(2.000, 4.000, 6.000)");

        fiducial.set_control_point(1, DVec3::ONE).unwrap();
        assert_eq!(widget.view().dimensions_label, "(1.000, 1.000, 1.000)");

        fiducial.remove_all_control_points();
        assert_eq!(widget.view().dimensions_label, "N/A");
    }
}
