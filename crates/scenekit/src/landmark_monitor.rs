//! Live landmark monitor module.
//!
//! Watches a fiducial list's point count and lock state. Points can be
//! replaced by random ones, and the last random set can be restored after
//! the user moved points around.

use rand::Rng;

use crate::markups::random_points;
use crate::{
    DVec3, EventKind, MarkupsHandle, ModuleInfo, ModuleView, ModuleWidget, NodeHandle, NodeId,
    Options, ParameterStore, PointGeneration, Result,
};

/// Store role of the monitored fiducial list.
pub const SELECTED_FIDUCIAL_ROLE: &str = "SelectedFiducial";

/// Store key of the last generated positions, as a JSON array of triples.
pub const STORED_POSITIONS_KEY: &str = "StoredPositions";

/// Store key set to `"1"` once positions have been generated.
pub const HAS_AUTO_GENERATED_KEY: &str = "HasAutoGenerated";

const NO_FIDUCIAL_TEXT: &str = "Fiducial: - | Points: 0";

/// Encodes positions as a JSON array of `[x, y, z]` triples.
pub fn encode_positions(positions: &[DVec3]) -> Result<String> {
    let triples: Vec<[f64; 3]> = positions.iter().map(|p| p.to_array()).collect();
    Ok(serde_json::to_string(&triples)?)
}

/// Decodes positions written by [`encode_positions`].
pub fn decode_positions(json: &str) -> Result<Vec<DVec3>> {
    let triples: Vec<[f64; 3]> = serde_json::from_str(json)?;
    Ok(triples.into_iter().map(DVec3::from_array).collect())
}

/// Operations on the monitored fiducial list.
#[derive(Debug, Clone, Copy)]
pub struct LandmarkMonitorLogic {
    generation: PointGeneration,
}

impl LandmarkMonitorLogic {
    /// Creates the logic with the configured point count and range.
    pub fn new(options: &Options) -> Self {
        Self {
            generation: options.landmark_generation,
        }
    }

    /// Locks or unlocks the list. Setting the current state emits nothing.
    pub fn set_fiducial_locked(&self, fiducial: &MarkupsHandle, locked: bool) {
        let was = fiducial.node().start_modify();
        fiducial.set_locked(locked);
        fiducial.node().end_modify(was);
    }

    /// Replaces the points with random ones and returns them in order.
    ///
    /// Fails without touching the node if the configured range cannot be
    /// sampled.
    pub fn auto_generate_landmarks<R: Rng + ?Sized>(
        &self,
        fiducial: &MarkupsHandle,
        rng: &mut R,
    ) -> Result<Vec<DVec3>> {
        let positions = random_points(rng, self.generation.count, self.generation.half_range)?;
        fiducial.replace_control_points(&positions);
        log::debug!(
            "generated {} landmarks on '{}'",
            positions.len(),
            fiducial.name()
        );
        Ok(positions)
    }

    /// Replaces the points with `positions`, in order.
    ///
    /// An empty list leaves the node untouched.
    pub fn reset_landmarks(&self, fiducial: &MarkupsHandle, positions: &[DVec3]) {
        if positions.is_empty() {
            return;
        }
        fiducial.replace_control_points(positions);
        log::debug!(
            "restored {} landmarks on '{}'",
            positions.len(),
            fiducial.name()
        );
    }
}

/// Controls of the landmark monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandmarkMonitorView {
    /// Fiducial list chosen in the selector.
    pub selected_fiducial: Option<NodeId>,
    /// Name and point count of the monitored list.
    pub count_label: String,
    /// Checked when the points may be moved, i.e. the list is unlocked.
    pub edit_mode_checked: bool,
    pub edit_mode_enabled: bool,
    pub auto_generate_enabled: bool,
    pub reset_enabled: bool,
}

impl LandmarkMonitorView {
    fn set_enabled(&mut self, enabled: bool) {
        self.edit_mode_enabled = enabled;
        self.auto_generate_enabled = enabled;
        self.reset_enabled = enabled;
    }
}

impl ModuleView for LandmarkMonitorView {
    const INFO: ModuleInfo = ModuleInfo {
        name: "LiveLandmarkMonitor",
        title: "Live Landmark Monitor",
        category: "Examples",
        contributors: &["scenekit-rs contributors"],
        help_text: "Monitors the points of a fiducial list and toggles whether they can be moved.",
        acknowledgement: "Teaching example for node observers.",
    };
    const OBSERVED_ROLE: Option<&'static str> = Some(SELECTED_FIDUCIAL_ROLE);
    const OBSERVED_EVENTS: &'static [EventKind] = &EventKind::MARKUPS;

    fn new(_options: &Options) -> Self {
        Self {
            selected_fiducial: None,
            count_label: NO_FIDUCIAL_TEXT.to_string(),
            edit_mode_checked: false,
            edit_mode_enabled: false,
            auto_generate_enabled: false,
            reset_enabled: false,
        }
    }

    fn update_from_store(&mut self, _store: &ParameterStore, node: Option<&NodeHandle>) {
        self.selected_fiducial = node.map(NodeHandle::id);
        self.update_from_node(node);
    }

    fn update_from_node(&mut self, node: Option<&NodeHandle>) {
        let fiducial = node.and_then(|node| MarkupsHandle::from_node(node.clone()).ok());
        self.set_enabled(fiducial.is_some());
        match fiducial {
            Some(fiducial) => {
                self.count_label = format!(
                    "Fiducial: {} | Points: {}",
                    fiducial.name(),
                    fiducial.num_control_points()
                );
                self.edit_mode_checked = !fiducial.is_locked();
            }
            None => {
                self.count_label = NO_FIDUCIAL_TEXT.to_string();
                self.edit_mode_checked = false;
            }
        }
    }

    fn write_to_store(&self, store: &ParameterStore) {
        store.set_node_reference_id(SELECTED_FIDUCIAL_ROLE, self.selected_fiducial);
    }

    fn clear(&mut self) {
        self.selected_fiducial = None;
        self.update_from_node(None);
    }
}

/// Widget of the live landmark monitor module.
pub type LandmarkMonitorWidget = ModuleWidget<LandmarkMonitorView>;

impl ModuleWidget<LandmarkMonitorView> {
    fn logic(&self) -> LandmarkMonitorLogic {
        LandmarkMonitorLogic::new(self.context().options())
    }

    /// Returns the monitored fiducial list.
    pub fn monitored_fiducial(&self) -> Option<MarkupsHandle> {
        self.bridge()
            .observed_node()
            .and_then(|node| MarkupsHandle::from_node(node).ok())
    }

    /// Handles a selection change in the fiducial selector.
    pub fn select_fiducial(&self, id: Option<NodeId>) {
        self.bridge().edit_view(|view| view.selected_fiducial = id);
    }

    /// Handles the edit mode checkbox. Checked unlocks the points.
    pub fn on_edit_mode_toggled(&self, checked: bool) {
        let Some(fiducial) = self.monitored_fiducial() else {
            return;
        };
        self.bridge()
            .update_view(|view| view.edit_mode_checked = checked);
        self.logic().set_fiducial_locked(&fiducial, !checked);
    }

    /// Handles the auto-generate button with a thread-local random source.
    pub fn on_auto_generate_clicked(&self) -> Option<Vec<DVec3>> {
        self.auto_generate_with(&mut rand::thread_rng())
    }

    /// Handles the auto-generate button.
    ///
    /// Replaces the points, remembers them for [`Self::on_reset_clicked`]
    /// and switches edit mode on.
    pub fn auto_generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Vec<DVec3>> {
        let fiducial = self.monitored_fiducial()?;
        let positions = self
            .context()
            .notices()
            .try_with_error_display("Failed to auto-generate landmarks.", || {
                let positions = self.logic().auto_generate_landmarks(&fiducial, rng)?;
                if let Some(store) = self.bridge().store() {
                    let encoded = encode_positions(&positions)?;
                    let was = store.start_modify();
                    store.set_parameter(STORED_POSITIONS_KEY, encoded);
                    store.set_parameter(HAS_AUTO_GENERATED_KEY, "1");
                    store.end_modify(was);
                }
                Ok(positions)
            })?;
        self.on_edit_mode_toggled(true);
        Some(positions)
    }

    /// Handles the reset button.
    ///
    /// Restores the positions stored by the last auto-generate. Without
    /// stored positions an informational notice is shown instead.
    pub fn on_reset_clicked(&self) {
        let (Some(fiducial), Some(store)) = (self.monitored_fiducial(), self.bridge().store())
        else {
            return;
        };
        let Some(stored) = store
            .parameter(STORED_POSITIONS_KEY)
            .filter(|s| !s.is_empty())
        else {
            self.context()
                .notices()
                .info("No auto-generated positions stored to reset to.");
            return;
        };
        self.context()
            .notices()
            .try_with_error_display("Failed to reset landmarks.", || {
                let positions = decode_positions(&stored)?;
                self.logic().reset_landmarks(&fiducial, &positions);
                Ok(())
            });
    }
}
