//! Fiducial generator module.
//!
//! Creates a fiducial list with random control points and keeps a label
//! showing its name and point count.

use rand::Rng;

use crate::markups::random_points;
use crate::{
    add_markups_fiducial, DVec3, EventKind, MarkupsHandle, ModuleInfo, ModuleView,
    ModuleWidget, NodeHandle, Options, ParameterStore, PointGeneration, Result, Scene, SceneError,
};

/// Store role of the generated fiducial list.
pub const GENERATED_FIDUCIAL_ROLE: &str = "GeneratedFiducial";

/// Selected color of generated fiducial lists.
pub const GENERATED_COLOR: DVec3 = DVec3::new(0.0, 1.0, 0.0);

const NO_FIDUCIAL_TEXT: &str = "No fiducial node created yet.";

/// Creates fiducial lists filled with random points.
#[derive(Debug, Clone)]
pub struct FiducialGeneratorLogic {
    generation: PointGeneration,
    base_name: String,
}

impl FiducialGeneratorLogic {
    /// Creates the logic with the configured point count, range and name.
    pub fn new(options: &Options) -> Self {
        Self {
            generation: options.fiducial_generation,
            base_name: options.fiducial_base_name.clone(),
        }
    }

    /// Adds a new unlocked, green fiducial list with random points.
    ///
    /// The name is unique in the scene. Nothing is added if the configured
    /// range cannot be sampled.
    pub fn create_random_fiducial_node<R: Rng + ?Sized>(
        &self,
        scene: &Scene,
        rng: &mut R,
    ) -> Result<MarkupsHandle> {
        let points = random_points(rng, self.generation.count, self.generation.half_range)?;
        let name = scene.generate_unique_name(&self.base_name);
        let fiducial = add_markups_fiducial(scene, name);

        let was = fiducial.node().start_modify();
        fiducial.set_selected_color(GENERATED_COLOR);
        fiducial.set_locked(false);
        fiducial.replace_control_points(&points);
        fiducial.node().end_modify(was);

        log::info!(
            "created fiducial '{}' with {} points",
            fiducial.name(),
            fiducial.num_control_points()
        );
        Ok(fiducial)
    }
}

/// Controls of the fiducial generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiducialGeneratorView {
    /// Name and point count of the generated list.
    pub info_label: String,
}

impl ModuleView for FiducialGeneratorView {
    const INFO: ModuleInfo = ModuleInfo {
        name: "FiducialGenerator",
        title: "Fiducial Generator",
        category: "Examples",
        contributors: &["scenekit-rs contributors"],
        help_text: "Creates a fiducial list with random points and tracks its point count.",
        acknowledgement: "Teaching example for landmark workflows.",
    };
    const OBSERVED_ROLE: Option<&'static str> = Some(GENERATED_FIDUCIAL_ROLE);
    const OBSERVED_EVENTS: &'static [EventKind] = &EventKind::MARKUPS;

    fn new(_options: &Options) -> Self {
        Self {
            info_label: NO_FIDUCIAL_TEXT.to_string(),
        }
    }

    fn update_from_store(&mut self, _store: &ParameterStore, node: Option<&NodeHandle>) {
        self.update_from_node(node);
    }

    fn update_from_node(&mut self, node: Option<&NodeHandle>) {
        self.info_label = node
            .and_then(|node| MarkupsHandle::from_node(node.clone()).ok())
            .map_or_else(
                || NO_FIDUCIAL_TEXT.to_string(),
                |fiducial| {
                    format!(
                        "Fiducial: {} | Points: {}",
                        fiducial.name(),
                        fiducial.num_control_points()
                    )
                },
            );
    }

    fn clear(&mut self) {
        self.info_label = NO_FIDUCIAL_TEXT.to_string();
    }
}

/// Widget of the fiducial generator module.
pub type FiducialGeneratorWidget = ModuleWidget<FiducialGeneratorView>;

impl ModuleWidget<FiducialGeneratorView> {
    /// Handles the create button with a thread-local random source.
    pub fn on_create_fiducial_clicked(&self) -> Option<MarkupsHandle> {
        self.create_fiducial_with(&mut rand::thread_rng())
    }

    /// Handles the create button.
    ///
    /// Creates the list and records it in the store, which moves the label
    /// over to the new list. Fails with a notice when the module is not
    /// entered, since there is no store to record the list in.
    pub fn create_fiducial_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<MarkupsHandle> {
        let context = self.context();
        context
            .notices()
            .try_with_error_display("Failed to create fiducial node.", || {
                let store = self
                    .bridge()
                    .store()
                    .ok_or_else(|| SceneError::NotAttached(self.info().name.to_string()))?;
                let logic = FiducialGeneratorLogic::new(context.options());
                let fiducial = logic.create_random_fiducial_node(context.scene(), rng)?;
                store.set_node_reference_id(GENERATED_FIDUCIAL_ROLE, Some(fiducial.id()));
                Ok(fiducial)
            })
    }

    /// Returns the generated fiducial list the label follows.
    pub fn generated_fiducial(&self) -> Option<MarkupsHandle> {
        self.bridge()
            .observed_node()
            .and_then(|node| MarkupsHandle::from_node(node).ok())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::{Context, NoticeLevel};

    #[test]
    fn test_create_random_fiducial_node() {
        let scene = Scene::new();
        let logic = FiducialGeneratorLogic::new(&Options::default());
        let mut rng = StdRng::seed_from_u64(1);

        let fiducial = logic.create_random_fiducial_node(&scene, &mut rng).unwrap();

        assert_eq!(fiducial.name(), "RandomFiducial");
        assert_eq!(fiducial.num_control_points(), 5);
        assert!(!fiducial.is_locked());
        assert_eq!(fiducial.selected_color(), GENERATED_COLOR);
        for p in fiducial.control_points() {
            assert!(p.abs().max_element() <= 50.0);
        }
    }

    #[test]
    fn test_generated_names_are_unique() {
        let scene = Scene::new();
        let logic = FiducialGeneratorLogic::new(&Options::default());
        let mut rng = StdRng::seed_from_u64(2);

        let a = logic.create_random_fiducial_node(&scene, &mut rng).unwrap();
        let b = logic.create_random_fiducial_node(&scene, &mut rng).unwrap();

        assert_eq!(a.name(), "RandomFiducial");
        assert_eq!(b.name(), "RandomFiducial_1");
    }

    #[test]
    fn test_creation_is_one_notification() {
        let scene = Scene::new();
        let logic = FiducialGeneratorLogic::new(&Options::default());
        let count = std::rc::Rc::new(std::cell::Cell::new(0));
        let c = std::rc::Rc::clone(&count);
        scene
            .events()
            .subscribe(EventKind::Modified, move |_| c.set(c.get() + 1));

        logic
            .create_random_fiducial_node(&scene, &mut StdRng::seed_from_u64(3))
            .unwrap();

        // The scene reports the new node once.
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_create_without_store_reports_error() {
        let context = Context::new();
        let widget = FiducialGeneratorWidget::new(&context);

        assert!(widget
            .create_fiducial_with(&mut StdRng::seed_from_u64(6))
            .is_none());

        let notice = context.notices().last().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "Failed to create fiducial node.");
        assert_eq!(context.scene().num_nodes(), 0);
    }

    #[test]
    fn test_unsampleable_range_adds_no_node() {
        let options = Options {
            fiducial_generation: PointGeneration {
                count: 5,
                half_range: f64::INFINITY,
            },
            ..Options::default()
        };
        let context = Context::with_options(options);
        let widget = FiducialGeneratorWidget::new(&context);
        widget.enter().unwrap();

        assert!(widget
            .create_fiducial_with(&mut StdRng::seed_from_u64(7))
            .is_none());
        assert_eq!(context.notices().last().unwrap().level, NoticeLevel::Error);
        assert_eq!(context.scene().num_nodes(), 0);
        assert_eq!(widget.view().info_label, "No fiducial node created yet.");
    }

    #[test]
    fn test_widget_label_follows_points() {
        let context = Context::new();
        let widget = FiducialGeneratorWidget::new(&context);
        widget.enter().unwrap();
        assert_eq!(widget.view().info_label, "No fiducial node created yet.");

        let fiducial = widget
            .create_fiducial_with(&mut StdRng::seed_from_u64(4))
            .unwrap();
        assert_eq!(
            widget.view().info_label,
            "Fiducial: RandomFiducial | Points: 5"
        );

        fiducial.add_control_point(DVec3::ZERO);
        assert_eq!(
            widget.view().info_label,
            "Fiducial: RandomFiducial | Points: 6"
        );
        assert!(widget
            .generated_fiducial()
            .is_some_and(|g| g.id() == fiducial.id()));
    }

    #[test]
    fn test_exit_stops_updates_and_enter_resumes() {
        let context = Context::new();
        let widget = FiducialGeneratorWidget::new(&context);
        widget.enter().unwrap();
        let fiducial = widget
            .create_fiducial_with(&mut StdRng::seed_from_u64(5))
            .unwrap();

        widget.exit();
        assert_eq!(fiducial.node().events().subscriber_count(), 0);
        fiducial.add_control_point(DVec3::ZERO);
        assert!(widget.view().info_label.ends_with("Points: 5"));

        widget.enter().unwrap();
        assert!(widget.view().info_label.ends_with("Points: 6"));
        fiducial.add_control_point(DVec3::ZERO);
        assert!(widget.view().info_label.ends_with("Points: 7"));
    }
}
