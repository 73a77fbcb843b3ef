//! Property tests for the markups operations.

use std::cell::Cell;
use std::rc::Rc;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use scenekit::*;

fn logic_with(count: usize, half_range: f64) -> LandmarkMonitorLogic {
    let options = Options {
        landmark_generation: PointGeneration { count, half_range },
        ..Options::default()
    };
    LandmarkMonitorLogic::new(&options)
}

proptest! {
    #[test]
    fn generated_points_match_node(count in 0usize..40, half_range in 0.0f64..200.0, seed: u64) {
        let scene = Scene::new();
        let fiducial = add_markups_fiducial(&scene, "F");
        fiducial.add_control_point(DVec3::splat(1000.0));
        let logic = logic_with(count, half_range);

        let positions = logic
            .auto_generate_landmarks(&fiducial, &mut StdRng::seed_from_u64(seed))
            .unwrap();

        prop_assert_eq!(positions.len(), count);
        prop_assert_eq!(fiducial.num_control_points(), count);
        prop_assert_eq!(fiducial.control_points(), positions.clone());
        for p in positions {
            prop_assert!(p.abs().max_element() <= half_range);
        }
    }

    #[test]
    fn restore_reproduces_generated_points(count in 1usize..20, seed: u64, noise in -500.0f64..500.0) {
        let scene = Scene::new();
        let fiducial = add_markups_fiducial(&scene, "F");
        let logic = logic_with(count, 30.0);

        let generated = logic
            .auto_generate_landmarks(&fiducial, &mut StdRng::seed_from_u64(seed))
            .unwrap();
        for i in 0..count {
            fiducial.set_control_point(i, DVec3::splat(noise)).unwrap();
        }
        logic.reset_landmarks(&fiducial, &generated);

        prop_assert_eq!(fiducial.control_points(), generated);
    }

    #[test]
    fn double_lock_toggle_restores_state(initial: bool) {
        let scene = Scene::new();
        let fiducial = add_markups_fiducial(&scene, "F");
        fiducial.set_locked(initial);
        let logic = logic_with(5, 30.0);

        logic.set_fiducial_locked(&fiducial, !initial);
        logic.set_fiducial_locked(&fiducial, initial);

        prop_assert_eq!(fiducial.is_locked(), initial);
    }

    #[test]
    fn store_batch_notifies_once(values in proptest::collection::vec("[a-z]{1,8}", 1..12)) {
        let scene = Scene::new();
        let store = scene.parameter_store("Batch");
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        store.events().subscribe(EventKind::Modified, move |_| c.set(c.get() + 1));

        let was = store.start_modify();
        for (i, value) in values.iter().enumerate() {
            store.set_parameter(format!("key{i}"), value.clone());
        }
        store.end_modify(was);

        prop_assert_eq!(count.get(), 1);
        for (i, value) in values.iter().enumerate() {
            let key = format!("key{i}");
            let actual = store.parameter(&key);
            prop_assert_eq!(actual.as_deref(), Some(value.as_str()));
        }
    }
}

#[test]
fn spacing_and_range_unavailable_for_surfaces() {
    let scene = Scene::new();
    let model = add_surface_model(&scene, SurfaceModel::sphere("S", 3.0, 12, 12));
    let inspected = InspectedNode::resolve(model.node().clone());

    let properties = NodeInspectorLogic.inspect(&inspected);
    assert_eq!(properties.spacing, None);
    assert_eq!(properties.scalar_range, None);
    assert!(matches!(properties.dimensions, Dimensions::Extent(_)));
}
