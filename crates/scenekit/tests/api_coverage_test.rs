//! API coverage integration tests for scenekit-rs.
//!
//! These tests exercise the inspector, the surface tool, configuration and
//! model loading through the public API.

use std::io::Write;

use scenekit::*;

// ========================================================================
// MODULE CATALOG
// ========================================================================

#[test]
fn test_module_catalog() {
    let names: Vec<&str> = module_catalog().iter().map(|info| info.name).collect();
    assert_eq!(
        names,
        [
            "FiducialGenerator",
            "InputNodeInspector",
            "LiveLandmarkMonitor",
            "PersistentGuiState",
            "SurfaceMeasurementTool",
        ]
    );

    let context = Context::new();
    let widget = SurfaceMeasurementWidget::new(&context);
    assert_eq!(widget.info().title, "Surface Measurement Tool");
    assert!(!widget.is_entered());
}

// ========================================================================
// NODE INSPECTOR
// ========================================================================

#[test]
fn test_inspector_follows_volume_changes() {
    let context = Context::new();
    let scene = context.scene();
    let volume = add_scalar_volume(scene, ScalarVolume::new("empty volume"));

    let inspector = NodeInspectorWidget::new(&context);
    inspector.enter().expect("enter failed");
    assert_eq!(inspector.view().selected_node, Some(volume.id()));
    assert_eq!(inspector.view().dimensions_label, "N/A");
    assert_eq!(inspector.view().scalar_range_label, "N/A");

    // --- Test: image data arrives ---
    let image = ImageData::new(UVec3::new(3, 2, 1), vec![-5.0, 0.0, 2.5, 7.3, 1.0, 0.5])
        .expect("image size mismatch");
    volume.set_image(Some(image));
    assert_eq!(inspector.view().dimensions_label, "(3, 2, 1)");
    assert_eq!(inspector.view().scalar_range_label, "[-5.0, 7.3]");

    // --- Test: spacing change ---
    volume.set_spacing(DVec3::new(0.5, 0.5, 1.5));
    assert_eq!(inspector.view().spacing_label, "(0.500, 0.500, 1.500)");

    // --- Test: removed node falls back to the placeholder ---
    scene.remove_node(volume.id());
    inspector.select_input_node(None);
    assert_eq!(inspector.view().dimensions_label, "None");
    assert_eq!(volume.node().events().subscriber_count(), 0);
}

#[test]
fn test_inspector_keeps_existing_selection() {
    let context = Context::new();
    let scene = context.scene();
    add_scalar_volume(
        scene,
        ScalarVolume::gradient("first", UVec3::splat(2), DVec3::ONE),
    );
    let fiducial = add_markups_fiducial(scene, "points");
    fiducial.add_control_point(DVec3::ZERO);
    fiducial.add_control_point(DVec3::new(2.0, 4.0, 6.0));

    scene
        .parameter_store("InputNodeInspector")
        .set_node_reference_id(INPUT_NODE_ROLE, Some(fiducial.id()));

    let inspector = NodeInspectorWidget::new(&context);
    inspector.enter().expect("enter failed");

    let view = inspector.view();
    assert_eq!(view.selected_node, Some(fiducial.id()));
    assert_eq!(view.dimensions_label, "(2.000, 4.000, 6.000)");
    assert_eq!(view.spacing_label, "N/A");
}

// ========================================================================
// SURFACE MEASUREMENT
// ========================================================================

const CUBE_OBJ: &str = "\
v 0 0 0
v 2 0 0
v 2 2 0
v 0 2 0
v 0 0 2
v 2 0 2
v 2 2 2
v 0 2 2
f 1 3 2
f 1 4 3
f 5 6 7
f 5 7 8
f 1 2 6
f 1 6 5
f 2 3 7
f 2 7 6
f 3 4 8
f 3 8 7
f 4 1 5
f 4 5 8
";

#[test]
fn test_measure_loaded_cube() {
    let path = std::env::temp_dir().join(format!("scenekit_cube_{}.obj", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).expect("create failed");
        file.write_all(CUBE_OBJ.as_bytes()).expect("write failed");
    }
    let cube = SurfaceModel::load_obj("cube", &path).expect("load failed");
    let _ = std::fs::remove_file(&path);

    let context = Context::new();
    let model = add_surface_model(context.scene(), cube);
    let widget = SurfaceMeasurementWidget::new(&context);
    widget.enter().expect("enter failed");
    widget.select_surface(Some(model.id()));

    let m = widget.on_compute_clicked().expect("compute failed");
    assert!((m.area - 24.0).abs() < 1e-9);
    assert_eq!(m.bounds, [0.0, 2.0, 0.0, 2.0, 0.0, 2.0]);
    assert_eq!(m.center_of_mass, DVec3::ONE);

    let view = widget.view();
    assert_eq!(view.area_label, "Area: 24.00 mm²");
    assert_eq!(view.bbox_label, "Bounding box: (2.0, 2.0, 2.0) mm");
    assert_eq!(view.center_label, "Center of mass: (1.0, 1.0, 1.0)");
}

#[test]
fn test_missing_model_file() {
    let result = SurfaceModel::load_obj("missing", "/no/such/dir/model.obj");
    assert!(matches!(result, Err(SceneError::ModelLoad(_))));
}

// ========================================================================
// CONFIGURATION
// ========================================================================

#[test]
fn test_options_drive_modules() {
    let options = Options::from_json_str(
        r#"{
            "fiducial_generation": { "count": 3, "half_range": 1.0 },
            "fiducial_base_name": "Seed",
            "threshold_max": 10.0,
            "default_threshold": 7.5,
            "default_invert": true
        }"#,
    )
    .expect("bad options");
    let context = Context::with_options(options);

    let generator = FiducialGeneratorWidget::new(&context);
    generator.enter().expect("enter failed");
    let fiducial = generator
        .on_create_fiducial_clicked()
        .expect("create failed");
    assert_eq!(fiducial.name(), "Seed");
    assert_eq!(fiducial.num_control_points(), 3);
    for p in fiducial.control_points() {
        assert!(p.abs().max_element() <= 1.0);
    }

    let persistent = PersistentGuiStateWidget::new(&context);
    persistent.enter().expect("enter failed");
    assert_eq!(
        persistent.view().status_label,
        "Current Values: Slider=7.5, Invert=True"
    );
    persistent.set_threshold(50.0);
    assert_eq!(persistent.view().threshold, 10.0);
}

#[test]
fn test_non_singleton_store_is_rejected() {
    let context = Context::new();
    let widget = PersistentGuiStateWidget::new(&context);
    let detached = std::rc::Rc::new(ParameterStore::new("PersistentGuiState"));

    let err = widget
        .bridge()
        .attach(Some(detached.clone()))
        .expect_err("detached store accepted");
    assert!(matches!(err, SceneError::NotSingleton(_)));
    assert!(!detached.has_parameter(THRESHOLD_KEY));
    assert_eq!(detached.events().subscriber_count(), 0);
}
