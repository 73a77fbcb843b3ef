//! Surface measurement demo.
//!
//! Measures a model loaded from an OBJ file, or a generated sphere when no
//! path is given, and inspects a synthetic volume next to it.
//!
//! Run with: `cargo run --example surface_measurement -- [model.obj]`

use scenekit::*;

fn main() {
    env_logger::init();

    let context = Context::new();
    let scene = context.scene();

    let model = match std::env::args().nth(1) {
        Some(path) => match SurfaceModel::load_obj("model", &path) {
            Ok(model) => model,
            Err(err) => {
                eprintln!("Failed to load {path}: {err}");
                return;
            }
        },
        None => SurfaceModel::sphere("sphere", 10.0, 64, 64),
    };
    println!(
        "Loaded model: {} vertices, {} triangles",
        model.num_vertices(),
        model.num_faces()
    );
    let model = add_surface_model(scene, model);

    let tool = SurfaceMeasurementWidget::new(&context);
    tool.enter().expect("Failed to enter SurfaceMeasurementTool");
    tool.select_surface(Some(model.id()));
    if tool.on_compute_clicked().is_some() {
        let view = tool.view();
        println!("{}", view.area_label);
        println!("{}", view.bbox_label);
        println!("{}", view.center_label);
    }

    // The inspector picks the first volume on enter.
    add_scalar_volume(
        scene,
        ScalarVolume::gradient("gradient", UVec3::new(64, 64, 32), DVec3::new(0.8, 0.8, 2.5)),
    );
    let inspector = NodeInspectorWidget::new(&context);
    inspector.enter().expect("Failed to enter InputNodeInspector");
    {
        let view = inspector.view();
        println!("Volume dimensions: {}", view.dimensions_label);
        println!("Volume spacing:    {}", view.spacing_label);
        println!("Volume range:      {}", view.scalar_range_label);
    }

    inspector.select_input_node(Some(model.id()));
    println!("Model extent:      {}", inspector.view().dimensions_label);

    for notice in context.notices().dismiss_all() {
        eprintln!("notice: {notice}");
    }
}
