//! Landmark workflow demo.
//!
//! Creates a random fiducial list, monitors it, toggles its lock, replaces
//! its points and restores them, printing what each module shows along the
//! way. The parameter stores are saved as JSON at the end.
//!
//! Run with: `RUST_LOG=debug cargo run --example landmark_workflow`

use scenekit::*;

fn print_views(generator: &FiducialGeneratorWidget, monitor: &LandmarkMonitorWidget) {
    let monitor_view = monitor.view();
    println!("  generator: {}", generator.view().info_label);
    println!(
        "  monitor:   {} (edit mode {})",
        monitor_view.count_label,
        if monitor_view.edit_mode_checked { "on" } else { "off" }
    );
}

fn main() {
    env_logger::init();

    let context = Context::new();
    let generator = FiducialGeneratorWidget::new(&context);
    let monitor = LandmarkMonitorWidget::new(&context);
    generator.enter().expect("Failed to enter FiducialGenerator");
    monitor.enter().expect("Failed to enter LiveLandmarkMonitor");

    println!("Creating a random fiducial list");
    let Some(fiducial) = generator.on_create_fiducial_clicked() else {
        eprintln!("{:?}", context.notices().dismiss_all());
        return;
    };
    monitor.select_fiducial(Some(fiducial.id()));
    print_views(&generator, &monitor);

    println!("Locking the points");
    monitor.on_edit_mode_toggled(false);
    print_views(&generator, &monitor);

    println!("Auto-generating landmarks");
    let generated = monitor.on_auto_generate_clicked().unwrap_or_default();
    for (i, p) in generated.iter().enumerate() {
        println!("  {i}: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z);
    }

    println!("Moving point 0 and adding one more");
    fiducial
        .set_control_point(0, DVec3::new(100.0, 0.0, 0.0))
        .expect("Failed to move point");
    fiducial.add_control_point(DVec3::ZERO);
    print_views(&generator, &monitor);

    println!("Resetting");
    monitor.on_reset_clicked();
    print_views(&generator, &monitor);
    if let Ok(p) = fiducial.control_point(0) {
        println!("  point 0 is back at ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z);
    }

    for notice in context.notices().dismiss_all() {
        println!("notice: {notice}");
    }

    match context.scene().save_parameters() {
        Ok(json) => println!("Saved parameters:\n{json}"),
        Err(err) => eprintln!("Failed to save parameters: {err}"),
    }
}
