use cuboid_detector::config::demo::load_config;
use cuboid_detector::jsonio::{load_segments, write_json_file};
use cuboid_detector::CuboidDetector;
use serde::Serialize;
use std::env;
use std::path::Path;

#[derive(Serialize)]
struct DemoReport {
    report: cuboid_detector::DetectionReport,
    poses: Vec<cuboid_detector::detector::FacePose>,
    lifted_edges: Vec<cuboid_detector::lift::LiftedEdge>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;
    let segments = load_segments(&config.input)?;

    let params = config
        .pipeline
        .resolve(config.image_width, config.image_height);
    let detector = CuboidDetector::new(params);
    let report = detector
        .process_with_diagnostics(&segments)
        .map_err(|e| e.to_string())?;
    let poses = detector.solve_poses(&report.result);
    let lifted_edges = detector.lift_edges(&report.result);
    println!(
        "view=({:.4},{:.4}) loss={:.5} edges={:?} faces={:?} poses={} lifted={}",
        report.result.view.phi,
        report.result.view.theta,
        report.result.fit_loss,
        report.counts.consolidated,
        report.counts.faces,
        poses.len(),
        lifted_edges.len()
    );

    write_json_file(
        &DemoReport {
            report,
            poses,
            lifted_edges,
        },
        &config.output.result_json,
    )
}

fn usage() -> String {
    "Usage: cuboid_demo <config.json>".to_string()
}
