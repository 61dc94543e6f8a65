//! Detector pipeline driving cuboid recovery end-to-end.
//!
//! [`CuboidDetector`] exposes a simple API: feed pixel-space segments and
//! get the fitted view, per-axis edges and reconstructed faces with
//! detailed diagnostics. Internally it coordinates the vanishing-angle
//! search, residual classification, consolidation and the three
//! family-pair face reconstructions.
//!
//! Typical usage:
//! ```no_run
//! use cuboid_detector::{CuboidDetector, CuboidParams, Segment};
//!
//! # fn example(segments: Vec<Segment>) {
//! let detector = CuboidDetector::new(CuboidParams::from_image_size(640, 480));
//! match detector.process(&segments) {
//!     Ok(result) => println!("faces: {}", result.faces.len()),
//!     Err(err) => eprintln!("detection failed: {err}"),
//! }
//! # }
//! ```
//!
//! The two lifting strategies are separate entry points
//! ([`CuboidDetector::solve_poses`] and [`CuboidDetector::lift_edges`]);
//! they are alternatives, never composed.

mod params;

pub use params::CuboidParams;

use crate::camera::FocalPointTriple;
use crate::classify::{classify_edges, AxisClass};
use crate::consolidate::consolidate;
use crate::diagnostics::{DetectionReport, StageCounts, TimingBreakdown};
use crate::error::Error;
use crate::estimator::fit_view_angle;
use crate::faces::{reconstruct_faces, Face};
use crate::lift::{lift_edge, solve_face_pose, LiftedEdge, PoseSolution};
use crate::segments::{PolarLine, Segment};
use crate::types::{CuboidResult, FaceGroups};
use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use std::time::Instant;

/// Pose of one face together with its position in the result.
#[derive(Clone, Debug, Serialize)]
pub struct FacePose {
    /// Axis normal to the face.
    pub axis: AxisClass,
    /// Index inside the face group of that axis.
    pub face_index: usize,
    #[serde(flatten)]
    pub solution: PoseSolution,
}

/// Cuboid detector orchestrating estimation, classification, consolidation
/// and face reconstruction.
pub struct CuboidDetector {
    params: CuboidParams,
}

impl CuboidDetector {
    pub fn new(params: CuboidParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &CuboidParams {
        &self.params
    }

    /// Runs the pipeline, returning a compact result.
    pub fn process(&self, segments: &[Segment]) -> Result<CuboidResult, Error> {
        self.process_with_diagnostics(segments).map(|r| r.result)
    }

    /// Runs the pipeline and returns the result plus counts and timings.
    pub fn process_with_diagnostics(
        &self,
        segments: &[Segment],
    ) -> Result<DetectionReport, Error> {
        let t0 = Instant::now();
        let mut timing = TimingBreakdown::default();
        let mut counts = StageCounts {
            input: segments.len(),
            ..Default::default()
        };
        debug!("detector: start segments={}", segments.len());

        let filtered: Vec<Segment> = segments
            .iter()
            .filter(|s| s.length() >= self.params.estimator.min_segment_len)
            .cloned()
            .collect();
        counts.length_filtered = filtered.len();
        if filtered.is_empty() {
            return Err(Error::DegenerateInput(
                "no segments above the minimum length",
            ));
        }

        let stage = Instant::now();
        let lines: Vec<PolarLine> = filtered.iter().map(|s| s.polar_line()).collect();
        let fit = fit_view_angle(&lines, &self.params.intrinsics, &self.params.estimator)?;
        timing.push("estimator", stage.elapsed().as_secs_f64() * 1000.0);
        let triple = FocalPointTriple::from_view_angle(fit.view, &self.params.intrinsics)
            .ok_or(Error::DegenerateInput("fitted view has no focal points"))?;

        let stage = Instant::now();
        let (classified, dropped) =
            classify_edges(&filtered, &triple, fit.loss, &self.params.classifier);
        counts.classified = classified.counts();
        counts.unclassified = dropped;
        timing.push("classify", stage.elapsed().as_secs_f64() * 1000.0);

        let stage = Instant::now();
        let consolidated = consolidate(&classified, &self.params.consolidate);
        counts.consolidated = consolidated.counts();
        timing.push("consolidate", stage.elapsed().as_secs_f64() * 1000.0);

        let stage = Instant::now();
        let faces = FaceGroups {
            x: reconstruct_faces(&consolidated.z, &consolidated.y, &self.params.faces),
            y: reconstruct_faces(&consolidated.x, &consolidated.z, &self.params.faces),
            z: reconstruct_faces(&consolidated.x, &consolidated.y, &self.params.faces),
        };
        counts.faces = faces.counts();
        timing.push("faces", stage.elapsed().as_secs_f64() * 1000.0);

        timing.total_ms = t0.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "detector: done loss={:.5} edges={:?} faces={:?} total_ms={:.3}",
            fit.loss,
            counts.consolidated,
            counts.faces,
            timing.total_ms
        );
        Ok(DetectionReport {
            result: CuboidResult {
                view: fit.view,
                fit_loss: fit.loss,
                focal_points: triple,
                edges: consolidated,
                faces,
            },
            counts,
            timing,
        })
    }

    /// Perspective-pose strategy: solves a pose per reconstructed face and
    /// returns the accepted ones; best-effort solutions are excluded.
    pub fn solve_poses(&self, result: &CuboidResult) -> Vec<FacePose> {
        let seed = self
            .params
            .lift
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen());
        let mut rng = StdRng::seed_from_u64(seed);
        let mut poses = Vec::new();
        let groups: [(AxisClass, &Vec<Face>); 3] = [
            (AxisClass::X, &result.faces.x),
            (AxisClass::Y, &result.faces.y),
            (AxisClass::Z, &result.faces.z),
        ];
        for (axis, faces) in groups {
            for (face_index, face) in faces.iter().enumerate() {
                let Some(solution) = solve_face_pose(
                    face,
                    &result.focal_points,
                    &self.params.intrinsics,
                    &self.params.lift,
                    &mut rng,
                ) else {
                    continue;
                };
                if solution.accepted {
                    poses.push(FacePose {
                        axis,
                        face_index,
                        solution,
                    });
                }
            }
        }
        poses
    }

    /// Direct-angle strategy: lifts every consolidated edge to 3-D,
    /// silently dropping numerically degenerate ones.
    pub fn lift_edges(&self, result: &CuboidResult) -> Vec<LiftedEdge> {
        let mut lifted = Vec::new();
        for axis in AxisClass::ALL {
            for segment in result.edges.class(axis) {
                if let Some(edge) = lift_edge(
                    segment,
                    axis,
                    result.view,
                    &self.params.intrinsics,
                    &self.params.lift,
                ) {
                    lifted.push(edge);
                }
            }
        }
        lifted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_a_degenerate_input_error() {
        let detector = CuboidDetector::new(CuboidParams::from_image_size(600, 400));
        assert!(matches!(
            detector.process(&[]),
            Err(Error::DegenerateInput(_))
        ));
    }

    #[test]
    fn short_segments_alone_are_degenerate() {
        let detector = CuboidDetector::new(CuboidParams::from_image_size(600, 400));
        let segments = vec![Segment::new([0.0, 0.0], [3.0, 0.0])];
        assert!(matches!(
            detector.process(&segments),
            Err(Error::DegenerateInput(_))
        ));
    }
}
