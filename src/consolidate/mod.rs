//! Consolidation of classified edges.
//!
//! Two ordered passes per axis family:
//!
//! 1. **Merge**: duplicate detections of one physical edge (near-parallel
//!    and near-collinear segments) collapse into a single representative
//!    spanning their joint extent.
//! 2. **Split**: a segment crossed strictly inside by a segment of another
//!    family is cut at the first such crossing; corner-adjacent contacts
//!    are protected by a parametric margin at both ends.
//!
//! The split pass tests each family against the union of the other two
//! families in their merged (pre-split) form, so the outcome does not
//! depend on which family is processed first.

mod merge;
mod split;

pub use merge::merge_collinear;
pub use split::split_at_intersections;

use crate::classify::ClassifiedEdges;
use crate::segments::Segment;
use log::debug;
use serde::{Deserialize, Serialize};

/// Tolerances for both consolidation passes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ConsolidateParams {
    /// Maximum orientation difference for merging (degrees).
    pub merge_angle_tol_deg: f32,
    /// Maximum normal-form offset difference for merging (pixels).
    pub merge_dist_px: f32,
    /// Fraction of each segment's length protected at both ends; a crossing
    /// must fall strictly inside `(margin, 1−margin)` on both segments to
    /// trigger a split.
    pub split_margin: f32,
}

impl Default for ConsolidateParams {
    fn default() -> Self {
        Self {
            merge_angle_tol_deg: 4.0,
            merge_dist_px: 3.0,
            split_margin: 0.19,
        }
    }
}

/// Runs merge then split over all three families.
pub fn consolidate(edges: &ClassifiedEdges, params: &ConsolidateParams) -> ClassifiedEdges {
    let x = merge_collinear(&edges.x, params);
    let y = merge_collinear(&edges.y, params);
    let z = merge_collinear(&edges.z, params);

    let union = |a: &[Segment], b: &[Segment]| -> Vec<Segment> {
        a.iter().chain(b.iter()).cloned().collect()
    };
    let out = ClassifiedEdges {
        x: split_at_intersections(&x, &union(&y, &z), params),
        y: split_at_intersections(&y, &union(&z, &x), params),
        z: split_at_intersections(&z, &union(&x, &y), params),
    };
    debug!(
        "consolidate: merged {:?} -> split {:?}",
        [x.len(), y.len(), z.len()],
        out.counts()
    );
    out
}
