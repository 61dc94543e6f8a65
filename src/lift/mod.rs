//! Lifting reconstructed 2-D structure to 3-D.
//!
//! Two independent strategies; callers pick one, they are never composed:
//!
//! - [`solve_face_pose`] recovers a rigid pose per face from the three
//!   focal points (treated as images of the axis directions) plus the four
//!   face corners matched to a unit square.
//! - [`lift_edge`] converts a single classified edge to 3-D coordinates in
//!   the canonical cuboid-aligned frame, relying only on the fitted view.

mod direct;
mod pose;

pub use direct::{lift_edge, LiftedEdge};
pub use pose::{solve_face_pose, PoseSolution};

use serde::{Deserialize, Serialize};

/// Knobs shared by the two lifting strategies.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct LiftParams {
    /// Attempt budget for the perspective-pose correspondence search.
    pub retry_budget: usize,
    /// Translation magnitudes outside this range are implausible
    /// (degenerately small or runaway solutions).
    pub min_translation: f32,
    pub max_translation: f32,
    /// Maximum corner reprojection error for an accepted pose (pixels).
    pub max_reproj_px: f32,
    /// Direct lift: solved lengths above this bound (in units of the near
    /// endpoint's distance) indicate a numerically unstable edge.
    pub max_edge_length: f32,
    /// Seed for the correspondence search; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for LiftParams {
    fn default() -> Self {
        Self {
            retry_budget: 50,
            min_translation: 1e-2,
            max_translation: 1e4,
            max_reproj_px: 5.0,
            max_edge_length: 100.0,
            seed: None,
        }
    }
}
