//! Vanishing-angle estimation by stochastic search.
//!
//! Fits the two view angles (φ, θ) whose focal-point triple best explains a
//! set of polar lines. The residual of a line to the triple is the minimum
//! squared offset mismatch over the three focal points and the loss is the
//! mean over all lines; that minimum makes the landscape non-smooth, which
//! is why the fit is a two-phase random search rather than a gradient
//! method:
//!
//! - a coarse phase sampling φ ∈ [0, π), θ ∈ [0, π/2) uniformly over a
//!   fixed trial budget, and
//! - a refinement phase sampling a shrinking neighbourhood around the
//!   running best.
//!
//! Randomness is owned by the caller through [`EstimatorParams::seed`];
//! identical seeds reproduce identical fits. Coarse trials are independent
//! and evaluated in deterministically seeded chunks reduced in parallel, so
//! threading never changes the outcome. Fitted angles are only meaningful
//! up to the residual: tests should bound the loss, not compare angles.

mod search;

pub use search::{fit_view_angle, triple_loss, view_loss, ViewFit};

use serde::{Deserialize, Serialize};

/// Knobs for the two-phase random search.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EstimatorParams {
    /// Segments shorter than this never reach the estimator (pixels).
    pub min_segment_len: f32,
    /// Trial budget of the coarse phase.
    pub coarse_trials: usize,
    /// Trial budget of the refinement phase.
    pub refine_trials: usize,
    /// Initial refinement neighbourhood half-width (degrees).
    pub refine_radius_deg: f32,
    /// The neighbourhood shrinks linearly down to this fraction of the
    /// initial radius.
    pub radius_floor: f32,
    /// Seed for the random search; `None` draws one from entropy.
    pub seed: Option<u64>,
}

impl Default for EstimatorParams {
    fn default() -> Self {
        Self {
            min_segment_len: 10.0,
            coarse_trials: 1000,
            refine_trials: 500,
            refine_radius_deg: 15.0,
            radius_floor: 0.05,
            seed: None,
        }
    }
}
