use super::EstimatorParams;
use crate::camera::{FocalPointTriple, Intrinsics, ViewAngle};
use crate::error::Error;
use crate::segments::PolarLine;
use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

/// Trials evaluated per parallel chunk of the coarse phase.
const CHUNK: usize = 64;
/// Splitmix increment used to derive independent per-chunk seeds.
const SEED_STRIDE: u64 = 0x9e37_79b9_7f4a_7c15;
const THETA_EPS: f32 = 1e-4;

/// Best view found by the search together with its residual loss.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ViewFit {
    pub view: ViewAngle,
    pub loss: f32,
}

/// Mean over `lines` of the squared residual to the closest focal point.
pub fn triple_loss(lines: &[PolarLine], triple: &FocalPointTriple) -> f32 {
    debug_assert!(!lines.is_empty());
    let mut total = 0.0f32;
    for line in lines {
        let r = triple
            .points
            .iter()
            .map(|p| line.residual_to_point(*p))
            .fold(f32::INFINITY, f32::min);
        total += r;
    }
    total / lines.len() as f32
}

/// Loss of a candidate view; infinite when its focal points are undefined.
pub fn view_loss(lines: &[PolarLine], view: ViewAngle, intrinsics: &Intrinsics) -> f32 {
    match FocalPointTriple::from_view_angle(view, intrinsics) {
        Some(triple) => triple_loss(lines, &triple),
        None => f32::INFINITY,
    }
}

#[derive(Clone, Copy)]
struct Candidate {
    view: ViewAngle,
    loss: f32,
    trial: usize,
}

impl Candidate {
    /// Total order on (loss, trial index) keeps the parallel reduction
    /// deterministic for a fixed seed.
    fn beats(&self, other: &Candidate) -> bool {
        self.loss < other.loss || (self.loss == other.loss && self.trial < other.trial)
    }
}

fn coarse_chunk(
    lines: &[PolarLine],
    intrinsics: &Intrinsics,
    seed: u64,
    chunk: usize,
    trials: usize,
) -> Candidate {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add((chunk as u64).wrapping_mul(SEED_STRIDE)));
    let start = chunk * CHUNK;
    let end = (start + CHUNK).min(trials);
    let mut best = Candidate {
        view: ViewAngle::new(0.0, 0.0),
        loss: f32::INFINITY,
        trial: usize::MAX,
    };
    for trial in start..end {
        let view = ViewAngle::new(
            rng.gen_range(0.0..std::f32::consts::PI),
            rng.gen_range(0.0..std::f32::consts::FRAC_PI_2),
        );
        let loss = view_loss(lines, view, intrinsics);
        let cand = Candidate { view, loss, trial };
        if cand.beats(&best) {
            best = cand;
        }
    }
    best
}

/// Fits the view angles to a set of polar lines.
///
/// Errors with [`Error::DegenerateInput`] on an empty line set; callers are
/// expected to length-filter their segments first.
pub fn fit_view_angle(
    lines: &[PolarLine],
    intrinsics: &Intrinsics,
    params: &EstimatorParams,
) -> Result<ViewFit, Error> {
    if lines.is_empty() {
        return Err(Error::DegenerateInput("no polar lines to fit"));
    }
    let seed = params.seed.unwrap_or_else(|| rand::thread_rng().gen());

    let trials = params.coarse_trials.max(1);
    let chunks = trials.div_ceil(CHUNK);
    let worst = Candidate {
        view: ViewAngle::new(0.0, 0.0),
        loss: f32::INFINITY,
        trial: usize::MAX,
    };
    let mut best = (0..chunks)
        .into_par_iter()
        .map(|chunk| coarse_chunk(lines, intrinsics, seed, chunk, trials))
        .reduce(|| worst, |a, b| if b.beats(&a) { b } else { a });
    debug!(
        "estimator: coarse best phi={:.4} theta={:.4} loss={:.5}",
        best.view.phi, best.view.theta, best.loss
    );

    // Refinement recenters on the running best; sequential by design.
    let mut rng = StdRng::seed_from_u64(seed ^ 0xd1b5_4a32_d192_ed03);
    let radius = params.refine_radius_deg.to_radians();
    let refine_trials = params.refine_trials;
    for trial in 0..refine_trials {
        let frac = 1.0 - trial as f32 / refine_trials as f32;
        let r = radius * frac.max(params.radius_floor);
        let phi = (best.view.phi + rng.gen_range(-r..r)).rem_euclid(std::f32::consts::PI);
        let theta = (best.view.theta + rng.gen_range(-r..r))
            .clamp(THETA_EPS, std::f32::consts::FRAC_PI_2 - THETA_EPS);
        let view = ViewAngle::new(phi, theta);
        let loss = view_loss(lines, view, intrinsics);
        if loss < best.loss {
            best = Candidate { view, loss, trial };
        }
    }
    debug!(
        "estimator: refined best phi={:.4} theta={:.4} loss={:.5}",
        best.view.phi, best.view.theta, best.loss
    );

    Ok(ViewFit {
        view: best.view,
        loss: best.loss,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segments::Segment;

    fn lines_through_triple(view: ViewAngle, intrinsics: &Intrinsics) -> Vec<PolarLine> {
        let triple = FocalPointTriple::from_view_angle(view, intrinsics).unwrap();
        let mut lines = Vec::new();
        for (axis, fp) in triple.points.iter().enumerate() {
            for k in 0..4 {
                let psi = (0.35 + 0.4 * k as f32 + 0.09 * axis as f32)
                    .rem_euclid(std::f32::consts::PI);
                let rho = fp[0] * psi.cos() + fp[1] * psi.sin();
                lines.push(PolarLine { rho, phi: psi });
            }
        }
        lines
    }

    #[test]
    fn loss_is_zero_on_exact_lines() {
        let intr = Intrinsics::from_image_size(600, 400);
        let view = ViewAngle::new(1.1, 0.6);
        let lines = lines_through_triple(view, &intr);
        let triple = FocalPointTriple::from_view_angle(view, &intr).unwrap();
        assert!(triple_loss(&lines, &triple) < 1e-4);
    }

    #[test]
    fn empty_input_is_rejected() {
        let intr = Intrinsics::from_image_size(600, 400);
        let err = fit_view_angle(&[], &intr, &EstimatorParams::default());
        assert!(err.is_err());
    }

    #[test]
    fn identical_seeds_reproduce_the_fit() {
        let intr = Intrinsics::from_image_size(600, 400);
        let lines: Vec<PolarLine> = [
            Segment::new([100.0, 100.0], [300.0, 140.0]),
            Segment::new([100.0, 200.0], [300.0, 230.0]),
            Segment::new([120.0, 90.0], [140.0, 300.0]),
            Segment::new([260.0, 80.0], [280.0, 310.0]),
            Segment::new([90.0, 120.0], [330.0, 330.0]),
            Segment::new([110.0, 100.0], [320.0, 280.0]),
        ]
        .iter()
        .map(|s| s.polar_line())
        .collect();
        let params = EstimatorParams {
            seed: Some(42),
            coarse_trials: 200,
            refine_trials: 100,
            ..Default::default()
        };
        let a = fit_view_angle(&lines, &intr, &params).unwrap();
        let b = fit_view_angle(&lines, &intr, &params).unwrap();
        assert_eq!(a.view, b.view);
        assert_eq!(a.loss, b.loss);
    }
}
