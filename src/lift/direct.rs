use super::LiftParams;
use crate::camera::{axis_basis, Intrinsics, ViewAngle};
use crate::classify::AxisClass;
use crate::segments::Segment;
use nalgebra::Vector3;
use serde::Serialize;

const EPS: f32 = 1e-9;

/// 3-D reconstruction of a single classified edge in the canonical
/// cuboid-aligned frame. Coordinates are scaled so the first endpoint sits
/// at unit distance from the camera; `length` is the edge length in the
/// same units.
#[derive(Clone, Debug, Serialize)]
pub struct LiftedEdge {
    pub axis: AxisClass,
    pub p0: Vector3<f32>,
    pub p1: Vector3<f32>,
    pub length: f32,
}

impl LiftedEdge {
    /// Endpoints rotated back into the camera frame.
    pub fn to_camera_frame(&self, view: ViewAngle) -> (Vector3<f32>, Vector3<f32>) {
        let basis = axis_basis(view);
        (basis * self.p0, basis * self.p1)
    }
}

/// Lifts one edge of a known axis class to 3-D.
///
/// Both endpoint rays are rotated into the canonical frame where the edge
/// direction is an axis unit vector. Fixing the first endpoint at unit
/// distance, the two off-axis components of both rays form similar
/// triangles that determine the second endpoint's scale, and the axis
/// component difference is the edge length. Returns `None` for numerically
/// degenerate edges: near-equidistant endpoints drive the solved length
/// outside the sanity bound.
pub fn lift_edge(
    segment: &Segment,
    axis: AxisClass,
    view: ViewAngle,
    intrinsics: &Intrinsics,
    params: &LiftParams,
) -> Option<LiftedEdge> {
    let basis = axis_basis(view);
    let u0 = basis.transpose() * intrinsics.ray(segment.p0).normalize();
    let u1 = basis.transpose() * intrinsics.ray(segment.p1).normalize();

    let ai = axis.index();
    let (pi, qi) = match ai {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    };
    let den = u1[pi] * u1[pi] + u1[qi] * u1[qi];
    if den <= EPS {
        return None;
    }
    let s1 = (u0[pi] * u1[pi] + u0[qi] * u1[qi]) / den;
    let length = (s1 * u1[ai] - u0[ai]).abs();
    if !length.is_finite() || length > params.max_edge_length {
        return None;
    }
    Some(LiftedEdge {
        axis,
        p0: u0,
        p1: u1 * s1,
        length,
    })
}
