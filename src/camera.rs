//! Camera model: intrinsics, the fitted view angles and the focal-point
//! triple they imply.
//!
//! The view is parameterized by two angles (φ, θ) describing the camera
//! orientation relative to the assumed orthogonal cuboid axes. The three
//! vanishing points ("focal points") of the axis directions are a pure
//! function of the view and the intrinsics:
//!
//! - X: `(1/(tanθ·sinφ), 1/tanφ)`
//! - Y: `(0, −tanφ)`
//! - Z: `(−tanθ/sinφ, 1/tanφ)`
//!
//! in normalized image coordinates, mapped to pixels by the intrinsics.
//! The camera-frame directions towards the three focal points form an
//! orthonormal triple, which [`axis_basis`] exposes for the direct lift.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Pinhole intrinsics with square pixels and no skew.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Intrinsics {
    pub focal: f32,
    pub cx: f32,
    pub cy: f32,
}

impl Intrinsics {
    /// Convention used by the screen mapping of the focal-point formulas:
    /// focal length of half the image height, principal point at the center.
    pub fn from_image_size(width: usize, height: usize) -> Self {
        Self {
            focal: height as f32 * 0.5,
            cx: width as f32 * 0.5,
            cy: height as f32 * 0.5,
        }
    }

    /// Back-projects a pixel to a camera-frame ray (not normalized, z = 1).
    pub fn ray(&self, p: [f32; 2]) -> Vector3<f32> {
        Vector3::new((p[0] - self.cx) / self.focal, (p[1] - self.cy) / self.focal, 1.0)
    }

    /// Projects a camera-frame point; `None` behind the camera.
    pub fn project(&self, p: &Vector3<f32>) -> Option<[f32; 2]> {
        if p[2] <= 1e-6 {
            return None;
        }
        Some([
            self.focal * p[0] / p[2] + self.cx,
            self.focal * p[1] / p[2] + self.cy,
        ])
    }
}

impl Default for Intrinsics {
    fn default() -> Self {
        Self::from_image_size(640, 480)
    }
}

/// Two-angle camera orientation relative to the cuboid axes.
/// Immutable once fitted; φ lives in [0, π), θ in [0, π/2).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewAngle {
    pub phi: f32,
    pub theta: f32,
}

impl ViewAngle {
    pub fn new(phi: f32, theta: f32) -> Self {
        Self { phi, theta }
    }
}

/// The three axis vanishing points in pixel coordinates, ordered X, Y, Z.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct FocalPointTriple {
    pub points: [[f32; 2]; 3],
}

impl FocalPointTriple {
    /// Evaluates the focal points of a view. `None` when the view sits on a
    /// tangent pole (φ or θ at 0) and the triple is not finite; the search
    /// treats such candidates as infinitely bad.
    pub fn from_view_angle(view: ViewAngle, intrinsics: &Intrinsics) -> Option<Self> {
        let tan_theta = view.theta.tan();
        let sin_phi = view.phi.sin();
        let tan_phi = view.phi.tan();
        let normalized = [
            [1.0 / (tan_theta * sin_phi), 1.0 / tan_phi],
            [0.0, -tan_phi],
            [-tan_theta / sin_phi, 1.0 / tan_phi],
        ];
        let mut points = [[0.0f32; 2]; 3];
        for (dst, src) in points.iter_mut().zip(normalized.iter()) {
            let x = intrinsics.focal * src[0] + intrinsics.cx;
            let y = intrinsics.focal * src[1] + intrinsics.cy;
            if !x.is_finite() || !y.is_finite() {
                return None;
            }
            *dst = [x, y];
        }
        Some(Self { points })
    }
}

/// Camera-frame directions of the three cuboid axes implied by a view,
/// as matrix columns (X, Y, Z). The columns are unit length and mutually
/// orthogonal by construction, so the transpose maps camera rays into the
/// canonical cuboid-aligned frame.
pub fn axis_basis(view: ViewAngle) -> Matrix3<f32> {
    let (sin_t, cos_t) = view.theta.sin_cos();
    let (sin_p, cos_p) = view.phi.sin_cos();
    Matrix3::from_columns(&[
        Vector3::new(cos_t, sin_t * cos_p, sin_t * sin_p),
        Vector3::new(0.0, -sin_p, cos_p),
        Vector3::new(-sin_t, cos_t * cos_p, cos_t * sin_p),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_basis_is_orthonormal() {
        let b = axis_basis(ViewAngle::new(1.1, 0.6));
        let gram = b.transpose() * b;
        for i in 0..3 {
            for j in 0..3 {
                let expect = if i == j { 1.0 } else { 0.0 };
                assert!((gram[(i, j)] - expect).abs() < 1e-5, "gram {:?}", gram);
            }
        }
    }

    #[test]
    fn focal_points_align_with_axis_directions() {
        let view = ViewAngle::new(0.9, 0.7);
        let intr = Intrinsics::from_image_size(600, 400);
        let triple = FocalPointTriple::from_view_angle(view, &intr).unwrap();
        let basis = axis_basis(view);
        for (axis, fp) in triple.points.iter().enumerate() {
            let ray = intr.ray(*fp).normalize();
            let dir = basis.column(axis);
            let dot = ray.dot(&dir).abs();
            assert!(dot > 1.0 - 1e-4, "axis {axis} dot {dot}");
        }
    }

    #[test]
    fn degenerate_view_yields_no_triple() {
        let intr = Intrinsics::from_image_size(600, 400);
        assert!(FocalPointTriple::from_view_angle(ViewAngle::new(0.0, 0.5), &intr).is_none());
    }
}
