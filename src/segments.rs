//! Detected line segments and their polar-form supporting lines.
//!
//! A [`Segment`] is an ordered pair of distinct pixel-space points. Endpoint
//! order matters to rendering collaborators, never to the geometry here.
//! Derived quantities (length, direction, normal form, polar form) are
//! computed lazily and cached.

use crate::angle::normalize_half_pi;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;

/// Supporting line of a segment in perpendicular-offset form:
/// `x·cos(phi) + y·sin(phi) = rho`, with `phi` wrapped to [0, π).
///
/// A segment and its reverse map to the same polar line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolarLine {
    pub rho: f32,
    pub phi: f32,
}

impl PolarLine {
    /// Squared residual of this line evaluated at a point, i.e. the squared
    /// perpendicular offset mismatch `(y·sin(phi) + x·cos(phi) − rho)²`.
    #[inline]
    pub fn residual_to_point(&self, point: [f32; 2]) -> f32 {
        let d = point[1] * self.phi.sin() + point[0] * self.phi.cos() - self.rho;
        d * d
    }
}

/// Line segment in pixel coordinates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Segment {
    pub p0: [f32; 2],
    pub p1: [f32; 2],
    #[serde(skip)]
    line: OnceCell<Vector3<f32>>,
    #[serde(skip)]
    polar: OnceCell<PolarLine>,
    #[serde(skip)]
    length: OnceCell<f32>,
    #[serde(skip)]
    direction: OnceCell<[f32; 2]>,
}

impl Segment {
    pub fn new(p0: [f32; 2], p1: [f32; 2]) -> Self {
        Self {
            p0,
            p1,
            line: OnceCell::new(),
            polar: OnceCell::new(),
            length: OnceCell::new(),
            direction: OnceCell::new(),
        }
    }

    pub fn midpoint(&self) -> [f32; 2] {
        [
            (self.p0[0] + self.p1[0]) * 0.5,
            (self.p0[1] + self.p1[1]) * 0.5,
        ]
    }

    fn compute_length(&self) -> f32 {
        let dx = self.p1[0] - self.p0[0];
        let dy = self.p1[1] - self.p0[1];
        (dx * dx + dy * dy).sqrt()
    }

    pub fn length(&self) -> f32 {
        *self.length.get_or_init(|| self.compute_length())
    }

    fn compute_direction(&self) -> [f32; 2] {
        let len = self.length();
        if len > 0.0 {
            [
                (self.p1[0] - self.p0[0]) / len,
                (self.p1[1] - self.p0[1]) / len,
            ]
        } else {
            [0.0, 0.0]
        }
    }

    /// Unit tangent from `p0` towards `p1`.
    pub fn direction(&self) -> [f32; 2] {
        *self.direction.get_or_init(|| self.compute_direction())
    }

    fn compute_line(&self) -> Vector3<f32> {
        let a = self.p1[1] - self.p0[1];
        let b = self.p0[0] - self.p1[0];
        let c = self.p1[0] * self.p0[1] - self.p0[0] * self.p1[1];
        let norm = (a * a + b * b).sqrt().max(1e-12);
        Vector3::new(a / norm, b / norm, c / norm)
    }

    /// Supporting line in normal form `ax + by + c = 0` with `a² + b² = 1`.
    pub fn line(&self) -> Vector3<f32> {
        *self.line.get_or_init(|| self.compute_line())
    }

    fn compute_polar(&self) -> PolarLine {
        let dir = self.direction();
        let phi = normalize_half_pi(dir[1].atan2(dir[0]) + std::f32::consts::FRAC_PI_2);
        let rho = self.p0[0] * phi.cos() + self.p0[1] * phi.sin();
        PolarLine { rho, phi }
    }

    /// Polar form of the supporting line.
    pub fn polar_line(&self) -> PolarLine {
        *self.polar.get_or_init(|| self.compute_polar())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::angular_difference;

    #[test]
    fn polar_line_round_trips_through_endpoints() {
        let seg = Segment::new([13.0, -4.0], [87.5, 42.0]);
        let line = seg.polar_line();
        assert!(line.residual_to_point(seg.p0) < 1e-4);
        assert!(line.residual_to_point(seg.p1) < 1e-4);
    }

    #[test]
    fn reversed_segment_yields_same_polar_line() {
        let seg = Segment::new([3.0, 7.0], [-20.0, 11.0]);
        let rev = Segment::new([-20.0, 11.0], [3.0, 7.0]);
        let a = seg.polar_line();
        let b = rev.polar_line();
        assert!(angular_difference(a.phi, b.phi) < 1e-4);
        assert!((a.rho - b.rho).abs() < 1e-3);
    }

    #[test]
    fn vertical_segment_keeps_its_offset() {
        let seg = Segment::new([5.0, 0.0], [5.0, 10.0]);
        let line = seg.polar_line();
        assert!(line.residual_to_point([5.0, 123.0]) < 1e-6);
        assert!((line.rho.abs() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn normal_form_vanishes_on_the_segment() {
        let seg = Segment::new([0.0, 0.0], [10.0, 5.0]);
        let l = seg.line();
        let mid = seg.midpoint();
        assert!((l[0] * mid[0] + l[1] * mid[1] + l[2]).abs() < 1e-4);
    }
}
