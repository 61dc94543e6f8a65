use cuboid_detector::camera::{axis_basis, Intrinsics, ViewAngle};
use cuboid_detector::classify::AxisClass;
use cuboid_detector::segments::Segment;
use nalgebra::Vector3;

/// One projected cube edge with its ground truth.
pub struct CubeEdge {
    pub segment: Segment,
    pub axis: AxisClass,
    /// Camera-frame endpoints of the unit edge.
    pub p0: Vector3<f32>,
    pub p1: Vector3<f32>,
}

/// Projects the 12 edges of an axis-aligned unit cube seen under `view`,
/// centered on the optical axis at the given depth.
pub fn cube_edges(view: ViewAngle, depth: f32, intrinsics: &Intrinsics) -> Vec<CubeEdge> {
    let basis = axis_basis(view);
    let center = basis * Vector3::new(0.5, 0.5, 0.5);
    let t = Vector3::new(-center[0], -center[1], depth - center[2]);

    let corner = |x: f32, y: f32, z: f32| -> Vector3<f32> { basis * Vector3::new(x, y, z) + t };

    let mut edges = Vec::with_capacity(12);
    for axis in AxisClass::ALL {
        let ai = axis.index();
        let (oi, oj) = match ai {
            0 => (1, 2),
            1 => (0, 2),
            _ => (0, 1),
        };
        for u in [0.0f32, 1.0] {
            for v in [0.0f32, 1.0] {
                let mut c0 = [0.0f32; 3];
                let mut c1 = [0.0f32; 3];
                c1[ai] = 1.0;
                c0[oi] = u;
                c1[oi] = u;
                c0[oj] = v;
                c1[oj] = v;
                let p0 = corner(c0[0], c0[1], c0[2]);
                let p1 = corner(c1[0], c1[1], c1[2]);
                let q0 = intrinsics.project(&p0).expect("cube in front of camera");
                let q1 = intrinsics.project(&p1).expect("cube in front of camera");
                edges.push(CubeEdge {
                    segment: Segment::new(q0, q1),
                    axis,
                    p0,
                    p1,
                });
            }
        }
    }
    edges
}
