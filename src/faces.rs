//! Face reconstruction from two consolidated axis families.
//!
//! Candidate quadrilaterals are enumerated as 4-tuples (i<k from the first
//! family, j<l from the second) whose cyclic segment distances e1·e2, e2·e3,
//! e3·e4 and e4·e1 all stay below a threshold; the corners are the four
//! pairwise supporting-line intersections. A candidate is discarded when any
//! corner pair is (near) parallel or when two corners nearly coincide; the
//! face type guarantees a simple quadrilateral. Corners are normalized to a
//! single clockwise winding (image coordinates, y down) via the shoelace
//! sign.
//!
//! Overlap dedup: two candidates that reuse the same family pair and whose
//! centroids lie inside one another describe the same physical face; the
//! smaller circumference wins, ties by enumeration order. The rule is
//! evaluated pairwise in both directions so the survivor set does not depend
//! on enumeration order.

use crate::geometry::{
    face_circumference, line_intersection, point_in_convex_polygon, segment_distance,
    signed_area_doubled,
};
use crate::segments::Segment;
use log::debug;
use serde::{Deserialize, Serialize};

/// Reconstructed quadrilateral face. `class1_pair`/`class2_pair` record the
/// indices of the bounding segments inside their family collections.
#[derive(Clone, Debug, Serialize)]
pub struct Face {
    pub corners: [[f32; 2]; 4],
    pub class1_pair: (usize, usize),
    pub class2_pair: (usize, usize),
}

impl Face {
    pub fn centroid(&self) -> [f32; 2] {
        let mut c = [0.0f32; 2];
        for p in &self.corners {
            c[0] += p[0];
            c[1] += p[1];
        }
        [c[0] * 0.25, c[1] * 0.25]
    }

    pub fn circumference(&self) -> f32 {
        face_circumference(&self.corners)
    }
}

/// Knobs for candidate acceptance.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FaceParams {
    /// Cyclic segment-distance gate between consecutive bounding edges
    /// (pixels).
    pub match_distance_px: f32,
    /// Candidates with two corners closer than this are degenerate and
    /// skipped (pixels).
    pub min_corner_separation_px: f32,
}

impl Default for FaceParams {
    fn default() -> Self {
        Self {
            match_distance_px: 15.0,
            min_corner_separation_px: 0.5,
        }
    }
}

fn corners_degenerate(corners: &[[f32; 2]; 4], min_sep: f32) -> bool {
    for i in 0..4 {
        for j in (i + 1)..4 {
            let dx = corners[i][0] - corners[j][0];
            let dy = corners[i][1] - corners[j][1];
            if (dx * dx + dy * dy).sqrt() < min_sep {
                return true;
            }
        }
    }
    false
}

/// Enumerates and deduplicates faces bounded by two segments of each family.
pub fn reconstruct_faces(class1: &[Segment], class2: &[Segment], params: &FaceParams) -> Vec<Face> {
    let thr = params.match_distance_px;
    let dist = |a: &Segment, b: &Segment| segment_distance(a.p0, a.p1, b.p0, b.p1);

    let mut candidates: Vec<Face> = Vec::new();
    for i in 0..class1.len() {
        let e1 = &class1[i];
        for j in 0..class2.len() {
            let e2 = &class2[j];
            if dist(e1, e2) > thr {
                continue;
            }
            for k in (i + 1)..class1.len() {
                let e3 = &class1[k];
                if dist(e2, e3) > thr {
                    continue;
                }
                for l in (j + 1)..class2.len() {
                    let e4 = &class2[l];
                    if dist(e3, e4) > thr || dist(e4, e1) > thr {
                        continue;
                    }
                    let cs = [
                        line_intersection(e1.p0, e1.p1, e2.p0, e2.p1),
                        line_intersection(e2.p0, e2.p1, e3.p0, e3.p1),
                        line_intersection(e3.p0, e3.p1, e4.p0, e4.p1),
                        line_intersection(e4.p0, e4.p1, e1.p0, e1.p1),
                    ];
                    let [Some(c0), Some(c1), Some(c2), Some(c3)] = cs else {
                        continue;
                    };
                    let mut corners = [c0, c1, c2, c3];
                    if corners_degenerate(&corners, params.min_corner_separation_px) {
                        continue;
                    }
                    if signed_area_doubled(&corners) < 0.0 {
                        corners.reverse();
                    }
                    candidates.push(Face {
                        corners,
                        class1_pair: (i, k),
                        class2_pair: (j, l),
                    });
                }
            }
        }
    }

    let kept = dedup_overlaps(candidates);
    debug!("faces: kept {}", kept.len());
    kept
}

fn dedup_overlaps(candidates: Vec<Face>) -> Vec<Face> {
    let mut kept = Vec::new();
    'outer: for (a, fa) in candidates.iter().enumerate() {
        for (b, fb) in candidates.iter().enumerate() {
            if a == b {
                continue;
            }
            let shared =
                fa.class1_pair == fb.class1_pair || fa.class2_pair == fb.class2_pair;
            if !shared {
                continue;
            }
            let overlap = point_in_convex_polygon(fa.centroid(), &fb.corners)
                || point_in_convex_polygon(fb.centroid(), &fa.corners);
            if !overlap {
                continue;
            }
            let (ca, cb) = (fa.circumference(), fb.circumference());
            if cb < ca || (cb == ca && b < a) {
                continue 'outer;
            }
        }
        kept.push(fa.clone());
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(a: [f32; 2], b: [f32; 2]) -> Segment {
        Segment::new(a, b)
    }

    fn corner_set(face: &Face) -> Vec<(i32, i32)> {
        let mut v: Vec<(i32, i32)> = face
            .corners
            .iter()
            .map(|p| (p[0].round() as i32, p[1].round() as i32))
            .collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn exact_square_yields_one_face() {
        let class1 = vec![seg([0.0, 0.0], [0.0, 10.0]), seg([10.0, 0.0], [10.0, 10.0])];
        let class2 = vec![seg([0.0, 0.0], [10.0, 0.0]), seg([0.0, 10.0], [10.0, 10.0])];
        let faces = reconstruct_faces(&class1, &class2, &FaceParams::default());
        assert_eq!(faces.len(), 1);
        assert_eq!(
            corner_set(&faces[0]),
            vec![(0, 0), (0, 10), (10, 0), (10, 10)]
        );
        // Winding is normalized to clockwise in image coordinates.
        assert!(signed_area_doubled(&faces[0].corners) > 0.0);
    }

    #[test]
    fn square_survives_with_zero_threshold() {
        let class1 = vec![seg([0.0, 0.0], [0.0, 10.0]), seg([10.0, 0.0], [10.0, 10.0])];
        let class2 = vec![seg([0.0, 0.0], [10.0, 0.0]), seg([0.0, 10.0], [10.0, 10.0])];
        let params = FaceParams {
            match_distance_px: 0.0,
            ..Default::default()
        };
        let faces = reconstruct_faces(&class1, &class2, &params);
        assert_eq!(faces.len(), 1);
    }

    #[test]
    fn distant_families_produce_nothing() {
        let class1 = vec![seg([0.0, 0.0], [0.0, 10.0]), seg([10.0, 0.0], [10.0, 10.0])];
        let class2 = vec![
            seg([100.0, 100.0], [110.0, 100.0]),
            seg([100.0, 110.0], [110.0, 110.0]),
        ];
        assert!(reconstruct_faces(&class1, &class2, &FaceParams::default()).is_empty());
    }

    #[test]
    fn overlapping_shared_pair_keeps_smaller_circumference() {
        let class1 = vec![seg([0.0, 0.0], [0.0, 10.0]), seg([10.0, 0.0], [10.0, 10.0])];
        let class2 = vec![
            seg([0.0, 0.0], [10.0, 0.0]),
            seg([0.0, 10.0], [10.0, 10.0]),
            seg([0.0, 13.0], [10.0, 13.0]),
        ];
        let faces = reconstruct_faces(&class1, &class2, &FaceParams::default());
        // The 10×13 quad shares the class1 pair with the square and contains
        // its centroid; only the square and the disjoint 10×3 band survive.
        assert_eq!(faces.len(), 2);
        assert!(faces
            .iter()
            .any(|f| corner_set(f) == vec![(0, 0), (0, 10), (10, 0), (10, 10)]));
        assert!(faces
            .iter()
            .any(|f| corner_set(f) == vec![(0, 10), (0, 13), (10, 10), (10, 13)]));
    }

    #[test]
    fn collinear_family_members_are_degenerate() {
        // Both class2 members lie on one line: two corners coincide.
        let class1 = vec![seg([0.0, 0.0], [0.0, 10.0]), seg([10.0, 0.0], [10.0, 10.0])];
        let class2 = vec![seg([0.0, 0.0], [4.0, 0.0]), seg([6.0, 0.0], [10.0, 0.0])];
        assert!(reconstruct_faces(&class1, &class2, &FaceParams::default()).is_empty());
    }
}
