use super::ConsolidateParams;
use crate::segments::Segment;

const EPS: f32 = 1e-6;

/// Running cluster of near-collinear segments: a length-weighted average
/// line in normal form plus every endpoint absorbed so far.
struct LineCluster {
    line: [f32; 3],
    weight: f32,
    points: Vec<[f32; 2]>,
}

impl LineCluster {
    fn new(line: [f32; 3], weight: f32, seg: &Segment) -> Self {
        Self {
            line,
            weight,
            points: vec![seg.p0, seg.p1],
        }
    }

    fn absorb(&mut self, line: &[f32; 3], weight: f32, seg: &Segment) {
        let total = self.weight + weight;
        if total <= EPS {
            return;
        }
        for i in 0..3 {
            self.line[i] = (self.line[i] * self.weight + line[i] * weight) / total;
        }
        let norm = (self.line[0] * self.line[0] + self.line[1] * self.line[1])
            .sqrt()
            .max(EPS);
        for v in self.line.iter_mut() {
            *v /= norm;
        }
        self.weight = total;
        self.points.push(seg.p0);
        self.points.push(seg.p1);
    }

    /// Representative segment spanning the extreme endpoint projections
    /// along the cluster tangent.
    fn into_segment(self) -> Segment {
        let tangent = [-self.line[1], self.line[0]];
        let mut lo = f32::INFINITY;
        let mut hi = f32::NEG_INFINITY;
        let mut p_lo = self.points[0];
        let mut p_hi = self.points[0];
        for p in self.points {
            let s = p[0] * tangent[0] + p[1] * tangent[1];
            if s < lo {
                lo = s;
                p_lo = p;
            }
            if s > hi {
                hi = s;
                p_hi = p;
            }
        }
        Segment::new(p_lo, p_hi)
    }
}

/// Greedy first-fit merge of near-parallel, near-collinear segments within
/// one axis family. Orientation proximity is measured on unit normals
/// (sign-aligned so antipodal normal forms of the same line compare equal)
/// and collinearity as the normal-form offset difference.
pub fn merge_collinear(segments: &[Segment], params: &ConsolidateParams) -> Vec<Segment> {
    let angle_tol = params.merge_angle_tol_deg.to_radians();
    let mut clusters: Vec<LineCluster> = Vec::new();
    for seg in segments {
        let line = seg.line();
        let weight = seg.length().max(EPS);
        let mut placed = false;
        for cluster in clusters.iter_mut() {
            let mut adj = [line[0], line[1], line[2]];
            if cluster.line[0] * adj[0] + cluster.line[1] * adj[1] < 0.0 {
                adj = [-adj[0], -adj[1], -adj[2]];
            }
            let dot = (cluster.line[0] * adj[0] + cluster.line[1] * adj[1]).clamp(-1.0, 1.0);
            let angle = dot.acos();
            let dist = (cluster.line[2] - adj[2]).abs();
            if angle <= angle_tol && dist <= params.merge_dist_px {
                cluster.absorb(&adj, weight, seg);
                placed = true;
                break;
            }
        }
        if !placed {
            clusters.push(LineCluster::new([line[0], line[1], line[2]], weight, seg));
        }
    }
    clusters.into_iter().map(LineCluster::into_segment).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collinear_duplicates_merge_into_spanning_segment() {
        let segs = vec![
            Segment::new([0.0, 0.0], [10.0, 0.0]),
            Segment::new([9.0, 0.4], [20.0, 0.2]),
        ];
        let merged = merge_collinear(&segs, &ConsolidateParams::default());
        assert_eq!(merged.len(), 1);
        let m = &merged[0];
        assert!((m.p0[0] - 0.0).abs() < 1e-4 && (m.p1[0] - 20.0).abs() < 1e-4);
    }

    #[test]
    fn parallel_but_offset_segments_stay_apart() {
        let segs = vec![
            Segment::new([0.0, 0.0], [10.0, 0.0]),
            Segment::new([0.0, 8.0], [10.0, 8.0]),
        ];
        let merged = merge_collinear(&segs, &ConsolidateParams::default());
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn reversed_duplicate_merges_despite_antipodal_normal() {
        let segs = vec![
            Segment::new([0.0, 0.0], [10.0, 0.0]),
            Segment::new([20.0, 0.0], [10.0, 0.0]),
        ];
        let merged = merge_collinear(&segs, &ConsolidateParams::default());
        assert_eq!(merged.len(), 1);
    }
}
