use super::ConsolidateParams;
use crate::geometry::segment_intersection_params;
use crate::segments::Segment;

/// Cuts segments at crossings with the other families.
///
/// For each segment the crossing parameters against every segment of
/// `others` are examined in order; the first crossing that falls strictly
/// inside `(margin, 1−margin)` on *both* segments replaces the segment with
/// its two halves. Parallel pairs produce no parameters and are skipped,
/// and at most one cut is applied per segment.
pub fn split_at_intersections(
    segments: &[Segment],
    others: &[Segment],
    params: &ConsolidateParams,
) -> Vec<Segment> {
    let lo = params.split_margin;
    let hi = 1.0 - params.split_margin;
    let mut out = Vec::with_capacity(segments.len());
    for seg in segments {
        let mut cut: Option<[f32; 2]> = None;
        for other in others {
            let Some((t, s)) = segment_intersection_params(seg.p0, seg.p1, other.p0, other.p1)
            else {
                continue;
            };
            if t > lo && t < hi && s > lo && s < hi {
                cut = Some([
                    seg.p0[0] + t * (seg.p1[0] - seg.p0[0]),
                    seg.p0[1] + t * (seg.p1[1] - seg.p0[1]),
                ]);
                break;
            }
        }
        match cut {
            Some(p) => {
                out.push(Segment::new(seg.p0, p));
                out.push(Segment::new(p, seg.p1));
            }
            None => out.push(seg.clone()),
        }
    }
    out
}
