//! 2-D geometry kernel shared by every pipeline stage.
//!
//! Points are `[f32; 2]` in pixel coordinates (origin top-left, x right,
//! y down). All intersection helpers operate on the infinite supporting
//! lines of their segment arguments; parallel configurations are reported
//! as `None` and it is the caller's job to skip the affected candidate.

const EPS: f32 = 1e-6;

/// Interpolation parameters (t, s) of the supporting-line crossing of
/// segments `a→b` and `c→d`, so that the crossing equals
/// `a + t·(b−a) = c + s·(d−c)`. `None` when the lines are (near) parallel.
pub fn segment_intersection_params(
    a: [f32; 2],
    b: [f32; 2],
    c: [f32; 2],
    d: [f32; 2],
) -> Option<(f32, f32)> {
    let r = [b[0] - a[0], b[1] - a[1]];
    let s = [d[0] - c[0], d[1] - c[1]];
    let den = r[0] * s[1] - r[1] * s[0];
    let r_norm = (r[0] * r[0] + r[1] * r[1]).sqrt();
    let s_norm = (s[0] * s[0] + s[1] * s[1]).sqrt();
    if den.abs() <= EPS * r_norm.max(EPS) * s_norm.max(EPS) {
        return None;
    }
    let qp = [c[0] - a[0], c[1] - a[1]];
    let t = (qp[0] * s[1] - qp[1] * s[0]) / den;
    let u = (qp[0] * r[1] - qp[1] * r[0]) / den;
    Some((t, u))
}

/// Intersection of the infinite supporting lines of `a→b` and `c→d`.
pub fn line_intersection(a: [f32; 2], b: [f32; 2], c: [f32; 2], d: [f32; 2]) -> Option<[f32; 2]> {
    let (t, _) = segment_intersection_params(a, b, c, d)?;
    Some([a[0] + t * (b[0] - a[0]), a[1] + t * (b[1] - a[1])])
}

fn point_segment_distance(p: [f32; 2], a: [f32; 2], b: [f32; 2]) -> f32 {
    let ab = [b[0] - a[0], b[1] - a[1]];
    let ap = [p[0] - a[0], p[1] - a[1]];
    let len_sq = ab[0] * ab[0] + ab[1] * ab[1];
    let t = if len_sq <= EPS {
        0.0
    } else {
        ((ap[0] * ab[0] + ap[1] * ab[1]) / len_sq).clamp(0.0, 1.0)
    };
    let dx = p[0] - (a[0] + t * ab[0]);
    let dy = p[1] - (a[1] + t * ab[1]);
    (dx * dx + dy * dy).sqrt()
}

/// Minimum distance between the finite segments `a→b` and `c→d`;
/// zero when they cross.
pub fn segment_distance(a: [f32; 2], b: [f32; 2], c: [f32; 2], d: [f32; 2]) -> f32 {
    if let Some((t, s)) = segment_intersection_params(a, b, c, d) {
        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&s) {
            return 0.0;
        }
    }
    point_segment_distance(a, c, d)
        .min(point_segment_distance(b, c, d))
        .min(point_segment_distance(c, a, b))
        .min(point_segment_distance(d, a, b))
}

/// Tests whether `p` lies inside the convex polygon `poly` (consistently
/// wound) by requiring a consistent cross-product sign across the edges.
pub fn point_in_convex_polygon(p: [f32; 2], poly: &[[f32; 2]]) -> bool {
    let n = poly.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0i32;
    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        let cross = (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0]);
        if cross.abs() <= EPS {
            continue;
        }
        let s = if cross > 0.0 { 1 } else { -1 };
        if sign == 0 {
            sign = s;
        } else if s != sign {
            return false;
        }
    }
    true
}

/// Sum of the edge lengths of a quadrilateral.
pub fn face_circumference(face: &[[f32; 2]; 4]) -> f32 {
    let mut total = 0.0;
    for i in 0..4 {
        let a = face[i];
        let b = face[(i + 1) % 4];
        let dx = b[0] - a[0];
        let dy = b[1] - a[1];
        total += (dx * dx + dy * dy).sqrt();
    }
    total
}

/// Twice the signed area of a quadrilateral (shoelace). Positive for
/// clockwise winding in image coordinates (y pointing down).
pub fn signed_area_doubled(face: &[[f32; 2]; 4]) -> f32 {
    let mut sum = 0.0;
    for i in 0..4 {
        let a = face[i];
        let b = face[(i + 1) % 4];
        sum += a[0] * b[1] - b[0] * a[1];
    }
    sum
}
