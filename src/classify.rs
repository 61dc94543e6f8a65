//! Axis classification of segments against a fitted focal-point triple.
//!
//! Every segment is scored by the residual of its polar line to each of the
//! three focal points; the smallest residual names its axis family. A
//! segment whose best residual still exceeds `fit_loss ×
//! threshold_multiplier` supports none of the vanishing points (it is not a
//! cuboid edge under the fitted view) and is dropped from all downstream
//! collections. Classification is a pure function of the segment, the
//! triple and the threshold, so reclassifying an already classified set is
//! idempotent.

use crate::camera::FocalPointTriple;
use crate::segments::Segment;
use log::debug;
use serde::{Deserialize, Serialize};

/// The three cuboid axis families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisClass {
    X,
    Y,
    Z,
}

impl AxisClass {
    pub const ALL: [AxisClass; 3] = [AxisClass::X, AxisClass::Y, AxisClass::Z];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            AxisClass::X => 0,
            AxisClass::Y => 1,
            AxisClass::Z => 2,
        }
    }
}

/// Segments partitioned by axis family. Unclassified segments are not
/// carried along; only their count is reported.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ClassifiedEdges {
    pub x: Vec<Segment>,
    pub y: Vec<Segment>,
    pub z: Vec<Segment>,
}

impl ClassifiedEdges {
    pub fn class(&self, axis: AxisClass) -> &[Segment] {
        match axis {
            AxisClass::X => &self.x,
            AxisClass::Y => &self.y,
            AxisClass::Z => &self.z,
        }
    }

    pub fn counts(&self) -> [usize; 3] {
        [self.x.len(), self.y.len(), self.z.len()]
    }

    pub fn total(&self) -> usize {
        self.x.len() + self.y.len() + self.z.len()
    }
}

/// Knobs for the residual gate.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ClassifierParams {
    /// A segment is kept when its best residual is at most
    /// `fit_loss × threshold_multiplier`.
    pub threshold_multiplier: f32,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            threshold_multiplier: 1.2,
        }
    }
}

/// Partitions `segments` into axis families. Returns the partition and the
/// number of segments dropped as unclassified.
pub fn classify_edges(
    segments: &[Segment],
    triple: &FocalPointTriple,
    fit_loss: f32,
    params: &ClassifierParams,
) -> (ClassifiedEdges, usize) {
    let threshold = fit_loss * params.threshold_multiplier;
    let mut edges = ClassifiedEdges::default();
    let mut dropped = 0usize;
    for seg in segments {
        let line = seg.polar_line();
        let mut best_axis = AxisClass::X;
        let mut best = f32::INFINITY;
        for axis in AxisClass::ALL {
            let r = line.residual_to_point(triple.points[axis.index()]);
            if r < best {
                best = r;
                best_axis = axis;
            }
        }
        if best > threshold {
            dropped += 1;
            continue;
        }
        match best_axis {
            AxisClass::X => edges.x.push(seg.clone()),
            AxisClass::Y => edges.y.push(seg.clone()),
            AxisClass::Z => edges.z.push(seg.clone()),
        }
    }
    debug!(
        "classify: x={} y={} z={} dropped={} threshold={:.5}",
        edges.x.len(),
        edges.y.len(),
        edges.z.len(),
        dropped,
        threshold
    );
    (edges, dropped)
}
