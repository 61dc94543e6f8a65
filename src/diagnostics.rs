//! Structured diagnostics emitted alongside the pipeline result.

use crate::types::CuboidResult;
use serde::Serialize;

/// Timing entry for a single pipeline stage.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

/// Aggregated timing trace for one detector run.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming {
            label: label.into(),
            elapsed_ms,
        });
    }
}

/// Per-stage element counts.
#[derive(Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageCounts {
    /// Segments handed to the detector.
    pub input: usize,
    /// Segments surviving the minimum-length filter.
    pub length_filtered: usize,
    /// Classified segments per axis family.
    pub classified: [usize; 3],
    /// Segments dropped as unclassified.
    pub unclassified: usize,
    /// Family sizes after both consolidation passes.
    pub consolidated: [usize; 3],
    /// Faces per normal axis.
    pub faces: [usize; 3],
}

/// Pipeline result together with counts and timings.
#[derive(Clone, Debug, Serialize)]
pub struct DetectionReport {
    pub result: CuboidResult,
    pub counts: StageCounts,
    pub timing: TimingBreakdown,
}
