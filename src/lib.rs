#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod camera;
pub mod classify;
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod faces;
pub mod segments;
pub mod types;

// "Expert" modules - public, but considered unstable internals.
pub mod angle;
pub mod config;
pub mod consolidate;
pub mod estimator;
pub mod geometry;
pub mod jsonio;
pub mod lift;

// --- High-level re-exports -------------------------------------------------

pub use crate::camera::{Intrinsics, ViewAngle};
pub use crate::classify::{AxisClass, ClassifiedEdges};
pub use crate::detector::{CuboidDetector, CuboidParams};
pub use crate::diagnostics::DetectionReport;
pub use crate::error::Error;
pub use crate::faces::Face;
pub use crate::segments::Segment;
pub use crate::types::{CuboidResult, Pose};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
pub mod prelude {
    pub use crate::detector::{CuboidDetector, CuboidParams};
    pub use crate::segments::Segment;
    pub use crate::types::CuboidResult;
}
