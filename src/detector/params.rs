//! Parameter types configuring the detector stages.
//!
//! Defaults reproduce the reference behaviour of the pipeline on VGA-class
//! inputs. For tuning, start with the classifier multiplier and the face
//! match distance.

use crate::camera::Intrinsics;
use crate::classify::ClassifierParams;
use crate::consolidate::ConsolidateParams;
use crate::estimator::EstimatorParams;
use crate::faces::FaceParams;
use crate::lift::LiftParams;
use serde::{Deserialize, Serialize};

/// Detector-wide parameters controlling the full pipeline.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct CuboidParams {
    /// Camera intrinsics; also define the focal-point screen mapping.
    pub intrinsics: Intrinsics,
    pub estimator: EstimatorParams,
    pub classifier: ClassifierParams,
    pub consolidate: ConsolidateParams,
    pub faces: FaceParams,
    pub lift: LiftParams,
}

impl CuboidParams {
    /// Parameters with intrinsics derived from the image dimensions.
    pub fn from_image_size(width: usize, height: usize) -> Self {
        Self {
            intrinsics: Intrinsics::from_image_size(width, height),
            ..Default::default()
        }
    }
}
