use crate::detector::CuboidParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct DemoConfig {
    /// JSON file holding the input segments as `[[[x,y],[x,y]], ...]`.
    pub input: PathBuf,
    pub image_width: usize,
    pub image_height: usize,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    pub output: DemoOutputConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct PipelineConfig {
    pub seed: Option<u64>,
    pub coarse_trials: Option<usize>,
    pub refine_trials: Option<usize>,
    pub threshold_multiplier: Option<f32>,
    pub match_distance_px: Option<f32>,
}

impl PipelineConfig {
    pub fn resolve(&self, width: usize, height: usize) -> CuboidParams {
        let mut params = CuboidParams::from_image_size(width, height);
        params.estimator.seed = self.seed;
        params.lift.seed = self.seed;
        if let Some(v) = self.coarse_trials {
            params.estimator.coarse_trials = v;
        }
        if let Some(v) = self.refine_trials {
            params.estimator.refine_trials = v;
        }
        if let Some(v) = self.threshold_multiplier {
            params.classifier.threshold_multiplier = v;
        }
        if let Some(v) = self.match_distance_px {
            params.faces.match_distance_px = v;
        }
        params
    }
}

#[derive(Debug, Deserialize)]
pub struct DemoOutputConfig {
    pub result_json: PathBuf,
}

pub fn load_config(path: &Path) -> Result<DemoConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
