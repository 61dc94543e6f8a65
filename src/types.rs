use crate::camera::{FocalPointTriple, ViewAngle};
use crate::classify::ClassifiedEdges;
use crate::faces::Face;
use nalgebra::{Matrix3, Vector3};
use serde::Serialize;

/// Rigid camera pose: rotation and translation mapping cuboid coordinates
/// into the camera frame.
#[derive(Clone, Debug, Serialize)]
pub struct Pose {
    pub r: Matrix3<f32>,
    pub t: Vector3<f32>,
}

/// Faces grouped by the axis normal to them (a face reconstructed from the
/// X and Y families is normal to Z, and so on).
#[derive(Clone, Debug, Default, Serialize)]
pub struct FaceGroups {
    pub x: Vec<Face>,
    pub y: Vec<Face>,
    pub z: Vec<Face>,
}

impl FaceGroups {
    pub fn counts(&self) -> [usize; 3] {
        [self.x.len(), self.y.len(), self.z.len()]
    }

    pub fn len(&self) -> usize {
        self.x.len() + self.y.len() + self.z.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Face> {
        self.x.iter().chain(self.y.iter()).chain(self.z.iter())
    }
}

/// Output of the core pipeline: the fitted view, its focal points, the
/// consolidated per-axis edges and the reconstructed faces.
#[derive(Clone, Debug, Serialize)]
pub struct CuboidResult {
    pub view: ViewAngle,
    pub fit_loss: f32,
    pub focal_points: FocalPointTriple,
    pub edges: ClassifiedEdges,
    pub faces: FaceGroups,
}
