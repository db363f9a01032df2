//! Point types and related functionality

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use bytemuck::{Pod, Zeroable};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;

/// A point annotated with the smoothing scale at which it was detected
///
/// This is the output type of the keypoint detector: the original
/// position plus the standard deviation of the Gaussian level where the
/// point was a scale-space extremum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct ScalePoint3f {
    pub position: Point3f,
    pub scale: f32,
}

unsafe impl Pod for ScalePoint3f {}
unsafe impl Zeroable for ScalePoint3f {}

impl ScalePoint3f {
    /// Create a new scale-annotated point
    pub fn new(position: Point3f, scale: f32) -> Self {
        Self { position, scale }
    }
}

impl Default for ScalePoint3f {
    fn default() -> Self {
        Self {
            position: Point3f::origin(),
            scale: 0.0,
        }
    }
}

impl From<ScalePoint3f> for Point3f {
    fn from(point: ScalePoint3f) -> Self {
        point.position
    }
}
