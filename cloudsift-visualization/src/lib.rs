//! Visualization for detected keypoints
//!
//! This crate renders a point cloud together with its detected keypoints
//! in an interactive window: the input cloud in red, the keypoints in
//! green and larger, until the user closes the window. It is strictly
//! optional; nothing in the detection pipeline depends on it.

pub mod camera;
pub mod renderer;
pub mod shaders;
pub mod viewer;

pub use camera::*;
pub use renderer::*;
pub use viewer::*;

use cloudsift_core::{PointCloud, Point3f, Result, ScalePoint3f};

/// Show a cloud and its keypoints in an interactive viewer
///
/// Blocks until the window is closed.
pub fn show_keypoints(
    cloud: &PointCloud<Point3f>,
    keypoints: &PointCloud<ScalePoint3f>,
) -> Result<()> {
    KeypointViewer::new(cloud, keypoints).run()
}
