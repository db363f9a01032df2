//! # cloudsift Algorithms
//!
//! Scale-invariant keypoint detection for unordered 3D point clouds.
//!
//! This crate adapts the classical SIFT detector to scattered geometric
//! data: a Gaussian scale space of a per-point scalar field (elevation by
//! default) is built with radius-weighted smoothing over a spatial index,
//! differences of adjacent levels approximate the Laplacian response, and
//! strict extrema over the spatial/scale neighborhood that survive a
//! contrast threshold become keypoints tagged with their detection scale.

pub mod nearest_neighbor;
pub mod scale_space;
pub mod sift;

// Re-export commonly used items
pub use nearest_neighbor::*;
pub use scale_space::*;
pub use sift::*;
