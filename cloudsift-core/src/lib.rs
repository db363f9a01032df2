//! Core data structures and traits for cloudsift
//!
//! This crate provides the fundamental types for scale-invariant keypoint
//! detection on 3D point clouds: points, point clouds, keypoints tagged
//! with their detection scale, and the capability traits the detector is
//! generic over.

pub mod point;
pub mod point_cloud;
pub mod traits;
pub mod error;

pub use point::*;
pub use point_cloud::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};

/// Common result type for cloudsift operations
pub type Result<T> = std::result::Result<T, Error>;
