//! I/O operations for point clouds
//!
//! This crate provides reading and writing of the point cloud formats the
//! keypoint pipeline consumes and produces: PLY and plain ASCII XYZ.

pub mod ply;
pub mod xyz;

pub use ply::{PlyReader, PlyWriter};
pub use xyz::{XyzReader, XyzWriter};

use cloudsift_core::{PointCloud, Point3f, Result};

/// Trait for reading point clouds from files
pub trait PointCloudReader {
    fn read_point_cloud<P: AsRef<std::path::Path>>(path: P) -> Result<PointCloud<Point3f>>;
}

/// Trait for writing point clouds to files
pub trait PointCloudWriter {
    fn write_point_cloud<P: AsRef<std::path::Path>>(
        cloud: &PointCloud<Point3f>,
        path: P,
    ) -> Result<()>;
}

/// Auto-detect format and read point cloud
pub fn read_point_cloud<P: AsRef<std::path::Path>>(path: P) -> Result<PointCloud<Point3f>> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("ply") => ply::PlyReader::read_point_cloud(path),
        Some("xyz") | Some("txt") => xyz::XyzReader::read_point_cloud(path),
        _ => Err(cloudsift_core::Error::UnsupportedFormat(format!(
            "Unsupported point cloud format: {:?}",
            path.extension()
        ))),
    }
}

/// Auto-detect format and write point cloud
pub fn write_point_cloud<P: AsRef<std::path::Path>>(
    cloud: &PointCloud<Point3f>,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("ply") => ply::PlyWriter::write_point_cloud(cloud, path),
        Some("xyz") | Some("txt") => xyz::XyzWriter::write_point_cloud(cloud, path),
        _ => Err(cloudsift_core::Error::UnsupportedFormat(format!(
            "Unsupported point cloud format: {:?}",
            path.extension()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_ply_point_cloud_roundtrip() {
        let temp_file = "test_cloud_roundtrip.ply";

        let mut cloud = PointCloud::new();
        cloud.push(Point3f::new(0.0, 0.0, 0.0));
        cloud.push(Point3f::new(1.0, 0.0, 0.0));
        cloud.push(Point3f::new(0.0, 1.0, 0.25));

        write_point_cloud(&cloud, temp_file).unwrap();
        let loaded_cloud = read_point_cloud(temp_file).unwrap();

        assert_eq!(cloud.len(), loaded_cloud.len());
        for (original, loaded) in cloud.iter().zip(loaded_cloud.iter()) {
            assert!((original.x - loaded.x).abs() < 1e-6);
            assert!((original.y - loaded.y).abs() < 1e-6);
            assert!((original.z - loaded.z).abs() < 1e-6);
        }

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_xyz_point_cloud_roundtrip() {
        let temp_file = "test_cloud_roundtrip.xyz";

        let cloud = PointCloud::from_points(vec![
            Point3f::new(-1.5, 2.0, 0.125),
            Point3f::new(3.25, -4.0, 7.5),
        ]);

        write_point_cloud(&cloud, temp_file).unwrap();
        let loaded_cloud = read_point_cloud(temp_file).unwrap();

        assert_eq!(cloud.len(), loaded_cloud.len());
        for (original, loaded) in cloud.iter().zip(loaded_cloud.iter()) {
            assert!((original.x - loaded.x).abs() < 1e-5);
            assert!((original.y - loaded.y).abs() < 1e-5);
            assert!((original.z - loaded.z).abs() < 1e-5);
        }

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let result = read_point_cloud("cloud.las");
        assert!(matches!(
            result,
            Err(cloudsift_core::Error::UnsupportedFormat(_))
        ));
    }
}
