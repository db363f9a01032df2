//! ASCII XYZ point cloud format support
//!
//! One point per line as whitespace-separated `x y z`; blank lines and
//! `#` comment lines are skipped. This is the simplest text form the
//! pipeline can exchange clouds in.

use crate::{PointCloudReader, PointCloudWriter};
use cloudsift_core::{Error, PointCloud, Point3f, Result};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub struct XyzReader;
pub struct XyzWriter;

impl PointCloudReader for XyzReader {
    fn read_point_cloud<P: AsRef<Path>>(path: P) -> Result<PointCloud<Point3f>> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);

        let mut points = Vec::new();
        for (line_number, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            if fields.len() < 3 {
                return Err(Error::InvalidData(format!(
                    "line {}: expected 3 coordinates, found {}",
                    line_number + 1,
                    fields.len()
                )));
            }

            let mut coords = [0.0f32; 3];
            for (coord, field) in coords.iter_mut().zip(fields.iter()) {
                *coord = field.parse().map_err(|_| {
                    Error::InvalidData(format!(
                        "line {}: invalid coordinate '{}'",
                        line_number + 1,
                        field
                    ))
                })?;
            }

            points.push(Point3f::new(coords[0], coords[1], coords[2]));
        }

        debug!("read {} points from {:?}", points.len(), path.as_ref());
        Ok(PointCloud::from_points(points))
    }
}

impl PointCloudWriter for XyzWriter {
    fn write_point_cloud<P: AsRef<Path>>(cloud: &PointCloud<Point3f>, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);

        for point in &cloud.points {
            writeln!(writer, "{} {} {}", point.x, point.y, point.z)?;
        }
        writer.flush()?;

        debug!("wrote {} points to {:?}", cloud.len(), path.as_ref());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write as _;

    #[test]
    fn test_read_xyz_with_comments_and_blanks() {
        let temp_file = "test_read_comments.xyz";

        let content = "# elevation samples\n\
\n\
0.0 0.0 1.25\n\
  2.0\t-3.0 0.5  \n";
        let mut file = fs::File::create(temp_file).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        drop(file);

        let cloud = XyzReader::read_point_cloud(temp_file).unwrap();
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud[0], Point3f::new(0.0, 0.0, 1.25));
        assert_eq!(cloud[1], Point3f::new(2.0, -3.0, 0.5));

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_short_line_is_rejected() {
        let temp_file = "test_short_line.xyz";

        let mut file = fs::File::create(temp_file).unwrap();
        file.write_all(b"1.0 2.0\n").unwrap();
        drop(file);

        assert!(XyzReader::read_point_cloud(temp_file).is_err());

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_non_numeric_field_is_rejected() {
        let temp_file = "test_bad_field.xyz";

        let mut file = fs::File::create(temp_file).unwrap();
        file.write_all(b"1.0 two 3.0\n").unwrap();
        drop(file);

        assert!(XyzReader::read_point_cloud(temp_file).is_err());

        let _ = fs::remove_file(temp_file);
    }
}
