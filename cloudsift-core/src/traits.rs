//! Core traits for cloudsift

use crate::{point::*, point_cloud::*};

/// Trait for nearest neighbor search functionality
///
/// Implementations are built once over a fixed cloud and answer repeated
/// queries without mutation. Results are `(index, distance)` pairs into
/// the cloud the structure was built from, sorted by distance and then
/// by index so that query output is deterministic. Queries against an
/// empty structure return an empty result.
pub trait NearestNeighborSearch {
    /// Find the k nearest neighbors to a query point
    fn find_k_nearest(&self, query: &Point3f, k: usize) -> Vec<(usize, f32)>;

    /// Find all neighbors within a given radius
    fn find_radius_neighbors(&self, query: &Point3f, radius: f32) -> Vec<(usize, f32)>;
}

/// Trait selecting the scalar field a point contributes to the detector
///
/// The detector treats one scalar per point as its "intensity". This
/// seam keeps the algorithm generic over elevation, curvature, or any
/// other per-point quantity without specializing the pipeline.
pub trait FieldSelector<P> {
    /// The scalar field value of a point
    fn field_value(&self, point: &P) -> f32;
}

impl<P, F> FieldSelector<P> for F
where
    F: Fn(&P) -> f32,
{
    fn field_value(&self, point: &P) -> f32 {
        self(point)
    }
}

/// Selects a point's elevation (`z`) as the scalar field
///
/// This is the field the system is configured with by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct Elevation;

impl FieldSelector<Point3f> for Elevation {
    fn field_value(&self, point: &Point3f) -> f32 {
        point.z
    }
}

/// Trait for drawable/renderable objects
pub trait Drawable {
    /// Get the bounding box of the object
    fn bounding_box(&self) -> (Point3f, Point3f);

    /// Get the center point of the object
    fn center(&self) -> Point3f;
}

impl<T> Drawable for PointCloud<T>
where
    T: Clone + Copy,
    Point3f: From<T>,
{
    fn bounding_box(&self) -> (Point3f, Point3f) {
        if self.is_empty() {
            return (Point3f::origin(), Point3f::origin());
        }

        let first_point = Point3f::from(self.points[0]);
        let mut min = first_point;
        let mut max = first_point;

        for point in &self.points {
            let p = Point3f::from(*point);
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);

            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        (min, max)
    }

    fn center(&self) -> Point3f {
        let (min, max) = self.bounding_box();
        Point3f::new(
            (min.x + max.x) / 2.0,
            (min.y + max.y) / 2.0,
            (min.z + max.z) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elevation_selector() {
        let p = Point3f::new(1.0, 2.0, 3.5);
        assert_eq!(Elevation.field_value(&p), 3.5);
    }

    #[test]
    fn test_closure_selector() {
        let curvature = |p: &Point3f| p.x + p.y;
        let p = Point3f::new(1.0, 2.0, 3.5);
        assert_eq!(curvature.field_value(&p), 3.0);
    }

    #[test]
    fn test_bounding_box() {
        let cloud = PointCloud::from_points(vec![
            Point3f::new(-1.0, 0.0, 2.0),
            Point3f::new(3.0, -2.0, 0.5),
            Point3f::new(0.0, 1.0, -1.0),
        ]);

        let (min, max) = cloud.bounding_box();
        assert_eq!(min, Point3f::new(-1.0, -2.0, -1.0));
        assert_eq!(max, Point3f::new(3.0, 1.0, 2.0));
        assert_eq!(cloud.center(), Point3f::new(1.0, -0.5, 0.5));
    }
}
