//! Nearest neighbor search implementations

use cloudsift_core::{Error, NearestNeighborSearch, Point3f, Result};
use kdtree::distance::squared_euclidean;

/// KD-Tree implementation for nearest neighbor search
///
/// Built once over a fixed set of positions; queries are read-only and
/// safe to issue concurrently. Query results are sorted by distance and
/// then by point index, so downstream passes see a deterministic order.
pub struct KdTreeSearch {
    tree: kdtree::KdTree<f32, usize, [f32; 3]>,
    len: usize,
}

impl KdTreeSearch {
    pub fn new(points: &[Point3f]) -> Result<Self> {
        let mut tree = kdtree::KdTree::new(3);
        for (idx, point) in points.iter().enumerate() {
            tree.add([point.x, point.y, point.z], idx)
                .map_err(|e| Error::InvalidData(format!("cannot index point {}: {:?}", idx, e)))?;
        }
        Ok(Self {
            tree,
            len: points.len(),
        })
    }
}

impl NearestNeighborSearch for KdTreeSearch {
    fn find_k_nearest(&self, query: &Point3f, k: usize) -> Vec<(usize, f32)> {
        if self.len == 0 || k == 0 {
            return Vec::new();
        }

        let mut neighbors: Vec<(usize, f32)> = self
            .tree
            .nearest(&[query.x, query.y, query.z], k, &squared_euclidean)
            .map(|found| {
                found
                    .into_iter()
                    .map(|(dist_sq, &idx)| (idx, dist_sq.sqrt()))
                    .collect()
            })
            .unwrap_or_default();

        sort_by_distance(&mut neighbors);
        neighbors
    }

    fn find_radius_neighbors(&self, query: &Point3f, radius: f32) -> Vec<(usize, f32)> {
        if self.len == 0 || radius <= 0.0 {
            return Vec::new();
        }

        let mut neighbors: Vec<(usize, f32)> = self
            .tree
            .within(&[query.x, query.y, query.z], radius * radius, &squared_euclidean)
            .map(|found| {
                found
                    .into_iter()
                    .map(|(dist_sq, &idx)| (idx, dist_sq.sqrt()))
                    .collect()
            })
            .unwrap_or_default();

        sort_by_distance(&mut neighbors);
        neighbors
    }
}

/// Simple brute force nearest neighbor search for small datasets
///
/// Kept as the reference implementation the kd-tree is checked against.
pub struct BruteForceSearch {
    points: Vec<Point3f>,
}

impl BruteForceSearch {
    pub fn new(points: &[Point3f]) -> Self {
        Self {
            points: points.to_vec(),
        }
    }
}

impl NearestNeighborSearch for BruteForceSearch {
    fn find_k_nearest(&self, query: &Point3f, k: usize) -> Vec<(usize, f32)> {
        let mut distances: Vec<(usize, f32)> = self
            .points
            .iter()
            .enumerate()
            .map(|(idx, point)| {
                let dx = point.x - query.x;
                let dy = point.y - query.y;
                let dz = point.z - query.z;
                let distance = (dx * dx + dy * dy + dz * dz).sqrt();
                (idx, distance)
            })
            .collect();

        sort_by_distance(&mut distances);
        distances.truncate(k);
        distances
    }

    fn find_radius_neighbors(&self, query: &Point3f, radius: f32) -> Vec<(usize, f32)> {
        let radius_squared = radius * radius;
        let mut neighbors: Vec<(usize, f32)> = self
            .points
            .iter()
            .enumerate()
            .filter_map(|(idx, point)| {
                let dx = point.x - query.x;
                let dy = point.y - query.y;
                let dz = point.z - query.z;
                let distance_squared = dx * dx + dy * dy + dz * dz;

                if distance_squared <= radius_squared {
                    Some((idx, distance_squared.sqrt()))
                } else {
                    None
                }
            })
            .collect();

        sort_by_distance(&mut neighbors);
        neighbors
    }
}

fn sort_by_distance(neighbors: &mut [(usize, f32)]) {
    neighbors.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
}
