//! Gaussian scale space over a scattered scalar field
//!
//! The classical SIFT pyramid blurs a pixel grid; here there is no grid,
//! so each smoothing level is a Gaussian-weighted average over the radius
//! neighborhood of every point, with the radius growing alongside the
//! level's standard deviation. An octave holds `n_scales_per_octave + 3`
//! levels so that every difference-of-Gaussians level taking part in
//! extrema detection has both a finer and a coarser neighbor.

use cloudsift_core::{FieldSelector, NearestNeighborSearch, Point3f, PointCloud};
use rayon::prelude::*;

/// Ratio between a level's search radius and its Gaussian standard
/// deviation; 2.5 sigma captures about 98.8% of the kernel mass.
pub const RADIUS_PER_SIGMA: f32 = 2.5;

/// Neighborhood radius used for smoothing and extrema comparison at a
/// given standard deviation
pub fn search_radius(sigma: f32) -> f32 {
    RADIUS_PER_SIGMA * sigma
}

/// Standard deviations of the smoothing levels of one octave
///
/// Level `l` of octave `o` has
/// `sigma = min_scale * 2^o * 2^(l / n_scales_per_octave)`; each octave
/// doubles the base deviation of the previous one and spans
/// `n_scales_per_octave + 3` levels of monotonically increasing radius.
pub fn octave_sigmas(min_scale: f32, octave: usize, n_scales_per_octave: usize) -> Vec<f32> {
    let base = min_scale * 2f32.powi(octave as i32);
    (0..n_scales_per_octave + 3)
        .map(|level| base * 2f32.powf(level as f32 / n_scales_per_octave as f32))
        .collect()
}

/// Evaluate the scalar field once for every point of the cloud
pub fn field_values<F>(cloud: &PointCloud<Point3f>, selector: &F) -> Vec<f32>
where
    F: FieldSelector<Point3f>,
{
    cloud.iter().map(|p| selector.field_value(p)).collect()
}

/// One smoothing pass: the scalar field blurred at a single level
///
/// The smoothed value at `p` is the Gaussian-weighted average of the
/// field over `p`'s radius neighborhood (the query point itself is part
/// of that neighborhood, at distance zero and weight one). The average is
/// accumulated as an offset from `p`'s own value, so a locally constant
/// field is reproduced exactly and a point with an empty neighborhood
/// keeps its unsmoothed value.
pub fn smooth_field<S>(
    cloud: &PointCloud<Point3f>,
    values: &[f32],
    index: &S,
    sigma: f32,
) -> Vec<f32>
where
    S: NearestNeighborSearch + Sync,
{
    let radius = search_radius(sigma);
    let two_sigma_sq = 2.0 * sigma * sigma;

    cloud
        .points
        .par_iter()
        .enumerate()
        .map(|(point_idx, point)| {
            let own = values[point_idx];
            let neighbors = index.find_radius_neighbors(point, radius);
            if neighbors.is_empty() {
                return own;
            }

            let mut weight_sum = 0.0f32;
            let mut offset_sum = 0.0f32;
            for &(neighbor_idx, distance) in &neighbors {
                let weight = (-(distance * distance) / two_sigma_sq).exp();
                weight_sum += weight;
                offset_sum += weight * (values[neighbor_idx] - own);
            }

            own + offset_sum / weight_sum
        })
        .collect()
}

/// All smoothing levels of one octave, finest to coarsest
pub fn build_octave<S>(
    cloud: &PointCloud<Point3f>,
    values: &[f32],
    index: &S,
    sigmas: &[f32],
) -> Vec<Vec<f32>>
where
    S: NearestNeighborSearch + Sync,
{
    sigmas
        .iter()
        .map(|&sigma| smooth_field(cloud, values, index, sigma))
        .collect()
}

/// Differences of adjacent smoothing levels
///
/// `dog[l][p] = levels[l + 1][p] - levels[l][p]`, one level fewer than
/// the smoothed stack; approximates the scale-normalized Laplacian whose
/// extrema the detector looks for.
pub fn difference_of_gaussians(levels: &[Vec<f32>]) -> Vec<Vec<f32>> {
    levels
        .windows(2)
        .map(|pair| {
            pair[1]
                .iter()
                .zip(pair[0].iter())
                .map(|(coarser, finer)| coarser - finer)
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nearest_neighbor::KdTreeSearch;
    use approx::assert_relative_eq;
    use cloudsift_core::Elevation;

    #[test]
    fn test_octave_sigmas_monotonic() {
        let sigmas = octave_sigmas(0.2, 0, 3);
        assert_eq!(sigmas.len(), 6);
        assert_relative_eq!(sigmas[0], 0.2);
        assert_relative_eq!(sigmas[3], 0.4, epsilon = 1e-6);
        for pair in sigmas.windows(2) {
            assert!(pair[0] < pair[1]);
        }

        // each octave doubles the base deviation
        let next = octave_sigmas(0.2, 1, 3);
        assert_relative_eq!(next[0], 0.4, epsilon = 1e-6);
    }

    #[test]
    fn test_isolated_points_keep_their_value() {
        let cloud = PointCloud::from_points(vec![
            Point3f::new(0.0, 0.0, 1.5),
            Point3f::new(100.0, 0.0, -2.5),
        ]);
        let index = KdTreeSearch::new(&cloud.points).unwrap();
        let values = field_values(&cloud, &Elevation);

        let smoothed = smooth_field(&cloud, &values, &index, 0.5);
        assert_eq!(smoothed, values);
    }

    #[test]
    fn test_constant_field_is_reproduced_exactly() {
        let mut points = Vec::new();
        for i in 0..5 {
            for j in 0..5 {
                points.push(Point3f::new(i as f32 * 0.1, j as f32 * 0.1, 0.5));
            }
        }
        let cloud = PointCloud::from_points(points);
        let index = KdTreeSearch::new(&cloud.points).unwrap();
        let values = field_values(&cloud, &Elevation);

        for &sigma in &[0.1, 0.3, 1.0] {
            let smoothed = smooth_field(&cloud, &values, &index, sigma);
            assert!(smoothed.iter().all(|&v| v == 0.5));
        }
    }

    #[test]
    fn test_smoothing_pulls_toward_neighborhood_mean() {
        // a bump over a flat ring: smoothing must lower the bump and
        // raise the ring, without overshooting either
        let cloud = PointCloud::from_points(vec![
            Point3f::new(0.0, 0.0, 0.3),
            Point3f::new(0.3, 0.0, 0.0),
            Point3f::new(-0.3, 0.0, 0.0),
            Point3f::new(0.0, 0.3, 0.0),
            Point3f::new(0.0, -0.3, 0.0),
        ]);
        let index = KdTreeSearch::new(&cloud.points).unwrap();
        let values = field_values(&cloud, &Elevation);

        let smoothed = smooth_field(&cloud, &values, &index, 0.3);
        assert!(smoothed[0] < 0.3 && smoothed[0] > 0.0);
        for &v in &smoothed[1..] {
            assert!(v > 0.0 && v < smoothed[0]);
        }
    }

    #[test]
    fn test_difference_of_gaussians_layout() {
        let levels = vec![
            vec![1.0, 2.0, 3.0],
            vec![0.5, 2.5, 2.0],
            vec![0.25, 2.75, 1.5],
        ];
        let dog = difference_of_gaussians(&levels);
        assert_eq!(dog.len(), 2);
        assert_eq!(dog[0], vec![-0.5, 0.5, -1.0]);
        assert_eq!(dog[1], vec![-0.25, 0.25, -0.5]);
    }
}
