//! SIFT keypoint detection on point clouds
//!
//! Detects points of the cloud whose difference-of-Gaussians response is
//! a strict extremum over its spatial and scale neighborhood, and whose
//! response magnitude clears the configured contrast threshold. Keypoints
//! carry the standard deviation of the level they were found at; a point
//! that is extreme at several scales is reported once per scale.

use crate::nearest_neighbor::KdTreeSearch;
use crate::scale_space;
use cloudsift_core::{
    Elevation, Error, FieldSelector, NearestNeighborSearch, Point3f, PointCloud, Result,
    ScalePoint3f,
};
use log::debug;
use rayon::prelude::*;

/// Parameters of one keypoint detection run
///
/// Fixed for the duration of a run and validated before any computation
/// starts; invalid values are reported as errors, never clamped.
#[derive(Debug, Clone, Copy)]
pub struct SiftConfig {
    /// Standard deviation of the smallest scale in the scale space
    pub min_scale: f32,
    /// Number of octaves, i.e. doublings of the base deviation
    pub n_octaves: usize,
    /// Number of scales within each octave
    pub n_scales_per_octave: usize,
    /// Minimum accepted difference-of-Gaussians magnitude
    pub min_contrast: f32,
}

impl Default for SiftConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.2,
            n_octaves: 10,
            n_scales_per_octave: 8,
            min_contrast: 0.0,
        }
    }
}

impl SiftConfig {
    pub fn new(
        min_scale: f32,
        n_octaves: usize,
        n_scales_per_octave: usize,
        min_contrast: f32,
    ) -> Self {
        Self {
            min_scale,
            n_octaves,
            n_scales_per_octave,
            min_contrast,
        }
    }

    /// Check the parameters, before anything is computed from them
    pub fn validate(&self) -> Result<()> {
        if !self.min_scale.is_finite() || self.min_scale <= 0.0 {
            return Err(Error::Config(format!(
                "min_scale must be positive, got {}",
                self.min_scale
            )));
        }
        if self.n_octaves < 1 {
            return Err(Error::Config("n_octaves must be at least 1".to_string()));
        }
        if self.n_scales_per_octave < 1 {
            return Err(Error::Config(
                "n_scales_per_octave must be at least 1".to_string(),
            ));
        }
        if !self.min_contrast.is_finite() || self.min_contrast < 0.0 {
            return Err(Error::Config(format!(
                "min_contrast must be non-negative, got {}",
                self.min_contrast
            )));
        }
        Ok(())
    }
}

/// A scale-space extremum before contrast filtering
struct Candidate {
    point: usize,
    level: usize,
    value: f32,
}

/// Detect SIFT keypoints using point elevation as the scalar field
///
/// Builds a kd-tree index over the cloud and runs the detector with the
/// `z` coordinate as the intensity, the configuration this system uses
/// for raw elevation data.
///
/// # Example
/// ```rust
/// use cloudsift_core::{PointCloud, Point3f};
/// use cloudsift_algorithms::{detect_sift_keypoints, SiftConfig};
///
/// fn main() -> cloudsift_core::Result<()> {
///     let cloud = PointCloud::from_points(vec![
///         Point3f::new(0.0, 0.0, 0.6),
///         Point3f::new(0.4, 0.0, 0.0),
///         Point3f::new(0.0, 0.4, 0.0),
///     ]);
///
///     let config = SiftConfig::new(0.2, 2, 3, 0.01);
///     let keypoints = detect_sift_keypoints(&cloud, &config)?;
///     println!("detected {} keypoints", keypoints.len());
///     Ok(())
/// }
/// ```
pub fn detect_sift_keypoints(
    cloud: &PointCloud<Point3f>,
    config: &SiftConfig,
) -> Result<PointCloud<ScalePoint3f>> {
    config.validate()?;
    if cloud.is_empty() {
        return Ok(PointCloud::new());
    }

    let index = KdTreeSearch::new(&cloud.points)?;
    detect_sift_keypoints_with(cloud, &index, &Elevation, config)
}

/// Detect SIFT keypoints over a caller-supplied index and scalar field
///
/// Generic over the spatial index (any [`NearestNeighborSearch`], e.g. a
/// brute-force index in tests) and over the scalar field driving the
/// detector (any [`FieldSelector`], e.g. a closure reading curvature).
///
/// Keypoints are emitted in a fixed order: octave ascending, then
/// original cloud order, then scale level ascending, so identical input
/// and configuration always produce identical output.
pub fn detect_sift_keypoints_with<S, F>(
    cloud: &PointCloud<Point3f>,
    index: &S,
    selector: &F,
    config: &SiftConfig,
) -> Result<PointCloud<ScalePoint3f>>
where
    S: NearestNeighborSearch + Sync,
    F: FieldSelector<Point3f>,
{
    config.validate()?;

    let mut keypoints = PointCloud::new();
    if cloud.is_empty() {
        return Ok(keypoints);
    }

    let values = scale_space::field_values(cloud, selector);

    for octave in 0..config.n_octaves {
        let sigmas =
            scale_space::octave_sigmas(config.min_scale, octave, config.n_scales_per_octave);
        let levels = scale_space::build_octave(cloud, &values, index, &sigmas);
        let dog = scale_space::difference_of_gaussians(&levels);

        let candidates = find_scale_space_extrema(cloud, index, &dog, &sigmas);
        let mut kept = 0usize;
        for candidate in &candidates {
            if candidate.value.abs() >= config.min_contrast {
                kept += 1;
                keypoints.push(ScalePoint3f::new(
                    cloud.points[candidate.point],
                    sigmas[candidate.level],
                ));
            }
        }

        debug!(
            "octave {}: {} extrema, {} above contrast threshold",
            octave,
            candidates.len(),
            kept
        );
    }

    Ok(keypoints)
}

/// Strict extrema of the difference-of-Gaussians stack of one octave
///
/// A point qualifies at an interior level if its response is strictly
/// above or strictly below every response in its comparison set: the
/// spatial neighbors within the level's radius, taken at the level and
/// both adjacent levels, plus the point itself at the adjacent levels.
/// Ties never qualify, and neither does a point whose neighborhood holds
/// nothing but itself.
fn find_scale_space_extrema<S>(
    cloud: &PointCloud<Point3f>,
    index: &S,
    dog: &[Vec<f32>],
    sigmas: &[f32],
) -> Vec<Candidate>
where
    S: NearestNeighborSearch + Sync,
{
    let per_point: Vec<Vec<Candidate>> = cloud
        .points
        .par_iter()
        .enumerate()
        .map(|(point_idx, point)| {
            let mut found = Vec::new();

            for level in 1..dog.len() - 1 {
                let radius = scale_space::search_radius(sigmas[level]);
                let neighbors: Vec<usize> = index
                    .find_radius_neighbors(point, radius)
                    .into_iter()
                    .map(|(idx, _)| idx)
                    .filter(|&idx| idx != point_idx)
                    .collect();
                if neighbors.is_empty() {
                    continue;
                }

                let value = dog[level][point_idx];
                let mut is_min = true;
                let mut is_max = true;

                'compare: for compare_level in level - 1..=level + 1 {
                    for &neighbor in &neighbors {
                        let other = dog[compare_level][neighbor];
                        if value <= other {
                            is_max = false;
                        }
                        if value >= other {
                            is_min = false;
                        }
                        if !is_min && !is_max {
                            break 'compare;
                        }
                    }
                }
                for &compare_level in &[level - 1, level + 1] {
                    let other = dog[compare_level][point_idx];
                    if value <= other {
                        is_max = false;
                    }
                    if value >= other {
                        is_min = false;
                    }
                }

                if is_min || is_max {
                    found.push(Candidate {
                        point: point_idx,
                        level,
                        value,
                    });
                }
            }

            found
        })
        .collect();

    per_point.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_config_validation() {
        assert!(SiftConfig::default().validate().is_ok());

        assert!(SiftConfig::new(0.0, 1, 1, 0.0).validate().is_err());
        assert!(SiftConfig::new(-0.5, 1, 1, 0.0).validate().is_err());
        assert!(SiftConfig::new(f32::NAN, 1, 1, 0.0).validate().is_err());
        assert!(SiftConfig::new(0.2, 0, 1, 0.0).validate().is_err());
        assert!(SiftConfig::new(0.2, 1, 0, 0.0).validate().is_err());
        assert!(SiftConfig::new(0.2, 1, 1, -0.1).validate().is_err());
    }

    #[test]
    fn test_empty_cloud_yields_empty_result() {
        let cloud = PointCloud::new();
        let keypoints = detect_sift_keypoints(&cloud, &SiftConfig::new(0.2, 2, 3, 0.0)).unwrap();
        assert!(keypoints.is_empty());
    }

    #[test]
    fn test_invalid_config_fails_before_computation() {
        let cloud = PointCloud::from_points(vec![Point3f::origin()]);
        let result = detect_sift_keypoints(&cloud, &SiftConfig::new(0.2, 0, 3, 0.0));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_single_point_cloud_has_no_keypoints() {
        // one point can never be compared against anything
        let cloud = PointCloud::from_points(vec![Point3f::new(1.0, 2.0, 3.0)]);
        let keypoints = detect_sift_keypoints(&cloud, &SiftConfig::new(0.2, 2, 3, 0.0)).unwrap();
        assert!(keypoints.is_empty());
    }

    #[test]
    fn test_custom_selector_matches_elevation_on_z() {
        let cloud = PointCloud::from_points(vec![
            Point3f::new(0.0, 0.0, 0.6157),
            Point3f::new(0.35, 0.35, 0.0),
            Point3f::new(0.35, -0.35, 0.0),
            Point3f::new(-0.35, 0.35, 0.0),
            Point3f::new(-0.35, -0.35, 0.0),
        ]);
        let config = SiftConfig::new(0.2, 1, 3, 0.0);
        let index = KdTreeSearch::new(&cloud.points).unwrap();

        let by_elevation =
            detect_sift_keypoints_with(&cloud, &index, &Elevation, &config).unwrap();
        let by_closure =
            detect_sift_keypoints_with(&cloud, &index, &|p: &Point3f| p.z, &config).unwrap();
        assert_eq!(by_elevation, by_closure);
    }

    #[test]
    fn test_detection_scale_follows_octave() {
        // the sigma attached to a keypoint is taken from the octave's
        // schedule, so it scales with min_scale
        let cloud = PointCloud::from_points(vec![
            Point3f::new(0.0, 0.0, 0.6157),
            Point3f::new(0.35, 0.35, 0.0),
            Point3f::new(0.35, -0.35, 0.0),
            Point3f::new(-0.35, 0.35, 0.0),
            Point3f::new(-0.35, -0.35, 0.0),
        ]);
        let keypoints =
            detect_sift_keypoints(&cloud, &SiftConfig::new(0.2, 1, 3, 0.0)).unwrap();
        assert_eq!(keypoints.len(), 1);
        assert_relative_eq!(
            keypoints[0].scale,
            0.2 * 2f32.powf(2.0 / 3.0),
            epsilon = 1e-5
        );
    }
}
