//! End-to-end tests for the SIFT keypoint pipeline

use approx::assert_relative_eq;
use cloudsift_algorithms::{
    detect_sift_keypoints, detect_sift_keypoints_with, BruteForceSearch, SiftConfig,
};
use cloudsift_core::{Elevation, Point3f, PointCloud};

/// Four points at z = 0 forming a square, with an elevated apex above its
/// center. The ring spacing is tighter than the ring-to-apex distance, so
/// the ring points always see a twin with the same response (ties are
/// rejected) while the apex becomes a strict scale-space minimum once the
/// ring enters its neighborhood.
fn peak_cloud(half_side: f32, apex_height: f32, offset: Point3f) -> Vec<Point3f> {
    vec![
        Point3f::new(offset.x, offset.y, offset.z + apex_height),
        Point3f::new(offset.x + half_side, offset.y + half_side, offset.z),
        Point3f::new(offset.x + half_side, offset.y - half_side, offset.z),
        Point3f::new(offset.x - half_side, offset.y + half_side, offset.z),
        Point3f::new(offset.x - half_side, offset.y - half_side, offset.z),
    ]
}

#[test]
fn sharp_peak_yields_exactly_one_keypoint() {
    let cloud = PointCloud::from_points(peak_cloud(0.35, 0.6157, Point3f::origin()));
    let config = SiftConfig::new(0.2, 1, 3, 0.0);

    let keypoints = detect_sift_keypoints(&cloud, &config).unwrap();

    assert_eq!(keypoints.len(), 1);
    assert_eq!(keypoints[0].position, Point3f::new(0.0, 0.0, 0.6157));
    assert_relative_eq!(keypoints[0].scale, 0.2 * 2f32.powf(2.0 / 3.0), epsilon = 1e-5);
}

#[test]
fn flat_cloud_yields_no_keypoints() {
    let mut points = Vec::new();
    for i in 0..6 {
        for j in 0..6 {
            points.push(Point3f::new(i as f32 * 0.2, j as f32 * 0.2, 0.5));
        }
    }
    let cloud = PointCloud::from_points(points);

    let keypoints = detect_sift_keypoints(&cloud, &SiftConfig::new(0.2, 2, 3, 0.0)).unwrap();
    assert!(keypoints.is_empty());
}

#[test]
fn peaks_are_detected_at_matching_octaves() {
    // a narrow peak and a broad one (the same shape scaled 4x), far
    // enough apart that their neighborhoods never overlap
    let mut points = peak_cloud(0.35, 0.863148, Point3f::origin());
    points.extend(peak_cloud(1.4, 3.452593, Point3f::new(100.0, 0.0, 0.0)));
    let cloud = PointCloud::from_points(points);

    let config = SiftConfig::new(0.2, 3, 2, 0.0);
    let keypoints = detect_sift_keypoints(&cloud, &config).unwrap();

    assert_eq!(keypoints.len(), 2);

    // octave-ascending order puts the fine-scale detection first
    assert_eq!(keypoints[0].position, Point3f::new(0.0, 0.0, 0.863148));
    assert_relative_eq!(keypoints[0].scale, 0.4, epsilon = 1e-5);

    assert_eq!(keypoints[1].position, Point3f::new(100.0, 0.0, 3.452593));
    assert_relative_eq!(keypoints[1].scale, 1.6, epsilon = 1e-5);

    assert!(keypoints[0].scale < keypoints[1].scale);
}

#[test]
fn contrast_filter_is_monotonic() {
    let mut points = peak_cloud(0.35, 0.863148, Point3f::origin());
    points.extend(peak_cloud(1.4, 3.452593, Point3f::new(100.0, 0.0, 0.0)));
    let cloud = PointCloud::from_points(points);

    let mut previous = usize::MAX;
    for &min_contrast in &[0.0f32, 0.1, 0.3, 1.5] {
        let config = SiftConfig::new(0.2, 3, 2, min_contrast);
        let count = detect_sift_keypoints(&cloud, &config).unwrap().len();
        assert!(count <= previous);
        previous = count;
    }
}

#[test]
fn contrast_above_every_response_rejects_everything() {
    let cloud = PointCloud::from_points(peak_cloud(0.35, 0.6157, Point3f::origin()));
    let config = SiftConfig::new(0.2, 1, 3, 100.0);

    let keypoints = detect_sift_keypoints(&cloud, &config).unwrap();
    assert!(keypoints.is_empty());
}

#[test]
fn detection_is_deterministic() {
    let mut points = peak_cloud(0.35, 0.863148, Point3f::origin());
    points.extend(peak_cloud(1.4, 3.452593, Point3f::new(100.0, 0.0, 0.0)));
    let cloud = PointCloud::from_points(points);
    let config = SiftConfig::new(0.2, 3, 2, 0.0);

    let first = detect_sift_keypoints(&cloud, &config).unwrap();
    let second = detect_sift_keypoints(&cloud, &config).unwrap();

    assert_eq!(first, second);
}

#[test]
fn brute_force_index_matches_kdtree() {
    let cloud = PointCloud::from_points(peak_cloud(0.35, 0.6157, Point3f::origin()));
    let config = SiftConfig::new(0.2, 2, 3, 0.0);

    let with_kdtree = detect_sift_keypoints(&cloud, &config).unwrap();
    let index = BruteForceSearch::new(&cloud.points);
    let with_brute_force =
        detect_sift_keypoints_with(&cloud, &index, &Elevation, &config).unwrap();

    assert_eq!(with_kdtree, with_brute_force);
}
