//! Camera utilities for 3D visualization

use cloudsift_core::Point3f;
use nalgebra::{Matrix4, Perspective3, Point3, Unit, UnitQuaternion, Vector3};

/// A 3D camera orbiting a target point
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    home_position: Point3<f32>,
    home_target: Point3<f32>,
}

impl Camera {
    /// Create a new camera
    pub fn new(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fov: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            target,
            up,
            fov,
            aspect_ratio,
            near,
            far,
            home_position: position,
            home_target: target,
        }
    }

    /// Create a camera framing a bounding box
    ///
    /// The camera is placed diagonally away from the box center, far
    /// enough that the whole box is in view, looking down at it with the
    /// `z` axis up (elevation data reads naturally that way).
    pub fn framed(bounds: (Point3f, Point3f), aspect_ratio: f32) -> Self {
        let (min, max) = bounds;
        let center = Point3::new(
            (min.x + max.x) / 2.0,
            (min.y + max.y) / 2.0,
            (min.z + max.z) / 2.0,
        );
        let extent = ((max - min).norm() / 2.0).max(1e-3);
        let distance = extent * 2.5;

        let position = center + Vector3::new(distance, -distance, distance * 0.8);
        Self::new(
            position,
            center,
            Vector3::z(),
            std::f32::consts::FRAC_PI_4,
            aspect_ratio,
            (extent * 0.01).min(0.1),
            extent * 100.0,
        )
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let perspective = Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far);
        perspective.into_inner()
    }

    /// Rotate the camera around the target
    pub fn orbit(&mut self, horizontal: f32, vertical: f32) {
        let offset = self.position - self.target;
        let radius = offset.norm();
        if radius <= 0.0 {
            return;
        }

        let up_axis = Unit::new_normalize(self.up);
        let yawed = UnitQuaternion::from_axis_angle(&up_axis, -horizontal) * offset;

        let right = yawed.cross(&self.up);
        if right.norm() > 1e-6 {
            let right_axis = Unit::new_normalize(right);
            let pitched = UnitQuaternion::from_axis_angle(&right_axis, -vertical) * yawed;
            // stay away from the poles so the view never flips over
            if pitched.normalize().dot(&up_axis).abs() < 0.99 {
                self.position = self.target + pitched;
                return;
            }
        }

        self.position = self.target + yawed;
    }

    /// Slide the camera and its target parallel to the view plane
    pub fn pan(&mut self, horizontal: f32, vertical: f32) {
        let view = self.target - self.position;
        let right = view.cross(&self.up);
        if right.norm() <= 1e-6 {
            return;
        }
        let right = right.normalize();
        let screen_up = right.cross(&view).normalize();

        let delta = (right * -horizontal + screen_up * vertical) * view.norm();
        self.position += delta;
        self.target += delta;
    }

    /// Move the camera toward (positive) or away from the target
    pub fn zoom(&mut self, amount: f32) {
        let offset = self.position - self.target;
        let radius = offset.norm();
        if radius <= 0.0 {
            return;
        }

        let new_radius = (radius * (1.0 - amount)).max(self.near * 2.0);
        self.position = self.target + offset * (new_radius / radius);
    }

    /// Return to the pose the camera was created with
    pub fn reset(&mut self) {
        self.position = self.home_position;
        self.target = self.home_target;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Point3::new(5.0, -5.0, 4.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::z(),
            std::f32::consts::FRAC_PI_4,
            16.0 / 9.0,
            0.1,
            100.0,
        )
    }
}
