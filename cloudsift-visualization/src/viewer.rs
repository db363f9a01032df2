//! Interactive keypoint viewer
//!
//! Renders the input cloud and its detected keypoints in one window:
//! the cloud in red, the keypoints in green and noticeably larger, over a
//! black background. Left drag orbits, right drag pans, the wheel zooms,
//! `r` resets the camera. The loop runs until the window is closed.

use std::sync::Arc;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, Event, MouseButton, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::Key,
    window::WindowBuilder,
};

use cloudsift_core::{Drawable, Error, PointCloud, Point3f, Result, ScalePoint3f};
use log::info;

use crate::camera::Camera;
use crate::renderer::{point_cloud_to_vertices, PointCloudRenderer, PointVertex, RenderConfig};

const CLOUD_COLOR: [f32; 3] = [1.0, 0.0, 0.0];
const KEYPOINT_COLOR: [f32; 3] = [0.0, 1.0, 0.0];

/// Interactive viewer for a cloud and its keypoints
pub struct KeypointViewer {
    cloud: PointCloud<Point3f>,
    keypoints: PointCloud<Point3f>,
    camera: Camera,
    last_mouse_pos: Option<PhysicalPosition<f64>>,
    left_pressed: bool,
    right_pressed: bool,
}

impl KeypointViewer {
    /// Create a viewer for a cloud and its detected keypoints
    pub fn new(cloud: &PointCloud<Point3f>, keypoints: &PointCloud<ScalePoint3f>) -> Self {
        let camera = Camera::framed(cloud.bounding_box(), 1.0);
        Self {
            cloud: cloud.clone(),
            keypoints: keypoints.positions(),
            camera,
            last_mouse_pos: None,
            left_pressed: false,
            right_pressed: false,
        }
    }

    fn scene_vertices(&self) -> Vec<PointVertex> {
        let (min, max) = self.cloud.bounding_box();
        let extent = ((max - min).norm() / 2.0).max(1e-3);
        let point_size = extent * 0.002;

        let mut vertices = point_cloud_to_vertices(&self.cloud, CLOUD_COLOR, point_size);
        vertices.extend(point_cloud_to_vertices(
            &self.keypoints,
            KEYPOINT_COLOR,
            point_size * 4.0,
        ));
        vertices
    }

    /// Run the viewer until its window is closed
    pub fn run(mut self) -> Result<()> {
        info!(
            "showing {} points and {} keypoints",
            self.cloud.len(),
            self.keypoints.len()
        );

        let event_loop = EventLoop::new().map_err(|e| {
            Error::Visualization(format!("Failed to create event loop: {}", e))
        })?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title("cloudsift keypoints")
                .with_inner_size(winit::dpi::LogicalSize::new(1200.0, 800.0))
                .build(&event_loop)
                .map_err(|e| Error::Visualization(format!("Failed to create window: {}", e)))?,
        );

        let window_clone = window.clone();
        let mut renderer =
            pollster::block_on(PointCloudRenderer::new(&window_clone, RenderConfig::default()))?;

        let size = window.inner_size();
        self.camera.aspect_ratio = size.width as f32 / size.height.max(1) as f32;

        let vertices = self.scene_vertices();

        event_loop
            .run(move |event, target| {
                target.set_control_flow(ControlFlow::Poll);

                if let Event::WindowEvent { event, .. } = event {
                    match event {
                        WindowEvent::CloseRequested => {
                            target.exit();
                        }
                        WindowEvent::Resized(new_size) => {
                            renderer.resize(new_size);
                            self.camera.aspect_ratio =
                                new_size.width as f32 / new_size.height.max(1) as f32;
                        }
                        WindowEvent::MouseInput { state, button, .. } => match button {
                            MouseButton::Left => {
                                self.left_pressed = state == ElementState::Pressed;
                            }
                            MouseButton::Right => {
                                self.right_pressed = state == ElementState::Pressed;
                            }
                            _ => {}
                        },
                        WindowEvent::CursorMoved { position, .. } => {
                            if let Some(last_pos) = self.last_mouse_pos {
                                let delta_x = (position.x - last_pos.x) as f32;
                                let delta_y = (position.y - last_pos.y) as f32;

                                if self.left_pressed {
                                    self.camera.orbit(delta_x * 0.01, delta_y * 0.01);
                                } else if self.right_pressed {
                                    self.camera.pan(delta_x * 0.001, delta_y * 0.001);
                                }
                            }
                            self.last_mouse_pos = Some(position);
                        }
                        WindowEvent::MouseWheel { delta, .. } => {
                            let scroll_delta = match delta {
                                winit::event::MouseScrollDelta::LineDelta(_, y) => y,
                                winit::event::MouseScrollDelta::PixelDelta(pos) => {
                                    pos.y as f32 / 100.0
                                }
                            };
                            self.camera.zoom(scroll_delta * 0.1);
                        }
                        WindowEvent::KeyboardInput { event, .. } => {
                            if event.state == ElementState::Pressed {
                                if let Key::Character(c) = &event.logical_key {
                                    if c.as_str() == "r" || c.as_str() == "R" {
                                        self.camera.reset();
                                    }
                                }
                            }
                        }
                        WindowEvent::RedrawRequested => {
                            renderer.update_camera(
                                self.camera.view_matrix(),
                                self.camera.projection_matrix(),
                                self.camera.position.coords,
                            );

                            if let Err(e) = renderer.render(&vertices) {
                                eprintln!("Render error: {}", e);
                            }

                            window.request_redraw();
                        }
                        _ => {}
                    }
                }
            })
            .map_err(|e| Error::Visualization(format!("Event loop error: {}", e)))?;

        Ok(())
    }
}
