//! Perspective Camera
//!
//! Right-handed, looking down -Z from its position. The projection matrix is
//! cached and only recomputed by [`PerspectiveCamera::update_projection_matrix`],
//! so changing `aspect` alone has no visible effect until that call.

use glam::{Mat4, Vec3};

use crate::CameraConfig;

pub struct PerspectiveCamera {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Width / height of the drawing surface
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Camera position in world space
    pub position: Vec3,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov_degrees,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        Self::new(config.fov_degrees, aspect, config.near, config.far)
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Recompute the cached projection from fov, aspect and clip planes.
    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        // Looks straight down -Z
        Mat4::look_to_rh(self.position, Vec3::NEG_Z, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 1.0)
    }
}
