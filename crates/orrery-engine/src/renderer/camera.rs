use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::api::config::ProjectionConfig;

/// Perspective projection for the scene.
/// The matrix is cached and only rebuilt when the viewport changes.
#[derive(Debug, Clone)]
pub struct Projection {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    width: f32,
    height: f32,
    matrix: Mat4,
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
}

impl Projection {
    pub fn new(config: &ProjectionConfig) -> Self {
        let mut projection = Self {
            fov_y: config.fov_y_deg.to_radians(),
            near: config.near.max(f32::EPSILON),
            far: config.far,
            width: 1.0,
            height: 1.0,
            matrix: Mat4::IDENTITY,
        };
        projection.resize(config.viewport_width, config.viewport_height);
        projection
    }

    /// Resize the viewport (e.g. on window resize). Degenerate sizes are
    /// clamped to one pixel.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
        let far = self.far.max(self.near * 2.0);
        self.matrix = Mat4::perspective_rh(self.fov_y, self.aspect(), self.near, far);
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

}

impl CameraUniform {
    pub fn new(projection: Mat4, view: Mat4) -> Self {
        Self {
            projection: projection.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn aspect_follows_viewport() {
        let mut proj = Projection::new(&ProjectionConfig::default());
        proj.resize(1600.0, 900.0);
        assert!((proj.aspect() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn resize_rebuilds_matrix() {
        let mut proj = Projection::new(&ProjectionConfig::default());
        let before = proj.matrix();
        proj.resize(400.0, 400.0);
        assert_ne!(before, proj.matrix());
    }

    #[test]
    fn zero_viewport_is_clamped() {
        let mut proj = Projection::new(&ProjectionConfig::default());
        proj.resize(0.0, 0.0);
        assert_eq!(proj.viewport(), (1.0, 1.0));
        assert!(proj.matrix().is_finite());
    }

    #[test]
    fn near_plane_maps_to_depth_zero() {
        let proj = Projection::new(&ProjectionConfig::default());
        let clip = proj.matrix() * Vec4::new(0.0, 0.0, -proj.near, 1.0);
        assert!((clip.z / clip.w).abs() < 1e-4);
    }

    #[test]
    fn uniform_is_two_matrices() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 128);
        let proj = Projection::new(&ProjectionConfig::default());
        let view = Mat4::from_translation(glam::Vec3::new(0.0, 0.0, -5.0));
        let uniform = CameraUniform::new(proj.matrix(), view);
        assert_eq!(uniform.projection, proj.matrix().to_cols_array_2d());
        assert_eq!(uniform.view[3][2], -5.0);
    }
}
