use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::api::config::MeshConfig;

/// Interleaved vertex as uploaded to the backend.
/// 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Triangle mesh. Vertex order is draw order; immutable once generated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
}

impl Mesh {
    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// UV-sphere tessellator.
///
/// Latitude `phi` runs over `[0, phi_max]` and longitude `theta` over
/// `[0, theta_max]` in whole-degree steps. Both poles and the seam keep a full
/// ring of vertices, so every cell is a quad and the counts below are exact
/// functions of the step sizes. A step that does not divide its range leaves a
/// narrower last band, which still ends exactly on `phi_max` / `theta_max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SphereMeshGenerator {
    phi_max_deg: u32,
    theta_max_deg: u32,
    lat_step_deg: u32,
    lon_step_deg: u32,
}

impl SphereMeshGenerator {
    pub fn new(phi_max_deg: u32, theta_max_deg: u32, lat_step_deg: u32, lon_step_deg: u32) -> Self {
        let phi_max_deg = phi_max_deg.clamp(1, 180);
        let theta_max_deg = theta_max_deg.clamp(1, 360);
        let lat_step_deg = lat_step_deg.clamp(1, phi_max_deg);
        let lon_step_deg = lon_step_deg.clamp(1, theta_max_deg);
        if phi_max_deg % lat_step_deg != 0 || theta_max_deg % lon_step_deg != 0 {
            log::warn!(
                "sphere steps {lat_step_deg}°/{lon_step_deg}° do not divide {phi_max_deg}°/{theta_max_deg}°, last bands are narrower"
            );
        }
        Self {
            phi_max_deg,
            theta_max_deg,
            lat_step_deg,
            lon_step_deg,
        }
    }

    pub fn from_config(config: &MeshConfig) -> Self {
        Self::new(
            config.phi_max_deg,
            config.theta_max_deg,
            config.lat_step_deg,
            config.lon_step_deg,
        )
    }

    /// Latitude bands.
    pub fn lat_cells(&self) -> usize {
        self.phi_max_deg.div_ceil(self.lat_step_deg) as usize
    }

    /// Longitude bands.
    pub fn lon_cells(&self) -> usize {
        self.theta_max_deg.div_ceil(self.lon_step_deg) as usize
    }

    pub fn quad_count(&self) -> usize {
        self.lat_cells() * self.lon_cells()
    }

    pub fn vertex_count(&self) -> usize {
        (self.lat_cells() + 1) * (self.lon_cells() + 1)
    }

    pub fn index_count(&self) -> usize {
        self.quad_count() * 6
    }

    /// Build a sphere of radius `size`.
    pub fn generate(&self, size: f32) -> Mesh {
        let rows = self.lat_cells();
        let cols = self.lon_cells();
        let phi_max = self.phi_max_deg as f32;
        let theta_max = self.theta_max_deg as f32;

        let mut vertices = Vec::with_capacity(self.vertex_count());
        for row in 0..=rows {
            let phi_deg = (row as u32 * self.lat_step_deg).min(self.phi_max_deg) as f32;
            let phi = phi_deg.to_radians();
            for col in 0..=cols {
                let theta_deg = (col as u32 * self.lon_step_deg).min(self.theta_max_deg) as f32;
                let theta = theta_deg.to_radians();

                let dir = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
                vertices.push(MeshVertex {
                    position: (dir * size).to_array(),
                    normal: dir.normalize_or_zero().to_array(),
                    uv: [theta_deg / theta_max, phi_deg / phi_max],
                });
            }
        }

        let stride = (cols + 1) as u32;
        let mut indices = Vec::with_capacity(self.index_count());
        for row in 0..rows as u32 {
            for col in 0..cols as u32 {
                let a = row * stride + col;
                let b = a + stride;
                // Two triangles per cell: (a, b, a+1) and (a+1, b, b+1).
                indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
            }
        }

        Mesh { vertices, indices }
    }
}

impl Default for SphereMeshGenerator {
    fn default() -> Self {
        Self::from_config(&MeshConfig::default())
    }
}
