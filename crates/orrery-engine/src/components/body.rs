use crate::api::types::{LightRole, LinesHandle, MeshHandle, TextureHandle};
use crate::assets::manifest::BodyDescriptor;
use crate::components::mesh::Mesh;
use crate::components::trace::OrbitTrace;
use crate::core::orbit::OrbitState;

/// A body of the planetary system: orbit parameters, look, and the static
/// buffers generated for it at load time.
#[derive(Debug, Clone)]
pub struct CelestialBody {
    pub name: String,
    /// Distance from the system origin in world units.
    pub orbit_radius: f32,
    /// Radians per simulated millisecond.
    pub angular_speed: f64,
    /// Axial spin, radians per simulated millisecond.
    pub spin_speed: f64,
    /// Radians; tilts both the orbit plane and the spin axis.
    pub tilt: f32,
    /// Sphere radius before the global size scale.
    pub size: f32,
    pub light_role: LightRole,
    pub has_orbit_trace: bool,
    pub texture: TextureHandle,
    pub orbit: OrbitState,
    mesh: Mesh,
    mesh_handle: MeshHandle,
    trace: Option<(OrbitTrace, LinesHandle)>,
}

impl CelestialBody {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            orbit_radius: 0.0,
            angular_speed: 0.0,
            spin_speed: 0.0,
            tilt: 0.0,
            size: 1.0,
            light_role: LightRole::None,
            has_orbit_trace: false,
            texture: TextureHandle(0),
            orbit: OrbitState::default(),
            mesh: Mesh::default(),
            mesh_handle: MeshHandle(0),
            trace: None,
        }
    }

    pub fn from_descriptor(desc: &BodyDescriptor, texture: TextureHandle) -> Self {
        Self::new(desc.name.clone())
            .with_orbit(desc.radius, desc.angular_speed)
            .with_spin(desc.spin_speed)
            .with_tilt(desc.tilt)
            .with_size(desc.size)
            .with_light_role(desc.light)
            .with_orbit_trace(desc.orbit_trace)
            .with_texture(texture)
    }

    // -- Builder pattern --

    pub fn with_orbit(mut self, radius: f32, angular_speed: f64) -> Self {
        self.orbit_radius = radius;
        self.angular_speed = angular_speed.max(0.0);
        self
    }

    pub fn with_spin(mut self, spin_speed: f64) -> Self {
        self.spin_speed = spin_speed;
        self
    }

    pub fn with_tilt(mut self, tilt: f32) -> Self {
        self.tilt = tilt;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_light_role(mut self, role: LightRole) -> Self {
        self.light_role = role;
        self
    }

    pub fn with_orbit_trace(mut self, enabled: bool) -> Self {
        self.has_orbit_trace = enabled;
        self
    }

    pub fn with_texture(mut self, texture: TextureHandle) -> Self {
        self.texture = texture;
        self
    }

    // -- Static buffers --

    pub fn attach_mesh(&mut self, mesh: Mesh, handle: MeshHandle) {
        self.mesh = mesh;
        self.mesh_handle = handle;
    }

    pub fn attach_trace(&mut self, trace: OrbitTrace, handle: LinesHandle) {
        self.trace = Some((trace, handle));
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn mesh_handle(&self) -> MeshHandle {
        self.mesh_handle
    }

    pub fn trace(&self) -> Option<&OrbitTrace> {
        self.trace.as_ref().map(|(trace, _)| trace)
    }

    pub fn trace_handle(&self) -> Option<LinesHandle> {
        self.trace.as_ref().map(|&(_, handle)| handle)
    }

    pub fn is_light_emitter(&self) -> bool {
        self.light_role == LightRole::Emitter
    }

    pub fn is_light_receiver(&self) -> bool {
        self.light_role == LightRole::Receiver
    }
}
