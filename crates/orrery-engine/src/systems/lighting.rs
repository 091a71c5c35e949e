/// Point light for the planetary scene.
///
/// There is a single light per frame, positioned on the first emitter body.
/// Each draw then picks its shading path from its own `LightRole`.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::api::types::LightRole;
use crate::components::body::CelestialBody;

/// World-space point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: [f32; 3],
}

impl PointLight {
    pub fn new(position: Vec3, color: [f32; 3]) -> Self {
        Self { position, color }
    }

    /// Light sitting on the first emitter in declaration order, or at the
    /// origin when the scene has no emitter.
    pub fn from_bodies(bodies: &[CelestialBody], color: [f32; 3]) -> Self {
        let position = bodies
            .iter()
            .find(|b| b.is_light_emitter())
            .map(|b| b.orbit.position)
            .unwrap_or(Vec3::ZERO);
        Self::new(position, color)
    }

    pub fn uniform(&self) -> LightUniform {
        LightUniform {
            position: self.position.extend(1.0).to_array(),
            color: [self.color[0], self.color[1], self.color[2], 1.0],
        }
    }
}

/// GPU-side light data. 8 floats / 32 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LightUniform {
    pub position: [f32; 4],
    pub color: [f32; 4],
}

/// The two shader switches a draw binds, derived from its role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightFlags {
    pub is_emitter: bool,
    pub is_receiver: bool,
}

impl From<LightRole> for LightFlags {
    fn from(role: LightRole) -> Self {
        match role {
            LightRole::Emitter => Self { is_emitter: true, is_receiver: false },
            LightRole::Receiver => Self { is_emitter: false, is_receiver: true },
            LightRole::None => Self { is_emitter: false, is_receiver: false },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_sits_on_first_emitter() {
        let mut sun = CelestialBody::new("sun").with_light_role(LightRole::Emitter);
        sun.orbit.position = Vec3::new(1.0, 2.0, 3.0);
        let mut other = CelestialBody::new("other").with_light_role(LightRole::Emitter);
        other.orbit.position = Vec3::splat(9.0);
        let planet = CelestialBody::new("planet").with_light_role(LightRole::Receiver);

        let light = PointLight::from_bodies(&[planet, sun, other], [1.0, 0.9, 0.8]);
        assert_eq!(light.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(light.color, [1.0, 0.9, 0.8]);
    }

    #[test]
    fn no_emitter_means_origin() {
        let light = PointLight::from_bodies(&[CelestialBody::new("rock")], [1.0; 3]);
        assert_eq!(light.position, Vec3::ZERO);
    }

    #[test]
    fn flags_per_role() {
        assert_eq!(LightFlags::from(LightRole::Emitter), LightFlags { is_emitter: true, is_receiver: false });
        assert_eq!(LightFlags::from(LightRole::Receiver), LightFlags { is_emitter: false, is_receiver: true });
        assert_eq!(LightFlags::from(LightRole::None), LightFlags { is_emitter: false, is_receiver: false });
    }

    #[test]
    fn light_uniform_is_8_floats() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 32);
    }
}
