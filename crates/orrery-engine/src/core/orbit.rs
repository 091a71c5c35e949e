//! Parametric orbit propagation.
//!
//! Angles accumulate in f64 (a year of simulated milliseconds times an
//! angular speed is a large number); positions drop to f32 only at the end.

use glam::{DMat3, DVec3, Mat4, Vec3};
use std::f64::consts::TAU;

use crate::components::body::CelestialBody;

/// Per-body orbital state, mutated once per frame by the propagator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    /// Accumulated orbital angle (radians). Never decreases.
    pub angle: f64,
    /// Accumulated axial spin (radians).
    pub spin: f64,
    /// World position from the last step.
    pub position: Vec3,
    /// Spin and tilt from the last step.
    pub orientation: Mat4,
}

impl Default for OrbitState {
    fn default() -> Self {
        Self {
            angle: 0.0,
            spin: 0.0,
            position: Vec3::ZERO,
            orientation: Mat4::IDENTITY,
        }
    }
}

/// World position on a circular orbit of `radius`, in the XZ plane tilted
/// about the X axis by `tilt`.
///
/// Shared by live propagation and trace precomputation so both produce the
/// same bits for the same angle.
pub fn orbit_position(radius: f64, tilt: f64, angle: f64) -> Vec3 {
    let flat = DVec3::new(radius * angle.cos(), 0.0, radius * angle.sin());
    (DMat3::from_rotation_x(tilt) * flat).as_vec3()
}

/// Spin about the local Y axis, then tilt about X.
pub fn body_orientation(tilt: f64, spin: f64) -> Mat4 {
    Mat4::from_rotation_x(tilt as f32) * Mat4::from_rotation_y((spin % TAU) as f32)
}

/// Orbit period in radians. Non-finite or non-positive values fall back to 2π.
pub fn valid_full_angle(full_angle: f64) -> f64 {
    if full_angle.is_finite() && full_angle > 0.0 {
        full_angle
    } else {
        TAU
    }
}

/// Advances every body's orbital angle and derives its world transform.
#[derive(Debug, Clone, Copy)]
pub struct OrbitalPropagator {
    full_angle: f64,
}

impl OrbitalPropagator {
    pub fn new(full_angle: f64) -> Self {
        let valid = valid_full_angle(full_angle);
        if valid != full_angle {
            log::warn!("invalid full angle {full_angle}, falling back to 2π");
        }
        Self { full_angle: valid }
    }

    pub fn full_angle(&self) -> f64 {
        self.full_angle
    }

    /// Angle actually used for positioning.
    pub fn effective_angle(&self, angle: f64) -> f64 {
        angle.rem_euclid(self.full_angle)
    }

    /// Place every body as if `simulated_ms` had already elapsed, so orbits
    /// start mid-cycle instead of lined up at angle zero.
    pub fn seed(&self, bodies: &mut [CelestialBody], simulated_ms: f64) {
        for body in bodies.iter_mut() {
            body.orbit.angle = body.angular_speed * simulated_ms;
            body.orbit.spin = body.spin_speed * simulated_ms;
            self.refresh(body);
        }
    }

    /// Accumulate `simulated_delta_ms` of motion into every body.
    pub fn step(&self, bodies: &mut [CelestialBody], simulated_delta_ms: f64) {
        let delta = simulated_delta_ms.max(0.0);
        for body in bodies.iter_mut() {
            body.orbit.angle += body.angular_speed * delta;
            body.orbit.spin += body.spin_speed * delta;
            self.refresh(body);
        }
    }

    fn refresh(&self, body: &mut CelestialBody) {
        let tilt = body.tilt as f64;
        let angle = self.effective_angle(body.orbit.angle);
        body.orbit.position = orbit_position(body.orbit_radius as f64, tilt, angle);
        body.orbit.orientation = body_orientation(tilt, body.orbit.spin);
    }
}
