//! Free-flying inertial camera.
//!
//! Directional input never moves the eye directly: it feeds per-direction
//! velocities that ramp up while held and decay back to zero once released.
//! Pointer input steers a raw look target that the active target follows
//! through an exponential low-pass filter.

use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::FRAC_PI_2;

use crate::api::config::{CameraConfig, InertiaConfig};
use crate::api::types::{CameraMode, Direction, Phase};
use crate::input::queue::InputSnapshot;

/// Keeps the look vector away from the poles where `look_at` degenerates.
const MAX_PITCH: f32 = FRAC_PI_2 - 0.01;

/// Signed velocity increments per millisecond, indexed by direction and phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InertiaTable {
    rates: [[f32; 2]; 4],
}

impl InertiaTable {
    pub fn from_config(config: &InertiaConfig) -> Self {
        let mut rates = [[0.0; 2]; 4];
        rates[Direction::Forward.index()] = config.forward;
        rates[Direction::Backward.index()] = config.backward;
        rates[Direction::Left.index()] = config.left;
        rates[Direction::Right.index()] = config.right;
        Self { rates }
    }

    pub fn rate(&self, direction: Direction, phase: Phase) -> f32 {
        self.rates[direction.index()][phase.index()]
    }
}

impl Default for InertiaTable {
    fn default() -> Self {
        Self::from_config(&InertiaConfig::default())
    }
}

/// One integration step of a single velocity channel.
///
/// Held input accelerates up to `ceiling` in magnitude. Released input
/// decays toward zero and stops there instead of reversing.
pub fn integrate_velocity(velocity: f32, table: &InertiaTable, direction: Direction, held: bool, dt: f32, ceiling: f32) -> f32 {
    if held {
        let next = velocity + table.rate(direction, Phase::Accelerate) * dt;
        return next.clamp(-ceiling, ceiling);
    }
    if velocity == 0.0 {
        return 0.0;
    }
    let next = velocity + table.rate(direction, Phase::Decelerate) * dt;
    if next * velocity <= 0.0 {
        0.0
    } else {
        next.clamp(-ceiling, ceiling)
    }
}

/// Camera state, mutated once per frame by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    pub eye: Vec3,
    /// Smoothed look vector, relative to the eye.
    pub target: Vec3,
    /// Unit look vector derived from yaw and pitch.
    pub raw_target: Vec3,
    /// One channel per `Direction`.
    pub velocity: [f32; 4],
    pub mode: CameraMode,
    pub yaw: f32,
    pub pitch: f32,
}

impl CameraState {
    pub fn velocity(&self, direction: Direction) -> f32 {
        self.velocity[direction.index()]
    }

    pub fn is_stationary(&self) -> bool {
        self.velocity.iter().all(|&v| v == 0.0)
    }

    /// Unit forward basis vector.
    pub fn forward(&self) -> Vec3 {
        let dir = if self.target.length_squared() > 1e-12 {
            self.target
        } else {
            self.raw_target
        };
        dir.try_normalize().unwrap_or(Vec3::NEG_Z)
    }

    /// Unit right basis vector.
    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).try_normalize().unwrap_or(Vec3::X)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.eye + self.forward(), Vec3::Y)
    }
}

fn look_direction(yaw: f32, pitch: f32) -> Vec3 {
    Vec3::new(pitch.cos() * yaw.cos(), pitch.sin(), pitch.cos() * yaw.sin())
}

fn yaw_pitch(direction: Vec3) -> (f32, f32) {
    let dir = direction.try_normalize().unwrap_or(Vec3::NEG_Z);
    (dir.z.atan2(dir.x), dir.y.clamp(-1.0, 1.0).asin().clamp(-MAX_PITCH, MAX_PITCH))
}

/// Integrates input intents into the camera state.
#[derive(Debug, Clone)]
pub struct CameraController {
    state: CameraState,
    inertia: InertiaTable,
    ceiling: f32,
    celerity_cruise: f32,
    celerity_turbo: f32,
    amortize_factor: f32,
    sensitivity: f32,
}

impl CameraController {
    pub fn new(config: &CameraConfig) -> Self {
        let (yaw, pitch) = yaw_pitch(Vec3::from_array(config.target));
        let look = look_direction(yaw, pitch);
        Self {
            state: CameraState {
                eye: Vec3::from_array(config.eye),
                target: look,
                raw_target: look,
                velocity: [0.0; 4],
                mode: CameraMode::Cruise,
                yaw,
                pitch,
            },
            inertia: InertiaTable::from_config(&config.inertia),
            ceiling: config.velocity_ceiling.abs(),
            celerity_cruise: config.celerity_cruise,
            celerity_turbo: config.celerity_turbo,
            amortize_factor: config.amortize_factor.max(0.0),
            sensitivity: config.pointer_sensitivity,
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn celerity(&self) -> f32 {
        match self.state.mode {
            CameraMode::Cruise => self.celerity_cruise,
            CameraMode::Turbo => self.celerity_turbo,
        }
    }

    /// Point the raw target along `direction`; the active target follows
    /// over the next frames.
    pub fn aim(&mut self, direction: Vec3) {
        let (yaw, pitch) = yaw_pitch(direction);
        self.state.yaw = yaw;
        self.state.pitch = pitch;
        self.state.raw_target = look_direction(yaw, pitch);
    }

    /// Advance the camera by one frame of real time.
    pub fn step(&mut self, input: &InputSnapshot, dt_ms: f32) {
        let dt = dt_ms.max(0.0);

        if input.mode_toggles % 2 == 1 {
            self.state.mode = self.state.mode.toggled();
            log::debug!("camera mode now {:?}", self.state.mode);
        }

        for direction in Direction::ALL {
            let v = &mut self.state.velocity[direction.index()];
            *v = integrate_velocity(*v, &self.inertia, direction, input.is_held(direction), dt, self.ceiling);
        }

        let forward = self.state.forward();
        let right = self.state.right();
        let axial = self.state.velocity(Direction::Forward) + self.state.velocity(Direction::Backward);
        let lateral = self.state.velocity(Direction::Left) + self.state.velocity(Direction::Right);
        let scale = self.celerity() * dt;
        self.state.eye += (forward * axial + right * lateral) * scale;

        self.steer(input.pointer_delta);
        self.smooth_target(dt);
    }

    fn steer(&mut self, delta: Vec2) {
        if delta == Vec2::ZERO {
            return;
        }
        self.state.yaw += delta.x * self.sensitivity;
        self.state.pitch = (self.state.pitch - delta.y * self.sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
        self.state.raw_target = look_direction(self.state.yaw, self.state.pitch);
    }

    fn smooth_target(&mut self, dt: f32) {
        let a = (self.amortize_factor * dt).clamp(0.0, 1.0);
        self.state.target += (self.state.raw_target - self.state.target) * a;
    }
}
