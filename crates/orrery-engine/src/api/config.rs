use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::api::error::OrreryResult;

pub const SECOND_MS: f64 = 1000.0;
pub const DAY_MS: f64 = 24.0 * 60.0 * 60.0 * SECOND_MS;
/// One simulated year in milliseconds.
pub const YEAR_MS: f64 = 365.0 * DAY_MS;

/// Engine configuration, loaded once before the scene.
/// Every section falls back to its defaults when omitted from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrreryConfig {
    pub time: TimeConfig,
    pub camera: CameraConfig,
    pub projection: ProjectionConfig,
    pub mesh: MeshConfig,
    pub orbit: OrbitConfig,
    pub light: LightConfig,
}

impl OrreryConfig {
    /// Parse a (possibly partial) configuration from a JSON string.
    pub fn from_json(json: &str) -> OrreryResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Simulated milliseconds per real millisecond at speed 1.
    pub normalize_factor: f64,
    pub speed_default: f64,
    pub speed_min: f64,
    pub speed_max: f64,
    /// Multiplier applied per speed-up/speed-down request.
    pub speed_change_factor: f64,
    /// Simulated time already elapsed when the scene starts.
    pub start_offset_ms: f64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            normalize_factor: 64.0,
            speed_default: 1.0,
            speed_min: 1.0,
            speed_max: 200_000.0,
            speed_change_factor: 100.0,
            start_offset_ms: YEAR_MS,
        }
    }
}

/// Signed velocity increments per millisecond, one row per direction:
/// `[accelerate, decelerate]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InertiaConfig {
    pub forward: [f32; 2],
    pub backward: [f32; 2],
    pub left: [f32; 2],
    pub right: [f32; 2],
}

impl Default for InertiaConfig {
    fn default() -> Self {
        Self {
            forward: [0.0075, -0.005],
            backward: [-0.0075, 0.005],
            left: [-0.0075, 0.005],
            right: [0.0075, -0.005],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    /// Initial look direction (normalized on load).
    pub target: [f32; 3],
    pub celerity_cruise: f32,
    pub celerity_turbo: f32,
    pub inertia: InertiaConfig,
    /// Velocity magnitude cap for every direction.
    pub velocity_ceiling: f32,
    /// Look smoothing per millisecond of frame time.
    pub amortize_factor: f32,
    /// Radians of yaw/pitch per pointer unit.
    pub pointer_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [300.0, -350.0, -800.0],
            target: [-0.3, 0.35, 0.8],
            celerity_cruise: 1.0,
            celerity_turbo: 10.0,
            inertia: InertiaConfig::default(),
            velocity_ceiling: 4.0,
            amortize_factor: 0.002,
            pointer_sensitivity: 0.003,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 45.0,
            near: 0.1,
            far: 1.0e7,
            viewport_width: 1280.0,
            viewport_height: 800.0,
        }
    }
}

/// UV-sphere tessellation, in whole degrees.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    pub phi_max_deg: u32,
    pub theta_max_deg: u32,
    pub lat_step_deg: u32,
    pub lon_step_deg: u32,
    /// Global multiplier on each body's size factor.
    pub size_scale: f32,
    /// Radius of the background sphere, before `size_scale`.
    pub voidbox_size: f32,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            phi_max_deg: 180,
            theta_max_deg: 360,
            lat_step_deg: 3,
            lon_step_deg: 6,
            size_scale: 0.05,
            voidbox_size: 2.0e6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    /// Angular span after which an orbital position repeats.
    pub full_angle: f64,
    /// Samples per orbit trace.
    pub trace_samples: u32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            full_angle: 4.0 * PI,
            trace_samples: 360,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub color: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
        }
    }
}
