use serde::{Deserialize, Serialize};

/// Handle to a mesh uploaded to the rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

/// Handle to a line list (orbit trace) uploaded to the rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinesHandle(pub u32);

/// Handle to a decoded texture, issued by the asset loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u32);

/// How a body takes part in the point-light pass.
/// Dispatched once per draw instead of via shared uniform state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightRole {
    /// Emits the scene light and is drawn unshaded.
    Emitter,
    /// Shaded by the scene light.
    Receiver,
    /// Drawn with its raw texture colour.
    #[default]
    None,
}

impl LightRole {
    /// Numeric tag used by the wire encoding and shader flags.
    pub fn as_u32(self) -> u32 {
        match self {
            LightRole::None => 0,
            LightRole::Emitter => 1,
            LightRole::Receiver => 2,
        }
    }
}

/// Camera speed mode, selecting the celerity multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    #[default]
    Cruise,
    Turbo,
}

impl CameraMode {
    pub fn toggled(self) -> Self {
        match self {
            CameraMode::Cruise => CameraMode::Turbo,
            CameraMode::Turbo => CameraMode::Cruise,
        }
    }
}

/// Directional movement intent. Each direction owns its own velocity channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Forward,
        Direction::Backward,
        Direction::Left,
        Direction::Right,
    ];

    pub fn index(self) -> usize {
        match self {
            Direction::Forward => 0,
            Direction::Backward => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// Inertia phase: input held (accelerate) or released (decelerate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Accelerate,
    Decelerate,
}

impl Phase {
    pub fn index(self) -> usize {
        match self {
            Phase::Accelerate => 0,
            Phase::Decelerate => 1,
        }
    }
}
