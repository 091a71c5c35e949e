use std::collections::HashMap;
use serde::{Deserialize, Serialize};

use crate::api::error::OrreryResult;
use crate::api::types::LightRole;

/// Declarative scene description: the background sphere, the bodies in
/// draw order, and the textures they reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneManifest {
    /// Background sphere, drawn without depth testing.
    pub voidbox: VoidboxDescriptor,
    /// Bodies in declaration (= draw) order.
    pub bodies: Vec<BodyDescriptor>,
    /// Texture lookup: name → image path.
    #[serde(default)]
    pub textures: HashMap<String, TextureDescriptor>,
}

/// Describes the background sphere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoidboxDescriptor {
    pub texture: String,
}

/// Describes one celestial body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyDescriptor {
    /// Human-readable name (e.g., "earth").
    pub name: String,
    /// Key into the manifest's textures.
    pub texture: String,
    /// Orbital radius in world units.
    #[serde(default)]
    pub radius: f32,
    /// Radians per simulated millisecond.
    #[serde(default)]
    pub angular_speed: f64,
    /// Axial spin, radians per simulated millisecond.
    #[serde(default)]
    pub spin_speed: f64,
    /// Radians.
    #[serde(default)]
    pub tilt: f32,
    /// Size factor (sphere radius before the global scale).
    #[serde(default = "default_size")]
    pub size: f32,
    #[serde(default)]
    pub light: LightRole,
    #[serde(default)]
    pub orbit_trace: bool,
}

/// Describes a texture image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextureDescriptor {
    /// Relative path to the image file (e.g., "earth.jpg").
    pub path: String,
}

fn default_size() -> f32 {
    1.0
}

impl SceneManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> OrreryResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
