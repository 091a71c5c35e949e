pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;

// Re-export key types at crate root for convenience
pub use api::config::{OrreryConfig, TimeConfig, CameraConfig, ProjectionConfig, MeshConfig, OrbitConfig, LightConfig};
pub use api::error::{OrreryError, OrreryResult};
pub use api::types::{MeshHandle, LinesHandle, TextureHandle, LightRole, CameraMode, Direction};
pub use crate::core::scene::SceneComposer;
pub use crate::core::time::{SimulationClock, SimulationTime};
pub use crate::core::orbit::{OrbitalPropagator, OrbitState};
pub use crate::core::camera::{CameraController, CameraState};
pub use components::body::CelestialBody;
pub use components::mesh::{Mesh, MeshVertex, SphereMeshGenerator};
pub use components::trace::{OrbitTrace, OrbitTraceBuilder};
pub use renderer::camera::Projection;
pub use renderer::transform::{TransformStack, TransformScope};
pub use renderer::{DrawCommand, FrameRenderPlan, FrameUniforms, MeshDraw, RenderBackend};
pub use input::queue::{InputEvent, InputQueue, InputSnapshot};
pub use assets::manifest::{SceneManifest, BodyDescriptor};
pub use assets::registry::{AssetLoader, TextureRegistry};
pub use bridge::protocol::CommandStream;
pub use systems::lighting::PointLight;
