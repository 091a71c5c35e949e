pub mod camera;
pub mod plan;
pub mod traits;
pub mod transform;

// Re-export key types for convenient access
pub use plan::{DrawCommand, FrameRenderPlan, FrameUniforms, MeshDraw, ObjectUniform};
pub use traits::RenderBackend;
