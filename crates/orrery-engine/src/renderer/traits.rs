use glam::Vec3;

use crate::api::types::{LinesHandle, MeshHandle};
use crate::components::mesh::Mesh;
use crate::renderer::plan::{FrameUniforms, MeshDraw};

/// Renderer trait for GPU backends.
///
/// Uploads happen once per body while the scene loads; the draw calls are
/// replayed from a `FrameRenderPlan` every frame, in plan order.
///
/// # Example Implementation
///
/// ```ignore
/// struct GlBackend {
///     program: u32,
///     // ...
/// }
///
/// impl RenderBackend for GlBackend {
///     fn upload_mesh(&mut self, mesh: &Mesh) -> MeshHandle {
///         // glGenBuffers / glBufferData ...
///     }
///
///     fn set_depth_test(&mut self, enabled: bool) {
///         // glEnable / glDisable(GL_DEPTH_TEST)
///     }
///
///     // ...
/// }
/// ```
pub trait RenderBackend {
    /// Upload a static mesh. Called once per body at load time.
    fn upload_mesh(&mut self, mesh: &Mesh) -> MeshHandle;

    /// Upload a static line list (pairs of endpoints).
    fn upload_lines(&mut self, vertices: &[Vec3]) -> LinesHandle;

    /// Bind projection, view and the scene light for the frame.
    fn set_frame_uniforms(&mut self, uniforms: &FrameUniforms);

    /// Global depth-test toggle.
    fn set_depth_test(&mut self, enabled: bool);

    /// Draw a mesh with its model/normal matrices and lighting role bound.
    fn draw_mesh(&mut self, draw: &MeshDraw);

    /// Draw an uploaded line list.
    fn draw_lines(&mut self, lines: LinesHandle);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{LightRole, TextureHandle};
    use crate::renderer::plan::{DrawCommand, FrameRenderPlan};
    use crate::systems::lighting::PointLight;
    use glam::{Mat3, Mat4};

    #[derive(Default)]
    struct CallLog {
        calls: Vec<String>,
    }

    impl RenderBackend for CallLog {
        fn upload_mesh(&mut self, _mesh: &Mesh) -> MeshHandle {
            self.calls.push("upload_mesh".into());
            MeshHandle(0)
        }

        fn upload_lines(&mut self, _vertices: &[Vec3]) -> LinesHandle {
            self.calls.push("upload_lines".into());
            LinesHandle(0)
        }

        fn set_frame_uniforms(&mut self, _uniforms: &FrameUniforms) {
            self.calls.push("uniforms".into());
        }

        fn set_depth_test(&mut self, enabled: bool) {
            self.calls.push(format!("depth {enabled}"));
        }

        fn draw_mesh(&mut self, draw: &MeshDraw) {
            self.calls.push(format!("mesh {}", draw.mesh.0));
        }

        fn draw_lines(&mut self, lines: LinesHandle) {
            self.calls.push(format!("lines {}", lines.0));
        }
    }

    #[test]
    fn submit_replays_in_order() {
        let mut plan = FrameRenderPlan::new(FrameUniforms {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            light: PointLight::new(Vec3::ZERO, [1.0; 3]),
        });
        plan.push(DrawCommand::SetDepthTest(false));
        plan.push(DrawCommand::DrawMesh(MeshDraw {
            mesh: MeshHandle(4),
            texture: TextureHandle(0),
            model: Mat4::IDENTITY,
            normal: Mat3::IDENTITY,
            light: LightRole::None,
        }));
        plan.push(DrawCommand::SetDepthTest(true));
        plan.push(DrawCommand::DrawLines(LinesHandle(2)));

        let mut backend = CallLog::default();
        plan.submit(&mut backend);
        assert_eq!(
            backend.calls,
            ["uniforms", "depth false", "mesh 4", "depth true", "lines 2"]
        );
    }
}
