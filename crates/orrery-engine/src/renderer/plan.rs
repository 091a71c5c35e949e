use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4};

use crate::api::types::{LightRole, LinesHandle, MeshHandle, TextureHandle};
use crate::renderer::traits::RenderBackend;
use crate::systems::lighting::{LightFlags, PointLight};

/// One textured mesh draw with its own transforms and lighting role.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshDraw {
    pub mesh: MeshHandle,
    pub texture: TextureHandle,
    pub model: Mat4,
    pub normal: Mat3,
    pub light: LightRole,
}

/// A draw command, in the order the backend must execute it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    /// Global depth-test toggle.
    SetDepthTest(bool),
    DrawMesh(MeshDraw),
    /// Line-list draw of a static orbit trace.
    DrawLines(LinesHandle),
}

/// Uniforms shared by every draw of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub projection: Mat4,
    pub view: Mat4,
    pub light: PointLight,
}

/// Everything the backend needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRenderPlan {
    pub uniforms: FrameUniforms,
    pub commands: Vec<DrawCommand>,
}

impl FrameRenderPlan {
    pub fn new(uniforms: FrameUniforms) -> Self {
        Self {
            uniforms,
            commands: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Mesh draws in plan order.
    pub fn mesh_draws(&self) -> impl Iterator<Item = &MeshDraw> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::DrawMesh(draw) => Some(draw),
            _ => None,
        })
    }

    /// Replay the plan against a backend.
    pub fn submit(&self, backend: &mut dyn RenderBackend) {
        backend.set_frame_uniforms(&self.uniforms);
        for command in &self.commands {
            match command {
                DrawCommand::SetDepthTest(enabled) => backend.set_depth_test(*enabled),
                DrawCommand::DrawMesh(draw) => backend.draw_mesh(draw),
                DrawCommand::DrawLines(lines) => backend.draw_lines(*lines),
            }
        }
    }
}

/// GPU-side per-object uniform data (std140-compatible: the normal matrix
/// columns are padded to 4 floats).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 3],
    pub light_role: u32,
    /// 1 when the draw is the light source, else 0.
    pub is_emitter: u32,
    /// 1 when the draw is shaded by the light, else 0.
    pub is_receiver: u32,
    pub _pad: u32,
}

impl ObjectUniform {
    /// Floats covered by the model and normal matrices.
    pub const MATRIX_FLOATS: usize = 16 + 12;
}

impl From<&MeshDraw> for ObjectUniform {
    fn from(draw: &MeshDraw) -> Self {
        let n = draw.normal.to_cols_array_2d();
        let flags = LightFlags::from(draw.light);
        Self {
            model: draw.model.to_cols_array_2d(),
            normal: [
                [n[0][0], n[0][1], n[0][2], 0.0],
                [n[1][0], n[1][1], n[1][2], 0.0],
                [n[2][0], n[2][1], n[2][2], 0.0],
            ],
            light_role: draw.light.as_u32(),
            is_emitter: flags.is_emitter as u32,
            is_receiver: flags.is_receiver as u32,
            _pad: 0,
        }
    }
}
