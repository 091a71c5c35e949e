/// Flat command buffers for a JavaScript renderer.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Per-frame layout (all values f32 / 4 bytes):
/// ```text
/// [Header: 48 floats]   version, frame counter, counts, projection, view, light
/// [Commands: n × 44]    opcode, handle, texture, light role, model 16, normal 12,
///                       emitter flag, receiver flag, reserved 10
/// ```
///
/// Static geometry uploaded at load lives in separate arenas:
/// ```text
/// [Vertices: MeshVertex::FLOATS per vertex]   [Indices: u32, mesh-relative]
/// [Mesh table: 4 × u32 per mesh]              first vertex, vertex count, first index, index count
/// [Line vertices: 3 floats per vertex]        [Lines table: 2 × u32]  first vertex, vertex count
/// ```

use glam::Vec3;

use crate::api::types::{LinesHandle, MeshHandle};
use crate::components::mesh::{Mesh, MeshVertex};
use crate::renderer::camera::CameraUniform;
use crate::renderer::plan::{FrameUniforms, MeshDraw, ObjectUniform};
use crate::renderer::traits::RenderBackend;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 48;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_COMMAND_COUNT: usize = 2;
pub const HEADER_MESH_COUNT: usize = 3;
pub const HEADER_LINES_COUNT: usize = 4;
/// 16 floats, column-major.
pub const HEADER_PROJECTION: usize = 8;
/// 16 floats, column-major.
pub const HEADER_VIEW: usize = 24;
/// 4 floats position (w = 1), 4 floats colour (a = 1).
pub const HEADER_LIGHT: usize = 40;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per command record (wire format, fixed).
pub const COMMAND_FLOATS: usize = 44;

/// Command record field offsets.
pub const CMD_OPCODE: usize = 0;
pub const CMD_HANDLE: usize = 1;
pub const CMD_TEXTURE: usize = 2;
pub const CMD_LIGHT_ROLE: usize = 3;
pub const CMD_MODEL: usize = 4;
pub const CMD_NORMAL: usize = 20;
/// 2 floats: emitter, receiver (0 or 1).
pub const CMD_LIGHT_FLAGS: usize = 32;

/// Opcodes. `CMD_HANDLE` holds 0/1 for the depth toggle.
pub const OP_DEPTH_TEST: f32 = 1.0;
pub const OP_DRAW_MESH: f32 = 2.0;
pub const OP_DRAW_LINES: f32 = 3.0;

/// u32 entries per mesh table record.
pub const MESH_RECORD: usize = 4;
/// u32 entries per lines table record.
pub const LINES_RECORD: usize = 2;
/// Floats per line vertex: x, y, z.
pub const LINE_VERTEX_FLOATS: usize = 3;

/// `RenderBackend` that encodes uploads and draws into flat buffers the
/// host reads through raw pointers.
pub struct CommandStream {
    header: [f32; HEADER_FLOATS],
    commands: Vec<f32>,
    vertices: Vec<f32>,
    indices: Vec<u32>,
    mesh_table: Vec<u32>,
    line_vertices: Vec<f32>,
    lines_table: Vec<u32>,
}

impl CommandStream {
    pub fn new() -> Self {
        Self::with_capacity(32)
    }

    /// Reserve room for `max_commands` records per frame.
    pub fn with_capacity(max_commands: usize) -> Self {
        let mut header = [0.0; HEADER_FLOATS];
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        Self {
            header,
            commands: Vec::with_capacity(max_commands * COMMAND_FLOATS),
            vertices: Vec::new(),
            indices: Vec::new(),
            mesh_table: Vec::new(),
            line_vertices: Vec::new(),
            lines_table: Vec::new(),
        }
    }

    pub fn header(&self) -> &[f32; HEADER_FLOATS] {
        &self.header
    }

    pub fn frame_counter(&self) -> u32 {
        self.header[HEADER_FRAME_COUNTER] as u32
    }

    pub fn command_count(&self) -> usize {
        self.commands.len() / COMMAND_FLOATS
    }

    /// One command record.
    pub fn command(&self, index: usize) -> Option<&[f32]> {
        let start = index * COMMAND_FLOATS;
        self.commands.get(start..start + COMMAND_FLOATS)
    }

    pub fn mesh_count(&self) -> usize {
        self.mesh_table.len() / MESH_RECORD
    }

    pub fn lines_count(&self) -> usize {
        self.lines_table.len() / LINES_RECORD
    }

    /// Mesh table record: first vertex, vertex count, first index, index count.
    pub fn mesh_record(&self, mesh: MeshHandle) -> Option<&[u32]> {
        let start = mesh.0 as usize * MESH_RECORD;
        self.mesh_table.get(start..start + MESH_RECORD)
    }

    /// Lines table record: first vertex, vertex count.
    pub fn lines_record(&self, lines: LinesHandle) -> Option<&[u32]> {
        let start = lines.0 as usize * LINES_RECORD;
        self.lines_table.get(start..start + LINES_RECORD)
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn commands_ptr(&self) -> *const f32 {
        self.commands.as_ptr()
    }

    pub fn vertices_ptr(&self) -> *const f32 {
        self.vertices.as_ptr()
    }

    pub fn vertices_len(&self) -> usize {
        self.vertices.len()
    }

    pub fn indices_ptr(&self) -> *const u32 {
        self.indices.as_ptr()
    }

    pub fn indices_len(&self) -> usize {
        self.indices.len()
    }

    pub fn mesh_table_ptr(&self) -> *const u32 {
        self.mesh_table.as_ptr()
    }

    pub fn line_vertices_ptr(&self) -> *const f32 {
        self.line_vertices.as_ptr()
    }

    pub fn line_vertices_len(&self) -> usize {
        self.line_vertices.len()
    }

    pub fn lines_table_ptr(&self) -> *const u32 {
        self.lines_table.as_ptr()
    }

    fn push_record(&mut self, record: [f32; COMMAND_FLOATS]) {
        self.commands.extend_from_slice(&record);
        self.header[HEADER_COMMAND_COUNT] = self.command_count() as f32;
    }
}

impl Default for CommandStream {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for CommandStream {
    fn upload_mesh(&mut self, mesh: &Mesh) -> MeshHandle {
        let handle = MeshHandle(self.mesh_count() as u32);
        let first_vertex = (self.vertices.len() / MeshVertex::FLOATS) as u32;
        let first_index = self.indices.len() as u32;

        self.vertices.extend_from_slice(bytemuck::cast_slice(mesh.vertices()));
        self.indices.extend_from_slice(mesh.indices());
        self.mesh_table.extend_from_slice(&[
            first_vertex,
            mesh.vertex_count() as u32,
            first_index,
            mesh.indices().len() as u32,
        ]);
        self.header[HEADER_MESH_COUNT] = self.mesh_count() as f32;
        handle
    }

    fn upload_lines(&mut self, vertices: &[Vec3]) -> LinesHandle {
        let handle = LinesHandle(self.lines_count() as u32);
        let first_vertex = (self.line_vertices.len() / LINE_VERTEX_FLOATS) as u32;
        for v in vertices {
            self.line_vertices.extend_from_slice(&v.to_array());
        }
        self.lines_table.extend_from_slice(&[first_vertex, vertices.len() as u32]);
        self.header[HEADER_LINES_COUNT] = self.lines_count() as f32;
        handle
    }

    /// Starts a new frame: clears the previous commands.
    fn set_frame_uniforms(&mut self, uniforms: &FrameUniforms) {
        self.commands.clear();
        self.header[HEADER_FRAME_COUNTER] += 1.0;
        self.header[HEADER_COMMAND_COUNT] = 0.0;
        let camera = CameraUniform::new(uniforms.projection, uniforms.view);
        let camera: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&camera));
        self.header[HEADER_PROJECTION..HEADER_PROJECTION + camera.len()].copy_from_slice(camera);
        let light = uniforms.light.uniform();
        self.header[HEADER_LIGHT..HEADER_LIGHT + 4].copy_from_slice(&light.position);
        self.header[HEADER_LIGHT + 4..HEADER_LIGHT + 8].copy_from_slice(&light.color);
    }

    fn set_depth_test(&mut self, enabled: bool) {
        let mut record = [0.0; COMMAND_FLOATS];
        record[CMD_OPCODE] = OP_DEPTH_TEST;
        record[CMD_HANDLE] = if enabled { 1.0 } else { 0.0 };
        self.push_record(record);
    }

    fn draw_mesh(&mut self, draw: &MeshDraw) {
        let mut record = [0.0; COMMAND_FLOATS];
        record[CMD_OPCODE] = OP_DRAW_MESH;
        record[CMD_HANDLE] = draw.mesh.0 as f32;
        record[CMD_TEXTURE] = draw.texture.0 as f32;
        let object = ObjectUniform::from(draw);
        let matrices: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&object));
        let matrices = &matrices[..ObjectUniform::MATRIX_FLOATS];
        record[CMD_MODEL..CMD_MODEL + matrices.len()].copy_from_slice(matrices);
        record[CMD_LIGHT_ROLE] = object.light_role as f32;
        record[CMD_LIGHT_FLAGS] = object.is_emitter as f32;
        record[CMD_LIGHT_FLAGS + 1] = object.is_receiver as f32;
        self.push_record(record);
    }

    fn draw_lines(&mut self, lines: LinesHandle) {
        let mut record = [0.0; COMMAND_FLOATS];
        record[CMD_OPCODE] = OP_DRAW_LINES;
        record[CMD_HANDLE] = lines.0 as f32;
        self.push_record(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{LightRole, TextureHandle};
    use crate::components::mesh::SphereMeshGenerator;
    use crate::renderer::plan::{DrawCommand, FrameRenderPlan};
    use crate::systems::lighting::PointLight;
    use glam::{Mat3, Mat4};

    fn uniforms() -> FrameUniforms {
        FrameUniforms {
            projection: Mat4::from_scale(Vec3::splat(2.0)),
            view: Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)),
            light: PointLight::new(Vec3::new(1.0, 2.0, 3.0), [1.0, 0.5, 0.25]),
        }
    }

    #[test]
    fn command_offsets_fit_record() {
        assert_eq!(CMD_NORMAL, CMD_MODEL + 16);
        assert_eq!(CMD_LIGHT_FLAGS, CMD_NORMAL + 12);
        assert!(CMD_LIGHT_FLAGS + 2 <= COMMAND_FLOATS);
        assert!(HEADER_LIGHT + 8 <= HEADER_FLOATS);
        assert_eq!(HEADER_VIEW, HEADER_PROJECTION + 16);
    }

    #[test]
    fn uploads_append_to_arenas() {
        let mut stream = CommandStream::new();
        let gen = SphereMeshGenerator::new(180, 360, 45, 90);
        let mesh = gen.generate(1.0);

        let a = stream.upload_mesh(&mesh);
        let b = stream.upload_mesh(&mesh);
        assert_eq!((a, b), (MeshHandle(0), MeshHandle(1)));
        assert_eq!(stream.mesh_count(), 2);

        let vc = mesh.vertex_count() as u32;
        let ic = mesh.indices().len() as u32;
        assert_eq!(stream.mesh_record(b).unwrap(), [vc, vc, ic, ic]);
        assert_eq!(stream.vertices_len(), 2 * mesh.vertex_count() * MeshVertex::FLOATS);
        assert_eq!(stream.header()[HEADER_MESH_COUNT], 2.0);
    }

    #[test]
    fn lines_are_recorded() {
        let mut stream = CommandStream::new();
        let first = stream.upload_lines(&[Vec3::X, Vec3::Y]);
        let second = stream.upload_lines(&[Vec3::Z, Vec3::ONE, Vec3::ONE, Vec3::X]);
        assert_eq!(first, LinesHandle(0));
        assert_eq!(stream.lines_record(second).unwrap(), [2, 4]);
        assert_eq!(stream.line_vertices_len(), 6 * LINE_VERTEX_FLOATS);
        assert!(stream.lines_record(LinesHandle(2)).is_none());
    }

    #[test]
    fn header_carries_frame_uniforms() {
        let mut stream = CommandStream::new();
        stream.set_frame_uniforms(&uniforms());

        let h = stream.header();
        assert_eq!(h[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(h[HEADER_FRAME_COUNTER], 1.0);
        assert_eq!(h[HEADER_PROJECTION], 2.0);
        assert_eq!(h[HEADER_VIEW + 14], -5.0);
        assert_eq!(h[HEADER_LIGHT..HEADER_LIGHT + 8], [1.0, 2.0, 3.0, 1.0, 1.0, 0.5, 0.25, 1.0]);
    }

    #[test]
    fn plan_encodes_in_order() {
        let mut plan = FrameRenderPlan::new(uniforms());
        plan.push(DrawCommand::SetDepthTest(false));
        plan.push(DrawCommand::DrawMesh(MeshDraw {
            mesh: MeshHandle(3),
            texture: TextureHandle(7),
            model: Mat4::from_translation(Vec3::new(4.0, 5.0, 6.0)),
            normal: Mat3::IDENTITY,
            light: LightRole::Receiver,
        }));
        plan.push(DrawCommand::DrawLines(LinesHandle(1)));

        let mut stream = CommandStream::new();
        plan.submit(&mut stream);
        assert_eq!(stream.command_count(), 3);
        assert_eq!(stream.header()[HEADER_COMMAND_COUNT], 3.0);

        let depth = stream.command(0).unwrap();
        assert_eq!(depth[CMD_OPCODE], OP_DEPTH_TEST);
        assert_eq!(depth[CMD_HANDLE], 0.0);

        let mesh = stream.command(1).unwrap();
        assert_eq!(mesh[CMD_OPCODE], OP_DRAW_MESH);
        assert_eq!(mesh[CMD_HANDLE], 3.0);
        assert_eq!(mesh[CMD_TEXTURE], 7.0);
        assert_eq!(mesh[CMD_LIGHT_ROLE], 2.0);
        assert_eq!(mesh[CMD_MODEL + 12..CMD_MODEL + 15], [4.0, 5.0, 6.0]);
        assert_eq!(mesh[CMD_NORMAL + 4..CMD_NORMAL + 8], [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(mesh[CMD_LIGHT_FLAGS..CMD_LIGHT_FLAGS + 2], [0.0, 1.0]);

        let lines = stream.command(2).unwrap();
        assert_eq!(lines[CMD_OPCODE], OP_DRAW_LINES);
        assert_eq!(lines[CMD_HANDLE], 1.0);
        assert!(stream.command(3).is_none());
    }

    #[test]
    fn records_mirror_the_gpu_uniforms() {
        let draw = MeshDraw {
            mesh: MeshHandle(0),
            texture: TextureHandle(0),
            model: Mat4::from_rotation_x(0.4) * Mat4::from_translation(Vec3::new(1.0, -2.0, 3.0)),
            normal: Mat3::from_rotation_y(0.7),
            light: LightRole::Emitter,
        };
        let mut stream = CommandStream::new();
        stream.set_frame_uniforms(&uniforms());
        stream.draw_mesh(&draw);

        let object = ObjectUniform::from(&draw);
        let expected: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&object));
        let record = stream.command(0).unwrap();
        assert_eq!(record[CMD_MODEL..CMD_LIGHT_FLAGS], expected[..ObjectUniform::MATRIX_FLOATS]);
        assert_eq!(record[CMD_LIGHT_FLAGS..CMD_LIGHT_FLAGS + 2], [1.0, 0.0]);
        assert!(record[CMD_LIGHT_FLAGS + 2..].iter().all(|&f| f == 0.0));

        let u = uniforms();
        let camera = CameraUniform::new(u.projection, u.view);
        let expected: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&camera));
        assert_eq!(stream.header()[HEADER_PROJECTION..HEADER_LIGHT], *expected);
    }

    #[test]
    fn new_frame_replaces_commands() {
        let mut plan = FrameRenderPlan::new(uniforms());
        plan.push(DrawCommand::SetDepthTest(true));

        let mut stream = CommandStream::new();
        plan.submit(&mut stream);
        plan.submit(&mut stream);
        assert_eq!(stream.command_count(), 1);
        assert_eq!(stream.frame_counter(), 2);
    }
}
