use orrery_engine::{
    CommandStream, InputEvent, InputQueue, OrreryConfig, OrreryResult,
    SceneComposer, SceneManifest, TextureRegistry,
};

/// Frame driver that wires the engine to the browser loop.
///
/// `lib.rs` keeps one runner in a `thread_local!` and exports free functions
/// via `#[wasm_bindgen]`. Each tick coalesces the queued input, composes a
/// frame and encodes it into the command stream the host renderer reads.
pub struct OrreryRunner {
    composer: SceneComposer,
    input: InputQueue,
    stream: CommandStream,
    /// Image paths indexed by texture handle, for the host to decode.
    texture_paths: Vec<String>,
    closing: bool,
}

impl OrreryRunner {
    /// Load the scene and upload its static buffers into a fresh stream.
    pub fn new(config: &OrreryConfig, manifest: &SceneManifest) -> OrreryResult<Self> {
        let textures = TextureRegistry::from_manifest(manifest);
        let texture_paths = textures
            .names()
            .into_iter()
            .filter_map(|name| manifest.textures.get(name).map(|t| t.path.clone()))
            .collect();

        // Depth toggles + voidbox + bodies + traces.
        let mut stream = CommandStream::with_capacity(3 + manifest.bodies.len() * 2);
        let composer = SceneComposer::load(config, manifest, &textures, &mut stream)?;
        Ok(Self {
            composer,
            input: InputQueue::new(),
            stream,
            texture_paths,
            closing: false,
        })
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame. Returns false once a shutdown has been honoured.
    ///
    /// A shutdown request never interrupts a frame: the frame that observes
    /// it is still composed and encoded, and the loop stops afterwards.
    pub fn tick(&mut self, dt_ms: f64) -> OrreryResult<bool> {
        if self.closing {
            return Ok(false);
        }

        let snapshot = self.input.snapshot();
        let plan = self.composer.tick(dt_ms, &snapshot)?;
        plan.submit(&mut self.stream);

        if snapshot.shutdown {
            self.closing = true;
            log::info!("shutdown after frame {}", self.stream.frame_counter());
        }
        Ok(!self.closing)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.composer.resize(width, height);
    }

    pub fn is_closing(&self) -> bool {
        self.closing
    }

    pub fn composer(&self) -> &SceneComposer {
        &self.composer
    }

    pub fn stream(&self) -> &CommandStream {
        &self.stream
    }

    pub fn texture_paths(&self) -> &[String] {
        &self.texture_paths
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.stream.header_ptr()
    }

    pub fn commands_ptr(&self) -> *const f32 {
        self.stream.commands_ptr()
    }

    pub fn command_count(&self) -> u32 {
        self.stream.command_count() as u32
    }

    pub fn vertices_ptr(&self) -> *const f32 {
        self.stream.vertices_ptr()
    }

    pub fn vertices_len(&self) -> u32 {
        self.stream.vertices_len() as u32
    }

    pub fn indices_ptr(&self) -> *const u32 {
        self.stream.indices_ptr()
    }

    pub fn indices_len(&self) -> u32 {
        self.stream.indices_len() as u32
    }

    pub fn mesh_table_ptr(&self) -> *const u32 {
        self.stream.mesh_table_ptr()
    }

    pub fn mesh_count(&self) -> u32 {
        self.stream.mesh_count() as u32
    }

    pub fn line_vertices_ptr(&self) -> *const f32 {
        self.stream.line_vertices_ptr()
    }

    pub fn line_vertices_len(&self) -> u32 {
        self.stream.line_vertices_len() as u32
    }

    pub fn lines_table_ptr(&self) -> *const u32 {
        self.stream.lines_table_ptr()
    }

    pub fn lines_count(&self) -> u32 {
        self.stream.lines_count() as u32
    }

    pub fn simulation_speed(&self) -> f64 {
        self.composer.clock().speed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_engine::assets::catalog::solar_system;
    use orrery_engine::bridge::protocol::{CMD_OPCODE, OP_DEPTH_TEST};
    use orrery_engine::Direction;

    fn runner() -> OrreryRunner {
        let mut config = OrreryConfig::default();
        config.mesh.lat_step_deg = 30;
        config.mesh.lon_step_deg = 30;
        OrreryRunner::new(&config, &solar_system()).unwrap()
    }

    #[test]
    fn loads_the_catalog() {
        let r = runner();
        assert_eq!(r.mesh_count(), 10);
        assert_eq!(r.lines_count(), 8);
        assert_eq!(r.texture_paths().len(), 10);
        assert!(r.texture_paths().iter().all(|p| p.starts_with("textures/")));
    }

    #[test]
    fn tick_encodes_a_frame() {
        let mut r = runner();
        assert!(r.tick(16.0).unwrap());
        // 2 depth toggles, voidbox, 9 bodies, 8 traces
        assert_eq!(r.command_count(), 20);
        assert_eq!(r.stream().command(0).unwrap()[CMD_OPCODE], OP_DEPTH_TEST);
        assert_eq!(r.stream().frame_counter(), 1);
    }

    #[test]
    fn shutdown_finishes_the_frame_first() {
        let mut r = runner();
        r.push_input(InputEvent::Shutdown);
        assert!(!r.tick(16.0).unwrap());
        assert!(r.is_closing());
        assert_eq!(r.stream().frame_counter(), 1);

        assert!(!r.tick(16.0).unwrap());
        assert_eq!(r.stream().frame_counter(), 1);
    }

    #[test]
    fn input_reaches_the_composer() {
        let mut r = runner();
        r.push_input(InputEvent::SpeedUp);
        r.push_input(InputEvent::Move { direction: Direction::Forward, active: true });
        r.tick(16.0).unwrap();
        assert_eq!(r.simulation_speed(), 100.0);
        assert!(!r.composer().camera().state().is_stationary());
    }

    #[test]
    fn missing_texture_refuses_to_start() {
        let mut manifest = solar_system();
        manifest.textures.remove("earth");
        assert!(OrreryRunner::new(&OrreryConfig::default(), &manifest).is_err());
    }
}
