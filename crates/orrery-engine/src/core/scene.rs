use glam::Mat4;

use crate::api::config::OrreryConfig;
use crate::api::error::{OrreryError, OrreryResult};
use crate::api::types::{LightRole, MeshHandle, TextureHandle};
use crate::assets::manifest::SceneManifest;
use crate::assets::registry::AssetLoader;
use crate::components::body::CelestialBody;
use crate::components::mesh::SphereMeshGenerator;
use crate::components::trace::OrbitTraceBuilder;
use crate::core::camera::CameraController;
use crate::core::orbit::OrbitalPropagator;
use crate::core::time::SimulationClock;
use crate::input::queue::InputSnapshot;
use crate::renderer::camera::Projection;
use crate::renderer::plan::{DrawCommand, FrameRenderPlan, FrameUniforms, MeshDraw};
use crate::renderer::traits::RenderBackend;
use crate::renderer::transform::TransformStack;
use crate::systems::lighting::PointLight;

/// Background sphere, centred on the eye every frame.
#[derive(Debug, Clone, Copy)]
struct Voidbox {
    mesh: MeshHandle,
    texture: TextureHandle,
}

/// Owns the whole scene and turns one frame of input and elapsed time into
/// an ordered render plan.
pub struct SceneComposer {
    clock: SimulationClock,
    propagator: OrbitalPropagator,
    camera: CameraController,
    projection: Projection,
    bodies: Vec<CelestialBody>,
    voidbox: Voidbox,
    light_color: [f32; 3],
}

fn resolve(assets: &dyn AssetLoader, body: &str, texture: &str) -> OrreryResult<TextureHandle> {
    assets.texture(texture).ok_or_else(|| OrreryError::TextureNotFound {
        body: body.to_string(),
        texture: texture.to_string(),
    })
}

impl SceneComposer {
    /// Resolve textures, generate and upload every static buffer, and place
    /// the bodies at the clock's start offset.
    ///
    /// Textures are resolved before anything is uploaded, so a missing one
    /// leaves the backend untouched.
    pub fn load(
        config: &OrreryConfig,
        manifest: &SceneManifest,
        assets: &dyn AssetLoader,
        backend: &mut dyn RenderBackend,
    ) -> OrreryResult<Self> {
        let voidbox_texture = resolve(assets, "voidbox", &manifest.voidbox.texture)?;
        let mut bodies = manifest
            .bodies
            .iter()
            .map(|desc| {
                let texture = resolve(assets, &desc.name, &desc.texture)?;
                Ok(CelestialBody::from_descriptor(desc, texture))
            })
            .collect::<OrreryResult<Vec<_>>>()?;

        let spheres = SphereMeshGenerator::from_config(&config.mesh);
        let scale = config.mesh.size_scale;
        let voidbox = Voidbox {
            mesh: backend.upload_mesh(&spheres.generate(config.mesh.voidbox_size * scale)),
            texture: voidbox_texture,
        };

        let propagator = OrbitalPropagator::new(config.orbit.full_angle);
        let traces = OrbitTraceBuilder::new(propagator.full_angle(), config.orbit.trace_samples);
        for body in &mut bodies {
            let mesh = spheres.generate(body.size * scale);
            let handle = backend.upload_mesh(&mesh);
            log::debug!(
                "uploaded {}: {} vertices, {} triangles",
                body.name,
                mesh.vertex_count(),
                mesh.triangle_count()
            );
            body.attach_mesh(mesh, handle);

            if body.has_orbit_trace {
                let trace = traces.build(body.orbit_radius, body.tilt);
                let handle = backend.upload_lines(&trace.line_list());
                body.attach_trace(trace, handle);
            }
        }

        let clock = SimulationClock::new(&config.time);
        propagator.seed(&mut bodies, clock.time().simulated_ms);

        log::info!(
            "scene loaded: {} bodies, {} orbit traces, {} emitter(s)",
            bodies.len(),
            bodies.iter().filter(|b| b.trace().is_some()).count(),
            bodies.iter().filter(|b| b.is_light_emitter()).count(),
        );

        Ok(Self {
            clock,
            propagator,
            camera: CameraController::new(&config.camera),
            projection: Projection::new(&config.projection),
            bodies,
            voidbox,
            light_color: config.light.color,
        })
    }

    /// Compose one frame.
    pub fn tick(&mut self, real_delta_ms: f64, input: &InputSnapshot) -> OrreryResult<FrameRenderPlan> {
        self.clock.apply_speed_steps(input.speed_steps);
        let simulated = self.clock.advance(real_delta_ms);
        self.propagator.step(&mut self.bodies, simulated);
        self.camera.step(input, self.clock.time().frame_delta_ms as f32);

        let projection = self.projection.matrix();
        let view = self.camera.state().view_matrix();
        let mut plan = FrameRenderPlan::new(FrameUniforms {
            projection,
            view,
            light: PointLight::from_bodies(&self.bodies, self.light_color),
        });
        let mut stack = TransformStack::new(projection, view);

        plan.push(DrawCommand::SetDepthTest(false));
        {
            let scope = stack.push(Mat4::from_translation(self.camera.state().eye));
            plan.push(DrawCommand::DrawMesh(MeshDraw {
                mesh: self.voidbox.mesh,
                texture: self.voidbox.texture,
                model: scope.model(),
                normal: scope.normal(),
                light: LightRole::None,
            }));
        }

        plan.push(DrawCommand::SetDepthTest(true));
        for body in &self.bodies {
            let local = Mat4::from_translation(body.orbit.position) * body.orbit.orientation;
            let scope = stack.push(local);
            plan.push(DrawCommand::DrawMesh(MeshDraw {
                mesh: body.mesh_handle(),
                texture: body.texture,
                model: scope.model(),
                normal: scope.normal(),
                light: body.light_role,
            }));
        }

        for lines in self.bodies.iter().filter_map(|b| b.trace_handle()) {
            plan.push(DrawCommand::DrawLines(lines));
        }

        stack.finish()?;
        Ok(plan)
    }

    /// Rebuild the projection for a new viewport.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.projection.resize(width, height);
        log::debug!("viewport resized to {width}x{height}");
    }

    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::TimeConfig;
    use crate::api::types::{Direction, LinesHandle};
    use crate::assets::registry::TextureRegistry;
    use crate::bridge::protocol::CommandStream;
    use glam::Vec3;
    use std::f64::consts::PI;

    const MANIFEST: &str = r#"{
        "voidbox": { "texture": "stars" },
        "bodies": [
            { "name": "sun", "texture": "sun", "size": 40.0, "light": "emitter" },
            { "name": "earth", "texture": "earth", "radius": 100.0,
              "angular_speed": 0.0031415926535897933, "light": "receiver", "orbit_trace": true },
            { "name": "rock", "texture": "rock", "radius": 250.0, "angular_speed": 0.0001 }
        ],
        "textures": {
            "stars": { "path": "stars.jpg" },
            "sun": { "path": "sun.jpg" },
            "earth": { "path": "earth.jpg" },
            "rock": { "path": "rock.jpg" }
        }
    }"#;

    fn config() -> OrreryConfig {
        let mut config = OrreryConfig {
            time: TimeConfig {
                normalize_factor: 1.0,
                speed_default: 1.0,
                speed_min: 1.0,
                speed_max: 1000.0,
                speed_change_factor: 10.0,
                start_offset_ms: 0.0,
            },
            ..Default::default()
        };
        config.mesh.lat_step_deg = 30;
        config.mesh.lon_step_deg = 60;
        config.orbit.trace_samples = 12;
        config.light.color = [1.0, 0.9, 0.8];
        config
    }

    fn load_with(config: &OrreryConfig) -> (SceneComposer, CommandStream) {
        let manifest = SceneManifest::from_json(MANIFEST).unwrap();
        let textures = TextureRegistry::from_manifest(&manifest);
        let mut stream = CommandStream::new();
        let scene = SceneComposer::load(config, &manifest, &textures, &mut stream).unwrap();
        (scene, stream)
    }

    fn load() -> (SceneComposer, CommandStream) {
        load_with(&config())
    }

    fn draws(plan: &FrameRenderPlan) -> Vec<MeshDraw> {
        plan.mesh_draws().copied().collect()
    }

    #[test]
    fn load_uploads_every_static_buffer() {
        let (scene, stream) = load();
        assert_eq!(scene.bodies().len(), 3);
        // voidbox + one mesh per body
        assert_eq!(stream.mesh_count(), 4);
        assert_eq!(stream.lines_count(), 1);
        assert_eq!(scene.bodies()[1].trace_handle(), Some(LinesHandle(0)));
        assert!(scene.bodies()[2].trace().is_none());
        assert_eq!(scene.bodies()[0].mesh_handle(), MeshHandle(1));
    }

    #[test]
    fn missing_texture_is_fatal_and_uploads_nothing() {
        let manifest = SceneManifest::from_json(MANIFEST).unwrap();
        let mut textures = TextureRegistry::new();
        textures.insert("stars");
        textures.insert("sun");
        textures.insert("rock");
        let mut stream = CommandStream::new();

        match SceneComposer::load(&config(), &manifest, &textures, &mut stream) {
            Err(OrreryError::TextureNotFound { body, texture }) => {
                assert_eq!(body, "earth");
                assert_eq!(texture, "earth");
            }
            other => panic!("expected TextureNotFound, got {:?}", other.map(|_| ())),
        }
        assert_eq!(stream.mesh_count(), 0);
    }

    #[test]
    fn draw_order_is_voidbox_bodies_traces() {
        let (mut scene, _) = load();
        let plan = scene.tick(16.0, &InputSnapshot::default()).unwrap();

        let c = &plan.commands;
        assert_eq!(c.len(), 7);
        assert_eq!(c[0], DrawCommand::SetDepthTest(false));
        assert!(matches!(c[1], DrawCommand::DrawMesh(d) if d.mesh == MeshHandle(0) && d.light == LightRole::None));
        assert_eq!(c[2], DrawCommand::SetDepthTest(true));
        let meshes: Vec<_> = c[3..6]
            .iter()
            .map(|cmd| match cmd {
                DrawCommand::DrawMesh(d) => d.mesh.0,
                _ => panic!("expected a mesh draw"),
            })
            .collect();
        assert_eq!(meshes, [1, 2, 3]);
        assert_eq!(c[6], DrawCommand::DrawLines(LinesHandle(0)));
    }

    #[test]
    fn roles_follow_bodies() {
        let (mut scene, _) = load();
        let plan = scene.tick(16.0, &InputSnapshot::default()).unwrap();
        let roles: Vec<_> = draws(&plan).iter().map(|d| d.light).collect();
        assert_eq!(
            roles,
            [LightRole::None, LightRole::Emitter, LightRole::Receiver, LightRole::None]
        );
    }

    #[test]
    fn voidbox_follows_the_eye_without_leaking() {
        let (mut scene, _) = load();
        let plan = scene.tick(16.0, &InputSnapshot::default()).unwrap();
        let draws = draws(&plan);

        let eye = scene.camera().state().eye;
        assert_eq!(draws[0].model, Mat4::from_translation(eye));
        // The sun sits still at the origin: nothing from the voidbox scope remains.
        assert_eq!(draws[1].model, Mat4::IDENTITY);
        for (draw, body) in draws[1..].iter().zip(scene.bodies()) {
            assert!(draw.model.w_axis.truncate().distance(body.orbit.position) < 1e-4);
        }
    }

    #[test]
    fn earth_after_two_seconds() {
        let (mut scene, _) = load();
        scene.tick(2000.0, &InputSnapshot::default()).unwrap();

        let earth = &scene.bodies()[1];
        assert!((earth.orbit.angle - 2.0 * PI).abs() < 1e-9);
        assert!(earth.orbit.position.distance(Vec3::new(100.0, 0.0, 0.0)) < 1e-3);
        assert_eq!(scene.clock().time().simulated_ms, 2000.0);
    }

    #[test]
    fn invalid_full_angle_keeps_trace_on_the_live_orbit() {
        let mut config = config();
        config.orbit.full_angle = 0.0;
        let (mut scene, _) = load_with(&config);

        let trace = scene.bodies()[1].trace().unwrap().clone();
        assert!((trace.spacing() - PI / 6.0).abs() < 1e-12);
        assert!(trace.samples()[1].distance(trace.samples()[0]) > 1.0);

        // One sample spacing of earth's orbit.
        scene.tick(1000.0 / 6.0, &InputSnapshot::default()).unwrap();
        assert!(scene.bodies()[1].orbit.position.distance(trace.samples()[1]) < 1e-3);
    }

    #[test]
    fn speed_steps_apply_before_advancing() {
        let (mut scene, _) = load();
        let input = InputSnapshot { speed_steps: 2, ..Default::default() };
        scene.tick(10.0, &input).unwrap();
        assert_eq!(scene.clock().speed(), 100.0);
        assert_eq!(scene.clock().time().simulated_delta_ms, 1000.0);
    }

    #[test]
    fn light_sits_on_the_sun() {
        let (mut scene, _) = load();
        let plan = scene.tick(16.0, &InputSnapshot::default()).unwrap();
        assert_eq!(plan.uniforms.light.position, Vec3::ZERO);
        assert_eq!(plan.uniforms.light.color, [1.0, 0.9, 0.8]);
    }

    #[test]
    fn camera_moves_with_held_input() {
        let (mut scene, _) = load();
        let start = scene.camera().state().eye;
        let input = InputSnapshot::default().with_held(Direction::Forward);
        let plan = scene.tick(100.0, &input).unwrap();
        let eye = scene.camera().state().eye;
        assert!(eye.distance(start) > 0.0);
        assert_eq!(plan.uniforms.view, scene.camera().state().view_matrix());
    }

    #[test]
    fn resize_rebuilds_projection() {
        let (mut scene, _) = load();
        let before = scene.tick(16.0, &InputSnapshot::default()).unwrap().uniforms.projection;
        scene.resize(800.0, 800.0);
        let after = scene.tick(16.0, &InputSnapshot::default()).unwrap().uniforms.projection;
        assert_ne!(before, after);
        assert_eq!(scene.projection().aspect(), 1.0);
    }

    #[test]
    fn plan_replays_identically() {
        let (mut scene, mut stream) = load();
        let plan = scene.tick(16.0, &InputSnapshot::default()).unwrap();

        plan.submit(&mut stream);
        let first: Vec<f32> = (0..stream.command_count())
            .flat_map(|i| stream.command(i).unwrap().to_vec())
            .collect();
        plan.submit(&mut stream);
        let second: Vec<f32> = (0..stream.command_count())
            .flat_map(|i| stream.command(i).unwrap().to_vec())
            .collect();

        assert_eq!(stream.command_count(), plan.commands.len());
        assert_eq!(first, second);
    }
}
