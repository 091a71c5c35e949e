pub mod runner;

pub use runner::OrreryRunner;

use std::cell::RefCell;
use std::ptr;
use wasm_bindgen::prelude::*;

use orrery_engine::assets::catalog::solar_system;
use orrery_engine::{Direction, InputEvent, OrreryConfig, OrreryResult, SceneManifest};

thread_local! {
    static RUNNER: RefCell<Option<OrreryRunner>> = RefCell::new(None);
}

/// Run `f` against the runner. None until `orrery_init` has succeeded.
fn with_runner<R>(f: impl FnOnce(&mut OrreryRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn push(event: InputEvent) {
    if with_runner(|r| r.push_input(event)).is_none() {
        log::warn!("input {event:?} before orrery_init, dropped");
    }
}

fn build_runner(config_json: Option<String>, manifest_json: Option<String>) -> OrreryResult<OrreryRunner> {
    let config = match config_json {
        Some(json) => OrreryConfig::from_json(&json)?,
        None => OrreryConfig::default(),
    };
    let manifest = match manifest_json {
        Some(json) => SceneManifest::from_json(&json)?,
        None => solar_system(),
    };
    OrreryRunner::new(&config, &manifest)
}

/// Load the scene. Either argument may be omitted to use the defaults
/// (built-in configuration, built-in solar system). Returns false if the
/// scene could not be loaded; the error is logged.
#[wasm_bindgen]
pub fn orrery_init(config_json: Option<String>, manifest_json: Option<String>) -> bool {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    match build_runner(config_json, manifest_json) {
        Ok(runner) => {
            RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
            log::info!("orrery: initialized");
            true
        }
        Err(err) => {
            log::error!("orrery: {err}");
            false
        }
    }
}

/// Compose one frame. Returns false when the host should stop its
/// animation loop (shutdown honoured, fatal frame error, or not initialized).
#[wasm_bindgen]
pub fn orrery_tick(dt_ms: f64) -> bool {
    match with_runner(|r| r.tick(dt_ms)) {
        Some(Ok(running)) => running,
        Some(Err(err)) => {
            log::error!("orrery: {err}");
            false
        }
        None => false,
    }
}

/// `direction`: 0 forward, 1 backward, 2 left, 3 right.
#[wasm_bindgen]
pub fn orrery_move(direction: u32, active: bool) {
    match Direction::ALL.get(direction as usize) {
        Some(&direction) => push(InputEvent::Move { direction, active }),
        None => log::warn!("unknown direction {direction}"),
    }
}

#[wasm_bindgen]
pub fn orrery_pointer_delta(dx: f32, dy: f32) {
    push(InputEvent::PointerDelta { dx, dy });
}

#[wasm_bindgen]
pub fn orrery_scroll(delta: f32) {
    push(InputEvent::Scroll { delta });
}

#[wasm_bindgen]
pub fn orrery_speed_up() {
    push(InputEvent::SpeedUp);
}

#[wasm_bindgen]
pub fn orrery_speed_down() {
    push(InputEvent::SpeedDown);
}

#[wasm_bindgen]
pub fn orrery_shutdown() {
    push(InputEvent::Shutdown);
}

#[wasm_bindgen]
pub fn orrery_resize(width: f32, height: f32) {
    with_runner(|r| r.resize(width, height));
}

// ---- Data accessors ----

/// Image paths indexed by texture handle.
#[wasm_bindgen]
pub fn get_texture_paths() -> js_sys::Array {
    let paths = js_sys::Array::new();
    with_runner(|r| {
        for path in r.texture_paths() {
            paths.push(&JsValue::from_str(path));
        }
    });
    paths
}

#[wasm_bindgen]
pub fn get_header_ptr() -> *const f32 {
    with_runner(|r| r.header_ptr()).unwrap_or(ptr::null())
}

#[wasm_bindgen]
pub fn get_commands_ptr() -> *const f32 {
    with_runner(|r| r.commands_ptr()).unwrap_or(ptr::null())
}

#[wasm_bindgen]
pub fn get_command_count() -> u32 {
    with_runner(|r| r.command_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_vertices_ptr() -> *const f32 {
    with_runner(|r| r.vertices_ptr()).unwrap_or(ptr::null())
}

#[wasm_bindgen]
pub fn get_vertices_len() -> u32 {
    with_runner(|r| r.vertices_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_indices_ptr() -> *const u32 {
    with_runner(|r| r.indices_ptr()).unwrap_or(ptr::null())
}

#[wasm_bindgen]
pub fn get_indices_len() -> u32 {
    with_runner(|r| r.indices_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_mesh_table_ptr() -> *const u32 {
    with_runner(|r| r.mesh_table_ptr()).unwrap_or(ptr::null())
}

#[wasm_bindgen]
pub fn get_mesh_count() -> u32 {
    with_runner(|r| r.mesh_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_line_vertices_ptr() -> *const f32 {
    with_runner(|r| r.line_vertices_ptr()).unwrap_or(ptr::null())
}

#[wasm_bindgen]
pub fn get_line_vertices_len() -> u32 {
    with_runner(|r| r.line_vertices_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_lines_table_ptr() -> *const u32 {
    with_runner(|r| r.lines_table_ptr()).unwrap_or(ptr::null())
}

#[wasm_bindgen]
pub fn get_lines_count() -> u32 {
    with_runner(|r| r.lines_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_simulation_speed() -> f64 {
    with_runner(|r| r.simulation_speed()).unwrap_or(0.0)
}
