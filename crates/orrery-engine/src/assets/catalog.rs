/// Built-in solar system scene.
///
/// Periods are real (Earth days); radii and sizes are exaggerated for
/// readability, so the outer planets stay within reach of the camera.

use std::collections::HashMap;
use std::f64::consts::TAU;

use crate::api::config::DAY_MS;
use crate::api::types::LightRole;
use crate::assets::manifest::{BodyDescriptor, SceneManifest, TextureDescriptor, VoidboxDescriptor};

/// Distance scaling: world_units = sqrt(au) * ORBIT_SCALE.
pub const ORBIT_SCALE: f32 = 400.0;

pub const SUN_SIZE: f32 = 600.0;
/// One full turn every 25.38 days.
pub const SUN_ROTATION_DAYS: f64 = 25.38;

/// One planet of the catalog.
pub struct PlanetDesc {
    pub name: &'static str,
    /// Semi-major axis (AU).
    pub au: f32,
    /// Orbital period in Earth days.
    pub period_days: f64,
    /// Sidereal rotation in Earth days (negative = retrograde).
    pub rotation_days: f64,
    /// Orbital inclination (degrees).
    pub inclination_deg: f32,
    /// Size factor before the global mesh scale.
    pub size: f32,
}

pub const PLANETS: [PlanetDesc; 8] = [
    PlanetDesc { name: "mercury", au: 0.387, period_days: 87.97,    rotation_days: 58.65,  inclination_deg: 7.00, size: 40.0 },
    PlanetDesc { name: "venus",   au: 0.723, period_days: 224.70,   rotation_days: -243.0, inclination_deg: 3.39, size: 90.0 },
    PlanetDesc { name: "earth",   au: 1.000, period_days: 365.26,   rotation_days: 1.0,    inclination_deg: 0.00, size: 100.0 },
    PlanetDesc { name: "mars",    au: 1.524, period_days: 686.98,   rotation_days: 1.03,   inclination_deg: 1.85, size: 60.0 },
    PlanetDesc { name: "jupiter", au: 5.203, period_days: 4332.59,  rotation_days: 0.41,   inclination_deg: 1.30, size: 280.0 },
    PlanetDesc { name: "saturn",  au: 9.555, period_days: 10759.22, rotation_days: 0.44,   inclination_deg: 2.49, size: 240.0 },
    PlanetDesc { name: "uranus",  au: 19.218, period_days: 30688.5, rotation_days: -0.72,  inclination_deg: 0.77, size: 150.0 },
    PlanetDesc { name: "neptune", au: 30.110, period_days: 60182.0, rotation_days: 0.67,   inclination_deg: 1.77, size: 145.0 },
];

/// Radians per simulated millisecond for a given period in days.
/// A zero period means no motion.
pub fn angular_speed(period_days: f64) -> f64 {
    if period_days == 0.0 {
        return 0.0;
    }
    TAU / (period_days * DAY_MS)
}

/// The sun, then the planets from the innermost outwards.
pub fn solar_system() -> SceneManifest {
    let mut bodies = Vec::with_capacity(PLANETS.len() + 1);
    bodies.push(BodyDescriptor {
        name: "sun".into(),
        texture: "sun".into(),
        radius: 0.0,
        angular_speed: 0.0,
        spin_speed: angular_speed(SUN_ROTATION_DAYS),
        tilt: 0.0,
        size: SUN_SIZE,
        light: LightRole::Emitter,
        orbit_trace: false,
    });
    for planet in &PLANETS {
        bodies.push(BodyDescriptor {
            name: planet.name.into(),
            texture: planet.name.into(),
            radius: planet.au.sqrt() * ORBIT_SCALE,
            angular_speed: angular_speed(planet.period_days),
            spin_speed: angular_speed(planet.rotation_days),
            tilt: planet.inclination_deg.to_radians(),
            size: planet.size,
            light: LightRole::Receiver,
            orbit_trace: true,
        });
    }

    let mut textures = HashMap::new();
    for name in std::iter::once("stars").chain(bodies.iter().map(|b| b.texture.as_str())) {
        textures.insert(
            name.to_string(),
            TextureDescriptor { path: format!("textures/{name}.jpg") },
        );
    }

    SceneManifest {
        voidbox: VoidboxDescriptor { texture: "stars".into() },
        bodies,
        textures,
    }
}
