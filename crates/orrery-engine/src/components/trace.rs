use glam::Vec3;

use crate::core::orbit::{orbit_position, valid_full_angle};

/// Closed polyline sampled along a body's orbit. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitTrace {
    samples: Vec<Vec3>,
    spacing: f64,
}

impl OrbitTrace {
    pub fn samples(&self) -> &[Vec3] {
        &self.samples
    }

    /// Angle between consecutive samples.
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Consecutive sample pairs; the last pair closes back to the first sample.
    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        let n = self.samples.len();
        (0..n).map(move |i| (self.samples[i], self.samples[(i + 1) % n]))
    }

    /// Flattened segment endpoints, two vertices per segment.
    pub fn line_list(&self) -> Vec<Vec3> {
        self.segments().flat_map(|(a, b)| [a, b]).collect()
    }
}

/// Samples the orbit formula at evenly spaced angles over `[0, full_angle)`.
/// An invalid full angle falls back to 2π, as in `OrbitalPropagator`.
#[derive(Debug, Clone, Copy)]
pub struct OrbitTraceBuilder {
    full_angle: f64,
    samples: u32,
}

impl OrbitTraceBuilder {
    pub const MIN_SAMPLES: u32 = 3;

    pub fn new(full_angle: f64, samples: u32) -> Self {
        Self {
            full_angle: valid_full_angle(full_angle),
            samples: samples.max(Self::MIN_SAMPLES),
        }
    }

    pub fn sample_angle(&self, i: u32) -> f64 {
        self.full_angle * i as f64 / self.samples as f64
    }

    pub fn build(&self, radius: f32, tilt: f32) -> OrbitTrace {
        let samples = (0..self.samples)
            .map(|i| orbit_position(radius as f64, tilt as f64, self.sample_angle(i)))
            .collect();
        OrbitTrace {
            samples,
            spacing: self.full_angle / self.samples as f64,
        }
    }
}
