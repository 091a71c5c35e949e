use crate::api::config::TimeConfig;

/// Elapsed-time bookkeeping, owned by the clock and handed out read-only.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimulationTime {
    /// Real milliseconds elapsed since the clock started.
    pub real_ms: f64,
    /// Simulated milliseconds, including the start offset.
    pub simulated_ms: f64,
    /// Real delta of the last frame.
    pub frame_delta_ms: f64,
    /// Simulated delta of the last frame.
    pub simulated_delta_ms: f64,
}

/// Converts wall-clock frame deltas into scaled simulation time.
/// Holds no celestial state.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    normalize_factor: f64,
    speed: f64,
    speed_min: f64,
    speed_max: f64,
    change_factor: f64,
    time: SimulationTime,
}

impl SimulationClock {
    pub fn new(config: &TimeConfig) -> Self {
        let speed_min = config.speed_min.max(0.0);
        let speed_max = config.speed_max.max(speed_min);
        Self {
            normalize_factor: config.normalize_factor,
            speed: config.speed_default.clamp(speed_min, speed_max),
            speed_min,
            speed_max,
            change_factor: config.speed_change_factor.max(1.0),
            time: SimulationTime {
                simulated_ms: config.start_offset_ms,
                ..Default::default()
            },
        }
    }

    /// Advance by one frame of real time. Returns the simulated delta.
    /// Negative or non-finite deltas count as zero.
    pub fn advance(&mut self, real_delta_ms: f64) -> f64 {
        let real = if real_delta_ms.is_finite() {
            real_delta_ms.max(0.0)
        } else {
            log::warn!("non-finite frame delta {real_delta_ms}, treating as 0");
            0.0
        };
        let simulated = real * self.normalize_factor * self.speed;

        self.time.real_ms += real;
        self.time.simulated_ms += simulated;
        self.time.frame_delta_ms = real;
        self.time.simulated_delta_ms = simulated;
        simulated
    }

    /// Multiply the speed by the change factor, clamped to the maximum.
    pub fn speed_up(&mut self) {
        self.set_speed(self.speed * self.change_factor);
    }

    /// Divide the speed by the change factor, clamped to the minimum.
    pub fn speed_down(&mut self) {
        self.set_speed(self.speed / self.change_factor);
    }

    /// Apply a coalesced number of speed requests (positive = faster).
    pub fn apply_speed_steps(&mut self, steps: i32) {
        if steps == 0 {
            return;
        }
        for _ in 0..steps.unsigned_abs() {
            if steps > 0 {
                self.speed_up();
            } else {
                self.speed_down();
            }
        }
        log::debug!("simulation speed now x{}", self.speed);
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.clamp(self.speed_min, self.speed_max);
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn time(&self) -> &SimulationTime {
        &self.time
    }
}
