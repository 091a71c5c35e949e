use glam::Vec2;

use crate::api::types::Direction;

/// Decoded input intents the engine understands.
/// Raw key codes and device events are mapped to these by the frame driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A directional intent switched on or off.
    Move { direction: Direction, active: bool },
    /// Relative pointer motion (yaw from `dx`, pitch from `dy`).
    PointerDelta { dx: f32, dy: f32 },
    /// Scroll wheel motion. Any non-zero delta toggles cruise/turbo.
    Scroll { delta: f32 },
    /// Request a faster simulation.
    SpeedUp,
    /// Request a slower simulation.
    SpeedDown,
    /// Window close or equivalent. Honoured between frames.
    Shutdown,
}

/// Coalesced view of all input for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    /// Held state per `Direction`.
    pub held: [bool; 4],
    /// Summed pointer motion since the previous frame.
    pub pointer_delta: Vec2,
    /// Number of scroll events since the previous frame.
    pub mode_toggles: u32,
    /// Net speed requests (positive = faster).
    pub speed_steps: i32,
    pub shutdown: bool,
}

impl InputSnapshot {
    pub fn is_held(&self, direction: Direction) -> bool {
        self.held[direction.index()]
    }

    pub fn with_held(mut self, direction: Direction) -> Self {
        self.held[direction.index()] = true;
        self
    }
}

/// A queue of input events.
/// The driver pushes events as they arrive; the engine folds them into a
/// snapshot once per frame, before any state update.
pub struct InputQueue {
    events: Vec<InputEvent>,
    held: [bool; 4],
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
            held: [false; 4],
        }
    }

    /// Push a new input event.
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain pending events into this frame's snapshot.
    /// Held directions carry over until released.
    pub fn snapshot(&mut self) -> InputSnapshot {
        let mut snapshot = InputSnapshot::default();
        for event in self.events.drain(..) {
            match event {
                InputEvent::Move { direction, active } => {
                    self.held[direction.index()] = active;
                }
                InputEvent::PointerDelta { dx, dy } => {
                    snapshot.pointer_delta += Vec2::new(dx, dy);
                }
                InputEvent::Scroll { delta } => {
                    if delta != 0.0 {
                        snapshot.mode_toggles += 1;
                    }
                }
                InputEvent::SpeedUp => snapshot.speed_steps += 1,
                InputEvent::SpeedDown => snapshot.speed_steps -= 1,
                InputEvent::Shutdown => snapshot.shutdown = true,
            }
        }
        snapshot.held = self.held;
        snapshot
    }

    /// Check if there are pending events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
