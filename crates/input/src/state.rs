use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::action::{Action, CameraMode, InputEvent, Key};

/// Pointer tuning for first-person look.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Degrees of turn per pixel of drag.
    pub drag_sensitivity: f32,
    /// Largest turn a single drag event may produce, in degrees.
    pub max_drag_step: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            drag_sensitivity: 0.15,
            max_drag_step: 20.0,
        }
    }
}

/// Horizontal walking direction for one frame: unit length or zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementIntent {
    pub direction: Vec2,
    pub speed: f32,
}

impl MovementIntent {
    pub const NONE: Self = Self {
        direction: Vec2::ZERO,
        speed: 0.0,
    };

    /// Displacement `(dx, dz)` for this frame.
    pub fn delta(&self) -> Vec2 {
        self.direction * self.speed
    }

    pub fn is_idle(&self) -> bool {
        self.direction == Vec2::ZERO
    }
}

/// Held keys plus the mapping from raw events to actions.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: BTreeSet<Key>,
    pub mode: CameraMode,
    pub config: InputConfig,
}

impl InputState {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Forget every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Record an event and return the action it triggers, if any.
    pub fn handle(&mut self, event: InputEvent) -> Action {
        tracing::trace!(?event, "input");
        match event {
            InputEvent::KeyDown(key) => {
                self.held.insert(key);
                let orbit = self.mode == CameraMode::Orbit;
                match key {
                    Key::AddBlock => Action::AddBlock,
                    Key::DeleteBlock => Action::DeleteBlock,
                    Key::Forward if orbit => Action::OrbitStep { forward: 1.0, pan: 0.0 },
                    Key::Back if orbit => Action::OrbitStep { forward: -1.0, pan: 0.0 },
                    Key::StrafeLeft if orbit => Action::OrbitStep { forward: 0.0, pan: 1.0 },
                    Key::StrafeRight if orbit => Action::OrbitStep { forward: 0.0, pan: -1.0 },
                    _ => Action::Noop,
                }
            }
            InputEvent::KeyUp(key) => {
                self.held.remove(&key);
                Action::Noop
            }
            InputEvent::PointerDrag { dx, dy } => match self.mode {
                CameraMode::FirstPerson => {
                    let limit = self.config.max_drag_step;
                    let s = self.config.drag_sensitivity;
                    // Screen y grows downward, so dragging up looks up.
                    Action::Look {
                        right: (dx * s).clamp(-limit, limit),
                        up: (-dy * s).clamp(-limit, limit),
                    }
                }
                CameraMode::Orbit => Action::Orbit { dx, dy },
            },
            InputEvent::Scroll { delta_y } => match self.mode {
                CameraMode::Orbit => Action::Dolly(delta_y),
                CameraMode::FirstPerson => Action::Noop,
            },
        }
    }

    /// Net turn from held keys: +1 for left, -1 for right, 0 for both or none.
    pub fn turn_axis(&self) -> f32 {
        let mut axis = 0.0;
        if self.is_held(Key::TurnLeft) {
            axis += 1.0;
        }
        if self.is_held(Key::TurnRight) {
            axis -= 1.0;
        }
        axis
    }

    /// Combine held movement keys into a direction in the given walking basis.
    pub fn movement_intent(&self, forward: Vec2, right: Vec2, speed: f32) -> MovementIntent {
        let mut dir = Vec2::ZERO;
        if self.is_held(Key::Forward) {
            dir += forward;
        }
        if self.is_held(Key::Back) {
            dir -= forward;
        }
        if self.is_held(Key::StrafeRight) {
            dir += right;
        }
        if self.is_held(Key::StrafeLeft) {
            dir -= right;
        }
        let direction = dir.normalize_or_zero();
        if direction == Vec2::ZERO {
            return MovementIntent::NONE;
        }
        MovementIntent { direction, speed }
    }
}
