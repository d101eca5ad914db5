use serde::{Deserialize, Serialize};

/// Logical keys. The default bindings are WASD to walk, Q/E to turn and
/// R/F to add or delete a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    TurnLeft,
    TurnRight,
    AddBlock,
    DeleteBlock,
}

impl Key {
    /// Default binding for a typed character, case-insensitive.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'w' => Some(Self::Forward),
            's' => Some(Self::Back),
            'a' => Some(Self::StrafeLeft),
            'd' => Some(Self::StrafeRight),
            'q' => Some(Self::TurnLeft),
            'e' => Some(Self::TurnRight),
            'r' => Some(Self::AddBlock),
            'f' => Some(Self::DeleteBlock),
            _ => None,
        }
    }
}

/// Raw events from the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Pointer moved while a button is held, in pixels.
    PointerDrag { dx: f32, dy: f32 },
    /// Scroll wheel; positive scrolls down.
    Scroll { delta_y: f32 },
}

/// Which camera the pointer drives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraMode {
    #[default]
    FirstPerson,
    Orbit,
}

/// A high-level action produced from an input event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Turn the first-person camera. Positive `right` turns right, positive
    /// `up` looks up.
    Look { right: f32, up: f32 },
    /// Drag-rotate the orbit camera by raw pixel deltas.
    Orbit { dx: f32, dy: f32 },
    /// Change the orbit radius by a scroll delta.
    Dolly(f32),
    /// One keyboard step of the orbit camera. `forward` is +1 or -1 along
    /// the view direction; `pan` is +1 to swing left, -1 to swing right.
    OrbitStep { forward: f32, pan: f32 },
    /// Raise the faced column by one block.
    AddBlock,
    /// Lower the faced column by one block.
    DeleteBlock,
    /// Nothing to do; held-state changes or unbound events.
    Noop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings() {
        assert_eq!(Key::from_char('w'), Some(Key::Forward));
        assert_eq!(Key::from_char('E'), Some(Key::TurnRight));
        assert_eq!(Key::from_char('f'), Some(Key::DeleteBlock));
        assert_eq!(Key::from_char('x'), None);
    }

    #[test]
    fn default_mode_is_first_person() {
        assert_eq!(CameraMode::default(), CameraMode::FirstPerson);
    }
}
