//! Input mapping: raw key and pointer events become high-level actions and a
//! per-frame movement intent.
//!
//! # Invariants
//! - The simulation consumes actions and intents, never raw events.
//! - Edit keys fire once per key-down; movement and turn keys are held state.
//!   In orbit mode a movement key-down also fires one orbit step.

pub mod action;
mod state;

pub use action::{Action, CameraMode, InputEvent, Key};
pub use state::{InputConfig, InputState, MovementIntent};
