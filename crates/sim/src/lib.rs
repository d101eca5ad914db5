//! Simulation context: owns every piece of per-session state and runs the
//! frame tick in a fixed order.
//!
//! # Invariants
//! - One tick runs at a time, always in the order: input, movement and
//!   collision, goal check, visibility selection.
//! - The grid is written only by block edits; the carving pass runs once in
//!   the constructor.
//! - Ticks are refused until resource loading has finished successfully. A
//!   failed load leaves grid and camera fully initialized and inspectable.

mod config;
mod simulation;

pub use config::{ConfigError, SimConfig, StartPose};
pub use simulation::{Frame, LoopState, SimError, Simulation, StatusEvent};
