//! World Kernel: the authoritative block grid, courtyard carving, collision
//! resolution and the goal latch.
//!
//! # Invariants
//! - Every column height stays within `0..=MAX_HEIGHT`.
//! - Cells outside the grid read as solid; there is no out-of-range error.
//! - After construction the grid is mutated only through explicit operations,
//!   each of which is recorded in the grid's event log.

pub mod carve;
pub mod collision;
pub mod goal;
pub mod grid;
pub mod layout;

pub use carve::CarveParams;
pub use collision::{CollisionParams, MoveKind, MoveOutcome, clamp_to_world, is_blocked, resolve_move, step};
pub use goal::{GoalDetector, GoalState};
pub use grid::{GridError, GridEvent, WorldGrid};
pub use layout::{BASE_LAYOUT, GOAL_CELL, WORLD_SIZE};
