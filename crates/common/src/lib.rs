//! Shared types for the blockyard workspace: grid cell coordinates and the
//! constants every crate agrees on.

pub mod types;

pub use types::{CellCoord, MAX_HEIGHT, distance_xz};
