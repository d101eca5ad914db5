//! Culling: selects the grid cells close enough to the camera to draw.
//!
//! # Invariants
//! - Selection is recomputed in full every frame; nothing is cached between
//!   frames, so edits are visible immediately.
//! - A cell is selected iff its center is within the render radius (`<=`).
//!
//! # Scaling
//! Selection scans every cell, which is fine for the small fixed worlds this
//! workspace ships. A larger world would want a spatial index here.

mod visibility;

pub use visibility::{SelectionStats, VisibilitySelector, VisibleCell};
