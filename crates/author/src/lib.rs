//! In-World Authoring: single-block edits at the cell the camera faces.
//!
//! # Invariants
//! - Edits never push a column outside `0..=MAX_HEIGHT`; hitting a bound is a
//!   no-op, not an error.
//! - Every applied edit produces a grid event record.

mod editor;

pub use editor::{BlockEditor, EditOutcome, cell_in_front};
