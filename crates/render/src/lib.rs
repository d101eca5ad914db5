//! Rendering Adapter: the boundary between the simulation and a GPU backend.
//!
//! # Invariants
//! - Painting reads world state; it never mutates it.
//! - Everything drawn goes through [`VolumeSink::draw_unit_volume`], so a
//!   backend only has to know how to draw one textured box.
//!
//! Shapes are described as data: a [`ShapeKind`] tag plus a transform and a
//! surface, composed through a [`JointTree`] when parts hang off each other.

mod painter;
mod scene;
mod surface;

pub use painter::{DrawCall, RecordingSink, VolumeSink, WorldPainter};
pub use scene::{Joint, JointId, JointTree, MeshHandle, Primitive, SceneError, ShapeKind, TransformStack};
pub use surface::{Surface, TextureSlot};
