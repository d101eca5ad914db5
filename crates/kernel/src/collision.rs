//! Column collision on the XZ plane.
//!
//! The walker is a point with a small horizontal radius. Only the four cells
//! under its inflated footprint are consulted, so a single step must stay
//! shorter than one cell for the test to be exact.

use blockyard_common::CellCoord;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::grid::WorldGrid;

/// Tunables for the walker's body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionParams {
    /// Horizontal radius of the walker, in cells.
    pub agent_radius: f32,
    /// Fixed camera height; movement never changes it.
    pub eye_height: f32,
    /// Distance kept from the outer edge of the grid.
    pub boundary_margin: f32,
}

impl Default for CollisionParams {
    fn default() -> Self {
        Self {
            agent_radius: 0.22,
            eye_height: 1.6,
            boundary_margin: 0.3,
        }
    }
}

/// Which candidate `resolve_move` accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    /// Zero delta; nothing was attempted.
    Idle,
    /// The full diagonal move was free.
    Full,
    /// Slid along a wall using only the X component.
    SlideX,
    /// Slid along a wall using only the Z component.
    SlideZ,
    /// Every candidate was blocked; the walker stays put.
    Blocked,
}

impl MoveKind {
    pub fn moved(self) -> bool {
        matches!(self, Self::Full | Self::SlideX | Self::SlideZ)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub position: Vec3,
    pub kind: MoveKind,
}

/// The four cells covered by a walker of `radius` standing at `pos`.
pub fn footprint(pos: Vec2, radius: f32) -> [CellCoord; 4] {
    let x0 = (pos.x - radius).floor() as i32;
    let x1 = (pos.x + radius).floor() as i32;
    let z0 = (pos.y - radius).floor() as i32;
    let z1 = (pos.y + radius).floor() as i32;
    [
        CellCoord::new(x0, z0),
        CellCoord::new(x1, z0),
        CellCoord::new(x0, z1),
        CellCoord::new(x1, z1),
    ]
}

/// Whether a walker at `pos` (x, z) would overlap a raised or out-of-range cell.
pub fn is_blocked(grid: &WorldGrid, pos: Vec2, radius: f32) -> bool {
    footprint(pos, radius)
        .into_iter()
        .any(|cell| grid.is_solid(cell))
}

/// Try to move from `eye` by the horizontal `delta` (x, z).
///
/// Candidates are tried in a fixed order: the full move, then X only, then
/// Z only. The first free one wins, which makes diagonal moves slide along
/// walls instead of stopping dead.
pub fn resolve_move(
    grid: &WorldGrid,
    eye: Vec3,
    delta: Vec2,
    params: &CollisionParams,
) -> MoveOutcome {
    if delta == Vec2::ZERO {
        return MoveOutcome {
            position: eye,
            kind: MoveKind::Idle,
        };
    }

    let from = Vec2::new(eye.x, eye.z);
    let candidates = [
        (from + delta, MoveKind::Full),
        (Vec2::new(from.x + delta.x, from.y), MoveKind::SlideX),
        (Vec2::new(from.x, from.y + delta.y), MoveKind::SlideZ),
    ];

    for (pos, kind) in candidates {
        if !is_blocked(grid, pos, params.agent_radius) {
            tracing::trace!(?kind, x = pos.x, z = pos.y, "move accepted");
            return MoveOutcome {
                position: Vec3::new(pos.x, params.eye_height, pos.y),
                kind,
            };
        }
    }

    tracing::trace!(x = from.x, z = from.y, "move blocked");
    MoveOutcome {
        position: eye,
        kind: MoveKind::Blocked,
    }
}

/// Keep a position inside `[margin, size - margin]` on both horizontal axes
/// and pin it to the eye height.
pub fn clamp_to_world(pos: Vec3, size: usize, params: &CollisionParams) -> Vec3 {
    let lo = params.boundary_margin;
    let hi = size as f32 - params.boundary_margin;
    Vec3::new(pos.x.clamp(lo, hi), params.eye_height, pos.z.clamp(lo, hi))
}

/// One frame of movement: collision resolution followed by the world clamp.
pub fn step(grid: &WorldGrid, eye: Vec3, delta: Vec2, params: &CollisionParams) -> MoveOutcome {
    let outcome = resolve_move(grid, eye, delta, params);
    MoveOutcome {
        position: clamp_to_world(outcome.position, grid.size(), params),
        ..outcome
    }
}
