//! Courtyard carving: guarantees the goal can be walked to, whatever the base
//! layout put around it.
//!
//! The steps run in a fixed order and later steps overwrite earlier ones:
//! clear the interior, raise the ring wall, cut the doorway through the
//! north side of the ring, run a corridor further north, clear the goal.

use std::ops::RangeInclusive;

use blockyard_common::{CellCoord, MAX_HEIGHT};
use serde::{Deserialize, Serialize};

use crate::grid::{GridEvent, WorldGrid};

/// Shape of the carved courtyard. Distances are in cells from the goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarveParams {
    /// Cells within this Chebyshev distance of the goal are cleared.
    pub interior: i32,
    /// Chebyshev distance of the ring wall.
    pub ring: i32,
    /// Height of the ring wall, clamped to `MAX_HEIGHT`.
    pub wall_height: u8,
    /// Number of doorway cells, starting at the goal's column and going east.
    pub door_width: i32,
    /// Cells of corridor north of the doorway.
    pub corridor: i32,
}

impl Default for CarveParams {
    fn default() -> Self {
        Self {
            interior: 2,
            ring: 3,
            wall_height: 2,
            door_width: 2,
            corridor: 6,
        }
    }
}

impl CarveParams {
    /// Whether the accessibility guarantee holds for `goal` in a grid of `size`.
    ///
    /// Outside this range carving still runs and clips at the edges, but the
    /// doorway or corridor may fall off the grid.
    pub fn is_valid_for(&self, goal: CellCoord, size: usize) -> bool {
        // Widened so extreme parameters compare instead of overflowing.
        let n = size as i64;
        let ring = i64::from(self.ring);
        let door_z = i64::from(goal.z) - ring;
        self.interior >= 0
            && self.ring > 0
            && self.door_width > 0
            && self.corridor >= 0
            && 2 * ring < n
            && door_z - i64::from(self.corridor) >= 0
            && i64::from(goal.x) + i64::from(self.door_width) <= n
    }
}

/// Cells `from..=to` intersected with `0..n`. Empty when they do not meet.
fn clip(from: i64, to: i64, n: i64) -> RangeInclusive<i32> {
    let lo = from.max(0);
    let hi = to.min(n - 1);
    if lo > hi {
        // `1..=0` is empty.
        return 1..=0;
    }
    lo as i32..=hi as i32
}

/// Chebyshev distance without `i32` overflow for far-away goals.
fn ring_distance(goal: CellCoord, x: i32, z: i32) -> i64 {
    let dx = (i64::from(x) - i64::from(goal.x)).abs();
    let dz = (i64::from(z) - i64::from(goal.z)).abs();
    dx.max(dz)
}

impl WorldGrid {
    /// Carve the shrine courtyard around `goal`.
    ///
    /// Never fails: every loop is clipped to the grid first, so oversized
    /// parameters cost at most one pass over the grid.
    pub fn carve_access(&mut self, goal: CellCoord, params: &CarveParams) {
        let n = self.size() as i64;
        let (gx, gz) = (i64::from(goal.x), i64::from(goal.z));
        let wall = params.wall_height.min(MAX_HEIGHT);

        let interior = i64::from(params.interior);
        for z in clip(gz - interior, gz + interior, n) {
            for x in clip(gx - interior, gx + interior, n) {
                self.put(CellCoord::new(x, z), 0);
            }
        }

        let ring = i64::from(params.ring);
        for z in clip(gz - ring, gz + ring, n) {
            for x in clip(gx - ring, gx + ring, n) {
                if ring_distance(goal, x, z) == ring {
                    self.put(CellCoord::new(x, z), wall);
                }
            }
        }
        tracing::debug!(%goal, ring = params.ring, wall, "ring wall raised");

        // Doorway row plus `corridor` rows north of it.
        let door_z = gz - ring;
        let corridor = i64::from(params.corridor);
        let door_x = clip(gx, gx + i64::from(params.door_width) - 1, n);
        if corridor >= 0 {
            for z in clip(door_z - corridor, door_z, n) {
                for x in door_x.clone() {
                    self.put(CellCoord::new(x, z), 0);
                }
            }
        }
        tracing::debug!(
            door_z,
            width = params.door_width,
            corridor = params.corridor,
            "doorway and corridor cut"
        );

        self.put(goal, 0);
        self.record(GridEvent::Carved {
            goal,
            params: *params,
        });
    }
}
