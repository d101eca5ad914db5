use blockyard_common::{CellCoord, MAX_HEIGHT};
use blockyard_kernel::WorldGrid;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// What an edit request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditOutcome {
    /// The column grew; `height` is the new height.
    Added { cell: CellCoord, height: u8 },
    /// The column shrank; `height` is the new height.
    Removed { cell: CellCoord, height: u8 },
    /// The column was already at the bound in the requested direction.
    AtLimit(CellCoord),
    /// The faced cell is outside the grid.
    NoTarget,
}

impl EditOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, Self::Added { .. } | Self::Removed { .. })
    }
}

/// The cell one step ahead of `eye` while looking at `look`.
///
/// Steps along whichever horizontal axis dominates the view direction; ties
/// go to X and a zero component counts as positive.
pub fn cell_in_front(grid: &WorldGrid, eye: Vec3, look: Vec3) -> Option<CellCoord> {
    let here = CellCoord::from_world(eye);
    let fx = look.x - eye.x;
    let fz = look.z - eye.z;
    let step = |f: f32| if f >= 0.0 { 1 } else { -1 };

    let target = if fx.abs() >= fz.abs() {
        here.offset(step(fx), 0)
    } else {
        here.offset(0, step(fz))
    };
    grid.contains(target).then_some(target)
}

/// Applies add/delete requests to the grid. There is no undo history.
#[derive(Debug, Default)]
pub struct BlockEditor {
    applied: u64,
}

impl BlockEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of edits that changed the grid.
    pub fn applied(&self) -> u64 {
        self.applied
    }

    /// Raise the faced column by one block.
    pub fn add_block(&mut self, grid: &mut WorldGrid, eye: Vec3, look: Vec3) -> EditOutcome {
        let Some(cell) = cell_in_front(grid, eye, look) else {
            return EditOutcome::NoTarget;
        };
        let current = grid.height_at(cell);
        if current >= MAX_HEIGHT {
            tracing::debug!(%cell, "column already at max height");
            return EditOutcome::AtLimit(cell);
        }
        let height = current + 1;
        grid.set_height(cell, height);
        self.applied += 1;
        tracing::debug!(%cell, height, "block added");
        EditOutcome::Added { cell, height }
    }

    /// Lower the faced column by one block.
    pub fn delete_block(&mut self, grid: &mut WorldGrid, eye: Vec3, look: Vec3) -> EditOutcome {
        let Some(cell) = cell_in_front(grid, eye, look) else {
            return EditOutcome::NoTarget;
        };
        let current = grid.height_at(cell);
        if current == 0 {
            tracing::debug!(%cell, "column already empty");
            return EditOutcome::AtLimit(cell);
        }
        let height = current - 1;
        grid.set_height(cell, height);
        self.applied += 1;
        tracing::debug!(%cell, height, "block removed");
        EditOutcome::Removed { cell, height }
    }
}
