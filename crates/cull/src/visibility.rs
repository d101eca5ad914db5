use std::time::{Duration, Instant};

use blockyard_common::{CellCoord, distance_xz};
use blockyard_kernel::WorldGrid;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A cell selected for drawing this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleCell {
    pub coord: CellCoord,
    pub height: u8,
}

/// Per-frame selection statistics for instrumentation.
#[derive(Debug, Clone, Default)]
pub struct SelectionStats {
    pub cells_scanned: usize,
    pub cells_selected: usize,
    /// Selected cells with at least one block to draw.
    pub solid_selected: usize,
    pub select_time: Duration,
}

/// Distance-radius culling around the camera eye.
#[derive(Debug, Clone)]
pub struct VisibilitySelector {
    radius: f32,
    stats: SelectionStats,
}

impl VisibilitySelector {
    pub const DEFAULT_RADIUS: f32 = 13.0;

    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            stats: SelectionStats::default(),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Whether a cell's center lies within the render radius of `eye`.
    pub fn is_visible(&self, cell: CellCoord, eye: Vec3) -> bool {
        distance_xz(eye, cell.center()) <= self.radius
    }

    /// Scan the whole grid and return the cells in range, row-major.
    pub fn select(&mut self, grid: &WorldGrid, eye: Vec3) -> Vec<VisibleCell> {
        let started = Instant::now();
        let selected: Vec<VisibleCell> = grid
            .cells()
            .filter(|(coord, _)| self.is_visible(*coord, eye))
            .map(|(coord, height)| VisibleCell { coord, height })
            .collect();

        self.stats = SelectionStats {
            cells_scanned: grid.size() * grid.size(),
            cells_selected: selected.len(),
            solid_selected: selected.iter().filter(|c| c.height > 0).count(),
            select_time: started.elapsed(),
        };
        tracing::trace!(
            selected = self.stats.cells_selected,
            solid = self.stats.solid_selected,
            "visibility selected"
        );
        selected
    }

    /// Statistics from the last `select`.
    pub fn stats(&self) -> &SelectionStats {
        &self.stats
    }
}

impl Default for VisibilitySelector {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RADIUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_cell_is_included() {
        let grid = WorldGrid::flat(16);
        let mut sel = VisibilitySelector::new(3.0);
        // Eye at the center of (2, 2); (5, 2) is exactly 3 cells away.
        let eye = Vec3::new(2.5, 1.6, 2.5);
        let cells = sel.select(&grid, eye);
        assert!(cells.iter().any(|c| c.coord == CellCoord::new(5, 2)));
        assert!(sel.is_visible(CellCoord::new(5, 2), eye));
    }

    #[test]
    fn cells_beyond_radius_are_excluded() {
        let grid = WorldGrid::flat(16);
        let mut sel = VisibilitySelector::new(3.0);
        let eye = Vec3::new(2.5, 1.6, 2.5);
        let cells = sel.select(&grid, eye);
        assert!(!cells.iter().any(|c| c.coord == CellCoord::new(6, 2)));
        // (5, 3) is sqrt(10) away.
        assert!(!cells.iter().any(|c| c.coord == CellCoord::new(5, 3)));
        for c in &cells {
            assert!(distance_xz(eye, c.coord.center()) <= 3.0);
        }
    }

    #[test]
    fn selection_reflects_heights_and_stats() {
        let mut grid = WorldGrid::flat(8);
        grid.set_height(CellCoord::new(1, 0), 3);
        let mut sel = VisibilitySelector::new(1.0);
        let cells = sel.select(&grid, Vec3::new(0.5, 1.6, 0.5));
        assert_eq!(
            cells,
            vec![
                VisibleCell { coord: CellCoord::new(0, 0), height: 0 },
                VisibleCell { coord: CellCoord::new(1, 0), height: 3 },
                VisibleCell { coord: CellCoord::new(0, 1), height: 0 },
            ]
        );
        assert_eq!(sel.stats().cells_scanned, 64);
        assert_eq!(sel.stats().cells_selected, 3);
        assert_eq!(sel.stats().solid_selected, 1);
    }

    #[test]
    fn selection_follows_edits_immediately() {
        let mut grid = WorldGrid::flat(8);
        let mut sel = VisibilitySelector::default();
        let eye = Vec3::new(4.0, 1.6, 4.0);
        assert_eq!(sel.select(&grid, eye).iter().filter(|c| c.height > 0).count(), 0);
        grid.set_height(CellCoord::new(4, 4), 2);
        assert_eq!(sel.select(&grid, eye).iter().filter(|c| c.height > 0).count(), 1);
    }

    #[test]
    fn eye_outside_grid_selects_nothing_far_away() {
        let grid = WorldGrid::flat(8);
        let mut sel = VisibilitySelector::new(2.0);
        assert!(sel.select(&grid, Vec3::new(100.0, 1.6, 100.0)).is_empty());
    }
}
