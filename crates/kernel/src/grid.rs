use std::collections::BTreeSet;

use blockyard_common::{CellCoord, MAX_HEIGHT};
use serde::{Deserialize, Serialize};

use crate::carve::CarveParams;

/// A record of every mutation applied to the grid after it was loaded.
///
/// Consumers that cache per-cell data (meshes, minimaps) can drain the log
/// once per frame instead of diffing the whole grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GridEvent {
    /// The shrine courtyard was carved around `goal`.
    Carved { goal: CellCoord, params: CarveParams },
    /// A single column changed height.
    HeightChanged { cell: CellCoord, old: u8, new: u8 },
}

/// Errors from building a grid out of a layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("layout has no rows")]
    EmptyLayout,
    #[error("layout row {row} has {len} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("height {height} at {cell} exceeds the maximum of {max}", max = MAX_HEIGHT)]
    HeightOutOfRange { cell: CellCoord, height: u8 },
    #[error("goal cell {0} lies outside the grid")]
    GoalOutOfBounds(CellCoord),
}

/// Square field of column heights indexed by `(x, z)`.
///
/// The size is fixed at construction. Storage is row-major with `z` selecting
/// the row, matching the way layouts are written down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldGrid {
    size: usize,
    heights: Vec<u8>,
    #[serde(skip)]
    event_log: Vec<GridEvent>,
}

impl WorldGrid {
    /// An open `size` × `size` grid with every column at height 0.
    pub fn flat(size: usize) -> Self {
        Self {
            size,
            heights: vec![0; size * size],
            event_log: Vec::new(),
        }
    }

    /// Load a grid from rows of heights. Row `z` holds the cells `(0..n, z)`.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, GridError> {
        let size = rows.len();
        if size == 0 {
            return Err(GridError::EmptyLayout);
        }
        let mut heights = Vec::with_capacity(size * size);
        for (z, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != size {
                return Err(GridError::RaggedRow {
                    row: z,
                    len: row.len(),
                    expected: size,
                });
            }
            for (x, &height) in row.iter().enumerate() {
                if height > MAX_HEIGHT {
                    return Err(GridError::HeightOutOfRange {
                        cell: CellCoord::new(x as i32, z as i32),
                        height,
                    });
                }
                heights.push(height);
            }
        }
        Ok(Self {
            size,
            heights,
            event_log: Vec::new(),
        })
    }

    /// Load a layout, then carve an accessible courtyard around `goal`.
    pub fn courtyard<R: AsRef<[u8]>>(
        rows: &[R],
        goal: CellCoord,
        params: &CarveParams,
    ) -> Result<Self, GridError> {
        let mut grid = Self::from_rows(rows)?;
        if !grid.contains(goal) {
            return Err(GridError::GoalOutOfBounds(goal));
        }
        grid.carve_access(goal, params);
        tracing::info!(
            size = grid.size,
            %goal,
            solid = grid.solid_count(),
            "world grid built"
        );
        Ok(grid)
    }

    /// Side length in cells.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let n = self.size as i32;
        if cell.x < 0 || cell.z < 0 || cell.x >= n || cell.z >= n {
            return None;
        }
        Some(cell.z as usize * self.size + cell.x as usize)
    }

    /// Height of an in-bounds cell, `None` outside the grid.
    pub fn height(&self, cell: CellCoord) -> Option<u8> {
        self.index(cell).map(|i| self.heights[i])
    }

    /// Height for collision purposes: cells outside the grid are maximally solid.
    pub fn height_at(&self, cell: CellCoord) -> u8 {
        self.height(cell).unwrap_or(MAX_HEIGHT)
    }

    pub fn is_solid(&self, cell: CellCoord) -> bool {
        self.height_at(cell) > 0
    }

    /// Set a column's height, clamped to `MAX_HEIGHT`. Returns false when the
    /// cell lies outside the grid. Changes are recorded in the event log.
    pub fn set_height(&mut self, cell: CellCoord, height: u8) -> bool {
        let Some(i) = self.index(cell) else {
            return false;
        };
        let new = height.min(MAX_HEIGHT);
        let old = self.heights[i];
        if old != new {
            self.heights[i] = new;
            self.event_log
                .push(GridEvent::HeightChanged { cell, old, new });
        }
        true
    }

    /// Unlogged write used while carving; out-of-range cells are clipped.
    pub(crate) fn put(&mut self, cell: CellCoord, height: u8) {
        if let Some(i) = self.index(cell) {
            self.heights[i] = height.min(MAX_HEIGHT);
        }
    }

    pub(crate) fn record(&mut self, event: GridEvent) {
        self.event_log.push(event);
    }

    /// All cells in row-major order with their heights.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, u8)> + '_ {
        let size = self.size;
        self.heights.iter().enumerate().map(move |(i, &h)| {
            let cell = CellCoord::new((i % size) as i32, (i / size) as i32);
            (cell, h)
        })
    }

    /// Number of cells with a non-zero column.
    pub fn solid_count(&self) -> usize {
        self.heights.iter().filter(|&&h| h > 0).count()
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[GridEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Open cells 4-connected to `start`. Empty when `start` is solid.
    pub fn reachable_from(&self, start: CellCoord) -> BTreeSet<CellCoord> {
        let mut seen = BTreeSet::new();
        if self.is_solid(start) {
            return seen;
        }
        let mut stack = vec![start];
        seen.insert(start);
        while let Some(cell) = stack.pop() {
            for next in [
                cell.offset(1, 0),
                cell.offset(-1, 0),
                cell.offset(0, 1),
                cell.offset(0, -1),
            ] {
                if !self.is_solid(next) && seen.insert(next) {
                    stack.push(next);
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_grid_is_open() {
        let grid = WorldGrid::flat(8);
        assert_eq!(grid.size(), 8);
        assert_eq!(grid.solid_count(), 0);
        assert!(!grid.is_solid(CellCoord::new(3, 4)));
    }

    #[test]
    fn out_of_range_reads_as_solid() {
        let grid = WorldGrid::flat(4);
        for cell in [
            CellCoord::new(-1, 0),
            CellCoord::new(0, -1),
            CellCoord::new(4, 0),
            CellCoord::new(0, 4),
        ] {
            assert_eq!(grid.height(cell), None);
            assert_eq!(grid.height_at(cell), MAX_HEIGHT);
            assert!(grid.is_solid(cell));
        }
    }

    #[test]
    fn from_rows_indexes_by_x_then_z() {
        let grid = WorldGrid::from_rows(&[[0u8, 1], [2, 3]]).unwrap();
        assert_eq!(grid.height(CellCoord::new(1, 0)), Some(1));
        assert_eq!(grid.height(CellCoord::new(0, 1)), Some(2));
    }

    #[test]
    fn from_rows_rejects_bad_layouts() {
        let empty: [[u8; 0]; 0] = [];
        assert_eq!(WorldGrid::from_rows(&empty), Err(GridError::EmptyLayout));

        let ragged: Vec<Vec<u8>> = vec![vec![0, 0], vec![0]];
        assert!(matches!(
            WorldGrid::from_rows(&ragged),
            Err(GridError::RaggedRow { row: 1, len: 1, expected: 2 })
        ));

        let tall = [[0u8, 9], [0, 0]];
        assert!(matches!(
            WorldGrid::from_rows(&tall),
            Err(GridError::HeightOutOfRange { height: 9, .. })
        ));
    }

    #[test]
    fn courtyard_rejects_goal_outside_grid() {
        let rows = [[0u8; 4]; 4];
        let err = WorldGrid::courtyard(&rows, CellCoord::new(9, 9), &CarveParams::default());
        assert_eq!(err, Err(GridError::GoalOutOfBounds(CellCoord::new(9, 9))));
    }

    #[test]
    fn set_height_clamps_and_logs_changes() {
        let mut grid = WorldGrid::flat(4);
        let cell = CellCoord::new(1, 1);
        assert!(grid.set_height(cell, 200));
        assert_eq!(grid.height(cell), Some(MAX_HEIGHT));
        // Writing the same value again is not a change.
        assert!(grid.set_height(cell, MAX_HEIGHT));
        assert_eq!(
            grid.events(),
            &[GridEvent::HeightChanged {
                cell,
                old: 0,
                new: MAX_HEIGHT
            }]
        );
        assert!(!grid.set_height(CellCoord::new(7, 7), 1));
    }

    #[test]
    fn drain_events_clears_log() {
        let mut grid = WorldGrid::flat(4);
        grid.set_height(CellCoord::new(0, 0), 1);
        assert_eq!(grid.drain_events().len(), 1);
        assert!(grid.events().is_empty());
    }

    #[test]
    fn cells_iterates_row_major() {
        let grid = WorldGrid::from_rows(&[[1u8, 2], [3, 4]]).unwrap();
        let cells: Vec<_> = grid.cells().collect();
        assert_eq!(
            cells,
            vec![
                (CellCoord::new(0, 0), 1),
                (CellCoord::new(1, 0), 2),
                (CellCoord::new(0, 1), 3),
                (CellCoord::new(1, 1), 4),
            ]
        );
    }

    #[test]
    fn reachable_from_stops_at_walls() {
        let rows = [
            [0u8, 0, 1, 0],
            [0, 0, 1, 0],
            [1, 1, 1, 0],
            [0, 0, 0, 0],
        ];
        let grid = WorldGrid::from_rows(&rows).unwrap();
        let region = grid.reachable_from(CellCoord::new(0, 0));
        assert_eq!(region.len(), 4);
        assert!(!region.contains(&CellCoord::new(3, 0)));
        assert!(grid.reachable_from(CellCoord::new(2, 0)).is_empty());
    }

    #[test]
    fn every_height_stays_in_bounds() {
        let mut grid = WorldGrid::flat(6);
        for (i, cell) in grid.cells().map(|(c, _)| c).collect::<Vec<_>>().into_iter().enumerate() {
            grid.set_height(cell, (i * 37 % 256) as u8);
        }
        assert!(grid.cells().all(|(_, h)| h <= MAX_HEIGHT));
    }
}
