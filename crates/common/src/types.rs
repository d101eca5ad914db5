use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Tallest column a grid cell may hold.
pub const MAX_HEIGHT: u8 = 4;

/// Integer coordinate of a grid cell on the XZ plane.
///
/// Signed so that neighbours of edge cells can be expressed; whether a
/// coordinate is inside a given grid is the grid's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub z: i32,
}

impl CellCoord {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Cell containing a continuous XZ position.
    pub fn containing(x: f32, z: f32) -> Self {
        Self {
            x: x.floor() as i32,
            z: z.floor() as i32,
        }
    }

    /// Cell containing the horizontal part of a world position.
    pub fn from_world(pos: Vec3) -> Self {
        Self::containing(pos.x, pos.z)
    }

    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    /// `max(|dx|, |dz|)`: the square-ring distance used by courtyard carving.
    pub fn chebyshev(self, other: CellCoord) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }

    /// Center of the cell on the XZ plane.
    pub fn center(self) -> Vec2 {
        Vec2::new(self.x as f32 + 0.5, self.z as f32 + 0.5)
    }
}

impl std::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Euclidean distance between a world position and an XZ point, ignoring Y.
pub fn distance_xz(pos: Vec3, point: Vec2) -> f32 {
    Vec2::new(pos.x, pos.z).distance(point)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containing_floors_negative_positions() {
        assert_eq!(CellCoord::containing(0.9, 2.1), CellCoord::new(0, 2));
        assert_eq!(CellCoord::containing(-0.1, 3.0), CellCoord::new(-1, 3));
    }

    #[test]
    fn chebyshev_is_max_axis_distance() {
        let goal = CellCoord::new(28, 28);
        assert_eq!(goal.chebyshev(CellCoord::new(25, 27)), 3);
        assert_eq!(goal.chebyshev(CellCoord::new(31, 31)), 3);
        assert_eq!(goal.chebyshev(goal), 0);
    }

    #[test]
    fn center_is_half_cell_offset() {
        assert_eq!(CellCoord::new(28, 28).center(), Vec2::new(28.5, 28.5));
    }

    #[test]
    fn distance_ignores_height() {
        let d = distance_xz(Vec3::new(3.0, 100.0, 4.0), Vec2::ZERO);
        assert!((d - 5.0).abs() < 1e-6);
    }
}
