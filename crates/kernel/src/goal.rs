use blockyard_common::{CellCoord, distance_xz};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Whether the shrine has been found. Latches: once true it stays true.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalState {
    reached: bool,
}

impl GoalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reached(&self) -> bool {
        self.reached
    }
}

/// Proximity check against the goal cell's center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalDetector {
    goal: CellCoord,
    threshold: f32,
}

impl GoalDetector {
    /// Default distance, in cells, at which the goal counts as reached.
    pub const DEFAULT_THRESHOLD: f32 = 1.25;

    pub fn new(goal: CellCoord, threshold: f32) -> Self {
        Self { goal, threshold }
    }

    pub fn goal(&self) -> CellCoord {
        self.goal
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Evaluate one frame. Returns true only on the frame the latch flips.
    pub fn check(&self, state: &mut GoalState, eye: Vec3) -> bool {
        if state.reached {
            return false;
        }
        let distance = distance_xz(eye, self.goal.center());
        if distance < self.threshold {
            state.reached = true;
            tracing::info!(goal = %self.goal, distance, "goal reached");
            return true;
        }
        false
    }
}
