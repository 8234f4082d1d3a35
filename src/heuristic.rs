//! Lower bound on the moves still needed to solve a state.

use crate::codec::State;
use crate::geometry::{Geometry, GOAL_TILE};

impl Geometry {
    /// Manhattan distance, in cells, from the goal tile to the target.
    ///
    /// Each move shifts the goal tile by at most one cell along one axis, so
    /// this never exceeds the true number of remaining moves. A state without
    /// tiles estimates to 0.
    #[inline]
    pub fn estimate(&self, state: &State) -> u32 {
        let Some(&current) = state.cells().get(GOAL_TILE) else {
            return 0;
        };
        let target = self.target();
        u32::from(current.x.abs_diff(target.x)) + u32::from(current.y.abs_diff(target.y))
    }
}
