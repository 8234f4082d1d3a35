//! Klotski Solver Library
//!
//! Finds a sequence of single-tile moves that takes a sliding-block layout
//! to its goal, using breadth-first, depth-first, iterative-deepening, or A*
//! search over board states.
//!
//! The rendering layer hands over its live tiles; [`encode`] turns them into a
//! [`State`], [`solve`] searches, and the returned [`Solution`] lists the
//! states to replay, starting after the one already on screen.

pub mod codec;
pub mod error;
pub mod geometry;
pub mod grid;
mod heuristic;
pub mod layouts;
pub mod moves;
pub mod path;
pub mod solver;

pub use codec::{decode, encode, LiveBoard, State, Tile};
pub use error::{Error, ParseNameError, Result};
pub use geometry::{Cell, Geometry, GOAL_TILE};
pub use layouts::Layout;
pub use moves::{scramble, Direction, Step};
pub use path::Solution;
pub use solver::{
    solve, solve_with, Limit, Outcome, Report, SolveConfig, Stats, Strategy, DEFAULT_MAX_DEPTH,
};
