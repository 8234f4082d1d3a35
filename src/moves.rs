//! Legal move generation.
//!
//! A move shifts exactly one tile by one cell along one axis. Candidates are
//! emitted in a fixed order (tile ascending, then Left, Right, Up, Down) so
//! that every search is reproducible.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::codec::State;
use crate::geometry::{Cell, Geometry};

/// A unit step along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// All directions in emission order.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Cell offset `(dx, dy)`; y grows downwards.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        };
        f.write_str(name)
    }
}

/// The edge label between two adjacent states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Step {
    pub tile: usize,
    pub direction: Direction,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile {} {}", self.tile, self.direction)
    }
}

impl Geometry {
    /// Returns the cell `tile` would occupy after moving one cell in
    /// `direction`, if that placement stays on the board and clears every
    /// other tile.
    pub fn try_step(&self, state: &State, tile: usize, direction: Direction) -> Option<Cell> {
        let cells = state.cells();
        let (dx, dy) = direction.offset();
        let x = i32::from(cells[tile].x) + dx;
        let y = i32::from(cells[tile].y) + dy;

        let candidate = self.rect_at(tile, x, y);
        if !candidate.within(self.cols(), self.rows()) {
            return None;
        }

        let collides = cells
            .iter()
            .enumerate()
            .any(|(other, &cell)| other != tile && candidate.overlaps(&self.rect(other, cell)));
        if collides {
            return None;
        }

        // within() guarantees 0 <= x, y < cols, rows <= 255
        Some(Cell::new(x as u8, y as u8))
    }

    /// Every state reachable by one legal move, paired with the move.
    pub fn successors(&self, state: &State) -> Vec<(Step, State)> {
        let mut out = Vec::new();
        for tile in 0..state.len() {
            for direction in Direction::ALL {
                if let Some(cell) = self.try_step(state, tile, direction) {
                    out.push((Step { tile, direction }, state.with_cell(tile, cell)));
                }
            }
        }
        out
    }

    /// Every state reachable by one legal move.
    pub fn neighbors(&self, state: &State) -> Vec<State> {
        self.successors(state)
            .into_iter()
            .map(|(_, next)| next)
            .collect()
    }
}

/// Random walk of `steps` legal moves starting at `start`.
///
/// The walk avoids undoing its previous move whenever another move exists.
/// Moves are reversible, so the result can always be led back to `start` in
/// at most `steps` moves; scrambling a solved state yields a solvable puzzle.
pub fn scramble<R: Rng + ?Sized>(
    geometry: &Geometry,
    start: &State,
    steps: usize,
    rng: &mut R,
) -> State {
    let mut current = start.clone();
    let mut previous: Option<Step> = None;

    for _ in 0..steps {
        let mut options = geometry.successors(&current);
        if let Some(last) = previous {
            let undo = Step {
                tile: last.tile,
                direction: last.direction.opposite(),
            };
            if options.len() > 1 {
                options.retain(|(step, _)| *step != undo);
            }
        }
        let Some((step, next)) = options.choose(rng).cloned() else {
            break;
        };
        previous = Some(step);
        current = next;
    }

    current
}
