//! Parent-pointer bookkeeping and solution reconstruction.
//!
//! Frontier entries carry the id of the node they were generated from instead
//! of a copy of the path so far. When a goal is popped, one backward walk
//! through the [`Trail`] recovers the whole path.

use crate::codec::State;
use crate::geometry::Geometry;
use crate::moves::{Direction, Step};

/// Index of an expanded node inside a [`Trail`].
pub type NodeId = usize;

#[derive(Debug)]
struct TrailNode {
    state: State,
    parent: Option<NodeId>,
}

/// Arena of expanded nodes, owned by one search attempt.
#[derive(Debug, Default)]
pub struct Trail {
    nodes: Vec<TrailNode>,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an expanded state and returns its id.
    pub fn push(&mut self, state: State, parent: Option<NodeId>) -> NodeId {
        self.nodes.push(TrailNode { state, parent });
        self.nodes.len() - 1
    }

    /// Walks back from `parent` and returns the states after the root, in
    /// order, ending with `last`.
    ///
    /// The root is the state the search started from. The caller is already
    /// showing it, so it is left out; a search that starts on the goal yields
    /// an empty path.
    pub fn reconstruct(&self, parent: Option<NodeId>, last: State) -> Vec<State> {
        let Some(parent) = parent else {
            // `last` is the root itself
            return Vec::new();
        };

        let mut states = vec![last];
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            let node = &self.nodes[id];
            if node.parent.is_none() {
                break;
            }
            states.push(node.state.clone());
            cursor = node.parent;
        }
        states.reverse();
        states
    }
}

/// Ordered states to replay, starting with the first state after the start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    states: Vec<State>,
}

impl Solution {
    pub fn new(states: Vec<State>) -> Self {
        Self { states }
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Number of moves.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The moves that lead from `start` through every state of the solution.
    ///
    /// Returns `None` if two consecutive states are not one move apart.
    pub fn steps(&self, start: &State) -> Option<Vec<Step>> {
        let mut previous = start;
        let mut steps = Vec::with_capacity(self.states.len());
        for state in &self.states {
            steps.push(steps_between(previous, state)?);
            previous = state;
        }
        Some(steps)
    }

    /// Checks that the solution is a chain of legal moves from `start` that
    /// ends on the goal.
    pub fn is_valid(&self, geometry: &Geometry, start: &State) -> bool {
        let mut previous = start;
        for state in &self.states {
            if !geometry.neighbors(previous).contains(state) {
                return false;
            }
            previous = state;
        }
        geometry.is_goal(previous)
    }
}

/// Names the single move between two states, if they are one move apart.
pub fn steps_between(from: &State, to: &State) -> Option<Step> {
    if from.len() != to.len() {
        return None;
    }

    let mut moved = from
        .cells()
        .iter()
        .zip(to.cells())
        .enumerate()
        .filter(|(_, (a, b))| a != b);
    let (tile, (a, b)) = moved.next()?;
    if moved.next().is_some() {
        return None;
    }

    let dx = i32::from(b.x) - i32::from(a.x);
    let dy = i32::from(b.y) - i32::from(a.y);
    let direction = Direction::ALL
        .into_iter()
        .find(|direction| direction.offset() == (dx, dy))?;
    Some(Step { tile, direction })
}
