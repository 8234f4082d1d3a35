//! State-space search over board configurations.
//!
//! Four strategies share one move generator and one goal predicate:
//! - breadth-first: FIFO queue, shortest path
//! - depth-first: stack, some path, optionally biased by the heuristic
//! - iterative deepening: depth-bounded depth-first with a rising limit,
//!   shortest path
//! - A*: priority queue on `g + h`, shortest path
//!
//! Every frontier entry carries a parent id into a [`Trail`] rather than its
//! own copy of the path. Each invocation owns its visited set and frontier.
//!
//! By default the visited set is keyed on [`Geometry::canonical`], so states
//! that differ only by swapping same-shaped tiles are explored once. The
//! returned states are still the labelled states actually reached.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info, trace};

use crate::codec::State;
use crate::error::{ParseNameError, Result};
use crate::geometry::Geometry;
use crate::path::{NodeId, Solution, Trail};

/// Default ceiling for iterative deepening.
pub const DEFAULT_MAX_DEPTH: u32 = 256;

/// Expansions between progress log lines.
const PROGRESS_INTERVAL: u64 = 10_000;

/// Search strategy, chosen once per solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    BreadthFirst,
    DepthFirst,
    IterativeDeepening,
    AStar,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::BreadthFirst,
        Strategy::DepthFirst,
        Strategy::IterativeDeepening,
        Strategy::AStar,
    ];

    /// Short name used on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Strategy::BreadthFirst => "bfs",
            Strategy::DepthFirst => "dfs",
            Strategy::IterativeDeepening => "iddfs",
            Strategy::AStar => "astar",
        }
    }

    /// Whether a returned solution is guaranteed to use the fewest moves.
    pub const fn is_optimal(self) -> bool {
        !matches!(self, Strategy::DepthFirst)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = ParseNameError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseNameError {
                kind: "strategy",
                name: s.to_string(),
            })
    }
}

/// Tunables for one solve call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveConfig {
    pub strategy: Strategy,
    /// Deepest limit iterative deepening tries before giving up.
    pub max_depth: u32,
    /// Expansion budget for any strategy; `None` searches to completion.
    pub max_expansions: Option<u64>,
    /// Depth-first variants explore the neighbour with the lowest estimate
    /// first. Changes exploration order only, never correctness.
    pub heuristic_ordering: bool,
    /// Treat states that differ only by swapping same-shaped non-goal tiles
    /// as already visited. Never changes the minimal move count.
    pub merge_identical_tiles: bool,
}

impl SolveConfig {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::AStar,
            max_depth: DEFAULT_MAX_DEPTH,
            max_expansions: None,
            heuristic_ordering: true,
            merge_identical_tiles: true,
        }
    }
}

/// A configured bound that stopped the search before it could decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// Iterative deepening reached its maximum depth.
    Depth(u32),
    /// The expansion budget ran out.
    Expansions(u64),
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Depth(depth) => write!(f, "depth limit {depth}"),
            Limit::Expansions(count) => write!(f, "expansion budget {count}"),
        }
    }
}

/// Result of a solve call that was not rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Solved(Solution),
    /// The reachable state space holds no goal state.
    Unsolvable,
    /// A configured bound was hit first; solvability is unknown.
    LimitReached(Limit),
}

impl Outcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Outcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, Outcome::Solved(_))
    }

    /// Number of moves, if solved.
    pub fn move_count(&self) -> Option<usize> {
        self.solution().map(Solution::len)
    }
}

/// Diagnostic counters. They never influence the search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// States whose neighbours were generated.
    pub expanded: u64,
    /// Neighbour states produced by the move generator.
    pub generated: u64,
    /// Largest frontier size observed.
    pub peak_frontier: usize,
    /// Depth-limited attempts (iterative deepening only).
    pub iterations: u32,
    pub elapsed: Duration,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expanded {}, generated {}, peak frontier {}, {:.3}s",
            self.expanded,
            self.generated,
            self.peak_frontier,
            self.elapsed.as_secs_f64()
        )?;
        if self.iterations > 0 {
            write!(f, ", {} iterations", self.iterations)?;
        }
        Ok(())
    }
}

/// Outcome plus the counters gathered while producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub outcome: Outcome,
    pub stats: Stats,
}

/// Solves with default settings for `strategy`.
///
/// Fails only if `start` is not a legal placement on `geometry`. Iterative
/// deepening stops at [`DEFAULT_MAX_DEPTH`]; use [`solve_with`] to change it.
pub fn solve(start: &State, strategy: Strategy, geometry: &Geometry) -> Result<Outcome> {
    solve_with(start, geometry, &SolveConfig::new(strategy)).map(|report| report.outcome)
}

/// Solves `start` on `geometry` as described by `config`.
///
/// The start state is validated before any search. A start already on the
/// goal returns an empty solution without searching.
pub fn solve_with(start: &State, geometry: &Geometry, config: &SolveConfig) -> Result<Report> {
    geometry.validate(start)?;

    let started = Instant::now();
    info!(strategy = %config.strategy, tiles = start.len(), "search started");

    let mut search = Search {
        geometry,
        config,
        stats: Stats::default(),
    };
    let result = if geometry.is_goal(start) {
        Ok(Some(Solution::new(Vec::new())))
    } else {
        match config.strategy {
            Strategy::BreadthFirst => search.breadth_first(start),
            Strategy::DepthFirst => search.depth_first(start),
            Strategy::IterativeDeepening => search.iterative_deepening(start),
            Strategy::AStar => search.a_star(start),
        }
    };
    let outcome = match result {
        Ok(Some(solution)) => Outcome::Solved(solution),
        Ok(None) => Outcome::Unsolvable,
        Err(limit) => Outcome::LimitReached(limit),
    };

    let mut stats = search.stats;
    stats.elapsed = started.elapsed();
    match &outcome {
        Outcome::Solved(solution) => info!(
            strategy = %config.strategy,
            moves = solution.len(),
            expanded = stats.expanded,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "solution found"
        ),
        Outcome::Unsolvable => info!(
            strategy = %config.strategy,
            expanded = stats.expanded,
            "state space exhausted without reaching the goal"
        ),
        Outcome::LimitReached(limit) => info!(
            strategy = %config.strategy,
            expanded = stats.expanded,
            %limit,
            "search stopped at configured limit"
        ),
    }

    Ok(Report { outcome, stats })
}

/// `Ok(Some)` solved, `Ok(None)` proven unsolvable, `Err` stopped at a limit.
type SearchResult<T> = std::result::Result<T, Limit>;

/// How one depth-limited attempt ended.
enum Attempt {
    Found(Solution),
    /// Some node sat at the depth limit; a deeper attempt may succeed.
    Cutoff,
    /// Every reachable state was expanded below the limit.
    Exhausted,
}

/// A* frontier entry, ordered so that `BinaryHeap` pops the lowest `f`, then
/// the lowest `g`, then the earliest pushed.
struct OpenNode {
    f: u32,
    g: u32,
    seq: u64,
    state: State,
    parent: Option<NodeId>,
}

impl OpenNode {
    fn key(&self) -> Reverse<(u32, u32, u64)> {
        Reverse((self.f, self.g, self.seq))
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Per-invocation search context.
struct Search<'a> {
    geometry: &'a Geometry,
    config: &'a SolveConfig,
    stats: Stats,
}

impl Search<'_> {
    /// Generates the neighbours of `state`, charging one expansion.
    fn expand(&mut self, state: &State) -> SearchResult<Vec<State>> {
        if let Some(budget) = self.config.max_expansions {
            if self.stats.expanded >= budget {
                return Err(Limit::Expansions(budget));
            }
        }

        self.stats.expanded += 1;
        if self.stats.expanded % PROGRESS_INTERVAL == 0 {
            trace!(
                expanded = self.stats.expanded,
                peak_frontier = self.stats.peak_frontier,
                "search progress"
            );
        }

        let neighbors = self.geometry.neighbors(state);
        self.stats.generated += neighbors.len() as u64;
        Ok(neighbors)
    }

    /// Visited-set key for `state`.
    fn key(&self, state: &State) -> State {
        if self.config.merge_identical_tiles {
            self.geometry.canonical(state)
        } else {
            state.clone()
        }
    }

    #[inline]
    fn observe_frontier(&mut self, len: usize) {
        self.stats.peak_frontier = self.stats.peak_frontier.max(len);
    }

    /// Arranges neighbours for a stack so the preferred one is popped first.
    fn order_for_stack(&self, neighbors: &mut [State]) {
        // reversed so that, among equals, emission order is exploration order
        neighbors.reverse();
        if self.config.heuristic_ordering {
            // stable; highest estimate first means lowest estimate on top
            neighbors.sort_by_key(|state| Reverse(self.geometry.estimate(state)));
        }
    }

    fn breadth_first(&mut self, start: &State) -> SearchResult<Option<Solution>> {
        let mut trail = Trail::new();
        let mut visited: FxHashSet<State> = FxHashSet::default();
        let mut queue: VecDeque<(State, Option<NodeId>)> = VecDeque::new();

        visited.insert(self.key(start));
        queue.push_back((start.clone(), None));

        while let Some((state, parent)) = queue.pop_front() {
            if self.geometry.is_goal(&state) {
                return Ok(Some(Solution::new(trail.reconstruct(parent, state))));
            }

            let neighbors = self.expand(&state)?;
            let id = trail.push(state, parent);
            for next in neighbors {
                // marked at enqueue time so no state is queued twice
                if visited.insert(self.key(&next)) {
                    queue.push_back((next, Some(id)));
                }
            }
            self.observe_frontier(queue.len());
        }

        Ok(None)
    }

    fn depth_first(&mut self, start: &State) -> SearchResult<Option<Solution>> {
        let mut trail = Trail::new();
        let mut visited: FxHashSet<State> = FxHashSet::default();
        let mut stack: Vec<(State, Option<NodeId>)> = vec![(start.clone(), None)];

        while let Some((state, parent)) = stack.pop() {
            if !visited.insert(self.key(&state)) {
                continue;
            }

            if self.geometry.is_goal(&state) {
                return Ok(Some(Solution::new(trail.reconstruct(parent, state))));
            }

            let mut neighbors = self.expand(&state)?;
            neighbors.retain(|next| !visited.contains(&self.key(next)));
            self.order_for_stack(&mut neighbors);

            let id = trail.push(state, parent);
            stack.extend(neighbors.into_iter().map(|next| (next, Some(id))));
            self.observe_frontier(stack.len());
        }

        Ok(None)
    }

    fn iterative_deepening(&mut self, start: &State) -> SearchResult<Option<Solution>> {
        for limit in 1..=self.config.max_depth {
            self.stats.iterations += 1;
            match self.depth_limited(start, limit)? {
                Attempt::Found(solution) => return Ok(Some(solution)),
                Attempt::Exhausted => {
                    debug!(limit, "state space exhausted below depth limit");
                    return Ok(None);
                }
                Attempt::Cutoff => {
                    debug!(limit, expanded = self.stats.expanded, "depth limit reached")
                }
            }
        }

        Err(Limit::Depth(self.config.max_depth))
    }

    /// One depth-first attempt that never follows a path longer than `limit`.
    ///
    /// A state is expanded again whenever it is reached at a strictly smaller
    /// depth than before, so every state within `limit` moves is eventually
    /// expanded at its true distance and the first goal found is at the
    /// smallest depth this limit allows.
    fn depth_limited(&mut self, start: &State, limit: u32) -> SearchResult<Attempt> {
        let mut trail = Trail::new();
        let mut best_depth: FxHashMap<State, u32> = FxHashMap::default();
        let mut stack: Vec<(State, Option<NodeId>, u32)> = vec![(start.clone(), None, 0)];
        let mut cut = false;

        while let Some((state, parent, depth)) = stack.pop() {
            if self.geometry.is_goal(&state) {
                let solution = Solution::new(trail.reconstruct(parent, state));
                return Ok(Attempt::Found(solution));
            }
            let key = self.key(&state);
            if best_depth.get(&key).is_some_and(|&seen| seen <= depth) {
                continue;
            }
            if depth >= limit {
                cut = true;
                continue;
            }
            best_depth.insert(key, depth);

            let mut neighbors = self.expand(&state)?;
            neighbors.retain(|next| {
                best_depth
                    .get(&self.key(next))
                    .map_or(true, |&seen| seen > depth + 1)
            });
            self.order_for_stack(&mut neighbors);

            let id = trail.push(state, parent);
            stack.extend(neighbors.into_iter().map(|next| (next, Some(id), depth + 1)));
            self.observe_frontier(stack.len());
        }

        Ok(if cut { Attempt::Cutoff } else { Attempt::Exhausted })
    }

    fn a_star(&mut self, start: &State) -> SearchResult<Option<Solution>> {
        let mut trail = Trail::new();
        let mut closed: FxHashSet<State> = FxHashSet::default();
        let mut open = BinaryHeap::new();
        let mut seq = 0u64;

        open.push(OpenNode {
            f: self.geometry.estimate(start),
            g: 0,
            seq,
            state: start.clone(),
            parent: None,
        });

        while let Some(node) = open.pop() {
            // reached more cheaply already
            if !closed.insert(self.key(&node.state)) {
                continue;
            }

            if self.geometry.is_goal(&node.state) {
                return Ok(Some(Solution::new(trail.reconstruct(node.parent, node.state))));
            }

            let neighbors = self.expand(&node.state)?;
            let g = node.g + 1;
            let id = trail.push(node.state, node.parent);
            for next in neighbors {
                if closed.contains(&self.key(&next)) {
                    continue;
                }
                seq += 1;
                open.push(OpenNode {
                    f: g + self.geometry.estimate(&next),
                    g,
                    seq,
                    state: next,
                    parent: Some(id),
                });
            }
            self.observe_frontier(open.len());
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::geometry::Cell;

    fn state(cells: &[(u8, u8)]) -> State {
        State::new(
            cells
                .iter()
                .map(|&(x, y)| Cell::new(x, y))
                .collect::<Vec<_>>(),
        )
    }

    /// 2x2 board: goal at (0,0) must reach (1,0), where a blocker sits.
    fn blocked_corner() -> (Geometry, State) {
        let geometry = Geometry::new(200, 200, 100, &[(100, 100), (100, 100)], (100, 0)).unwrap();
        (geometry, state(&[(0, 0), (1, 0)]))
    }

    /// 3x3 board: goal at (0,0) must reach (2,2) past two single tiles.
    fn open_board() -> (Geometry, State) {
        let geometry = Geometry::new(
            300,
            300,
            100,
            &[(100, 100), (100, 100), (100, 100)],
            (200, 200),
        )
        .unwrap();
        (geometry, state(&[(0, 0), (1, 1), (2, 1)]))
    }

    #[test]
    fn test_breadth_first_returns_exact_shortest_path() {
        let (geometry, start) = blocked_corner();
        let outcome = solve(&start, Strategy::BreadthFirst, &geometry).unwrap();
        let solution = outcome.solution().unwrap();
        assert_eq!(
            solution.states(),
            &[state(&[(0, 0), (1, 1)]), state(&[(1, 0), (1, 1)])]
        );
    }

    #[test]
    fn test_a_star_matches_breadth_first_path() {
        let (geometry, start) = blocked_corner();
        let bfs = solve(&start, Strategy::BreadthFirst, &geometry).unwrap();
        let astar = solve(&start, Strategy::AStar, &geometry).unwrap();
        assert_eq!(bfs, astar);
    }

    #[test]
    fn test_optimal_strategies_agree_on_length() {
        let (geometry, start) = open_board();
        for strategy in Strategy::ALL {
            let outcome = solve(&start, strategy, &geometry).unwrap();
            let solution = outcome.solution().unwrap();
            assert!(solution.is_valid(&geometry, &start), "{strategy} path invalid");
            if strategy.is_optimal() {
                assert_eq!(solution.len(), 4, "{strategy} is not minimal");
            }
        }
    }

    #[test]
    fn test_depth_first_without_ordering_still_solves() {
        let (geometry, start) = open_board();
        let config = SolveConfig {
            heuristic_ordering: false,
            ..SolveConfig::new(Strategy::DepthFirst)
        };
        let report = solve_with(&start, &geometry, &config).unwrap();
        assert!(report
            .outcome
            .solution()
            .unwrap()
            .is_valid(&geometry, &start));
    }

    #[test]
    fn test_start_on_goal_returns_empty_solution() {
        let (geometry, _) = blocked_corner();
        let start = state(&[(1, 0), (0, 0)]);
        for strategy in Strategy::ALL {
            let report = solve_with(&start, &geometry, &SolveConfig::new(strategy)).unwrap();
            assert_eq!(report.outcome.move_count(), Some(0));
            assert_eq!(report.stats.expanded, 0);
        }
    }

    #[test]
    fn test_invalid_start_is_rejected() {
        let (geometry, _) = blocked_corner();
        let start = state(&[(0, 0), (0, 0)]);
        for strategy in Strategy::ALL {
            assert_eq!(
                solve(&start, strategy, &geometry),
                Err(Error::TilesOverlap {
                    first: 0,
                    second: 1
                })
            );
        }
    }

    #[test]
    fn test_full_board_is_unsolvable() {
        // no empty cell, so no move exists
        let geometry = Geometry::new(
            200,
            100,
            100,
            &[(100, 100), (100, 100)],
            (100, 0),
        )
        .unwrap();
        let start = state(&[(0, 0), (1, 0)]);
        for strategy in Strategy::ALL {
            assert_eq!(
                solve(&start, strategy, &geometry).unwrap(),
                Outcome::Unsolvable,
                "{strategy}"
            );
        }
    }

    #[test]
    fn test_expansion_budget_stops_every_strategy() {
        let (geometry, start) = open_board();
        for strategy in Strategy::ALL {
            let config = SolveConfig {
                max_expansions: Some(1),
                ..SolveConfig::new(strategy)
            };
            let report = solve_with(&start, &geometry, &config).unwrap();
            assert_eq!(
                report.outcome,
                Outcome::LimitReached(Limit::Expansions(1)),
                "{strategy}"
            );
            assert_eq!(report.stats.expanded, 1);
        }
    }

    #[test]
    fn test_iterative_deepening_reports_depth_ceiling() {
        let (geometry, start) = open_board();
        let config = SolveConfig {
            max_depth: 3,
            ..SolveConfig::new(Strategy::IterativeDeepening)
        };
        let report = solve_with(&start, &geometry, &config).unwrap();
        assert_eq!(report.outcome, Outcome::LimitReached(Limit::Depth(3)));
        assert_eq!(report.stats.iterations, 3);

        let config = SolveConfig {
            max_depth: 4,
            ..config
        };
        let report = solve_with(&start, &geometry, &config).unwrap();
        assert_eq!(report.outcome.move_count(), Some(4));
        assert_eq!(report.stats.iterations, 4);
    }

    #[test]
    fn test_solve_is_deterministic() {
        let (geometry, start) = open_board();
        for strategy in Strategy::ALL {
            let first = solve_with(&start, &geometry, &SolveConfig::new(strategy)).unwrap();
            let second = solve_with(&start, &geometry, &SolveConfig::new(strategy)).unwrap();
            assert_eq!(first.outcome, second.outcome, "{strategy}");
            assert_eq!(first.stats.expanded, second.stats.expanded, "{strategy}");
        }
    }

    #[test]
    fn test_merging_identical_tiles_keeps_minimal_length() {
        let (geometry, start) = open_board();
        for strategy in Strategy::ALL {
            let merged = solve_with(&start, &geometry, &SolveConfig::new(strategy)).unwrap();
            let distinct = solve_with(
                &start,
                &geometry,
                &SolveConfig {
                    merge_identical_tiles: false,
                    ..SolveConfig::new(strategy)
                },
            )
            .unwrap();

            let solution = merged.outcome.solution().unwrap();
            assert!(solution.is_valid(&geometry, &start), "{strategy}");
            if strategy.is_optimal() {
                assert_eq!(
                    merged.outcome.move_count(),
                    distinct.outcome.move_count(),
                    "{strategy}"
                );
            }
        }

        // tiles 1 and 2 can swap places, so fewer states need expanding
        let bfs = |merge_identical_tiles| {
            let config = SolveConfig {
                merge_identical_tiles,
                ..SolveConfig::new(Strategy::BreadthFirst)
            };
            solve_with(&start, &geometry, &config).unwrap().stats.expanded
        };
        assert!(bfs(true) < bfs(false));
    }

    #[test]
    fn test_open_node_pops_lowest_f_then_g_then_seq() {
        let node = |f, g, seq| OpenNode {
            f,
            g,
            seq,
            state: state(&[(0, 0)]),
            parent: None,
        };
        let mut heap = BinaryHeap::new();
        heap.push(node(5, 1, 0));
        heap.push(node(4, 3, 1));
        heap.push(node(4, 2, 3));
        heap.push(node(4, 2, 2));

        let order: Vec<(u32, u32, u64)> = std::iter::from_fn(|| heap.pop())
            .map(|n| (n.f, n.g, n.seq))
            .collect();
        assert_eq!(order, vec![(4, 2, 2), (4, 2, 3), (4, 3, 1), (5, 1, 0)]);
    }

    #[test]
    fn test_strategy_names_round_trip() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.name().parse::<Strategy>(), Ok(strategy));
        }
        assert_eq!("AStar".parse::<Strategy>(), Ok(Strategy::AStar));
        assert_eq!(
            "greedy".parse::<Strategy>().unwrap_err().to_string(),
            "Unknown strategy `greedy`"
        );
    }
}
