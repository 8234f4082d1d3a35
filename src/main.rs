//! Klotski Solver
//!
//! Loads a sliding-block layout, optionally scrambles it, and searches for a
//! sequence of single-tile moves that brings the goal tile to its target. The
//! binary plays the part of the display: it owns the live tiles, hands a
//! snapshot to the solver, and replays the answer onto its tiles.

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use klotski::{
    decode, encode, grid, layouts, scramble, solve_with, Geometry, Layout, Outcome,
    ParseNameError, Report, SolveConfig, State, Strategy, Tile, DEFAULT_MAX_DEPTH,
};

/// Solves Klotski-style sliding-block puzzles.
#[derive(Parser)]
#[command(name = "klotski")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace). RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a layout with one strategy and print the moves.
    Solve(SolveArgs),
    /// Run every strategy on the same layout and compare them.
    Compare(CompareArgs),
    /// Print a layout without solving it.
    Show(PuzzleArgs),
}

#[derive(Args, Clone)]
struct PuzzleArgs {
    /// Built-in layout: classic, standard, open, narrow, boxed, or single.
    #[arg(short, long, default_value = "classic", value_parser = parse_layout)]
    layout: &'static Layout,

    /// Apply this many random moves to the layout first.
    #[arg(long, default_value_t = 0)]
    scramble: usize,

    /// Seed for --scramble.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Args, Clone)]
struct SearchArgs {
    /// Deepest limit iterative deepening tries before giving up.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: u32,

    /// Stop any strategy after expanding this many states.
    #[arg(long)]
    max_expansions: Option<u64>,

    /// Explore depth-first neighbours in generation order, not by estimate.
    #[arg(long)]
    no_ordering: bool,

    /// Tell same-shaped tiles apart when deduplicating states. Much slower on
    /// layouts with many identical tiles.
    #[arg(long)]
    distinct_tiles: bool,
}

impl SearchArgs {
    fn config(&self, strategy: Strategy) -> SolveConfig {
        SolveConfig {
            strategy,
            max_depth: self.max_depth,
            max_expansions: self.max_expansions,
            heuristic_ordering: !self.no_ordering,
            merge_identical_tiles: !self.distinct_tiles,
        }
    }
}

#[derive(Args, Clone)]
struct SolveArgs {
    #[command(flatten)]
    puzzle: PuzzleArgs,

    #[command(flatten)]
    search: SearchArgs,

    /// Search strategy: bfs, dfs, iddfs, or astar.
    #[arg(short, long, default_value = "astar")]
    strategy: Strategy,

    /// Print the board after every move.
    #[arg(long)]
    frames: bool,
}

impl Default for SolveArgs {
    fn default() -> Self {
        Self {
            puzzle: PuzzleArgs {
                layout: &layouts::CLASSIC,
                scramble: 0,
                seed: 0,
            },
            search: SearchArgs {
                max_depth: DEFAULT_MAX_DEPTH,
                max_expansions: None,
                no_ordering: false,
                distinct_tiles: false,
            },
            strategy: Strategy::AStar,
            frames: false,
        }
    }
}

#[derive(Args, Clone)]
struct CompareArgs {
    #[command(flatten)]
    puzzle: PuzzleArgs,

    #[command(flatten)]
    search: SearchArgs,
}

fn parse_layout(name: &str) -> Result<&'static Layout, ParseNameError> {
    layouts::by_name(name)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Some(Command::Solve(args)) => run_solve(&args),
        Some(Command::Compare(args)) => run_compare(&args),
        Some(Command::Show(args)) => run_show(&args),
        // default: solve the classic layout with A*
        None => run_solve(&SolveArgs::default()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Installs a stderr subscriber; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// The board as the display holds it, plus the snapshot handed to the solver.
struct Loaded {
    geometry: Geometry,
    tiles: Vec<Tile>,
    start: State,
}

/// Builds the live tiles for a layout, scrambles them if asked, and captures
/// the solver's start state from them.
fn load(args: &PuzzleArgs) -> klotski::Result<Loaded> {
    let (geometry, initial) = args.layout.start()?;
    let mut tiles = args.layout.tiles();

    if args.scramble > 0 {
        let mut rng = StdRng::seed_from_u64(args.seed);
        let scrambled = scramble(&geometry, &initial, args.scramble, &mut rng);
        decode(&geometry, &scrambled, &mut tiles);
    }

    let start = encode(&geometry, &tiles)?;
    Ok(Loaded {
        geometry,
        tiles,
        start,
    })
}

fn print_header(args: &PuzzleArgs, loaded: &Loaded) {
    if args.scramble > 0 {
        println!(
            "Layout {} scrambled by {} moves (seed {}):",
            args.layout.name, args.scramble, args.seed
        );
    } else {
        println!("Layout {}:", args.layout.name);
    }
    print!("{}", grid::format_board(&loaded.geometry, &loaded.tiles));
}

/// Solves with one strategy and replays the answer onto the live tiles.
fn run_solve(args: &SolveArgs) -> klotski::Result<()> {
    let mut loaded = load(&args.puzzle)?;
    print_header(&args.puzzle, &loaded);

    let config = args.search.config(args.strategy);
    let report = solve_with(&loaded.start, &loaded.geometry, &config)?;

    match &report.outcome {
        Outcome::Solved(solution) => {
            println!("Solution found by {}!", args.strategy);
            if let Some(steps) = solution.steps(&loaded.start) {
                for (i, step) in steps.iter().enumerate() {
                    println!("{:>5}. {}", i + 1, step);
                }
            }
            if args.frames {
                for state in solution.states() {
                    decode(&loaded.geometry, state, &mut loaded.tiles);
                    println!();
                    print!("{}", grid::format_board(&loaded.geometry, &loaded.tiles));
                }
            }
            println!("Move count: {}", solution.len());
        }
        Outcome::Unsolvable => println!("No solution exists for this layout."),
        Outcome::LimitReached(limit) => println!("No solution found within the {limit}."),
    }
    println!("Stats: {}", report.stats);

    Ok(())
}

/// Runs every strategy on the same start and prints one row each.
fn run_compare(args: &CompareArgs) -> klotski::Result<()> {
    let loaded = load(&args.puzzle)?;
    print_header(&args.puzzle, &loaded);

    println!(
        "{:<6} {:>12} {:>12} {:>12} {:>10}",
        "", "result", "expanded", "peak", "seconds"
    );
    let mut optimal: Option<usize> = None;
    for strategy in Strategy::ALL {
        let report = solve_with(&loaded.start, &loaded.geometry, &args.search.config(strategy))?;
        println!("{}", format_row(strategy, &report));

        if !strategy.is_optimal() {
            continue;
        }
        if let Some(moves) = report.outcome.move_count() {
            match optimal {
                Some(best) if best != moves => {
                    warn!(%strategy, moves, best, "optimal strategies disagree on length")
                }
                _ => optimal = Some(moves),
            }
        }
    }

    Ok(())
}

fn format_row(strategy: Strategy, report: &Report) -> String {
    let result = match &report.outcome {
        Outcome::Solved(solution) => format!("{} moves", solution.len()),
        Outcome::Unsolvable => "unsolvable".to_string(),
        Outcome::LimitReached(_) => "limit".to_string(),
    };
    format!(
        "{:<6} {:>12} {:>12} {:>12} {:>10.3}",
        strategy.name(),
        result,
        report.stats.expanded,
        report.stats.peak_frontier,
        report.stats.elapsed.as_secs_f64()
    )
}

/// Prints the layout and its starting estimate.
fn run_show(args: &PuzzleArgs) -> klotski::Result<()> {
    let loaded = load(args)?;
    print_header(args, &loaded);
    let target = loaded.geometry.target();
    println!(
        "{} tiles, goal tile 0 to cell ({}, {}), at least {} moves",
        loaded.geometry.tile_count(),
        target.x,
        target.y,
        loaded.geometry.estimate(&loaded.start)
    );
    Ok(())
}
