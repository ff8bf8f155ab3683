use std::{
    collections::HashSet,
    fmt::Display,
    str::FromStr,
    time::{Duration, Instant},
};

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{MazeError, Violation};
use crate::find::{
    BreadthFirst, DepthFirst, MapTrait, PathFinderState, PathResult, Search, Visited,
};
use crate::generate::MazeParams;
use crate::grid::{GridMap, Point};

/// Upper bound on generate-and-search cycles when a solvable maze is requested
pub const DEFAULT_MAX_ATTEMPTS: usize = 200;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Bfs,
    Dfs,
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Algorithm::Bfs => "bfs",
                Algorithm::Dfs => "dfs",
            }
        )
    }
}

impl FromStr for Algorithm {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" => Ok(Algorithm::Bfs),
            "dfs" => Ok(Algorithm::Dfs),
            _ => Err(MazeError::UnknownAlgorithm(s.to_string())),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveOptions {
    pub algorithm: Algorithm,
    /// Regenerate until a path exists or `max_attempts` is reached
    pub ensure_solvable: bool,
    pub max_attempts: usize,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            ensure_solvable: false,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// What a single search produced
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub path: Option<PathResult<Point>>,
    pub visited: HashSet<Point>,
}

/// Runs the chosen strategy on `map` from its start to its goal
pub fn search(map: &GridMap, algorithm: Algorithm) -> SearchOutcome {
    let storage = map.create_storage::<Visited<Point>>();
    let mut finder: Box<dyn Search<GridMap>> = match algorithm {
        Algorithm::Bfs => Box::new(BreadthFirst::<_, _, GridMap>::new(
            map.start(),
            map.goal(),
            storage,
        )),
        Algorithm::Dfs => Box::new(DepthFirst::<_, _, GridMap>::new(
            map.start(),
            map.goal(),
            storage,
        )),
    };

    let state = loop {
        match finder.step(map) {
            PathFinderState::Computing => {}
            s => break s,
        }
    };

    SearchOutcome {
        path: state.into_path(),
        visited: finder.visited().iter().copied().collect(),
    }
}

/// One generate-then-search cycle
#[derive(Debug, Clone)]
struct Attempt {
    number: usize,
    grid: GridMap,
    outcome: SearchOutcome,
    elapsed: Duration,
}

impl Attempt {
    fn run(number: usize, grid: GridMap, algorithm: Algorithm) -> Self {
        let started = Instant::now();
        let outcome = search(&grid, algorithm);
        let elapsed = started.elapsed();

        debug!(
            "attempt {}: {} visited {} cells, {}",
            number,
            algorithm,
            outcome.visited.len(),
            match &outcome.path {
                Some(path) => format!("path of {} steps", path.steps()),
                None => "no path".to_string(),
            }
        );

        Self {
            number,
            grid,
            outcome,
            elapsed,
        }
    }

    fn into_report(self) -> SolveReport {
        SolveReport {
            grid: self.grid,
            path: self.outcome.path,
            visited: self.outcome.visited,
            attempts: self.number,
            elapsed: self.elapsed,
        }
    }
}

/// The surviving attempt of a solve run
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub grid: GridMap,
    pub path: Option<PathResult<Point>>,
    pub visited: HashSet<Point>,
    /// Number of generate-and-search cycles that were run
    pub attempts: usize,
    /// Time spent in the final search
    pub elapsed: Duration,
}

impl SolveReport {
    pub fn solved(&self) -> bool {
        self.path.is_some()
    }
}

/// Generates mazes from `rng` and searches them.
///
/// Without `ensure_solvable` exactly one cycle runs. Otherwise cycles repeat,
/// each drawing fresh cells from the same `rng`, until a path is found or
/// `max_attempts` cycles have run. Running out of attempts is not an error, the
/// last attempt is reported as is. `max_attempts` is only checked when
/// `ensure_solvable` is set.
pub fn solve<R: Rng>(
    params: &MazeParams,
    options: &SolveOptions,
    rng: &mut R,
) -> Result<SolveReport, MazeError> {
    params.validate()?;
    if options.ensure_solvable && options.max_attempts == 0 {
        return Err(MazeError::InvalidParameters(Violation::NoAttempts));
    }

    let mut number = 0;
    let last = loop {
        number += 1;
        let attempt = Attempt::run(number, params.generate(rng)?, options.algorithm);

        if attempt.outcome.path.is_some()
            || !options.ensure_solvable
            || number >= options.max_attempts
        {
            break attempt;
        }
    };

    let report = last.into_report();
    info!(
        "{} after {} attempt(s): {}",
        options.algorithm,
        report.attempts,
        if report.solved() { "solved" } else { "unsolved" }
    );
    Ok(report)
}

/// Searches an existing maze once
pub fn solve_layout(grid: GridMap, algorithm: Algorithm) -> SolveReport {
    Attempt::run(1, grid, algorithm).into_report()
}
