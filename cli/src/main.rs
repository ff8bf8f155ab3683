use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;
use log::{debug, info};
use maze::{
    solve, solve_layout, Algorithm, GridMap, MazeParams, Point, SolveOptions, SolveReport,
    DEFAULT_MAX_ATTEMPTS,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::prompt::Prompter;
use crate::report::Summary;

mod prompt;
mod report;

/// Generate a random grid maze and search it with BFS or DFS
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of rows (at least 2)
    #[arg(long, default_value_t = 10)]
    rows: usize,

    /// Number of columns (at least 2)
    #[arg(long, default_value_t = 10)]
    cols: usize,

    /// Start cell as row,col
    #[arg(long, default_value = "0,0")]
    start: Point,

    /// End cell as row,col [default: bottom-right corner]
    #[arg(long)]
    end: Option<Point>,

    /// Probability that a cell becomes a wall, in [0.0, 1.0)
    #[arg(long, default_value_t = 0.3)]
    density: f64,

    /// Search algorithm: bfs or dfs
    #[arg(long, default_value_t = Algorithm::Bfs)]
    algorithm: Algorithm,

    /// Regenerate the maze until it can be solved
    #[arg(long)]
    ensure_solvable: bool,

    /// Maximum number of mazes to try with --ensure-solvable
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: usize,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Mark visited cells in the output
    #[arg(long)]
    show_visited: bool,

    /// Write the generated layout to a text file
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Solve a layout saved with --export instead of generating one
    #[arg(
        long,
        value_name = "PATH",
        conflicts_with_all = ["interactive", "ensure_solvable", "seed"]
    )]
    load: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Ask for every parameter on the terminal
    #[arg(short, long)]
    interactive: bool,
}

/// A fully chosen set of run parameters
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Run {
    pub params: MazeParams,
    pub options: SolveOptions,
    pub seed: Option<u64>,
    pub show_visited: bool,
}

impl Args {
    fn to_run(&self) -> Run {
        let end = self.end.unwrap_or(Point {
            row: self.rows.saturating_sub(1),
            col: self.cols.saturating_sub(1),
        });

        Run {
            params: MazeParams::new(self.rows, self.cols, self.start, end, self.density),
            options: SolveOptions {
                algorithm: self.algorithm,
                ensure_solvable: self.ensure_solvable,
                max_attempts: self.max_attempts,
            },
            seed: self.seed,
            show_visited: self.show_visited,
        }
    }
}

fn export_layout(path: &Path, grid: &GridMap) -> anyhow::Result<()> {
    fs::write(path, grid.to_layout_string())
        .with_context(|| format!("failed to write maze to {}", path.display()))?;
    info!("saved maze to {}", path.display());
    Ok(())
}

fn load_layout(path: &Path) -> anyhow::Result<GridMap> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read maze from {}", path.display()))?;
    let grid = text
        .parse::<GridMap>()
        .with_context(|| format!("failed to parse maze in {}", path.display()))?;
    Ok(grid)
}

fn print_report(
    summary: &Summary,
    report: &SolveReport,
    show_visited: bool,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        println!("{}", report::to_json(summary, report)?);
    } else {
        println!("{}", report::to_text(summary, report, show_visited));
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    debug!("{:?}", args);

    if let Some(path) = &args.load {
        let grid = load_layout(path)?;
        let report = solve_layout(grid, args.algorithm);
        let summary = Summary {
            density: None,
            seed: None,
            algorithm: args.algorithm,
            ensure_solvable: false,
            max_attempts: 1,
        };
        print_report(&summary, &report, args.show_visited, args.json)?;
        if let Some(path) = &args.export {
            export_layout(path, &report.grid)?;
        }
        return Ok(());
    }

    let mut prompter = args
        .interactive
        .then(|| Prompter::new(io::stdin().lock(), io::stdout()));

    let run = match prompter.as_mut() {
        Some(prompter) => {
            println!("=== Interactive Maze Solver ===");
            prompter.ask_run()?
        }
        None => args.to_run(),
    };

    let seed = run.seed.unwrap_or_else(|| rand::rng().random());
    debug!("using seed {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let report = solve(&run.params, &run.options, &mut rng)?;

    let summary = Summary {
        density: Some(run.params.density),
        seed: Some(seed),
        algorithm: run.options.algorithm,
        ensure_solvable: run.options.ensure_solvable,
        max_attempts: run.options.max_attempts,
    };
    print_report(&summary, &report, run.show_visited, args.json)?;

    let export = match prompter.as_mut() {
        Some(prompter) => prompter.ask_path(
            "\nExport this maze layout to a file? Enter path or press Enter to skip: ",
        )?,
        None => args.export.clone(),
    };
    if let Some(path) = export {
        export_layout(&path, &report.grid)?;
        if args.interactive {
            println!("Saved maze to: {}", path.display());
        }
    }

    Ok(())
}
