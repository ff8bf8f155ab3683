use maze::{render, Algorithm, Point, SolveReport};
use serde::Serialize;

/// How a report came to be
#[derive(Debug, Clone)]
pub struct Summary {
    /// `None` when the maze was loaded instead of generated
    pub density: Option<f64>,
    pub seed: Option<u64>,
    pub algorithm: Algorithm,
    pub ensure_solvable: bool,
    pub max_attempts: usize,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    rows: usize,
    columns: usize,
    start: Point,
    end: Point,
    density: Option<f64>,
    seed: Option<u64>,
    algorithm: Algorithm,
    attempts: usize,
    solved: bool,
    steps: Option<usize>,
    path: Option<&'a [Point]>,
    visited: usize,
    elapsed_ms: f64,
    layout: String,
}

fn elapsed_ms(report: &SolveReport) -> f64 {
    report.elapsed.as_secs_f64() * 1000.0
}

pub fn to_json(summary: &Summary, report: &SolveReport) -> serde_json::Result<String> {
    let grid = &report.grid;
    serde_json::to_string_pretty(&JsonReport {
        rows: grid.rows(),
        columns: grid.columns(),
        start: grid.start(),
        end: grid.goal(),
        density: summary.density,
        seed: summary.seed,
        algorithm: summary.algorithm,
        attempts: report.attempts,
        solved: report.solved(),
        steps: report.path.as_ref().map(|p| p.steps()),
        path: report.path.as_ref().map(|p| p.path.as_slice()),
        visited: report.visited.len(),
        elapsed_ms: elapsed_ms(report),
        layout: grid.to_layout_string(),
    })
}

pub fn to_text(summary: &Summary, report: &SolveReport, show_visited: bool) -> String {
    let grid = &report.grid;

    let mut title = format!("\nGenerated Maze ({}x{})", grid.rows(), grid.columns());
    if let Some(density) = summary.density {
        title.push_str(&format!("  density={:.2}", density));
    }
    if let Some(seed) = summary.seed {
        title.push_str(&format!("  seed={}", seed));
    }

    let mut lines = vec![
        title,
        format!(
            "Start={}  End={}  Algo={}  Attempt={}",
            grid.start(),
            grid.goal(),
            summary.algorithm.to_string().to_uppercase(),
            report.attempts
        ),
        format!("Visited: {} nodes", report.visited.len()),
    ];

    match &report.path {
        Some(path) => lines.push(format!("Path len: {} steps", path.steps())),
        None => {
            lines.push("Path: none (no path found)".to_string());
            if summary.ensure_solvable {
                lines.push(format!(
                    "No solvable maze found in {} attempts",
                    summary.max_attempts
                ));
            }
        }
    }

    let overlay = show_visited.then_some(&report.visited);
    let path = report.path.as_ref().map(|p| p.path.as_slice());
    lines.push(format!("\n{}", render(grid, path, overlay)));
    lines.push(format!("\nTime: {:.2} ms", elapsed_ms(report)));

    lines.join("\n")
}
