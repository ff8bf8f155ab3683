use thiserror::Error;

use crate::grid::Point;

/// The concrete rule a layout or a parameter bundle broke
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("grid must be at least 2x2, got {rows}x{columns}")]
    TooSmall { rows: usize, columns: usize },
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("start {0} is out of bounds")]
    StartOutOfBounds(Point),
    #[error("end {0} is out of bounds")]
    GoalOutOfBounds(Point),
    #[error("start and end cannot be the same cell {0}")]
    SameEndpoints(Point),
    #[error("density must be in [0.0, 1.0), got {0}")]
    Density(f64),
    #[error("at least one attempt is required")]
    NoAttempts,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MazeError {
    #[error("invalid layout: {0}")]
    InvalidLayout(Violation),
    #[error("invalid parameters: {0}")]
    InvalidParameters(Violation),
    #[error("parse error at line {line}, column {column}: {reason}")]
    Parse {
        line: usize,
        column: usize,
        reason: String,
    },
    #[error("layout has no '{0}' marker")]
    MissingMarker(char),
    #[error("expected coordinates as 'row,col', got '{0}'")]
    BadPoint(String),
    #[error("unknown algorithm '{0}', expected bfs or dfs")]
    UnknownAlgorithm(String),
}

impl MazeError {
    pub(crate) fn parse(line: usize, column: usize, reason: impl Into<String>) -> Self {
        MazeError::Parse {
            line,
            column,
            reason: reason.into(),
        }
    }
}
