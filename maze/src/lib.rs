//! Random grid mazes, breadth-first and depth-first path search, and a retry
//! loop that regenerates until a maze can be solved.

pub mod error;
pub mod find;
pub mod generate;
pub mod grid;
pub mod render;
pub mod solve;

pub use error::{MazeError, Violation};
pub use find::{
    BreadthFirst, DepthFirst, MapStorage, MapTrait, NodeReference, PathFinderState, PathResult,
    Search, Visited, VisitedItem,
};
pub use generate::MazeParams;
pub use grid::{Cell, CellStorage, GridMap, Point};
pub use render::render;
pub use solve::{
    search, solve, solve_layout, Algorithm, SearchOutcome, SolveOptions, SolveReport,
    DEFAULT_MAX_ATTEMPTS,
};
