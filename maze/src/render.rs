use std::collections::HashSet;

use crate::grid::{join_rows, GridMap, Point};

pub const PATH_MARK: char = '*';
pub const VISITED_MARK: char = '·';

/// Draws `grid` with the search results on top.
///
/// Open cells in `visited` become `·`, path cells become `*`, and the start
/// and end keep their `S` and `E`. Walls are never overwritten.
pub fn render(grid: &GridMap, path: Option<&[Point]>, visited: Option<&HashSet<Point>>) -> String {
    let mut symbols = grid.symbols();

    for point in visited.into_iter().flatten() {
        if grid.is_open(*point) && symbols[point.row][point.col] == '.' {
            symbols[point.row][point.col] = VISITED_MARK;
        }
    }

    for point in path.into_iter().flatten() {
        if grid.is_open(*point) && !matches!(symbols[point.row][point.col], 'S' | 'E') {
            symbols[point.row][point.col] = PATH_MARK;
        }
    }

    join_rows(&symbols)
}
