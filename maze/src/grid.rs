use crate::error::{MazeError, Violation};
use crate::find::{MapStorage, MapTrait, NodeReference};
use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// The traversability of a single grid location
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Open,
    Wall,
}

impl Cell {
    pub fn is_open(self) -> bool {
        self == Cell::Open
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Open => '.',
            Cell::Wall => '#',
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A 0-indexed (row, column) coordinate
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// True if the two points share an edge
    pub fn is_adjacent(&self, other: &Point) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl NodeReference for Point {}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl FromStr for Point {
    type Err = MazeError;

    /// Parses `row,col`, e.g. `1,2`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || MazeError::BadPoint(s.to_string());

        let (row, col) = s.split_once(',').ok_or_else(bad)?;
        let row = row.trim().parse().map_err(|_| bad())?;
        let col = col.trim().parse().map_err(|_| bad())?;

        Ok(Point { row, col })
    }
}

/// Checks the rules every maze has to satisfy, in the order they are reported
pub(crate) fn check_shape(
    rows: usize,
    columns: usize,
    start: Point,
    goal: Point,
) -> Result<(), Violation> {
    if rows < 2 || columns < 2 {
        return Err(Violation::TooSmall { rows, columns });
    }
    if start.row >= rows || start.col >= columns {
        return Err(Violation::StartOutOfBounds(start));
    }
    if goal.row >= rows || goal.col >= columns {
        return Err(Violation::GoalOutOfBounds(goal));
    }
    if start == goal {
        return Err(Violation::SameEndpoints(start));
    }
    Ok(())
}

/// A rectangular maze with a start and a goal.
///
/// The cells at `start` and `goal` are always open. There are no mutating
/// methods, a `GridMap` stays as it was built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGridMap")]
pub struct GridMap {
    rows: usize,
    columns: usize,
    cells: Vec<Vec<Cell>>,
    start: Point,
    goal: Point,
}

#[derive(Deserialize)]
struct RawGridMap {
    cells: Vec<Vec<Cell>>,
    start: Point,
    goal: Point,
}

impl TryFrom<RawGridMap> for GridMap {
    type Error = MazeError;

    fn try_from(raw: RawGridMap) -> Result<Self, Self::Error> {
        GridMap::new(raw.cells, raw.start, raw.goal)
    }
}

impl GridMap {
    /// Builds a maze from rows of cells. The endpoints are opened regardless of
    /// what `cells` holds for them.
    pub fn new(mut cells: Vec<Vec<Cell>>, start: Point, goal: Point) -> Result<Self, MazeError> {
        let rows = cells.len();
        let columns = cells.first().map_or(0, Vec::len);

        if let Some((row, found)) = cells
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != columns)
        {
            return Err(MazeError::InvalidLayout(Violation::Ragged {
                row,
                expected: columns,
                found,
            }));
        }

        check_shape(rows, columns, start, goal).map_err(MazeError::InvalidLayout)?;

        cells[start.row][start.col] = Cell::Open;
        cells[goal.row][goal.col] = Cell::Open;

        Ok(Self {
            rows,
            columns,
            cells,
            start,
            goal,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn goal(&self) -> Point {
        self.goal
    }

    /// The cell at `point`, or `None` outside the grid
    pub fn cell(&self, point: Point) -> Option<Cell> {
        self.cells.get(point.row)?.get(point.col).copied()
    }

    pub fn is_open(&self, point: Point) -> bool {
        self.cell(point).is_some_and(Cell::is_open)
    }

    pub fn wall_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| **cell == Cell::Wall)
            .count()
    }

    /// The symbol of every location in row-major order: the cell symbol,
    /// except `S` at the start and `E` at the goal.
    pub(crate) fn symbols(&self) -> Vec<Vec<char>> {
        let mut symbols: Vec<Vec<char>> = self
            .cells
            .iter()
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect();
        symbols[self.start.row][self.start.col] = 'S';
        symbols[self.goal.row][self.goal.col] = 'E';
        symbols
    }

    /// The plain-text layout: `#` wall, `.` open, `S` start, `E` end, one
    /// line per row without a trailing newline.
    pub fn to_layout_string(&self) -> String {
        join_rows(&self.symbols())
    }
}

pub(crate) fn join_rows(symbols: &[Vec<char>]) -> String {
    symbols
        .iter()
        .map(|row| row.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

impl Display for GridMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_layout_string())
    }
}

impl FromStr for GridMap {
    type Err = MazeError;

    /// Reads the layout written by [`GridMap::to_layout_string`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = Vec::new();
        let mut start = None;
        let mut goal = None;

        for (row, line) in s.lines().enumerate() {
            let mut cells_row = Vec::with_capacity(line.len());
            for (col, c) in line.chars().enumerate() {
                let point = Point { row, col };
                let marker = |slot: &mut Option<Point>| {
                    if slot.replace(point).is_some() {
                        Err(MazeError::parse(
                            row + 1,
                            col + 1,
                            format!("duplicate '{}' marker", c),
                        ))
                    } else {
                        Ok(Cell::Open)
                    }
                };
                cells_row.push(match c {
                    '#' => Cell::Wall,
                    '.' => Cell::Open,
                    'S' => marker(&mut start)?,
                    'E' => marker(&mut goal)?,
                    _ => {
                        return Err(MazeError::parse(
                            row + 1,
                            col + 1,
                            format!("unexpected character '{}'", c),
                        ))
                    }
                });
            }
            cells.push(cells_row);
        }

        let start = start.ok_or(MazeError::MissingMarker('S'))?;
        let goal = goal.ok_or(MazeError::MissingMarker('E'))?;

        GridMap::new(cells, start, goal)
    }
}

/// A MapStorage that keeps one value per grid cell in a single row-major vec
#[derive(Debug)]
pub struct CellStorage<T> {
    columns: usize,
    values: Vec<T>,
}

impl<T: Copy + 'static> MapStorage<T> for CellStorage<T> {
    type Reference = Point;

    fn is_valid(&self, node: Self::Reference) -> bool {
        node.col < self.columns && node.row * self.columns + node.col < self.values.len()
    }

    fn get(&self, node: Self::Reference) -> T {
        self.values[node.row * self.columns + node.col]
    }

    fn get_mut(&mut self, node: Self::Reference) -> &mut T {
        &mut self.values[node.row * self.columns + node.col]
    }
}

impl MapTrait for GridMap {
    type Reference = Point;
    type Storage<T: Default + Copy + Clone + 'static> = CellStorage<T>;

    fn is_valid(&self, node: Self::Reference) -> bool {
        node.row < self.rows && node.col < self.columns
    }

    /// Open neighbors in the order down, up, right, left
    fn neighbors_of(&self, node: Self::Reference) -> impl Iterator<Item = Self::Reference> {
        let mut points = Vec::with_capacity(4);

        if node.row < self.rows - 1 {
            points.push(Point {
                row: node.row + 1,
                col: node.col,
            });
        }
        if node.row > 0 {
            points.push(Point {
                row: node.row - 1,
                col: node.col,
            });
        }
        if node.col < self.columns - 1 {
            points.push(Point {
                row: node.row,
                col: node.col + 1,
            });
        }
        if node.col > 0 {
            points.push(Point {
                row: node.row,
                col: node.col - 1,
            });
        }

        // filter to only keep open cells
        points.retain(|p| self.cells[p.row][p.col] == Cell::Open);

        points.into_iter()
    }

    fn create_storage<T: Default + Copy + Clone + 'static>(&self) -> Self::Storage<T> {
        CellStorage {
            columns: self.columns,
            values: vec![Default::default(); self.rows * self.columns],
        }
    }
}
