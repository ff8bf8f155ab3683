use log::trace;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{MazeError, Violation};
use crate::grid::{check_shape, Cell, GridMap, Point};

/// Everything needed to draw a random maze
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MazeParams {
    pub rows: usize,
    pub columns: usize,
    pub start: Point,
    pub goal: Point,
    /// Probability that a cell becomes a wall, in `[0.0, 1.0)`
    pub density: f64,
}

impl MazeParams {
    pub fn new(rows: usize, columns: usize, start: Point, goal: Point, density: f64) -> Self {
        Self {
            rows,
            columns,
            start,
            goal,
            density,
        }
    }

    pub fn validate(&self) -> Result<(), MazeError> {
        check_shape(self.rows, self.columns, self.start, self.goal)
            .map_err(MazeError::InvalidParameters)?;

        // NaN is not contained in any range
        if !(0.0..1.0).contains(&self.density) {
            return Err(MazeError::InvalidParameters(Violation::Density(
                self.density,
            )));
        }

        Ok(())
    }

    /// Draws a new maze from `rng`.
    ///
    /// Exactly one `f64` is drawn per cell in row-major order, and a cell
    /// becomes a wall when its draw is below `density`. The endpoints are
    /// opened afterwards, so the same seed always produces the same maze.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<GridMap, MazeError> {
        self.validate()?;

        let mut cells = Vec::with_capacity(self.rows);
        for _ in 0..self.rows {
            let mut row = Vec::with_capacity(self.columns);
            for _ in 0..self.columns {
                row.push(if rng.random::<f64>() < self.density {
                    Cell::Wall
                } else {
                    Cell::Open
                });
            }
            cells.push(row);
        }

        let map = GridMap::new(cells, self.start, self.goal)?;
        trace!(
            "generated {}x{} maze with {} walls",
            self.rows,
            self.columns,
            map.wall_count()
        );
        Ok(map)
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn params(density: f64) -> MazeParams {
        MazeParams::new(8, 12, Point::new(0, 0), Point::new(7, 11), density)
    }

    #[test]
    fn test_same_seed_same_maze() {
        let a = params(0.4).generate(&mut StdRng::seed_from_u64(7)).unwrap();
        let b = params(0.4).generate(&mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_one_draw_per_cell() {
        let p = params(0.4);
        let mut rng = StdRng::seed_from_u64(11);
        p.generate(&mut rng).unwrap();
        let after_generate: u64 = rng.random();

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..p.rows * p.columns {
            let _: f64 = rng.random();
        }
        let after_draws: u64 = rng.random();

        assert_eq!(after_generate, after_draws);
    }

    #[test]
    fn test_endpoints_always_open() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let map = params(0.99).generate(&mut rng).unwrap();
            assert!(map.is_open(map.start()));
            assert!(map.is_open(map.goal()));
        }
    }

    #[test]
    fn test_zero_density_has_no_walls() {
        let map = params(0.0).generate(&mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(map.wall_count(), 0);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let mut rng = StdRng::seed_from_u64(0);

        for density in [1.0, -0.1, f64::NAN, 2.5] {
            assert!(matches!(
                params(density).generate(&mut rng),
                Err(MazeError::InvalidParameters(Violation::Density(_)))
            ));
        }

        let mut p = params(0.2);
        p.rows = 1;
        assert!(matches!(
            p.generate(&mut rng),
            Err(MazeError::InvalidParameters(Violation::TooSmall { .. }))
        ));

        let mut p = params(0.2);
        p.goal = p.start;
        assert!(matches!(
            p.validate(),
            Err(MazeError::InvalidParameters(Violation::SameEndpoints(_)))
        ));

        let mut p = params(0.2);
        p.start = Point::new(8, 0);
        assert!(matches!(
            p.validate(),
            Err(MazeError::InvalidParameters(Violation::StartOutOfBounds(_)))
        ));
    }
}
