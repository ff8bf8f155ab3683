use std::{
    fmt::Display,
    io::{BufRead, Write},
    path::PathBuf,
};

use anyhow::bail;
use maze::{Algorithm, MazeParams, Point, SolveOptions, DEFAULT_MAX_ATTEMPTS};

use crate::Run;

/// Asks questions on `output` and reads the answers from `input`, repeating a
/// question until the answer is usable.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn answer(&mut self, prompt: &str) -> anyhow::Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("input closed while waiting for an answer");
        }
        Ok(line.trim().to_string())
    }

    fn complain(&mut self, message: impl Display) -> anyhow::Result<()> {
        writeln!(self.output, "  -> {}", message)?;
        Ok(())
    }

    pub fn ask_int(&mut self, prompt: &str, min: usize) -> anyhow::Result<usize> {
        loop {
            match self.answer(prompt)?.parse::<i64>() {
                Ok(value) if value < min as i64 => self.complain(format!("must be >= {}", min))?,
                Ok(value) => return Ok(value as usize),
                Err(_) => self.complain("please enter an integer")?,
            }
        }
    }

    pub fn ask_point(&mut self, prompt: &str) -> anyhow::Result<Point> {
        loop {
            match self.answer(prompt)?.parse::<Point>() {
                Ok(point) => return Ok(point),
                Err(_) => self.complain("format must be row,col (e.g., 1,2)")?,
            }
        }
    }

    pub fn ask_float(&mut self, prompt: &str, min: f64, max: f64) -> anyhow::Result<f64> {
        loop {
            match self.answer(prompt)?.parse::<f64>() {
                Ok(value) if (min..=max).contains(&value) => return Ok(value),
                Ok(_) => self.complain(format!("must be between {} and {}", min, max))?,
                Err(_) => self.complain("please enter a number")?,
            }
        }
    }

    pub fn ask_yes_no(&mut self, prompt: &str) -> anyhow::Result<bool> {
        loop {
            match self.answer(prompt)?.to_ascii_lowercase().as_str() {
                "y" => return Ok(true),
                "n" => return Ok(false),
                _ => self.complain("choose one of: y, n")?,
            }
        }
    }

    pub fn ask_algorithm(&mut self, prompt: &str) -> anyhow::Result<Algorithm> {
        loop {
            match self.answer(prompt)?.parse::<Algorithm>() {
                Ok(algorithm) => return Ok(algorithm),
                Err(_) => self.complain("choose one of: bfs, dfs")?,
            }
        }
    }

    /// An empty answer means no seed
    pub fn ask_seed(&mut self, prompt: &str) -> anyhow::Result<Option<u64>> {
        loop {
            let answer = self.answer(prompt)?;
            if answer.is_empty() {
                return Ok(None);
            }
            match answer.parse::<u64>() {
                Ok(seed) => return Ok(Some(seed)),
                Err(_) => self.complain("please enter a non-negative integer or nothing")?,
            }
        }
    }

    /// An empty answer means no path
    pub fn ask_path(&mut self, prompt: &str) -> anyhow::Result<Option<PathBuf>> {
        let answer = self.answer(prompt)?;
        Ok((!answer.is_empty()).then(|| PathBuf::from(answer)))
    }

    /// Walks through every run parameter. Endpoints are asked again until they
    /// fit the grid.
    pub fn ask_run(&mut self) -> anyhow::Result<Run> {
        let rows = self.ask_int("Enter number of rows (>=2): ", 2)?;
        let columns = self.ask_int("Enter number of cols (>=2): ", 2)?;

        writeln!(self.output, "\nCoordinates are 0-indexed (top-left is 0,0)")?;
        let params = loop {
            let start = self.ask_point("Enter start (row,col): ")?;
            let goal = self.ask_point("Enter exit  (row,col): ")?;
            // density is checked by its own prompt
            let params = MazeParams::new(rows, columns, start, goal, 0.0);
            match params.validate() {
                Ok(()) => break params,
                Err(e) => self.complain(e)?,
            }
        };

        let density = self.ask_float("Enter wall density (0.0 - 0.9 recommended): ", 0.0, 0.99)?;
        let algorithm = self.ask_algorithm("Choose algorithm (bfs/dfs): ")?;
        let ensure_solvable = self.ask_yes_no("Ensure solvable? (y/n): ")?;
        let show_visited = self.ask_yes_no("Show visited overlay? (y/n): ")?;
        let seed = self.ask_seed("Enter RNG seed (optional, press Enter to skip): ")?;

        Ok(Run {
            params: MazeParams { density, ..params },
            options: SolveOptions {
                algorithm,
                ensure_solvable,
                max_attempts: DEFAULT_MAX_ATTEMPTS,
            },
            seed,
            show_visited,
        })
    }
}

#[cfg(test)]
mod test {

    use std::io::Cursor;

    use super::*;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(prompter: &Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(prompter.output.clone()).unwrap()
    }

    #[test]
    fn test_int_reprompts() {
        let mut p = prompter("abc\n1\n-3\n4\n");
        assert_eq!(p.ask_int("n: ", 2).unwrap(), 4);

        let out = output(&p);
        assert!(out.contains("please enter an integer"));
        assert_eq!(out.matches("must be >= 2").count(), 2);
    }

    #[test]
    fn test_float_range() {
        let mut p = prompter("1.0\nx\n0.25\n");
        assert_eq!(p.ask_float("d: ", 0.0, 0.99).unwrap(), 0.25);
        assert!(output(&p).contains("must be between 0 and 0.99"));
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut p = prompter("x\n");
        assert!(p.ask_int("n: ", 2).is_err());
    }

    #[test]
    fn test_optional_answers() {
        let mut p = prompter("\n12\n\nout.txt\n");
        assert_eq!(p.ask_seed("seed: ").unwrap(), None);
        assert_eq!(p.ask_seed("seed: ").unwrap(), Some(12));
        assert_eq!(p.ask_path("path: ").unwrap(), None);
        assert_eq!(p.ask_path("path: ").unwrap(), Some(PathBuf::from("out.txt")));
    }

    #[test]
    fn test_full_run() {
        let mut p = prompter(
            "4\n5\n0,0\n0,0\n0,0\n9,9\n0,0\n3,4\n0.2\nDFS\nmaybe\ny\nn\n7\n",
        );
        let run = p.ask_run().unwrap();

        assert_eq!(
            run.params,
            MazeParams::new(4, 5, Point::new(0, 0), Point::new(3, 4), 0.2)
        );
        assert_eq!(run.options.algorithm, Algorithm::Dfs);
        assert!(run.options.ensure_solvable);
        assert!(!run.show_visited);
        assert_eq!(run.seed, Some(7));

        let out = output(&p);
        assert!(out.contains("start and end cannot be the same cell"));
        assert!(out.contains("out of bounds"));
        assert!(out.contains("choose one of: y, n"));
    }
}
