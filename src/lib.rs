#![warn(missing_docs)]
//! The sudokugen library
//!
//! ## Overview
//!
//! Sudokugen generates sudoku puzzles of configurable box dimensions,
//! verifies that they have exactly one solution and rates how hard they are
//! to solve. The same engine solves externally supplied boards.
//!
//! ## Example
//!
//! ```
//! use sudokugen::{Dimensions, Grid};
//!
//! let puzzle = "\
//! 0 0 0 2 0 0 0 6 3
//! 3 0 0 0 0 5 4 0 1
//! 0 0 1 0 0 3 9 8 0
//! 0 0 0 0 0 0 0 9 0
//! 0 0 0 5 3 8 0 0 0
//! 0 3 0 0 0 0 0 0 0
//! 0 2 6 3 0 0 5 0 0
//! 5 0 3 7 0 0 0 0 8
//! 4 7 0 0 0 1 0 0 0";
//!
//! let grid = Grid::from_str_grid(Dimensions::new(3, 3), puzzle).unwrap();
//! assert!(grid.has_unique_solution());
//!
//! let solution = grid.solve().unwrap();
//! assert!(solution.is_complete());
//! println!("{}", solution);
//! ```
//!
//! Puzzles are produced by a [`Generator`], which cuts clue subsets out of a
//! random solved board, filters them for uniqueness and rates them:
//!
//! ```no_run
//! use sudokugen::{DifficultyBand, Dimensions, Generator, Strategy};
//!
//! let mut generator = Generator::new(Dimensions::new(3, 3), 30);
//! let band = DifficultyBand { lower: 0.45, upper: 0.75 };
//! for result in generator.generate(4, Strategy::Symmetric, Some(band)) {
//!     let (puzzle, rating) = result.unwrap();
//!     println!("{}\nDifficulty: {}", puzzle, rating);
//! }
//! ```

mod board;
mod errors;
mod generator;
mod rating;
mod solver;

pub use crate::board::{Coord, Dimensions, Grid, ValueSet, Values};
pub use crate::errors::{FromValuesError, GridError, ParseGridError, TriesExhausted, Unsolvable};
pub use crate::generator::{DifficultyBand, Generator, Puzzles, Strategy};
pub use crate::rating::{DifficultyCategory, DifficultyRating};
pub use crate::solver::Solutions;
