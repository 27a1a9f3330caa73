#![doc = include_str!("../README.md")]
//!
//!
//! To solve an exact cover problem with this implementation, build a
//! [`Matrix`] with one column per thing that must be covered, add one
//! row per candidate (listing the columns it covers), and hand the
//! matrix to a [`Solver`].
//!
//! An example, based on Wikipedia's [Algorithm
//! X](https://en.wikipedia.org/wiki/Knuth%27s_Algorithm_X) article:
//!
//! ```
//! // Columns 1..=7 of the article are columns 0..=6 here, and rows
//! // A..=F are rows 0..=5.
//! let mut matrix = dlxcov::Matrix::new(7);
//!
//! matrix.add_row(0, [0, 3, 6])?;
//! matrix.add_row(1, [0, 3])?;
//! matrix.add_row(2, [3, 4, 6])?;
//! matrix.add_row(3, [2, 4, 5])?;
//! matrix.add_row(4, [1, 2, 5, 6])?;
//! matrix.add_row(5, [1, 6])?;
//!
//! // And then, actually solve the problem.
//! let mut solver = dlxcov::Solver::new(matrix);
//! let mut solutions = Vec::new();
//! let count = solver.solve(10, |rows| {
//!     let mut rows = rows.to_vec();
//!     rows.sort();
//!     solutions.push(rows);
//! })?;
//!
//! assert_eq!(1, count);
//! assert_eq!(vec![vec![1, 3, 5]], solutions);
//! assert!(solver.stats().search_exhausted());
//! # Ok::<(), dlxcov::Error>(())
//! ```
//!
//! A search can be bounded by a solution count (the `max_solutions`
//! argument of [`Solver::solve`], or [`SolverConfig::max_solutions`]
//! for [`Solver::solutions`]), by a [`SolverConfig::timeout`], or
//! stopped at any time from another thread through a [`StopHandle`].
//! However it ends, the matrix is left exactly as it was before the
//! search, and [`Solver::stats`] describes what the search did.

pub mod error;
pub mod matrix;
mod search;
pub mod solver;
pub mod stats;
pub mod stop;
pub mod verify;

pub use error::{Error, Result};
pub use matrix::{Matrix, RowColumns, RowId};
pub use solver::{Solutions, Solver, SolverConfig};
pub use stats::{SearchOutcome, SearchStats};
pub use stop::StopHandle;
pub use verify::{CoverDefect, verify_cover};
