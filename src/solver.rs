//! The solver: a matrix plus everything needed to search it.

use std::iter::FusedIterator;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::matrix::{Matrix, RowId};
use crate::search::Search;
use crate::stats::SearchStats;
use crate::stop::StopHandle;

/// Configuration for the solver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Solution limit used by [`Solver::solutions`] and
    /// [`Solver::solve_all`]
    pub max_solutions: usize,
    /// Maximum time to search; `None` searches until done
    pub timeout: Option<Duration>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_solutions: 1000,
            timeout: None,
        }
    }
}

/// Finds exact covers of a [`Matrix`].
///
/// The solver owns its matrix for as long as it lives; every solve
/// leaves the matrix exactly as it found it, whether the search ran to
/// the end, hit its solution limit, was stopped, or timed out, so a
/// solver can be used for any number of solves.  Get the matrix back
/// with [`Solver::into_matrix`].
#[derive(Debug)]
pub struct Solver {
    matrix: Matrix,
    config: SolverConfig,
    stop: StopHandle,
    stats: SearchStats,
}

impl Solver {
    /// Creates a solver with the default configuration.
    pub fn new(matrix: Matrix) -> Solver {
        Solver::with_config(matrix, SolverConfig::default())
    }

    pub fn with_config(matrix: Matrix, config: SolverConfig) -> Solver {
        Solver {
            matrix,
            config,
            stop: StopHandle::new(),
            stats: SearchStats::default(),
        }
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn into_matrix(self) -> Matrix {
        self.matrix
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Statistics of the most recent solve.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// A handle that can stop a solve from another thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Asks any current or future solve to stop, until
    /// [`Solver::clear_stop`] is called.
    pub fn request_stop(&self) {
        self.stop.request_stop();
    }

    pub fn clear_stop(&self) {
        self.stop.clear();
    }

    fn search(&mut self, max_solutions: usize) -> Result<Search<'_>> {
        Search::new(
            &mut self.matrix,
            &mut self.stats,
            &self.stop,
            max_solutions,
            self.config.timeout,
        )
    }

    /// Searches for up to `max_solutions` exact covers, calling
    /// `on_solution` with the row ids of each one (in the order the rows
    /// were chosen) as it is found.
    ///
    /// Returns the number of solutions found; zero just means there are
    /// none (or that the search was stopped before finding any, which
    /// [`Solver::stats`] will tell).
    pub fn solve<F>(&mut self, max_solutions: usize, mut on_solution: F) -> Result<usize>
    where
        F: FnMut(&[RowId]),
    {
        let mut search = self.search(max_solutions)?;
        while let Some(rows) = search.next_solution() {
            on_solution(rows);
        }
        drop(search);
        Ok(self.stats.solutions_found)
    }

    /// Iterates over up to `config.max_solutions` exact covers.
    ///
    /// Solutions are produced lazily, one search step at a time.
    /// Dropping the iterator early unwinds the search and restores the
    /// matrix.
    pub fn solutions(&mut self) -> Result<Solutions<'_>> {
        let max_solutions = self.config.max_solutions;
        Ok(Solutions {
            search: self.search(max_solutions)?,
        })
    }

    /// Collects up to `config.max_solutions` exact covers.
    pub fn solve_all(&mut self) -> Result<Vec<Vec<RowId>>> {
        Ok(self.solutions()?.collect())
    }

    /// Finds a single exact cover, if there is one.
    pub fn first_solution(&mut self) -> Result<Option<Vec<RowId>>> {
        let mut first = None;
        self.solve(1, |rows| first = Some(rows.to_vec()))?;
        Ok(first)
    }
}

/// An iterator yielding exact covers, created by [`Solver::solutions`].
pub struct Solutions<'a> {
    search: Search<'a>,
}

impl Iterator for Solutions<'_> {
    // Owned, since the rows behind the engine's slice change as soon as
    // the search resumes.
    type Item = Vec<RowId>;

    fn next(&mut self) -> Option<Self::Item> {
        self.search.next_solution().map(<[RowId]>::to_vec)
    }
}

impl FusedIterator for Solutions<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::SearchOutcome;
    use crate::verify::verify_cover;

    /// The example from Knuth's "Dancing Links" paper: seven columns,
    /// six rows, and a single cover made of rows 0, 3 and 4.
    fn knuth_example() -> Matrix {
        let mut matrix = Matrix::new(7);
        matrix.add_row(0, [2, 4, 5]).unwrap();
        matrix.add_row(1, [0, 3, 6]).unwrap();
        matrix.add_row(2, [1, 2, 5]).unwrap();
        matrix.add_row(3, [0, 3]).unwrap();
        matrix.add_row(4, [1, 6]).unwrap();
        matrix.add_row(5, [3, 4, 6]).unwrap();
        matrix
    }

    /// Dominoes on a 2x3 board; cell (r, c) is column 3r + c.
    fn domino_board() -> Matrix {
        let mut matrix = Matrix::new(6);
        let mut id = 0;
        for r in 0..2 {
            for c in 0..2 {
                matrix.add_row(id, [3 * r + c, 3 * r + c + 1]).unwrap();
                id += 1;
            }
        }
        for c in 0..3 {
            matrix.add_row(id, [c, c + 3]).unwrap();
            id += 1;
        }
        matrix
    }

    #[test]
    fn knuth() {
        let mut solver = Solver::new(knuth_example());

        let mut found = Vec::new();
        let count = solver
            .solve(10, |rows| {
                let mut rows = rows.to_vec();
                rows.sort();
                found.push(rows);
            })
            .unwrap();

        assert_eq!(1, count, "solution count: expected(left) != actual(right)");
        assert_eq!(vec![vec![0, 3, 4]], found);
        assert!(solver.stats().search_exhausted());
    }

    #[test]
    fn every_domino_tiling() {
        let mut solver = Solver::new(domino_board());
        let before = solver.matrix().clone();

        let solutions = solver.solve_all().unwrap();
        assert_eq!(3, solutions.len(), "solution count: expected(left) != actual(right)");
        for solution in &solutions {
            assert_eq!(Ok(()), verify_cover(solver.matrix(), solution));
        }
        assert_eq!(3, solver.stats().solutions_found);
        assert_eq!(&before, solver.matrix());
    }

    #[test]
    fn limit_caps_the_count() {
        let mut solver = Solver::new(domino_board());
        let before = solver.matrix().clone();

        let mut calls = 0;
        assert_eq!(2, solver.solve(2, |_| calls += 1).unwrap());
        assert_eq!(2, calls);
        assert_eq!(Some(SearchOutcome::LimitReached), solver.stats().outcome);
        assert_eq!(&before, solver.matrix());

        // Asking for more than there are just finds them all.
        assert_eq!(3, solver.solve(50, |_| ()).unwrap());
        assert!(solver.stats().search_exhausted());
    }

    #[test]
    fn first_solution() {
        let mut solver = Solver::new(knuth_example());
        let mut rows = solver.first_solution().unwrap().unwrap();
        rows.sort();
        assert_eq!(vec![0, 3, 4], rows);

        let mut nothing = Solver::new(Matrix::new(1));
        assert_eq!(None, nothing.first_solution().unwrap());
        assert_eq!(1, nothing.stats().branches_pruned);
    }

    #[test]
    fn iterator_respects_config_limit() {
        let config = SolverConfig {
            max_solutions: 1,
            ..SolverConfig::default()
        };
        let mut solver = Solver::with_config(domino_board(), config);
        assert_eq!(1, solver.solutions().unwrap().count());
    }

    #[test]
    fn dropping_the_iterator_restores_the_matrix() {
        let mut solver = Solver::new(domino_board());
        let before = solver.matrix().clone();
        {
            let mut solutions = solver.solutions().unwrap();
            assert!(solutions.next().is_some());
        }
        assert_eq!(Some(SearchOutcome::Abandoned), solver.stats().outcome);
        assert_eq!(before, solver.into_matrix());
    }

    #[test]
    fn stop_is_sticky_until_cleared() {
        let mut solver = Solver::new(domino_board());
        solver.request_stop();

        assert_eq!(0, solver.solve(10, |_| ()).unwrap());
        assert_eq!(Some(SearchOutcome::Stopped), solver.stats().outcome);
        assert_eq!(0, solver.solve(10, |_| ()).unwrap());

        solver.clear_stop();
        assert_eq!(3, solver.solve(10, |_| ()).unwrap());
    }

    #[test]
    fn stop_from_the_callback() {
        let mut solver = Solver::new(domino_board());
        let before = solver.matrix().clone();
        let handle = solver.stop_handle();

        let count = solver.solve(10, |_| handle.request_stop()).unwrap();
        assert_eq!(1, count);
        assert!(solver.stats().interrupted());
        assert_eq!(&before, solver.matrix());
    }

    #[test]
    fn zero_timeout_finds_nothing() {
        let config = SolverConfig {
            timeout: Some(Duration::ZERO),
            ..SolverConfig::default()
        };
        let mut solver = Solver::with_config(knuth_example(), config);
        assert_eq!(0, solver.solve(1, |_| ()).unwrap());
        assert_eq!(Some(SearchOutcome::TimedOut), solver.stats().outcome);
    }

    #[test]
    fn stats_reset_between_solves() {
        let mut solver = Solver::new(knuth_example());
        solver.solve(10, |_| ()).unwrap();
        let first = solver.stats().clone();
        solver.solve(10, |_| ()).unwrap();
        assert_eq!(first.branches_explored, solver.stats().branches_explored);
        assert_eq!(first.placements_tested, solver.stats().placements_tested);
        assert_eq!(1, solver.stats().solutions_found);
    }
}
