//! The Algorithm X search engine.
//!
//! The search is written as a resumable state machine instead of a
//! recursive function: each search level is a [`Frame`] on an explicit
//! stack, recording the column that level covered and the row it
//! currently has placed.  A frame is all that's needed to undo the
//! level, so unwinding is just popping frames, and deep searches can't
//! exhaust the native stack.
//!
//! In recursive terms, entering a level does:
//!
//! * count the branch, and poll the stop flag and deadline;
//! * if no column is active, report the current rows as a solution;
//! * otherwise pick the active column with the fewest rows (prune if it
//!   has none), cover it, and for each of its rows in turn, place the
//!   row, cover the row's other columns and enter the next level;
//!   afterwards uncover everything in reverse.
//!
//! Once the solution limit is reached, or a stop/deadline is observed,
//! the engine is halted: no frame places another row, and the open
//! frames unwind normally, leaving the matrix exactly as it started.

use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::matrix::{Matrix, RowId};
use crate::stats::{SearchOutcome, SearchStats};
use crate::stop::StopHandle;

/// One open search level.
#[derive(Debug, Clone, Copy)]
struct Frame {
    /// Header of the column covered by this level.
    column: usize,
    /// The row node placed at this level, or `column` if no row has
    /// been placed yet.
    node: usize,
}

pub(crate) struct Search<'a> {
    matrix: &'a mut Matrix,
    stats: &'a mut SearchStats,
    stop: &'a StopHandle,
    max_solutions: usize,
    started: Instant,
    deadline: Option<Instant>,
    frames: Vec<Frame>,
    /// Row ids placed so far; `solution[d]` is the row placed at
    /// level `d`.
    solution: Vec<RowId>,
    /// The next step enters a new level (rather than advancing the top
    /// frame to its next row).
    entering: bool,
    halted: bool,
    finished: bool,
}

impl<'a> Search<'a> {
    /// Prepares a search over `matrix`, resetting `stats`.
    pub(crate) fn new(
        matrix: &'a mut Matrix,
        stats: &'a mut SearchStats,
        stop: &'a StopHandle,
        max_solutions: usize,
        timeout: Option<Duration>,
    ) -> Result<Search<'a>> {
        if max_solutions == 0 {
            return Err(Error::InvalidMaxSolutions);
        }

        // A solution never holds more rows than the matrix has.
        let rows = matrix.row_count();
        let mut solution = Vec::new();
        solution
            .try_reserve_exact(rows)
            .map_err(|_| Error::OutOfMemory { rows })?;

        *stats = SearchStats::default();
        let started = Instant::now();
        Ok(Search {
            matrix,
            stats,
            stop,
            max_solutions,
            started,
            deadline: timeout.map(|timeout| started + timeout),
            frames: Vec::new(),
            solution,
            entering: true,
            halted: false,
            finished: false,
        })
    }

    /// Runs the search until it reports the next solution, returning
    /// the ids of its rows in level order, or `None` once the search is
    /// over (at which point the matrix is fully uncovered).
    pub(crate) fn next_solution(&mut self) -> Option<&[RowId]> {
        if self.finished {
            return None;
        }
        loop {
            if self.entering {
                self.entering = false;
                if self.enter() {
                    return Some(self.solution.as_slice());
                }
            }
            if !self.advance() {
                self.finish();
                return None;
            }
        }
    }

    /// Enters a new level.  Returns true if the current rows form a
    /// complete cover.
    fn enter(&mut self) -> bool {
        let depth = self.solution.len();
        self.stats.branches_explored += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);

        if let Some(outcome) = self.poll() {
            self.halt(outcome);
            return false;
        }

        let Some(column) = self.matrix.min_column() else {
            self.stats.solutions_found += 1;
            if self.stats.solutions_found >= self.max_solutions {
                self.halt(SearchOutcome::LimitReached);
            }
            return true;
        };

        if self.matrix.size(column) == 0 {
            // Nothing can cover this column any more.
            self.stats.branches_pruned += 1;
            return false;
        }

        self.matrix.cover_header(column);
        self.frames.push(Frame {
            column,
            node: column,
        });
        false
    }

    /// Takes back the row placed by the top frame, and places the next
    /// row of its column; frames with no rows left are closed.  Returns
    /// false when every frame has been closed.
    fn advance(&mut self) -> bool {
        while let Some(&Frame { column, node }) = self.frames.last() {
            if node != column {
                self.matrix.uncover_row(node);
                self.solution.pop();
            }

            let next = if self.halted {
                column
            } else {
                self.matrix.down(node)
            };
            if next == column {
                self.matrix.uncover_header(column);
                self.frames.pop();
                continue;
            }

            self.stats.placements_tested += 1;
            self.solution.push(self.matrix.row_of(next));
            self.matrix.cover_row(next);
            if let Some(frame) = self.frames.last_mut() {
                frame.node = next;
            }
            self.entering = true;
            return true;
        }
        false
    }

    fn poll(&self) -> Option<SearchOutcome> {
        if self.stop.is_stop_requested() {
            Some(SearchOutcome::Stopped)
        } else if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            Some(SearchOutcome::TimedOut)
        } else {
            None
        }
    }

    fn halt(&mut self, outcome: SearchOutcome) {
        if !self.halted {
            self.halted = true;
            self.stats.outcome = Some(outcome);
        }
    }

    fn finish(&mut self) {
        if !self.finished {
            self.finished = true;
            self.stats.elapsed = self.started.elapsed();
            if self.stats.outcome.is_none() {
                self.stats.outcome = Some(SearchOutcome::Exhausted);
            }
        }
    }
}

impl Drop for Search<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.halt(SearchOutcome::Abandoned);
            while self.advance() {}
            self.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(matrix: &mut Matrix, max_solutions: usize) -> (Vec<Vec<RowId>>, SearchStats) {
        let stop = StopHandle::new();
        let mut stats = SearchStats::default();
        let mut found = Vec::new();
        {
            let mut search = Search::new(matrix, &mut stats, &stop, max_solutions, None).unwrap();
            while let Some(rows) = search.next_solution() {
                found.push(rows.to_vec());
            }
        }
        (found, stats)
    }

    #[test]
    fn single_rows_cover_without_pruning() {
        let mut matrix = Matrix::new(3);
        matrix.add_row(0, [0]).unwrap();
        matrix.add_row(1, [1]).unwrap();
        matrix.add_row(2, [2]).unwrap();

        let (found, stats) = run(&mut matrix, 1);
        assert_eq!(vec![vec![0, 1, 2]], found);
        assert_eq!(0, stats.branches_pruned);
        assert_eq!(4, stats.branches_explored);
        assert_eq!(3, stats.placements_tested);
        assert_eq!(3, stats.max_depth);
        assert_eq!(Some(SearchOutcome::LimitReached), stats.outcome);
    }

    #[test]
    fn counts_follow_the_recursive_search() {
        // Columns 0..4; rows A:[0,1] B:[2,3] C:[0,2] D:[1,3].
        //
        // Level 0 picks column 0 and tries A then C.  A leaves column 2
        // with only B, which completes the cover; C leaves column 1 with
        // only D, which completes the other one.
        let mut matrix = Matrix::new(4);
        matrix.add_row(0, [0, 1]).unwrap();
        matrix.add_row(1, [2, 3]).unwrap();
        matrix.add_row(2, [0, 2]).unwrap();
        matrix.add_row(3, [1, 3]).unwrap();
        let before = matrix.clone();

        let (found, stats) = run(&mut matrix, 10);
        assert_eq!(vec![vec![0, 1], vec![2, 3]], found);
        assert_eq!(5, stats.branches_explored);
        assert_eq!(4, stats.placements_tested);
        assert_eq!(0, stats.branches_pruned);
        assert_eq!(2, stats.max_depth);
        assert!(stats.search_exhausted());
        assert_eq!(before, matrix);
    }

    #[test]
    fn empty_column_is_pruned() {
        let mut matrix = Matrix::new(2);
        matrix.add_row(0, Vec::new()).unwrap();

        let (found, stats) = run(&mut matrix, 5);
        assert!(found.is_empty());
        assert_eq!(1, stats.branches_pruned);
        assert_eq!(1, stats.branches_explored);
        assert_eq!(0, stats.placements_tested);
    }

    #[test]
    fn zero_columns_has_one_empty_cover() {
        let mut matrix = Matrix::new(0);
        let (found, stats) = run(&mut matrix, 5);
        assert_eq!(vec![Vec::<RowId>::new()], found);
        assert_eq!(1, stats.solutions_found);
    }

    #[test]
    fn rejects_zero_max_solutions() {
        let mut matrix = Matrix::new(1);
        let mut stats = SearchStats::default();
        let stop = StopHandle::new();
        assert!(matches!(
            Search::new(&mut matrix, &mut stats, &stop, 0, None),
            Err(Error::InvalidMaxSolutions)
        ));
    }

    #[test]
    fn dropping_midway_restores_matrix() {
        let mut matrix = Matrix::new(2);
        matrix.add_row(0, [0]).unwrap();
        matrix.add_row(1, [1]).unwrap();
        matrix.add_row(2, [0, 1]).unwrap();
        matrix.add_row(3, [0]).unwrap();
        let before = matrix.clone();

        let stop = StopHandle::new();
        let mut stats = SearchStats::default();
        {
            let mut search = Search::new(&mut matrix, &mut stats, &stop, 10, None).unwrap();
            assert!(search.next_solution().is_some());
        }
        assert_eq!(Some(SearchOutcome::Abandoned), stats.outcome);
        assert_eq!(1, stats.solutions_found);
        assert_eq!(before, matrix);
    }

    #[test]
    fn pre_requested_stop_ends_immediately() {
        let mut matrix = Matrix::new(1);
        matrix.add_row(0, [0]).unwrap();
        let stop = StopHandle::new();
        stop.request_stop();
        let mut stats = SearchStats::default();
        {
            let mut search = Search::new(&mut matrix, &mut stats, &stop, 1, None).unwrap();
            assert_eq!(None, search.next_solution());
            assert_eq!(None, search.next_solution());
        }
        assert_eq!(Some(SearchOutcome::Stopped), stats.outcome);
        assert_eq!(1, stats.branches_explored);
        assert_eq!(0, stats.placements_tested);
        assert_eq!(0, stats.solutions_found);
    }

    #[test]
    fn zero_timeout_expires_at_first_level() {
        let mut matrix = Matrix::new(1);
        matrix.add_row(0, [0]).unwrap();
        let stop = StopHandle::new();
        let mut stats = SearchStats::default();
        {
            let mut search =
                Search::new(&mut matrix, &mut stats, &stop, 1, Some(Duration::ZERO)).unwrap();
            assert_eq!(None, search.next_solution());
        }
        assert_eq!(Some(SearchOutcome::TimedOut), stats.outcome);
        assert!(stats.interrupted());
    }
}
