//! Counters describing a single solve.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOutcome {
    /// Every branch was explored.
    Exhausted,
    /// The requested number of solutions was reached.
    LimitReached,
    /// A stop was requested through a [`crate::StopHandle`].
    Stopped,
    /// The configured timeout expired.
    TimedOut,
    /// The caller dropped the solution iterator before it was done.
    Abandoned,
}

/// Statistics for the most recent solve.
///
/// All counters are reset when a solve starts; read them once it has
/// returned.  A search that halts on its limit, a stop request or the
/// timeout tries no further rows in the levels above, so the counters
/// stop at the halt rather than covering the rest of the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Search levels entered, including the ones that were cut short.
    pub branches_explored: usize,
    /// Levels abandoned because their best column had no rows left.
    pub branches_pruned: usize,
    /// Rows tried as part of a partial solution.
    pub placements_tested: usize,
    /// Complete covers reported.
    pub solutions_found: usize,
    /// Deepest level entered; equal to the size of the largest partial
    /// solution seen.
    pub max_depth: usize,
    /// Wall-clock time spent searching.
    pub elapsed: Duration,
    /// How the search ended, or `None` while it's still running.
    pub outcome: Option<SearchOutcome>,
}

impl SearchStats {
    /// Whether the whole search space was explored, so that the
    /// solutions found are all the solutions there are.
    pub fn search_exhausted(&self) -> bool {
        self.outcome == Some(SearchOutcome::Exhausted)
    }

    /// Whether the search was cut short by a stop request or timeout.
    pub fn interrupted(&self) -> bool {
        matches!(
            self.outcome,
            Some(SearchOutcome::Stopped | SearchOutcome::TimedOut)
        )
    }
}
