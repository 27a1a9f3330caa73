//! Error types for dlxcov

use thiserror::Error;

/// Result type alias using dlxcov's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a matrix or starting a solve.
///
/// Running out of solutions, running into the solution limit, a stop
/// request and an expired deadline are not errors; they are reported
/// through [`crate::SearchStats`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A row named a column the matrix doesn't have
    #[error("Column {column} out of range for matrix with {columns} columns")]
    ColumnOutOfRange {
        /// The offending column index
        column: usize,
        /// Number of columns in the matrix
        columns: usize,
    },

    /// A dense row carried more cells than the matrix has columns
    #[error("Dense row has {width} cells, but the matrix has {columns} columns")]
    RowWidthMismatch {
        /// Number of cells supplied
        width: usize,
        /// Number of columns in the matrix
        columns: usize,
    },

    /// A solve was asked to stop before finding anything
    #[error("max_solutions must be at least 1")]
    InvalidMaxSolutions,

    /// The per-solve solution buffer couldn't be allocated
    #[error("Out of memory: failed to reserve a solution buffer for {rows} rows")]
    OutOfMemory {
        /// Number of row slots requested
        rows: usize,
    },
}
