//! Checking a proposed solution against the matrix it came from.

use std::collections::HashSet;

use thiserror::Error;

use crate::matrix::{Matrix, RowId};

/// The first problem found with a proposed exact cover.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoverDefect {
    #[error("row {0} is not in the matrix")]
    UnknownRow(RowId),

    #[error("row {0} is used more than once")]
    RepeatedRow(RowId),

    #[error("column {column} is covered by more than one row")]
    Overlap { column: usize },

    #[error("column {column} is not covered")]
    Uncovered { column: usize },
}

/// Checks that `row_ids` is an exact cover of `matrix`: every row
/// exists and is used once, and every column is covered by exactly one
/// of the rows.
pub fn verify_cover(matrix: &Matrix, row_ids: &[RowId]) -> Result<(), CoverDefect> {
    let mut covered = vec![false; matrix.column_count()];
    let mut used = HashSet::with_capacity(row_ids.len());

    for &row in row_ids {
        if !used.insert(row) {
            return Err(CoverDefect::RepeatedRow(row));
        }
        let columns = matrix.row_columns(row).ok_or(CoverDefect::UnknownRow(row))?;
        for column in columns {
            if covered[column] {
                return Err(CoverDefect::Overlap { column });
            }
            covered[column] = true;
        }
    }

    match covered.iter().position(|&is_covered| !is_covered) {
        Some(column) => Err(CoverDefect::Uncovered { column }),
        None => Ok(()),
    }
}

impl Matrix {
    /// Whether `row_ids` is an exact cover of this matrix; see
    /// [`verify_cover`] for the reason when it isn't.
    pub fn is_exact_cover(&self, row_ids: &[RowId]) -> bool {
        verify_cover(self, row_ids).is_ok()
    }
}
