//! The sparse 0/1 matrix that Algorithm X dances over.

use std::collections::HashMap;
use std::iter;

use smallvec::SmallVec;

use crate::error::{Error, Result};

/// Caller-supplied identity of a matrix row.
pub type RowId = usize;

/// Membership of a single row, as column indices.
pub type RowColumns = SmallVec<[usize; 8]>;

/// Arena index of the root header.  Its horizontal ring is the list of
/// active columns.
const ROOT: usize = 0;

/// Arena index of the header of `column`.
fn header_index(column: usize) -> usize {
    column + 1
}

/// A node in the four-way linked structure: either a header (the root,
/// or a column header), or a 1-entry of some row.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    /// Owning row; only meaningful for entry nodes, headers carry 0.
    row: RowId,
    /// Arena index of this node's column header (headers point at
    /// themselves).
    column: usize,
    /// Number of entries currently linked into the column.  Only
    /// maintained on column headers.
    size: usize,
    up: usize,
    down: usize,
    left: usize,
    right: usize,
}

impl Node {
    fn header(index: usize) -> Node {
        Node {
            row: 0,
            column: index,
            size: 0,
            up: index,
            down: index,
            left: index,
            right: index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RowEntry {
    id: RowId,
    /// First entry node of the row, or `None` for a row with no 1s.
    first: Option<usize>,
}

/// A sparse 0/1 matrix stored as Knuth's dancing links.
///
/// Nodes live in a single arena (`Vec`), and every link is an index into
/// that arena.  Index 0 is the root header, indices `1..=column_count`
/// are the column headers, and the entries of each row follow in the
/// order rows were added.
///
/// Two matrices compare equal exactly when every link, every column
/// size and every recorded row is identical, which makes it easy to
/// check that a balanced sequence of [`Matrix::cover`] and
/// [`Matrix::uncover`] calls put everything back where it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    nodes: Vec<Node>,
    columns: usize,
    rows: Vec<RowEntry>,
    row_index: HashMap<RowId, usize>,
}

impl Matrix {
    /// Creates a matrix with `column_count` columns and no rows.
    pub fn new(column_count: usize) -> Matrix {
        let mut matrix = Matrix {
            nodes: Vec::with_capacity(column_count + 1),
            columns: column_count,
            rows: Vec::new(),
            row_index: HashMap::new(),
        };
        matrix.nodes.push(Node::header(ROOT));
        for column in 0..column_count {
            let header = header_index(column);
            matrix.nodes.push(Node::header(header));

            // Append to the end of the active column list.
            let left = matrix.left(ROOT);
            matrix.set_left(header, left);
            matrix.set_right(header, ROOT);
            matrix.relink_into_row(header);
        }
        matrix
    }

    // Link accessors; these keep the arena indexing out of the
    // algorithm code below.

    pub(crate) fn up(&self, node: usize) -> usize {
        self.nodes[node].up
    }

    fn set_up(&mut self, node: usize, val: usize) {
        self.nodes[node].up = val
    }

    pub(crate) fn down(&self, node: usize) -> usize {
        self.nodes[node].down
    }

    fn set_down(&mut self, node: usize, val: usize) {
        self.nodes[node].down = val
    }

    pub(crate) fn left(&self, node: usize) -> usize {
        self.nodes[node].left
    }

    fn set_left(&mut self, node: usize, val: usize) {
        self.nodes[node].left = val
    }

    pub(crate) fn right(&self, node: usize) -> usize {
        self.nodes[node].right
    }

    fn set_right(&mut self, node: usize, val: usize) {
        self.nodes[node].right = val
    }

    pub(crate) fn column_of(&self, node: usize) -> usize {
        self.nodes[node].column
    }

    pub(crate) fn row_of(&self, node: usize) -> RowId {
        self.nodes[node].row
    }

    pub(crate) fn size(&self, header: usize) -> usize {
        self.nodes[header].size
    }

    // Ring surgery.  Unlinking leaves the node's own links intact, which
    // is what lets the matching relink put it back.

    fn unlink_from_row(&mut self, node: usize) {
        let left = self.left(node);
        let right = self.right(node);
        self.set_right(left, right);
        self.set_left(right, left);
    }

    fn relink_into_row(&mut self, node: usize) {
        let left = self.left(node);
        let right = self.right(node);
        self.set_left(right, node);
        self.set_right(left, node);
    }

    fn unlink_from_column(&mut self, node: usize) {
        let up = self.up(node);
        let down = self.down(node);
        self.set_down(up, down);
        self.set_up(down, up);
    }

    fn relink_into_column(&mut self, node: usize) {
        let up = self.up(node);
        let down = self.down(node);
        self.set_up(down, node);
        self.set_down(up, node);
    }

    /// Adds a row with a 1 in each of `columns`.
    ///
    /// Each entry goes to the bottom of its column, so rows are visited
    /// in insertion order during the search.  A row with no columns is
    /// recorded but can never be part of a cover.  Every column index is
    /// checked before anything is linked, so a rejected row leaves the
    /// matrix unchanged.
    ///
    /// Row ids are expected to be unique; that isn't checked.  A column
    /// listed more than once is only entered once, at its first
    /// position, so `[2, 0, 2]` is the same row as `[2, 0]`.
    pub fn add_row<I>(&mut self, row_id: RowId, columns: I) -> Result<()>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut membership = RowColumns::new();
        for column in columns {
            if !membership.contains(&column) {
                membership.push(column);
            }
        }
        if let Some(&column) = membership.iter().find(|&&column| column >= self.columns) {
            return Err(Error::ColumnOutOfRange {
                column,
                columns: self.columns,
            });
        }

        let mut first = None;
        for column in membership {
            let header = header_index(column);
            let node = self.nodes.len();
            let up = self.up(header);
            self.nodes.push(Node {
                row: row_id,
                column: header,
                size: 0,
                up,
                down: header,
                left: node,
                right: node,
            });
            self.relink_into_column(node);
            self.nodes[header].size += 1;

            match first {
                None => first = Some(node),
                Some(first_node) => {
                    // Link in to the left of the first node, i.e. at
                    // the end of the row.
                    let left = self.left(first_node);
                    self.set_left(node, left);
                    self.set_right(node, first_node);
                    self.relink_into_row(node);
                }
            }
        }

        self.row_index.insert(row_id, self.rows.len());
        self.rows.push(RowEntry { id: row_id, first });
        Ok(())
    }

    /// Adds a row given as one cell per column, `true` meaning the row
    /// covers that column.  A short row is treated as padded with
    /// `false`; a row wider than the matrix is rejected.
    pub fn add_dense_row<I>(&mut self, row_id: RowId, cells: I) -> Result<()>
    where
        I: IntoIterator<Item = bool>,
    {
        let mut width = 0;
        let mut membership = RowColumns::new();
        for (column, cell) in cells.into_iter().enumerate() {
            width = column + 1;
            if cell {
                membership.push(column);
            }
        }
        if width > self.columns {
            return Err(Error::RowWidthMismatch {
                width,
                columns: self.columns,
            });
        }
        self.add_row(row_id, membership)
    }

    /// Covers `column`: removes it from the active column list, and
    /// removes every row that has an entry in it from all of the other
    /// columns those rows touch.
    ///
    /// Covers and uncovers must be strictly nested; uncovering out of
    /// order silently corrupts the matrix.
    ///
    /// # Panics
    ///
    /// Panics if `column` is out of range.
    pub fn cover(&mut self, column: usize) {
        self.check_column(column);
        self.cover_header(header_index(column));
    }

    /// Undoes the matching [`Matrix::cover`] of `column`.
    ///
    /// # Panics
    ///
    /// Panics if `column` is out of range.
    pub fn uncover(&mut self, column: usize) {
        self.check_column(column);
        self.uncover_header(header_index(column));
    }

    fn check_column(&self, column: usize) {
        assert!(
            column < self.columns,
            "column {column} out of range for matrix with {} columns",
            self.columns
        );
    }

    pub(crate) fn cover_header(&mut self, header: usize) {
        // The covered column keeps its own vertical links, and so do
        // the removed entries; that's all uncover_header needs.
        self.unlink_from_row(header);
        let mut row_node = header;
        loop {
            row_node = self.down(row_node);
            if row_node == header {
                break;
            }
            let mut node = row_node;
            loop {
                node = self.right(node);
                if node == row_node {
                    break;
                }
                self.unlink_from_column(node);
                let column = self.column_of(node);
                self.nodes[column].size -= 1;
            }
        }
    }

    pub(crate) fn uncover_header(&mut self, header: usize) {
        // Each removed entry still holds the links it had when it was
        // unlinked, and those are only valid again once everything
        // unlinked after it has been put back.  So this walks the rows
        // bottom-up and each row right-to-left, the exact mirror of
        // cover_header.
        let mut row_node = header;
        loop {
            row_node = self.up(row_node);
            if row_node == header {
                break;
            }
            let mut node = row_node;
            loop {
                node = self.left(node);
                if node == row_node {
                    break;
                }
                let column = self.column_of(node);
                self.nodes[column].size += 1;
                self.relink_into_column(node);
            }
        }
        self.relink_into_row(header);
    }

    /// Covers every column of the row containing `node`, other than
    /// the column `node` itself is in, left to right.
    pub(crate) fn cover_row(&mut self, node: usize) {
        let mut row_node = node;
        loop {
            row_node = self.right(row_node);
            if row_node == node {
                break;
            }
            let header = self.column_of(row_node);
            self.cover_header(header);
        }
    }

    /// Undoes [`Matrix::cover_row`], right to left.
    pub(crate) fn uncover_row(&mut self, node: usize) {
        let mut row_node = node;
        loop {
            row_node = self.left(row_node);
            if row_node == node {
                break;
            }
            let header = self.column_of(row_node);
            self.uncover_header(header);
        }
    }

    /// Finds the active column header with the fewest entries; ties go
    /// to the first one in the active list.  Returns `None` if no column
    /// is active.
    pub(crate) fn min_column(&self) -> Option<usize> {
        let mut header = self.right(ROOT);
        if header == ROOT {
            return None;
        }

        let mut min_size = self.size(header);
        let mut min_header = header;
        while min_size > 0 {
            header = self.right(header);
            if header == ROOT {
                break;
            }
            let size = self.size(header);
            if size < min_size {
                min_size = size;
                min_header = header;
            }
        }
        Some(min_header)
    }

    /// Number of columns the matrix was created with.
    pub fn column_count(&self) -> usize {
        self.columns
    }

    /// Number of rows added so far, including empty ones.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of 1-entries across all rows.
    pub fn entry_count(&self) -> usize {
        self.nodes.len() - self.columns - 1
    }

    /// Number of entries currently linked into `column`.
    ///
    /// # Panics
    ///
    /// Panics if `column` is out of range.
    pub fn column_size(&self, column: usize) -> usize {
        self.check_column(column);
        self.size(header_index(column))
    }

    /// Whether `column` is in the active column list (i.e. not covered).
    ///
    /// # Panics
    ///
    /// Panics if `column` is out of range.
    pub fn is_column_active(&self, column: usize) -> bool {
        self.check_column(column);
        let header = header_index(column);
        self.right(self.left(header)) == header
    }

    /// The active columns, in list order.
    pub fn active_columns(&self) -> impl Iterator<Item = usize> + '_ {
        iter::successors(Some(self.right(ROOT)), |&header| Some(self.right(header)))
            .take_while(|&header| header != ROOT)
            .map(|header| header - 1)
    }

    /// Whether every column has been covered.
    pub fn is_solved(&self) -> bool {
        self.right(ROOT) == ROOT
    }

    /// The ids of all rows, in the order they were added.
    pub fn row_ids(&self) -> impl Iterator<Item = RowId> + '_ {
        self.rows.iter().map(|row| row.id)
    }

    /// The columns covered by row `row_id`, in the order they were
    /// given when the row was added, or `None` if there is no such row.
    pub fn row_columns(&self, row_id: RowId) -> Option<RowColumns> {
        let entry = &self.rows[*self.row_index.get(&row_id)?];
        let mut columns = RowColumns::new();
        if let Some(first) = entry.first {
            let mut node = first;
            loop {
                columns.push(self.column_of(node) - 1);
                node = self.right(node);
                if node == first {
                    break;
                }
            }
        }
        Some(columns)
    }
}
