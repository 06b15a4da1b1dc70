//! Pull-based batch iteration over a materialized result set

/// Rows of one query, handed out in batches
///
/// The full row vector is materialized by the pipeline before the first
/// batch is requested; the set only tracks a read cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResultSet<R> {
    rows: Vec<R>,
    cursor: usize,
}

impl<R> Default for QueryResultSet<R> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<R> QueryResultSet<R> {
    /// Wrap decoded rows
    pub fn new(rows: Vec<R>) -> Self {
        Self { rows, cursor: 0 }
    }

    /// Total row count
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the query produced no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows not yet handed out by [`next_batch`](Self::next_batch)
    pub fn remaining(&self) -> usize {
        self.rows.len() - self.cursor
    }

    /// Up to `size` next rows, or `None` once exhausted
    ///
    /// A `size` of zero is treated as one.
    pub fn next_batch(&mut self, size: usize) -> Option<&[R]> {
        if self.cursor >= self.rows.len() {
            return None;
        }
        let start = self.cursor;
        let end = start.saturating_add(size.max(1)).min(self.rows.len());
        self.cursor = end;
        Some(&self.rows[start..end])
    }

    /// Iterate the unread rows in batches of `size` without advancing the cursor
    pub fn batches(&self, size: usize) -> std::slice::Chunks<'_, R> {
        self.rows[self.cursor..].chunks(size.max(1))
    }

    /// Rewind to the first row
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// All rows, regardless of the cursor
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Take ownership of all rows
    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }
}

impl<R> From<Vec<R>> for QueryResultSet<R> {
    fn from(rows: Vec<R>) -> Self {
        Self::new(rows)
    }
}

impl<R> IntoIterator for QueryResultSet<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
