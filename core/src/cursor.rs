//! Lazy, single-pass cursors over result rows.

use crate::Value;
use std::fmt;

/// A lazy cursor yielding rows one at a time.
///
/// A cursor can be consumed once. After `close` (or exhaustion) it yields
/// nothing further.
pub struct Cursor {
    rows: Box<dyn Iterator<Item = Value> + Send>,
    index: Option<usize>,
    open: bool,
}

impl Cursor {
    /// Create a cursor over any row source.
    pub fn new(rows: impl Iterator<Item = Value> + Send + 'static) -> Self {
        Self {
            rows: Box::new(rows),
            index: None,
            open: true,
        }
    }

    /// Create a cursor over already-materialized rows.
    pub fn from_rows(rows: Vec<Value>) -> Self {
        Self::new(rows.into_iter())
    }

    /// Create a cursor that yields nothing.
    pub fn empty() -> Self {
        Self::from_rows(Vec::new())
    }

    /// Returns true until the cursor is closed or exhausted.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Index of the last row fetched, if any.
    pub fn current_index(&self) -> Option<usize> {
        self.index
    }

    /// Release the row source.
    pub fn close(&mut self) {
        self.open = false;
        self.rows = Box::new(std::iter::empty());
    }
}

impl Iterator for Cursor {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        if !self.open {
            return None;
        }
        match self.rows.next() {
            Some(row) => {
                self.index = Some(self.index.map_or(0, |i| i + 1));
                Some(row)
            }
            None => {
                self.close();
                None
            }
        }
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("open", &self.open)
            .field("index", &self.index)
            .finish()
    }
}
