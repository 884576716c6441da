//! Row/column positions.

/// A zero-based position in the document: a line (`row`) and a character offset into that
/// line (`column`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LinePosition {
    /// Line index.
    pub row: usize,
    /// Offset in characters from the start of the line.
    pub column: usize,
}

impl LinePosition {
    /// Create a position.
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}
