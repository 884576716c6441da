//! Edit processing interfaces.
//!
//! Collaborators that keep derived per-line state (a syntax re-parser, a layout cache) register
//! an [`EditProcessor`] with a [`Document`](crate::Document). After every edit the document
//! hands each processor the applied [`TextEdit`] and the updated [`LineIndex`]; the line change
//! sets the processors return are merged into the one reported to the caller.

use std::ops::Range;

use crate::change_set::LineChangeSet;
use crate::line_index::LineIndex;

/// An edit as it was applied to a document (char offsets).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Replaced range, in offsets from before the edit.
    pub range: Range<usize>,
    /// Number of characters inserted at `range.start`.
    pub inserted_len: usize,
}

impl TextEdit {
    /// A pure insertion of `inserted_len` characters at `at`.
    pub fn insertion(at: usize, inserted_len: usize) -> Self {
        Self {
            range: at..at,
            inserted_len,
        }
    }

    /// A pure removal of `range`.
    pub fn removal(range: Range<usize>) -> Self {
        Self {
            range,
            inserted_len: 0,
        }
    }

    /// Number of characters removed.
    pub fn removed_len(&self) -> usize {
        self.range.len()
    }

    /// Range covered by the inserted text, in offsets from after the edit.
    pub fn new_range(&self) -> Range<usize> {
        self.range.start..self.range.start + self.inserted_len
    }

    /// Change in document length.
    pub fn delta(&self) -> isize {
        self.inserted_len as isize - self.removed_len() as isize
    }
}

/// A collaborator reacting to applied edits.
pub trait EditProcessor {
    /// React to `edit`, which has already been applied to `index`.
    ///
    /// Returns the lines the processor itself considers changed, for example lines whose
    /// highlighting shifted beyond the edited range. Return an empty set if none.
    fn process(&mut self, edit: &TextEdit, index: &LineIndex) -> LineChangeSet;
}

impl<F> EditProcessor for F
where
    F: FnMut(&TextEdit, &LineIndex) -> LineChangeSet,
{
    fn process(&mut self, edit: &TextEdit, index: &LineIndex) -> LineChangeSet {
        self(edit, index)
    }
}
