//! A text buffer kept in sync with its line index.

use std::fmt;
use std::ops::Range;

use ropey::{Rope, RopeSlice};
use thiserror::Error;
use tracing::trace;

use crate::change_set::LineChangeSet;
use crate::config::LineIndexConfig;
use crate::line_ending::LineEnding;
use crate::line_index::LineIndex;
use crate::processing::{EditProcessor, TextEdit};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced when an edit does not fit the document.
pub enum EditError {
    #[error("offset {offset} is out of bounds (document has {len} characters)")]
    /// An insertion point lies past the end of the document.
    OffsetOutOfBounds {
        /// The requested offset.
        offset: usize,
        /// Length of the document in characters.
        len: usize,
    },

    #[error("range {start}..{end} is out of bounds (document has {len} characters)")]
    /// A range extends past the end of the document.
    RangeOutOfBounds {
        /// Start of the requested range.
        start: usize,
        /// End of the requested range.
        end: usize,
        /// Length of the document in characters.
        len: usize,
    },

    #[error("range start {start} is after its end {end}")]
    /// A range whose start lies after its end.
    InvertedRange {
        /// Start of the requested range.
        start: usize,
        /// End of the requested range.
        end: usize,
    },
}

/// A text buffer (a [`Rope`]) together with its [`LineIndex`].
///
/// Every edit is validated, applied to the text, then to the index, and finally passed to the
/// registered [`EditProcessor`]s.
pub struct Document {
    text: Rope,
    index: LineIndex,
    processors: Vec<Box<dyn EditProcessor>>,
}

impl Document {
    /// Create a document with the default configuration.
    pub fn new(text: &str) -> Self {
        Self::with_config(text, LineIndexConfig::default())
    }

    /// Create a document with a custom line index configuration.
    pub fn with_config(text: &str, config: LineIndexConfig) -> Self {
        let text = Rope::from_str(text);
        let index = LineIndex::from_source(&text, config);
        Self {
            text,
            index,
            processors: Vec::new(),
        }
    }

    /// Register a processor that sees every subsequent edit.
    pub fn add_processor(&mut self, processor: impl EditProcessor + 'static) {
        self.processors.push(Box::new(processor));
    }

    /// The full text.
    pub fn text(&self) -> &Rope {
        &self.text
    }

    /// The line index.
    pub fn line_index(&self) -> &LineIndex {
        &self.index
    }

    /// Mutable access to the line index, for updating line heights.
    pub fn line_index_mut(&mut self) -> &mut LineIndex {
        &mut self.index
    }

    /// Length in characters.
    pub fn char_count(&self) -> usize {
        self.text.len_chars()
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.index.line_count()
    }

    /// Text of the line at `row`, including its delimiter.
    pub fn line_text(&self, row: usize) -> Option<RopeSlice<'_>> {
        let line = self.index.line(row)?;
        let start = self.index.line_location(line);
        let end = start + self.index.metadata(line).total_length;
        Some(self.text.slice(start..end))
    }

    /// Dominant line ending, see [`LineEnding::detect`].
    pub fn line_ending(&self) -> Option<LineEnding> {
        LineEnding::detect(&self.index, &self.text)
    }

    /// Insert `text` at character offset `at`.
    pub fn insert_text(&mut self, text: &str, at: usize) -> Result<LineChangeSet, EditError> {
        self.replace_text(at..at, text)
    }

    /// Remove the characters in `range`.
    pub fn remove_text(&mut self, range: Range<usize>) -> Result<LineChangeSet, EditError> {
        self.replace_text(range, "")
    }

    /// Replace the characters in `range` with `text`.
    pub fn replace_text(
        &mut self,
        range: Range<usize>,
        text: &str,
    ) -> Result<LineChangeSet, EditError> {
        self.check_range(&range)?;
        trace!(start = range.start, end = range.end, inserted = text.len(), "applying edit");

        let mut changes = LineChangeSet::new();
        if !range.is_empty() {
            self.text.remove(range.clone());
            changes.form_union(&self.index.remove_text(&self.text, range.clone()));
        }
        if !text.is_empty() {
            self.text.insert(range.start, text);
            changes.form_union(&self.index.insert_text(&self.text, text, range.start));
        }
        if changes.is_empty() {
            return Ok(changes);
        }

        let edit = TextEdit {
            range,
            inserted_len: text.chars().count(),
        };
        for processor in &mut self.processors {
            changes.form_union(&processor.process(&edit, &self.index));
        }
        Ok(changes)
    }

    fn check_range(&self, range: &Range<usize>) -> Result<(), EditError> {
        let len = self.char_count();
        if range.start > range.end {
            return Err(EditError::InvertedRange {
                start: range.start,
                end: range.end,
            });
        }
        if range.is_empty() && range.start > len {
            return Err(EditError::OffsetOutOfBounds {
                offset: range.start,
                len,
            });
        }
        if range.end > len {
            return Err(EditError::RangeOutOfBounds {
                start: range.start,
                end: range.end,
                len,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("chars", &self.text.len_chars())
            .field("lines", &self.index.line_count())
            .field("processors", &self.processors.len())
            .finish()
    }
}
