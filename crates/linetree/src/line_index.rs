//! Logical line index.
//!
//! Indexes a text by line with an augmented red-black tree. Each node is one line; its value is
//! the line's length in characters and its payload a [`LineMetadata`]. Subtree totals of
//! characters, bytes, lines and rendered height make every conversion between offsets, rows and
//! vertical positions O(log n).
//!
//! The index never owns the text. Edits are applied to the text first; the index is then told
//! what changed and reads the edited text back through a [`TextSource`].

use std::ops::Range;

use linetree_rbtree::{Iter, NodeId, RangeOverlapQuery, RedBlackTree, TreeInvariantError};
use tracing::{debug, trace};

use crate::change_set::LineChangeSet;
use crate::config::LineIndexConfig;
use crate::metadata::{LINE_AGGREGATORS, LineMetadata, byte_metric, char_metric, height_metric};
use crate::position::LinePosition;
use crate::source::TextSource;

/// Stable identity of a line.
///
/// Stays valid while the line exists, including across edits that move it. Lines listed in a
/// change set's removed lines are gone and their identities must not be used again.
pub type LineId = NodeId;

/// In-order iterator over the lines of a [`LineIndex`].
pub type Lines<'a> = Iter<'a, usize, LineMetadata>;

/// Logical line index.
#[derive(Debug, Clone)]
pub struct LineIndex {
    tree: RedBlackTree<usize, LineMetadata>,
    config: LineIndexConfig,
    initial_longest_line: Option<LineId>,
}

impl LineIndex {
    /// Index of an empty text: a single empty line.
    pub fn new(config: LineIndexConfig) -> Self {
        let tree = RedBlackTree::with_aggregators(
            0,
            0,
            LineMetadata::empty(config.estimated_line_height),
            &LINE_AGGREGATORS,
        );
        Self {
            tree,
            config,
            initial_longest_line: None,
        }
    }

    /// Build an index of `source` in one pass.
    pub fn from_source<S: TextSource + ?Sized>(source: &S, config: LineIndexConfig) -> Self {
        let mut index = Self::new(config);
        index.rebuild(source);
        index
    }

    /// Configuration the index was created with.
    pub fn config(&self) -> &LineIndexConfig {
        &self.config
    }

    /// Discard every line and index `source` from scratch.
    ///
    /// Runs in O(n) and yields a perfectly balanced tree. Every previously issued [`LineId`]
    /// becomes invalid. Also records the longest line, see
    /// [`initial_longest_line`](Self::initial_longest_line).
    pub fn rebuild<S: TextSource + ?Sized>(&mut self, source: &S) {
        let line_height = self.config.estimated_line_height;
        let (mut pieces, tail) = split_lines(source.chars_from(0));
        pieces.push(tail);
        let entries: Vec<(usize, LineMetadata)> = pieces
            .into_iter()
            .map(|piece| {
                let metadata = LineMetadata::new(
                    piece.total_length,
                    piece.delimiter_length,
                    piece.byte_count,
                    line_height,
                );
                (piece.total_length, metadata)
            })
            .collect();

        let mut longest = 0;
        for (row, (length, _)) in entries.iter().enumerate() {
            if *length > entries[longest].0 {
                longest = row;
            }
        }
        let ids = self.tree.rebuild(entries);
        self.initial_longest_line = ids.get(longest).copied();
        debug!(lines = ids.len(), "rebuilt line index");
    }

    /// Update the index after `text` was inserted at character offset `at`.
    ///
    /// `source` must already contain the inserted text. Lines split by new delimiters are
    /// reported as inserted; the line that received the text is reported as edited.
    ///
    /// # Panics
    ///
    /// Panics if `at` is past the end of the text the index describes.
    pub fn insert_text<S: TextSource + ?Sized>(
        &mut self,
        source: &S,
        text: &str,
        at: usize,
    ) -> LineChangeSet {
        if text.is_empty() {
            return LineChangeSet::new();
        }
        let char_count = self.char_count();
        assert!(
            at <= char_count,
            "insertion offset {at} is past the end of the indexed text ({char_count} characters)"
        );
        let inserted = text.chars().count();
        debug_assert_eq!(source.len_chars(), char_count + inserted);
        trace!(at, inserted, "inserting text");

        let line = self.line_at_offset(at);
        let start = self.line_location(line);
        let end = start + self.tree.value(line) + inserted;
        self.relayout(source, line, line, start, end)
    }

    /// Update the index after the characters in `range` were removed.
    ///
    /// `range` is expressed in offsets from before the removal and `source` must already lack
    /// the removed text. Lines whose delimiters were removed are merged into the line where the
    /// range starts and reported as removed; the surviving line is reported as edited.
    ///
    /// # Panics
    ///
    /// Panics if `range` is inverted or extends past the end of the indexed text.
    pub fn remove_text<S: TextSource + ?Sized>(
        &mut self,
        source: &S,
        range: Range<usize>,
    ) -> LineChangeSet {
        let char_count = self.char_count();
        assert!(
            range.start <= range.end && range.end <= char_count,
            "removal range {range:?} is outside the indexed text ({char_count} characters)"
        );
        if range.is_empty() {
            return LineChangeSet::new();
        }
        debug_assert_eq!(source.len_chars(), char_count - range.len());
        trace!(start = range.start, end = range.end, "removing text");

        let first = self.line_at_offset(range.start);
        let last = self.line_at_offset(range.end);
        let start = self.line_location(first);
        let end = self.line_location(last) + self.tree.value(last) - range.len();
        self.relayout(source, first, last, start, end)
    }

    /// Re-split the lines `first..=last`, which now cover `start..end` of `source`, at the
    /// delimiters found there. Existing nodes are reused in order, extra pieces become new
    /// lines and surplus nodes are removed.
    fn relayout<S: TextSource + ?Sized>(
        &mut self,
        source: &S,
        mut first: LineId,
        last: LineId,
        mut start: usize,
        end: usize,
    ) -> LineChangeSet {
        // An LF now directly following a line that ends in CR turns that line's delimiter into
        // CRLF, so the previous line takes part as well.
        if start > 0
            && source.chars_from(start - 1).take(2).eq(['\r', '\n'])
            && let Some(previous) = self.tree.previous(first)
        {
            first = previous;
            start -= self.tree.value(previous);
        }

        let mut existing = vec![first];
        let mut line = first;
        while line != last {
            let Some(next) = self.tree.next(line) else {
                break;
            };
            existing.push(next);
            line = next;
        }

        let (mut pieces, tail) = split_lines(source.chars_from(start).take(end - start));
        // The text after a final delimiter only forms a line of its own when the region reaches
        // the end of the document; otherwise the next, untouched line follows the delimiter.
        let reaches_end = existing.last() == Some(&self.tree.last());
        if tail.total_length > 0 || reaches_end || pieces.is_empty() {
            pieces.push(tail);
        }

        let mut changes = LineChangeSet::new();
        let mut anchor = first;
        for (row, piece) in pieces.iter().enumerate() {
            let LinePiece {
                total_length,
                delimiter_length,
                byte_count,
            } = *piece;
            if let Some(&line) = existing.get(row) {
                self.tree.update_data(line, |data| {
                    data.total_length = total_length;
                    data.delimiter_length = delimiter_length;
                    data.byte_count = byte_count;
                });
                self.tree.set_value(line, total_length);
                changes.mark_edited(line);
                anchor = line;
            } else {
                let metadata = LineMetadata::new(
                    total_length,
                    delimiter_length,
                    byte_count,
                    self.config.estimated_line_height,
                );
                anchor = self.tree.insert_after(anchor, total_length, metadata);
                changes.mark_inserted(anchor);
            }
        }
        for &line in existing.iter().skip(pieces.len()) {
            self.tree.remove(line);
            changes.mark_removed(line);
        }

        let inserted = pieces.len().saturating_sub(existing.len());
        let removed = existing.len().saturating_sub(pieces.len());
        if inserted > 0 || removed > 0 {
            debug!(inserted, removed, lines = self.line_count(), "line structure changed");
        }
        changes
    }

    /// Line containing `offset`, which must be within the text.
    fn line_at_offset(&self, offset: usize) -> LineId {
        match self.tree.node_containing_value(offset) {
            Some(line) => line,
            None => panic!("offset {offset} is outside the indexed text"),
        }
    }

    // --- Totals ---

    /// Number of lines. Never zero.
    pub fn line_count(&self) -> usize {
        self.tree.len()
    }

    /// Length of the text in characters.
    pub fn char_count(&self) -> usize {
        self.tree.total_value()
    }

    /// Length of the text in UTF-8 bytes.
    pub fn byte_count(&self) -> usize {
        self.root_metadata().node_total_byte_count
    }

    /// Sum of all line heights.
    pub fn content_height(&self) -> f64 {
        self.root_metadata().node_total_line_height
    }

    fn root_metadata(&self) -> &LineMetadata {
        self.tree.data(self.tree.root())
    }

    // --- Lines ---

    /// The first line.
    pub fn first_line(&self) -> LineId {
        self.tree.first()
    }

    /// The last line.
    pub fn last_line(&self) -> LineId {
        self.tree.last()
    }

    /// All lines, in document order.
    pub fn lines(&self) -> Lines<'_> {
        self.tree.iter()
    }

    /// Line at `row`, or `None` past the last line.
    pub fn line(&self, row: usize) -> Option<LineId> {
        self.tree.node_at(row)
    }

    /// Whether `line` still exists.
    pub fn contains(&self, line: LineId) -> bool {
        self.tree.contains(line)
    }

    /// The line after `line`.
    pub fn next_line(&self, line: LineId) -> Option<LineId> {
        self.tree.next(line)
    }

    /// The line before `line`.
    pub fn previous_line(&self, line: LineId) -> Option<LineId> {
        self.tree.previous(line)
    }

    /// Metadata of `line`.
    ///
    /// # Panics
    ///
    /// Panics if `line` no longer exists.
    pub fn metadata(&self, line: LineId) -> &LineMetadata {
        self.tree.data(line)
    }

    /// Row of `line`.
    pub fn row_of(&self, line: LineId) -> usize {
        self.tree.index_of(line)
    }

    /// Character offset at which `line` starts.
    pub fn line_location(&self, line: LineId) -> usize {
        self.tree.offset_of_with(line, 0, char_metric())
    }

    /// Byte offset at which `line` starts.
    pub fn line_byte_offset(&self, line: LineId) -> usize {
        self.tree.offset_of_with(line, 0, byte_metric())
    }

    /// Vertical position of the top of `line`.
    pub fn line_y_position(&self, line: LineId) -> f64 {
        self.tree.offset_of_with(line, 0.0, height_metric())
    }

    /// Update the rendered height of `line`. Returns whether it changed.
    pub fn set_line_height(&mut self, line: LineId, line_height: f64) -> bool {
        if self.tree.data(line).line_height == line_height {
            return false;
        }
        self.tree.update_data(line, |data| data.line_height = line_height);
        true
    }

    /// Longest line found by the last [`rebuild`](Self::rebuild).
    ///
    /// Not maintained by edits, so it only hints at the content width of a freshly loaded
    /// text. `None` if the index was never rebuilt or the line has since been removed.
    pub fn initial_longest_line(&self) -> Option<LineId> {
        self.initial_longest_line
            .filter(|line| self.tree.contains(*line))
    }

    // --- Offset queries ---

    /// Line containing the character at `offset`.
    ///
    /// The end of the text resolves to the last line; offsets past it yield `None`.
    pub fn line_containing_character_at(&self, offset: usize) -> Option<LineId> {
        self.tree.node_containing_value(offset)
    }

    /// Line containing the byte at `byte_offset`, with the same end-of-text rule.
    pub fn line_containing_byte_at(&self, byte_offset: usize) -> Option<LineId> {
        self.tree.node_containing(byte_offset, 0, byte_metric())
    }

    /// Line covering the vertical position `y_offset`, with the same end-of-text rule.
    ///
    /// Heights are summed in floating point, so the descent can fall off the end for offsets
    /// just below [`content_height`](Self::content_height); those resolve to the last line.
    pub fn line_containing_y_offset(&self, y_offset: f64) -> Option<LineId> {
        if y_offset < 0.0 {
            return None;
        }
        self.tree
            .node_containing(y_offset, 0.0, height_metric())
            .or_else(|| (y_offset < self.content_height()).then(|| self.last_line()))
    }

    /// Row and column of the character offset `offset`.
    pub fn line_position(&self, offset: usize) -> Option<LinePosition> {
        let line = self.line_containing_character_at(offset)?;
        Some(LinePosition::new(
            self.row_of(line),
            offset - self.line_location(line),
        ))
    }

    /// Character offset of `position`.
    ///
    /// The column may point anywhere inside the line, including its delimiter, but not past
    /// it; `None` for rows or columns outside the text.
    pub fn location(&self, position: LinePosition) -> Option<usize> {
        let line = self.line(position.row)?;
        let metadata = self.metadata(line);
        let within = position.column < metadata.total_length
            || (position.column == metadata.total_length && metadata.delimiter_length == 0);
        within.then(|| self.line_location(line) + position.column)
    }

    // --- Range queries ---

    /// Lines touched by the character range `range`, in order.
    ///
    /// An empty range yields the line containing its start.
    pub fn lines_in(&self, range: Range<usize>) -> Vec<LineId> {
        let Some(first) = self.line_containing_character_at(range.start) else {
            return Vec::new();
        };
        let mut lines = vec![first];
        if range.is_empty() {
            return lines;
        }
        let Some(last) = self.line_containing_character_at(range.end) else {
            return lines;
        };
        let mut line = first;
        while line != last {
            match self.tree.next(line) {
                Some(next) => {
                    lines.push(next);
                    line = next;
                }
                None => break,
            }
        }
        lines
    }

    /// Lines whose bytes intersect `range`, found with a pruned traversal.
    ///
    /// An empty range yields nothing.
    pub fn lines_overlapping_byte_range(&self, range: Range<usize>) -> Vec<LineId> {
        self.tree
            .search(byte_metric(), &RangeOverlapQuery::new(range.start, range.end))
            .into_iter()
            .map(|found| found.node)
            .collect()
    }

    /// Lines whose vertical extent intersects `range`, for example a viewport.
    pub fn lines_in_y_range(&self, range: Range<f64>) -> Vec<LineId> {
        self.tree
            .search(height_metric(), &RangeOverlapQuery::new(range.start, range.end))
            .into_iter()
            .map(|found| found.node)
            .collect()
    }

    /// Lines containing the start and the end of `range`.
    pub fn start_and_end_line(&self, range: Range<usize>) -> Option<(LineId, LineId)> {
        let start = self.line_containing_character_at(range.start)?;
        if range.is_empty() {
            return Some((start, start));
        }
        let end = self.line_containing_character_at(range.end)?;
        Some((start, end))
    }

    /// Check the invariants of the underlying tree.
    pub fn validate(&self) -> Result<(), TreeInvariantError> {
        self.tree.validate()
    }
}

/// One line found while scanning text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct LinePiece {
    total_length: usize,
    delimiter_length: usize,
    byte_count: usize,
}

/// Split `chars` at every delimiter in a single pass.
///
/// Returns the terminated lines and the unterminated remainder after the last delimiter,
/// which may be empty.
fn split_lines(chars: impl Iterator<Item = char>) -> (Vec<LinePiece>, LinePiece) {
    let mut pieces = Vec::new();
    let mut current = LinePiece::default();
    let mut chars = chars.peekable();
    while let Some(ch) = chars.next() {
        current.total_length += 1;
        current.byte_count += ch.len_utf8();
        current.delimiter_length = match ch {
            '\n' => 1,
            '\r' if chars.next_if_eq(&'\n').is_some() => {
                current.total_length += 1;
                current.byte_count += 1;
                2
            }
            '\r' => 1,
            _ => continue,
        };
        pieces.push(current);
        current = LinePiece::default();
    }
    (pieces, current)
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new(LineIndexConfig::default())
    }
}
