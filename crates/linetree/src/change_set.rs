//! Line change sets.
//!
//! Every edit applied to a [`LineIndex`](crate::LineIndex) reports which lines it inserted,
//! removed or edited. Consumers such as a layout cache drop removed lines and re-measure
//! edited ones. A line appears in at most one of the three sets.

use rustc_hash::FxHashSet;

use crate::LineId;

/// Lines inserted, removed and edited by one logical edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineChangeSet {
    inserted: FxHashSet<LineId>,
    removed: FxHashSet<LineId>,
    edited: FxHashSet<LineId>,
}

impl LineChangeSet {
    /// An empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `line` as inserted. Clears any earlier removed or edited mark.
    pub fn mark_inserted(&mut self, line: LineId) {
        self.removed.remove(&line);
        self.edited.remove(&line);
        self.inserted.insert(line);
    }

    /// Record `line` as removed. Clears any earlier inserted or edited mark.
    pub fn mark_removed(&mut self, line: LineId) {
        self.inserted.remove(&line);
        self.edited.remove(&line);
        self.removed.insert(line);
    }

    /// Record `line` as edited, unless it is already marked inserted or removed.
    pub fn mark_edited(&mut self, line: LineId) {
        if !self.inserted.contains(&line) && !self.removed.contains(&line) {
            self.edited.insert(line);
        }
    }

    /// Per-category union of two change sets.
    pub fn union(&self, other: &LineChangeSet) -> LineChangeSet {
        let mut merged = self.clone();
        merged.form_union(other);
        merged
    }

    /// In-place [`union`](Self::union).
    ///
    /// Lines are merged through the marking rules, so the result stays disjoint: a line edited
    /// on one side and inserted or removed on the other ends up inserted or removed.
    pub fn form_union(&mut self, other: &LineChangeSet) {
        for &line in &other.inserted {
            self.mark_inserted(line);
        }
        for &line in &other.removed {
            self.mark_removed(line);
        }
        for &line in &other.edited {
            self.mark_edited(line);
        }
    }

    /// Lines created by the edit.
    pub fn inserted_lines(&self) -> &FxHashSet<LineId> {
        &self.inserted
    }

    /// Lines destroyed by the edit. Their handles are no longer valid.
    pub fn removed_lines(&self) -> &FxHashSet<LineId> {
        &self.removed
    }

    /// Pre-existing lines whose content changed.
    pub fn edited_lines(&self) -> &FxHashSet<LineId> {
        &self.edited
    }

    /// Whether no line was touched.
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.removed.is_empty() && self.edited.is_empty()
    }
}
