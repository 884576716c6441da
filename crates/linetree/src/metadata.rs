//! Per-line metadata stored in the line tree, and the aggregators that roll it up.

use linetree_rbtree::{ChildrenAggregator, Metric, TreeNode};

/// Node type of the line tree: the value is the line's total length in characters.
pub type LineNode = TreeNode<usize, LineMetadata>;

/// Metadata of a single line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetadata {
    /// Length in characters, including the delimiter.
    pub total_length: usize,
    /// Length of the trailing delimiter: 0 (none), 1 (LF or CR) or 2 (CRLF).
    pub delimiter_length: usize,
    /// UTF-8 length in bytes, including the delimiter.
    pub byte_count: usize,
    /// Rendered height of the line.
    pub line_height: f64,
    /// Sum of `byte_count` over the subtree rooted at this line's node.
    pub node_total_byte_count: usize,
    /// Sum of `line_height` over the subtree rooted at this line's node.
    pub node_total_line_height: f64,
}

impl LineMetadata {
    /// Metadata for a line that is not yet linked into a tree.
    pub fn new(
        total_length: usize,
        delimiter_length: usize,
        byte_count: usize,
        line_height: f64,
    ) -> Self {
        debug_assert!(delimiter_length <= total_length);
        Self {
            total_length,
            delimiter_length,
            byte_count,
            line_height,
            node_total_byte_count: byte_count,
            node_total_line_height: line_height,
        }
    }

    /// An empty line without delimiter.
    pub fn empty(line_height: f64) -> Self {
        Self::new(0, 0, 0, line_height)
    }

    /// Length in characters, excluding the delimiter.
    pub fn length(&self) -> usize {
        self.total_length - self.delimiter_length
    }
}

/// Maintains [`LineMetadata::node_total_byte_count`].
pub fn byte_count_aggregator(
    node: &mut LineNode,
    left: Option<&LineNode>,
    right: Option<&LineNode>,
) -> bool {
    let total = node.data().byte_count
        + left.map_or(0, |n| n.data().node_total_byte_count)
        + right.map_or(0, |n| n.data().node_total_byte_count);
    if total != node.data().node_total_byte_count {
        node.data_mut().node_total_byte_count = total;
        true
    } else {
        false
    }
}

/// Maintains [`LineMetadata::node_total_line_height`].
pub fn line_height_aggregator(
    node: &mut LineNode,
    left: Option<&LineNode>,
    right: Option<&LineNode>,
) -> bool {
    let total = node.data().line_height
        + left.map_or(0.0, |n| n.data().node_total_line_height)
        + right.map_or(0.0, |n| n.data().node_total_line_height);
    if total != node.data().node_total_line_height {
        node.data_mut().node_total_line_height = total;
        true
    } else {
        false
    }
}

/// Aggregators installed on every line tree, after the built-in length and count totals.
pub(crate) const LINE_AGGREGATORS: [ChildrenAggregator<usize, LineMetadata>; 2] =
    [byte_count_aggregator, line_height_aggregator];

/// Characters, the tree's own value.
pub(crate) fn char_metric() -> Metric<usize, LineMetadata, usize> {
    Metric::tree_value()
}

/// UTF-8 bytes.
pub(crate) fn byte_metric() -> Metric<usize, LineMetadata, usize> {
    Metric::new(|n| n.data().byte_count, |n| n.data().node_total_byte_count)
}

/// Vertical offset.
pub(crate) fn height_metric() -> Metric<usize, LineMetadata, f64> {
    Metric::new(|n| n.data().line_height, |n| n.data().node_total_line_height)
}
