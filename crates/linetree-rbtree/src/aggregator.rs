//! Subtree aggregate maintenance.
//!
//! An aggregator recomputes one cached total of a node from the node's own contribution and the
//! (already correct) totals of its children, writes it back if it differs and reports whether it
//! changed. The tree always runs [`total_value_aggregator`] and [`total_count_aggregator`], then
//! any aggregators supplied at construction, so several coordinate systems are refreshed in a
//! single upward walk.

use crate::node::{TreeNode, TreeValue};

/// Recomputes aggregates of `node` from its children. Returns `true` if anything changed.
pub type ChildrenAggregator<V, D> =
    fn(
        node: &mut TreeNode<V, D>,
        left: Option<&TreeNode<V, D>>,
        right: Option<&TreeNode<V, D>>,
    ) -> bool;

/// Maintains [`TreeNode::total_value`].
pub fn total_value_aggregator<V: TreeValue, D>(
    node: &mut TreeNode<V, D>,
    left: Option<&TreeNode<V, D>>,
    right: Option<&TreeNode<V, D>>,
) -> bool {
    let mut total = node.value;
    if let Some(left) = left {
        total = total + left.total_value;
    }
    if let Some(right) = right {
        total = total + right.total_value;
    }
    if total != node.total_value {
        node.total_value = total;
        true
    } else {
        false
    }
}

/// Maintains [`TreeNode::total_count`].
pub fn total_count_aggregator<V: TreeValue, D>(
    node: &mut TreeNode<V, D>,
    left: Option<&TreeNode<V, D>>,
    right: Option<&TreeNode<V, D>>,
) -> bool {
    let total = 1 + left.map_or(0, |n| n.total_count) + right.map_or(0, |n| n.total_count);
    if total != node.total_count {
        node.total_count = total;
        true
    } else {
        false
    }
}

/// Runs every aggregator in order. All of them run even after one reports a change, since each
/// maintains a different field.
pub(crate) fn run_all<V, D>(
    aggregators: &[ChildrenAggregator<V, D>],
    node: &mut TreeNode<V, D>,
    left: Option<&TreeNode<V, D>>,
    right: Option<&TreeNode<V, D>>,
) -> bool {
    let mut changed = false;
    for aggregate in aggregators {
        changed |= aggregate(node, left, right);
    }
    changed
}
