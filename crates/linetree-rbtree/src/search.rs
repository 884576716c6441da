//! Traversing search.
//!
//! A depth-first, order-preserving walk that asks the query whether each subtree is worth
//! visiting. Varying only the predicates lets the same walk answer "all lines overlapping a byte
//! range" and "all highlighted ranges overlapping a rect".

use crate::node::{Idx, NULL, NodeId, TreeNode, TreeValue};
use crate::query::Metric;
use crate::tree::RedBlackTree;

/// A node visited by [`RedBlackTree::search`], with its position along the search metric.
pub struct SearchCandidate<'a, V, D, O> {
    /// Handle of the node.
    pub id: NodeId,
    /// Offset at which the node starts.
    pub offset: O,
    /// The node's own contribution along the metric.
    pub value: O,
    /// The node itself.
    pub node: &'a TreeNode<V, D>,
}

impl<V, D, O: TreeValue> SearchCandidate<'_, V, D, O> {
    /// Offset just past the node.
    pub fn end(&self) -> O {
        self.offset + self.value
    }
}

/// Predicates driving a traversing search.
pub trait SearchQuery<V, D, O> {
    /// Whether nodes before `candidate` may match.
    fn should_traverse_left(&self, candidate: &SearchCandidate<'_, V, D, O>) -> bool;

    /// Whether `candidate` itself matches.
    fn is_match(&self, candidate: &SearchCandidate<'_, V, D, O>) -> bool;

    /// Whether nodes after `candidate` may match.
    fn should_traverse_right(&self, candidate: &SearchCandidate<'_, V, D, O>) -> bool;
}

/// A matching node: its span `[offset, end)` along the metric and its handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchMatch<O> {
    /// Offset at which the node starts.
    pub offset: O,
    /// Offset just past the node.
    pub end: O,
    /// Handle of the node.
    pub node: NodeId,
}

/// Matches every node whose span intersects the half-open range `[start, end)`.
///
/// An empty range matches nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeOverlapQuery<O> {
    /// Inclusive start of the range.
    pub start: O,
    /// Exclusive end of the range.
    pub end: O,
}

impl<O> RangeOverlapQuery<O> {
    /// Query for `[start, end)`.
    pub fn new(start: O, end: O) -> Self {
        Self { start, end }
    }
}

impl<V, D, O: TreeValue> SearchQuery<V, D, O> for RangeOverlapQuery<O> {
    fn should_traverse_left(&self, candidate: &SearchCandidate<'_, V, D, O>) -> bool {
        self.start < candidate.offset
    }

    fn is_match(&self, candidate: &SearchCandidate<'_, V, D, O>) -> bool {
        candidate.offset < self.end && self.start < candidate.end()
    }

    fn should_traverse_right(&self, candidate: &SearchCandidate<'_, V, D, O>) -> bool {
        candidate.end() < self.end
    }
}

impl<V: TreeValue, D> RedBlackTree<V, D> {
    /// Collect every node accepted by `query`, in order.
    ///
    /// Offsets are accumulated during the descent, so each visited node costs O(1).
    pub fn search<O, Q>(&self, metric: Metric<V, D, O>, query: &Q) -> Vec<SearchMatch<O>>
    where
        O: TreeValue,
        Q: SearchQuery<V, D, O> + ?Sized,
    {
        let mut matches = Vec::new();
        self.search_subtree(self.root_idx(), O::default(), metric, query, &mut matches);
        matches
    }

    fn search_subtree<O, Q>(
        &self,
        idx: Idx,
        base: O,
        metric: Metric<V, D, O>,
        query: &Q,
        matches: &mut Vec<SearchMatch<O>>,
    ) where
        O: TreeValue,
        Q: SearchQuery<V, D, O> + ?Sized,
    {
        let node = self.n(idx);
        let offset = if node.left != NULL {
            base + (metric.total)(self.n(node.left))
        } else {
            base
        };
        let candidate = SearchCandidate {
            id: self.id_of(idx),
            offset,
            value: (metric.value)(node),
            node,
        };
        if node.left != NULL && query.should_traverse_left(&candidate) {
            self.search_subtree(node.left, base, metric, query, matches);
        }
        if query.is_match(&candidate) {
            matches.push(SearchMatch {
                offset,
                end: candidate.end(),
                node: candidate.id,
            });
        }
        if node.right != NULL && query.should_traverse_right(&candidate) {
            self.search_subtree(node.right, candidate.end(), metric, query, matches);
        }
    }
}
