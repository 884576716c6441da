//! Offset queries.
//!
//! Two complementary walks: descending from the root to the node that contains an offset, and
//! ascending from a node to the offset at which it starts. Both are parameterized by a
//! [`Metric`], so one tree answers queries in several coordinate systems (characters, bytes,
//! vertical pixels, rank) without duplicating the algorithms.

use crate::node::{NULL, NodeId, TreeNode, TreeValue};
use crate::tree::RedBlackTree;

/// Selects which per-node quantity and which subtree aggregate a query walks over.
pub struct Metric<V, D, O> {
    /// The node's own contribution.
    pub value: fn(&TreeNode<V, D>) -> O,
    /// The aggregate of the node's subtree.
    pub total: fn(&TreeNode<V, D>) -> O,
}

impl<V, D, O> Clone for Metric<V, D, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V, D, O> Copy for Metric<V, D, O> {}

impl<V, D, O> Metric<V, D, O> {
    /// Build a metric from a pair of accessors.
    pub const fn new(value: fn(&TreeNode<V, D>) -> O, total: fn(&TreeNode<V, D>) -> O) -> Self {
        Self { value, total }
    }
}

impl<V: TreeValue, D> Metric<V, D, V> {
    /// The tree's own value and `total_value`.
    pub fn tree_value() -> Self {
        Self::new(TreeNode::value, TreeNode::total_value)
    }
}

impl<V: TreeValue, D> Metric<V, D, usize> {
    /// Rank: every node counts as one.
    pub fn node_count() -> Self {
        Self::new(|_| 1, TreeNode::total_count)
    }
}

impl<V: TreeValue, D> RedBlackTree<V, D> {
    /// Find the node containing `target` along `metric`.
    ///
    /// A node starting at `s` with contribution `c` contains offsets in `[s, s + c)`, shifted by
    /// the `minimum` floor. When `target` equals the total of the whole tree the rightmost node
    /// is returned, so the end of a document resolves to its last line. This convention is
    /// shared with AvalonEdit's line tree and callers rely on it. Offsets beyond the total
    /// yield `None`.
    pub fn node_containing<O: TreeValue>(
        &self,
        target: O,
        minimum: O,
        metric: Metric<V, D, O>,
    ) -> Option<NodeId> {
        let root = self.root_idx();
        if target == (metric.total)(self.n(root)) {
            return Some(self.id_of(self.rightmost(root)));
        }
        let mut remainder = target;
        let mut idx = root;
        loop {
            let node = self.n(idx);
            if node.left != NULL {
                let left_total = (metric.total)(self.n(node.left));
                if remainder < left_total {
                    idx = node.left;
                    continue;
                }
                remainder = remainder - left_total;
            }
            let own = (metric.value)(node);
            // Equivalent to `remainder - own < minimum` without leaving the domain of
            // unsigned values.
            if remainder < own + minimum {
                return Some(self.id_of(idx));
            }
            remainder = remainder - own;
            if node.right == NULL {
                return None;
            }
            idx = node.right;
        }
    }

    /// [`node_containing`](Self::node_containing) over the tree's own values.
    pub fn node_containing_value(&self, target: V) -> Option<NodeId> {
        self.node_containing(target, self.minimum_value(), Metric::tree_value())
    }

    /// Offset at which `id` starts along `metric`.
    ///
    /// Walks from the node to the root, adding the left sibling subtree and the parent itself
    /// whenever the walk leaves a right child. `minimum` is the origin used when the node has
    /// no left subtree.
    pub fn offset_of_with<O: TreeValue>(
        &self,
        id: NodeId,
        minimum: O,
        metric: Metric<V, D, O>,
    ) -> O {
        let mut current = self.resolve(id);
        let node = self.n(current);
        let mut offset = if node.left != NULL {
            (metric.total)(self.n(node.left))
        } else {
            minimum
        };
        loop {
            let parent = self.n(current).parent;
            if parent == NULL {
                return offset;
            }
            let parent_node = self.n(parent);
            if parent_node.right == current {
                if parent_node.left != NULL {
                    offset = offset + (metric.total)(self.n(parent_node.left));
                }
                offset = offset + (metric.value)(parent_node);
            }
            current = parent;
        }
    }

    /// Offset at which `id` starts along the tree's own values.
    pub fn offset_of(&self, id: NodeId) -> V {
        self.offset_of_with(id, self.minimum_value(), Metric::tree_value())
    }

    /// Rank of `id` in order.
    pub fn index_of(&self, id: NodeId) -> usize {
        self.offset_of_with(id, 0, Metric::node_count())
    }

    /// Node at rank `index`, or `None` if out of range.
    pub fn node_at(&self, index: usize) -> Option<NodeId> {
        if index >= self.len() {
            return None;
        }
        self.node_containing(index, 0, Metric::node_count())
    }
}
