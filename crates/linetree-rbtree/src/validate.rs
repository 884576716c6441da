//! Structural self-checks.
//!
//! Used by the test suites after every mutation, and available to callers that want to assert
//! the tree is healthy in debug builds.

use thiserror::Error;

use crate::aggregator::run_all;
use crate::node::{Idx, NULL, NodeId, TreeValue};
use crate::tree::RedBlackTree;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// A violated red-black or aggregate invariant.
pub enum TreeInvariantError {
    #[error("root node is red")]
    /// The root is red.
    RedRoot,

    #[error("root node has a parent")]
    /// The root has a parent link.
    RootHasParent,

    #[error("red node {node:?} has a red child")]
    /// A red node has a red child.
    RedViolation {
        /// The offending child.
        node: NodeId,
    },

    #[error("black height mismatch below {node:?}: left {left}, right {right}")]
    /// The two subtrees of a node carry different numbers of black nodes.
    BlackHeightMismatch {
        /// The node whose subtrees disagree.
        node: NodeId,
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },

    #[error("node {node:?} does not link back to its parent")]
    /// A child does not point back at its parent.
    BrokenParentLink {
        /// The child with the wrong parent link.
        node: NodeId,
    },

    #[error("stale aggregate on node {node:?}")]
    /// A cached subtree aggregate differs from what its children imply.
    StaleAggregate {
        /// The node holding the stale total.
        node: NodeId,
    },

    #[error("root reports {reported} nodes but {actual} are live")]
    /// The root's node count disagrees with the number of live nodes.
    CountMismatch {
        /// `total_count` of the root.
        reported: usize,
        /// Nodes actually allocated.
        actual: usize,
    },
}

impl<V: TreeValue, D: Clone> RedBlackTree<V, D> {
    /// Check every red-black and aggregate invariant.
    ///
    /// O(n). Aggregates are verified by re-running the aggregator chain on a copy of each node.
    pub fn validate(&self) -> Result<(), TreeInvariantError> {
        let root = self.root_idx();
        let root_node = self.n(root);
        if root_node.is_red() {
            return Err(TreeInvariantError::RedRoot);
        }
        if root_node.parent != NULL {
            return Err(TreeInvariantError::RootHasParent);
        }
        self.check_subtree(root)?;

        let actual = self.live_count();
        if root_node.total_count != actual {
            return Err(TreeInvariantError::CountMismatch {
                reported: root_node.total_count,
                actual,
            });
        }
        Ok(())
    }

    /// Returns the black height of the subtree, counting the null leaves.
    fn check_subtree(&self, idx: Idx) -> Result<usize, TreeInvariantError> {
        if idx == NULL {
            return Ok(1);
        }
        let node = self.n(idx);
        for child in [node.left, node.right] {
            if child == NULL {
                continue;
            }
            let child_node = self.n(child);
            if child_node.parent != idx {
                return Err(TreeInvariantError::BrokenParentLink {
                    node: self.id_of(child),
                });
            }
            if node.is_red() && child_node.is_red() {
                return Err(TreeInvariantError::RedViolation {
                    node: self.id_of(child),
                });
            }
        }

        let left = self.check_subtree(node.left)?;
        let right = self.check_subtree(node.right)?;
        if left != right {
            return Err(TreeInvariantError::BlackHeightMismatch {
                node: self.id_of(idx),
                left,
                right,
            });
        }

        let mut copy = node.clone();
        let left_node = (node.left != NULL).then(|| self.n(node.left));
        let right_node = (node.right != NULL).then(|| self.n(node.right));
        if run_all(self.aggregators(), &mut copy, left_node, right_node) {
            return Err(TreeInvariantError::StaleAggregate {
                node: self.id_of(idx),
            });
        }

        Ok(left + usize::from(!node.is_red()))
    }
}

impl<V: TreeValue, D> RedBlackTree<V, D> {
    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        self.subtree_depth(self.root_idx())
    }

    fn subtree_depth(&self, idx: Idx) -> usize {
        if idx == NULL {
            return 0;
        }
        let node = self.n(idx);
        1 + self.subtree_depth(node.left).max(self.subtree_depth(node.right))
    }
}
