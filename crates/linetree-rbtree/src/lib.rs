#![warn(missing_docs)]
//! Linetree RB-Tree - Augmented Red-Black Tree for Positional Indexes
//!
//! # Overview
//!
//! `linetree-rbtree` provides a self-balancing binary tree whose order is positional rather than
//! key-based. Every node carries an additive `value` (for example the character length of one
//! line of text) and caches the sum of that value, and the number of nodes, over its whole
//! subtree. Extra aggregates can be maintained over the node payload by plugging in
//! [`ChildrenAggregator`] functions at construction time, so one tree can answer offset queries
//! in several coordinate systems at once.
//!
//! # Core Features
//!
//! - **Arena storage**: nodes live in one `Vec` and link by index; [`NodeId`] handles are
//!   generational and stay valid across rotations and unrelated removals
//! - **O(log n) edits**: insertion before/after any node and removal, with red-black fixups
//! - **Short-circuit aggregation**: totals are refreshed bottom-up and stop at the first
//!   unchanged ancestor
//! - **Offset queries**: node containing an offset, and offset of a node, for any [`Metric`]
//! - **Traversing search**: pruned in-order walks driven by a [`SearchQuery`]
//! - **Balanced rebuild**: bulk load n nodes in O(n)
//!
//! # Quick Start
//!
//! ```rust
//! use linetree_rbtree::RedBlackTree;
//!
//! // Three "lines" of length 4, 0 and 6.
//! let mut tree = RedBlackTree::new(0usize, 4, "first");
//! let second = tree.insert(0, "second");
//! let third = tree.insert(6, "third");
//!
//! assert_eq!(tree.len(), 3);
//! assert_eq!(tree.total_value(), 10);
//! assert_eq!(tree.offset_of(third), 4);
//! assert_eq!(tree.node_containing_value(5), Some(third));
//! assert_eq!(tree.index_of(second), 1);
//! ```
//!
//! # Module Description
//!
//! - [`node`] - Nodes, handles and the value trait
//! - [`aggregator`] - Subtree aggregate maintenance
//! - [`tree`] - The tree itself: structure, rebalancing, iteration
//! - [`query`] - Offset-to-node and node-to-offset queries
//! - [`search`] - Traversing search
//! - [`validate`] - Invariant checks

pub mod aggregator;
pub mod node;
pub mod query;
pub mod search;
pub mod tree;
pub mod validate;

pub use aggregator::{ChildrenAggregator, total_count_aggregator, total_value_aggregator};
pub use node::{Color, NodeId, TreeNode, TreeValue};
pub use query::Metric;
pub use search::{RangeOverlapQuery, SearchCandidate, SearchMatch, SearchQuery};
pub use tree::{Iter, RedBlackTree};
pub use validate::TreeInvariantError;
