//! Tree nodes and the handles used to address them.

use std::fmt::Debug;
use std::ops::{Add, Sub};

/// Arena slot index. `u32` keeps links small on 64-bit targets.
pub(crate) type Idx = u32;

/// Null link marker.
pub(crate) const NULL: Idx = Idx::MAX;

/// A quantity that can be stored in a node and summed over subtrees.
///
/// Character lengths, byte counts and rendered heights all qualify. Heights are floating point,
/// so only a partial order is required.
pub trait TreeValue:
    Copy + PartialOrd + Add<Output = Self> + Sub<Output = Self> + Default + Debug
{
}

impl<T> TreeValue for T where
    T: Copy + PartialOrd + Add<Output = T> + Sub<Output = T> + Default + Debug
{
}

/// Stable handle to a node in a [`RedBlackTree`](crate::RedBlackTree).
///
/// Handles survive rotations and the removal of other nodes. Once the node itself is removed,
/// its slot may be reused, but the generation differs, so the old handle never aliases the new
/// node. Handles are also plain values suitable as set members (see line change sets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    pub(crate) index: Idx,
    pub(crate) generation: u32,
}

impl NodeId {
    /// Raw slot index, useful for debugging output.
    pub fn slot(self) -> u32 {
        self.index
    }

    /// Generation of the slot at the time the node was created.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

/// Node color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Red node.
    Red,
    /// Black node.
    Black,
}

/// A node of the augmented red-black tree.
///
/// `total_value` and `total_count` cover the whole subtree rooted at this node, including the
/// node itself. They are maintained by the owning tree and are read-only from outside the crate.
#[derive(Debug, Clone)]
pub struct TreeNode<V, D> {
    pub(crate) value: V,
    pub(crate) total_value: V,
    pub(crate) total_count: usize,
    pub(crate) data: D,
    pub(crate) color: Color,
    pub(crate) parent: Idx,
    pub(crate) left: Idx,
    pub(crate) right: Idx,
}

impl<V: TreeValue, D> TreeNode<V, D> {
    pub(crate) fn new(value: V, data: D) -> Self {
        Self {
            value,
            total_value: value,
            total_count: 1,
            data,
            color: Color::Red,
            parent: NULL,
            left: NULL,
            right: NULL,
        }
    }

    /// The node's own contribution to the tree's value aggregate.
    pub fn value(&self) -> V {
        self.value
    }

    /// Sum of `value` over the subtree rooted at this node.
    pub fn total_value(&self) -> V {
        self.total_value
    }

    /// Number of nodes in the subtree rooted at this node.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// The node's payload.
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Mutable access to the payload.
    ///
    /// Intended for [`ChildrenAggregator`](crate::ChildrenAggregator)s that keep subtree totals
    /// inside the payload. Outside of an aggregator, prefer
    /// [`RedBlackTree::update_data`](crate::RedBlackTree::update_data), which re-runs the
    /// aggregators afterwards.
    pub fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    /// The node's color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Whether the node currently has a left child.
    pub fn has_left(&self) -> bool {
        self.left != NULL
    }

    /// Whether the node currently has a right child.
    pub fn has_right(&self) -> bool {
        self.right != NULL
    }

    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}
