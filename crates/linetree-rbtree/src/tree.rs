//! Arena-backed augmented red-black tree.
//!
//! Nodes live in a single `Vec` of slots and link to each other by index. The order of the
//! nodes is positional: a node's "key" is its rank, and callers insert relative to existing
//! nodes. After any structural change the aggregator chain runs from the touched node towards
//! the root and stops at the first level whose totals did not change.

use std::fmt;

use crate::aggregator::{
    ChildrenAggregator, run_all, total_count_aggregator, total_value_aggregator,
};
use crate::node::{Color, Idx, NULL, NodeId, TreeNode, TreeValue};

#[derive(Debug, Clone)]
struct Slot<V, D> {
    generation: u32,
    node: Option<TreeNode<V, D>>,
}

/// Augmented red-black tree keyed by position.
///
/// The tree is never empty. It starts with a single root node, mirroring a document that always
/// has at least one (possibly empty) line.
#[derive(Clone)]
pub struct RedBlackTree<V, D> {
    slots: Vec<Slot<V, D>>,
    free_list: Vec<Idx>,
    root: Idx,
    minimum_value: V,
    aggregators: Vec<ChildrenAggregator<V, D>>,
}

impl<V: TreeValue, D> RedBlackTree<V, D> {
    /// Create a tree holding a single root node.
    ///
    /// `minimum_value` is the origin of the value axis (zero for lengths) and is used as the
    /// tie-break floor of offset queries.
    pub fn new(minimum_value: V, root_value: V, root_data: D) -> Self {
        Self::with_aggregators(minimum_value, root_value, root_data, &[])
    }

    /// Create a tree that additionally runs `aggregators` whenever a node's children change.
    ///
    /// The built-in value and count totals always run first.
    pub fn with_aggregators(
        minimum_value: V,
        root_value: V,
        root_data: D,
        aggregators: &[ChildrenAggregator<V, D>],
    ) -> Self {
        let mut chain: Vec<ChildrenAggregator<V, D>> = Vec::with_capacity(2 + aggregators.len());
        chain.push(total_value_aggregator);
        chain.push(total_count_aggregator);
        chain.extend_from_slice(aggregators);

        let mut tree = Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            root: NULL,
            minimum_value,
            aggregators: chain,
        };
        tree.install_root(root_value, root_data);
        tree
    }

    /// Drop every node and start over with a single root.
    ///
    /// All previously issued [`NodeId`]s become stale.
    pub fn reset(&mut self, root_value: V, root_data: D) {
        self.vacate_all();
        self.install_root(root_value, root_data);
    }

    /// Replace the contents of the tree with `entries`, in order, as a perfectly balanced tree.
    ///
    /// Runs in O(n). Returns the handles of the new nodes in the same order. All previously
    /// issued [`NodeId`]s become stale.
    ///
    /// # Panics
    ///
    /// Panics if `entries` is empty, since the tree always holds at least one node.
    pub fn rebuild<I>(&mut self, entries: I) -> Vec<NodeId>
    where
        I: IntoIterator<Item = (V, D)>,
    {
        self.vacate_all();
        let nodes: Vec<Idx> = entries
            .into_iter()
            .map(|(value, data)| self.alloc(value, data))
            .collect();
        assert!(!nodes.is_empty(), "cannot rebuild a tree from an empty set of nodes");

        let height = subtree_height(nodes.len());
        self.root = self.build_balanced(&nodes, height);
        self.n_mut(self.root).parent = NULL;
        self.n_mut(self.root).color = Color::Black;
        nodes.into_iter().map(|idx| self.id_of(idx)).collect()
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.n(self.root).total_count
    }

    /// Always `false`: the tree holds at least its root. Provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Sum of all node values.
    pub fn total_value(&self) -> V {
        self.n(self.root).total_value
    }

    /// Origin of the value axis.
    pub fn minimum_value(&self) -> V {
        self.minimum_value
    }

    /// Handle of the current root.
    pub fn root(&self) -> NodeId {
        self.id_of(self.root)
    }

    /// Whether `id` refers to a live node of this tree.
    pub fn contains(&self, id: NodeId) -> bool {
        self.slots
            .get(id.index as usize)
            .is_some_and(|slot| slot.generation == id.generation && slot.node.is_some())
    }

    /// Borrow a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale.
    pub fn node(&self, id: NodeId) -> &TreeNode<V, D> {
        self.n(self.resolve(id))
    }

    /// Borrow a node if `id` is live.
    pub fn get(&self, id: NodeId) -> Option<&TreeNode<V, D>> {
        if self.contains(id) {
            self.slots[id.index as usize].node.as_ref()
        } else {
            None
        }
    }

    /// The node's own value.
    pub fn value(&self, id: NodeId) -> V {
        self.node(id).value
    }

    /// The node's payload.
    pub fn data(&self, id: NodeId) -> &D {
        &self.node(id).data
    }

    /// Leftmost (first) node.
    pub fn first(&self) -> NodeId {
        self.id_of(self.leftmost(self.root))
    }

    /// Rightmost (last) node.
    pub fn last(&self) -> NodeId {
        self.id_of(self.rightmost(self.root))
    }

    /// In-order successor.
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        let idx = self.next_idx(self.resolve(id));
        (idx != NULL).then(|| self.id_of(idx))
    }

    /// In-order predecessor.
    pub fn previous(&self, id: NodeId) -> Option<NodeId> {
        let idx = self.previous_idx(self.resolve(id));
        (idx != NULL).then(|| self.id_of(idx))
    }

    /// Iterate node handles in order.
    pub fn iter(&self) -> Iter<'_, V, D> {
        Iter {
            tree: self,
            next: self.leftmost(self.root),
        }
    }

    /// Append a node after the current last node.
    pub fn insert(&mut self, value: V, data: D) -> NodeId {
        let last = self.last();
        self.insert_after(last, value, data)
    }

    /// Insert a node directly after `existing` in order.
    pub fn insert_after(&mut self, existing: NodeId, value: V, data: D) -> NodeId {
        let existing = self.resolve(existing);
        let new = self.alloc(value, data);
        let right = self.n(existing).right;
        if right == NULL {
            self.attach(new, existing, Side::Right);
        } else {
            let parent = self.leftmost(right);
            self.attach(new, parent, Side::Left);
        }
        self.id_of(new)
    }

    /// Insert a node directly before `existing` in order.
    pub fn insert_before(&mut self, existing: NodeId, value: V, data: D) -> NodeId {
        let existing = self.resolve(existing);
        let new = self.alloc(value, data);
        let left = self.n(existing).left;
        if left == NULL {
            self.attach(new, existing, Side::Left);
        } else {
            let parent = self.rightmost(left);
            self.attach(new, parent, Side::Right);
        }
        self.id_of(new)
    }

    /// Remove a node, returning its value and payload.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale or refers to the only node of the tree.
    pub fn remove(&mut self, id: NodeId) -> (V, D) {
        let idx = self.resolve(id);
        assert!(
            self.n(self.root).total_count > 1,
            "cannot remove the only node of a tree"
        );
        self.unlink(idx);
        self.free(idx)
    }

    /// Replace a node's value and refresh the aggregates of its ancestors.
    pub fn set_value(&mut self, id: NodeId, value: V) {
        let idx = self.resolve(id);
        self.n_mut(idx).value = value;
        self.propagate_from(idx);
    }

    /// Mutate a node's payload, then refresh the aggregates of its ancestors.
    pub fn update_data<R>(&mut self, id: NodeId, update: impl FnOnce(&mut D) -> R) -> R {
        let idx = self.resolve(id);
        let result = update(&mut self.n_mut(idx).data);
        self.propagate_from(idx);
        result
    }

    /// Re-run the aggregator chain from `id` up to the root.
    ///
    /// Needed after changing a node's value or payload through means the tree cannot observe.
    pub fn update_after_changing_children(&mut self, id: NodeId) {
        let idx = self.resolve(id);
        self.propagate_from(idx);
    }

    // --- Internal accessors ---

    pub(crate) fn n(&self, idx: Idx) -> &TreeNode<V, D> {
        match self.slots[idx as usize].node.as_ref() {
            Some(node) => node,
            None => panic!("tree link points at vacant slot {idx}"),
        }
    }

    fn n_mut(&mut self, idx: Idx) -> &mut TreeNode<V, D> {
        occupied(&mut self.slots[idx as usize])
    }

    /// Bypasses aggregate maintenance; lets tests corrupt a tree on purpose.
    #[cfg(test)]
    pub(crate) fn slot_node_mut(&mut self, id: NodeId) -> &mut TreeNode<V, D> {
        let idx = self.resolve(id);
        self.n_mut(idx)
    }

    pub(crate) fn root_idx(&self) -> Idx {
        self.root
    }

    pub(crate) fn aggregators(&self) -> &[ChildrenAggregator<V, D>] {
        &self.aggregators
    }

    pub(crate) fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.node.is_some()).count()
    }

    pub(crate) fn resolve(&self, id: NodeId) -> Idx {
        assert!(
            self.contains(id),
            "node handle {id:?} does not refer to a live node of this tree"
        );
        id.index
    }

    pub(crate) fn id_of(&self, idx: Idx) -> NodeId {
        NodeId {
            index: idx,
            generation: self.slots[idx as usize].generation,
        }
    }

    fn alloc(&mut self, value: V, data: D) -> Idx {
        let node = TreeNode::new(value, data);
        if let Some(idx) = self.free_list.pop() {
            self.slots[idx as usize].node = Some(node);
            idx
        } else {
            let idx = self.slots.len() as Idx;
            assert!(idx != NULL, "tree arena is full");
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            idx
        }
    }

    fn free(&mut self, idx: Idx) -> (V, D) {
        let slot = &mut self.slots[idx as usize];
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(idx);
        match slot.node.take() {
            Some(node) => (node.value, node.data),
            None => panic!("freeing vacant slot {idx}"),
        }
    }

    fn vacate_all(&mut self) {
        self.free_list.clear();
        for (idx, slot) in self.slots.iter_mut().enumerate().rev() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free_list.push(idx as Idx);
        }
        self.root = NULL;
    }

    fn install_root(&mut self, value: V, data: D) {
        let root = self.alloc(value, data);
        self.n_mut(root).color = Color::Black;
        self.root = root;
        self.update_node(root);
    }

    fn left(&self, idx: Idx) -> Idx {
        self.n(idx).left
    }

    fn right(&self, idx: Idx) -> Idx {
        self.n(idx).right
    }

    fn parent(&self, idx: Idx) -> Idx {
        self.n(idx).parent
    }

    /// Color of a possibly-null link. Null leaves are black.
    fn color_of(&self, idx: Idx) -> Color {
        if idx == NULL {
            Color::Black
        } else {
            self.n(idx).color
        }
    }

    fn is_red(&self, idx: Idx) -> bool {
        self.color_of(idx) == Color::Red
    }

    /// A present node that is black; null links do not qualify.
    fn is_black_node(&self, idx: Idx) -> bool {
        idx != NULL && self.n(idx).color == Color::Black
    }

    fn set_color(&mut self, idx: Idx, color: Color) {
        if idx != NULL {
            self.n_mut(idx).color = color;
        }
    }

    pub(crate) fn leftmost(&self, mut idx: Idx) -> Idx {
        while self.left(idx) != NULL {
            idx = self.left(idx);
        }
        idx
    }

    pub(crate) fn rightmost(&self, mut idx: Idx) -> Idx {
        while self.right(idx) != NULL {
            idx = self.right(idx);
        }
        idx
    }

    fn next_idx(&self, idx: Idx) -> Idx {
        let right = self.right(idx);
        if right != NULL {
            return self.leftmost(right);
        }
        let mut child = idx;
        let mut parent = self.parent(idx);
        while parent != NULL && self.right(parent) == child {
            child = parent;
            parent = self.parent(parent);
        }
        parent
    }

    fn previous_idx(&self, idx: Idx) -> Idx {
        let left = self.left(idx);
        if left != NULL {
            return self.rightmost(left);
        }
        let mut child = idx;
        let mut parent = self.parent(idx);
        while parent != NULL && self.left(parent) == child {
            child = parent;
            parent = self.parent(parent);
        }
        parent
    }

    // --- Aggregates ---

    /// Run the aggregator chain on one node. Returns whether any total changed.
    fn update_node(&mut self, idx: Idx) -> bool {
        let (left, right) = {
            let node = self.n(idx);
            (node.left, node.right)
        };
        let aggregators = &self.aggregators;
        let slots = &mut self.slots;
        match (left, right) {
            (NULL, NULL) => run_all(aggregators, occupied(&mut slots[idx as usize]), None, None),
            (left, NULL) => {
                let [node, left] = disjoint(slots, [idx, left]);
                run_all(aggregators, occupied(node), Some(&*occupied(left)), None)
            }
            (NULL, right) => {
                let [node, right] = disjoint(slots, [idx, right]);
                run_all(aggregators, occupied(node), None, Some(&*occupied(right)))
            }
            (left, right) => {
                let [node, left, right] = disjoint(slots, [idx, left, right]);
                run_all(
                    aggregators,
                    occupied(node),
                    Some(&*occupied(left)),
                    Some(&*occupied(right)),
                )
            }
        }
    }

    /// Refresh totals from `idx` towards the root, stopping at the first unchanged level.
    fn propagate_from(&mut self, mut idx: Idx) {
        while idx != NULL {
            if !self.update_node(idx) {
                break;
            }
            idx = self.parent(idx);
        }
    }

    // --- Structure ---

    fn attach(&mut self, new: Idx, parent: Idx, side: Side) {
        match side {
            Side::Left => {
                debug_assert_eq!(self.left(parent), NULL);
                self.n_mut(parent).left = new;
            }
            Side::Right => {
                debug_assert_eq!(self.right(parent), NULL);
                self.n_mut(parent).right = new;
            }
        }
        let node = self.n_mut(new);
        node.parent = parent;
        node.color = Color::Red;
        self.update_node(new);
        self.propagate_from(parent);
        self.fix_after_insert(new);
    }

    /// Put `new` (possibly null) where `replaced` hangs off its parent.
    fn replace(&mut self, replaced: Idx, new: Idx) {
        let parent = self.parent(replaced);
        if parent == NULL {
            debug_assert_eq!(replaced, self.root);
            self.root = new;
        } else if self.left(parent) == replaced {
            self.n_mut(parent).left = new;
        } else {
            self.n_mut(parent).right = new;
        }
        if new != NULL {
            self.n_mut(new).parent = parent;
        }
        self.n_mut(replaced).parent = NULL;
    }

    /// Detach `removed` from the tree without freeing its slot.
    fn unlink(&mut self, removed: Idx) {
        let (left, right) = (self.left(removed), self.right(removed));
        if left != NULL && right != NULL {
            // Move the in-order successor into the removed node's place. Nodes are relinked
            // rather than swapping payloads so that outstanding handles stay valid.
            let successor = self.leftmost(right);
            self.unlink(successor);
            self.replace(removed, successor);

            let left = self.left(removed);
            let right = self.right(removed);
            let color = self.n(removed).color;
            let node = self.n_mut(successor);
            node.left = left;
            node.right = right;
            node.color = color;
            if left != NULL {
                self.n_mut(left).parent = successor;
            }
            if right != NULL {
                self.n_mut(right).parent = successor;
            }
            self.clear_links(removed);

            self.propagate_from(successor);
            let parent = self.parent(successor);
            if parent != NULL {
                self.propagate_from(parent);
            }
        } else {
            let parent = self.parent(removed);
            let child = if left != NULL { left } else { right };
            self.replace(removed, child);
            let removed_color = self.n(removed).color;
            self.clear_links(removed);
            if parent != NULL {
                self.propagate_from(parent);
            }
            if removed_color == Color::Black {
                if self.is_red(child) {
                    self.set_color(child, Color::Black);
                } else if parent != NULL {
                    self.fix_after_delete(child, parent);
                }
            }
        }
    }

    fn clear_links(&mut self, idx: Idx) {
        let node = self.n_mut(idx);
        node.parent = NULL;
        node.left = NULL;
        node.right = NULL;
    }

    fn sibling(&self, idx: Idx) -> Idx {
        let parent = self.parent(idx);
        if parent == NULL {
            NULL
        } else if self.left(parent) == idx {
            self.right(parent)
        } else {
            self.left(parent)
        }
    }

    /// Sibling of a possibly-null `node` hanging off `parent`.
    fn sibling_through(&self, node: Idx, parent: Idx) -> Idx {
        if self.left(parent) == node {
            self.right(parent)
        } else {
            self.left(parent)
        }
    }

    fn fix_after_insert(&mut self, mut node: Idx) {
        loop {
            debug_assert!(self.is_red(node));
            let parent = self.parent(node);
            if parent == NULL {
                // Blackening the root adds one black node to every path.
                self.set_color(node, Color::Black);
                return;
            }
            if !self.is_red(parent) {
                return;
            }
            // A red parent is never the root, so the grandparent exists.
            let grandparent = self.parent(parent);
            let uncle = self.sibling(parent);
            if self.is_red(uncle) {
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            if node == self.right(parent) && parent == self.left(grandparent) {
                self.rotate_left(parent);
                node = self.left(node);
            } else if node == self.left(parent) && parent == self.right(grandparent) {
                self.rotate_right(parent);
                node = self.right(node);
            }
            let parent = self.parent(node);
            let grandparent = self.parent(parent);
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            if node == self.left(parent) && parent == self.left(grandparent) {
                self.rotate_right(grandparent);
            } else {
                debug_assert!(node == self.right(parent) && parent == self.right(grandparent));
                self.rotate_left(grandparent);
            }
            return;
        }
    }

    fn fix_after_delete(&mut self, mut node: Idx, mut parent: Idx) {
        loop {
            debug_assert!(node == NULL || self.parent(node) == parent);
            let mut sibling = self.sibling_through(node, parent);
            if self.is_red(sibling) {
                self.set_color(parent, Color::Red);
                self.set_color(sibling, Color::Black);
                if node == self.left(parent) {
                    self.rotate_left(parent);
                } else {
                    self.rotate_right(parent);
                }
                sibling = self.sibling_through(node, parent);
            }

            let nephews_black = sibling != NULL
                && !self.is_red(self.left(sibling))
                && !self.is_red(self.right(sibling));
            if !self.is_red(parent) && self.is_black_node(sibling) && nephews_black {
                self.set_color(sibling, Color::Red);
                let grandparent = self.parent(parent);
                if grandparent == NULL {
                    return;
                }
                node = parent;
                parent = grandparent;
                continue;
            }
            if self.is_red(parent) && self.is_black_node(sibling) && nephews_black {
                self.set_color(sibling, Color::Red);
                self.set_color(parent, Color::Black);
                return;
            }

            if node == self.left(parent)
                && self.is_black_node(sibling)
                && self.is_red(self.left(sibling))
                && !self.is_red(self.right(sibling))
            {
                self.set_color(sibling, Color::Red);
                let near = self.left(sibling);
                self.set_color(near, Color::Black);
                self.rotate_right(sibling);
            } else if node == self.right(parent)
                && self.is_black_node(sibling)
                && self.is_red(self.right(sibling))
                && !self.is_red(self.left(sibling))
            {
                self.set_color(sibling, Color::Red);
                let near = self.right(sibling);
                self.set_color(near, Color::Black);
                self.rotate_left(sibling);
            }

            let sibling = self.sibling_through(node, parent);
            let parent_color = self.color_of(parent);
            self.set_color(sibling, parent_color);
            self.set_color(parent, Color::Black);
            if node == self.left(parent) {
                let far = self.right(sibling);
                debug_assert!(far == NULL || self.is_red(far));
                self.set_color(far, Color::Black);
                self.rotate_left(parent);
            } else {
                let far = self.left(sibling);
                debug_assert!(far == NULL || self.is_red(far));
                self.set_color(far, Color::Black);
                self.rotate_right(parent);
            }
            return;
        }
    }

    fn rotate_left(&mut self, p: Idx) {
        let q = self.right(p);
        assert!(q != NULL, "cannot rotate left without a right child");
        debug_assert_eq!(self.parent(q), p);
        self.replace(p, q);
        let inner = self.left(q);
        self.n_mut(p).right = inner;
        if inner != NULL {
            self.n_mut(inner).parent = p;
        }
        self.n_mut(q).left = p;
        self.n_mut(p).parent = q;
        self.propagate_from(p);
    }

    fn rotate_right(&mut self, p: Idx) {
        let q = self.left(p);
        assert!(q != NULL, "cannot rotate right without a left child");
        debug_assert_eq!(self.parent(q), p);
        self.replace(p, q);
        let inner = self.right(q);
        self.n_mut(p).left = inner;
        if inner != NULL {
            self.n_mut(inner).parent = p;
        }
        self.n_mut(q).right = p;
        self.n_mut(p).parent = q;
        self.propagate_from(p);
    }

    /// Link `nodes` into a balanced subtree. Nodes on the deepest possible level are red so
    /// every path carries the same number of black nodes.
    fn build_balanced(&mut self, nodes: &[Idx], height: usize) -> Idx {
        if nodes.is_empty() {
            return NULL;
        }
        let middle = nodes.len() / 2;
        let idx = nodes[middle];
        let left = self.build_balanced(&nodes[..middle], height - 1);
        let right = self.build_balanced(&nodes[middle + 1..], height - 1);
        {
            let node = self.n_mut(idx);
            node.left = left;
            node.right = right;
            node.color = if height == 1 { Color::Red } else { Color::Black };
        }
        if left != NULL {
            self.n_mut(left).parent = idx;
        }
        if right != NULL {
            self.n_mut(right).parent = idx;
        }
        self.update_node(idx);
        idx
    }
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Left,
    Right,
}

fn occupied<V, D>(slot: &mut Slot<V, D>) -> &mut TreeNode<V, D> {
    match slot.node.as_mut() {
        Some(node) => node,
        None => panic!("tree link points at a vacant slot"),
    }
}

fn disjoint<V, D, const N: usize>(
    slots: &mut [Slot<V, D>],
    indices: [Idx; N],
) -> [&mut Slot<V, D>; N] {
    match slots.get_disjoint_mut(indices.map(|idx| idx as usize)) {
        Ok(found) => found,
        Err(err) => panic!("tree links overlap: {err}"),
    }
}

fn subtree_height(node_count: usize) -> usize {
    if node_count == 0 {
        0
    } else {
        subtree_height(node_count / 2) + 1
    }
}

/// In-order iterator over node handles.
pub struct Iter<'a, V, D> {
    tree: &'a RedBlackTree<V, D>,
    next: Idx,
}

impl<V: TreeValue, D> Iterator for Iter<'_, V, D> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == NULL {
            return None;
        }
        let current = self.next;
        self.next = self.tree.next_idx(current);
        Some(self.tree.id_of(current))
    }
}

impl<'a, V: TreeValue, D> IntoIterator for &'a RedBlackTree<V, D> {
    type Item = NodeId;
    type IntoIter = Iter<'a, V, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: TreeValue, D: fmt::Debug> fmt::Debug for RedBlackTree<V, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_subtree(f, self.root, "", 0)
    }
}

impl<V: TreeValue, D: fmt::Debug> RedBlackTree<V, D> {
    fn write_subtree(
        &self,
        f: &mut fmt::Formatter<'_>,
        idx: Idx,
        label: &str,
        indent: usize,
    ) -> fmt::Result {
        let node = self.n(idx);
        let color = match node.color {
            Color::Red => "R",
            Color::Black => "B",
        };
        writeln!(
            f,
            "{:indent$}{label}[{color}] value={:?} total={:?} count={} data={:?}",
            "", node.value, node.total_value, node.total_count, node.data
        )?;
        if node.left != NULL {
            self.write_subtree(f, node.left, "L: ", indent + 2)?;
        }
        if node.right != NULL {
            self.write_subtree(f, node.right, "R: ", indent + 2)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(tree: &RedBlackTree<usize, ()>) -> Vec<usize> {
        tree.iter().map(|id| tree.value(id)).collect()
    }

    #[test]
    fn test_new_tree_has_black_root() {
        let tree = RedBlackTree::new(0usize, 5, ());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.total_value(), 5);
        assert_eq!(tree.node(tree.root()).color(), Color::Black);
        assert_eq!(tree.first(), tree.last());
    }

    #[test]
    fn test_insert_appends_in_order() {
        let mut tree = RedBlackTree::new(0usize, 0, ());
        for value in 1..=10 {
            tree.insert(value, ());
        }
        assert_eq!(values(&tree), (0..=10).collect::<Vec<_>>());
        assert_eq!(tree.total_value(), 55);
        tree.validate().unwrap();
    }

    #[test]
    fn test_insert_before_and_after() {
        let mut tree = RedBlackTree::new(0usize, 2, ());
        let root = tree.root();
        let three = tree.insert_after(root, 3, ());
        tree.insert_before(root, 1, ());
        tree.insert_after(three, 4, ());
        tree.insert_before(three, 9, ());
        assert_eq!(values(&tree), vec![1, 2, 9, 3, 4]);
        tree.validate().unwrap();
    }

    #[test]
    fn test_remove_keeps_other_handles_valid() {
        let mut tree = RedBlackTree::new(0usize, 0, ());
        let ids: Vec<NodeId> = (1..20).map(|v| tree.insert(v, ())).collect();
        let (value, ()) = tree.remove(ids[8]);
        assert_eq!(value, 9);
        assert!(!tree.contains(ids[8]));
        for (i, id) in ids.iter().enumerate() {
            if i != 8 {
                assert_eq!(tree.value(*id), i + 1);
            }
        }
        tree.validate().unwrap();
    }

    #[test]
    fn test_reused_slot_gets_new_generation() {
        let mut tree = RedBlackTree::new(0usize, 0, ());
        let a = tree.insert(1, ());
        tree.remove(a);
        let b = tree.insert(2, ());
        assert_eq!(a.slot(), b.slot());
        assert_ne!(a, b);
        assert!(!tree.contains(a));
        assert!(tree.contains(b));
    }

    #[test]
    #[should_panic(expected = "only node")]
    fn test_removing_last_node_panics() {
        let mut tree = RedBlackTree::new(0usize, 1, ());
        let root = tree.root();
        tree.remove(root);
    }

    #[test]
    #[should_panic(expected = "does not refer to a live node")]
    fn test_stale_handle_panics() {
        let mut tree = RedBlackTree::new(0usize, 0, ());
        let id = tree.insert(3, ());
        tree.remove(id);
        tree.value(id);
    }

    #[test]
    fn test_rebuild_is_balanced() {
        let mut tree = RedBlackTree::new(0usize, 0, ());
        let old = tree.root();
        let ids = tree.rebuild((0..1000).map(|v| (v, ())));
        assert!(!tree.contains(old));
        assert_eq!(ids.len(), 1000);
        assert_eq!(tree.len(), 1000);
        assert_eq!(values(&tree), (0..1000).collect::<Vec<_>>());
        tree.validate().unwrap();
        assert!(tree.height() <= 11);
    }

    #[test]
    fn test_next_and_previous() {
        let mut tree = RedBlackTree::new(0usize, 0, ());
        let ids: Vec<NodeId> = (1..8).map(|v| tree.insert(v, ())).collect();
        assert_eq!(tree.next(ids[2]), Some(ids[3]));
        assert_eq!(tree.previous(ids[0]), Some(tree.first()));
        assert_eq!(tree.next(tree.last()), None);
        assert_eq!(tree.previous(tree.first()), None);
    }

    #[test]
    fn test_set_value_updates_totals() {
        let mut tree = RedBlackTree::new(0usize, 1, ());
        let ids: Vec<NodeId> = (0..50).map(|_| tree.insert(1, ())).collect();
        tree.set_value(ids[25], 10);
        assert_eq!(tree.total_value(), 60);
        tree.validate().unwrap();
    }

    #[test]
    fn test_debug_output_lists_every_node() {
        let mut tree = RedBlackTree::new(0usize, 0, "root");
        tree.insert(1, "a");
        tree.insert(2, "b");
        let dump = format!("{tree:?}");
        assert_eq!(dump.lines().count(), 3);
        assert!(dump.contains("\"a\""));
    }
}
