//! Property-based tests: the tree is checked against a plain `Vec` model after every operation.

use linetree_rbtree::{ChildrenAggregator, Metric, NodeId, RedBlackTree, TreeNode};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum TreeOp {
    InsertAfter { pos_pct: f64, value: usize },
    InsertBefore { pos_pct: f64, value: usize },
    Remove { pos_pct: f64 },
    SetValue { pos_pct: f64, value: usize },
}

fn arbitrary_tree_op() -> impl Strategy<Value = TreeOp> {
    prop_oneof![
        3 => (0.0..1.0f64, 0..20usize)
            .prop_map(|(pos_pct, value)| TreeOp::InsertAfter { pos_pct, value }),
        2 => (0.0..1.0f64, 0..20usize)
            .prop_map(|(pos_pct, value)| TreeOp::InsertBefore { pos_pct, value }),
        2 => (0.0..1.0f64).prop_map(|pos_pct| TreeOp::Remove { pos_pct }),
        1 => (0.0..1.0f64, 0..20usize)
            .prop_map(|(pos_pct, value)| TreeOp::SetValue { pos_pct, value }),
    ]
}

/// Payload carrying the node's own value twice, with a subtree total of the doubled value
/// maintained by a custom aggregator.
#[derive(Clone, Copy, Debug, Default)]
struct Doubled {
    own: usize,
    total: usize,
}

fn doubled_aggregator(
    node: &mut TreeNode<usize, Doubled>,
    left: Option<&TreeNode<usize, Doubled>>,
    right: Option<&TreeNode<usize, Doubled>>,
) -> bool {
    let total = node.data().own
        + left.map_or(0, |n| n.data().total)
        + right.map_or(0, |n| n.data().total);
    if total != node.data().total {
        node.data_mut().total = total;
        true
    } else {
        false
    }
}

const AGGREGATORS: [ChildrenAggregator<usize, Doubled>; 1] = [doubled_aggregator];

struct Harness {
    tree: RedBlackTree<usize, Doubled>,
    model: Vec<(NodeId, usize)>,
}

impl Harness {
    fn new() -> Self {
        let tree = RedBlackTree::with_aggregators(
            0,
            1,
            Doubled { own: 2, total: 2 },
            &AGGREGATORS,
        );
        let model = vec![(tree.root(), 1)];
        Self { tree, model }
    }

    fn pick(&self, pos_pct: f64) -> usize {
        ((pos_pct * self.model.len() as f64) as usize).min(self.model.len() - 1)
    }

    fn apply(&mut self, op: &TreeOp) {
        match *op {
            TreeOp::InsertAfter { pos_pct, value } => {
                let i = self.pick(pos_pct);
                let id = self.tree.insert_after(self.model[i].0, value, doubled(value));
                self.model.insert(i + 1, (id, value));
            }
            TreeOp::InsertBefore { pos_pct, value } => {
                let i = self.pick(pos_pct);
                let id = self.tree.insert_before(self.model[i].0, value, doubled(value));
                self.model.insert(i, (id, value));
            }
            TreeOp::Remove { pos_pct } => {
                if self.model.len() == 1 {
                    return;
                }
                let i = self.pick(pos_pct);
                let (id, value) = self.model.remove(i);
                let (removed, data) = self.tree.remove(id);
                assert_eq!(removed, value);
                assert_eq!(data.own, value * 2);
            }
            TreeOp::SetValue { pos_pct, value } => {
                let i = self.pick(pos_pct);
                let id = self.model[i].0;
                self.tree.set_value(id, value);
                self.tree.update_data(id, |data| data.own = value * 2);
                self.model[i].1 = value;
            }
        }
    }
}

fn doubled(value: usize) -> Doubled {
    Doubled {
        own: value * 2,
        total: value * 2,
    }
}

/// Longest path allowed for a red-black tree of `n` nodes: `2 * log2(n + 1)`.
fn height_bound(n: usize) -> usize {
    2 * ((n + 1) as f64).log2().ceil() as usize
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Order, totals and red-black invariants match the model after every operation.
    #[test]
    fn tree_matches_vec_model(ops in prop::collection::vec(arbitrary_tree_op(), 1..120)) {
        let mut harness = Harness::new();
        for op in &ops {
            harness.apply(op);
            prop_assert_eq!(harness.tree.validate(), Ok(()));
        }

        let tree = &harness.tree;
        let ids: Vec<NodeId> = tree.iter().collect();
        let model_ids: Vec<NodeId> = harness.model.iter().map(|(id, _)| *id).collect();
        prop_assert_eq!(ids, model_ids);

        let total: usize = harness.model.iter().map(|(_, v)| v).sum();
        prop_assert_eq!(tree.total_value(), total);
        prop_assert_eq!(tree.node(tree.root()).data().total, total * 2);
        prop_assert_eq!(tree.len(), harness.model.len());
        prop_assert!(tree.height() <= height_bound(tree.len()));
    }

    /// `node_containing(offset_of(n)) == n` for every node with a non-zero value, and every
    /// offset maps to a node whose span contains it.
    #[test]
    fn offsets_round_trip(values in prop::collection::vec(0..8usize, 1..80)) {
        let mut tree = RedBlackTree::new(0usize, values[0], ());
        let mut ids = vec![tree.root()];
        for value in &values[1..] {
            ids.push(tree.insert(*value, ()));
        }

        let mut expected_offset = 0;
        for (i, id) in ids.iter().enumerate() {
            prop_assert_eq!(tree.offset_of(*id), expected_offset);
            prop_assert_eq!(tree.index_of(*id), i);
            prop_assert_eq!(tree.node_at(i), Some(*id));
            if values[i] > 0 {
                prop_assert_eq!(tree.node_containing_value(expected_offset), Some(*id));
            }
            expected_offset += values[i];
        }

        for offset in 0..=tree.total_value() {
            let id = tree.node_containing_value(offset);
            prop_assert!(id.is_some());
            let id = id.unwrap();
            let start = tree.offset_of(id);
            prop_assert!(start <= offset);
            prop_assert!(offset <= start + tree.value(id));
        }
        prop_assert_eq!(tree.node_containing_value(tree.total_value() + 1), None);
    }

    /// Offsets along a payload-backed metric follow the aggregates kept in the payload.
    #[test]
    fn custom_metric_offsets(values in prop::collection::vec(0..8usize, 1..60)) {
        let mut tree =
            RedBlackTree::with_aggregators(0usize, values[0], doubled(values[0]), &AGGREGATORS);
        for value in &values[1..] {
            tree.insert(*value, doubled(*value));
        }
        let metric = Metric::new(
            |n: &TreeNode<usize, Doubled>| n.data().own,
            |n: &TreeNode<usize, Doubled>| n.data().total,
        );
        for id in tree.iter() {
            prop_assert_eq!(tree.offset_of_with(id, 0, metric), tree.offset_of(id) * 2);
        }
    }

    /// Rebuilding from the model yields a valid tree with the same order.
    #[test]
    fn rebuild_matches_input(values in prop::collection::vec(0..100usize, 1..300)) {
        let mut tree = RedBlackTree::new(0usize, 0, ());
        let ids = tree.rebuild(values.iter().map(|v| (*v, ())));
        prop_assert_eq!(tree.validate(), Ok(()));
        let rebuilt: Vec<usize> = ids.iter().map(|id| tree.value(*id)).collect();
        prop_assert_eq!(rebuilt, values.clone());
        prop_assert_eq!(tree.iter().collect::<Vec<_>>(), ids);
        prop_assert!(tree.height() <= height_bound(values.len()));
    }
}
