use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use proptest::strategy::{Just, Strategy};

use crate::{AvlTree, Error, Event, Node, Weight, NOT_FOUND};

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum ItemValue {
    Index(usize),
    Random(u32),
}

proptest::prop_compose! {
    fn index_strategy()(
        index in 0usize..1000,
    ) -> ItemValue {
        ItemValue::Index(index)
    }
}

proptest::prop_compose! {
    fn random_strategy()(
        random in 0u32..1000,
    ) -> ItemValue {
        ItemValue::Random(random)
    }
}

fn value_strategy() -> impl Strategy<Value = ItemValue> {
    proptest::prop_oneof![index_strategy(), random_strategy()]
}

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum Op {
    Insert(ItemValue),
    Delete(ItemValue),
    Get(ItemValue),
    Rank(ItemValue),
    RankGroup(ItemValue),
    Target(ItemValue, ItemValue),
    Divide,
    First,
    Last,
}

impl Op {
    fn finalize(self, sorted: &[u32]) -> FinalOp {
        fn get_value(v: &[u32], i: ItemValue) -> u32 {
            match i {
                ItemValue::Index(idx) => {
                    if v.is_empty() {
                        idx as u32
                    } else {
                        v[idx % v.len()]
                    }
                }
                ItemValue::Random(v) => v,
            }
        }

        match self {
            Op::Insert(item) => FinalOp::Insert(get_value(sorted, item)),
            Op::Delete(item) => FinalOp::Delete(get_value(sorted, item)),
            Op::Get(item) => FinalOp::Get(get_value(sorted, item)),
            Op::Rank(item) => FinalOp::Rank(get_value(sorted, item)),
            Op::RankGroup(item) => FinalOp::RankGroup(get_value(sorted, item)),
            Op::Target(a, b) => FinalOp::Target(get_value(sorted, a), get_value(sorted, b)),
            Op::Divide => FinalOp::Divide,
            Op::First => FinalOp::First,
            Op::Last => FinalOp::Last,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum FinalOp {
    Insert(u32),
    Delete(u32),
    Get(u32),
    Rank(u32),
    RankGroup(u32),
    Target(u32, u32),
    Divide,
    First,
    Last,
}

pub fn op_strategy() -> impl Strategy<Value = Op> {
    proptest::prop_oneof![
        value_strategy().prop_map(Op::Insert),
        value_strategy().prop_map(Op::Delete),
        value_strategy().prop_map(Op::Get),
        value_strategy().prop_map(Op::Rank),
        value_strategy().prop_map(Op::RankGroup),
        (value_strategy(), value_strategy()).prop_map(|(a, b)| Op::Target(a, b)),
        Just(Op::Divide),
        Just(Op::First),
        Just(Op::Last),
    ]
}

fn weight(value: u32) -> Weight {
    match Weight::new(f64::from(value)) {
        Ok(weight) => weight,
        Err(err) => unreachable!("{value}: {err}"),
    }
}

fn label(value: u32) -> String {
    format!("m{value}")
}

fn key(node: &Node) -> u32 {
    node.weight().get() as u32
}

/// Returns the size of an independent set picked greedily from the leaves up.
///
/// Taking every node none of whose children were taken is optimal on trees, which makes this
/// an independent check of [`AvlTree::max_weight_independent_set_size`].
pub fn greedy_independent_set(tree: &AvlTree) -> usize {
    // Returns the set size and whether the subtree root was taken.
    fn pick(opt_node: Option<&Node>) -> (usize, bool) {
        let Some(node) = opt_node else {
            return (0, false);
        };

        let (left, left_taken) = pick(node.left());
        let (right, right_taken) = pick(node.right());
        let taken = !left_taken && !right_taken;

        (left + right + usize::from(taken), taken)
    }

    pick(tree.root()).0
}

pub fn run_btree_equivalence(ops: Vec<Op>) {
    let mut sorted_values = Vec::with_capacity(ops.len());
    let mut btree = BTreeMap::new();
    let mut avl = AvlTree::new();

    fn insert_sorted(v: &mut Vec<u32>, value: u32) {
        if let Err(idx) = v.binary_search(&value) {
            v.insert(idx, value);
        }
    }

    fn remove_sorted(v: &mut Vec<u32>, value: u32) {
        if let Ok(idx) = v.binary_search(&value) {
            v.remove(idx);
        }
    }

    let mut final_ops = Vec::with_capacity(ops.len());
    for (op_id, op) in ops.into_iter().enumerate() {
        let final_op = op.finalize(&sorted_values);
        final_ops.push(final_op);

        match final_op {
            FinalOp::Insert(value) => {
                insert_sorted(&mut sorted_values, value);

                let from_btree = !btree.contains_key(&value);
                btree.entry(value).or_insert_with(|| label(value));
                let outcome = avl.insert(label(value), weight(value));

                assert_eq!(from_btree, outcome.applied, "FinalOp #{op_id}: {op:?}");
                assert!(
                    outcome.events.iter().all(|event| matches!(
                        event,
                        Event::Welcomed { child, .. } if *child == label(value)
                    )),
                    "FinalOp #{op_id}: {op:?}"
                );
            }

            FinalOp::Delete(value) => {
                remove_sorted(&mut sorted_values, value);

                let from_btree = btree.remove(&value).is_some();
                let outcome = avl.delete(&label(value), weight(value));

                assert_eq!(from_btree, outcome.applied, "FinalOp #{op_id}: {op:?}");
                match outcome.events.as_slice() {
                    [] => assert!(!from_btree, "FinalOp #{op_id}: {op:?}"),
                    [Event::Departed { label: departed, .. }] => {
                        assert_eq!(*departed, label(value), "FinalOp #{op_id}: {op:?}")
                    }
                    events => panic!("FinalOp #{op_id}: {op:?}: unexpected {events:?}"),
                }
            }

            FinalOp::Get(value) => {
                let from_btree = btree.get(&value).map(String::as_str);
                let from_avl = avl.get(weight(value)).map(Node::label);

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {op:?}");
            }

            FinalOp::Rank(value) => {
                let rank = avl.search_rank(weight(value));

                if btree.contains_key(&value) {
                    assert!(
                        (0..=avl.height()).contains(&rank),
                        "FinalOp #{op_id}: {op:?}"
                    );
                } else {
                    assert_eq!(rank, NOT_FOUND, "FinalOp #{op_id}: {op:?}");
                }
            }

            FinalOp::RankGroup(value) => {
                let group = avl.rank_group_query(weight(value));
                let rank = avl.search_rank(weight(value));

                let expected: Vec<u32> = avl
                    .iter()
                    .filter(|node| rank != NOT_FOUND && avl.search_rank(node.weight()) == rank)
                    .map(key)
                    .collect();

                // Within a level, left to right is also increasing weight.
                assert_eq!(
                    group.into_iter().map(key).collect::<Vec<_>>(),
                    expected,
                    "FinalOp #{op_id}: {op:?}"
                );
            }

            FinalOp::Target(a, b) => match avl.target_query(weight(a), weight(b)) {
                Ok(node) => {
                    let (lo, hi) = (a.min(b), a.max(b));
                    if btree.range(lo..=hi).next().is_some() {
                        assert!(
                            (lo..=hi).contains(&key(node)),
                            "FinalOp #{op_id}: {op:?}"
                        );
                    }
                    assert!(btree.contains_key(&key(node)), "FinalOp #{op_id}: {op:?}");
                }
                Err(Error::EmptyTree) => assert!(btree.is_empty(), "FinalOp #{op_id}: {op:?}"),
                Err(err) => panic!("FinalOp #{op_id}: {op:?}: {err}"),
            },

            FinalOp::Divide => {
                assert_eq!(
                    avl.max_weight_independent_set_size(),
                    greedy_independent_set(&avl),
                    "FinalOp #{op_id}: {op:?}"
                );
            }

            FinalOp::First => {
                let from_btree = btree.keys().next().copied();
                let from_avl = avl.find_min().ok().map(key);

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {op:?}");
            }

            FinalOp::Last => {
                let from_btree = btree.keys().next_back().copied();
                let from_avl = avl.find_max().ok().map(key);

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {op:?}");
            }
        }

        avl.assert_invariants();
        assert_eq!(btree.len(), avl.len());
        assert!(btree
            .iter()
            .zip(avl.iter())
            .all(|((&k, l), node)| k == key(node) && l == node.label()));
    }
}
