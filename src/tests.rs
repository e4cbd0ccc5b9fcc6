use std::ops::Range;

use proptest::prelude::*;

use crate::model;

use super::*;

fn w(value: u32) -> Weight {
    Weight::new(f64::from(value)).unwrap()
}

fn permutations(keys: &[u32]) -> Vec<Vec<u32>> {
    if keys.len() <= 1 {
        return vec![keys.to_vec()];
    }

    let mut all = Vec::new();
    for (i, &first) in keys.iter().enumerate() {
        let mut rest = keys.to_vec();
        rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, first);
            all.push(tail);
        }
    }
    all
}

fn insert_find_all(keys: &[u32]) {
    let mut tree = AvlTree::new();

    for &key in keys {
        assert!(tree.insert(format!("m{key}"), w(key)).applied);
        tree.assert_invariants();
    }

    for &key in keys {
        let node = tree.get(w(key)).expect("item not found");
        assert_eq!(node.label(), format!("m{key}"));
        assert!(tree.search_rank(w(key)) <= tree.height());
    }
}

#[test]
fn zero_elems_find() {
    insert_find_all(&[]);
}

#[test]
fn single_elem_find() {
    insert_find_all(&[0]);
}

#[test]
fn two_elems_find() {
    insert_find_all(&[0, 1]);
    insert_find_all(&[1, 0]);
}

#[test]
fn three_elems_find() {
    for keys in permutations(&[0, 1, 2]) {
        insert_find_all(&keys);
    }
}

#[test]
fn five_elems_find() {
    for keys in permutations(&[0, 1, 2, 3, 4]) {
        insert_find_all(&keys);
    }
}

fn insert_remove_all(keys: &[u32]) {
    let mut tree = AvlTree::new();

    for &key in keys {
        let _ = tree.insert(format!("m{key}"), w(key));
        tree.assert_invariants();
    }

    for &key in keys {
        let outcome = tree.delete(&format!("m{key}"), w(key));
        assert!(outcome.applied);
        assert_eq!(outcome.events.len(), 1);
        tree.assert_invariants();
    }
    assert!(tree.is_empty());

    for &key in keys {
        let _ = tree.insert(format!("m{key}"), w(key));
        tree.assert_invariants();
    }

    for &key in keys.iter().rev() {
        assert!(tree.delete(&format!("m{key}"), w(key)).applied);
        tree.assert_invariants();
    }
    assert!(tree.is_empty());
}

#[test]
fn remove_one() {
    insert_remove_all(&[0]);
}

#[test]
fn remove_two() {
    insert_remove_all(&[0, 1]);
    insert_remove_all(&[1, 0]);
}

#[test]
fn remove_three() {
    for keys in permutations(&[0, 1, 2]) {
        insert_remove_all(&keys);
    }
}

#[test]
fn remove_six() {
    for keys in permutations(&[0, 1, 2, 3, 4, 5]) {
        insert_remove_all(&keys);
    }
}

#[test]
fn ascending_run_stays_shallow() {
    let mut tree = AvlTree::new();
    for key in 0..1023 {
        let _ = tree.insert("m", w(key));
    }
    tree.assert_invariants();

    // 1023 nodes fit in a perfect tree of height 9; AVL allows at most ~1.44 log2(n).
    assert!(tree.height() <= 14, "height {}", tree.height());
    assert_eq!(tree.search_rank(w(1022)), tree.height());
}

#[cfg(miri)]
const FUZZ_RANGE: Range<usize> = 0..10;

#[cfg(not(miri))]
const FUZZ_RANGE: Range<usize> = 0..1000;

proptest::proptest! {
    #![proptest_config(ProptestConfig {
        max_shrink_iters: 65536,
        .. ProptestConfig::default()
    })]

    #[test]
    fn btree_equivalence(ops in proptest::collection::vec(model::op_strategy(), FUZZ_RANGE)) {
        model::run_btree_equivalence(ops);
    }

    #[test]
    fn insert_then_delete_all_empties(
        keys in proptest::collection::btree_set(0u32..10_000, 0..200),
        seed in any::<u64>(),
    ) {
        let mut tree = AvlTree::new();
        for &key in &keys {
            prop_assert!(tree.insert("m", w(key)).applied);
        }

        // Delete in a scrambled but deterministic order.
        let mut order: Vec<u32> = keys.iter().copied().collect();
        order.sort_by_key(|&key| (u64::from(key) ^ seed).wrapping_mul(0x9e37_79b9_7f4a_7c15));

        for key in order {
            prop_assert!(tree.delete("m", w(key)).applied);
            tree.assert_invariants();
        }

        prop_assert!(tree.is_empty());
    }

    #[test]
    fn duplicate_insert_is_idempotent(
        keys in proptest::collection::vec(0u32..500, 1..100),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut tree = AvlTree::new();
        for &key in &keys {
            let _ = tree.insert(format!("m{key}"), w(key));
        }
        let before = tree.clone();

        let again = keys[pick.index(keys.len())];
        prop_assert!(!tree.insert("again", w(again)).applied);
        prop_assert_eq!(tree, before);
    }

    #[test]
    fn independent_set_matches_greedy(
        keys in proptest::collection::vec(0u32..10_000, 0..300),
    ) {
        let mut tree = AvlTree::new();
        for &key in &keys {
            let _ = tree.insert("m", w(key));
        }

        prop_assert_eq!(
            tree.max_weight_independent_set_size(),
            model::greedy_independent_set(&tree)
        );
    }
}
