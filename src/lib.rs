//! An AVL tree keyed by [`Weight`], where every node carries a label.
//!
//! Besides insertion and removal, the tree answers a handful of structural queries: the depth
//! at which a weight is found, the node where the search paths of two weights split, all nodes
//! sharing a depth, and the size of the largest independent set of nodes.

// Conventions used in comments:
// - The height of a node `x` is denoted `h(x)`. An absent subtree has height -1, so a leaf has
//   height 0.
// - The balance factor of a node `x` is `b(x) = h(left(x)) - h(right(x))`.
// - A node is left-heavy if `b(x) > 1` and right-heavy if `b(x) < -1`.
//
// The invariants of the tree are:
// 1. For every node `x`, `|b(x)| <= 1`.
// 2. For every node `x`, the cached height is `1 + max(h(left(x)), h(right(x)))`.
// 3. An in-order traversal yields strictly increasing weights.
//
// There are no parent links. Every mutation descends recursively and hands the (possibly
// rotated) subtree root back to its caller, which reattaches it.
//
// Insertion and removal restore (1) with different tie-breaks:
// - After inserting `w` below a heavy child `c`, a single rotation is used iff `w` went to the
//   outer side of `c` (`w < c` for a left child, `w > c` for a right child).
// - After a removal, a single rotation is used iff `b(c) >= 0` for a left child or `b(c) <= 0`
//   for a right child. A heavy child may be exactly balanced after a removal, and that case
//   must resolve to the single rotation.

use core::{cmp::Ordering, mem, ops::Not};

mod debug;
mod error;
mod event;
mod iter;
mod query;
mod weight;

pub mod command;
pub mod driver;

#[cfg(any(test, feature = "model"))]
pub mod model;

#[cfg(test)]
mod tests;

pub use error::{Error, ParseErrorKind};
pub use event::{Event, Outcome};
pub use iter::{Iter, Levels};
pub use query::NOT_FOUND;
pub use weight::Weight;

type Link = Option<Box<Node>>;

/// An AVL tree mapping unique weights to labels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AvlTree {
    root: Link,
    len: usize,
}

/// A single member of an [`AvlTree`].
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    label: String,
    weight: Weight,
    height: i32,
    children: [Link; 2],
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Dir {
    Left = 0,
    Right = 1,
}

impl Not for Dir {
    type Output = Dir;

    fn not(self) -> Self::Output {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

impl AvlTree {
    /// Returns a new empty tree.
    pub const fn new() -> AvlTree {
        AvlTree { root: None, len: 0 }
    }

    /// Returns `true` if the tree contains no nodes.
    pub fn is_empty(&self) -> bool {
        let empty = self.root.is_none();
        debug_assert_eq!(empty, self.len == 0);
        empty
    }

    /// Returns the number of nodes in the tree.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns the root node, if any.
    pub fn root(&self) -> Option<&Node> {
        self.root.as_deref()
    }

    /// Returns the height of the tree, or -1 if it is empty.
    pub fn height(&self) -> i32 {
        height(&self.root)
    }

    /// Returns the node holding `weight`.
    pub fn get(&self, weight: Weight) -> Option<&Node> {
        let mut opt_cur = self.root.as_deref();

        while let Some(cur) = opt_cur {
            match weight.cmp(&cur.weight) {
                Ordering::Less => opt_cur = cur.left(),
                Ordering::Equal => return Some(cur),
                Ordering::Greater => opt_cur = cur.right(),
            }
        }

        None
    }

    /// Returns `true` if the tree holds `weight`.
    pub fn contains(&self, weight: Weight) -> bool {
        self.get(weight).is_some()
    }

    /// Returns the node with the minimum weight.
    pub fn find_min(&self) -> Result<&Node, Error> {
        self.root().map(Node::min).ok_or(Error::EmptyTree)
    }

    /// Returns the node with the maximum weight.
    pub fn find_max(&self) -> Result<&Node, Error> {
        self.root().map(Node::max).ok_or(Error::EmptyTree)
    }

    /// Inserts `label` under `weight`.
    ///
    /// If `weight` is already present the tree is left untouched and the returned outcome is
    /// not applied. Either way, the outcome lists an [`Event::Welcomed`] for every node the
    /// descent passed through.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn insert(&mut self, label: impl Into<String>, weight: Weight) -> Outcome {
        let label = label.into();
        let mut outcome = Outcome::default();

        log::trace!("inserting {label} at {weight}");
        self.root = Some(Self::insert_at(
            self.root.take(),
            label,
            weight,
            &mut outcome,
        ));

        if outcome.applied {
            self.len += 1;
        } else {
            log::debug!("weight {weight} is already present, ignoring insert");
        }

        outcome
    }

    fn insert_at(link: Link, label: String, weight: Weight, outcome: &mut Outcome) -> Box<Node> {
        let Some(mut node) = link else {
            outcome.applied = true;
            return Box::new(Node::new(label, weight));
        };

        let dir = match weight.cmp(&node.weight) {
            Ordering::Less => Dir::Left,
            Ordering::Equal => return node,
            Ordering::Greater => Dir::Right,
        };

        outcome.events.push(Event::welcomed(&node.label, &label));

        let child = node.children[dir as usize].take();
        node.children[dir as usize] = Some(Self::insert_at(child, label, weight, outcome));

        let mut node = Self::rebalance_inserted(node, dir, weight);
        node.update_height();
        node
    }

    // Restores the balance of `node` after `weight` was inserted into its `dir` subtree.
    fn rebalance_inserted(node: Box<Node>, dir: Dir, weight: Weight) -> Box<Node> {
        if height(node.child(dir)) - height(node.child(!dir)) <= 1 {
            return node;
        }

        let Some(child) = node.child(dir) else {
            return node;
        };

        let outer = match dir {
            Dir::Left => weight < child.weight,
            Dir::Right => weight > child.weight,
        };

        if outer {
            rotate(node, !dir)
        } else {
            rotate_twice(node, !dir)
        }
    }

    /// Removes the node holding `weight`.
    ///
    /// `label` is the caller's name for the member being removed; nodes are matched by weight
    /// alone. If `weight` is absent the tree is left untouched and the returned outcome is not
    /// applied. Otherwise the outcome holds a single [`Event::Departed`].
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn delete(&mut self, label: &str, weight: Weight) -> Outcome {
        let mut events = Vec::new();

        log::trace!("removing {label} at {weight}");
        let (root, removed) = Self::remove_at(self.root.take(), weight, true, &mut events);
        self.root = root;

        let Some(removed) = removed else {
            log::debug!("weight {weight} is not present, ignoring delete");
            return Outcome {
                applied: false,
                events,
            };
        };

        if removed.label != label {
            log::warn!(
                "removed {} at {weight}, which was requested as {label}",
                removed.label
            );
        }

        self.len -= 1;

        Outcome {
            applied: true,
            events,
        }
    }

    // Removes `weight` from the subtree at `link`.
    //
    // Returns the new subtree root and the detached node, which carries the removed label and
    // weight. `announce` is only set on the outermost call for the requested weight; the
    // recursive removal of a two-child node's successor is not reported.
    fn remove_at(
        link: Link,
        weight: Weight,
        announce: bool,
        events: &mut Vec<Event>,
    ) -> (Link, Link) {
        let Some(mut node) = link else {
            return (None, None);
        };

        let dir = match weight.cmp(&node.weight) {
            Ordering::Less => Dir::Left,
            Ordering::Greater => Dir::Right,
            Ordering::Equal => {
                let [left, right] = mem::take(&mut node.children);

                let replacement = match (left, right) {
                    (Some(left), Some(right)) => {
                        let successor = right.min();
                        let successor_weight = successor.weight;
                        if announce {
                            events.push(Event::departed(&node.label, Some(&successor.label)));
                        }

                        let (right, successor) =
                            Self::remove_at(Some(right), successor_weight, false, events);

                        // The successor's payload moves into `node`, which keeps its place in
                        // the tree. The successor's box leaves carrying the removed payload.
                        let mut detached = successor;
                        if let Some(detached) = detached.as_deref_mut() {
                            mem::swap(&mut node.label, &mut detached.label);
                            mem::swap(&mut node.weight, &mut detached.weight);
                        }

                        node.children = [Some(left), right];
                        return (Some(Self::rebalance_removed(node)), detached);
                    }

                    (Some(child), None) | (None, Some(child)) => {
                        if announce {
                            events.push(Event::departed(&node.label, Some(&child.label)));
                        }
                        child
                    }

                    (None, None) => {
                        if announce {
                            events.push(Event::departed(&node.label, None));
                        }
                        return (None, Some(node));
                    }
                };

                return (Some(Self::rebalance_removed(replacement)), Some(node));
            }
        };

        let child = node.children[dir as usize].take();
        let (child, removed) = Self::remove_at(child, weight, announce, events);
        node.children[dir as usize] = child;

        (Some(Self::rebalance_removed(node)), removed)
    }

    // Restores the balance of `node` after a removal somewhere below it.
    fn rebalance_removed(mut node: Box<Node>) -> Box<Node> {
        node.update_height();
        let balance = node.balance();

        if balance > 1 {
            if node.left().map_or(0, Node::balance) >= 0 {
                rotate(node, Dir::Right)
            } else {
                rotate_twice(node, Dir::Right)
            }
        } else if balance < -1 {
            if node.right().map_or(0, Node::balance) <= 0 {
                rotate(node, Dir::Left)
            } else {
                rotate_twice(node, Dir::Left)
            }
        } else {
            node
        }
    }

    /// Clears the tree, removing all nodes.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        let count = self
            .root
            .as_deref()
            .map_or(0, |root| Self::assert_invariants_at(root, None, None));

        assert_eq!(count, self.len, "cached length does not match node count");
    }

    // Checks the subtree at `node`, whose weights must lie strictly between `lower` and
    // `upper`. Returns the number of nodes in the subtree.
    fn assert_invariants_at(node: &Node, lower: Option<Weight>, upper: Option<Weight>) -> usize {
        if let Some(lower) = lower {
            assert!(node.weight > lower, "{} is out of order", node.weight);
        }
        if let Some(upper) = upper {
            assert!(node.weight < upper, "{} is out of order", node.weight);
        }

        let left_height = height(node.child(Dir::Left));
        let right_height = height(node.child(Dir::Right));

        // Ensure the cached height is accurate.
        assert_eq!(
            node.height,
            1 + left_height.max(right_height),
            "stale height at {}",
            node.weight
        );

        // Ensure the node is balanced.
        assert!(
            (left_height - right_height).abs() <= 1,
            "{} is unbalanced: {left_height} vs {right_height}",
            node.weight
        );

        let left = node
            .left()
            .map_or(0, |l| Self::assert_invariants_at(l, lower, Some(node.weight)));
        let right = node
            .right()
            .map_or(0, |r| Self::assert_invariants_at(r, Some(node.weight), upper));

        1 + left + right
    }
}

impl Node {
    fn new(label: String, weight: Weight) -> Node {
        Node {
            label,
            weight,
            height: 0,
            children: [None, None],
        }
    }

    /// Returns the label stored in this node.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the weight this node is ordered by.
    pub fn weight(&self) -> Weight {
        self.weight
    }

    /// Returns the height of the subtree rooted at this node. Leaves have height 0.
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn left(&self) -> Option<&Node> {
        self.children[Dir::Left as usize].as_deref()
    }

    pub fn right(&self) -> Option<&Node> {
        self.children[Dir::Right as usize].as_deref()
    }

    /// Returns the node with the minimum weight in this subtree.
    pub fn min(&self) -> &Node {
        let mut cur = self;
        while let Some(left) = cur.left() {
            cur = left;
        }
        cur
    }

    /// Returns the node with the maximum weight in this subtree.
    pub fn max(&self) -> &Node {
        let mut cur = self;
        while let Some(right) = cur.right() {
            cur = right;
        }
        cur
    }

    #[inline]
    fn child(&self, dir: Dir) -> &Link {
        &self.children[dir as usize]
    }

    #[inline]
    fn balance(&self) -> i32 {
        height(self.child(Dir::Left)) - height(self.child(Dir::Right))
    }

    #[inline]
    fn update_height(&mut self) {
        self.height = 1 + height(self.child(Dir::Left)).max(height(self.child(Dir::Right)));
    }
}

#[inline]
fn height(link: &Link) -> i32 {
    link.as_ref().map_or(-1, |node| node.height)
}

// Performs a single rotation, moving `down` one level towards `dir` and raising its `!dir`
// child in its place. Returns the raised node.
//
// Only the heights of the two nodes involved are updated.
fn rotate(mut down: Box<Node>, dir: Dir) -> Box<Node> {
    let Some(mut up) = down.children[!dir as usize].take() else {
        // Rotations only ever happen towards the light side of a heavy node.
        return down;
    };

    log::trace!("rotating {} {dir:?} under {}", down.weight, up.weight);

    // The `dir` subtree of `up` moves across to become the `!dir` subtree of `down`.
    down.children[!dir as usize] = up.children[dir as usize].take();
    down.update_height();

    up.children[dir as usize] = Some(down);
    up.update_height();

    up
}

// Performs a double rotation: first the `!dir` child of `down` is rotated away from `dir`,
// then `down` itself is rotated towards `dir`.
fn rotate_twice(mut down: Box<Node>, dir: Dir) -> Box<Node> {
    if let Some(child) = down.children[!dir as usize].take() {
        down.children[!dir as usize] = Some(rotate(child, !dir));
    }

    rotate(down, dir)
}

#[cfg(test)]
mod tree_tests {
    use super::*;

    fn w(value: f64) -> Weight {
        Weight::new(value).unwrap()
    }

    fn keys(tree: &AvlTree) -> Vec<f64> {
        tree.iter().map(|node| node.weight().get()).collect()
    }

    #[test]
    fn empty_tree() {
        let tree = AvlTree::new();

        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), -1);
        assert!(matches!(tree.find_min(), Err(Error::EmptyTree)));
        assert!(matches!(tree.find_max(), Err(Error::EmptyTree)));
        tree.assert_invariants();
    }

    #[test]
    fn single_right_rotation() {
        let mut tree = AvlTree::new();
        for (label, weight) in [("c", 3.0), ("b", 2.0), ("a", 1.0)] {
            let _ = tree.insert(label, w(weight));
            tree.assert_invariants();
        }

        let root = tree.root().unwrap();
        assert_eq!(root.label(), "b");
        assert_eq!(root.height(), 1);
        assert_eq!(root.left().unwrap().label(), "a");
        assert_eq!(root.right().unwrap().label(), "c");
    }

    #[test]
    fn left_right_double_rotation() {
        let mut tree = AvlTree::new();
        for (label, weight) in [("c", 3.0), ("a", 1.0), ("b", 2.0)] {
            let _ = tree.insert(label, w(weight));
            tree.assert_invariants();
        }

        let root = tree.root().unwrap();
        assert_eq!(root.label(), "b");
        assert_eq!(root.left().unwrap().label(), "a");
        assert_eq!(root.right().unwrap().label(), "c");
    }

    #[test]
    fn right_left_double_rotation() {
        let mut tree = AvlTree::new();
        for (label, weight) in [("a", 1.0), ("c", 3.0), ("b", 2.0)] {
            let _ = tree.insert(label, w(weight));
            tree.assert_invariants();
        }

        assert_eq!(tree.root().unwrap().label(), "b");
        assert_eq!(keys(&tree), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn insert_reports_descent() {
        let mut tree = AvlTree::new();
        let founder = tree.insert("Ada", w(50.0));
        assert!(founder.applied);
        assert!(founder.events.is_empty());

        let _ = tree.insert("Brook", w(30.0));
        let outcome = tree.insert("Cole", w(40.0));

        assert!(outcome.applied);
        assert_eq!(
            outcome.events,
            [Event::welcomed("Ada", "Cole"), Event::welcomed("Brook", "Cole")]
        );

        // The double rotation raised Cole to the root.
        assert_eq!(tree.root().unwrap().label(), "Cole");
    }

    #[test]
    fn duplicate_insert_is_ignored() {
        let mut tree = AvlTree::new();
        for (label, weight) in [("a", 10.0), ("b", 5.0), ("c", 15.0)] {
            let _ = tree.insert(label, w(weight));
        }
        let before = tree.clone();

        let outcome = tree.insert("impostor", w(5.0));

        assert!(!outcome.applied);
        assert_eq!(outcome.events, [Event::welcomed("a", "impostor")]);
        assert_eq!(tree, before);
        assert_eq!(tree.get(w(5.0)).unwrap().label(), "b");
    }

    #[test]
    fn delete_leaf() {
        let mut tree = AvlTree::new();
        for (label, weight) in [("a", 10.0), ("b", 5.0), ("c", 15.0)] {
            let _ = tree.insert(label, w(weight));
        }

        let outcome = tree.delete("b", w(5.0));

        assert!(outcome.applied);
        assert_eq!(outcome.events, [Event::departed("b", None)]);
        assert_eq!(keys(&tree), [10.0, 15.0]);
        tree.assert_invariants();
    }

    #[test]
    fn delete_unary_node() {
        let mut tree = AvlTree::new();
        for (label, weight) in [("a", 10.0), ("b", 5.0), ("c", 15.0), ("d", 20.0)] {
            let _ = tree.insert(label, w(weight));
        }

        let outcome = tree.delete("c", w(15.0));

        assert_eq!(outcome.events, [Event::departed("c", Some("d"))]);
        assert_eq!(keys(&tree), [5.0, 10.0, 20.0]);
        tree.assert_invariants();
    }

    #[test]
    fn delete_binary_node_reports_once() {
        let mut tree = AvlTree::new();
        for (label, weight) in [
            ("a", 10.0),
            ("b", 5.0),
            ("c", 15.0),
            ("d", 12.0),
            ("e", 20.0),
        ] {
            let _ = tree.insert(label, w(weight));
        }

        let outcome = tree.delete("a", w(10.0));

        assert!(outcome.applied);
        assert_eq!(outcome.events, [Event::departed("a", Some("d"))]);

        let root = tree.root().unwrap();
        assert_eq!(root.label(), "d");
        assert_eq!(root.weight(), w(12.0));
        assert_eq!(tree.len(), 4);
        tree.assert_invariants();
    }

    #[test]
    fn delete_rebalances_with_balanced_child() {
        // After removing 2, the right child 6 is exactly balanced. This must resolve to a
        // single left rotation.
        let mut tree = AvlTree::new();
        for weight in [4.0, 2.0, 6.0, 5.0, 7.0] {
            let _ = tree.insert(weight.to_string(), w(weight));
        }
        let _ = tree.delete("2", w(2.0));
        tree.assert_invariants();

        let root = tree.root().unwrap();
        assert_eq!(root.weight(), w(6.0));
        assert_eq!(root.left().unwrap().weight(), w(4.0));
        assert_eq!(root.left().unwrap().right().unwrap().weight(), w(5.0));
    }

    #[test]
    fn delete_absent_is_ignored() {
        let mut tree = AvlTree::new();
        let _ = tree.insert("a", w(1.0));
        let before = tree.clone();

        let outcome = tree.delete("ghost", w(2.0));

        assert!(!outcome.applied);
        assert!(outcome.events.is_empty());
        assert_eq!(tree, before);

        let mut empty = AvlTree::new();
        assert!(!empty.delete("ghost", w(2.0)).applied);
    }

    #[test]
    fn min_max() {
        let mut tree = AvlTree::new();
        for weight in [8.5, -2.25, 13.0, 0.0, 4.75] {
            let _ = tree.insert(weight.to_string(), w(weight));
        }

        assert_eq!(tree.find_min().unwrap().weight(), w(-2.25));
        assert_eq!(tree.find_max().unwrap().weight(), w(13.0));

        let root = tree.root().unwrap();
        assert_eq!(root.left().unwrap().max().weight(), w(4.75));
        assert_eq!(root.right().unwrap().min().weight(), w(13.0));
    }

    #[test]
    fn clear() {
        let mut tree = AvlTree::new();
        for weight in 0..32 {
            let _ = tree.insert("m", w(weight.into()));
        }
        assert_eq!(tree.len(), 32);

        tree.clear();
        assert!(tree.is_empty());
        tree.assert_invariants();
    }
}
