use std::collections::VecDeque;

use crate::{AvlTree, Node};

/// An in-order iterator over the nodes of an [`AvlTree`], by increasing weight.
pub struct Iter<'tree> {
    // The nodes whose left subtrees are being visited, innermost last.
    stack: Vec<&'tree Node>,
    len: usize,
}

impl<'tree> Iter<'tree> {
    pub(crate) fn new(tree: &'tree AvlTree) -> Self {
        let mut iter = Iter {
            stack: Vec::new(),
            len: tree.len(),
        };

        iter.descend(tree.root());
        iter
    }

    // Upon entering a new subtree, push its left spine so the minimum ends up on top.
    fn descend(&mut self, mut opt_cur: Option<&'tree Node>) {
        while let Some(cur) = opt_cur {
            self.stack.push(cur);
            opt_cur = cur.left();
        }
    }
}

impl<'tree> Iterator for Iter<'tree> {
    type Item = &'tree Node;

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.stack.pop()?;

        // The left subtree of `cur` has been exhausted. Its right subtree is up next.
        self.descend(cur.right());
        self.len -= 1;

        Some(cur)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl ExactSizeIterator for Iter<'_> {}

/// A breadth-first iterator over the levels of an [`AvlTree`].
///
/// Level `d` holds every node at depth `d`, from left to right.
pub struct Levels<'tree> {
    queue: VecDeque<&'tree Node>,
}

impl<'tree> Levels<'tree> {
    pub(crate) fn new(tree: &'tree AvlTree) -> Self {
        Levels {
            queue: tree.root().into_iter().collect(),
        }
    }
}

impl<'tree> Iterator for Levels<'tree> {
    type Item = Vec<&'tree Node>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.queue.is_empty() {
            return None;
        }

        // Everything queued belongs to the current level; children go behind it.
        let level: Vec<_> = self.queue.drain(..).collect();
        for node in &level {
            self.queue.extend(node.left());
            self.queue.extend(node.right());
        }

        Some(level)
    }
}

impl AvlTree {
    /// Returns an iterator over the nodes of the tree, by increasing weight.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Returns an iterator over the levels of the tree, starting at the root.
    pub fn levels(&self) -> Levels<'_> {
        Levels::new(self)
    }
}

impl<'tree> IntoIterator for &'tree AvlTree {
    type Item = &'tree Node;
    type IntoIter = Iter<'tree>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
