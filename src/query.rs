use core::cmp::Ordering;

use crate::{AvlTree, Error, Node, Weight};

/// The rank reported for a weight that is not in the tree.
pub const NOT_FOUND: i32 = -1;

impl AvlTree {
    /// Returns the depth at which `weight` is found, counting the root as 0, or [`NOT_FOUND`].
    ///
    /// This is the number of comparisons made on the search path before the match, not the
    /// position of `weight` in sorted order.
    pub fn search_rank(&self, weight: Weight) -> i32 {
        let mut opt_cur = self.root();
        let mut depth = 0;

        while let Some(cur) = opt_cur {
            match weight.cmp(&cur.weight) {
                Ordering::Less => opt_cur = cur.left(),
                Ordering::Equal => return depth,
                Ordering::Greater => opt_cur = cur.right(),
            }
            depth += 1;
        }

        NOT_FOUND
    }

    /// Returns the node at which the search paths of `a` and `b` part ways.
    ///
    /// The descent goes left while both weights are less than the current node and right
    /// while both are greater. It stops at the first node that lies between them (inclusive),
    /// or at the last node on the path if the shared direction leads to an absent child.
    pub fn target_query(&self, a: Weight, b: Weight) -> Result<&Node, Error> {
        let mut cur = self.root().ok_or(Error::EmptyTree)?;

        loop {
            let next = if a < cur.weight && b < cur.weight {
                cur.left()
            } else if a > cur.weight && b > cur.weight {
                cur.right()
            } else {
                return Ok(cur);
            };

            match next {
                Some(next) => cur = next,
                None => return Ok(cur),
            }
        }
    }

    /// Returns every node at the depth of `weight`, from left to right.
    ///
    /// If `weight` is not in the tree, the result is empty.
    pub fn rank_group_query(&self, weight: Weight) -> Vec<&Node> {
        let Ok(depth) = usize::try_from(self.search_rank(weight)) else {
            return Vec::new();
        };

        self.levels().nth(depth).unwrap_or_default()
    }

    /// Returns the size of the largest set of nodes in which no node is the parent of another.
    ///
    /// Nodes are counted, not weighed. This completes in _O(n)_ time.
    pub fn max_weight_independent_set_size(&self) -> usize {
        let (with, without) = independent_sets(self.root());
        with.max(without)
    }
}

// Returns the largest independent sets of the subtree at `opt_node` that respectively include
// and exclude its root.
fn independent_sets(opt_node: Option<&Node>) -> (usize, usize) {
    let Some(node) = opt_node else {
        return (0, 0);
    };

    let (left_with, left_without) = independent_sets(node.left());
    let (right_with, right_without) = independent_sets(node.right());

    let with = 1 + left_without + right_without;
    let without = left_with.max(left_without) + right_with.max(right_without);

    (with, without)
}
