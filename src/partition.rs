//! Partition refinement over a tree of blocks.
//!
//! A [`PartitionTree`] partitions the elements `0..n` into blocks. Splitting
//! a block never destroys it: the block becomes an internal node and the
//! parts become its children. The current partition is the set of leaves.
//!
//! Block ids stay valid after a split, so callers can re-examine only the
//! blocks affected by a split instead of recomputing the whole partition.
//!
//! ```text
//!            [0 1 2 3 4 5]
//!            /           \
//!        [0 3]         [1 2 4 5]
//!                      /   |   \
//!                  [1 4]  [2]  [5]
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Index of a block in a [`PartitionTree`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BlockId(usize);

impl BlockId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Block {
    members: Vec<usize>,
    children: Vec<BlockId>,
}

#[derive(Debug, Clone)]
pub struct PartitionTree {
    blocks: Vec<Block>,
    block_of: Vec<BlockId>,
    num_leaves: usize,
}

impl PartitionTree {
    /// Creates a partition of `0..size` whose leaves are the given `classes`.
    ///
    /// The root holds every element; each non-empty class becomes a child of
    /// the root. Empty classes are skipped.
    ///
    /// # Panics
    ///
    /// Panics if the classes do not cover `0..size` exactly once.
    pub fn new(size: usize, classes: impl IntoIterator<Item = Vec<usize>>) -> Self {
        let root = BlockId(0);
        let mut tree = Self {
            blocks: vec![Block {
                members: (0..size).collect(),
                children: Vec::new(),
            }],
            block_of: vec![root; size],
            num_leaves: 1,
        };

        let mut seen = vec![false; size];
        let classes: Vec<Vec<usize>> = classes.into_iter().filter(|class| !class.is_empty()).collect();
        for class in &classes {
            for &x in class {
                assert!(x < size, "element {} is out of range 0..{}", x, size);
                assert!(!seen[x], "element {} appears in two classes", x);
                seen[x] = true;
            }
        }
        assert!(seen.iter().all(|&s| s), "classes must cover every element");

        if classes.len() > 1 {
            tree.attach_children(root, classes);
        }
        tree
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.block_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.block_of.is_empty()
    }

    /// Number of blocks in the current partition (leaves).
    pub fn num_blocks(&self) -> usize {
        self.num_leaves
    }

    /// The leaf block holding `x`.
    pub fn block_of(&self, x: usize) -> BlockId {
        self.block_of[x]
    }

    pub fn members(&self, block: BlockId) -> &[usize] {
        &self.blocks[block.0].members
    }

    pub fn is_leaf(&self, block: BlockId) -> bool {
        self.blocks[block.0].children.is_empty()
    }

    /// Iterates over the blocks of the current partition.
    pub fn leaves(&self) -> impl Iterator<Item = BlockId> + '_ {
        (0..self.blocks.len()).map(BlockId).filter(|&b| self.is_leaf(b))
    }

    /// Splits a leaf `block` by key.
    ///
    /// `keys[i]` is the key of `members(block)[i]`. Members with equal keys
    /// stay together; groups are ordered by first appearance, so the group of
    /// the first member (the representative) comes first. Returns the new
    /// children, or an empty slice if all keys are equal.
    ///
    /// # Panics
    ///
    /// Panics if `block` is not a leaf or `keys` has the wrong length.
    pub fn split_by<K: Eq + Hash>(&mut self, block: BlockId, keys: Vec<K>) -> &[BlockId] {
        assert!(self.is_leaf(block), "block {} is already split", block);
        assert_eq!(keys.len(), self.members(block).len());

        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut group_of: HashMap<K, usize> = HashMap::new();
        for (&x, key) in self.blocks[block.0].members.iter().zip(keys) {
            let next = groups.len();
            let g = *group_of.entry(key).or_insert(next);
            if g == next {
                groups.push(Vec::new());
            }
            groups[g].push(x);
        }

        if groups.len() > 1 {
            self.attach_children(block, groups);
        }
        &self.blocks[block.0].children
    }

    fn attach_children(&mut self, block: BlockId, groups: Vec<Vec<usize>>) {
        let mut children = Vec::with_capacity(groups.len());
        for members in groups {
            let child = BlockId(self.blocks.len());
            for &x in &members {
                self.block_of[x] = child;
            }
            self.blocks.push(Block {
                members,
                children: Vec::new(),
            });
            children.push(child);
        }
        self.num_leaves += children.len() - 1;
        self.blocks[block.0].children = children;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_classes() {
        let tree = PartitionTree::new(5, [vec![0, 3], vec![1, 2, 4]]);
        assert_eq!(tree.num_blocks(), 2);
        assert_eq!(tree.block_of(0), tree.block_of(3));
        assert_ne!(tree.block_of(0), tree.block_of(1));
        assert_eq!(tree.leaves().count(), 2);
    }

    #[test]
    fn test_single_class_stays_at_root() {
        let tree = PartitionTree::new(3, [vec![0, 1, 2], vec![]]);
        assert_eq!(tree.num_blocks(), 1);
        assert_eq!(tree.block_of(2), BlockId(0));
        assert!(tree.is_leaf(BlockId(0)));
    }

    #[test]
    fn test_split_by_keys() {
        let mut tree = PartitionTree::new(6, [vec![0, 3], vec![1, 2, 4, 5]]);
        let block = tree.block_of(1);
        let children = tree.split_by(block, vec!['x', 'y', 'x', 'z']).to_vec();
        assert_eq!(children.len(), 3);
        assert_eq!(tree.members(children[0]), &[1, 4]);
        assert_eq!(tree.members(children[1]), &[2]);
        assert_eq!(tree.members(children[2]), &[5]);
        assert_eq!(tree.num_blocks(), 4);
        assert!(!tree.is_leaf(block));
        assert!(children.iter().all(|&c| tree.is_leaf(c)));
    }

    #[test]
    fn test_split_with_equal_keys_is_noop() {
        let mut tree = PartitionTree::new(3, [vec![0, 1, 2]]);
        assert!(tree.split_by(BlockId(0), vec![7, 7, 7]).is_empty());
        assert_eq!(tree.num_blocks(), 1);
    }

    #[test]
    #[should_panic(expected = "appears in two classes")]
    fn test_overlapping_classes_panic() {
        PartitionTree::new(2, [vec![0, 1], vec![1]]);
    }
}
