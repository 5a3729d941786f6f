// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Unbalanced binary search tree used as the collision chain of a bucket.
//!
//! The tree never calls into the key type directly; every operation takes
//! the [`KeyOps`] implementation as a parameter.

use crate::KeyOps;
use std::cmp::Ordering;
use std::io::Write;

type Link<K> = Option<Box<Node<K>>>;

struct Node<K> {
    key: K,
    left: Link<K>,
    right: Link<K>,
}

impl<K> Node<K> {
    fn leaf(key: K) -> Self {
        Self {
            key,
            left: None,
            right: None,
        }
    }
}

/// Heap size of a single tree node holding a `K`
pub(crate) const fn node_size<K>() -> usize {
    std::mem::size_of::<Node<K>>()
}

/// Walks down from `link` and returns the link that either holds `key`,
/// or is the empty slot where `key` would be attached.
fn seek_mut<'t, K, O: KeyOps<Key = K>>(
    mut link: &'t mut Link<K>,
    key: &K,
    ops: &O,
) -> &'t mut Link<K> {
    loop {
        let ordering = match link.as_deref() {
            Some(node) => ops.compare(key, &node.key),
            None => return link,
        };

        if ordering == Ordering::Equal {
            return link;
        }

        let Some(node) = link else {
            return link;
        };

        link = if ordering == Ordering::Less {
            &mut node.left
        } else {
            &mut node.right
        };
    }
}

/// Unlinks the node without a left child that is reached by descending
/// left-first from `link`, putting its right subtree in its place.
///
/// Returns `None` if `link` is empty.
fn detach_leftmost<K>(mut link: &mut Link<K>) -> Option<Box<Node<K>>> {
    while link.as_ref().is_some_and(|node| node.left.is_some()) {
        let Some(node) = link else {
            break;
        };
        link = &mut node.left;
    }

    let mut node = link.take()?;
    *link = node.right.take();
    Some(node)
}

/// In-order cursor over a tree, yielding each key with its depth (root = 0)
pub struct InOrder<'a, K> {
    stack: Vec<(&'a Node<K>, usize)>,
}

impl<'a, K> InOrder<'a, K> {
    fn new(root: Option<&'a Node<K>>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root, 0);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node<K>>, mut depth: usize) {
        while let Some(n) = node {
            self.stack.push((n, depth));
            node = n.left.as_deref();
            depth += 1;
        }
    }
}

impl<'a, K> Iterator for InOrder<'a, K> {
    type Item = (usize, &'a K);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref(), depth + 1);
        Some((depth, &node.key))
    }
}

/// Binary search tree holding the keys of a single bucket
///
/// Keys are unique by [`KeyOps::compare`]. The tree is not rebalanced, so
/// its shape follows the insertion order.
///
/// The tree does not hold on to its [`KeyOps`], so dropping it frees the
/// nodes and drops the keys without calling [`KeyOps::destroy_key`].
/// Owners that release keys through their key operations must call
/// [`BucketTree::destroy`] instead, as [`HashTable`](crate::HashTable) does.
pub struct BucketTree<K> {
    root: Link<K>,
}

impl<K> Default for BucketTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> BucketTree<K> {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Returns `true` if the tree holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes on the longest root-to-leaf path.
    #[must_use]
    pub fn height(&self) -> usize {
        self.iter().map(|(depth, _)| depth + 1).max().unwrap_or(0)
    }

    /// Iterates the keys in ascending order, each with its depth (root = 0).
    #[must_use]
    pub fn iter(&self) -> InOrder<'_, K> {
        InOrder::new(self.root.as_deref())
    }

    /// Returns the stored key that compares equal to `key`, if any.
    pub fn lookup<'a, O: KeyOps<Key = K>>(&'a self, key: &K, ops: &O) -> Option<&'a K> {
        let mut node = self.root.as_deref();

        while let Some(n) = node {
            node = match ops.compare(key, &n.key) {
                Ordering::Equal => return Some(&n.key),
                Ordering::Less => n.left.as_deref(),
                Ordering::Greater => n.right.as_deref(),
            };
        }

        None
    }

    /// Attaches a clone of `key` as a new leaf.
    ///
    /// The caller has to make sure the key is not stored yet
    /// (see [`BucketTree::lookup`]).
    ///
    /// # Panics
    ///
    /// Panics if the key is already stored.
    pub fn insert<O: KeyOps<Key = K>>(&mut self, key: &K, ops: &O) {
        let slot = seek_mut(&mut self.root, key, ops);
        assert!(slot.is_none(), "key is already stored in this tree");
        *slot = Some(Box::new(Node::leaf(ops.clone_key(key))));
    }

    /// Removes the key that compares equal to `key`, releasing it through
    /// [`KeyOps::destroy_key`].
    ///
    /// Returns `false` (and changes nothing) if the key is not stored.
    pub fn remove<O: KeyOps<Key = K>>(&mut self, key: &K, ops: &O) -> bool {
        let slot = seek_mut(&mut self.root, key, ops);

        let Some(mut target) = slot.take() else {
            return false;
        };

        let replacement = match (target.left.take(), target.right.take()) {
            (None, right) => right,
            (left, None) => left,
            (Some(left), Some(mut right)) => {
                // The in-order successor is the leftmost node of the right subtree.
                // If the right child has no left child, it is the successor itself
                // and keeps its own right subtree.
                let mut successor = match detach_leftmost(&mut right.left) {
                    Some(mut successor) => {
                        successor.right = Some(right);
                        successor
                    }
                    None => right,
                };
                successor.left = Some(left);
                Some(successor)
            }
        };

        let Node { key: removed, .. } = *target;
        ops.destroy_key(removed);

        *slot = replacement;
        true
    }

    /// Writes the in-order dump `<depth>-<key>,<depth>-<key>,...`.
    ///
    /// Writes nothing for an empty tree.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the writer fails.
    pub fn print<O: KeyOps<Key = K>>(&self, ops: &O, writer: &mut dyn Write) -> std::io::Result<()> {
        for (idx, (depth, key)) in self.iter().enumerate() {
            if idx > 0 {
                writer.write_all(b",")?;
            }
            write!(writer, "{depth}-")?;
            ops.print_key(key, writer)?;
        }
        Ok(())
    }

    /// Releases every key through [`KeyOps::destroy_key`], children before
    /// their parent.
    pub fn destroy<O: KeyOps<Key = K>>(mut self, ops: &O) {
        let mut stack = Vec::new();

        if let Some(root) = self.root.take() {
            stack.push((root, false));
        }

        while let Some((mut node, children_done)) = stack.pop() {
            if children_done {
                let Node { key, .. } = *node;
                ops.destroy_key(key);
                continue;
            }

            let left = node.left.take();
            let right = node.right.take();

            stack.push((node, true));
            stack.extend(right.map(|n| (n, false)));
            stack.extend(left.map(|n| (n, false)));
        }
    }
}

impl<'a, K> IntoIterator for &'a BucketTree<K> {
    type Item = (usize, &'a K);
    type IntoIter = InOrder<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K> Drop for BucketTree<K> {
    fn drop(&mut self) {
        // NOTE: Unlink iteratively, degenerate trees can be as deep as they are long
        let mut stack: Vec<_> = self.root.take().into_iter().collect();

        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}
