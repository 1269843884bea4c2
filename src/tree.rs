//! Ordered key-value container based on an unbalanced Binary Search Tree.
//!
//! This module provides [`OrderedTree`], a mutable ordered map whose nodes
//! keep a back-link to their parent so that removal can rewrite the exact
//! slot that refers to a node.
//!
//! # Overview
//!
//! - O(h) insert
//! - O(h) find
//! - O(h) remove
//! - O(1) len and `is_empty`
//!
//! where h is the height of the tree. No rebalancing takes place, so
//! inserting keys in sorted order degrades the tree to a linked list and
//! h approaches N. Every walk is an explicit loop, so a degenerate tree
//! costs time but never call-stack depth.
//!
//! # Examples
//!
//! ```rust
//! use ordered_tree::{OrderedTree, TreeError};
//!
//! let mut tree = OrderedTree::new();
//! tree.insert(3, "three");
//! tree.insert(1, "one");
//! tree.insert(4, "four");
//!
//! assert_eq!(tree.find(&1), Ok(&"one"));
//! assert_eq!(tree.remove(&3), Ok("three"));
//! assert_eq!(tree.find(&3), Err(TreeError::KeyNotFound));
//! assert_eq!(tree.len(), 2);
//! ```
//!
//! # Internal Structure
//!
//! Nodes live in a dense arena owned by the tree and refer to each other by
//! arena index. The following invariants hold between public calls:
//! 1. Every key in a node's left subtree is less than the node's key, and
//!    every key in its right subtree is greater
//! 2. For every non-root node N, exactly one of `N.parent.left == N` or
//!    `N.parent.right == N` holds
//! 3. The root is the only node without a parent
//! 4. Every arena slot is reachable from the root, so `len()` is the arena length

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::mem;

use log::{debug, trace};

use crate::error::TreeError;

// =============================================================================
// Node Definition
// =============================================================================

/// Position of a node inside the tree's arena.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct NodeIndex(usize);

/// Which child link of a parent a descent follows.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Side {
    Left,
    Right,
}

/// Internal node structure.
///
/// `left` and `right` are owning links: every node is referenced by exactly
/// one child link or by the tree's root. `parent` is the non-owning
/// back-link and is only read when a node has to be spliced out.
#[derive(Clone, Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    parent: Option<NodeIndex>,
    left: Option<NodeIndex>,
    right: Option<NodeIndex>,
}

impl<K, V> Node<K, V> {
    /// Creates a new node with no children.
    const fn new_leaf(key: K, value: V, parent: Option<NodeIndex>) -> Self {
        Self {
            key,
            value,
            parent,
            left: None,
            right: None,
        }
    }

    const fn child(&self, side: Side) -> Option<NodeIndex> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    const fn child_mut(&mut self, side: Side) -> &mut Option<NodeIndex> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Returns the side under which `child` hangs off this node.
    fn side_of(&self, child: NodeIndex) -> Side {
        debug_assert!(
            (self.left == Some(child)) != (self.right == Some(child)),
            "node {child:?} must be exactly one child of its parent"
        );
        if self.left == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }
}

// =============================================================================
// OrderedTree Definition
// =============================================================================

/// An ordered map backed by an unbalanced Binary Search Tree.
///
/// Keys must implement `Ord`. Each key is stored at most once: inserting a
/// key that is already present replaces its value in place.
///
/// The empty tree is simply a tree without a root; it turns into a real
/// entry on the first insertion and goes back to having no root when the
/// last entry is removed.
///
/// `OrderedTree` has no internal synchronization. Share it across threads
/// only behind an external lock.
///
/// # Time Complexity
///
/// | Operation      | Complexity |
/// |----------------|------------|
/// | `new`          | O(1)       |
/// | `insert`       | O(h)       |
/// | `find`         | O(h)       |
/// | `remove`       | O(h)       |
/// | `contains_key` | O(h)       |
/// | `height`       | O(N)       |
/// | `len`          | O(1)       |
/// | `is_empty`     | O(1)       |
///
/// # Examples
///
/// ```rust
/// use ordered_tree::OrderedTree;
///
/// let mut tree = OrderedTree::singleton(42, "answer");
/// assert_eq!(tree.find(&42), Ok(&"answer"));
///
/// // Equal keys overwrite
/// assert_eq!(tree.insert(42, "still the answer"), Some("answer"));
/// assert_eq!(tree.len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct OrderedTree<K, V> {
    /// Arena holding every live node
    nodes: Vec<Node<K, V>>,
    /// Entry point of the tree, `None` when empty
    root: Option<NodeIndex>,
}

static_assertions::assert_impl_all!(OrderedTree<i32, String>: Send, Sync, Default, Clone);

impl<K, V> OrderedTree<K, V> {
    /// Creates a new empty tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordered_tree::OrderedTree;
    ///
    /// let tree: OrderedTree<i32, String> = OrderedTree::new();
    /// assert!(tree.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Creates a new empty tree with room for at least `capacity` entries
    /// before the arena reallocates.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordered_tree::OrderedTree;
    ///
    /// let mut tree = OrderedTree::with_capacity(16);
    /// for key in 0..16 {
    ///     tree.insert(key, key * 10);
    /// }
    /// assert_eq!(tree.len(), 16);
    /// ```
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root: None,
        }
    }

    /// Returns the number of entries in the tree.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Removes every entry, returning the tree to its empty state.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordered_tree::OrderedTree;
    ///
    /// let mut tree = OrderedTree::singleton(1, "one");
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// assert!(tree.find(&1).is_err());
    /// ```
    pub fn clear(&mut self) {
        trace!("clearing tree of {} nodes", self.nodes.len());
        self.nodes.clear();
        self.root = None;
    }

    /// Returns the number of nodes on the longest path from the root down
    /// to a leaf, or 0 for an empty tree.
    ///
    /// # Complexity
    ///
    /// O(N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordered_tree::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// assert_eq!(tree.height(), 0);
    ///
    /// // Sorted input degrades to a list
    /// for key in 0..5 {
    ///     tree.insert(key, ());
    /// }
    /// assert_eq!(tree.height(), 5);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut pending: Vec<(NodeIndex, usize)> =
            self.root.map(|root| (root, 1)).into_iter().collect();

        while let Some((index, depth)) = pending.pop() {
            height = height.max(depth);
            let node = self.node(index);
            pending.extend(
                [node.left, node.right]
                    .into_iter()
                    .flatten()
                    .map(|child| (child, depth + 1)),
            );
        }

        height
    }

    fn node(&self, index: NodeIndex) -> &Node<K, V> {
        &self.nodes[index.0]
    }

    fn node_mut(&mut self, index: NodeIndex) -> &mut Node<K, V> {
        &mut self.nodes[index.0]
    }

    fn push_node(&mut self, key: K, value: V, parent: Option<NodeIndex>) -> NodeIndex {
        let index = NodeIndex(self.nodes.len());
        self.nodes.push(Node::new_leaf(key, value, parent));
        index
    }

    /// Descends strictly left from `start` until no left child remains.
    fn leftmost(&self, start: NodeIndex) -> NodeIndex {
        let mut current = start;
        while let Some(left) = self.node(current).left {
            current = left;
        }
        current
    }

    /// Rewrites the link that refers to `target` so it refers to
    /// `replacement` instead, and points `replacement` back at the parent of
    /// `target`. When `target` is the root, the root link itself is rewritten.
    ///
    /// `target` is left fully unlinked.
    fn splice(&mut self, target: NodeIndex, replacement: Option<NodeIndex>) {
        let parent = self.node(target).parent;

        match parent {
            None => {
                debug_assert_eq!(self.root, Some(target));
                self.root = replacement;
            }
            Some(parent) => {
                let side = self.node(parent).side_of(target);
                *self.node_mut(parent).child_mut(side) = replacement;
            }
        }

        if let Some(replacement) = replacement {
            self.node_mut(replacement).parent = parent;
        }

        let node = self.node_mut(target);
        node.parent = None;
        node.left = None;
        node.right = None;

        trace!(
            "spliced node {} out (parent {:?}, replacement {:?})",
            target.0, parent, replacement
        );
    }

    /// Takes an unlinked node out of the arena.
    ///
    /// The arena's last node moves into the vacated slot, so the links
    /// that referred to it are rewritten to its new index.
    fn release(&mut self, target: NodeIndex) -> Node<K, V> {
        let last = NodeIndex(self.nodes.len() - 1);
        let released = self.nodes.swap_remove(target.0);

        if target != last {
            self.relocate(last, target);
        }

        released
    }

    /// Redirects every link to the node that moved from `from` to `to`.
    fn relocate(&mut self, from: NodeIndex, to: NodeIndex) {
        let Node {
            parent,
            left,
            right,
            ..
        } = *self.node(to);

        match parent {
            None => {
                debug_assert_eq!(self.root, Some(from));
                self.root = Some(to);
            }
            Some(parent) => {
                let side = self.node(parent).side_of(from);
                *self.node_mut(parent).child_mut(side) = Some(to);
            }
        }

        for child in [left, right].into_iter().flatten() {
            self.node_mut(child).parent = Some(to);
        }
    }

    /// Splices out a node with at most one child and releases it.
    fn unlink(&mut self, target: NodeIndex) -> Node<K, V> {
        let node = self.node(target);
        debug_assert!(node.left.is_none() || node.right.is_none());
        let child = node.left.or(node.right);

        self.splice(target, child);
        self.release(target)
    }

    /// Exchanges the key/value pairs of two distinct nodes, leaving their
    /// links untouched.
    fn swap_entries(&mut self, first: NodeIndex, second: NodeIndex) {
        debug_assert_ne!(first, second);
        let (low, high) = if first.0 < second.0 {
            (first.0, second.0)
        } else {
            (second.0, first.0)
        };
        let (head, tail) = self.nodes.split_at_mut(high);
        let (low_node, high_node) = (&mut head[low], &mut tail[0]);
        mem::swap(&mut low_node.key, &mut high_node.key);
        mem::swap(&mut low_node.value, &mut high_node.value);
    }
}

impl<K: Ord, V> OrderedTree<K, V> {
    /// Creates a tree containing a single key-value pair.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordered_tree::OrderedTree;
    ///
    /// let tree = OrderedTree::singleton(42, "answer");
    /// assert_eq!(tree.len(), 1);
    /// assert_eq!(tree.find(&42), Ok(&"answer"));
    /// ```
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        let mut tree = Self::with_capacity(1);
        tree.insert(key, value);
        tree
    }

    /// Inserts a key-value pair into the tree.
    ///
    /// A key not yet present becomes a new leaf and `None` is returned.
    /// If an equal key is already present, its value is replaced in place
    /// and the previous value is returned; no second node is created.
    ///
    /// # Complexity
    ///
    /// O(h)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordered_tree::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// assert_eq!(tree.insert(1, "one"), None);
    /// assert_eq!(tree.insert(1, "ONE"), Some("one"));
    /// assert_eq!(tree.find(&1), Ok(&"ONE"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let Some(mut current) = self.root else {
            let root = self.push_node(key, value, None);
            self.root = Some(root);
            trace!("inserted root node {}", root.0);
            return None;
        };

        loop {
            let side = match key.cmp(&self.node(current).key) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => {
                    trace!("replaced value of node {}", current.0);
                    return Some(mem::replace(&mut self.node_mut(current).value, value));
                }
            };

            match self.node(current).child(side) {
                Some(child) => current = child,
                None => {
                    let leaf = self.push_node(key, value, Some(current));
                    *self.node_mut(current).child_mut(side) = Some(leaf);
                    trace!(
                        "attached leaf {} as {side:?} child of {} ({} nodes)",
                        leaf.0,
                        current.0,
                        self.nodes.len()
                    );
                    return None;
                }
            }
        }
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// The key may be any borrowed form of the tree's key type, but the
    /// ordering on the borrowed form must match the ordering on the key type.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::KeyNotFound`] when no entry has an equal key,
    /// including when the tree is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordered_tree::{OrderedTree, TreeError};
    ///
    /// let tree = OrderedTree::singleton("hello".to_string(), 42);
    ///
    /// // Can use &str to look up String keys
    /// assert_eq!(tree.find("hello"), Ok(&42));
    /// assert_eq!(tree.find("world"), Err(TreeError::KeyNotFound));
    /// ```
    pub fn find<Q>(&self, key: &Q) -> Result<&V, TreeError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let index = self.locate(key)?;
        Ok(&self.node(index).value)
    }

    /// Returns a mutable reference to the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::KeyNotFound`] when no entry has an equal key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordered_tree::OrderedTree;
    ///
    /// let mut tree = OrderedTree::singleton(1, 10);
    /// if let Ok(value) = tree.find_mut(&1) {
    ///     *value += 1;
    /// }
    /// assert_eq!(tree.find(&1), Ok(&11));
    /// ```
    pub fn find_mut<Q>(&mut self, key: &Q) -> Result<&mut V, TreeError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let index = self.locate(key)?;
        Ok(&mut self.node_mut(index).value)
    }

    /// Returns `true` if the tree contains an entry for `key`.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.locate(key).is_ok()
    }

    /// Removes the entry stored under `key` and returns its value.
    ///
    /// A node with two children takes over the key and value of its in-order
    /// successor (the leftmost node of its right subtree) and keeps its
    /// position; the successor, which has no left child, is spliced out in
    /// its place. A node with one child is replaced by that child, and a
    /// leaf is simply detached.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::KeyNotFound`] when no entry has an equal key.
    /// The tree is left unchanged in that case.
    ///
    /// # Complexity
    ///
    /// O(h)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordered_tree::{OrderedTree, TreeError};
    ///
    /// let mut tree = OrderedTree::new();
    /// for key in [2, 1, 3] {
    ///     tree.insert(key, key * 100);
    /// }
    ///
    /// assert_eq!(tree.remove(&2), Ok(200));
    /// assert_eq!(tree.remove(&2), Err(TreeError::KeyNotFound));
    /// assert_eq!(tree.find(&1), Ok(&100));
    /// assert_eq!(tree.find(&3), Ok(&300));
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V, TreeError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let target = self.locate(key)?;
        let node = self.node(target);

        let removed = match (node.left, node.right) {
            (Some(_), Some(right)) => {
                let successor = self.leftmost(right);
                trace!("promoting successor {} into node {}", successor.0, target.0);
                // The successor leaves with the target's entry.
                self.swap_entries(target, successor);
                self.unlink(successor)
            }
            _ => self.unlink(target),
        };

        Ok(removed.value)
    }

    /// Walks down from the root comparing against `key`.
    fn locate<Q>(&self, key: &Q) -> Result<NodeIndex, TreeError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root;

        while let Some(index) = current {
            let node = self.node(index);
            current = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Ok(index),
            };
        }

        debug!("key not found among {} nodes", self.nodes.len());
        Err(TreeError::KeyNotFound)
    }
}

impl<K, V> Default for OrderedTree<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
