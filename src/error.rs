//! Error types for [`OrderedTree`](crate::OrderedTree) operations.
//!
//! Lookups and removals that do not reach a node with an equal key fail
//! with [`TreeError::KeyNotFound`]. Insertion has no failure mode.

/// Represents errors that can occur when querying or mutating a tree.
///
/// # Examples
///
/// ```rust
/// use ordered_tree::{OrderedTree, TreeError};
///
/// let mut tree: OrderedTree<i32, &str> = OrderedTree::new();
/// assert_eq!(tree.find(&1), Err(TreeError::KeyNotFound));
/// assert_eq!(tree.remove(&1), Err(TreeError::KeyNotFound));
/// assert_eq!(TreeError::KeyNotFound.to_string(), "key not found");
/// ```
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeError {
    /// No node in the tree holds a key equal to the requested one.
    #[error("key not found")]
    KeyNotFound,
}
