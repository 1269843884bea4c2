//! # ordered-tree
//!
//! An ordered key-value container backed by an unbalanced binary search tree.
//!
//! ## Overview
//!
//! [`OrderedTree`] supports three fundamental operations:
//!
//! - **insert**: attach a new leaf, or overwrite the value of an equal key
//! - **find**: return the value stored under a key
//! - **remove**: splice a node out, promoting its in-order successor when it
//!   has two children
//!
//! Each node keeps a back-link to its parent, which removal uses to rewrite
//! the exact link that refers to the node being spliced out. The tree never
//! rebalances itself, so its height depends on insertion order.
//!
//! `find` and `remove` report a missing key as [`TreeError::KeyNotFound`].
//!
//! ## Logging
//!
//! Structural changes are reported through the [`log`] facade at `trace`
//! level and lookup misses at `debug` level. The crate installs no logger.
//!
//! ## Example
//!
//! ```rust
//! use ordered_tree::{OrderedTree, TreeError};
//!
//! let mut tree = OrderedTree::new();
//! for key in [3, 1, 4, 6, 9, 2, 5, 7] {
//!     tree.insert(key, key * 10);
//! }
//!
//! assert_eq!(tree.find(&7), Ok(&70));
//! assert_eq!(tree.remove(&4), Ok(40));
//! assert_eq!(tree.find(&4), Err(TreeError::KeyNotFound));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;
mod tree;

pub use error::TreeError;
pub use tree::OrderedTree;
