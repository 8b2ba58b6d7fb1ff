//! # Forestry
//!
//! Forestry builds keyed forests out of flat lists of items that point at their parents,
//! such as rows of a category table, menu entries or org-chart records, and lets you walk them.
//!
//! Items sharing a key are merged into a single node, which is how one node can sit below
//! several parents. Items whose parents never show up are kept aside as orphans instead of
//! being silently dropped.
//!
//! ```
//! use forestry::tree::Forest;
//!
//! let rows = vec![(1, None), (2, None), (3, Some(1)), (4, Some(5))];
//! let forest = Forest::build(rows, |r| r.0, |r| r.1).unwrap();
//!
//! assert_eq!(forest.n_roots(), 2);
//! assert_eq!(forest.len(), 3);
//! assert_eq!(forest.orphans().map(|r| r.0).collect::<Vec<_>>(), [4]);
//!
//! let one = forest.get(&1).unwrap();
//! assert_eq!(one.child(0).unwrap().model().0, 3);
//! ```

pub mod tree;

pub use tree::{Forest, ForestBuilder, ForestError, TreeNode};
