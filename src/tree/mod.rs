//! Defines the keyed forest and its read-only traversal views.
//!
//! A [`Forest`] is built once, by [`ForestBuilder`], from a flat collection of items that
//! each name their own key and (optionally) the key of their parent. Items sharing a key
//! merge into one node, so a node may hang below several parents: the result is a DAG
//! whose every node is reachable from a root, plus a set of orphans whose parents never
//! turned up.
//!
//! The core components are:
//! *   [`Forest<K, M, C>`]: owns every node in an insertion-ordered arena, the list of roots
//!     and the list of orphans. `K` is the key type, `M` the model payload and `C` the
//!     [`KeyComparer`] deciding which keys are equal.
//! *   [`TreeNode`]: a cheap `Copy` view of one node, used for all navigation.
//! *   [`ForestLinks`] trait: the minimal link structure the traversal iterators in
//!     [`iterato`] walk over.
//! *   [`TreeNodeId`]: typed index of a node in the arena.
//!
//! Nothing is mutable after construction, so a forest can be shared between threads freely.

use std::{
    fmt::{self, Debug},
    ops::Index,
};

use ahash::RandomState;
use derive_more::{Display, From, Into};
use indexmap::IndexMap;
use thiserror::Error;

pub mod builder;
pub mod draw;
pub mod iterato;
pub mod key;
pub mod node;

#[cfg(feature = "serde")]
mod ser;

pub use builder::ForestBuilder;
pub use key::{CaseInsensitive, KeyComparer, KeyFn, NaturalKeys};
pub use node::{TreeNode, Views};

use iterato::{BfsIter, PreorderIter};

/// A type-safe identifier for a node within a `Forest`.
/// Wraps a `usize` index into the forest's node arena.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, From, Into, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[display(fmt = "#{}", _0)]
pub struct TreeNodeId(pub(crate) usize);

/// How the linking pass classified a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// Declared no parent.
    Root,
    /// At least one declared parent resolved.
    Attached,
    /// Declared parents, none of which resolved.
    Orphan,
}

/// A node in the arena: the first-seen key and model, plus both directions of links.
#[derive(Clone, Debug)]
pub struct ForestNode<K, M> {
    pub(crate) key: K,
    pub(crate) model: M,
    /// Parent keys as declared by the items, resolvable or not.
    pub(crate) declared_parents: Vec<K>,
    /// The declared parents that resolved, in declaration order.
    pub(crate) parents: Vec<TreeNodeId>,
    pub(crate) children: Vec<TreeNodeId>,
    pub(crate) kind: NodeKind,
}

impl<K, M> ForestNode<K, M> {
    pub(crate) fn new(key: K, model: M) -> Self {
        ForestNode {
            key,
            model,
            declared_parents: Vec::new(),
            parents: Vec::new(),
            children: Vec::new(),
            kind: NodeKind::Root,
        }
    }

    pub fn map<F, U>(self, mut transform: F) -> ForestNode<K, U>
    where
        F: FnMut(M) -> U,
    {
        ForestNode {
            key: self.key,
            model: transform(self.model),
            declared_parents: self.declared_parents,
            parents: self.parents,
            children: self.children,
            kind: self.kind,
        }
    }
}

/// A forest of keyed nodes, built once and read many times.
///
/// `K` is the key type, `M` the model stored on each node and `C` the key comparer used
/// both during construction and for [`Forest::get`]/[`Forest::try_get`] lookups.
pub struct Forest<K, M, C: KeyComparer<K> = NaturalKeys> {
    /// Every indexed node, orphans included, in first-seen order. A node's position is its id.
    pub(crate) nodes: IndexMap<C::Normalized, ForestNode<K, M>, RandomState>,
    pub(crate) roots: Vec<TreeNodeId>,
    pub(crate) orphans: Vec<TreeNodeId>,
    pub(crate) comparer: C,
}

/// Errors that can occur while building or querying a forest.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ForestError {
    #[error("Key not found in forest: {0}")]
    KeyNotFound(String),
    #[error("Index {index} out of range: {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Parent references form a cycle through: {}", .keys.join(", "))]
    Cyclic { keys: Vec<String> },
}

impl<K, M, C: KeyComparer<K>> Index<TreeNodeId> for Forest<K, M, C> {
    type Output = M;
    fn index(&self, index: TreeNodeId) -> &Self::Output {
        &self.nodes[index.0].model
    }
}

impl<K, M, C: KeyComparer<K>> Forest<K, M, C> {
    /// Number of navigable nodes: every indexed node except the orphans.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.orphans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of indexed nodes, orphans included.
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_roots(&self) -> usize {
        self.roots.len()
    }

    /// Returns the `index`-th root, in the order roots were first encountered.
    pub fn root(&self, index: usize) -> Result<TreeNode<'_, K, M, C>, ForestError> {
        self.roots
            .get(index)
            .map(|&id| TreeNode::new(self, id))
            .ok_or(ForestError::IndexOutOfRange {
                index,
                len: self.roots.len(),
            })
    }

    /// Looks up a navigable node by key.
    ///
    /// Fails with [`ForestError::KeyNotFound`] if the key was never indexed or belongs to an
    /// orphan.
    pub fn get(&self, key: &K) -> Result<TreeNode<'_, K, M, C>, ForestError>
    where
        K: fmt::Display,
    {
        self.try_get(key)
            .ok_or_else(|| ForestError::KeyNotFound(key.to_string()))
    }

    /// Non-failing variant of [`Forest::get`].
    pub fn try_get(&self, key: &K) -> Option<TreeNode<'_, K, M, C>> {
        let id = TreeNodeId(self.nodes.get_index_of(&self.comparer.normalize(key))?);
        self.node(id)
    }

    /// Returns the view of a navigable node, or `None` for an orphan or an unknown id.
    pub fn node(&self, id: TreeNodeId) -> Option<TreeNode<'_, K, M, C>> {
        match self.nodes.get_index(id.0) {
            Some((_, n)) if n.kind != NodeKind::Orphan => Some(TreeNode::new(self, id)),
            _ => None,
        }
    }

    /// Models of all orphans, in index order.
    pub fn orphans(&self) -> impl Iterator<Item = &M> + '_ {
        self.orphans.iter().map(move |&id| &self[id])
    }

    pub fn orphan_keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.orphans.iter().map(move |&id| &self.nodes[id.0].key)
    }

    /// A fresh lazy iterator over the roots.
    pub fn iter(&self) -> Views<'_, K, M, C> {
        Views::new(self, &self.roots)
    }

    pub fn iter_root_ids(&self) -> impl Iterator<Item = TreeNodeId> + '_ {
        self.roots.iter().copied()
    }

    /// Every navigable node, in index order.
    pub fn iter_nodes(&self) -> impl Iterator<Item = TreeNode<'_, K, M, C>> + '_ {
        (0..self.nodes.len()).filter_map(move |i| self.node(TreeNodeId(i)))
    }

    /// Pre-order walk over every tree, roots in order. Nodes with several parents are
    /// visited once per parent edge.
    pub fn iter_preorder(&self) -> impl Iterator<Item = TreeNode<'_, K, M, C>> + '_ {
        self.roots
            .iter()
            .flat_map(move |&root| PreorderIter::new(self, root))
            .map(move |id| TreeNode::new(self, id))
    }

    /// Breadth-first walk, one tree after the other.
    pub fn iter_bfs(&self) -> impl Iterator<Item = TreeNode<'_, K, M, C>> + '_ {
        self.roots
            .iter()
            .flat_map(move |&root| BfsIter::new(self, root))
            .map(move |id| TreeNode::new(self, id))
    }

    pub fn comparer(&self) -> &C {
        &self.comparer
    }

    /// Consumes the forest, transforming every model (orphans included) and keeping the
    /// structure as is.
    pub fn map_models<F, U>(self, mut transform: F) -> Forest<K, U, C>
    where
        F: FnMut(M) -> U,
    {
        Forest {
            nodes: self
                .nodes
                .into_iter()
                .map(|(k, n)| (k, n.map(&mut transform)))
                .collect(),
            roots: self.roots,
            orphans: self.orphans,
            comparer: self.comparer,
        }
    }
}

impl<K, I> Forest<K, I>
where
    K: std::hash::Hash + Eq + Clone + Debug,
{
    /// Builds a forest whose models are the items themselves, with natural key equality.
    ///
    /// Shorthand for `ForestBuilder::new(key_of, parent_key_of).build(items)`.
    pub fn build<'f>(
        items: impl IntoIterator<Item = I>,
        key_of: impl Fn(&I) -> K + 'f,
        parent_key_of: impl Fn(&I) -> Option<K> + 'f,
    ) -> Result<Self, ForestError>
    where
        I: 'f,
        K: 'f,
    {
        ForestBuilder::new(key_of, parent_key_of).build(items)
    }
}

impl<'a, K, M, C: KeyComparer<K>> IntoIterator for &'a Forest<K, M, C> {
    type Item = TreeNode<'a, K, M, C>;
    type IntoIter = Views<'a, K, M, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Debug, M: Debug, C: KeyComparer<K> + Debug> Debug for Forest<K, M, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Forest")
            .field("nodes", &self.nodes.values().collect::<Vec<_>>())
            .field("roots", &self.roots)
            .field("orphans", &self.orphans)
            .field("comparer", &self.comparer)
            .finish()
    }
}

// --- Link structure ---

/// The link structure the traversal iterators walk over.
pub trait ForestLinks {
    /// The first resolved parent that is not an orphan, the one breadcrumbs and ancestor
    /// walks follow.
    fn first_parent(&self, node_id: TreeNodeId) -> Option<TreeNodeId>;

    /// Returns an iterator over the direct children of the given `node_id`.
    fn iter_children(&self, node_id: TreeNodeId) -> impl Iterator<Item = TreeNodeId> + '_;
}

impl<K, M, C: KeyComparer<K>> ForestLinks for Forest<K, M, C> {
    fn first_parent(&self, node_id: TreeNodeId) -> Option<TreeNodeId> {
        let (_, n) = self.nodes.get_index(node_id.0)?;
        n.parents
            .iter()
            .copied()
            .find(|p| self.nodes[p.0].kind != NodeKind::Orphan)
    }

    fn iter_children(&self, node_id: TreeNodeId) -> impl Iterator<Item = TreeNodeId> + '_ {
        self.nodes
            .get_index(node_id.0)
            .into_iter()
            .flat_map(|(_, n)| n.children.iter().copied())
    }
}

#[cfg(test)]
mod test;
