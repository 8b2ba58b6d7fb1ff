//! Read-only views of single nodes.

use std::fmt::{self, Debug};

use super::{
    iterato::{AncestorsIter, BfsIter, PreorderIter},
    Forest, ForestError, KeyComparer, NaturalKeys, NodeKind, TreeNodeId,
};

/// A view of one node of a [`Forest`].
///
/// Views are created on demand by lookups and iteration and never mutate the forest.
/// They are `Copy`: hold on to them as long as the forest is borrowed.
pub struct TreeNode<'a, K, M, C: KeyComparer<K> = NaturalKeys> {
    forest: &'a Forest<K, M, C>,
    id: TreeNodeId,
}

impl<K, M, C: KeyComparer<K>> Clone for TreeNode<'_, K, M, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, M, C: KeyComparer<K>> Copy for TreeNode<'_, K, M, C> {}

impl<'a, K, M, C: KeyComparer<K>> TreeNode<'a, K, M, C> {
    pub(crate) fn new(forest: &'a Forest<K, M, C>, id: TreeNodeId) -> Self {
        TreeNode { forest, id }
    }

    pub fn id(&self) -> TreeNodeId {
        self.id
    }

    pub fn forest(&self) -> &'a Forest<K, M, C> {
        self.forest
    }

    /// The model of the first item seen with this node's key.
    pub fn model(&self) -> &'a M {
        &self.forest.nodes[self.id.0].model
    }

    pub fn key(&self) -> &'a K {
        &self.forest.nodes[self.id.0].key
    }

    pub fn kind(&self) -> NodeKind {
        self.forest.nodes[self.id.0].kind
    }

    pub fn is_root(&self) -> bool {
        self.kind() == NodeKind::Root
    }

    pub fn is_leaf(&self) -> bool {
        self.forest.nodes[self.id.0].children.is_empty()
    }

    pub fn n_children(&self) -> usize {
        self.forest.nodes[self.id.0].children.len()
    }

    /// A fresh lazy iterator over the children, in the order they were linked.
    pub fn children(&self) -> Views<'a, K, M, C> {
        Views::new(self.forest, &self.forest.nodes[self.id.0].children)
    }

    /// The `index`-th child.
    pub fn child(&self, index: usize) -> Result<Self, ForestError> {
        self.children()
            .nth(index)
            .ok_or(ForestError::IndexOutOfRange {
                index,
                len: self.n_children(),
            })
    }

    /// The resolved parents, in the order they were declared. Orphans are skipped, like in
    /// lookups, so this is empty for a root and for a node hanging only below orphans.
    pub fn parents(&self) -> Views<'a, K, M, C> {
        Views::new(self.forest, &self.forest.nodes[self.id.0].parents)
    }

    /// The first resolved, navigable parent, `None` for a root.
    pub fn parent(&self) -> Option<Self> {
        self.parents().next()
    }

    /// Every parent key the items declared for this node, including the unresolved ones.
    pub fn declared_parents(&self) -> &'a [K] {
        &self.forest.nodes[self.id.0].declared_parents
    }

    /// This node, then its first parent, then that node's first parent, up to the topmost
    /// navigable ancestor.
    pub fn ancestors(&self) -> impl Iterator<Item = Self> + 'a {
        let forest = self.forest;
        AncestorsIter::new(forest, self.id).map(move |id| TreeNode::new(forest, id))
    }

    /// Models on the path from the root (or the topmost ancestor below an orphan) down to
    /// this node, both ends included.
    ///
    /// Only the first parent is followed, so a node with several parents gets one path.
    pub fn breadcrumb(&self) -> Vec<&'a M> {
        let mut crumbs: Vec<_> = self.ancestors().map(|n| n.model()).collect();
        crumbs.reverse();
        crumbs
    }

    /// Number of first-parent steps up to the topmost navigable ancestor.
    pub fn depth(&self) -> usize {
        self.ancestors().count() - 1
    }

    /// Pre-order walk of the subtree below this node, this node first.
    pub fn descendants(&self) -> impl Iterator<Item = Self> + 'a {
        let forest = self.forest;
        PreorderIter::new(forest, self.id).map(move |id| TreeNode::new(forest, id))
    }

    /// Breadth-first walk of the subtree below this node, this node first.
    pub fn bfs(&self) -> impl Iterator<Item = Self> + 'a {
        let forest = self.forest;
        BfsIter::new(forest, self.id).map(move |id| TreeNode::new(forest, id))
    }
}

impl<'a, K, M, C: KeyComparer<K>> IntoIterator for TreeNode<'a, K, M, C> {
    type Item = TreeNode<'a, K, M, C>;
    type IntoIter = Views<'a, K, M, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.children()
    }
}

impl<K, M, C: KeyComparer<K>> PartialEq for TreeNode<'_, K, M, C> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.forest, other.forest) && self.id == other.id
    }
}

impl<K, M, C: KeyComparer<K>> Eq for TreeNode<'_, K, M, C> {}

impl<K: Debug, M: Debug, C: KeyComparer<K>> Debug for TreeNode<'_, K, M, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeNode")
            .field("id", &self.id)
            .field("key", self.key())
            .field("model", self.model())
            .finish()
    }
}

/// Lazily resolves a list of node ids into views.
///
/// Ids that do not resolve to a navigable node (see [`Forest::node`]) are skipped rather
/// than reported.
pub struct Views<'a, K, M, C: KeyComparer<K> = NaturalKeys> {
    forest: &'a Forest<K, M, C>,
    ids: std::slice::Iter<'a, TreeNodeId>,
}

impl<'a, K, M, C: KeyComparer<K>> Views<'a, K, M, C> {
    pub(crate) fn new(forest: &'a Forest<K, M, C>, ids: &'a [TreeNodeId]) -> Self {
        Views {
            forest,
            ids: ids.iter(),
        }
    }
}

impl<K, M, C: KeyComparer<K>> Clone for Views<'_, K, M, C> {
    fn clone(&self) -> Self {
        Views {
            forest: self.forest,
            ids: self.ids.clone(),
        }
    }
}

impl<'a, K, M, C: KeyComparer<K>> Iterator for Views<'a, K, M, C> {
    type Item = TreeNode<'a, K, M, C>;

    fn next(&mut self) -> Option<Self::Item> {
        let forest = self.forest;
        self.ids.by_ref().find_map(|&id| forest.node(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.ids.size_hint().1)
    }
}
