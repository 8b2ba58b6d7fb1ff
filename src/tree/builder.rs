//! Two-pass construction of a [`Forest`] from a flat list of items.
//!
//! 1. Indexing: every item is keyed. The first item seen with a key is projected into the
//!    node's model; every item (first or not) contributes its parent key, so repeating a key
//!    under another parent registers one node below several parents.
//! 2. Linking: nodes without declared parents become roots, in first-seen order. The others
//!    are hung below each declared parent that exists; if none exists the node is an orphan.
//!
//! A final topological sweep rejects parent references that loop back on themselves.

use std::{collections::VecDeque, fmt::Debug};

use ahash::RandomState;
use bitvec::vec::BitVec;
use indexmap::{map::Entry, IndexMap};
use itertools::Itertools;
use tracing::{debug, trace, warn};

use super::{
    Forest, ForestError, ForestNode, KeyComparer, NaturalKeys, NodeKind, TreeNodeId,
};

type Nodes<K, M, C> = IndexMap<<C as KeyComparer<K>>::Normalized, ForestNode<K, M>, RandomState>;

/// Configures and runs the construction of a [`Forest`].
///
/// `I` is the item type, `K` the key type, `M` the model type (the item itself unless
/// [`ForestBuilder::model`] sets a projection) and `C` the key comparer.
pub struct ForestBuilder<'f, I, K, M = I, C = NaturalKeys> {
    key_of: Box<dyn Fn(&I) -> K + 'f>,
    parent_key_of: Box<dyn Fn(&I) -> Option<K> + 'f>,
    model_of: Box<dyn Fn(I) -> M + 'f>,
    comparer: C,
}

impl<'f, I: 'f, K: 'f> ForestBuilder<'f, I, K> {
    /// Starts a builder from the key extractor and the parent-key extractor.
    /// `parent_key_of` returns `None` for items that are roots.
    pub fn new(
        key_of: impl Fn(&I) -> K + 'f,
        parent_key_of: impl Fn(&I) -> Option<K> + 'f,
    ) -> Self {
        ForestBuilder {
            key_of: Box::new(key_of),
            parent_key_of: Box::new(parent_key_of),
            model_of: Box::new(|item: I| item),
            comparer: NaturalKeys,
        }
    }
}

impl<'f, I, K, M, C> ForestBuilder<'f, I, K, M, C> {
    /// Projects each node's first item into the stored model.
    pub fn model<U>(self, model_of: impl Fn(I) -> U + 'f) -> ForestBuilder<'f, I, K, U, C> {
        ForestBuilder {
            key_of: self.key_of,
            parent_key_of: self.parent_key_of,
            model_of: Box::new(model_of),
            comparer: self.comparer,
        }
    }

    /// Replaces the key comparer, e.g. with [`CaseInsensitive`](super::CaseInsensitive).
    pub fn comparer<D>(self, comparer: D) -> ForestBuilder<'f, I, K, M, D> {
        ForestBuilder {
            key_of: self.key_of,
            parent_key_of: self.parent_key_of,
            model_of: self.model_of,
            comparer,
        }
    }

    /// Consumes `items` and builds the forest.
    ///
    /// Fails with [`ForestError::Cyclic`] if following resolved parents from some node
    /// never reaches a root or an orphan.
    pub fn build(self, items: impl IntoIterator<Item = I>) -> Result<Forest<K, M, C>, ForestError>
    where
        C: KeyComparer<K>,
        K: Debug,
    {
        let mut nodes = self.index(items);
        let (roots, orphans) = link(&mut nodes, &self.comparer);
        check_acyclic(&nodes, &roots, &orphans)?;

        debug!(
            nodes = nodes.len(),
            roots = roots.len(),
            orphans = orphans.len(),
            "built forest"
        );

        Ok(Forest {
            nodes,
            roots,
            orphans,
            comparer: self.comparer,
        })
    }

    fn index(&self, items: impl IntoIterator<Item = I>) -> Nodes<K, M, C>
    where
        C: KeyComparer<K>,
    {
        let items = items.into_iter();
        let mut nodes: Nodes<K, M, C> =
            IndexMap::with_capacity_and_hasher(items.size_hint().0, RandomState::new());

        for item in items {
            let key = (self.key_of)(&item);
            let parent = (self.parent_key_of)(&item);

            let node = match nodes.entry(self.comparer.normalize(&key)) {
                Entry::Occupied(e) => e.into_mut(),
                Entry::Vacant(e) => e.insert(ForestNode::new(key, (self.model_of)(item))),
            };

            node.declared_parents.extend(parent);
        }
        nodes
    }
}

/// Classifies every node and fills in both directions of the resolved links.
fn link<K: Debug, M, C: KeyComparer<K>>(
    nodes: &mut Nodes<K, M, C>,
    comparer: &C,
) -> (Vec<TreeNodeId>, Vec<TreeNodeId>) {
    let mut roots = vec![];
    let mut orphans = vec![];

    for i in 0..nodes.len() {
        let id = TreeNodeId(i);
        if nodes[i].declared_parents.is_empty() {
            roots.push(id);
            continue;
        }

        let parents: Vec<TreeNodeId> = nodes[i]
            .declared_parents
            .iter()
            .filter_map(|p| nodes.get_index_of(&comparer.normalize(p)))
            .map(TreeNodeId)
            .collect();

        if parents.is_empty() {
            trace!(
                key = ?nodes[i].key,
                parents = ?nodes[i].declared_parents,
                "no declared parent resolves, orphaning node"
            );
            nodes[i].kind = NodeKind::Orphan;
            orphans.push(id);
            continue;
        }

        for p in &parents {
            nodes[p.0].children.push(id);
        }
        let node = &mut nodes[i];
        node.parents = parents;
        node.kind = NodeKind::Attached;
    }

    (roots, orphans)
}

/// Kahn's algorithm over resolved links, seeded with every node that has no resolved parent.
/// Whatever is never released sits on, or below, a cycle.
fn check_acyclic<K: Debug, M, N>(
    nodes: &IndexMap<N, ForestNode<K, M>, RandomState>,
    roots: &[TreeNodeId],
    orphans: &[TreeNodeId],
) -> Result<(), ForestError> {
    let mut pending: Vec<usize> = nodes.values().map(|n| n.parents.len()).collect();
    let mut released: BitVec = BitVec::repeat(false, nodes.len());
    let mut queue: VecDeque<TreeNodeId> = roots.iter().chain(orphans).copied().collect();

    while let Some(id) = queue.pop_front() {
        released.set(id.0, true);
        for &child in &nodes[id.0].children {
            pending[child.0] -= 1;
            if pending[child.0] == 0 {
                queue.push_back(child);
            }
        }
    }

    if released.all() {
        return Ok(());
    }

    let keys = released
        .iter_zeros()
        .map(|i| format!("{:?}", nodes[i].key))
        .collect_vec();
    warn!(cyclic = %keys.join(", "), "parent references form a cycle");
    Err(ForestError::Cyclic { keys })
}
