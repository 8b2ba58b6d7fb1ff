//! Helper iterator implementations used by the forest and its node views.
//!
//! All of them yield [`TreeNodeId`]s and follow links through a [`ForestLinks`] store.

use super::{ForestLinks, TreeNodeId};
use std::collections::VecDeque;

// --- Ancestors Iterator ---

/// An iterator that walks upwards from a starting node, following first parents until
/// there are none.
#[derive(Clone)]
pub struct AncestorsIter<'a, S: ForestLinks> {
    store: &'a S,
    /// The next node ID to yield. `None` once the root has been yielded.
    current: Option<TreeNodeId>,
}

impl<'a, S: ForestLinks> AncestorsIter<'a, S> {
    /// Creates a new ancestor iterator, `start_node` included.
    pub fn new(store: &'a S, start_node: TreeNodeId) -> Self {
        AncestorsIter {
            store,
            current: Some(start_node),
        }
    }
}

impl<S: ForestLinks> Iterator for AncestorsIter<'_, S> {
    type Item = TreeNodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node_to_return = self.current?;
        self.current = self.store.first_parent(node_to_return);
        Some(node_to_return)
    }
}

// --- BFS Iterator ---

/// A Breadth-First Search (BFS) iterator state.
#[derive(Clone)]
pub struct BfsIter<'a, S: ForestLinks> {
    store: &'a S,
    queue: VecDeque<TreeNodeId>,
}

impl<'a, S: ForestLinks> BfsIter<'a, S> {
    /// Create a new BFS iterator starting at `start`.
    pub fn new(store: &'a S, start: TreeNodeId) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(start);
        BfsIter { store, queue }
    }
}

impl<S: ForestLinks> Iterator for BfsIter<'_, S> {
    type Item = TreeNodeId;
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(self.store.iter_children(node));
        Some(node)
    }
}

// --- Preorder Iterator ---

/// A pre-order DFS iterator state.
#[derive(Clone)]
pub struct PreorderIter<'a, S: ForestLinks> {
    store: &'a S,
    /// Nodes still to visit, next one on top.
    stack: Vec<TreeNodeId>,
}

impl<'a, S: ForestLinks> PreorderIter<'a, S> {
    /// Create a new pre-order iterator starting at `start`.
    pub fn new(store: &'a S, start: TreeNodeId) -> Self {
        PreorderIter {
            store,
            stack: vec![start],
        }
    }
}

impl<S: ForestLinks> Iterator for PreorderIter<'_, S> {
    type Item = TreeNodeId;
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;

        // Reversed so the first child is popped next
        let mark = self.stack.len();
        self.stack.extend(self.store.iter_children(node));
        self.stack[mark..].reverse();

        Some(node)
    }
}
