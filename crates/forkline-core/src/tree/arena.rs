use std::slice::Iter;

use crate::tree::ids::NodeId;

/// Holds all nodes of one search and hands out stable `NodeId`s.
/// Nodes are never removed, so an id stays valid for the lifetime of the arena.
#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    storage: Vec<T>,
}

impl<T> Arena<T> {
    /// Create a new empty storage
    pub fn new() -> Self {
        Arena {
            storage: Vec::new(),
        }
    }

    /// Allocate a new item to the storage and return the associated NodeId
    pub fn allocate(&mut self, item: T) -> NodeId {
        let id = NodeId::from(self.storage.len());
        self.storage.push(item);
        id
    }

    /// Retrieve an associated item from the Arena
    pub fn get(&self, node_id: NodeId) -> Option<&T> {
        self.storage.get(node_id.index())
    }

    /// Retrieve an associated item from the Arena as a mutable borrow
    pub fn get_mut(&mut self, node_id: NodeId) -> Option<&mut T> {
        self.storage.get_mut(node_id.index())
    }

    /// Check the length of the Arena
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Iterate `(NodeId, &T)` pairs in allocation order.
    pub fn iter_ids(&self) -> impl Iterator<Item = (NodeId, &T)> {
        self.storage
            .iter()
            .enumerate()
            .map(|(idx, item)| (NodeId::from(idx), item))
    }
}

/// Iteration support for Arena.
/// - `for x in &arena` (borrows items)
impl<'a, T> IntoIterator for &'a Arena<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.storage.iter()
    }
}
