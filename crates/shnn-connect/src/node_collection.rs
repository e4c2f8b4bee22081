//! Ordered node populations used as connection endpoints

use std::collections::HashMap;

use crate::error::{ConnectError, Result};

/// Node identifier, reused from the storage layer rather than redefined
pub type NodeId = shnn_storage::NeuronId;

/// An ordered, finite sequence of node identifiers with constant-time
/// index lookup and reverse ("local index within collection") lookup.
///
/// Immutable for the duration of a build: every rule strategy assumes
/// `NodeCollection::get`/`index_of` never change once a
/// [`crate::builder::ConnectionBuilder`] has been constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeCollection {
    nodes: Vec<NodeId>,
    index_of: HashMap<NodeId, usize>,
}

impl NodeCollection {
    /// Build a collection from an explicit, ordered list of node ids
    pub fn new(nodes: Vec<NodeId>) -> Result<Self> {
        if nodes.is_empty() {
            return Err(ConnectError::bad_property(
                "node collection must not be empty",
            ));
        }

        let mut index_of = HashMap::with_capacity(nodes.len());
        for (i, &id) in nodes.iter().enumerate() {
            index_of.insert(id, i);
        }

        Ok(Self { nodes, index_of })
    }

    /// Build a contiguous collection `[start, start + count)`
    pub fn range(start: u32, count: u32) -> Result<Self> {
        let nodes = (start..start.saturating_add(count)).map(NodeId::new).collect();
        Self::new(nodes)
    }

    /// Number of nodes in the collection
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the collection has no nodes (always false for a validly
    /// constructed collection; kept for API completeness)
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node at position `i` in iteration order
    pub fn get(&self, i: usize) -> Option<NodeId> {
        self.nodes.get(i).copied()
    }

    /// Position of `id` within this collection, if present
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index_of.get(&id).copied()
    }

    /// Whether `id` is a member of this collection
    pub fn contains(&self, id: NodeId) -> bool {
        self.index_of.contains_key(&id)
    }

    /// Iterate node ids in collection order
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// Raw slice of node ids in collection order
    pub fn as_slice(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Whether this collection is a contiguous range `[first, first+len)`
    /// in iteration order. Rule strategies use this to decide between a
    /// target-loop and a local-node-loop iteration regime (spec §4.2,
    /// "Iteration choice").
    pub fn is_contiguous_range(&self) -> bool {
        if self.nodes.is_empty() {
            return false;
        }
        let first = self.nodes[0].raw();
        self.nodes
            .iter()
            .enumerate()
            .all(|(i, id)| id.raw() == first + i as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collection_is_rejected() {
        let err = NodeCollection::new(Vec::new()).unwrap_err();
        assert!(matches!(err, ConnectError::BadProperty { .. }));
    }

    #[test]
    fn range_builds_contiguous_collection() {
        let c = NodeCollection::range(10, 5).unwrap();
        assert_eq!(c.len(), 5);
        assert_eq!(c.get(0), Some(NodeId::new(10)));
        assert_eq!(c.get(4), Some(NodeId::new(14)));
        assert!(c.is_contiguous_range());
    }

    #[test]
    fn index_of_round_trips() {
        let c = NodeCollection::new(vec![NodeId::new(5), NodeId::new(9), NodeId::new(2)]).unwrap();
        assert_eq!(c.index_of(NodeId::new(9)), Some(1));
        assert_eq!(c.index_of(NodeId::new(42)), None);
        assert!(c.contains(NodeId::new(2)));
        assert!(!c.contains(NodeId::new(3)));
    }

    #[test]
    fn non_contiguous_collection_detected() {
        let c = NodeCollection::new(vec![NodeId::new(1), NodeId::new(3), NodeId::new(5)]).unwrap();
        assert!(!c.is_contiguous_range());
    }
}
