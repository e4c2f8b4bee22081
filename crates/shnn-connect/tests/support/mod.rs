//! Shared scaffolding for the integration tests: thin wiring around the
//! in-memory collaborator fakes exposed by `shnn_connect::testing`
//! behind the `testing` feature, so every scenario file builds its
//! collaborators bundle the same way instead of re-deriving it.

use std::collections::BTreeMap;

use shnn_connect::testing::{
    FakeConnectionStorage, FakeModelRegistry, FakeNodeLocation, FakeRngFactory,
    FakeSynapticElementManager, FakeVpManager,
};
use shnn_connect::{Collaborators, NodeCollection, NodeId};

/// Every node id mentioned across `pops`, in first-seen order, deduplicated.
pub fn union(pops: &[&NodeCollection]) -> NodeCollection {
    let mut seen = std::collections::BTreeSet::new();
    let mut nodes = Vec::new();
    for pop in pops {
        for id in pop.iter() {
            if seen.insert(id.raw()) {
                nodes.push(id);
            }
        }
    }
    NodeCollection::new(nodes).expect("at least one population is non-empty")
}

/// A bundle of owned fakes plus the node->thread assignment backing
/// both the node-location and VP-manager collaborators, kept consistent
/// with each other the way a real deployment's proxy service and VP
/// manager would be.
pub struct Fakes {
    pub registry: FakeModelRegistry,
    pub storage: FakeConnectionStorage,
    pub location: FakeNodeLocation,
    pub vp_manager: FakeVpManager,
    pub rng_factory: FakeRngFactory,
    pub element_manager: FakeSynapticElementManager,
}

impl Fakes {
    /// Single worker thread; every node in `all_nodes` is local to it.
    pub fn single_threaded(all_nodes: &NodeCollection, model: &str, seed: u64) -> Self {
        Self {
            registry: FakeModelRegistry::with_model(model),
            storage: FakeConnectionStorage::default(),
            location: FakeNodeLocation::single_threaded(all_nodes),
            vp_manager: FakeVpManager::new(1, BTreeMap::new()),
            rng_factory: FakeRngFactory::new(seed),
            element_manager: FakeSynapticElementManager::default(),
        }
    }

    /// `num_threads` worker threads, with `all_nodes` round-robin
    /// distributed across them identically for both the node-location
    /// service and the VP manager.
    pub fn multi_threaded(all_nodes: &NodeCollection, model: &str, seed: u64, num_threads: usize) -> Self {
        let node_to_thread: BTreeMap<u32, usize> = all_nodes
            .iter()
            .enumerate()
            .map(|(i, id)| (id.raw(), i % num_threads.max(1)))
            .collect();
        Self {
            registry: FakeModelRegistry::with_model(model),
            storage: FakeConnectionStorage::default(),
            location: FakeNodeLocation::round_robin(all_nodes, num_threads),
            vp_manager: FakeVpManager::new(num_threads, node_to_thread),
            rng_factory: FakeRngFactory::new(seed),
            element_manager: FakeSynapticElementManager::default(),
        }
    }

    pub fn collaborators(&self) -> Collaborators<'_> {
        Collaborators {
            registry: &self.registry,
            storage: &self.storage,
            location: &self.location,
            vp_manager: &self.vp_manager,
            rng_factory: &self.rng_factory,
            element_manager: None,
        }
    }

    pub fn collaborators_with_sp(&self) -> Collaborators<'_> {
        Collaborators {
            registry: &self.registry,
            storage: &self.storage,
            location: &self.location,
            vp_manager: &self.vp_manager,
            rng_factory: &self.rng_factory,
            element_manager: Some(&self.element_manager),
        }
    }
}

/// Build a contiguous population `[start, start + count)`.
pub fn range(start: u32, count: u32) -> NodeCollection {
    NodeCollection::range(start, count).expect("non-empty range")
}

/// Convenience for asserting an edge set regardless of emission order.
pub fn edge_pairs(storage: &FakeConnectionStorage) -> std::collections::BTreeSet<(u32, u32)> {
    storage
        .edges()
        .into_iter()
        .map(|e| (e.src.raw(), e.target.raw()))
        .collect()
}

#[allow(dead_code)]
pub fn node(raw: u32) -> NodeId {
    NodeId::new(raw)
}
