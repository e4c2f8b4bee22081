//! In-memory fakes for the external collaborator traits, used by this
//! crate's own unit tests and exposed to downstream integration tests
//! behind the `testing` feature.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::collaborators::{
    AttrValue, ModelId, NodeHandle, NodeLocation, RngFactory, SynapseModelRegistry,
    SynapticElementManager,
};
use crate::error::{ConnectError, Result};
use crate::node_collection::{NodeCollection, NodeId};

/// A synapse model registry backed by an in-memory name table. Every
/// registered model accepts `weight` and `delay` implicitly (those
/// attributes never pass through [`SynapseModelRegistry::check_synapse_params`])
/// plus whichever extra attribute names were declared for it.
pub struct FakeModelRegistry {
    models: Vec<(String, Vec<String>, bool)>,
}

impl FakeModelRegistry {
    /// A registry with a single model that declares no extra attributes
    pub fn with_model(name: &str) -> Self {
        Self {
            models: vec![(name.to_string(), Vec::new(), false)],
        }
    }

    /// A registry with a single model declaring the given extra
    /// attribute names
    pub fn with_model_and_attrs(name: &str, attrs: &[&str]) -> Self {
        Self {
            models: vec![(
                name.to_string(),
                attrs.iter().map(|s| s.to_string()).collect(),
                false,
            )],
        }
    }

    /// A registry with a single model flagged as requiring symmetric use
    pub fn with_symmetric_model(name: &str) -> Self {
        Self {
            models: vec![(name.to_string(), Vec::new(), true)],
        }
    }
}

impl SynapseModelRegistry for FakeModelRegistry {
    fn resolve(&self, name: &str) -> Option<ModelId> {
        self.models
            .iter()
            .position(|(n, _, _)| n == name)
            .map(|i| ModelId::new(i as u32))
    }

    fn defaults(&self, _model: ModelId) -> BTreeMap<String, AttrValue> {
        let mut defaults = BTreeMap::new();
        defaults.insert("weight".to_string(), AttrValue::Double(1.0));
        defaults.insert("delay".to_string(), AttrValue::Double(1.0));
        defaults
    }

    fn requires_symmetric(&self, model: ModelId) -> bool {
        self.models
            .get(model.raw() as usize)
            .map(|(_, _, sym)| *sym)
            .unwrap_or(false)
    }

    fn check_synapse_params(&self, model: ModelId, attribute_names: &[String]) -> Result<()> {
        let declared = &self
            .models
            .get(model.raw() as usize)
            .ok_or_else(|| ConnectError::bad_property("unknown model id"))?
            .1;
        for name in attribute_names {
            if !declared.contains(name) {
                return Err(ConnectError::bad_property(format!(
                    "synapse model does not declare attribute '{name}'"
                )));
            }
        }
        Ok(())
    }
}

/// A node-location service in which every node the caller names is
/// local to a single configured thread; every other node is a proxy.
pub struct FakeNodeLocation {
    owning_thread: BTreeMap<u32, usize>,
    proxyless: std::collections::BTreeSet<u32>,
}

impl FakeNodeLocation {
    /// Every node owned by a single thread (single-process, single-VP
    /// deployment shape)
    pub fn single_threaded(nodes: &NodeCollection) -> Self {
        let owning_thread = nodes.iter().map(|id| (id.raw(), 0)).collect();
        Self {
            owning_thread,
            proxyless: Default::default(),
        }
    }

    /// Nodes round-robin assigned across `num_threads` threads
    pub fn round_robin(nodes: &NodeCollection, num_threads: usize) -> Self {
        let owning_thread = nodes
            .iter()
            .enumerate()
            .map(|(i, id)| (id.raw(), i % num_threads.max(1)))
            .collect();
        Self {
            owning_thread,
            proxyless: Default::default(),
        }
    }

    /// Mark a node as proxyless (devices): [`NodeLocation::get`] errors
    /// for this node on any thread other than its owner.
    pub fn mark_proxyless(mut self, id: NodeId) -> Self {
        self.proxyless.insert(id.raw());
        self
    }
}

impl NodeLocation for FakeNodeLocation {
    fn is_local(&self, id: NodeId) -> bool {
        self.owning_thread.contains_key(&id.raw())
    }

    fn get(&self, id: NodeId, thread: usize) -> Result<NodeHandle> {
        match self.owning_thread.get(&id.raw()) {
            Some(&owner) if owner == thread => Ok(NodeHandle::Local(id)),
            Some(_) if self.proxyless.contains(&id.raw()) => Err(ConnectError::illegal_connection(
                format!("node {} is proxyless and not owned by thread {thread}", id.raw()),
            )),
            Some(_) => Ok(NodeHandle::Proxy(id)),
            None => Err(ConnectError::illegal_connection(format!(
                "node {} is not known to this node-location service",
                id.raw()
            ))),
        }
    }

    fn local_nodes(&self, thread: usize) -> Vec<NodeId> {
        self.owning_thread
            .iter()
            .filter(|(_, &owner)| owner == thread)
            .map(|(&raw, _)| NodeId::new(raw))
            .collect()
    }
}

/// A single-rank virtual-process manager: one VP per thread.
pub struct FakeVpManager {
    num_threads: usize,
    node_to_thread: BTreeMap<u32, usize>,
}

impl FakeVpManager {
    /// Build from the same thread assignment a [`FakeNodeLocation`] uses
    pub fn new(num_threads: usize, node_to_thread: BTreeMap<u32, usize>) -> Self {
        Self {
            num_threads,
            node_to_thread,
        }
    }
}

impl crate::collaborators::VpManager for FakeVpManager {
    fn num_threads(&self) -> usize {
        self.num_threads
    }

    fn num_vps(&self) -> usize {
        self.num_threads
    }

    fn thread_to_vps(&self, thread: usize) -> Vec<usize> {
        vec![thread]
    }

    fn vp_to_owning_thread(&self, vp: usize) -> usize {
        vp
    }

    fn node_to_vp(&self, id: NodeId) -> usize {
        *self.node_to_thread.get(&id.raw()).unwrap_or(&0)
    }
}

/// An RNG factory that derives every stream deterministically from a
/// single seed and the requesting thread's index, exactly as the
/// concurrency model requires.
pub struct FakeRngFactory {
    seed: u64,
}

impl FakeRngFactory {
    /// Build a factory seeded with `seed`
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl RngFactory for FakeRngFactory {
    fn rank_synced_rng(&self, thread: usize) -> StdRng {
        StdRng::seed_from_u64(self.seed ^ (0xA5A5_A5A5_u64.wrapping_add(thread as u64)))
    }

    fn vp_specific_rng(&self, thread: usize) -> StdRng {
        StdRng::seed_from_u64(self.seed ^ (0x5A5A_5A5A_u64.wrapping_add(thread as u64)))
    }
}

/// A structural-plasticity element manager backed by atomics, safe to
/// share across the worker threads that own disjoint nodes.
#[derive(Default)]
pub struct FakeSynapticElementManager {
    counts: Mutex<BTreeMap<(u32, String), AtomicI64>>,
}

impl FakeSynapticElementManager {
    /// Current count for `id`/`element_name`, 0 if never touched
    pub fn count(&self, id: NodeId, element_name: &str) -> i64 {
        let counts = self.counts.lock().expect("lock poisoned");
        counts
            .get(&(id.raw(), element_name.to_string()))
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }
}

impl SynapticElementManager for FakeSynapticElementManager {
    fn change_count(&self, id: NodeId, element_name: &str, delta: i64) {
        let mut counts = self.counts.lock().expect("lock poisoned");
        counts
            .entry((id.raw(), element_name.to_string()))
            .or_insert_with(|| AtomicI64::new(0))
            .fetch_add(delta, Ordering::SeqCst);
    }
}

/// A connection storage backend that just records every emitted edge,
/// for assertions in tests.
#[derive(Default)]
pub struct FakeConnectionStorage {
    edges: Mutex<Vec<RecordedEdge>>,
}

/// One edge recorded by [`FakeConnectionStorage`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEdge {
    /// Source node
    pub src: NodeId,
    /// Target node
    pub target: NodeId,
    /// Thread that emitted this edge
    pub thread: usize,
    /// Resolved synapse model
    pub model: ModelId,
    /// Generic attributes attached to this edge
    pub attrs: BTreeMap<String, AttrValue>,
    /// Weight, if one was supplied
    pub weight: Option<f64>,
    /// Delay, if one was supplied
    pub delay: Option<f64>,
}

impl FakeConnectionStorage {
    /// Snapshot of every edge recorded so far, in emission order
    pub fn edges(&self) -> Vec<RecordedEdge> {
        self.edges.lock().expect("lock poisoned").clone()
    }

    /// Number of edges recorded so far
    pub fn len(&self) -> usize {
        self.edges.lock().expect("lock poisoned").len()
    }

    /// Whether any edges have been recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl crate::collaborators::ConnectionStorage for FakeConnectionStorage {
    fn connect(
        &self,
        src: NodeId,
        target: NodeId,
        thread: usize,
        model: ModelId,
        attrs: &BTreeMap<String, AttrValue>,
        weight: Option<f64>,
        delay: Option<f64>,
    ) -> Result<()> {
        self.edges.lock().expect("lock poisoned").push(RecordedEdge {
            src,
            target,
            thread,
            model,
            attrs: attrs.clone(),
            weight,
            delay,
        });
        Ok(())
    }

    fn disconnect(&self, src: NodeId, target: NodeId, _thread: usize, _model: ModelId) -> Result<()> {
        let mut edges = self.edges.lock().expect("lock poisoned");
        let before = edges.len();
        edges.retain(|e| !(e.src == src && e.target == target));
        if edges.len() == before {
            return Err(ConnectError::illegal_connection(format!(
                "no edge {} -> {} to disconnect",
                src.raw(),
                target.raw()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::VpManager;

    #[test]
    fn fake_registry_validates_declared_attrs() {
        let registry = FakeModelRegistry::with_model_and_attrs("stdp", &["receptor_type"]);
        let model = registry.resolve("stdp").unwrap();
        assert!(registry
            .check_synapse_params(model, &["receptor_type".to_string()])
            .is_ok());
        assert!(registry
            .check_synapse_params(model, &["not_declared".to_string()])
            .is_err());
    }

    #[test]
    fn fake_node_location_reports_proxy_for_remote_nodes() {
        let nodes = NodeCollection::range(0, 4).unwrap();
        let loc = FakeNodeLocation::round_robin(&nodes, 2);
        let handle = loc.get(NodeId::new(1), 0).unwrap();
        assert!(!handle.is_local());
        let handle = loc.get(NodeId::new(1), 1).unwrap();
        assert!(handle.is_local());
    }

    #[test]
    fn fake_rng_factory_is_deterministic_per_thread() {
        let factory = FakeRngFactory::new(42);
        let a = factory.rank_synced_rng(3);
        let b = factory.rank_synced_rng(3);
        assert_eq!(format!("{a:?}"), format!("{b:?}"));
    }

    #[test]
    fn fake_vp_manager_maps_one_vp_per_thread() {
        let vp_mgr = FakeVpManager::new(4, BTreeMap::new());
        assert_eq!(vp_mgr.num_vps(), 4);
        assert_eq!(vp_mgr.vp_to_owning_thread(2), 2);
    }

    #[test]
    fn fake_element_manager_accumulates_deltas() {
        let mgr = FakeSynapticElementManager::default();
        let id = NodeId::new(7);
        mgr.change_count(id, "axon", 3);
        mgr.change_count(id, "axon", -1);
        assert_eq!(mgr.count(id, "axon"), 2);
    }
}
