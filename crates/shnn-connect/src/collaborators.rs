//! Trait contracts for the external collaborators named in the system
//! design: the synapse model registry, connection storage backend,
//! node-location/proxy service, virtual-process manager and RNG
//! factory. Every one of these is out of scope for this crate (it owns
//! none of their implementations) but is reached through the traits
//! below, per the "External Interfaces" contract.

use std::collections::BTreeMap;

use rand::rngs::StdRng;

use crate::error::Result;
use crate::node_collection::NodeId;

/// Identifier for a resolved synapse model
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModelId(pub u32);

impl ModelId {
    /// Create a new model id
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw id value
    pub const fn raw(&self) -> u32 {
        self.0
    }
}

/// A single synapse/connection attribute value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttrValue {
    /// Integer-valued attribute
    Long(i64),
    /// Floating point attribute
    Double(f64),
}

impl AttrValue {
    /// View this value as `f64`, widening integers
    pub fn as_f64(&self) -> f64 {
        match self {
            AttrValue::Long(v) => *v as f64,
            AttrValue::Double(v) => *v,
        }
    }

    /// View this value as `i64` if it is integer-kinded
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttrValue::Long(v) => Some(*v),
            AttrValue::Double(_) => None,
        }
    }

    /// Whether this value is the integer variant
    pub fn is_long(&self) -> bool {
        matches!(self, AttrValue::Long(_))
    }
}

/// A node handle as seen by a single thread: either truly local, or a
/// local placeholder ("proxy") standing in for a node whose real home
/// is another virtual process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeHandle {
    /// Node is owned by the current thread
    Local(NodeId),
    /// Node is owned elsewhere; this is a placeholder
    Proxy(NodeId),
}

impl NodeHandle {
    /// The node id this handle refers to, regardless of locality
    pub fn id(&self) -> NodeId {
        match self {
            NodeHandle::Local(id) | NodeHandle::Proxy(id) => *id,
        }
    }

    /// Whether this handle is the thread-local representation
    pub fn is_local(&self) -> bool {
        matches!(self, NodeHandle::Local(_))
    }
}

/// Registry mapping synapse model names to ids and their static
/// properties (defaults, symmetry requirement, attribute validation).
pub trait SynapseModelRegistry: Send + Sync {
    /// Resolve a model name to an id, if it exists
    fn resolve(&self, name: &str) -> Option<ModelId>;

    /// Default attribute values for a model (used when the caller does
    /// not supply `weight`/`delay`/an attribute explicitly)
    fn defaults(&self, model: ModelId) -> BTreeMap<String, AttrValue>;

    /// Whether this model can only be used in a symmetric connectivity
    fn requires_symmetric(&self, model: ModelId) -> bool;

    /// Validate a set of caller-supplied attribute names against the
    /// model's declared parameter set
    fn check_synapse_params(&self, model: ModelId, attribute_names: &[String]) -> Result<()>;
}

/// Per-node pre-/post-synaptic element counters used by structural
/// plasticity. Counters are mutated only by the thread that owns the
/// endpoint (see spec §5, "Shared resources").
pub trait SynapticElementManager: Send + Sync {
    /// Adjust the named element count for `id` by `delta`
    fn change_count(&self, id: NodeId, element_name: &str, delta: i64);
}

/// The connection storage backend: accepts emitted edges and records
/// removals. A sentinel of `None` for `weight`/`delay` means "use the
/// synapse model's default", mirroring the four connect() overloads of
/// a caller not supplying weight, delay, or either, respectively (
/// only, both supplied).
pub trait ConnectionStorage: Send + Sync {
    /// Record a new synaptic edge
    #[allow(clippy::too_many_arguments)]
    fn connect(
        &self,
        src: NodeId,
        target: NodeId,
        thread: usize,
        model: ModelId,
        attrs: &BTreeMap<String, AttrValue>,
        weight: Option<f64>,
        delay: Option<f64>,
    ) -> Result<()>;

    /// Remove an existing synaptic edge
    fn disconnect(&self, src: NodeId, target: NodeId, thread: usize, model: ModelId) -> Result<()>;
}

/// The node-location/proxy service: tells a thread whether a node is
/// local, and hands back local-or-proxy handles.
pub trait NodeLocation: Send + Sync {
    /// Whether `id` is owned by the calling process at all (on some
    /// thread), regardless of which thread is asking
    fn is_local(&self, id: NodeId) -> bool;

    /// Get the thread-local handle for `id`. Returns
    /// [`crate::error::ConnectError::IllegalConnection`] if `id` names a
    /// proxyless device not owned by `thread` (a device has no remote
    /// placeholder, so a rule that needed a proxy here cannot proceed).
    fn get(&self, id: NodeId, thread: usize) -> Result<NodeHandle>;

    /// All node ids owned by `thread`
    fn local_nodes(&self, thread: usize) -> Vec<NodeId>;

    /// Local index of `id` within `collection`, if present. Provided as
    /// a default delegating to [`crate::node_collection::NodeCollection::index_of`];
    /// a real node-location service may override this to consult its
    /// own index instead of the caller's collection.
    fn get_lid(&self, id: NodeId, collection: &crate::node_collection::NodeCollection) -> Option<usize> {
        collection.index_of(id)
    }
}

/// The virtual-process manager: maps nodes, threads and VPs to each
/// other within this rank's decomposition.
pub trait VpManager: Send + Sync {
    /// Number of worker threads on this rank
    fn num_threads(&self) -> usize;

    /// Total number of virtual processes across all ranks
    fn num_vps(&self) -> usize;

    /// Virtual processes owned by `thread`
    fn thread_to_vps(&self, thread: usize) -> Vec<usize>;

    /// Thread that owns a given virtual process
    fn vp_to_owning_thread(&self, vp: usize) -> usize;

    /// Whether a virtual process is owned by this rank at all (always
    /// true in a single-rank deployment; multi-rank implementations
    /// override this)
    fn is_local_vp(&self, _vp: usize) -> bool {
        true
    }

    /// Virtual process that owns a given node
    fn node_to_vp(&self, id: NodeId) -> usize;
}

/// Factory for the two RNG resources described in the concurrency
/// model: a stream whose sequence is identical across every rank (used
/// for structural decisions), and independent per-VP streams (used for
/// edge-attribute draws and non-coordinating local structure).
///
/// Both methods are keyed by `thread`, not `rank`: within a single
/// process the synchronization guarantee is realized by seeding a
/// thread's rank-synced stream from (global seed, thread index) alone,
/// so every rank running the same thread index reproduces the same
/// sequence without any cross-process coordination in this crate.
pub trait RngFactory: Send + Sync {
    /// Rank-synchronized RNG stream for `thread`
    fn rank_synced_rng(&self, thread: usize) -> StdRng;

    /// Independent per-VP (in practice, per-thread) RNG stream
    fn vp_specific_rng(&self, thread: usize) -> StdRng;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attr_value_widen() {
        assert_eq!(AttrValue::Long(3).as_f64(), 3.0);
        assert_eq!(AttrValue::Double(2.5).as_i64(), None);
        assert_eq!(AttrValue::Long(7).as_i64(), Some(7));
    }

    #[test]
    fn node_handle_locality() {
        let id = NodeId::new(5);
        assert!(NodeHandle::Local(id).is_local());
        assert!(!NodeHandle::Proxy(id).is_local());
        assert_eq!(NodeHandle::Proxy(id).id(), id);
    }
}
