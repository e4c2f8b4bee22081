//! Distributed connection construction core for the CLI-first SNN
//! framework.
//!
//! Given two node populations and a connection rule plus one or more
//! synapse specifications, [`builder::ConnectionBuilder`] materializes
//! the corresponding synaptic edges into an external connection storage
//! backend, under an MPI-by-thread decomposition where every process
//! sees every node identifier but owns only a subset. This crate
//! supplies the rule catalog, the parameter pipelines, the per-thread
//! parallel region and error aggregation, and structural-plasticity
//! glue; the model registry, storage, node-location service, VP
//! manager and RNG factory are reached only through the trait contracts
//! in [`collaborators`].

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod collaborators;
pub mod error;
pub mod node_collection;
pub mod parameter;
pub mod rules;
pub mod synapse;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use builder::{BuildContext, BuildReport, Collaborators, ConnectionBuilder, ThreadReport, Worker};
pub use collaborators::{
    AttrValue, ConnectionStorage, ModelId, NodeHandle, NodeLocation, RngFactory,
    SynapseModelRegistry, SynapticElementManager, VpManager,
};
pub use error::{ConnectError, Result};
pub use node_collection::{NodeCollection, NodeId};
pub use parameter::{ArraySide, ConnParameter, DistributionSpec, ParamSpec, ScalarValue};
pub use rules::{CommonOptions, DegreeSpec, PoolType, ProbabilitySpec, RuleParams};
pub use synapse::{SynapseSpec, SynapseSpecInput, RESERVED_ATTR_NAMES};
