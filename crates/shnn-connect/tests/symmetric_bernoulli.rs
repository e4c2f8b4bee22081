//! Scenario 4 and the SymmetricBernoulli invariant: the edge set is
//! exactly symmetric, and no self-loops are ever produced.

mod support;

use std::collections::HashMap;

use shnn_connect::{CommonOptions, ConnectionBuilder, ParamSpec, RuleParams, ScalarValue, SynapseSpecInput};
use support::{edge_pairs, range, Fakes};

fn synapse() -> Vec<SynapseSpecInput> {
    vec![SynapseSpecInput {
        synapse_model: "static_synapse".into(),
        weight: Some(ParamSpec::Scalar(ScalarValue::Double(1.0))),
        ..Default::default()
    }]
}

fn symmetric_opts() -> CommonOptions {
    CommonOptions {
        allow_autapses: false,
        allow_multapses: true,
        make_symmetric: true,
    }
}

#[test]
fn edge_set_is_symmetric_with_no_self_loops_and_matched_in_out_degree() {
    let nodes = range(1, 10);
    let fakes = Fakes::single_threaded(&nodes, "static_synapse", 31);

    let mut builder = ConnectionBuilder::new(
        nodes.clone(),
        nodes.clone(),
        RuleParams::SymmetricBernoulli { p: 0.5 },
        symmetric_opts(),
        &synapse(),
        fakes.collaborators(),
    )
    .unwrap();
    builder.connect().unwrap();

    let edges = edge_pairs(&fakes.storage);
    assert!(!edges.is_empty());
    for &(s, t) in &edges {
        assert_ne!(s, t, "no autapses");
        assert!(edges.contains(&(t, s)), "(s,t) in E implies (t,s) in E");
    }

    let mut indegree: HashMap<u32, usize> = HashMap::new();
    let mut outdegree: HashMap<u32, usize> = HashMap::new();
    for &(s, t) in &edges {
        *outdegree.entry(s).or_default() += 1;
        *indegree.entry(t).or_default() += 1;
    }
    for id in nodes.iter().map(|n| n.raw()) {
        assert_eq!(indegree.get(&id).copied().unwrap_or(0), outdegree.get(&id).copied().unwrap_or(0));
    }
}

#[test]
fn requires_autapses_disabled_multapses_allowed_and_make_symmetric() {
    let nodes = range(1, 5);
    let fakes = Fakes::single_threaded(&nodes, "static_synapse", 32);

    let mut bad_opts = CommonOptions::new(); // autapses allowed by default
    bad_opts.make_symmetric = true;

    let err = ConnectionBuilder::new(
        nodes.clone(),
        nodes,
        RuleParams::SymmetricBernoulli { p: 0.5 },
        bad_opts,
        &synapse(),
        fakes.collaborators(),
    )
    .unwrap_err();
    assert!(matches!(err, shnn_connect::ConnectError::NotImplemented { .. }));
}

#[test]
fn p_must_lie_in_zero_one_half_open() {
    let nodes = range(1, 5);
    let fakes = Fakes::single_threaded(&nodes, "static_synapse", 33);

    let err = ConnectionBuilder::new(
        nodes.clone(),
        nodes,
        RuleParams::SymmetricBernoulli { p: 1.0 },
        symmetric_opts(),
        &synapse(),
        fakes.collaborators(),
    )
    .unwrap_err();
    assert!(matches!(err, shnn_connect::ConnectError::BadProperty { .. }));
}
