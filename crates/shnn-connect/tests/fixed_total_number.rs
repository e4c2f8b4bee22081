//! Scenario 5: a fixed total edge count, partitioned across VPs.

mod support;

use shnn_connect::{CommonOptions, ConnectionBuilder, ParamSpec, RuleParams, ScalarValue, SynapseSpecInput};
use support::{edge_pairs, range, Fakes};

fn synapse() -> Vec<SynapseSpecInput> {
    vec![SynapseSpecInput {
        synapse_model: "static_synapse".into(),
        weight: Some(ParamSpec::Scalar(ScalarValue::Double(1.0))),
        ..Default::default()
    }]
}

#[test]
fn emits_exactly_n_edges_with_autapses_and_multapses_enabled() {
    let nodes = range(1, 4); // {1, 2, 3, 4}
    let fakes = Fakes::single_threaded(&nodes, "static_synapse", 51);

    let mut builder = ConnectionBuilder::new(
        nodes.clone(),
        nodes,
        RuleParams::FixedTotalNumber { n: 6 },
        CommonOptions::new(),
        &synapse(),
        fakes.collaborators(),
    )
    .unwrap();
    let report = builder.connect().unwrap();

    assert_eq!(fakes.storage.len(), 6);
    assert_eq!(report.edges_emitted, 6);
}

#[test]
fn n_equals_zero_emits_nothing() {
    let nodes = range(1, 4);
    let fakes = Fakes::single_threaded(&nodes, "static_synapse", 52);

    let mut builder = ConnectionBuilder::new(
        nodes.clone(),
        nodes,
        RuleParams::FixedTotalNumber { n: 0 },
        CommonOptions::new(),
        &synapse(),
        fakes.collaborators(),
    )
    .unwrap();
    builder.connect().unwrap();

    assert!(fakes.storage.is_empty());
}

#[test]
fn n_exceeding_capacity_without_multapses_is_rejected() {
    let sources = range(1, 2); // {1, 2}
    let targets = range(10, 2); // {10, 11}: capacity is 4
    let all = support::union(&[&sources, &targets]);
    let fakes = Fakes::single_threaded(&all, "static_synapse", 53);
    let mut opts = CommonOptions::new();
    opts.allow_multapses = false;

    let err = ConnectionBuilder::new(
        sources,
        targets,
        RuleParams::FixedTotalNumber { n: 5 },
        opts,
        &synapse(),
        fakes.collaborators(),
    )
    .unwrap_err();
    assert!(matches!(err, shnn_connect::ConnectError::NotImplemented { .. }));
}

#[test]
fn total_count_is_partitioned_consistently_across_thread_counts() {
    let sources = range(1, 6);
    let targets = range(50, 12);
    let all = support::union(&[&sources, &targets]);

    let single = Fakes::single_threaded(&all, "static_synapse", 54);
    let mut b1 = ConnectionBuilder::new(
        sources.clone(),
        targets.clone(),
        RuleParams::FixedTotalNumber { n: 20 },
        CommonOptions::new(),
        &synapse(),
        single.collaborators(),
    )
    .unwrap();
    let r1 = b1.connect().unwrap();

    let multi = Fakes::multi_threaded(&all, "static_synapse", 54, 4);
    let mut b2 = ConnectionBuilder::new(
        sources,
        targets,
        RuleParams::FixedTotalNumber { n: 20 },
        CommonOptions::new(),
        &synapse(),
        multi.collaborators(),
    )
    .unwrap();
    let r2 = b2.connect().unwrap();

    assert_eq!(r1.edges_emitted, 20);
    assert_eq!(r2.edges_emitted, 20);
    assert_eq!(edge_pairs(&single.storage).len() <= 20, true);
    assert_eq!(edge_pairs(&multi.storage).len() <= 20, true);
}
