//! Scenario 1 of the testable properties: pairwise connectivity.

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
fn autapses_disabled_on_overlapping_populations_emits_nothing() {
    let nodes = range(1, 3); // {1, 2, 3}
    let fakes = Fakes::single_threaded(&nodes, "static_synapse", 1);
    let mut opts = CommonOptions::new();
    opts.allow_autapses = false;

    let mut builder = ConnectionBuilder::new(
        nodes.clone(),
        nodes.clone(),
        RuleParams::OneToOne,
        opts,
        &synapse(),
        fakes.collaborators(),
    )
    .unwrap();
    let report = builder.connect().unwrap();

    assert!(fakes.storage.is_empty());
    assert_eq!(report.edges_emitted, 0);
    assert_eq!(report.edges_skipped_nonlocal, 0);
}

#[test]
fn distinct_populations_connect_pairwise() {
    let sources = range(1, 3);
    let targets = range(10, 3);
    let all = support::union(&[&sources, &targets]);
    let fakes = Fakes::single_threaded(&all, "static_synapse", 2);

    let mut builder = ConnectionBuilder::new(
        sources,
        targets,
        RuleParams::OneToOne,
        CommonOptions::new(),
        &synapse(),
        fakes.collaborators(),
    )
    .unwrap();
    let report = builder.connect().unwrap();

    assert_eq!(edge_pairs(&fakes.storage), [(1, 10), (2, 11), (3, 12)].into_iter().collect());
    assert_eq!(report.edges_emitted, 3);
}

#[test]
fn mismatched_lengths_are_rejected_before_any_thread_runs() {
    let sources = range(0, 3);
    let targets = range(0, 4);
    let fakes = Fakes::single_threaded(&targets, "static_synapse", 3);

    let err = ConnectionBuilder::new(
        sources,
        targets,
        RuleParams::OneToOne,
        CommonOptions::new(),
        &synapse(),
        fakes.collaborators(),
    )
    .unwrap_err();
    assert!(matches!(err, shnn_connect::ConnectError::DimensionMismatch { .. }));
}

#[test]
fn disconnect_removes_previously_connected_pairs() {
    let sources = range(1, 3);
    let targets = range(10, 3);
    let all = support::union(&[&sources, &targets]);
    let fakes = Fakes::single_threaded(&all, "static_synapse", 4);

    let mut builder = ConnectionBuilder::new(
        sources,
        targets,
        RuleParams::OneToOne,
        CommonOptions::new(),
        &synapse(),
        fakes.collaborators(),
    )
    .unwrap();
    builder.connect().unwrap();
    assert_eq!(fakes.storage.len(), 3);

    builder.disconnect().unwrap();
    assert!(fakes.storage.is_empty());
}
