//! Scenario 2 and the AllToAll invariant of the testable properties.

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
fn every_source_connects_to_every_target() {
    let sources = range(1, 2); // {1, 2}
    let targets = range(3, 2); // {3, 4}
    let all = support::union(&[&sources, &targets]);
    let fakes = Fakes::single_threaded(&all, "static_synapse", 11);

    let mut builder = ConnectionBuilder::new(
        sources,
        targets,
        RuleParams::AllToAll,
        CommonOptions::new(),
        &synapse(),
        fakes.collaborators(),
    )
    .unwrap();
    builder.connect().unwrap();

    assert_eq!(
        edge_pairs(&fakes.storage),
        [(1, 3), (1, 4), (2, 3), (2, 4)].into_iter().collect()
    );
}

#[test]
fn distinct_populations_with_autapses_disabled_yield_full_product() {
    let sources = range(0, 5);
    let targets = range(100, 7);
    let all = support::union(&[&sources, &targets]);
    let fakes = Fakes::single_threaded(&all, "static_synapse", 12);
    let mut opts = CommonOptions::new();
    opts.allow_autapses = false;

    let mut builder = ConnectionBuilder::new(
        sources,
        targets,
        RuleParams::AllToAll,
        opts,
        &synapse(),
        fakes.collaborators(),
    )
    .unwrap();
    let report = builder.connect().unwrap();

    assert_eq!(fakes.storage.len(), 5 * 7);
    assert_eq!(report.edges_emitted, 35);
}

#[test]
fn multi_threaded_build_produces_the_same_edge_set_as_single_threaded() {
    let sources = range(0, 4);
    let targets = range(50, 6);
    let all = support::union(&[&sources, &targets]);

    let single = Fakes::single_threaded(&all, "static_synapse", 20);
    let mut b1 = ConnectionBuilder::new(
        sources.clone(),
        targets.clone(),
        RuleParams::AllToAll,
        CommonOptions::new(),
        &synapse(),
        single.collaborators(),
    )
    .unwrap();
    b1.connect().unwrap();

    let multi = Fakes::multi_threaded(&all, "static_synapse", 20, 3);
    let mut b2 = ConnectionBuilder::new(
        sources,
        targets,
        RuleParams::AllToAll,
        CommonOptions::new(),
        &synapse(),
        multi.collaborators(),
    )
    .unwrap();
    b2.connect().unwrap();

    assert_eq!(edge_pairs(&single.storage), edge_pairs(&multi.storage));
}
