//! Scenario 3 and the FixedInDegree/FixedOutDegree invariants.

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

#[test]
fn fixed_in_degree_gives_every_target_exactly_indegree_incoming_edges_no_duplicates() {
    let sources = range(1, 100);
    let targets = range(101, 10);
    let all = support::union(&[&sources, &targets]);
    let fakes = Fakes::single_threaded(&all, "static_synapse", 5);
    let mut opts = CommonOptions::new();
    opts.allow_autapses = false;
    opts.allow_multapses = false;

    let mut builder = ConnectionBuilder::new(
        sources,
        targets.clone(),
        RuleParams::FixedInDegree {
            indegree: ParamSpec::Scalar(ScalarValue::Long(5)),
        },
        opts,
        &synapse(),
        fakes.collaborators(),
    )
    .unwrap();
    builder.connect().unwrap();

    let edges = edge_pairs(&fakes.storage);
    assert_eq!(edges.len(), fakes.storage.len(), "no duplicate (src, tgt) pairs");

    let mut per_target: HashMap<u32, usize> = HashMap::new();
    for (_, tgt) in &edges {
        *per_target.entry(*tgt).or_default() += 1;
    }
    for target in targets.iter() {
        assert_eq!(per_target.get(&target.raw()), Some(&5));
    }
}

#[test]
fn fixed_in_degree_zero_emits_nothing() {
    let sources = range(0, 10);
    let targets = range(20, 4);
    let all = support::union(&[&sources, &targets]);
    let fakes = Fakes::single_threaded(&all, "static_synapse", 6);

    let mut builder = ConnectionBuilder::new(
        sources,
        targets,
        RuleParams::FixedInDegree {
            indegree: ParamSpec::Scalar(ScalarValue::Long(0)),
        },
        CommonOptions::new(),
        &synapse(),
        fakes.collaborators(),
    )
    .unwrap();
    builder.connect().unwrap();
    assert!(fakes.storage.is_empty());
}

#[test]
fn fixed_in_degree_rejects_negative_indegree() {
    let sources = range(0, 5);
    let targets = range(10, 3);
    let all = support::union(&[&sources, &targets]);
    let fakes = Fakes::single_threaded(&all, "static_synapse", 7);

    let err = ConnectionBuilder::new(
        sources,
        targets,
        RuleParams::FixedInDegree {
            indegree: ParamSpec::Scalar(ScalarValue::Long(-1)),
        },
        CommonOptions::new(),
        &synapse(),
        fakes.collaborators(),
    )
    .unwrap_err();
    assert!(matches!(err, shnn_connect::ConnectError::BadProperty { .. }));
}

#[test]
fn fixed_out_degree_gives_every_source_exactly_outdegree_outgoing_edges() {
    let sources = range(1, 8);
    let targets = range(50, 20);
    let all = support::union(&[&sources, &targets]);
    let fakes = Fakes::single_threaded(&all, "static_synapse", 8);
    let mut opts = CommonOptions::new();
    opts.allow_autapses = false;
    opts.allow_multapses = false;

    let mut builder = ConnectionBuilder::new(
        sources.clone(),
        targets,
        RuleParams::FixedOutDegree {
            outdegree: ParamSpec::Scalar(ScalarValue::Long(6)),
        },
        opts,
        &synapse(),
        fakes.collaborators(),
    )
    .unwrap();
    builder.connect().unwrap();

    let edges = edge_pairs(&fakes.storage);
    let mut per_source: HashMap<u32, usize> = HashMap::new();
    for (src, _) in &edges {
        *per_source.entry(*src).or_default() += 1;
    }
    for src in sources.iter() {
        assert_eq!(per_source.get(&src.raw()), Some(&6));
    }
}

#[test]
fn fixed_out_degree_edge_set_is_identical_under_different_thread_counts_given_the_same_seed() {
    let sources = range(1, 6);
    let targets = range(50, 12);
    let all = support::union(&[&sources, &targets]);

    let single = Fakes::single_threaded(&all, "static_synapse", 99);
    let mut b1 = ConnectionBuilder::new(
        sources.clone(),
        targets.clone(),
        RuleParams::FixedOutDegree {
            outdegree: ParamSpec::Scalar(ScalarValue::Long(4)),
        },
        CommonOptions::new(),
        &synapse(),
        single.collaborators(),
    )
    .unwrap();
    b1.connect().unwrap();

    let multi = Fakes::multi_threaded(&all, "static_synapse", 99, 4);
    let mut b2 = ConnectionBuilder::new(
        sources,
        targets,
        RuleParams::FixedOutDegree {
            outdegree: ParamSpec::Scalar(ScalarValue::Long(4)),
        },
        CommonOptions::new(),
        &synapse(),
        multi.collaborators(),
    )
    .unwrap();
    b2.connect().unwrap();

    assert_eq!(edge_pairs(&single.storage), edge_pairs(&multi.storage));
}
