//! TripartiteBernoulliWithPool: primary source->target edges plus a
//! conditional third-factor relay through a bounded pool.

mod support;

use shnn_connect::{CommonOptions, ConnectionBuilder, ParamSpec, PoolType, RuleParams, ScalarValue, SynapseSpecInput};
use support::{edge_pairs, range, Fakes};

fn synapse() -> Vec<SynapseSpecInput> {
    vec![SynapseSpecInput {
        synapse_model: "static_synapse".into(),
        weight: Some(ParamSpec::Scalar(ScalarValue::Double(1.0))),
        ..Default::default()
    }]
}

#[test]
fn p_primary_one_connects_every_source_to_every_target_with_no_third_relay_when_p_third_is_zero() {
    let sources = range(1, 3); // {1, 2, 3}
    let targets = range(10, 2); // {10, 11}
    let third = range(20, 4); // {20, 21, 22, 23}
    let all = support::union(&[&sources, &targets, &third]);
    let fakes = Fakes::single_threaded(&all, "static_synapse", 61);

    let mut builder = ConnectionBuilder::new(
        sources,
        targets,
        RuleParams::TripartiteBernoulliWithPool {
            p_primary: 1.0,
            p_third_if_primary: 0.0,
            pool_size: 2,
            pool_type: PoolType::Block,
            third,
        },
        CommonOptions::new(),
        &synapse(),
        fakes.collaborators(),
    )
    .unwrap();
    let report = builder.connect().unwrap();

    let edges = edge_pairs(&fakes.storage);
    assert_eq!(edges.len(), 6, "3 sources * 2 targets primary edges, no third relay");
    assert_eq!(report.edges_emitted, 6);
    for &(_, t) in &edges {
        assert!((10..12).contains(&t), "no edge should land on a third-pool node");
    }
}

#[test]
fn p_third_if_primary_one_adds_a_relay_for_every_primary_edge() {
    let sources = range(1, 3);
    let targets = range(10, 2);
    let third = range(20, 4);
    let all = support::union(&[&sources, &targets, &third]);
    let fakes = Fakes::single_threaded(&all, "static_synapse", 62);

    let mut builder = ConnectionBuilder::new(
        sources,
        targets,
        RuleParams::TripartiteBernoulliWithPool {
            p_primary: 1.0,
            p_third_if_primary: 1.0,
            pool_size: 2,
            pool_type: PoolType::Block,
            third,
        },
        CommonOptions::new(),
        &synapse(),
        fakes.collaborators(),
    )
    .unwrap();
    builder.connect().unwrap();

    // 6 primary + 6 (src -> third) + 6 (third -> target) = 18
    assert_eq!(fakes.storage.len(), 18);
}

#[test]
fn block_pool_with_shared_third_node_assigns_contiguous_groups() {
    // sources={1..4}, targets={5..8}, third={9..12}, pool_size=1: each
    // target k shares its own dedicated third node 9+k (groups of size
    // |targets|/|third| = 1), matching the spec's concrete scenario 6.
    let sources = range(1, 4);
    let targets = range(5, 4);
    let third = range(9, 4);
    let all = support::union(&[&sources, &targets, &third]);
    let fakes = Fakes::single_threaded(&all, "static_synapse", 65);

    let mut builder = ConnectionBuilder::new(
        sources,
        targets,
        RuleParams::TripartiteBernoulliWithPool {
            p_primary: 1.0,
            p_third_if_primary: 1.0,
            pool_size: 1,
            pool_type: PoolType::Block,
            third,
        },
        CommonOptions::new(),
        &synapse(),
        fakes.collaborators(),
    )
    .unwrap();
    builder.connect().unwrap();

    let edges = edge_pairs(&fakes.storage);
    for k in 0..4u32 {
        let target = 5 + k;
        let third_node = 9 + k;
        assert!(
            edges.contains(&(third_node, target)),
            "target {target} should have a third-factor neighbor {third_node}"
        );
        assert!(
            edges.iter().any(|&(s, t)| t == third_node && s != target),
            "third node {third_node} should receive a source->third relay"
        );
    }
}

#[test]
fn pool_size_of_zero_is_rejected() {
    let sources = range(1, 3);
    let targets = range(10, 2);
    let third = range(20, 4);
    let all = support::union(&[&sources, &targets, &third]);
    let fakes = Fakes::single_threaded(&all, "static_synapse", 63);

    let err = ConnectionBuilder::new(
        sources,
        targets,
        RuleParams::TripartiteBernoulliWithPool {
            p_primary: 0.5,
            p_third_if_primary: 0.5,
            pool_size: 0,
            pool_type: PoolType::Random,
            third,
        },
        CommonOptions::new(),
        &synapse(),
        fakes.collaborators(),
    )
    .unwrap_err();
    assert!(matches!(err, shnn_connect::ConnectError::BadProperty { .. }));
}

#[test]
fn block_pool_type_requires_an_exact_fit_against_the_third_population() {
    let sources = range(1, 3);
    let targets = range(10, 3); // 3 targets
    let third = range(20, 4); // 4 third nodes: 3*2 != 4, not a multiple either
    let all = support::union(&[&sources, &targets, &third]);
    let fakes = Fakes::single_threaded(&all, "static_synapse", 64);

    let err = ConnectionBuilder::new(
        sources,
        targets,
        RuleParams::TripartiteBernoulliWithPool {
            p_primary: 0.5,
            p_third_if_primary: 0.5,
            pool_size: 2,
            pool_type: PoolType::Block,
            third,
        },
        CommonOptions::new(),
        &synapse(),
        fakes.collaborators(),
    )
    .unwrap_err();
    assert!(matches!(err, shnn_connect::ConnectError::BadProperty { .. }));
}
