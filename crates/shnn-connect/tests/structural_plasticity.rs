//! Structural plasticity: externally-supplied pair lists, reserved via
//! per-endpoint synaptic element counters.

mod support;

use shnn_connect::{CommonOptions, ConnectionBuilder, ParamSpec, RuleParams, ScalarValue, SynapseSpecInput};
use support::{edge_pairs, node, range, Fakes};

fn sp_synapse() -> Vec<SynapseSpecInput> {
    vec![SynapseSpecInput {
        synapse_model: "static_synapse".into(),
        weight: Some(ParamSpec::Scalar(ScalarValue::Double(1.0))),
        pre_synaptic_element: Some("Axon".into()),
        post_synaptic_element: Some("Dendrite".into()),
        ..Default::default()
    }]
}

#[test]
fn sp_connect_emits_pairs_and_reserves_elements_at_both_endpoints() {
    let sources = range(1, 3);
    let targets = range(10, 3);
    let all = support::union(&[&sources, &targets]);
    let fakes = Fakes::single_threaded(&all, "static_synapse", 71);

    let mut builder = ConnectionBuilder::new(
        sources.clone(),
        targets.clone(),
        RuleParams::OneToOne,
        CommonOptions::new(),
        &sp_synapse(),
        fakes.collaborators_with_sp(),
    )
    .unwrap();

    let src_list = [node(1), node(2), node(3)];
    let tgt_list = [node(10), node(11), node(12)];
    let report = builder.sp_connect(&src_list, &tgt_list).unwrap();

    assert_eq!(edge_pairs(&fakes.storage), [(1, 10), (2, 11), (3, 12)].into_iter().collect());
    assert_eq!(report.edges_emitted, 3);
    for src in src_list {
        assert_eq!(fakes.element_manager.count(src, "Axon"), 1);
    }
    for tgt in tgt_list {
        assert_eq!(fakes.element_manager.count(tgt, "Dendrite"), 1);
    }
}

#[test]
fn sp_disconnect_removes_pairs_and_releases_elements() {
    let sources = range(1, 2);
    let targets = range(10, 2);
    let all = support::union(&[&sources, &targets]);
    let fakes = Fakes::single_threaded(&all, "static_synapse", 72);

    let mut builder = ConnectionBuilder::new(
        sources,
        targets,
        RuleParams::OneToOne,
        CommonOptions::new(),
        &sp_synapse(),
        fakes.collaborators_with_sp(),
    )
    .unwrap();

    let src_list = [node(1), node(2)];
    let tgt_list = [node(10), node(11)];
    builder.sp_connect(&src_list, &tgt_list).unwrap();
    assert_eq!(fakes.storage.len(), 2);

    builder.sp_disconnect(&src_list, &tgt_list).unwrap();
    assert!(fakes.storage.is_empty());
    for src in src_list {
        assert_eq!(fakes.element_manager.count(src, "Axon"), 0);
    }
    for tgt in tgt_list {
        assert_eq!(fakes.element_manager.count(tgt, "Dendrite"), 0);
    }
}

#[test]
fn plain_connect_is_rejected_when_structural_plasticity_elements_are_configured() {
    let sources = range(1, 2);
    let targets = range(10, 2);
    let all = support::union(&[&sources, &targets]);
    let fakes = Fakes::single_threaded(&all, "static_synapse", 73);

    let mut builder = ConnectionBuilder::new(
        sources,
        targets,
        RuleParams::OneToOne,
        CommonOptions::new(),
        &sp_synapse(),
        fakes.collaborators_with_sp(),
    )
    .unwrap();

    let err = builder.connect().unwrap_err();
    assert!(matches!(err, shnn_connect::ConnectError::NotImplemented { .. }));
}

#[test]
fn structural_plasticity_is_incompatible_with_make_symmetric() {
    let sources = range(1, 2);
    let targets = range(10, 2);
    let all = support::union(&[&sources, &targets]);
    let fakes = Fakes::single_threaded(&all, "static_synapse", 74);
    let mut opts = CommonOptions::new();
    opts.make_symmetric = true;

    let err = ConnectionBuilder::new(
        sources,
        targets,
        RuleParams::OneToOne,
        opts,
        &sp_synapse(),
        fakes.collaborators_with_sp(),
    )
    .unwrap_err();
    assert!(matches!(err, shnn_connect::ConnectError::NotImplemented { .. }));
}
