//! Bernoulli boundary cases: p=1 equals AllToAll, p=0 emits nothing.

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
fn p_equals_one_behaves_like_all_to_all() {
    let sources = range(0, 4);
    let targets = range(40, 5);
    let all = support::union(&[&sources, &targets]);
    let fakes = Fakes::single_threaded(&all, "static_synapse", 41);

    let mut builder = ConnectionBuilder::new(
        sources,
        targets,
        RuleParams::Bernoulli {
            p: ParamSpec::Scalar(ScalarValue::Double(1.0)),
        },
        CommonOptions::new(),
        &synapse(),
        fakes.collaborators(),
    )
    .unwrap();
    builder.connect().unwrap();

    assert_eq!(fakes.storage.len(), 4 * 5);
}

#[test]
fn p_equals_zero_emits_no_edges() {
    let sources = range(0, 4);
    let targets = range(40, 5);
    let all = support::union(&[&sources, &targets]);
    let fakes = Fakes::single_threaded(&all, "static_synapse", 42);

    let mut builder = ConnectionBuilder::new(
        sources,
        targets,
        RuleParams::Bernoulli {
            p: ParamSpec::Scalar(ScalarValue::Double(0.0)),
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
fn probability_out_of_range_is_rejected() {
    let sources = range(0, 3);
    let targets = range(10, 3);
    let all = support::union(&[&sources, &targets]);
    let fakes = Fakes::single_threaded(&all, "static_synapse", 43);

    let mut builder = ConnectionBuilder::new(
        sources,
        targets,
        RuleParams::Bernoulli {
            p: ParamSpec::Scalar(ScalarValue::Double(1.5)),
        },
        CommonOptions::new(),
        &synapse(),
        fakes.collaborators(),
    )
    .unwrap();
    let err = builder.connect().unwrap_err();
    let _ = edge_pairs(&fakes.storage);
    assert!(matches!(
        err,
        shnn_connect::ConnectError::WrappedThreadException { .. } | shnn_connect::ConnectError::BadProperty { .. }
    ));
}
