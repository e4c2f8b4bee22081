//! Decomposition invariance (spec invariant I2): array-indexed
//! parameters stay in lockstep with the canonical single-threaded
//! iteration order regardless of how many worker threads run the build.

mod support;

use shnn_connect::{CommonOptions, ConnectionBuilder, ParamSpec, RuleParams, ScalarValue, SynapseSpecInput};
use support::{edge_pairs, range, Fakes};

fn indexed_weight_synapse() -> Vec<SynapseSpecInput> {
    vec![SynapseSpecInput {
        synapse_model: "static_synapse".into(),
        weight: Some(ParamSpec::Array(
            (0..6).map(|i| ScalarValue::Double(i as f64 * 10.0)).collect(),
        )),
        ..Default::default()
    }]
}

// OneToOne visits exactly one pair per population index, so an
// array-indexed parameter of the same length as the (equal-size)
// source/target collections lines up unambiguously, one entry per pair.

fn weight_by_target(storage: &shnn_connect::testing::FakeConnectionStorage) -> std::collections::BTreeMap<(u32, u32), f64> {
    storage
        .edges()
        .into_iter()
        .map(|e| ((e.src.raw(), e.target.raw()), e.weight.expect("weight was set")))
        .collect()
}

#[test]
fn array_indexed_weight_matches_the_canonical_order_under_one_to_one_regardless_of_thread_count() {
    let sources = range(1, 6); // {1..6}
    let targets = range(100, 6); // {100..106}, 6 pairs, matches the 6-entry weight array
    let all = support::union(&[&sources, &targets]);

    let single = Fakes::single_threaded(&all, "static_synapse", 81);
    let mut b1 = ConnectionBuilder::new(
        sources.clone(),
        targets.clone(),
        RuleParams::OneToOne,
        CommonOptions::new(),
        &indexed_weight_synapse(),
        single.collaborators(),
    )
    .unwrap();
    b1.connect().unwrap();

    let multi = Fakes::multi_threaded(&all, "static_synapse", 81, 3);
    let mut b2 = ConnectionBuilder::new(
        sources,
        targets,
        RuleParams::OneToOne,
        CommonOptions::new(),
        &indexed_weight_synapse(),
        multi.collaborators(),
    )
    .unwrap();
    b2.connect().unwrap();

    assert_eq!(edge_pairs(&single.storage), edge_pairs(&multi.storage));
    assert_eq!(weight_by_target(&single.storage), weight_by_target(&multi.storage));

    // And matches the hand-computed canonical assignment: OneToOne
    // visits pair i as (sources[i], targets[i]), so the array cursor
    // advances in lockstep with the population index.
    let expected: std::collections::BTreeMap<(u32, u32), f64> = [
        ((1, 100), 0.0),
        ((2, 101), 10.0),
        ((3, 102), 20.0),
        ((4, 103), 30.0),
        ((5, 104), 40.0),
        ((6, 105), 50.0),
    ]
    .into_iter()
    .collect();
    assert_eq!(weight_by_target(&single.storage), expected);
}

#[test]
fn fixed_out_degree_structural_decision_is_identical_across_thread_counts() {
    let sources = range(1, 10);
    let targets = range(100, 30);
    let all = support::union(&[&sources, &targets]);

    let single = Fakes::single_threaded(&all, "static_synapse", 82);
    let mut b1 = ConnectionBuilder::new(
        sources.clone(),
        targets.clone(),
        RuleParams::FixedOutDegree {
            outdegree: ParamSpec::Scalar(ScalarValue::Long(5)),
        },
        CommonOptions::new(),
        &[SynapseSpecInput {
            synapse_model: "static_synapse".into(),
            weight: Some(ParamSpec::Scalar(ScalarValue::Double(1.0))),
            ..Default::default()
        }],
        single.collaborators(),
    )
    .unwrap();
    b1.connect().unwrap();

    let multi = Fakes::multi_threaded(&all, "static_synapse", 82, 5);
    let mut b2 = ConnectionBuilder::new(
        sources,
        targets,
        RuleParams::FixedOutDegree {
            outdegree: ParamSpec::Scalar(ScalarValue::Long(5)),
        },
        CommonOptions::new(),
        &[SynapseSpecInput {
            synapse_model: "static_synapse".into(),
            weight: Some(ParamSpec::Scalar(ScalarValue::Double(1.0))),
            ..Default::default()
        }],
        multi.collaborators(),
    )
    .unwrap();
    b2.connect().unwrap();

    assert_eq!(edge_pairs(&single.storage), edge_pairs(&multi.storage));
}
