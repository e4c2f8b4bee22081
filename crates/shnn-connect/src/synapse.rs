//! Per-synapse-type specifications and their per-thread scratch state

use std::collections::BTreeMap;

use crate::collaborators::{AttrValue, ModelId, SynapseModelRegistry};
use crate::error::{ConnectError, Result};
use crate::parameter::{ConnParameter, ParamSpec};

/// Attribute names the builder never turns into a generic
/// [`ConnParameter`]: they are either handled specially (`weight`,
/// `delay`) or are rule/meta-level keys that never reach a synapse
/// attribute map.
pub const RESERVED_ATTR_NAMES: &[&str] = &[
    "weight",
    "delay",
    "min_delay",
    "max_delay",
    "num_connections",
    "synapse_model",
];

/// Caller-supplied description of one synapse type to connect with.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynapseSpecInput {
    /// Name of the synapse model to resolve via the model registry
    pub synapse_model: String,
    /// Explicit weight, or `None` to use the model default
    pub weight: Option<ParamSpec>,
    /// Explicit delay, or `None` to use the model default
    pub delay: Option<ParamSpec>,
    /// Any other model-declared attribute
    pub attributes: BTreeMap<String, ParamSpec>,
    /// Pre-synaptic element name; presence enables structural plasticity
    pub pre_synaptic_element: Option<String>,
    /// Post-synaptic element name; presence enables structural plasticity
    pub post_synaptic_element: Option<String>,
}

impl SynapseSpecInput {
    /// Reject reserved names leaking into the generic attribute map
    pub fn validate(&self) -> Result<()> {
        if self.synapse_model.is_empty() {
            return Err(ConnectError::bad_property("synapse_model is required"));
        }
        for name in self.attributes.keys() {
            if RESERVED_ATTR_NAMES.contains(&name.as_str()) {
                return Err(ConnectError::bad_property(format!(
                    "attribute name '{name}' is reserved and cannot be set via the generic attribute map"
                )));
            }
        }
        if self.pre_synaptic_element.is_some() != self.post_synaptic_element.is_some() {
            return Err(ConnectError::bad_property(
                "pre_synaptic_element and post_synaptic_element must both be present or both absent",
            ));
        }
        Ok(())
    }

    /// Whether this spec requests structural plasticity
    pub fn wants_structural_plasticity(&self) -> bool {
        self.pre_synaptic_element.is_some()
    }
}

/// One thread's private slice of a synapse type's parameter/scratch
/// state. Holding these as a single per-thread struct (rather than
/// several parallel per-thread vectors) is what lets worker threads
/// borrow disjoint thread slots of every synapse type safely, via
/// [`SynapseSpec::split_per_thread`], without unsafe code.
#[derive(Debug)]
pub struct SynapseThreadState {
    weight: Option<ConnParameter>,
    delay: Option<ConnParameter>,
    attributes: BTreeMap<String, ConnParameter>,
    scratch: BTreeMap<String, AttrValue>,
}

impl SynapseThreadState {
    /// Mutable access to this thread's weight parameter, if supplied
    pub fn weight_mut(&mut self) -> Option<&mut ConnParameter> {
        self.weight.as_mut()
    }

    /// Mutable access to this thread's delay parameter, if supplied
    pub fn delay_mut(&mut self) -> Option<&mut ConnParameter> {
        self.delay.as_mut()
    }

    /// Mutable access to this thread's generic attribute parameters
    pub fn attributes_mut(&mut self) -> &mut BTreeMap<String, ConnParameter> {
        &mut self.attributes
    }

    /// Mutable access to this thread's pre-allocated scratch dictionary
    pub fn scratch_mut(&mut self) -> &mut BTreeMap<String, AttrValue> {
        &mut self.scratch
    }

    /// Advance every array-indexed parameter registered under "requires
    /// skipping" (weight, delay, every attribute) by `count`.
    pub fn skip(&mut self, count: usize) {
        if let Some(w) = self.weight.as_mut() {
            w.skip(count);
        }
        if let Some(d) = self.delay.as_mut() {
            d.skip(count);
        }
        for param in self.attributes.values_mut() {
            param.skip(count);
        }
    }

    fn reset(&mut self) {
        if let Some(w) = self.weight.as_mut() {
            w.reset();
        }
        if let Some(d) = self.delay.as_mut() {
            d.reset();
        }
        for param in self.attributes.values_mut() {
            param.reset();
        }
    }
}

/// Resolved, per-thread-ready state for one synapse type.
///
/// `has_weight`/`has_delay` are `false` when the caller did not supply
/// them — the corresponding fast path in
/// [`crate::builder::BuildContext::single_connect`] then lets the
/// connection storage backend fall back to the synapse model's own
/// default rather than constructing a `ConnParameter` at all.
#[derive(Debug)]
pub struct SynapseSpec {
    /// Resolved synapse model id
    pub model: ModelId,
    has_weight: bool,
    has_delay: bool,
    per_thread: Vec<SynapseThreadState>,
    /// Pre-synaptic element name, if this spec drives structural plasticity
    pub pre_synaptic_element: Option<String>,
    /// Post-synaptic element name, if this spec drives structural plasticity
    pub post_synaptic_element: Option<String>,
}

impl SynapseSpec {
    /// Resolve a caller-supplied spec against the model registry and
    /// allocate per-thread parameter/scratch state.
    pub fn new(
        input: &SynapseSpecInput,
        registry: &dyn SynapseModelRegistry,
        sources_len: usize,
        targets_len: usize,
        num_threads: usize,
    ) -> Result<Self> {
        input.validate()?;

        let model = registry
            .resolve(&input.synapse_model)
            .ok_or_else(|| ConnectError::unknown_synapse_type(input.synapse_model.clone()))?;

        let weight_template = input
            .weight
            .as_ref()
            .map(|spec| ConnParameter::from_spec(spec, sources_len, targets_len))
            .transpose()?;
        let delay_template = input
            .delay
            .as_ref()
            .map(|spec| ConnParameter::from_spec(spec, sources_len, targets_len))
            .transpose()?;

        let mut attr_names: Vec<String> = input.attributes.keys().cloned().collect();
        attr_names.sort();
        registry.check_synapse_params(model, &attr_names)?;

        let mut attr_templates = BTreeMap::new();
        for (name, spec) in &input.attributes {
            attr_templates.insert(name.clone(), ConnParameter::from_spec(spec, sources_len, targets_len)?);
        }

        let per_thread = (0..num_threads)
            .map(|_| {
                let scratch = attr_templates
                    .iter()
                    .map(|(name, param)| {
                        let placeholder = if param.provides_long() {
                            AttrValue::Long(0)
                        } else {
                            AttrValue::Double(0.0)
                        };
                        (name.clone(), placeholder)
                    })
                    .collect();
                SynapseThreadState {
                    weight: weight_template.clone(),
                    delay: delay_template.clone(),
                    attributes: attr_templates.clone(),
                    scratch,
                }
            })
            .collect();

        Ok(Self {
            model,
            has_weight: weight_template.is_some(),
            has_delay: delay_template.is_some(),
            per_thread,
            pre_synaptic_element: input.pre_synaptic_element.clone(),
            post_synaptic_element: input.post_synaptic_element.clone(),
        })
    }

    /// Whether the caller supplied an explicit weight
    pub fn has_weight(&self) -> bool {
        self.has_weight
    }

    /// Whether the caller supplied an explicit delay
    pub fn has_delay(&self) -> bool {
        self.has_delay
    }

    /// Number of threads this spec was built for
    pub fn num_threads(&self) -> usize {
        self.per_thread.len()
    }

    /// Direct access to one thread's state (used outside the parallel
    /// region, e.g. by unit tests)
    pub fn thread_state_mut(&mut self, thread: usize) -> &mut SynapseThreadState {
        &mut self.per_thread[thread]
    }

    /// Split this spec's per-thread state into disjoint mutable
    /// references, one per thread, consumed by
    /// [`crate::builder::BuildContext`] to hand each worker thread its
    /// own private slice before entering the parallel region.
    pub fn split_per_thread(&mut self) -> std::slice::IterMut<'_, SynapseThreadState> {
        self.per_thread.iter_mut()
    }

    /// Reset every thread's parameters to their initial deterministic
    /// state, used before a symmetrization replay (spec invariant:
    /// resetting must make an asymmetric run followed by a
    /// swapped-endpoints run produce identical draws).
    pub fn reset_all(&mut self) {
        for state in &mut self.per_thread {
            state.reset();
        }
    }

    /// Whether this spec enables structural plasticity
    pub fn wants_structural_plasticity(&self) -> bool {
        self.pre_synaptic_element.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::ScalarValue;
    use crate::testing::FakeModelRegistry;

    #[test]
    fn unknown_model_is_rejected() {
        let registry = FakeModelRegistry::with_model("static_synapse");
        let input = SynapseSpecInput {
            synapse_model: "does_not_exist".into(),
            ..Default::default()
        };
        let err = SynapseSpec::new(&input, &registry, 4, 4, 2).unwrap_err();
        assert!(matches!(err, ConnectError::UnknownSynapseType { .. }));
    }

    #[test]
    fn reserved_attribute_name_is_rejected() {
        let registry = FakeModelRegistry::with_model("static_synapse");
        let mut attributes = BTreeMap::new();
        attributes.insert("weight".to_string(), ParamSpec::Scalar(ScalarValue::Double(1.0)));
        let input = SynapseSpecInput {
            synapse_model: "static_synapse".into(),
            attributes,
            ..Default::default()
        };
        assert!(SynapseSpec::new(&input, &registry, 4, 4, 2).is_err());
    }

    #[test]
    fn per_thread_scratch_has_correct_kind() {
        let registry = FakeModelRegistry::with_model_and_attrs("static_synapse", &["receptor_type"]);
        let mut attributes = BTreeMap::new();
        attributes.insert(
            "receptor_type".to_string(),
            ParamSpec::Scalar(ScalarValue::Long(3)),
        );
        let input = SynapseSpecInput {
            synapse_model: "static_synapse".into(),
            weight: Some(ParamSpec::Scalar(ScalarValue::Double(0.1))),
            attributes,
            ..Default::default()
        };
        let mut spec = SynapseSpec::new(&input, &registry, 4, 4, 3).unwrap();
        assert!(spec.has_weight());
        assert!(!spec.has_delay());
        for t in 0..3 {
            assert_eq!(
                spec.thread_state_mut(t).scratch_mut().get("receptor_type"),
                Some(&AttrValue::Long(0))
            );
        }
    }

    #[test]
    fn split_per_thread_yields_disjoint_slices() {
        let registry = FakeModelRegistry::with_model("static_synapse");
        let input = SynapseSpecInput {
            synapse_model: "static_synapse".into(),
            weight: Some(ParamSpec::Array(vec![ScalarValue::Double(1.0), ScalarValue::Double(2.0)])),
            ..Default::default()
        };
        let mut spec = SynapseSpec::new(&input, &registry, 2, 2, 2).unwrap();
        let mut rng = rand::rngs::mock::StepRng::new(0, 0);
        let node = crate::node_collection::NodeId::new(0);
        // Every thread owns an independent clone starting at cursor 0.
        for state in spec.split_per_thread() {
            let v = state.weight_mut().unwrap().value(&mut rng, node).unwrap();
            assert_eq!(v, AttrValue::Double(1.0));
        }
    }
}
