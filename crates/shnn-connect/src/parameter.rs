//! Caller-facing parameter specifications and the polymorphic
//! [`ConnParameter`] value producer built from them.

use rand::Rng;
use rand_distr::{Distribution as _, Exp, Normal, Uniform};

use crate::collaborators::AttrValue;
use crate::error::{ConnectError, Result};
use crate::node_collection::NodeId;

/// A scalar value a caller can supply directly (weight, delay, a fixed
/// probability, ...)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarValue {
    /// Integer-valued scalar
    Long(i64),
    /// Floating point scalar
    Double(f64),
}

impl From<ScalarValue> for AttrValue {
    fn from(v: ScalarValue) -> Self {
        match v {
            ScalarValue::Long(v) => AttrValue::Long(v),
            ScalarValue::Double(v) => AttrValue::Double(v),
        }
    }
}

/// One of a small closed set of distributions a parameter may sample
/// from, backed by `rand_distr`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistributionSpec {
    /// Continuous uniform distribution over `[low, high)`
    Uniform {
        /// Inclusive lower bound
        low: f64,
        /// Exclusive upper bound
        high: f64,
    },
    /// Normal (Gaussian) distribution
    Normal {
        /// Mean
        mean: f64,
        /// Standard deviation
        std: f64,
    },
    /// Exponential distribution
    Exponential {
        /// Rate parameter (lambda)
        lambda: f64,
    },
}

impl DistributionSpec {
    /// Validate the distribution's own parameters
    pub fn validate(&self) -> Result<()> {
        match *self {
            DistributionSpec::Uniform { low, high } if low >= high => Err(
                ConnectError::bad_property(format!("uniform distribution requires low < high, got low={low}, high={high}")),
            ),
            DistributionSpec::Normal { std, .. } if std <= 0.0 => Err(ConnectError::bad_property(
                format!("normal distribution requires std > 0, got {std}"),
            )),
            DistributionSpec::Exponential { lambda } if lambda <= 0.0 => Err(ConnectError::bad_property(
                format!("exponential distribution requires lambda > 0, got {lambda}"),
            )),
            _ => Ok(()),
        }
    }

    /// Draw a sample using the supplied RNG
    pub fn sample(&self, rng: &mut impl Rng) -> f64 {
        match *self {
            DistributionSpec::Uniform { low, high } => Uniform::new(low, high).sample(rng),
            DistributionSpec::Normal { mean, std } => Normal::new(mean, std)
                .expect("validated at construction")
                .sample(rng),
            DistributionSpec::Exponential { lambda } => Exp::new(lambda)
                .expect("validated at construction")
                .sample(rng),
        }
    }
}

/// The caller-facing value for a single synapse attribute (weight,
/// delay, or any model-declared attribute), before it is turned into a
/// [`ConnParameter`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParamSpec {
    /// A fixed scalar shared by every emitted edge
    Scalar(ScalarValue),
    /// A value sampled fresh for every edge
    Distribution(DistributionSpec),
    /// An array indexed in lockstep with the rule's iteration schedule;
    /// its length must equal `|sources|` or `|targets|`.
    Array(Vec<ScalarValue>),
}

/// Which collection an array-indexed parameter's length must match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArraySide {
    /// Array length must equal `|sources|`
    Sources,
    /// Array length must equal `|targets|`
    Targets,
}

/// A polymorphic value producer for one synapse attribute.
///
/// Constant and distribution-backed parameters are stateless beyond
/// their own definition. Array-indexed parameters carry an internal
/// cursor that advances once per **attempted** pair — including pairs
/// skipped because the target is non-local — so that indexing stays in
/// lockstep with the canonical single-threaded iteration schedule
/// regardless of how many worker threads actually run it. Every thread
/// owns its own clone of an array-indexed parameter (see
/// [`crate::synapse::SynapseSpec`]) and replays the identical canonical
/// schedule, calling [`ConnParameter::value`] for pairs it emits and
/// [`ConnParameter::skip`] for pairs it does not, so that every thread's
/// cursor reaches the same final position.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnParameter {
    /// Constant integer value
    ConstantLong(i64),
    /// Constant floating point value
    ConstantDouble(f64),
    /// Distribution-backed value, sampled fresh on every call
    Distribution(DistributionSpec),
    /// Array-indexed value with an internal cursor
    ArrayIndexed {
        /// Backing values, one per position in the canonical iteration
        values: Vec<ScalarValue>,
        /// Next position to read
        cursor: usize,
    },
}

impl ConnParameter {
    /// Build a `ConnParameter` from a caller-supplied [`ParamSpec`],
    /// validating an array spec's length against the source/target
    /// collection sizes it must line up with.
    pub fn from_spec(spec: &ParamSpec, sources_len: usize, targets_len: usize) -> Result<Self> {
        match spec {
            ParamSpec::Scalar(ScalarValue::Long(v)) => Ok(ConnParameter::ConstantLong(*v)),
            ParamSpec::Scalar(ScalarValue::Double(v)) => Ok(ConnParameter::ConstantDouble(*v)),
            ParamSpec::Distribution(d) => {
                d.validate()?;
                Ok(ConnParameter::Distribution(*d))
            }
            ParamSpec::Array(values) => {
                if values.len() != sources_len && values.len() != targets_len {
                    return Err(ConnectError::bad_property(format!(
                        "array parameter has length {}, expected {} (|sources|) or {} (|targets|)",
                        values.len(),
                        sources_len,
                        targets_len
                    )));
                }
                Ok(ConnParameter::ArrayIndexed {
                    values: values.clone(),
                    cursor: 0,
                })
            }
        }
    }

    /// Whether this parameter is a plain constant (no RNG or cursor
    /// state involved)
    pub fn is_scalar(&self) -> bool {
        matches!(self, ConnParameter::ConstantLong(_) | ConnParameter::ConstantDouble(_))
    }

    /// Whether this parameter produces integer-kinded values
    pub fn provides_long(&self) -> bool {
        match self {
            ConnParameter::ConstantLong(_) => true,
            ConnParameter::ArrayIndexed { values, .. } => {
                values.first().map(|v| matches!(v, ScalarValue::Long(_))).unwrap_or(false)
            }
            _ => false,
        }
    }

    /// Whether this parameter must be advanced with [`ConnParameter::skip`]
    /// on pairs that are not emitted
    pub fn requires_skipping(&self) -> bool {
        matches!(self, ConnParameter::ArrayIndexed { .. })
    }

    /// Reset any internal cursor to its initial deterministic state.
    /// Required before a symmetrization replay (spec invariant: "an
    /// asymmetric run followed by a swapped-endpoints run must produce
    /// identical draws").
    pub fn reset(&mut self) {
        if let ConnParameter::ArrayIndexed { cursor, .. } = self {
            *cursor = 0;
        }
    }

    /// Advance the cursor by `count` without producing a value. A no-op
    /// for constant/distribution parameters.
    pub fn skip(&mut self, count: usize) {
        if let ConnParameter::ArrayIndexed { cursor, .. } = self {
            *cursor += count;
        }
    }

    /// Produce the next value, advancing the cursor for array-indexed
    /// parameters. `context_node` is accepted so node-conditioned
    /// distributions can be added later, though none of the closed
    /// distribution set here uses it.
    pub fn value(&mut self, rng: &mut impl Rng, _context_node: NodeId) -> Result<AttrValue> {
        match self {
            ConnParameter::ConstantLong(v) => Ok(AttrValue::Long(*v)),
            ConnParameter::ConstantDouble(v) => Ok(AttrValue::Double(*v)),
            ConnParameter::Distribution(spec) => Ok(AttrValue::Double(spec.sample(rng))),
            ConnParameter::ArrayIndexed { values, cursor } => {
                let v = *values.get(*cursor).ok_or_else(|| {
                    ConnectError::kernel_exception(format!(
                        "array parameter exhausted at cursor {cursor} (length {})",
                        values.len()
                    ))
                })?;
                *cursor += 1;
                Ok(v.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn constant_scalar_round_trips() {
        let mut p = ConnParameter::from_spec(&ParamSpec::Scalar(ScalarValue::Double(0.5)), 3, 3).unwrap();
        assert!(p.is_scalar());
        assert_eq!(p.value(&mut rng(), NodeId::new(0)).unwrap(), AttrValue::Double(0.5));
    }

    #[test]
    fn array_parameter_rejects_mismatched_length() {
        let spec = ParamSpec::Array(vec![ScalarValue::Double(1.0), ScalarValue::Double(2.0)]);
        let err = ConnParameter::from_spec(&spec, 5, 5).unwrap_err();
        assert!(matches!(err, ConnectError::BadProperty { .. }));
    }

    #[test]
    fn array_parameter_advances_cursor_on_value_and_skip() {
        let spec = ParamSpec::Array(vec![
            ScalarValue::Long(10),
            ScalarValue::Long(20),
            ScalarValue::Long(30),
        ]);
        let mut p = ConnParameter::from_spec(&spec, 3, 10).unwrap();
        assert!(p.requires_skipping());
        assert_eq!(p.value(&mut rng(), NodeId::new(0)).unwrap(), AttrValue::Long(10));
        p.skip(1);
        assert_eq!(p.value(&mut rng(), NodeId::new(0)).unwrap(), AttrValue::Long(30));
    }

    #[test]
    fn reset_restores_initial_cursor() {
        let spec = ParamSpec::Array(vec![ScalarValue::Long(1), ScalarValue::Long(2)]);
        let mut p = ConnParameter::from_spec(&spec, 2, 10).unwrap();
        p.value(&mut rng(), NodeId::new(0)).unwrap();
        p.reset();
        assert_eq!(p.value(&mut rng(), NodeId::new(0)).unwrap(), AttrValue::Long(1));
    }

    #[test]
    fn exhausted_array_parameter_errors() {
        let spec = ParamSpec::Array(vec![ScalarValue::Long(1)]);
        let mut p = ConnParameter::from_spec(&spec, 1, 10).unwrap();
        p.value(&mut rng(), NodeId::new(0)).unwrap();
        assert!(p.value(&mut rng(), NodeId::new(0)).is_err());
    }

    #[test]
    fn invalid_distribution_rejected() {
        let bad = ParamSpec::Distribution(DistributionSpec::Uniform { low: 1.0, high: 0.0 });
        assert!(ConnParameter::from_spec(&bad, 3, 3).is_err());
    }
}
