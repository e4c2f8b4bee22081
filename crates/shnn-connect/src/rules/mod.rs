//! Connection rule catalog: a tagged variant over the nine connectivity
//! strategies, dispatched by [`crate::builder::ConnectionBuilder`].

mod all_to_all;
mod bernoulli;
mod fixed_in_degree;
mod fixed_out_degree;
mod fixed_total_number;
mod one_to_one;
mod structural_plasticity;
mod symmetric_bernoulli;
mod tripartite_bernoulli_with_pool;

use crate::builder::{BuildContext, BuildReport};
use crate::error::Result;
use crate::parameter::ParamSpec;

/// A degree parameter (`indegree`, `outdegree`): a non-negative integer,
/// constant or indexed per target/source. Same representation as
/// [`ParamSpec`]; named separately so the rule catalog's field types
/// read the way the spec's parameter taxonomy does.
pub type DegreeSpec = ParamSpec;

/// A connection-probability parameter (`p`): a value in `[0, 1]`,
/// constant or indexed per target. Same representation as [`ParamSpec`].
pub type ProbabilitySpec = ParamSpec;

/// Shared autapse/multapse/symmetry options every rule respects.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonOptions {
    /// Whether self-edges are permitted
    pub allow_autapses: bool,
    /// Whether parallel duplicate edges are permitted
    pub allow_multapses: bool,
    /// Whether the builder should replay with swapped endpoints for rules
    /// that do not create symmetric edges intrinsically
    pub make_symmetric: bool,
}

impl CommonOptions {
    /// Defaults: autapses and multapses both
    /// allowed, symmetrization off.
    pub fn new() -> Self {
        Self {
            allow_autapses: true,
            allow_multapses: true,
            make_symmetric: false,
        }
    }
}

/// Pool addressing mode for [`RuleParams::TripartiteBernoulliWithPool`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolType {
    /// Pool sampled independently per target from the full third collection
    Random,
    /// Pool assigned as a contiguous block per target
    Block,
}

/// The rule-specific parameter payload for each connectivity strategy.
#[derive(Debug, Clone)]
pub enum RuleParams {
    /// Pairwise `sources[i] -> targets[i]`
    OneToOne,
    /// Every source to every target
    AllToAll,
    /// Fixed number of incoming edges per target
    FixedInDegree {
        /// Non-negative indegree, scalar or array-indexed by target
        indegree: DegreeSpec,
    },
    /// Fixed number of outgoing edges per source
    FixedOutDegree {
        /// Non-negative outdegree, scalar or array-indexed by source
        outdegree: DegreeSpec,
    },
    /// Fixed total number of edges across the whole rule
    FixedTotalNumber {
        /// Total edge count. Represented as `u64` rather than the
        /// spec's `i64`: negative totals are not a range error to
        /// reject but a state the type system rules out entirely.
        n: u64,
    },
    /// Independent Bernoulli trial per (source, target) pair
    Bernoulli {
        /// Connection probability, scalar or array-indexed by target
        p: ProbabilitySpec,
    },
    /// Symmetric Bernoulli graph (single population, undirected multigraph)
    SymmetricBernoulli {
        /// Connection probability in `[0, 1)`
        p: f64,
    },
    /// Tripartite Bernoulli rule with a bounded third-factor pool
    TripartiteBernoulliWithPool {
        /// Primary source-target connection probability
        p_primary: f64,
        /// Conditional third-factor connection probability
        p_third_if_primary: f64,
        /// Third-factor pool size per target
        pool_size: usize,
        /// Pool addressing mode
        pool_type: PoolType,
        /// Third-factor population
        third: crate::node_collection::NodeCollection,
    },
}

impl RuleParams {
    /// Whether this rule intrinsically produces a symmetric edge set
    /// (and is therefore exempt from the builder's swap-and-replay
    /// symmetrization strategy)
    pub fn creates_symmetric_connections(&self) -> bool {
        matches!(self, RuleParams::SymmetricBernoulli { .. })
    }

    /// Whether this rule supports the builder's `make_symmetric` replay
    pub fn supports_symmetric_replay(&self) -> bool {
        matches!(self, RuleParams::OneToOne | RuleParams::AllToAll | RuleParams::Bernoulli { .. })
    }

    /// Eager range/shape validation performed at build time, before any
    /// thread is spawned.
    pub fn validate(&self, sources_len: usize, targets_len: usize, opts: &CommonOptions) -> Result<()> {
        use crate::error::ConnectError;

        match self {
            RuleParams::OneToOne => {
                if sources_len != targets_len {
                    return Err(ConnectError::dimension_mismatch(sources_len, targets_len));
                }
            }
            RuleParams::AllToAll | RuleParams::Bernoulli { .. } => {}
            RuleParams::FixedInDegree { indegree } => {
                validate_degree_scalar(indegree, sources_len, opts, "indegree")?;
            }
            RuleParams::FixedOutDegree { outdegree } => {
                validate_degree_scalar(outdegree, targets_len, opts, "outdegree")?;
            }
            RuleParams::FixedTotalNumber { n } => {
                let max = sources_len as u64 * targets_len as u64;
                if !opts.allow_multapses && *n > max {
                    return Err(ConnectError::not_implemented(
                        "FixedTotalNumber with multapses disabled requires N <= |sources|*|targets|",
                    ));
                }
            }
            RuleParams::SymmetricBernoulli { p } => {
                if !(0.0..1.0).contains(p) {
                    return Err(ConnectError::bad_property(format!(
                        "SymmetricBernoulli requires p in [0, 1), got {p}"
                    )));
                }
                if opts.allow_autapses || !opts.allow_multapses || !opts.make_symmetric {
                    return Err(ConnectError::not_implemented(
                        "SymmetricBernoulli requires allow_multapses=true, allow_autapses=false, make_symmetric=true",
                    ));
                }
            }
            RuleParams::TripartiteBernoulliWithPool {
                p_primary,
                p_third_if_primary,
                pool_size,
                pool_type,
                third,
            } => {
                if !(0.0..=1.0).contains(p_primary) || !(0.0..=1.0).contains(p_third_if_primary) {
                    return Err(ConnectError::bad_property(
                        "tripartite probabilities must lie in [0, 1]",
                    ));
                }
                if *pool_size == 0 || *pool_size > third.len() {
                    return Err(ConnectError::bad_property(format!(
                        "pool_size must be in [1, {}], got {pool_size}",
                        third.len()
                    )));
                }
                if *pool_type == PoolType::Block {
                    let fits_contiguous = targets_len * pool_size == third.len();
                    let fits_shared = *pool_size == 1 && third.len() > 0 && targets_len % third.len() == 0;
                    if !fits_contiguous && !fits_shared {
                        return Err(ConnectError::bad_property(
                            "block pool_type requires |targets|*pool_size == |third|, or pool_size == 1 with |targets| divisible by |third|",
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Resolve a degree-shaped rule parameter (`indegree`, `outdegree`) at a
/// given population index. Scalars are constant across the population;
/// arrays are indexed positionally; distributions are not supported
/// here (degree draws are a structural decision, not a per-edge
/// attribute draw, and keeping it off the
/// distribution-sampling path).
pub(crate) fn degree_value(spec: &ParamSpec, index: usize) -> Result<i64> {
    use crate::error::ConnectError;
    use crate::parameter::ScalarValue;

    match spec {
        ParamSpec::Scalar(ScalarValue::Long(v)) => Ok(*v),
        ParamSpec::Scalar(ScalarValue::Double(_)) => {
            Err(ConnectError::bad_property("degree parameters must be integer-valued"))
        }
        ParamSpec::Array(values) => match values.get(index) {
            Some(crate::parameter::ScalarValue::Long(v)) => Ok(*v),
            Some(crate::parameter::ScalarValue::Double(_)) => {
                Err(ConnectError::bad_property("degree arrays must be integer-valued"))
            }
            None => Err(ConnectError::kernel_exception(format!(
                "degree array has no entry at index {index}"
            ))),
        },
        ParamSpec::Distribution(_) => Err(ConnectError::not_implemented(
            "distribution-valued degree parameters are not supported",
        )),
    }
}

/// Resolve a probability-shaped rule parameter (`p`) at a given
/// population index, analogous to [`degree_value`].
pub(crate) fn probability_value(spec: &ParamSpec, index: usize) -> Result<f64> {
    use crate::error::ConnectError;
    use crate::parameter::ScalarValue;

    let p = match spec {
        ParamSpec::Scalar(ScalarValue::Double(v)) => *v,
        ParamSpec::Scalar(ScalarValue::Long(v)) => *v as f64,
        ParamSpec::Array(values) => match values.get(index) {
            Some(ScalarValue::Double(v)) => *v,
            Some(ScalarValue::Long(v)) => *v as f64,
            None => {
                return Err(ConnectError::kernel_exception(format!(
                    "probability array has no entry at index {index}"
                )))
            }
        },
        ParamSpec::Distribution(_) => {
            return Err(ConnectError::not_implemented(
                "distribution-valued probability parameters are not supported",
            ))
        }
    };
    if !(0.0..=1.0).contains(&p) {
        return Err(ConnectError::bad_property(format!("probability must lie in [0, 1], got {p}")));
    }
    Ok(p)
}

fn validate_degree_scalar(
    degree: &ParamSpec,
    population_len: usize,
    opts: &CommonOptions,
    label: &str,
) -> Result<()> {
    use crate::error::ConnectError;
    use crate::parameter::ScalarValue;

    if let ParamSpec::Scalar(ScalarValue::Long(v)) = degree {
        if *v < 0 {
            return Err(ConnectError::bad_property(format!("{label} must be >= 0, got {v}")));
        }
        let v = *v as usize;
        if !opts.allow_multapses && v > population_len {
            return Err(ConnectError::bad_property(format!(
                "{label} must be <= {population_len} when multapses are disabled, got {v}"
            )));
        }
        if v as f64 > 0.9 * population_len as f64 {
            log::warn!("{label}={v} exceeds 90% of the available population ({population_len}); draws may be slow");
        }
    }
    Ok(())
}

/// Run this rule's `connect()` strategy against `ctx`.
pub fn connect(params: &RuleParams, ctx: &mut BuildContext<'_>) -> Result<BuildReport> {
    match params {
        RuleParams::OneToOne => one_to_one::connect(ctx),
        RuleParams::AllToAll => all_to_all::connect(ctx),
        RuleParams::FixedInDegree { indegree } => fixed_in_degree::connect(ctx, indegree),
        RuleParams::FixedOutDegree { outdegree } => fixed_out_degree::connect(ctx, outdegree),
        RuleParams::FixedTotalNumber { n } => fixed_total_number::connect(ctx, *n),
        RuleParams::Bernoulli { p } => bernoulli::connect(ctx, p),
        RuleParams::SymmetricBernoulli { p } => symmetric_bernoulli::connect(ctx, *p),
        RuleParams::TripartiteBernoulliWithPool {
            p_primary,
            p_third_if_primary,
            pool_size,
            pool_type,
            third,
        } => tripartite_bernoulli_with_pool::connect(
            ctx,
            *p_primary,
            *p_third_if_primary,
            *pool_size,
            *pool_type,
            third,
        ),
    }
}

/// Run this rule's `disconnect()` strategy against `ctx`. Only
/// `OneToOne` supports it; every other rule reports
/// [`crate::error::ConnectError::NotImplemented`].
pub fn disconnect(params: &RuleParams, ctx: &mut BuildContext<'_>) -> Result<BuildReport> {
    use crate::error::ConnectError;

    match params {
        RuleParams::OneToOne => one_to_one::disconnect(ctx),
        _ => Err(ConnectError::not_implemented(
            "disconnect() is only supported for the OneToOne rule",
        )),
    }
}

pub use structural_plasticity::{sp_connect, sp_disconnect};
