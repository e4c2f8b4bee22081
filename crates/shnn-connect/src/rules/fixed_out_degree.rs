//! Fixed number of outgoing edges per source, globally coordinated so
//! every rank constructs the same target set for each source.

use rand::Rng;

use crate::builder::{BuildContext, BuildReport, Worker};
use crate::error::{ConnectError, Result};
use crate::node_collection::NodeId;
use crate::parameter::ParamSpec;

use super::degree_value;

pub fn connect(ctx: &mut BuildContext<'_>, outdegree: &ParamSpec) -> Result<BuildReport> {
    let opts = ctx.opts();
    let sources = ctx.sources().as_slice().to_vec();
    let targets = ctx.targets().as_slice().to_vec();

    // Structure decision: identical on every rank because it consumes
    // the rank-synchronized RNG in the same order everywhere.
    let mut synced_rng = ctx.rank_synced_rng();
    let mut plan: Vec<(NodeId, NodeId)> = Vec::new();
    for (source_idx, &src) in sources.iter().enumerate() {
        let degree = degree_value(outdegree, source_idx)?;
        if degree < 0 {
            return Err(ConnectError::bad_property(format!("outdegree must be >= 0, got {degree}")));
        }
        let degree = degree as usize;
        if degree > targets.len() && !opts.allow_multapses {
            return Err(ConnectError::bad_property(format!(
                "outdegree {degree} exceeds |targets|={} with multapses disabled",
                targets.len()
            )));
        }

        let mut chosen = Vec::with_capacity(degree);
        let mut attempts = 0usize;
        let max_attempts = degree.saturating_mul(targets.len().max(1)).saturating_add(1_000);
        while chosen.len() < degree {
            attempts += 1;
            if attempts > max_attempts {
                return Err(ConnectError::kernel_exception(
                    "fixed out-degree draw did not converge; check autapse/multapse constraints",
                ));
            }
            let idx = synced_rng.gen_range(0..targets.len());
            let candidate = targets[idx];
            if !opts.allow_autapses && candidate == src {
                continue;
            }
            if !opts.allow_multapses && chosen.contains(&candidate) {
                continue;
            }
            chosen.push(candidate);
        }
        for target in chosen {
            plan.push((src, target));
        }
    }

    ctx.run_parallel(move |worker: &mut Worker<'_>| {
        for &(src, target) in &plan {
            match worker.handle(target) {
                Ok(handle) if handle.is_local() => worker.single_connect(src, target)?,
                Ok(_) => worker.skip_conn_parameter(1),
                Err(err) => return Err(err),
            }
        }
        Ok(())
    })
}
