//! Fixed number of incoming edges per target, drawn independently per VP

use rand::Rng;

use crate::builder::{BuildContext, BuildReport, Worker};
use crate::error::{ConnectError, Result};
use crate::node_collection::NodeId;
use crate::parameter::ParamSpec;

use super::degree_value;

pub fn connect(ctx: &mut BuildContext<'_>, indegree: &ParamSpec) -> Result<BuildReport> {
    let opts = ctx.opts();
    let sources = ctx.sources().as_slice().to_vec();
    let targets = ctx.targets().as_slice().to_vec();
    let indegree = indegree.clone();

    ctx.run_parallel(move |worker: &mut Worker<'_>| {
        for (target_idx, &target) in targets.iter().enumerate() {
            let degree = degree_value(&indegree, target_idx)?;
            if degree < 0 {
                return Err(ConnectError::bad_property(format!("indegree must be >= 0, got {degree}")));
            }
            let degree = degree as usize;

            match worker.handle(target) {
                Ok(handle) if handle.is_local() => {
                    let chosen = draw_sources(&sources, target, degree, opts.allow_autapses, opts.allow_multapses, worker)?;
                    for src in chosen {
                        worker.single_connect(src, target)?;
                    }
                }
                Ok(_) => worker.skip_conn_parameter(degree),
                Err(err) => return Err(err),
            }
        }
        Ok(())
    })
}

fn draw_sources(
    sources: &[NodeId],
    target: NodeId,
    degree: usize,
    allow_autapses: bool,
    allow_multapses: bool,
    worker: &mut Worker<'_>,
) -> Result<Vec<NodeId>> {
    if degree > sources.len() && !allow_multapses {
        return Err(ConnectError::bad_property(format!(
            "indegree {degree} exceeds |sources|={} with multapses disabled",
            sources.len()
        )));
    }
    if degree == sources.len() && !allow_autapses && sources.contains(&target) {
        log::warn!(
            "indegree equals |sources| with autapses disabled and the source population contains the target; this rule may need many redraws for target {}",
            target.raw()
        );
    }

    let mut chosen = Vec::with_capacity(degree);
    let mut attempts = 0usize;
    let max_attempts = degree.saturating_mul(sources.len().max(1)).saturating_add(1_000);
    while chosen.len() < degree {
        attempts += 1;
        if attempts > max_attempts {
            return Err(ConnectError::kernel_exception(
                "fixed in-degree draw did not converge; check autapse/multapse constraints",
            ));
        }
        let idx = worker.vp_rng.gen_range(0..sources.len());
        let candidate = sources[idx];
        if !allow_autapses && candidate == target {
            continue;
        }
        if !allow_multapses && chosen.contains(&candidate) {
            continue;
        }
        chosen.push(candidate);
    }
    Ok(chosen)
}
