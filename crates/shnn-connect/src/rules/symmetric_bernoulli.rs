//! Symmetric Bernoulli graph: every draw uses the rank-synchronized RNG
//! so every rank builds an identical, exactly symmetric multigraph.

use rand::Rng;
use rand_distr::{Binomial, Distribution as _};

use crate::builder::{BuildContext, BuildReport, Worker};
use crate::error::{ConnectError, Result};
use crate::node_collection::NodeId;

pub fn connect(ctx: &mut BuildContext<'_>, p: f64) -> Result<BuildReport> {
    let sources = ctx.sources().as_slice().to_vec();
    let targets = ctx.targets().as_slice().to_vec();

    let mut synced_rng = ctx.rank_synced_rng();
    let binomial = Binomial::new(sources.len() as u64, p)
        .map_err(|e| ConnectError::kernel_exception(format!("invalid symmetric Bernoulli binomial: {e}")))?;

    let mut plan: Vec<(NodeId, NodeId)> = Vec::new();
    for &target in &targets {
        let degree = loop {
            let draw = binomial.sample(&mut synced_rng) as usize;
            if draw < sources.len() {
                break draw;
            }
        };

        let mut chosen: Vec<NodeId> = Vec::with_capacity(degree);
        let mut attempts = 0usize;
        let max_attempts = degree.saturating_mul(sources.len().max(1)).saturating_add(1_000);
        while chosen.len() < degree {
            attempts += 1;
            if attempts > max_attempts {
                return Err(ConnectError::kernel_exception(
                    "symmetric Bernoulli draw did not converge for this target",
                ));
            }
            let candidate = sources[synced_rng.gen_range(0..sources.len())];
            if candidate == target || chosen.contains(&candidate) {
                continue;
            }
            chosen.push(candidate);
        }

        for src in chosen {
            plan.push((src, target));
            plan.push((target, src));
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
