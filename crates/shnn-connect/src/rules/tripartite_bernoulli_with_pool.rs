//! Tripartite Bernoulli rule with a bounded third-factor pool per target

use rand::Rng;
use rand_distr::{Binomial, Distribution as _};

use crate::builder::{BuildContext, BuildReport, Worker};
use crate::error::{ConnectError, Result};
use crate::node_collection::{NodeCollection, NodeId};

use super::PoolType;

#[allow(clippy::too_many_arguments)]
pub fn connect(
    ctx: &mut BuildContext<'_>,
    p_primary: f64,
    p_third_if_primary: f64,
    pool_size: usize,
    pool_type: PoolType,
    third: &NodeCollection,
) -> Result<BuildReport> {
    let sources = ctx.sources().as_slice().to_vec();
    let targets = ctx.targets().as_slice().to_vec();
    let third_nodes = third.as_slice().to_vec();

    let mut synced_rng = ctx.rank_synced_rng();
    let binomial = Binomial::new(sources.len() as u64, p_primary)
        .map_err(|e| ConnectError::kernel_exception(format!("invalid tripartite primary binomial: {e}")))?;

    // (source -> target) primary edges, (source -> third) and
    // (third -> target) auxiliary streams, all decided up front on the
    // rank-synchronized RNG so every rank agrees.
    let mut primary_plan: Vec<(NodeId, NodeId)> = Vec::new();
    let mut third_in_plan: Vec<(NodeId, NodeId)> = Vec::new();
    let mut third_out_plan: Vec<(NodeId, NodeId)> = Vec::new();

    let groups_per_third = if pool_size == 1 && !third_nodes.is_empty() {
        (targets.len() / third_nodes.len()).max(1)
    } else {
        1
    };

    for (target_idx, &target) in targets.iter().enumerate() {
        let degree = (binomial.sample(&mut synced_rng) as usize).min(sources.len());

        let mut available = sources.clone();
        let mut chosen_primary = Vec::with_capacity(degree);
        for _ in 0..degree {
            let idx = synced_rng.gen_range(0..available.len());
            chosen_primary.push(available.remove(idx));
        }

        let pool: Vec<NodeId> = match pool_type {
            PoolType::Block if pool_size == 1 => {
                let group = target_idx / groups_per_third;
                vec![third_nodes[group.min(third_nodes.len().saturating_sub(1))]]
            }
            PoolType::Block => {
                let start = target_idx * pool_size;
                third_nodes[start..start + pool_size].to_vec()
            }
            PoolType::Random => {
                let mut pool_candidates = third_nodes.clone();
                let mut pool = Vec::with_capacity(pool_size);
                for _ in 0..pool_size.min(pool_candidates.len()) {
                    let idx = synced_rng.gen_range(0..pool_candidates.len());
                    pool.push(pool_candidates.remove(idx));
                }
                pool
            }
        };

        for src in chosen_primary {
            primary_plan.push((src, target));
            let trial = !pool.is_empty() && synced_rng.gen::<f64>() < p_third_if_primary;
            if trial {
                let third_node = pool[synced_rng.gen_range(0..pool.len())];
                third_in_plan.push((src, third_node));
                third_out_plan.push((third_node, target));
            }
        }
    }

    ctx.run_parallel(move |worker: &mut Worker<'_>| {
        for &(src, target) in &primary_plan {
            match worker.handle(target) {
                Ok(handle) if handle.is_local() => worker.single_connect(src, target)?,
                Ok(_) => worker.skip_conn_parameter(1),
                Err(err) => return Err(err),
            }
        }
        for &(src, third_node) in &third_in_plan {
            match worker.handle(third_node) {
                Ok(handle) if handle.is_local() => worker.single_connect(src, third_node)?,
                Ok(_) => worker.skip_conn_parameter(1),
                Err(err) => return Err(err),
            }
        }
        for &(third_node, target) in &third_out_plan {
            match worker.handle(target) {
                Ok(handle) if handle.is_local() => worker.single_connect(third_node, target)?,
                Ok(_) => worker.skip_conn_parameter(1),
                Err(err) => return Err(err),
            }
        }
        Ok(())
    })
}
