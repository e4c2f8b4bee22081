//! Fixed total number of edges, partitioned across virtual processes by
//! a sequential multinomial draw on the rank-synchronized RNG.

use rand::Rng;
use rand_distr::{Binomial, Distribution as _};

use crate::builder::{BuildContext, BuildReport, Worker};
use crate::error::{ConnectError, Result};
use crate::node_collection::NodeId;

pub fn connect(ctx: &mut BuildContext<'_>, n: u64) -> Result<BuildReport> {
    let opts = ctx.opts();
    let sources = ctx.sources().as_slice().to_vec();
    let targets = ctx.targets().as_slice().to_vec();
    let num_vps = ctx.vp_manager().num_vps().max(1);

    let mut targets_per_vp: Vec<Vec<NodeId>> = vec![Vec::new(); num_vps];
    for &target in &targets {
        let vp = ctx.vp_manager().node_to_vp(target) % num_vps;
        targets_per_vp[vp].push(target);
    }

    // Partition N across VPs via a sequential multinomial, realized as a
    // chain of binomial draws, on the rank-synchronized RNG so every
    // rank agrees on the same per-VP counts.
    let mut synced_rng = ctx.rank_synced_rng();
    let mut counts = vec![0u64; num_vps];
    let mut remaining_n = n;
    let mut remaining_targets = targets.len() as u64;
    for vp in 0..num_vps {
        let n_in_vp = targets_per_vp[vp].len() as u64;
        if remaining_n == 0 || remaining_targets == 0 {
            break;
        }
        let p = (n_in_vp as f64 / remaining_targets as f64).clamp(0.0, 1.0);
        let draw = Binomial::new(remaining_n, p)
            .map_err(|e| ConnectError::kernel_exception(format!("invalid binomial partition: {e}")))?
            .sample(&mut synced_rng);
        counts[vp] = draw.min(remaining_n);
        remaining_n -= counts[vp];
        remaining_targets -= n_in_vp;
    }

    ctx.run_parallel(move |worker: &mut Worker<'_>| {
        for vp in worker.thread_to_vps() {
            let vp = vp % num_vps;
            let local_targets = &targets_per_vp[vp];
            let mut emitted = 0u64;
            let mut attempts = 0u64;
            let max_attempts = counts[vp].saturating_mul(4).saturating_add(1_000);
            while emitted < counts[vp] {
                if local_targets.is_empty() || sources.is_empty() {
                    break;
                }
                attempts += 1;
                if attempts > max_attempts {
                    return Err(ConnectError::kernel_exception(
                        "fixed total number draw did not converge for this VP",
                    ));
                }
                let src = sources[worker.vp_rng.gen_range(0..sources.len())];
                let target = local_targets[worker.vp_rng.gen_range(0..local_targets.len())];
                if !opts.allow_autapses && src == target {
                    continue;
                }
                worker.single_connect(src, target)?;
                emitted += 1;
            }
        }
        Ok(())
    })
}
