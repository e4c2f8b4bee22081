//! Structural-plasticity connect/disconnect entry points: pair lists are
//! supplied externally each cycle rather than generated by a rule.

use crate::builder::{BuildContext, BuildReport, Worker};
use crate::error::{ConnectError, Result};
use crate::node_collection::NodeId;

pub fn sp_connect(ctx: &mut BuildContext<'_>, sources: &[NodeId], targets: &[NodeId]) -> Result<BuildReport> {
    run(ctx, sources, targets, 1, false)
}

pub fn sp_disconnect(ctx: &mut BuildContext<'_>, sources: &[NodeId], targets: &[NodeId]) -> Result<BuildReport> {
    run(ctx, sources, targets, -1, true)
}

fn run(ctx: &mut BuildContext<'_>, sources: &[NodeId], targets: &[NodeId], delta: i64, disconnecting: bool) -> Result<BuildReport> {
    if sources.len() != targets.len() {
        return Err(ConnectError::dimension_mismatch(sources.len(), targets.len()));
    }
    let opts = ctx.opts();
    let pairs: Vec<(NodeId, NodeId)> = sources.iter().copied().zip(targets.iter().copied()).collect();

    ctx.run_parallel(move |worker: &mut Worker<'_>| {
        for &(src, target) in &pairs {
            if !opts.allow_autapses && src == target {
                worker.skip_conn_parameter(1);
                continue;
            }
            let local = worker.change_connected_synaptic_elements(src, target, delta);
            if !local {
                worker.skip_conn_parameter(1);
                continue;
            }
            if disconnecting {
                worker.single_disconnect(src, target)?;
            } else {
                worker.single_connect(src, target)?;
            }
        }
        Ok(())
    })
}
