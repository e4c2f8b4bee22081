//! Pairwise connection rule: `sources[i] -> targets[i]`

use crate::builder::{BuildContext, BuildReport, Worker};
use crate::error::Result;

pub fn connect(ctx: &mut BuildContext<'_>) -> Result<BuildReport> {
    let opts = ctx.opts();
    let sources = ctx.sources().as_slice().to_vec();
    let targets = ctx.targets().as_slice().to_vec();

    ctx.run_parallel(move |worker: &mut Worker<'_>| {
        for (src, target) in sources.iter().copied().zip(targets.iter().copied()) {
            match worker.handle(target) {
                Ok(handle) if handle.is_local() => {
                    if !opts.allow_autapses && src == target {
                        worker.skip_conn_parameter(1);
                    } else {
                        worker.single_connect(src, target)?;
                    }
                }
                Ok(_) => worker.skip_conn_parameter(1),
                Err(err) => return Err(err),
            }
        }
        Ok(())
    })
}

pub fn disconnect(ctx: &mut BuildContext<'_>) -> Result<BuildReport> {
    let sources = ctx.sources().as_slice().to_vec();
    let targets = ctx.targets().as_slice().to_vec();

    ctx.run_parallel(move |worker: &mut Worker<'_>| {
        for (src, target) in sources.iter().copied().zip(targets.iter().copied()) {
            if let Ok(handle) = worker.handle(target) {
                if handle.is_local() {
                    worker.single_disconnect(src, target)?;
                }
            }
        }
        Ok(())
    })
}
