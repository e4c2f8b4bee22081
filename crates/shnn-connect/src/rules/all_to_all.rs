//! Every source connected to every target

use crate::builder::{BuildContext, BuildReport, Worker};
use crate::error::Result;

pub fn connect(ctx: &mut BuildContext<'_>) -> Result<BuildReport> {
    let opts = ctx.opts();
    let sources = ctx.sources().as_slice().to_vec();
    let targets = ctx.targets().as_slice().to_vec();
    let num_sources = sources.len();

    ctx.run_parallel(move |worker: &mut Worker<'_>| {
        for &target in &targets {
            match worker.handle(target) {
                Ok(handle) if handle.is_local() => {
                    for &src in &sources {
                        if !opts.allow_autapses && src == target {
                            worker.skip_conn_parameter(1);
                        } else {
                            worker.single_connect(src, target)?;
                        }
                    }
                }
                Ok(_) => worker.skip_conn_parameter(num_sources),
                Err(err) => return Err(err),
            }
        }
        Ok(())
    })
}
