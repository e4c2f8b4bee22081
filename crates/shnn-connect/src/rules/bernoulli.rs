//! Independent Bernoulli trial per (source, target) pair

use rand::Rng;

use crate::builder::{BuildContext, BuildReport, Worker};
use crate::error::Result;
use crate::parameter::ParamSpec;

use super::probability_value;

pub fn connect(ctx: &mut BuildContext<'_>, p: &ParamSpec) -> Result<BuildReport> {
    let opts = ctx.opts();
    let sources = ctx.sources().as_slice().to_vec();
    let targets = ctx.targets().as_slice().to_vec();
    let p = p.clone();
    let num_sources = sources.len();

    ctx.run_parallel(move |worker: &mut Worker<'_>| {
        for (target_idx, &target) in targets.iter().enumerate() {
            match worker.handle(target) {
                Ok(handle) if handle.is_local() => {
                    let prob = probability_value(&p, target_idx)?;
                    for &src in &sources {
                        if !opts.allow_autapses && src == target {
                            worker.skip_conn_parameter(1);
                            continue;
                        }
                        if worker.vp_rng.gen::<f64>() < prob {
                            worker.single_connect(src, target)?;
                        } else {
                            worker.skip_conn_parameter(1);
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
