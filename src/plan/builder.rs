use crate::{
    foundation::error::{ReframeError, ReframeResult},
    plan::stage::{Stage, StageGraph, StagePlan, VariantSet},
    request::model::{DenoiseStage, DenoiseStrength, GraphOptions, Mode},
    source::metadata::FieldOrder,
};

/// Which optional steps a graph asks for, before `fast` and ordering are applied.
#[derive(Clone, Copy, Debug, Default)]
struct ChainSpec {
    deinterlace: bool,
    denoise: bool,
    stabilize: bool,
}

/// Build the stage plan for one request.
///
/// Stages always follow `decode -> denoise-pre -> deinterlace -> denoise-post -> stabilize ->
/// resize`; only the selection varies with mode and flags.
#[tracing::instrument]
pub fn build_stage_plan(
    opts: &GraphOptions,
    field_order: Option<FieldOrder>,
) -> ReframeResult<StagePlan> {
    if opts.scale == 0 {
        return Err(ReframeError::validation("scale must be >= 1"));
    }

    let full_chain = ChainSpec {
        deinterlace: true,
        denoise: true,
        stabilize: opts.stabilize,
    };

    let plan = match opts.mode {
        Mode::Original => {
            reject_stabilize(opts, "original mode never deinterlaces")?;
            warn_ignored_denoise(opts);
            StagePlan::Single(assemble(opts, ChainSpec::default())?)
        }
        Mode::DeinterlaceOnly => {
            reject_stabilize(opts, "deinterlace-only mode runs no stabilization")?;
            warn_ignored_denoise(opts);
            StagePlan::Single(assemble(
                opts,
                ChainSpec {
                    deinterlace: true,
                    ..ChainSpec::default()
                },
            )?)
        }
        Mode::Single => StagePlan::Single(assemble(opts, full_chain)?),
        Mode::Composite => StagePlan::Composite(VariantSet::new(
            assemble(opts, ChainSpec::default())?,
            assemble(
                opts,
                ChainSpec {
                    deinterlace: true,
                    ..ChainSpec::default()
                },
            )?,
            assemble(
                opts,
                ChainSpec {
                    deinterlace: true,
                    denoise: true,
                    stabilize: false,
                },
            )?,
            assemble(opts, full_chain)?,
        )),
    };

    if field_order.is_none() && plan.graphs().iter().any(|(_, g)| g.has_deinterlace()) {
        return Err(ReframeError::UnknownFieldOrder {
            field: "field_order",
        });
    }

    tracing::debug!(?plan, "built stage plan");
    Ok(plan)
}

fn assemble(opts: &GraphOptions, chain: ChainSpec) -> ReframeResult<StageGraph> {
    let deinterlace = chain.deinterlace && !opts.fast;
    if chain.stabilize && !deinterlace {
        return Err(ReframeError::invalid_combination(
            "stabilize",
            "stabilization needs a deinterlaced frame, but fast mode drops deinterlacing",
        ));
    }

    let denoise = match opts.denoise {
        DenoiseStrength::None => None,
        strength if chain.denoise => Some((strength, opts.denoise_stage)),
        _ => None,
    };

    let mut stages = vec![Stage::Decode];
    if let Some((strength, DenoiseStage::Pre)) = denoise {
        stages.push(Stage::DenoisePre { strength });
    }
    if deinterlace {
        stages.push(Stage::Deinterlace);
    }
    if let Some((strength, DenoiseStage::Post)) = denoise {
        stages.push(Stage::DenoisePost { strength });
    }
    if chain.stabilize {
        stages.push(Stage::Stabilize);
    }
    if opts.scale > 1 {
        stages.push(Stage::Resize {
            scale: opts.scale,
            algorithm: opts.resizer,
        });
    }
    Ok(StageGraph::from_ordered(stages))
}

fn reject_stabilize(opts: &GraphOptions, reason: &str) -> ReframeResult<()> {
    if opts.stabilize {
        return Err(ReframeError::invalid_combination("stabilize", reason));
    }
    Ok(())
}

fn warn_ignored_denoise(opts: &GraphOptions) {
    if opts.denoise != DenoiseStrength::None {
        tracing::warn!(
            mode = %opts.mode,
            denoise = %opts.denoise,
            "denoise is not part of this mode's pipeline; ignoring"
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/builder.rs"]
mod tests;
