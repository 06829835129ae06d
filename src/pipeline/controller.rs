use rayon::prelude::*;

use crate::{
    foundation::error::{ReframeError, ReframeResult},
    output::namer::{OutputArtifact, write_png_artifact},
    pipeline::config::ControllerConfig,
    plan::{
        builder::build_stage_plan,
        stage::{PanelLabel, StagePlan},
    },
    render::{
        composite::assemble_composite,
        executor::{FrameBuffer, FrameExecutor},
    },
    request::model::{ExtractionRequest, Mode},
    resolve::{
        field_order::resolve_field_order,
        target::{FrameAddress, resolve_targets},
    },
    source::metadata::{FieldOrder, SourceMetadata},
};

/// Fully validated work for one request: what to render and how.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ExtractionPlan {
    pub base_name: String,
    pub mode: Mode,
    pub addresses: Vec<FrameAddress>,
    pub field_order: Option<FieldOrder>,
    pub stages: StagePlan,
    /// Per-panel captions; empty unless captions are enabled for a composite.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub captions: Vec<(PanelLabel, String)>,
}

/// Drives a request from validation to written artifacts.
#[derive(Clone, Debug)]
pub struct Controller {
    config: ControllerConfig,
}

impl Controller {
    pub fn new(config: ControllerConfig) -> ReframeResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Resolve targets, field order and stage graphs for the whole batch.
    ///
    /// Nothing is rendered; any configuration error surfaces here.
    #[tracing::instrument(skip(self, req, meta), fields(input = %req.input.display(), mode = %req.mode))]
    pub fn plan(
        &self,
        req: &ExtractionRequest,
        meta: &SourceMetadata,
    ) -> ReframeResult<ExtractionPlan> {
        req.validate()?;
        meta.validate()?;

        let addresses = resolve_targets(req.target, req.count, req.step, meta)?;
        let opts = req.graph_options();
        let field_order = resolve_field_order(
            meta.native_field_order,
            req.field_order,
            opts.needs_deinterlace(),
        )?;
        let stages = build_stage_plan(&opts, field_order)?;

        let captions = match &stages {
            StagePlan::Composite(variants) if self.config.captions => variants
                .panels()
                .iter()
                .map(|(label, _)| (*label, label.caption(req.resizer, req.scale)))
                .collect(),
            _ => Vec::new(),
        };

        tracing::debug!(
            frames = addresses.len(),
            first = %addresses[0].index,
            ?field_order,
            "planned extraction"
        );

        Ok(ExtractionPlan {
            base_name: req.base_name(),
            mode: req.mode,
            addresses,
            field_order,
            stages,
            captions,
        })
    }

    /// Plan and execute `req`, returning artifacts in frame order.
    pub fn run(
        &self,
        req: ExtractionRequest,
        meta: &SourceMetadata,
        executor: &dyn FrameExecutor,
    ) -> ReframeResult<Vec<OutputArtifact>> {
        let plan = self.plan(&req, meta)?;
        self.execute(&plan, executor)
    }

    /// Render and write every frame of `plan`.
    ///
    /// The executor vets every graph before the first frame renders. The batch stops at the
    /// first failure; artifacts written before it stay complete and valid.
    pub fn execute(
        &self,
        plan: &ExtractionPlan,
        executor: &dyn FrameExecutor,
    ) -> ReframeResult<Vec<OutputArtifact>> {
        for (_, graph) in plan.stages.graphs() {
            executor.check(graph)?;
        }
        if !plan.captions.is_empty() {
            executor.check_captions()?;
        }

        let render_one = |addr: &FrameAddress| render_address(&self.config, plan, addr, executor);

        if !self.config.parallel || plan.addresses.len() < 2 {
            return plan.addresses.iter().map(render_one).collect();
        }

        let pool = build_thread_pool(self.config.threads)?;
        pool.install(|| plan.addresses.par_iter().map(render_one).collect())
    }
}

fn render_address(
    config: &ControllerConfig,
    plan: &ExtractionPlan,
    addr: &FrameAddress,
    executor: &dyn FrameExecutor,
) -> ReframeResult<OutputArtifact> {
    let frame = match &plan.stages {
        StagePlan::Single(graph) => executor.render(graph, addr.index, plan.field_order)?,
        StagePlan::Composite(variants) => {
            let mut panels: Vec<(PanelLabel, FrameBuffer)> =
                Vec::with_capacity(variants.panels().len());
            for (label, graph) in variants.panels() {
                let caption = plan
                    .captions
                    .iter()
                    .find(|(l, _)| l == label)
                    .map(|(_, text)| text.as_str());
                let fb = match caption {
                    Some(text) => {
                        executor.render_captioned(graph, addr.index, plan.field_order, text)?
                    }
                    None => executor.render(graph, addr.index, plan.field_order)?,
                };
                panels.push((*label, fb));
            }
            assemble_composite(&panels)?
        }
    };

    write_png_artifact(
        &config.output_dir,
        &plan.base_name,
        addr,
        plan.mode,
        &frame,
    )
}

fn build_thread_pool(threads: Option<usize>) -> ReframeResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ReframeError::validation(
            "controller 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReframeError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/controller.rs"]
mod tests;
