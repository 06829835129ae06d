use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "reframe", version, about = "Still-frame extraction and reconstruction")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render frames and write PNG artifacts (requires `ffmpeg`/`ffprobe` on PATH).
    Extract(ExtractArgs),
    /// Resolve and print the extraction plan as JSON without rendering.
    Plan(PlanArgs),
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// Source video (.ISO, .VOB, .MKV, ...).
    #[arg(long)]
    input: PathBuf,

    /// Timestamp to extract (HH:MM:SS.mmm); mutually exclusive with --frame.
    #[arg(long, conflicts_with = "frame", required_unless_present = "frame")]
    time: Option<String>,

    /// Frame number to extract (0-based); mutually exclusive with --time.
    #[arg(long, allow_hyphen_values = true)]
    frame: Option<i64>,

    /// Number of frames to extract in sequence.
    #[arg(long, default_value_t = 1)]
    count: u32,

    /// Frame interval between extracted frames.
    #[arg(long, default_value_t = 1)]
    step: u32,

    /// Integer upscaling factor.
    #[arg(long, default_value_t = 1)]
    scale: u32,

    /// Scaling method: bicubic, lanczos or neural.
    #[arg(long, default_value = "bicubic")]
    resizer: reframe::Resizer,

    /// Skip deinterlacing for a quick content preview.
    #[arg(long)]
    fast: bool,

    /// composite, single, deinterlace-only or original.
    #[arg(long, default_value = "composite")]
    mode: reframe::Mode,

    /// none, light, medium or heavy.
    #[arg(long, default_value = "none")]
    denoise: reframe::DenoiseStrength,

    /// Denoise before (pre) or after (post) deinterlacing.
    #[arg(long, default_value = "pre")]
    denoise_stage: reframe::DenoiseStage,

    /// Stabilize the deinterlaced frame.
    #[arg(long)]
    stabilize: bool,

    /// top, bottom or auto (use the source's field order).
    #[arg(long, default_value = "auto")]
    field_order: reframe::FieldOrderOverride,

    /// JSON config file (controller and ffmpeg settings).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    #[command(flatten)]
    request: RequestArgs,

    /// Output directory (overrides the config file).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Worker threads for rendering frames in parallel.
    #[arg(long)]
    threads: Option<usize>,

    /// Render frames one at a time.
    #[arg(long)]
    sequential: bool,

    /// Caption each composite panel with its variant, resizer and scale.
    #[arg(long)]
    captions: bool,
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[command(flatten)]
    request: RequestArgs,

    /// Source metadata JSON to use instead of probing the input.
    #[arg(long)]
    metadata: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Extract(args) => cmd_extract(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

impl RequestArgs {
    fn to_request(&self) -> anyhow::Result<reframe::ExtractionRequest> {
        let target = match (self.frame, self.time.as_deref()) {
            (Some(_), Some(_)) => anyhow::bail!("--time and --frame are mutually exclusive"),
            (Some(f), None) => reframe::Target::FrameIndex(f),
            (None, Some(t)) => reframe::Target::Timestamp(reframe::parse_timestamp(t)?),
            (None, None) => anyhow::bail!("either --time or --frame is required"),
        };

        let mut req = reframe::ExtractionRequest::new(&self.input, target);
        req.count = self.count;
        req.step = self.step;
        req.scale = self.scale;
        req.resizer = self.resizer;
        req.fast = self.fast;
        req.mode = self.mode;
        req.denoise = self.denoise;
        req.denoise_stage = self.denoise_stage;
        req.stabilize = self.stabilize;
        req.field_order = self.field_order;
        req.validate()?;
        Ok(req)
    }

    fn load_config(&self) -> anyhow::Result<reframe::ReframeConfig> {
        match &self.config {
            Some(path) => Ok(reframe::ReframeConfig::from_json_file(path)?),
            None => Ok(reframe::ReframeConfig::default()),
        }
    }
}

fn read_metadata_json(path: &Path) -> anyhow::Result<reframe::SourceMetadata> {
    let f = File::open(path).with_context(|| format!("open metadata '{}'", path.display()))?;
    let meta: reframe::SourceMetadata =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse metadata JSON")?;
    meta.validate()?;
    Ok(meta)
}

fn cmd_extract(args: ExtractArgs) -> anyhow::Result<()> {
    let mut cfg = args.request.load_config()?;
    let rerun = reframe::RerunFlags {
        out: args.out.clone(),
        config: args.request.config.clone(),
    };
    if let Some(out) = args.out {
        cfg.controller.output_dir = out;
    }
    if args.threads.is_some() {
        cfg.controller.threads = args.threads;
    }
    if args.sequential {
        cfg.controller.parallel = false;
    }
    if args.captions {
        cfg.controller.captions = true;
    }

    let req = args.request.to_request()?;
    let meta = reframe::probe_source(&cfg.ffmpeg.ffprobe, &req.input)?;
    let controller = reframe::Controller::new(cfg.controller)?;
    let plan = controller.plan(&req, &meta)?;

    let executor = reframe::FfmpegExecutor::new(cfg.ffmpeg, &req.input, &meta)?;
    let artifacts = controller.execute(&plan, &executor)?;

    for artifact in &artifacts {
        eprintln!("wrote {}", artifact.path.display());
    }

    let followups = reframe::followup_commands(&req, plan.field_order, &rerun);
    if !followups.is_empty() {
        eprintln!();
        eprintln!("to extract a single panel on its own, run:");
        for (mode, cmd) in followups {
            eprintln!("  {:<17} {cmd}", mode.to_string());
        }
    }
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let cfg = args.request.load_config()?;
    let req = args.request.to_request()?;
    let meta = match &args.metadata {
        Some(path) => read_metadata_json(path)?,
        None => reframe::probe_source(&cfg.ffmpeg.ffprobe, &req.input)?,
    };

    let controller = reframe::Controller::new(cfg.controller)?;
    let plan = controller.plan(&req, &meta)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&plan).with_context(|| "serialize plan")?
    );
    Ok(())
}
