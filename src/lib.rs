//! reframe plans and runs still-frame reconstruction from interlaced or noisy video.
//!
//! The crate owns the planning side of the problem. Pixel work (decode, deinterlace, denoise,
//! stabilize, resize) belongs to a [`FrameExecutor`]. [`FfmpegExecutor`] drives the system
//! `ffmpeg` binary; tests substitute their own executor.
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: `Target + count/step -> Vec<FrameAddress>`, bounds-checked up front
//! 2. **Field order**: explicit override, else the source's report, else an error when
//!    deinterlacing
//! 3. **Plan**: `GraphOptions -> StagePlan` (one graph, or four composite variants)
//! 4. **Render**: each graph through the executor, optionally frames in parallel
//! 5. **Assemble**: composite panels into a 2x2 tile
//! 6. **Write**: PNG under a collision-free `<base>_F<frame>_<mode>_<time>.png` name
//!
//! Steps 1 to 3 run for the whole batch before anything renders, so configuration errors
//! never waste rendering work.
#![forbid(unsafe_code)]

mod foundation;
mod output;
mod pipeline;
mod plan;
mod render;
mod request;
mod resolve;
mod source;

pub use foundation::core::{Dimensions, Fps, FrameIndex};
pub use foundation::error::{ReframeError, ReframeResult};
pub use foundation::timecode::{format_label, format_timestamp, parse_timestamp};
pub use output::namer::{
    OutputArtifact, artifact_file_name, artifact_stem, candidate_name, next_free_path,
    write_png_artifact,
};
pub use pipeline::config::{ControllerConfig, ReframeConfig};
pub use pipeline::controller::{Controller, ExtractionPlan};
pub use pipeline::followup::{RerunFlags, followup_commands};
pub use plan::builder::build_stage_plan;
pub use plan::stage::{PanelLabel, Stage, StageGraph, StagePlan, VariantSet};
pub use render::composite::assemble_composite;
pub use render::executor::{FrameBuffer, FrameExecutor};
pub use render::ffmpeg::{
    Deinterlacer, FfmpegConfig, FfmpegExecutor, list_filters, parse_filter_list,
};
pub use request::model::{
    DenoiseStage, DenoiseStrength, ExtractionRequest, FieldOrderOverride, GraphOptions, Mode,
    Resizer, Target,
};
pub use resolve::field_order::resolve_field_order;
pub use resolve::target::{FrameAddress, resolve_targets};
pub use source::metadata::{FieldOrder, SourceMetadata};
pub use source::probe::probe_source;
