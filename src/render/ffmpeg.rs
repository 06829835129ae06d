use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::{
    foundation::{
        core::{Dimensions, FrameIndex},
        error::{ReframeError, ReframeResult},
    },
    plan::stage::{Stage, StageGraph},
    render::executor::{FrameBuffer, FrameExecutor},
    request::model::{DenoiseStrength, Resizer},
    source::metadata::{FieldOrder, SourceMetadata},
};

/// ffmpeg deinterlacing filter used for the `deinterlace` stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deinterlacer {
    #[default]
    Bwdif,
    Yadif,
}

impl Deinterlacer {
    pub fn filter_name(self) -> &'static str {
        match self {
            Self::Bwdif => "bwdif",
            Self::Yadif => "yadif",
        }
    }
}

/// Settings for the ffmpeg-backed capability.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FfmpegConfig {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
    pub deinterlacer: Deinterlacer,
    /// Model file for the `sr` filter; the neural resizer is unavailable without it.
    pub sr_model: Option<PathBuf>,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
            deinterlacer: Deinterlacer::default(),
            sr_model: None,
        }
    }
}

/// Renders stage graphs by running the system `ffmpeg` binary once per graph and frame.
///
/// Temporal filters run over the decoded stream and `select` picks the exact frame number
/// afterwards, so motion-adaptive deinterlacing and stabilization see real neighbours.
#[derive(Clone, Debug)]
pub struct FfmpegExecutor {
    cfg: FfmpegConfig,
    source: PathBuf,
    source_dims: Dimensions,
    filters: BTreeSet<String>,
}

impl FfmpegExecutor {
    /// Query the installed ffmpeg for its filter list and bind to `source`.
    pub fn new(
        cfg: FfmpegConfig,
        source: impl Into<PathBuf>,
        meta: &SourceMetadata,
    ) -> ReframeResult<Self> {
        let filters = list_filters(&cfg.ffmpeg)?;
        tracing::debug!(count = filters.len(), "ffmpeg filters available");
        Ok(Self::with_filters(cfg, source, meta, filters))
    }

    /// Bind to `source` with a known filter list.
    pub fn with_filters(
        cfg: FfmpegConfig,
        source: impl Into<PathBuf>,
        meta: &SourceMetadata,
        filters: BTreeSet<String>,
    ) -> Self {
        Self {
            cfg,
            source: source.into(),
            source_dims: meta.dimensions,
            filters,
        }
    }

    fn required_filters(&self, graph: &StageGraph) -> Vec<&'static str> {
        let mut out = vec!["select", "format"];
        for stage in graph.stages() {
            match stage {
                Stage::Decode => {}
                Stage::DenoisePre { .. } | Stage::DenoisePost { .. } => out.push("hqdn3d"),
                Stage::Deinterlace => out.push(self.cfg.deinterlacer.filter_name()),
                Stage::Stabilize => out.push("deshake"),
                Stage::Resize { algorithm, .. } => {
                    out.push("scale");
                    if *algorithm == Resizer::Neural {
                        out.push("sr");
                    }
                }
            }
        }
        out
    }

    /// The `-vf` argument for `graph` rendering source frame `frame`, optionally captioned.
    pub fn filter_chain(
        &self,
        graph: &StageGraph,
        frame: FrameIndex,
        field_order: Option<FieldOrder>,
        caption: Option<&str>,
    ) -> ReframeResult<String> {
        let mut chain: Vec<String> = Vec::new();
        let mut resize = None;

        for stage in graph.stages() {
            match *stage {
                Stage::Decode => {}
                Stage::DenoisePre { strength } | Stage::DenoisePost { strength } => {
                    chain.push(hqdn3d(strength)?.to_string());
                }
                Stage::Deinterlace => {
                    let parity = match field_order {
                        Some(FieldOrder::Top) => "tff",
                        Some(FieldOrder::Bottom) => "bff",
                        None => {
                            return Err(ReframeError::UnknownFieldOrder {
                                field: "field_order",
                            });
                        }
                    };
                    chain.push(format!(
                        "{}=mode=send_frame:parity={parity}:deint=all",
                        self.cfg.deinterlacer.filter_name()
                    ));
                }
                Stage::Stabilize => chain.push("deshake".to_string()),
                Stage::Resize { scale, algorithm } => resize = Some((scale, algorithm)),
            }
        }

        chain.push(format!("select=eq(n\\,{})", frame.0));

        if let Some((scale, algorithm)) = resize {
            let out = self.source_dims.scaled(scale);
            match algorithm {
                Resizer::Bicubic | Resizer::Lanczos => chain.push(format!(
                    "scale={}:{}:flags={}",
                    out.width,
                    out.height,
                    algorithm.as_str()
                )),
                Resizer::Neural => {
                    let model = self.sr_model()?;
                    chain.push(format!(
                        "sr=dnn_backend=tensorflow:scale_factor=2:model='{}'",
                        model.display()
                    ));
                    chain.push(format!(
                        "scale={}:{}:flags=bicubic",
                        out.width, out.height
                    ));
                }
            }
        }

        if let Some(text) = caption {
            let out = self.source_dims.scaled(graph.output_scale());
            chain.push(drawtext(text, out.height));
        }

        chain.push("format=rgba".to_string());
        Ok(chain.join(","))
    }

    fn sr_model(&self) -> ReframeResult<&Path> {
        self.cfg
            .sr_model
            .as_deref()
            .ok_or_else(|| ReframeError::capability("neural resizer needs ffmpeg.sr_model"))
    }
}

impl FrameExecutor for FfmpegExecutor {
    fn check(&self, graph: &StageGraph) -> ReframeResult<()> {
        for name in self.required_filters(graph) {
            if !self.filters.contains(name) {
                return Err(ReframeError::capability(format!(
                    "ffmpeg filter '{name}' (needed by {graph})"
                )));
            }
        }
        if graph
            .stages()
            .iter()
            .any(|s| matches!(s, Stage::Resize { algorithm: Resizer::Neural, .. }))
        {
            let model = self.sr_model()?;
            if !model.exists() {
                return Err(ReframeError::capability(format!(
                    "sr model '{}' not found",
                    model.display()
                )));
            }
        }
        Ok(())
    }

    fn check_captions(&self) -> ReframeResult<()> {
        if !self.filters.contains("drawtext") {
            return Err(ReframeError::capability(
                "ffmpeg filter 'drawtext' (needed for panel captions)",
            ));
        }
        Ok(())
    }

    fn render(
        &self,
        graph: &StageGraph,
        frame: FrameIndex,
        field_order: Option<FieldOrder>,
    ) -> ReframeResult<FrameBuffer> {
        self.run(graph, frame, field_order, None)
    }

    fn render_captioned(
        &self,
        graph: &StageGraph,
        frame: FrameIndex,
        field_order: Option<FieldOrder>,
        caption: &str,
    ) -> ReframeResult<FrameBuffer> {
        self.run(graph, frame, field_order, Some(caption))
    }
}

impl FfmpegExecutor {
    #[tracing::instrument(skip(self, graph), fields(graph = %graph))]
    fn run(
        &self,
        graph: &StageGraph,
        frame: FrameIndex,
        field_order: Option<FieldOrder>,
        caption: Option<&str>,
    ) -> ReframeResult<FrameBuffer> {
        let vf = self.filter_chain(graph, frame, field_order, caption)?;
        let out_dims = self.source_dims.scaled(graph.output_scale());

        let out = Command::new(&self.cfg.ffmpeg)
            .args(["-v", "error", "-nostdin", "-i"])
            .arg(&self.source)
            .args(["-an", "-sn", "-vf", &vf])
            .args([
                "-frames:v",
                "1",
                "-fps_mode",
                "passthrough",
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgba",
                "pipe:1",
            ])
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                ReframeError::capability(format!("ffmpeg ('{}'): {e}", self.cfg.ffmpeg.display()))
            })?;

        if !out.status.success() {
            return Err(ReframeError::Other(anyhow::anyhow!(
                "ffmpeg failed rendering frame {frame} of '{}': {}",
                self.source.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        let expected = out_dims.rgba_len();
        if out.stdout.len() != expected {
            return Err(ReframeError::Other(anyhow::anyhow!(
                "ffmpeg returned {} bytes for frame {frame}, expected {expected} ({}x{} rgba)",
                out.stdout.len(),
                out_dims.width,
                out_dims.height
            )));
        }
        FrameBuffer::new(out_dims.width, out_dims.height, out.stdout)
    }
}

fn hqdn3d(strength: DenoiseStrength) -> ReframeResult<&'static str> {
    match strength {
        DenoiseStrength::Light => Ok("hqdn3d=2:1.5:3:2.25"),
        DenoiseStrength::Medium => Ok("hqdn3d=4:3:6:4.5"),
        DenoiseStrength::Heavy => Ok("hqdn3d=8:6:12:9"),
        DenoiseStrength::None => Err(ReframeError::UnsupportedDenoiseLevel(
            "none (as a denoise stage)".to_string(),
        )),
    }
}

/// Caption box in the top-left corner, sized to the output height.
fn drawtext(text: &str, height: u32) -> String {
    let text: String = text
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || " ()-.".contains(*c))
        .collect();
    let size = (height / 24).max(12);
    format!(
        "drawtext=text='{text}':x={pad}:y={pad}:fontsize={size}:fontcolor=white:box=1:boxcolor=black@0.6:boxborderw={border}",
        pad = size / 2,
        border = size / 4
    )
}

/// Names of the filters the given ffmpeg binary was built with.
pub fn list_filters(ffmpeg: &Path) -> ReframeResult<BTreeSet<String>> {
    let out = Command::new(ffmpeg)
        .args(["-hide_banner", "-filters"])
        .stdin(Stdio::null())
        .output()
        .map_err(|e| ReframeError::capability(format!("ffmpeg ('{}'): {e}", ffmpeg.display())))?;
    if !out.status.success() {
        return Err(ReframeError::capability(format!(
            "ffmpeg ('{}') could not list filters",
            ffmpeg.display()
        )));
    }
    Ok(parse_filter_list(&String::from_utf8_lossy(&out.stdout)))
}

/// Parse `ffmpeg -filters` output; filter rows look like ` TSC bwdif  V->V  Deinterlace...`.
pub fn parse_filter_list(text: &str) -> BTreeSet<String> {
    text.lines()
        .filter_map(|line| {
            let mut cols = line.split_whitespace();
            let _flags = cols.next()?;
            let name = cols.next()?;
            let io = cols.next()?;
            io.contains("->").then(|| name.to_string())
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/render/ffmpeg.rs"]
mod tests;
