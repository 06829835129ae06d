use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    foundation::error::{ReframeError, ReframeResult},
    render::ffmpeg::FfmpegConfig,
};

/// Immutable settings a [`Controller`](crate::Controller) is constructed with.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Directory artifacts are written to; created if absent.
    pub output_dir: PathBuf,
    /// Render the frames of a batch on a thread pool.
    pub parallel: bool,
    /// Pool size; `None` uses rayon's default (available parallelism).
    pub threads: Option<usize>,
    /// Burn a caption naming each composite panel into its tile.
    pub captions: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            parallel: true,
            threads: None,
            captions: false,
        }
    }
}

impl ControllerConfig {
    pub fn validate(&self) -> ReframeResult<()> {
        if self.threads == Some(0) {
            return Err(ReframeError::validation(
                "controller 'threads' must be >= 1 when set",
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ReframeError::validation("output_dir must be non-empty"));
        }
        Ok(())
    }
}

/// Everything a front end reads from a `--config` JSON file.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ReframeConfig {
    pub controller: ControllerConfig,
    pub ffmpeg: FfmpegConfig,
}

impl ReframeConfig {
    pub fn from_json_file(path: &Path) -> ReframeResult<Self> {
        let f = std::fs::File::open(path)
            .with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(std::io::BufReader::new(f))
            .map_err(|e| ReframeError::validation(format!("config '{}': {e}", path.display())))?;
        cfg.controller.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/config.rs"]
mod tests;
