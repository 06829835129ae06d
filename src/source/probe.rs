use std::path::Path;

use crate::{
    foundation::error::{ReframeError, ReframeResult},
    source::metadata::SourceMetadata,
};

/// Read [`SourceMetadata`] for `source_path` with the given `ffprobe` binary.
#[tracing::instrument(skip(ffprobe))]
pub fn probe_source(ffprobe: &Path, source_path: &Path) -> ReframeResult<SourceMetadata> {
    if !source_path.exists() {
        return Err(ReframeError::probe(format!(
            "source '{}' not found",
            source_path.display()
        )));
    }

    let out = std::process::Command::new(ffprobe)
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| {
            ReframeError::capability(format!("ffprobe ('{}'): {e}", ffprobe.display()))
        })?;
    if !out.status.success() {
        return Err(ReframeError::probe(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let meta = SourceMetadata::from_ffprobe_json(&out.stdout)?;
    tracing::debug!(
        fps_num = meta.fps.num,
        fps_den = meta.fps.den,
        total_frames = meta.total_frames,
        field_order = ?meta.native_field_order,
        "probed source"
    );
    Ok(meta)
}
