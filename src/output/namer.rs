use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use anyhow::Context as _;

use crate::{
    foundation::error::ReframeResult,
    render::executor::FrameBuffer,
    request::model::Mode,
    resolve::target::FrameAddress,
};

/// One written output file.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct OutputArtifact {
    pub path: PathBuf,
    pub address: FrameAddress,
    pub mode_suffix: String,
    /// `None` when the plain name was free, else the numeric suffix that was appended.
    pub disambiguator: Option<u32>,
}

/// `<base>_F<frame>_<mode>_<label>`, without extension.
pub fn artifact_stem(base: &str, address: &FrameAddress, mode: Mode) -> String {
    format!("{base}_F{}_{mode}_{}", address.index, address.label)
}

pub fn candidate_name(stem: &str, disambiguator: Option<u32>) -> String {
    match disambiguator {
        None => format!("{stem}.png"),
        Some(n) => format!("{stem}_{n}.png"),
    }
}

pub fn artifact_file_name(
    base: &str,
    address: &FrameAddress,
    mode: Mode,
    disambiguator: Option<u32>,
) -> String {
    candidate_name(&artifact_stem(base, address, mode), disambiguator)
}

/// Candidates in the order they are tried: the plain name, then `_0`, `_1`, ...
fn candidates(stem: &str) -> impl Iterator<Item = (String, Option<u32>)> + '_ {
    std::iter::once(None)
        .chain((0..=u32::MAX).map(Some))
        .map(move |n| (candidate_name(stem, n), n))
}

/// First candidate path for `stem` that does not exist in `dir`.
///
/// Only a snapshot; [`write_png_artifact`] claims names atomically at write time.
pub fn next_free_path(dir: &Path, stem: &str) -> (PathBuf, Option<u32>) {
    for (name, n) in candidates(stem) {
        let path = dir.join(name);
        if !path.exists() {
            return (path, n);
        }
    }
    // Every u32 suffix taken; unreachable on any real filesystem.
    (dir.join(candidate_name(stem, Some(u32::MAX))), Some(u32::MAX))
}

/// Encode `frame` as PNG and store it under the first free artifact name in `dir`.
///
/// The image is written to a hidden temp file first and then hard-linked to its final name.
/// Linking fails instead of overwriting, so concurrent writers never share a name and readers
/// never see a half-written PNG.
pub fn write_png_artifact(
    dir: &Path,
    base: &str,
    address: &FrameAddress,
    mode: Mode,
    frame: &FrameBuffer,
) -> ReframeResult<OutputArtifact> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;

    let stem = artifact_stem(base, address, mode);
    let tmp = TempFileGuard(dir.join(temp_name(&stem)));
    let tmp_path = tmp.0.as_path();

    image::save_buffer_with_format(
        tmp_path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", tmp_path.display()))?;

    for (name, disambiguator) in candidates(&stem) {
        let path = dir.join(name);
        match std::fs::hard_link(tmp_path, &path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), frame = %address.index, "wrote artifact");
                return Ok(OutputArtifact {
                    path,
                    address: address.clone(),
                    mode_suffix: mode.to_string(),
                    disambiguator,
                });
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("link artifact '{}'", path.display()))
                    .into());
            }
        }
    }

    Err(anyhow::anyhow!("no free artifact name left for '{stem}'").into())
}

fn temp_name(stem: &str) -> String {
    static SEQ: AtomicU64 = AtomicU64::new(0);
    format!(
        ".{stem}.{}.{}.tmp",
        std::process::id(),
        SEQ.fetch_add(1, Ordering::Relaxed)
    )
}

struct TempFileGuard(PathBuf);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/output/namer.rs"]
mod tests;
