use crate::{
    foundation::{
        core::FrameIndex,
        error::{ReframeError, ReframeResult},
        timecode::format_label,
    },
    request::model::Target,
    source::metadata::SourceMetadata,
};

/// A resolved frame plus its `HH:MM:SS.mmm` label.
///
/// The label is always derived from the index, so a frame gets the same name whether it was
/// requested by number or by time.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameAddress {
    pub index: FrameIndex,
    pub label: String,
}

impl FrameAddress {
    pub fn new(index: FrameIndex, meta: &SourceMetadata) -> Self {
        Self {
            index,
            label: format_label(meta.fps.frame_to_time(index)),
        }
    }
}

/// Resolve `count` addresses starting at `target`, spaced by `step`.
///
/// The whole sequence is bounds-checked before anything is returned.
#[tracing::instrument(skip(meta), fields(total_frames = meta.total_frames))]
pub fn resolve_targets(
    target: Target,
    count: u32,
    step: u32,
    meta: &SourceMetadata,
) -> ReframeResult<Vec<FrameAddress>> {
    if count == 0 {
        return Err(ReframeError::validation("count must be >= 1"));
    }
    if step == 0 {
        return Err(ReframeError::validation("step must be >= 1"));
    }

    let base: i128 = match target {
        Target::FrameIndex(i) => i128::from(i),
        Target::Timestamp(t) => {
            i128::try_from(meta.fps.time_to_frame_floor(t)).unwrap_or(i128::MAX)
        }
    };

    let out_of_range = |index: i128| ReframeError::OutOfRange {
        field: "target",
        index,
        total_frames: meta.total_frames,
    };

    let total = i128::from(meta.total_frames);
    let last = base
        .checked_add(i128::from(count - 1) * i128::from(step))
        .ok_or_else(|| out_of_range(i128::MAX))?;
    // Indices are monotonic, so checking both ends covers the sequence.
    for idx in [base, last] {
        if idx < 0 || idx >= total {
            return Err(out_of_range(idx));
        }
    }

    let mut out = Vec::with_capacity(count as usize);
    for i in 0..u64::from(count) {
        let index = FrameIndex(base as u64 + i * u64::from(step));
        out.push(FrameAddress::new(index, meta));
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/target.rs"]
mod tests;
