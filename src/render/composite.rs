use image::{RgbaImage, imageops};

use crate::{
    foundation::error::{ReframeError, ReframeResult},
    plan::stage::PanelLabel,
    render::executor::FrameBuffer,
};

/// Tile the four composite panels into a 2x2 grid.
///
/// Panels must arrive in [`PanelLabel::ORDER`] and share one size. Mismatched panels are an
/// error and are never resampled.
pub fn assemble_composite(panels: &[(PanelLabel, FrameBuffer)]) -> ReframeResult<FrameBuffer> {
    if panels.len() != PanelLabel::ORDER.len() {
        return Err(ReframeError::validation(format!(
            "composite needs {} panels, got {}",
            PanelLabel::ORDER.len(),
            panels.len()
        )));
    }
    for ((label, _), expected) in panels.iter().zip(PanelLabel::ORDER) {
        if *label != expected {
            return Err(ReframeError::validation(format!(
                "composite panel '{label}' is out of order, expected '{expected}'"
            )));
        }
    }

    let (_, first) = &panels[0];
    let (w, h) = (first.width, first.height);
    for (label, fb) in &panels[1..] {
        if fb.width != w || fb.height != h {
            return Err(ReframeError::DimensionMismatch {
                panel: label.to_string(),
                expected_width: w,
                expected_height: h,
                found_width: fb.width,
                found_height: fb.height,
            });
        }
    }

    let out_w = w
        .checked_mul(2)
        .ok_or_else(|| ReframeError::validation("composite width overflows"))?;
    let out_h = h
        .checked_mul(2)
        .ok_or_else(|| ReframeError::validation("composite height overflows"))?;
    let mut canvas = RgbaImage::new(out_w, out_h);

    for (slot, (label, fb)) in panels.iter().enumerate() {
        let tile = RgbaImage::from_raw(fb.width, fb.height, fb.data.clone()).ok_or_else(|| {
            ReframeError::validation(format!("panel '{label}' buffer does not match its size"))
        })?;
        let x = i64::from(w) * (slot as i64 % 2);
        let y = i64::from(h) * (slot as i64 / 2);
        imageops::replace(&mut canvas, &tile, x, y);
    }

    FrameBuffer::new(out_w, out_h, canvas.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
