use crate::{
    foundation::{
        core::{Dimensions, FrameIndex},
        error::{ReframeError, ReframeResult},
    },
    plan::stage::StageGraph,
    source::metadata::FieldOrder,
};

/// Straight-alpha RGBA8 pixels, rows top to bottom, no padding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> ReframeResult<Self> {
        let expected = Dimensions { width, height }.rgba_len();
        if data.len() != expected {
            return Err(ReframeError::validation(format!(
                "frame buffer has {} bytes, expected {expected} for {width}x{height} rgba8",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let len = Dimensions { width, height }.rgba_len();
        let mut data = Vec::with_capacity(len);
        for _ in 0..len / 4 {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }
}

/// The frame-processing capability: runs a stage graph over one source frame.
///
/// Implementations execute the stages strictly in graph order. They are shared across worker
/// threads, so rendering takes `&self`.
pub trait FrameExecutor: Send + Sync {
    /// Report primitives this graph needs that the capability lacks.
    ///
    /// Called for every graph before any frame renders.
    fn check(&self, _graph: &StageGraph) -> ReframeResult<()> {
        Ok(())
    }

    fn render(
        &self,
        graph: &StageGraph,
        frame: FrameIndex,
        field_order: Option<FieldOrder>,
    ) -> ReframeResult<FrameBuffer>;

    /// Report whether [`render_captioned`](Self::render_captioned) is available.
    fn check_captions(&self) -> ReframeResult<()> {
        Err(ReframeError::capability("panel captions"))
    }

    /// Render like [`render`](Self::render), with `caption` burned into the frame.
    fn render_captioned(
        &self,
        _graph: &StageGraph,
        _frame: FrameIndex,
        _field_order: Option<FieldOrder>,
        _caption: &str,
    ) -> ReframeResult<FrameBuffer> {
        Err(ReframeError::capability("panel captions"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/executor.rs"]
mod tests;
