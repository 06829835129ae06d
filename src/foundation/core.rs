use std::time::Duration;

use crate::foundation::error::{ReframeError, ReframeResult};

const NANOS_PER_SEC: u128 = 1_000_000_000;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl std::fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rational frame rate (`num / den` frames per second).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> ReframeResult<Self> {
        if den == 0 {
            return Err(ReframeError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ReframeError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// `floor(t * fps)`, exact on nanosecond input.
    pub fn time_to_frame_floor(self, t: Duration) -> u128 {
        t.as_nanos() * u128::from(self.num) / (u128::from(self.den) * NANOS_PER_SEC)
    }

    /// Presentation time of `frame`, rounded up to the next nanosecond.
    ///
    /// Rounding up keeps `time_to_frame_floor(frame_to_time(f)) == f` for every frame.
    pub fn frame_to_time(self, frame: FrameIndex) -> Duration {
        let num = u128::from(frame.0) * u128::from(self.den) * NANOS_PER_SEC;
        let den = u128::from(self.num);
        let nanos = num.div_ceil(den);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn scaled(self, factor: u32) -> Self {
        Self {
            width: self.width.saturating_mul(factor),
            height: self.height.saturating_mul(factor),
        }
    }

    pub fn rgba_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
