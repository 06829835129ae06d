use crate::foundation::{
    core::{Dimensions, Fps},
    error::{ReframeError, ReframeResult},
};

/// Which field of an interlaced frame is displayed first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldOrder {
    Top,
    Bottom,
}

impl FieldOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

impl std::fmt::Display for FieldOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facts about the source read once per request.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SourceMetadata {
    pub fps: Fps,
    pub total_frames: u64,
    #[serde(default)]
    pub native_field_order: Option<FieldOrder>,
    pub dimensions: Dimensions,
}

impl SourceMetadata {
    pub fn validate(&self) -> ReframeResult<()> {
        Fps::new(self.fps.num, self.fps.den)?;
        if self.dimensions.width == 0 || self.dimensions.height == 0 {
            return Err(ReframeError::validation(
                "source width/height must be non-zero",
            ));
        }
        Ok(())
    }

    /// Build metadata from `ffprobe -print_format json -show_streams -show_format` output.
    pub fn from_ffprobe_json(bytes: &[u8]) -> ReframeResult<Self> {
        #[derive(serde::Deserialize)]
        struct ProbeStream {
            codec_type: Option<String>,
            width: Option<u32>,
            height: Option<u32>,
            r_frame_rate: Option<String>,
            nb_frames: Option<String>,
            field_order: Option<String>,
            duration: Option<String>,
        }
        #[derive(serde::Deserialize)]
        struct ProbeFormat {
            duration: Option<String>,
        }
        #[derive(serde::Deserialize)]
        struct ProbeOut {
            streams: Vec<ProbeStream>,
            format: Option<ProbeFormat>,
        }

        let parsed: ProbeOut = serde_json::from_slice(bytes)
            .map_err(|e| ReframeError::probe(format!("ffprobe json parse failed: {e}")))?;
        let video = parsed
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .ok_or_else(|| ReframeError::probe("no video stream found"))?;

        let width = video
            .width
            .ok_or_else(|| ReframeError::probe("missing video width from ffprobe"))?;
        let height = video
            .height
            .ok_or_else(|| ReframeError::probe("missing video height from ffprobe"))?;
        let (num, den) = parse_ff_ratio(video.r_frame_rate.as_deref().unwrap_or("0/1"))
            .ok_or_else(|| ReframeError::probe("invalid video r_frame_rate"))?;
        let fps = Fps::new(num, den)
            .map_err(|e| ReframeError::probe(format!("unusable frame rate {num}/{den}: {e}")))?;

        let total_frames = match video.nb_frames.as_deref().and_then(|s| s.parse::<u64>().ok()) {
            Some(n) if n > 0 => n,
            _ => {
                let duration = video
                    .duration
                    .as_deref()
                    .or_else(|| parsed.format.as_ref().and_then(|f| f.duration.as_deref()))
                    .and_then(|s| s.parse::<f64>().ok())
                    .filter(|d| d.is_finite() && *d > 0.0)
                    .ok_or_else(|| {
                        ReframeError::probe("source reports neither frame count nor duration")
                    })?;
                (duration * fps.as_f64()).floor() as u64
            }
        };

        Ok(Self {
            fps,
            total_frames,
            native_field_order: video.field_order.as_deref().and_then(parse_ff_field_order),
            dimensions: Dimensions { width, height },
        })
    }
}

/// Map ffprobe's `field_order` to the field displayed first.
///
/// `tb`/`bt` name the coded field first and the displayed field second.
fn parse_ff_field_order(s: &str) -> Option<FieldOrder> {
    match s {
        "tt" | "bt" => Some(FieldOrder::Top),
        "bb" | "tb" => Some(FieldOrder::Bottom),
        _ => None,
    }
}

fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let (a, b) = s.split_once('/')?;
    let num = a.trim().parse::<u32>().ok()?;
    let den = b.trim().parse::<u32>().ok()?;
    if num == 0 || den == 0 {
        return None;
    }
    Some((num, den))
}

#[cfg(test)]
#[path = "../../tests/unit/source/metadata.rs"]
mod tests;
