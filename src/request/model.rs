use std::{path::PathBuf, str::FromStr, time::Duration};

use crate::foundation::error::{ReframeError, ReframeResult};

/// Keyword-backed enum: `FromStr`, `Display`, and serde through the keyword string, so that
/// JSON requests surface the same typed errors as parsed command-line values.
macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $name:ident, unsupported = $err:expr, {
            $($(#[$vmeta:meta])* $variant:ident => $kw:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $kw),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ReframeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($kw => Ok($name::$variant),)+
                    _ => Err(($err)(s)),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = ReframeError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> String {
                v.as_str().to_string()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

keyword_enum!(
    /// Output mode of an extraction.
    Mode, unsupported = |s: &str| ReframeError::validation(format!(
        "unsupported mode '{s}' (expected composite, single, deinterlace-only or original)"
    )), {
        /// 2x2 comparison of four pipeline variants.
        Composite => "composite",
        /// The full production chain.
        Single => "single",
        DeinterlaceOnly => "deinterlace-only",
        /// Untouched source frame (optionally resized).
        Original => "original",
    }
);

keyword_enum!(
    /// Spatial upscaling algorithm.
    Resizer, unsupported = |s: &str| ReframeError::UnsupportedResizer(s.to_string()), {
        Bicubic => "bicubic",
        Lanczos => "lanczos",
        /// Neural super-resolution doubling, finished with an exact bicubic pass.
        Neural => "neural",
    }
);

keyword_enum!(
    DenoiseStrength, unsupported = |s: &str| ReframeError::UnsupportedDenoiseLevel(s.to_string()), {
        None => "none",
        Light => "light",
        Medium => "medium",
        Heavy => "heavy",
    }
);

keyword_enum!(
    /// Where denoising runs relative to deinterlacing.
    DenoiseStage, unsupported = |s: &str| ReframeError::validation(format!(
        "unsupported denoise stage '{s}' (expected pre or post)"
    )), {
        Pre => "pre",
        Post => "post",
    }
);

keyword_enum!(
    /// Explicit field order requested by the user.
    FieldOrderOverride, unsupported = |s: &str| ReframeError::validation(format!(
        "unsupported field order '{s}' (expected top, bottom or auto)"
    )), {
        Top => "top",
        Bottom => "bottom",
        /// Use whatever the source reports.
        Auto => "auto",
    }
);

/// Where in the source the extraction starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Zero-based frame number. Negative values are rejected at resolution time.
    FrameIndex(i64),
    /// Presentation time from the start of the source.
    Timestamp(Duration),
}

/// A fully parsed extraction request, as handed over by a front end.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExtractionRequest {
    pub input: PathBuf,
    pub target: Target,
    #[serde(default = "one")]
    pub count: u32,
    #[serde(default = "one")]
    pub step: u32,
    #[serde(default = "one")]
    pub scale: u32,
    #[serde(default = "default_resizer")]
    pub resizer: Resizer,
    #[serde(default)]
    pub fast: bool,
    #[serde(default = "default_mode")]
    pub mode: Mode,
    #[serde(default = "default_denoise")]
    pub denoise: DenoiseStrength,
    #[serde(default = "default_denoise_stage")]
    pub denoise_stage: DenoiseStage,
    #[serde(default)]
    pub stabilize: bool,
    #[serde(default = "default_field_order")]
    pub field_order: FieldOrderOverride,
}

fn one() -> u32 {
    1
}

fn default_resizer() -> Resizer {
    Resizer::Bicubic
}

fn default_mode() -> Mode {
    Mode::Composite
}

fn default_denoise() -> DenoiseStrength {
    DenoiseStrength::None
}

fn default_denoise_stage() -> DenoiseStage {
    DenoiseStage::Pre
}

fn default_field_order() -> FieldOrderOverride {
    FieldOrderOverride::Auto
}

impl ExtractionRequest {
    /// Request with every optional knob at its default.
    pub fn new(input: impl Into<PathBuf>, target: Target) -> Self {
        Self {
            input: input.into(),
            target,
            count: 1,
            step: 1,
            scale: 1,
            resizer: default_resizer(),
            fast: false,
            mode: default_mode(),
            denoise: default_denoise(),
            denoise_stage: default_denoise_stage(),
            stabilize: false,
            field_order: default_field_order(),
        }
    }

    pub fn validate(&self) -> ReframeResult<()> {
        if self.count == 0 {
            return Err(ReframeError::validation("count must be >= 1"));
        }
        if self.step == 0 {
            return Err(ReframeError::validation("step must be >= 1"));
        }
        if self.scale == 0 {
            return Err(ReframeError::validation("scale must be >= 1"));
        }
        if self.input.as_os_str().is_empty() {
            return Err(ReframeError::validation("input path must be non-empty"));
        }
        Ok(())
    }

    /// Everything the stage graph builder looks at.
    pub fn graph_options(&self) -> GraphOptions {
        GraphOptions {
            mode: self.mode,
            scale: self.scale,
            resizer: self.resizer,
            fast: self.fast,
            denoise: self.denoise,
            denoise_stage: self.denoise_stage,
            stabilize: self.stabilize,
        }
    }

    /// File stem of the input, used as the artifact base name.
    pub fn base_name(&self) -> String {
        self.input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "frame".to_string())
    }
}

/// The part of a request that determines stage graphs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GraphOptions {
    pub mode: Mode,
    pub scale: u32,
    pub resizer: Resizer,
    pub fast: bool,
    pub denoise: DenoiseStrength,
    pub denoise_stage: DenoiseStage,
    pub stabilize: bool,
}

impl GraphOptions {
    /// Whether the built graphs will contain a deinterlace stage.
    pub fn needs_deinterlace(&self) -> bool {
        self.mode != Mode::Original && !self.fast
    }
}

#[cfg(test)]
#[path = "../../tests/unit/request/model.rs"]
mod tests;
