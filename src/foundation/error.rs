/// Convenience result type used across reframe.
pub type ReframeResult<T> = Result<T, ReframeError>;

/// Top-level error taxonomy used by controller APIs.
///
/// Request-related variants carry the name of the offending request field so front ends can
/// point at the exact option that caused the failure.
#[derive(thiserror::Error, Debug)]
pub enum ReframeError {
    /// A resolved frame index falls outside `[0, total_frames)`.
    #[error("out of range: {field} resolves to frame {index}, source has {total_frames} frames")]
    OutOfRange {
        field: &'static str,
        index: i128,
        total_frames: u64,
    },

    /// Deinterlacing is required but no field order could be determined.
    #[error(
        "unknown field order: {field} is 'auto' and the source does not report one; pass top or bottom explicitly"
    )]
    UnknownFieldOrder { field: &'static str },

    /// A flag combination the pipeline semantics forbid.
    #[error("invalid combination: {field}: {reason}")]
    InvalidCombination {
        field: &'static str,
        reason: String,
    },

    /// Resizer name outside `bicubic|lanczos|neural`.
    #[error("unsupported resizer '{0}' (expected bicubic, lanczos or neural)")]
    UnsupportedResizer(String),

    /// Denoise level outside `none|light|medium|heavy`.
    #[error("unsupported denoise level '{0}' (expected none, light, medium or heavy)")]
    UnsupportedDenoiseLevel(String),

    /// The frame-processing capability is missing a primitive a graph needs.
    #[error("capability unavailable: {primitive}")]
    CapabilityUnavailable { primitive: String },

    /// Composite panels differ in size.
    #[error(
        "dimension mismatch: panel '{panel}' is {found_width}x{found_height}, expected {expected_width}x{expected_height}"
    )]
    DimensionMismatch {
        panel: String,
        expected_width: u32,
        expected_height: u32,
        found_width: u32,
        found_height: u32,
    },

    /// Invalid user-provided request or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Source metadata could not be read.
    #[error("probe error: {0}")]
    Probe(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReframeError {
    /// Build a [`ReframeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReframeError::Probe`] value.
    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe(msg.into())
    }

    /// Build a [`ReframeError::InvalidCombination`] value.
    pub fn invalid_combination(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidCombination {
            field,
            reason: reason.into(),
        }
    }

    /// Build a [`ReframeError::CapabilityUnavailable`] value.
    pub fn capability(primitive: impl Into<String>) -> Self {
        Self::CapabilityUnavailable {
            primitive: primitive.into(),
        }
    }

    /// Request field this error is attributed to, when there is one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::OutOfRange { field, .. }
            | Self::UnknownFieldOrder { field }
            | Self::InvalidCombination { field, .. } => Some(*field),
            Self::UnsupportedResizer(_) => Some("resizer"),
            Self::UnsupportedDenoiseLevel(_) => Some("denoise"),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
