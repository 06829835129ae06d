use crate::request::model::{DenoiseStrength, Resizer};

/// One processing step handed to the frame-processing capability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "stage", rename_all = "kebab-case")]
pub enum Stage {
    Decode,
    DenoisePre { strength: DenoiseStrength },
    Deinterlace,
    DenoisePost { strength: DenoiseStrength },
    Stabilize,
    Resize { scale: u32, algorithm: Resizer },
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Decode => "decode",
            Self::DenoisePre { .. } => "denoise-pre",
            Self::Deinterlace => "deinterlace",
            Self::DenoisePost { .. } => "denoise-post",
            Self::Stabilize => "stabilize",
            Self::Resize { .. } => "resize",
        }
    }

    /// Position in the fixed stage ordering.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            Self::Decode => 0,
            Self::DenoisePre { .. } => 1,
            Self::Deinterlace => 2,
            Self::DenoisePost { .. } => 3,
            Self::Stabilize => 4,
            Self::Resize { .. } => 5,
        }
    }
}

/// Ordered, stateless list of stages for one frame.
///
/// Stages form a strict dependency chain: each one consumes its predecessor's output.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct StageGraph {
    stages: Vec<Stage>,
}

impl StageGraph {
    pub(crate) fn from_ordered(stages: Vec<Stage>) -> Self {
        debug_assert!(stages.windows(2).all(|w| w[0].rank() < w[1].rank()));
        Self { stages }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.stages.iter().map(Stage::name).collect()
    }

    pub fn has_deinterlace(&self) -> bool {
        self.stages.contains(&Stage::Deinterlace)
    }

    /// Multiplier applied to the source dimensions by this graph.
    pub fn output_scale(&self) -> u32 {
        self.stages
            .iter()
            .find_map(|s| match s {
                Stage::Resize { scale, .. } => Some(*scale),
                _ => None,
            })
            .unwrap_or(1)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.name() == name)
    }
}

impl std::fmt::Display for StageGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.names().join(" -> "))
    }
}

/// Composite panel, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelLabel {
    Original,
    Deinterlaced,
    Denoised,
    Full,
}

impl PanelLabel {
    /// Left-to-right, top-to-bottom.
    pub const ORDER: [PanelLabel; 4] = [
        PanelLabel::Original,
        PanelLabel::Deinterlaced,
        PanelLabel::Denoised,
        PanelLabel::Full,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Deinterlaced => "deinterlaced",
            Self::Denoised => "denoised",
            Self::Full => "full",
        }
    }

    /// Caption burned into this panel, e.g. `Deinterlaced (lanczos 2x)`.
    pub fn caption(self, resizer: Resizer, scale: u32) -> String {
        let title = match self {
            Self::Original => "Original",
            Self::Deinterlaced => "Deinterlaced",
            Self::Denoised => "Denoised",
            Self::Full => "Full",
        };
        format!("{title} ({resizer} {scale}x)")
    }
}

impl std::fmt::Display for PanelLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Independently specified graphs for the four composite panels.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VariantSet {
    panels: Vec<(PanelLabel, StageGraph)>,
}

impl VariantSet {
    pub(crate) fn new(
        original: StageGraph,
        deinterlaced: StageGraph,
        denoised: StageGraph,
        full: StageGraph,
    ) -> Self {
        Self {
            panels: vec![
                (PanelLabel::Original, original),
                (PanelLabel::Deinterlaced, deinterlaced),
                (PanelLabel::Denoised, denoised),
                (PanelLabel::Full, full),
            ],
        }
    }

    pub fn panels(&self) -> &[(PanelLabel, StageGraph)] {
        &self.panels
    }

    pub fn get(&self, label: PanelLabel) -> Option<&StageGraph> {
        self.panels
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, g)| g)
    }
}

/// Output of the stage graph builder.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagePlan {
    Single(StageGraph),
    Composite(VariantSet),
}

impl StagePlan {
    /// Every graph in the plan, labelled with its panel when composite.
    pub fn graphs(&self) -> Vec<(Option<PanelLabel>, &StageGraph)> {
        match self {
            Self::Single(g) => vec![(None, g)],
            Self::Composite(v) => v.panels().iter().map(|(l, g)| (Some(*l), g)).collect(),
        }
    }
}
