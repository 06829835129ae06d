use std::path::{Path, PathBuf};

use crate::{
    foundation::timecode::format_timestamp,
    request::model::{DenoiseStrength, ExtractionRequest, Mode, Target},
    source::metadata::FieldOrder,
};

/// Front-end flags a re-run repeats verbatim when the original run was given them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RerunFlags {
    pub out: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Commands that re-extract a single panel of a composite run on its own.
///
/// Each command pins the field order the composite actually used, so the standalone render
/// matches its panel. Returns nothing for non-composite requests.
pub fn followup_commands(
    req: &ExtractionRequest,
    field_order: Option<FieldOrder>,
    flags: &RerunFlags,
) -> Vec<(Mode, String)> {
    if req.mode != Mode::Composite {
        return Vec::new();
    }

    [Mode::Original, Mode::DeinterlaceOnly, Mode::Single]
        .into_iter()
        .map(|mode| (mode, command_for(req, mode, field_order, flags)))
        .collect()
}

fn command_for(
    req: &ExtractionRequest,
    mode: Mode,
    field_order: Option<FieldOrder>,
    flags: &RerunFlags,
) -> String {
    let mut args: Vec<String> = vec![
        "reframe".into(),
        "extract".into(),
        "--input".into(),
        quoted(&req.input),
    ];

    match req.target {
        Target::FrameIndex(i) => args.extend(["--frame".into(), i.to_string()]),
        Target::Timestamp(t) => args.extend(["--time".into(), format_timestamp(t)]),
    }
    if req.count != 1 {
        args.extend(["--count".into(), req.count.to_string()]);
    }
    if req.step != 1 {
        args.extend(["--step".into(), req.step.to_string()]);
    }
    if req.scale != 1 {
        args.extend([
            "--scale".into(),
            req.scale.to_string(),
            "--resizer".into(),
            req.resizer.to_string(),
        ]);
    }
    if req.fast {
        args.push("--fast".into());
    }
    args.extend(["--mode".into(), mode.to_string()]);

    if mode == Mode::Single {
        if req.denoise != DenoiseStrength::None {
            args.extend([
                "--denoise".into(),
                req.denoise.to_string(),
                "--denoise-stage".into(),
                req.denoise_stage.to_string(),
            ]);
        }
        if req.stabilize {
            args.push("--stabilize".into());
        }
    }
    if mode != Mode::Original
        && let Some(order) = field_order
    {
        args.extend(["--field-order".into(), order.to_string()]);
    }
    if let Some(out) = &flags.out {
        args.extend(["--out".into(), quoted(out)]);
    }
    if let Some(config) = &flags.config {
        args.extend(["--config".into(), quoted(config)]);
    }

    args.join(" ")
}

fn quoted(path: &Path) -> String {
    format!("\"{}\"", path.display())
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/followup.rs"]
mod tests;
