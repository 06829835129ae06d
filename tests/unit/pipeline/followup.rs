use std::time::Duration;

use super::*;
use crate::{
    foundation::{
        core::{Dimensions, Fps, FrameIndex},
        timecode::parse_timestamp,
    },
    request::model::DenoiseStage,
    resolve::target::resolve_targets,
    source::metadata::SourceMetadata,
};

#[test]
fn only_composite_runs_get_followups() {
    let mut req = ExtractionRequest::new("tape.iso", Target::FrameIndex(5));
    req.mode = Mode::Single;
    assert!(followup_commands(&req, Some(FieldOrder::Top), &RerunFlags::default()).is_empty());
}

#[test]
fn one_command_per_panel_mode_with_pinned_field_order() {
    let mut req = ExtractionRequest::new("/media/My Tape.iso", Target::FrameIndex(54644));
    req.mode = Mode::Composite;
    req.denoise = DenoiseStrength::Medium;
    req.denoise_stage = DenoiseStage::Pre;
    req.stabilize = true;
    req.scale = 2;

    let cmds = followup_commands(&req, Some(FieldOrder::Bottom), &RerunFlags::default());
    let modes: Vec<Mode> = cmds.iter().map(|(m, _)| *m).collect();
    assert_eq!(modes, vec![Mode::Original, Mode::DeinterlaceOnly, Mode::Single]);

    assert_eq!(
        cmds[0].1,
        "reframe extract --input \"/media/My Tape.iso\" --frame 54644 --scale 2 --resizer bicubic --mode original"
    );
    assert_eq!(
        cmds[1].1,
        "reframe extract --input \"/media/My Tape.iso\" --frame 54644 --scale 2 --resizer bicubic --mode deinterlace-only --field-order bottom"
    );
    assert_eq!(
        cmds[2].1,
        "reframe extract --input \"/media/My Tape.iso\" --frame 54644 --scale 2 --resizer bicubic --mode single --denoise medium --denoise-stage pre --stabilize --field-order bottom"
    );
}

#[test]
fn timestamp_targets_are_echoed_as_time() {
    let req = ExtractionRequest::new("tape.iso", Target::Timestamp(Duration::from_millis(90_500)));
    let cmds = followup_commands(&req, None, &RerunFlags::default());
    assert!(cmds[0].1.contains("--time 00:01:30.500"));
    assert!(!cmds[1].1.contains("--field-order"));
}

#[test]
fn sub_millisecond_times_reselect_the_same_frame() {
    let meta = SourceMetadata {
        fps: Fps::new(30000, 1001).unwrap(),
        total_frames: 1000,
        native_field_order: Some(FieldOrder::Top),
        dimensions: Dimensions {
            width: 720,
            height: 480,
        },
    };
    let t = parse_timestamp("00:00:00.0334").unwrap();
    let first = resolve_targets(Target::Timestamp(t), 1, 1, &meta).unwrap();
    assert_eq!(first[0].index, FrameIndex(1));

    let req = ExtractionRequest::new("tape.vob", Target::Timestamp(t));
    let cmds = followup_commands(&req, Some(FieldOrder::Top), &RerunFlags::default());
    assert!(cmds[0].1.contains("--time 00:00:00.0334 "), "{}", cmds[0].1);

    let echoed = cmds[0]
        .1
        .split(' ')
        .skip_while(|a| *a != "--time")
        .nth(1)
        .unwrap();
    let again = resolve_targets(
        Target::Timestamp(parse_timestamp(echoed).unwrap()),
        1,
        1,
        &meta,
    )
    .unwrap();
    assert_eq!(again[0].index, first[0].index);
}

#[test]
fn output_dir_and_config_are_carried_over() {
    let mut req = ExtractionRequest::new("tape.iso", Target::FrameIndex(3));
    req.scale = 2;
    req.resizer = crate::request::model::Resizer::Neural;
    let flags = RerunFlags {
        out: Some(PathBuf::from("/srv/stills")),
        config: Some(PathBuf::from("conf/reframe.json")),
    };

    for (_, cmd) in followup_commands(&req, Some(FieldOrder::Top), &flags) {
        assert!(
            cmd.ends_with("--out \"/srv/stills\" --config \"conf/reframe.json\""),
            "{cmd}"
        );
    }

    let plain = followup_commands(&req, Some(FieldOrder::Top), &RerunFlags::default());
    assert!(plain.iter().all(|(_, c)| !c.contains("--out") && !c.contains("--config")));
}
