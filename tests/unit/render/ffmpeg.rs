use super::*;
use crate::{
    foundation::core::Fps,
    plan::builder::build_stage_plan,
    plan::stage::StagePlan,
    request::model::{DenoiseStage, GraphOptions, Mode},
};

const FILTER_LIST: &str = "Filters:
  T.. = Timeline support
  .S. = Slice threading
  ..C = Command support
  A = Audio input/output
  V = Video input/output
  N = Dynamic number and/or type of input/output
  | = Source or sink filter
 TSC bwdif             V->V       Deinterlace the input image.
 ... format            V->V       Convert the input video to one of the specified pixel formats.
 TS. hqdn3d            V->V       Apply a High Quality 3D Denoiser.
 ... scale             V->V       Scale the input video size and/or convert the image format.
 ... select            V->N       Select video frames to pass in output.
";

fn meta() -> SourceMetadata {
    SourceMetadata {
        fps: Fps::new(30000, 1001).unwrap(),
        total_frames: 100_000,
        native_field_order: Some(FieldOrder::Top),
        dimensions: Dimensions {
            width: 720,
            height: 480,
        },
    }
}

fn executor(cfg: FfmpegConfig) -> FfmpegExecutor {
    FfmpegExecutor::with_filters(cfg, "tape.mkv", &meta(), parse_filter_list(FILTER_LIST))
}

fn graph(mode: Mode, f: impl FnOnce(&mut GraphOptions)) -> StageGraph {
    let mut o = GraphOptions {
        mode,
        scale: 1,
        resizer: Resizer::Bicubic,
        fast: false,
        denoise: DenoiseStrength::None,
        denoise_stage: DenoiseStage::Pre,
        stabilize: false,
    };
    f(&mut o);
    match build_stage_plan(&o, Some(FieldOrder::Top)).unwrap() {
        StagePlan::Single(g) => g,
        StagePlan::Composite(_) => panic!("single graph expected"),
    }
}

#[test]
fn parses_filter_rows_only() {
    let filters = parse_filter_list(FILTER_LIST);
    assert_eq!(
        filters.into_iter().collect::<Vec<_>>(),
        vec!["bwdif", "format", "hqdn3d", "scale", "select"]
    );
}

#[test]
fn chain_follows_stage_order_and_selects_exact_frame() {
    let ex = executor(FfmpegConfig::default());
    let g = graph(Mode::Single, |o| {
        o.denoise = DenoiseStrength::Medium;
        o.denoise_stage = DenoiseStage::Pre;
        o.scale = 2;
        o.resizer = Resizer::Lanczos;
    });
    let vf = ex
        .filter_chain(&g, FrameIndex(54644), Some(FieldOrder::Bottom), None)
        .unwrap();
    assert_eq!(
        vf,
        "hqdn3d=4:3:6:4.5,bwdif=mode=send_frame:parity=bff:deint=all,\
         select=eq(n\\,54644),scale=1440:960:flags=lanczos,format=rgba"
    );
}

#[test]
fn original_chain_only_selects_and_converts() {
    let ex = executor(FfmpegConfig::default());
    let g = graph(Mode::Original, |_| {});
    let vf = ex.filter_chain(&g, FrameIndex(7), None, None).unwrap();
    assert_eq!(vf, "select=eq(n\\,7),format=rgba");
}

#[test]
fn deinterlace_without_field_order_fails() {
    let ex = executor(FfmpegConfig::default());
    let g = graph(Mode::DeinterlaceOnly, |_| {});
    assert!(matches!(
        ex.filter_chain(&g, FrameIndex(0), None, None),
        Err(ReframeError::UnknownFieldOrder { .. })
    ));
}

#[test]
fn check_reports_missing_primitives() {
    let ex = executor(FfmpegConfig::default());
    assert!(ex.check(&graph(Mode::Single, |_| {})).is_ok());

    let stabilized = graph(Mode::Single, |o| o.stabilize = true);
    let err = ex.check(&stabilized).unwrap_err();
    assert!(
        matches!(err, ReframeError::CapabilityUnavailable { ref primitive } if primitive.contains("deshake")),
        "{err}"
    );

    let yadif = executor(FfmpegConfig {
        deinterlacer: Deinterlacer::Yadif,
        ..FfmpegConfig::default()
    });
    assert!(matches!(
        yadif.check(&graph(Mode::DeinterlaceOnly, |_| {})),
        Err(ReframeError::CapabilityUnavailable { .. })
    ));
}

#[test]
fn neural_resizer_needs_filter_and_model() {
    let neural = graph(Mode::Original, |o| {
        o.scale = 2;
        o.resizer = Resizer::Neural;
    });
    let ex = executor(FfmpegConfig::default());
    assert!(matches!(
        ex.check(&neural),
        Err(ReframeError::CapabilityUnavailable { .. })
    ));
    assert!(matches!(
        ex.filter_chain(&neural, FrameIndex(0), None, None),
        Err(ReframeError::CapabilityUnavailable { .. })
    ));

    let mut filters = parse_filter_list(FILTER_LIST);
    filters.insert("sr".to_string());
    let ex = FfmpegExecutor::with_filters(
        FfmpegConfig {
            sr_model: Some(PathBuf::from("models/espcn.pb")),
            ..FfmpegConfig::default()
        },
        "tape.mkv",
        &meta(),
        filters,
    );
    let vf = ex.filter_chain(&neural, FrameIndex(3), None, None).unwrap();
    assert_eq!(
        vf,
        "select=eq(n\\,3),sr=dnn_backend=tensorflow:scale_factor=2:model='models/espcn.pb',\
         scale=1440:960:flags=bicubic,format=rgba"
    );
}

#[test]
fn caption_is_drawn_after_resize() {
    let g = graph(Mode::Original, |o| o.scale = 2);
    let ex = executor(FfmpegConfig::default());
    let vf = ex
        .filter_chain(&g, FrameIndex(3), None, Some("Original (bicubic 2x)"))
        .unwrap();
    assert_eq!(
        vf,
        "select=eq(n\\,3),scale=1440:960:flags=bicubic,\
         drawtext=text='Original (bicubic 2x)':x=20:y=20:fontsize=40:fontcolor=white:\
         box=1:boxcolor=black@0.6:boxborderw=10,format=rgba"
    );
}

#[test]
fn captions_need_drawtext() {
    let ex = executor(FfmpegConfig::default());
    assert!(matches!(
        ex.check_captions(),
        Err(ReframeError::CapabilityUnavailable { .. })
    ));

    let mut filters = parse_filter_list(FILTER_LIST);
    filters.insert("drawtext".to_string());
    let ex = FfmpegExecutor::with_filters(FfmpegConfig::default(), "tape.mkv", &meta(), filters);
    assert!(ex.check_captions().is_ok());
}
