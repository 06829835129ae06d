use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ReframeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ReframeError::probe("x").to_string().contains("probe error:"));
    assert!(
        ReframeError::capability("bwdif")
            .to_string()
            .contains("capability unavailable: bwdif")
    );
    assert!(
        ReframeError::invalid_combination("stabilize", "needs deinterlace")
            .to_string()
            .starts_with("invalid combination: stabilize")
    );
}

#[test]
fn request_errors_name_their_field() {
    let err = ReframeError::OutOfRange {
        field: "target",
        index: -1,
        total_frames: 10,
    };
    assert_eq!(err.field(), Some("target"));
    assert_eq!(
        ReframeError::UnknownFieldOrder {
            field: "field_order"
        }
        .field(),
        Some("field_order")
    );
    assert_eq!(
        ReframeError::UnsupportedResizer("spline".into()).field(),
        Some("resizer")
    );
    assert_eq!(
        ReframeError::UnsupportedDenoiseLevel("max".into()).field(),
        Some("denoise")
    );
    assert_eq!(ReframeError::validation("x").field(), None);
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ReframeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
