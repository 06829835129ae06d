use super::*;

#[test]
fn label_is_zero_padded_and_truncated_to_millis() {
    assert_eq!(format_label(Duration::ZERO), "00:00:00.000");
    assert_eq!(format_label(Duration::from_secs(720)), "00:12:00.000");
    assert_eq!(
        format_label(Duration::from_nanos(719_985_933_334)),
        "00:11:59.985"
    );
    assert_eq!(format_label(Duration::from_secs(3 * 3600 + 61)), "03:01:01.000");
}

#[test]
fn parses_common_timestamp_shapes() {
    assert_eq!(
        parse_timestamp("00:12:00.000").unwrap(),
        Duration::from_secs(720)
    );
    assert_eq!(
        parse_timestamp("01:02:03.5").unwrap(),
        Duration::from_millis(3_723_500)
    );
    assert_eq!(
        parse_timestamp("12:00").unwrap(),
        Duration::from_secs(720)
    );
    assert_eq!(
        parse_timestamp("720.25").unwrap(),
        Duration::from_millis(720_250)
    );
    assert_eq!(parse_timestamp(".5").unwrap(), Duration::from_millis(500));
}

#[test]
fn rejects_malformed_timestamps() {
    for bad in ["", "abc", "1:2:3:4", "00:61:00", "00:00:75", "00:00:01.x", "-3"] {
        let err = parse_timestamp(bad).unwrap_err();
        assert!(
            matches!(err, ReframeError::Validation(_)),
            "expected validation error for {bad:?}, got {err}"
        );
    }
}

#[test]
fn precise_timestamps_parse_back_exactly() {
    assert_eq!(format_timestamp(Duration::from_secs(720)), "00:12:00.000");
    assert_eq!(
        format_timestamp(Duration::from_micros(33_400)),
        "00:00:00.0334"
    );
    for t in [
        Duration::from_nanos(1),
        Duration::from_micros(33_400),
        Duration::from_nanos(719_985_933_334),
        Duration::from_secs(100 * 3600 + 59),
    ] {
        assert_eq!(parse_timestamp(&format_timestamp(t)).unwrap(), t);
    }
}
