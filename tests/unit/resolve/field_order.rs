use super::*;

#[test]
fn explicit_override_always_wins() {
    assert_eq!(
        resolve_field_order(Some(FieldOrder::Bottom), FieldOrderOverride::Top, true).unwrap(),
        Some(FieldOrder::Top)
    );
    assert_eq!(
        resolve_field_order(Some(FieldOrder::Top), FieldOrderOverride::Bottom, false).unwrap(),
        Some(FieldOrder::Bottom)
    );
}

#[test]
fn auto_uses_native_order() {
    assert_eq!(
        resolve_field_order(Some(FieldOrder::Bottom), FieldOrderOverride::Auto, true).unwrap(),
        Some(FieldOrder::Bottom)
    );
}

#[test]
fn unknown_order_fails_only_when_deinterlacing() {
    let err = resolve_field_order(None, FieldOrderOverride::Auto, true).unwrap_err();
    assert!(matches!(
        err,
        ReframeError::UnknownFieldOrder {
            field: "field_order"
        }
    ));
    assert_eq!(
        resolve_field_order(None, FieldOrderOverride::Auto, false).unwrap(),
        None
    );
}
