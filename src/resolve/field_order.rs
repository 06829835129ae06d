use crate::{
    foundation::error::{ReframeError, ReframeResult},
    request::model::FieldOrderOverride,
    source::metadata::FieldOrder,
};

/// Decide the field order for a run.
///
/// An explicit `top`/`bottom` override wins, then the source's own report. When neither is
/// available and the run deinterlaces, this fails rather than guessing.
pub fn resolve_field_order(
    native: Option<FieldOrder>,
    requested: FieldOrderOverride,
    needs_deinterlace: bool,
) -> ReframeResult<Option<FieldOrder>> {
    let resolved = match requested {
        FieldOrderOverride::Top => Some(FieldOrder::Top),
        FieldOrderOverride::Bottom => Some(FieldOrder::Bottom),
        FieldOrderOverride::Auto => native,
    };

    match resolved {
        Some(order) => Ok(Some(order)),
        None if needs_deinterlace => Err(ReframeError::UnknownFieldOrder {
            field: "field_order",
        }),
        None => Ok(None),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/field_order.rs"]
mod tests;
