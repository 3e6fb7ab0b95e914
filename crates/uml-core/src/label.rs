//! Text for class box rows.

use crate::model::{Field, Method};

/// `+name: type`
pub fn field_label(field: &Field) -> String {
    format!("{}{}: {}", field.visibility.symbol(), field.name, field.ty)
}

/// `+name(parameters): return_type`
pub fn method_label(method: &Method) -> String {
    format!(
        "{}{}({}): {}",
        method.visibility.symbol(),
        method.name,
        method.parameters,
        method.return_type
    )
}

/// Row text without the visibility symbol, for renderers that draw the
/// symbol in its own color.
pub fn field_body(field: &Field) -> String {
    format!("{}: {}", field.name, field.ty)
}

pub fn method_body(method: &Method) -> String {
    format!(
        "{}({}): {}",
        method.name, method.parameters, method.return_type
    )
}
