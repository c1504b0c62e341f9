//! Rendering of cell values for display.

use crate::model::{ItemDescriptor, Scalar};

/// Render a scalar with an optional prefix, suffix and float precision.
///
/// Booleans render lowercase, floats use `precision` digits when it is set,
/// integers get thousands separators and everything else uses its default
/// string form. Never fails.
pub fn format_value(
    value: &Scalar,
    prefix: Option<&str>,
    suffix: Option<&str>,
    precision: Option<usize>,
) -> String {
    let body = match value {
        Scalar::Bool(b) => b.to_string(),
        Scalar::Float(f) if f.is_finite() => match precision {
            Some(p) => format!("{:.*}", p, f),
            None => value.to_string(),
        },
        Scalar::Int(i) => group_thousands(*i),
        other => other.to_string(),
    };

    format!("{}{}{}", prefix.unwrap_or(""), body, suffix.unwrap_or(""))
}

/// [`format_value`] with a descriptor's formatting.
pub fn format_item(value: &Scalar, item: &ItemDescriptor) -> String {
    format_value(
        value,
        item.prefix.as_deref(),
        item.suffix.as_deref(),
        item.precision,
    )
}

/// `1234567` -> `"1,234,567"`.
fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let len = digits.len();

    let mut result = String::with_capacity(len + len / 3 + 1);
    if value < 0 {
        result.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}
