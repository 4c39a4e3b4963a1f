use std::cmp::Ordering;

use serde_json::Value;

/// Resolves a dot-separated path inside a JSON object.
///
/// Returns `None` (undefined) when any segment is missing, empty, or crosses a
/// non-object value.
#[must_use]
pub fn value_by_path<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current_value = data;
    for segment in path.split('.') {
        if segment.is_empty() {
            return None;
        }

        current_value = current_value.as_object()?.get(segment)?;
    }

    Some(current_value)
}

/// Returns whether a value counts as empty: undefined, `null`, `""`, `[]` or `{}`.
#[must_use]
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(object)) => object.is_empty(),
        Some(Value::Bool(_) | Value::Number(_)) => false,
    }
}

pub(super) fn values_equal(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (None, None) => true,
        (Some(Value::Number(left)), Some(Value::Number(right))) => {
            match (left.as_f64(), right.as_f64()) {
                (Some(left), Some(right)) => left == right,
                _ => left == right,
            }
        }
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

pub(super) fn value_as_f64(value: &Value) -> Option<f64> {
    if let Some(number) = value.as_f64() {
        return Some(number);
    }

    value
        .as_str()
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|number| number.is_finite())
}

pub(super) fn compare_numbers(left: Option<&Value>, right: Option<&Value>) -> Option<Ordering> {
    let left = value_as_f64(left?)?;
    let right = value_as_f64(right?)?;
    left.partial_cmp(&right)
}

pub(super) fn stringify_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
