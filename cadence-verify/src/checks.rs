//! Check evaluation — the six comparison kinds.

use serde::Serialize;
use serde_json::Value;

use crate::scenario::{Check, CheckKind};
use crate::value::lookup;

/// Result of evaluating one [`Check`] against a step's output.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub kind: CheckKind,
    pub field: String,
    pub passed: bool,
    pub message: String,
}

impl CheckOutcome {
    fn new(check: &Check, passed: bool, message: String) -> Self {
        Self {
            kind: check.kind,
            field: check.field.clone(),
            passed,
            message,
        }
    }
}

/// Evaluate a check against step output.
pub fn evaluate(check: &Check, output: &Value) -> CheckOutcome {
    let actual = lookup(output, &check.field);
    let tolerance = check.tolerance.unwrap_or(0.0);

    let (passed, message) = match check.kind {
        CheckKind::Equals => match actual {
            Some(value) if value == &check.expected => (true, "matches expected".to_string()),
            Some(value) => (false, format!("expected {}, got {value}", check.expected)),
            None => (false, format!("field '{}' not found", check.field)),
        },

        CheckKind::Exists => match actual {
            Some(value) if !value.is_null() => (true, "present".to_string()),
            Some(_) => (false, format!("field '{}' is null", check.field)),
            None => (false, format!("field '{}' not found", check.field)),
        },

        CheckKind::Count => match actual.and_then(Value::as_array) {
            Some(list) => match check.expected.as_f64() {
                Some(expected) => {
                    let diff = (list.len() as f64 - expected).abs();
                    if diff <= tolerance {
                        (true, format!("length {} within tolerance", list.len()))
                    } else {
                        (
                            false,
                            format!(
                                "length {} outside tolerance {tolerance} of {expected}",
                                list.len()
                            ),
                        )
                    }
                }
                None => (false, "expected value is not numeric".to_string()),
            },
            None => (false, format!("field '{}' is not a list", check.field)),
        },

        CheckKind::Performance => match actual.and_then(Value::as_f64) {
            Some(measured) => match check.expected.as_f64() {
                Some(budget) => {
                    if measured <= budget + tolerance {
                        (true, format!("{measured} within {budget} + {tolerance}"))
                    } else {
                        (false, format!("{measured} exceeds {budget} + {tolerance}"))
                    }
                }
                None => (false, "expected value is not numeric".to_string()),
            },
            None => (false, format!("field '{}' is not numeric", check.field)),
        },

        CheckKind::Structure => match actual {
            Some(value) => {
                if shape_matches(value, &check.expected) {
                    (true, "shape matches".to_string())
                } else {
                    (false, format!("shape mismatch at '{}'", check.field))
                }
            }
            None => (false, format!("field '{}' not found", check.field)),
        },

        CheckKind::Contains => match actual {
            Some(value) => {
                if contains(value, &check.expected) {
                    (true, "contained".to_string())
                } else {
                    (
                        false,
                        format!("'{}' does not contain {}", check.field, check.expected),
                    )
                }
            }
            None => (false, format!("field '{}' not found", check.field)),
        },
    };

    CheckOutcome::new(check, passed, message)
}

/// Shape descriptors: a string names a kind (`"null"`, `"bool"`,
/// `"number"`, `"string"`, `"list"`, `"map"`), an object requires exactly
/// that key set with recursively matching shapes, a one-element array
/// applies its element shape to every element of the actual list.
fn shape_matches(actual: &Value, shape: &Value) -> bool {
    match shape {
        Value::String(kind) => kind_of(actual) == kind,
        Value::Object(fields) => {
            let Some(object) = actual.as_object() else {
                return false;
            };
            object.len() == fields.len()
                && fields.iter().all(|(key, sub_shape)| {
                    object
                        .get(key)
                        .map(|value| shape_matches(value, sub_shape))
                        .unwrap_or(false)
                })
        }
        Value::Array(shapes) => {
            let Some(list) = actual.as_array() else {
                return false;
            };
            match shapes.as_slice() {
                [element] => list.iter().all(|value| shape_matches(value, element)),
                _ => false,
            }
        }
        _ => false,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

/// Strings contain substrings, lists contain equal elements, maps contain
/// keys.
fn contains(actual: &Value, expected: &Value) -> bool {
    match actual {
        Value::String(s) => expected.as_str().map(|needle| s.contains(needle)).unwrap_or(false),
        Value::Array(list) => list.iter().any(|value| value == expected),
        Value::Object(object) => expected
            .as_str()
            .map(|key| object.contains_key(key))
            .unwrap_or(false),
        _ => false,
    }
}
