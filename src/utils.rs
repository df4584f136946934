//! Value normalization helpers shared by the extractor and the merger.

use serde_json::Value;

/// Trim surrounding whitespace, returning `None` when nothing is left.
pub fn trimmed_non_empty(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Short JSON type name used in shape-mismatch errors.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
