use serde_json::Value;

use crate::{error::ChatError, messages::ModelReply};

/// Reduces a model reply to plain text, failing when nothing usable is left.
pub fn extract(reply: &ModelReply) -> crate::Result<String> {
    let text = extract_text(reply.raw());

    if text.is_empty() {
        return Err(ChatError::EmptyResponse);
    }

    Ok(text)
}

/// Flattens raw model content into trimmed text.
///
/// Strings are used as is. Lists are joined with newlines, taking string
/// elements verbatim and the `text` field of object elements. A single object
/// contributes its `text` field. Anything else is empty.
pub fn extract_text(raw: &Value) -> String {
    match raw {
        Value::String(text) => text.trim().to_string(),
        Value::Array(parts) => parts.iter().map(part_text).collect::<Vec<_>>().join("\n").trim().to_string(),
        Value::Object(object) => object.get("text").map(field_text).unwrap_or_default().trim().to_string(),
        _ => String::new(),
    }
}

fn part_text(part: &Value) -> String {
    match part {
        Value::String(text) => text.clone(),
        Value::Object(object) => object.get("text").map(field_text).unwrap_or_default(),
        _ => String::new(),
    }
}

/// Scalars are rendered as text. A nested object or list in a `text` field is not
/// prose, so it contributes nothing rather than its JSON encoding.
fn field_text(text: &Value) -> String {
    match text {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    }
}
