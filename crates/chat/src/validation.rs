//! Shape checks for incoming chat payloads.
//!
//! Two shapes are accepted: `{ "messages": [{ "role"?, "content" }, ...] }` and
//! `{ "prompt": "..." }`. Structural problems are all collected before failing,
//! so the client sees every reason at once.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::messages::{ChatRequest, ChatTurn, Role, last_prompt_turn};

pub(crate) const PROMPT_OR_MESSAGE_REQUIRED: &str = "A non-empty prompt or at least one user or system message is required.";

/// Validates a raw JSON body into a [`ChatRequest`].
///
/// A non-blank `prompt` wins over `messages`. Otherwise the conversation is
/// accepted when it holds at least one turn that is not an assistant answer.
pub fn validate(raw: &Value) -> Result<ChatRequest, Vec<String>> {
    let Some(body) = raw.as_object() else {
        return Err(vec!["The request body must be a JSON object.".to_string()]);
    };

    // Prompt errors are reported after message errors.
    let mut prompt_errors = Vec::new();
    let prompt = prompt(body, &mut prompt_errors);

    let mut errors = Vec::new();
    let turns = messages(body, prompt.is_some(), &mut errors);
    errors.extend(prompt_errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    if let Some(prompt) = prompt {
        if turns.is_some() {
            log::debug!("Both prompt and messages given, using the prompt");
        }

        return Ok(ChatRequest::Prompt(prompt.to_string()));
    }

    match turns {
        Some(turns) if last_prompt_turn(&turns).is_some() => Ok(ChatRequest::Conversation(turns)),
        _ => Err(vec![PROMPT_OR_MESSAGE_REQUIRED.to_string()]),
    }
}

/// An empty history is only an error when there is no prompt to answer instead.
fn messages(body: &Map<String, Value>, has_prompt: bool, errors: &mut Vec<String>) -> Option<Vec<ChatTurn>> {
    let entries = match body.get("messages") {
        None | Some(Value::Null) => return None,
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            errors.push("`messages` must be an array.".to_string());
            return None;
        }
    };

    if entries.is_empty() {
        if !has_prompt {
            errors.push("At least one message is required.".to_string());
        }

        return None;
    }

    let turns = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| turn(index, entry, errors))
        .collect();

    Some(turns)
}

fn turn(index: usize, entry: &Value, errors: &mut Vec<String>) -> Option<ChatTurn> {
    let Some(entry) = entry.as_object() else {
        errors.push(format!("messages[{index}] must be an object."));
        return None;
    };

    let role = match entry.get("role") {
        None | Some(Value::Null) => Some(Role::User),
        Some(role) => Role::deserialize(role).ok(),
    };

    if role.is_none() {
        errors.push(format!(
            "messages[{index}].role must be one of \"user\", \"assistant\" or \"system\"."
        ));
    }

    let content = match entry.get("content") {
        Some(Value::String(content)) if content.trim().is_empty() => {
            errors.push(format!("messages[{index}].content must not be empty."));
            None
        }
        Some(Value::String(content)) => Some(content),
        None | Some(Value::Null) => {
            errors.push(format!("messages[{index}].content is required."));
            None
        }
        Some(_) => {
            errors.push(format!("messages[{index}].content must be a string."));
            None
        }
    };

    Some(ChatTurn::new(role?, content?.as_str()))
}

fn prompt<'a>(body: &'a Map<String, Value>, errors: &mut Vec<String>) -> Option<&'a str> {
    match body.get("prompt") {
        None | Some(Value::Null) => None,
        Some(Value::String(prompt)) => Some(prompt.trim()).filter(|prompt| !prompt.is_empty()),
        Some(_) => {
            errors.push("`prompt` must be a string.".to_string());
            None
        }
    }
}
