use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who authored a turn in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions that steer the model.
    System,
    /// Input written by the person chatting.
    User,
    /// A previous answer from the model.
    Assistant,
}

/// One role-tagged message of a conversation.
///
/// The content is never blank: turns are only created from validated input
/// or from a non-blank system prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    role: Role,
    content: String,
}

impl ChatTurn {
    pub(crate) fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// The author of this turn.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The text of this turn.
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// A validated chat request. Exactly one representation is accepted per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatRequest {
    /// A conversation history, in the order the client sent it.
    Conversation(Vec<ChatTurn>),
    /// A single user prompt.
    Prompt(String),
}

impl ChatRequest {
    /// The input the model is asked to answer: the prompt itself, or the last
    /// non-assistant turn of the conversation.
    pub fn prompt(&self) -> &str {
        match self {
            ChatRequest::Prompt(prompt) => prompt,
            ChatRequest::Conversation(turns) => last_prompt_turn(turns).map(ChatTurn::content).unwrap_or_default(),
        }
    }
}

/// Scans from the end for the last turn that is not an assistant answer.
pub(crate) fn last_prompt_turn(turns: &[ChatTurn]) -> Option<&ChatTurn> {
    turns.iter().rev().find(|turn| turn.role != Role::Assistant)
}

/// What the upstream model answered, before it is reduced to plain text.
///
/// The raw content is either a string, a list of text fragments, or an object
/// with a `text` field, depending on the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelReply {
    raw: Value,
}

impl ModelReply {
    /// Wraps raw model output.
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// A reply whose content is a plain string.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(Value::String(text.into()))
    }

    /// The raw content as returned by the model.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

/// Successful chat response body.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatResponse {
    pub(crate) content: String,
}
