use serde::Deserialize;
use serde_json::Value;

/// Response body of a non-streaming chat completion.
///
/// Only the parts we read are modelled; everything else is ignored.
#[derive(Debug, Deserialize)]
pub(super) struct GroqResponse {
    #[serde(default)]
    pub(super) choices: Vec<GroqChoice>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GroqChoice {
    pub(super) message: GroqAssistantMessage,
}

#[derive(Debug, Deserialize)]
pub(super) struct GroqAssistantMessage {
    /// A string in practice, but kept raw: compatible servers also send
    /// `null` or a list of content parts.
    #[serde(default)]
    pub(super) content: Value,
}

impl GroqResponse {
    /// Content of the first choice, or `null` when the model gave none.
    pub(super) fn into_content(self) -> Value {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or(Value::Null)
    }
}
