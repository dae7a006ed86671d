use serde::Serialize;

use crate::messages::{ChatTurn, Role};

/// Request body for Groq's OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Serialize)]
pub(super) struct GroqRequest<'a> {
    pub(super) model: &'a str,
    pub(super) messages: Vec<GroqMessage<'a>>,
    /// Sampling temperature between 0 and 2. Lower is more deterministic.
    pub(super) temperature: f32,
    pub(super) stream: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct GroqMessage<'a> {
    pub(super) role: Role,
    pub(super) content: &'a str,
}

impl<'a> From<&'a ChatTurn> for GroqMessage<'a> {
    fn from(turn: &'a ChatTurn) -> Self {
        Self {
            role: turn.role(),
            content: turn.content(),
        }
    }
}
