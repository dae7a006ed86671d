use crate::messages::{ChatRequest, ChatTurn, Role};

/// Builds the ordered turn list sent to the model.
///
/// A non-blank system prompt becomes the first turn. Conversation turns follow
/// in their original order; a single prompt becomes one user turn.
pub fn normalize(request: ChatRequest, system_prompt: Option<&str>) -> Vec<ChatTurn> {
    let system = system_prompt
        .filter(|prompt| !prompt.trim().is_empty())
        .map(|prompt| ChatTurn::new(Role::System, prompt));

    match request {
        ChatRequest::Conversation(history) => system.into_iter().chain(history).collect(),
        ChatRequest::Prompt(prompt) => system
            .into_iter()
            .chain(std::iter::once(ChatTurn::new(Role::User, prompt)))
            .collect(),
    }
}
