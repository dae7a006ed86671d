use std::sync::Arc;

use config::ChatConfig;
use serde_json::Value;

use crate::{
    error::ChatError,
    extract::extract,
    messages::ChatRequest,
    prompt::normalize,
    provider::ModelClient,
    validation::validate,
};

/// Runs one chat request through validation, normalization, invocation and extraction.
///
/// Holds nothing but the configured system prompt and the model client; every
/// request is independent of the others.
#[derive(Clone)]
pub(crate) struct ChatService {
    shared: Arc<ChatServiceInner>,
}

struct ChatServiceInner {
    model: Arc<dyn ModelClient>,
    system_prompt: String,
}

impl ChatService {
    pub fn new(config: &ChatConfig, model: Arc<dyn ModelClient>) -> Self {
        Self {
            shared: Arc::new(ChatServiceInner {
                model,
                system_prompt: config.system_prompt().to_string(),
            }),
        }
    }

    pub fn validate(&self, raw: &Value) -> crate::Result<ChatRequest> {
        validate(raw).map_err(ChatError::Validation)
    }

    /// Asks the model and returns its answer as plain, non-empty text.
    pub async fn complete(&self, request: ChatRequest) -> crate::Result<String> {
        let turns = normalize(request, Some(&self.shared.system_prompt));
        log::debug!("Invoking the model with {} turns", turns.len());

        let reply = self.shared.model.invoke(&turns).await?;

        extract(&reply)
    }
}
