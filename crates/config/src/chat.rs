//! Chat pipeline configuration: the upstream model and how requests reach it.

use std::{borrow::Cow, time::Duration};

use duration_str::deserialize_duration;
use secrecy::SecretString;
use serde::Deserialize;

/// System instruction used when none, or a blank one, is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful and collaborative assistant. Answer briefly and clearly.";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Groq's OpenAI-compatible API root.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Chat endpoint and upstream model configuration.
///
/// Built once at startup and shared read-only by every request.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChatConfig {
    /// The path where the chat endpoint is mounted. The same path with a trailing slash is also served.
    pub path: Cow<'static, str>,
    /// Instruction prepended as a system turn to every conversation.
    pub system_prompt: Option<String>,
    /// Upstream model identifier.
    pub model: String,
    /// Sampling temperature, between 0 and 2.
    pub temperature: f32,
    /// Bearer credential for the upstream API. Required to start.
    pub api_key: Option<SecretString>,
    /// Root URL of the OpenAI-compatible upstream API.
    pub base_url: String,
    /// Timeout applied to each outbound model call.
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
    /// Maximum accepted request body size, in bytes.
    pub body_limit: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            path: Cow::Borrowed("/chat"),
            system_prompt: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            body_limit: 1024 * 1024,
        }
    }
}

impl ChatConfig {
    /// The effective system instruction, falling back to [`DEFAULT_SYSTEM_PROMPT`].
    pub fn system_prompt(&self) -> &str {
        match self.system_prompt.as_deref() {
            Some(prompt) if !prompt.trim().is_empty() => prompt,
            _ => {
                log::debug!("No system prompt configured, using the default one");
                DEFAULT_SYSTEM_PROMPT
            }
        }
    }
}
