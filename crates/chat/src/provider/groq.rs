mod input;
mod output;

use anyhow::anyhow;
use async_trait::async_trait;
use config::ChatConfig;
use reqwest::{Client, header::AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};

use self::{
    input::{GroqMessage, GroqRequest},
    output::GroqResponse,
};

use crate::{
    error::InvocationError,
    messages::{ChatTurn, ModelReply},
    provider::ModelClient,
};

/// Client for Groq's OpenAI-compatible chat completion API.
pub(crate) struct GroqClient {
    client: Client,
    url: String,
    api_key: SecretString,
    model: String,
    temperature: f32,
}

impl GroqClient {
    pub fn new(config: &ChatConfig) -> anyhow::Result<Self> {
        let api_key = config
            .api_key
            .as_ref()
            .map(|key| key.expose_secret().trim())
            .filter(|key| !key.is_empty())
            .map(|key| SecretString::from(key.to_string()))
            .ok_or_else(|| anyhow!("Missing Groq API key"))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client for Groq: {e}"))?;

        Ok(Self {
            client,
            url: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl ModelClient for GroqClient {
    async fn invoke(&self, turns: &[ChatTurn]) -> Result<ModelReply, InvocationError> {
        let request = GroqRequest {
            model: &self.model,
            messages: turns.iter().map(GroqMessage::from).collect(),
            temperature: self.temperature,
            stream: false,
        };

        log::debug!("Sending {} turns to Groq model {}", turns.len(), self.model);

        let response = self
            .client
            .post(&self.url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key.expose_secret()))
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("Groq API error ({status}): {error_text}");

            return Err(InvocationError::Upstream {
                status: status.as_u16(),
                message: error_text,
            });
        }

        // Read the body as text first so it can be logged if parsing fails.
        let response_text = response.text().await?;

        let response: GroqResponse = sonic_rs::from_str(&response_text).map_err(|e| {
            log::error!("Failed to parse Groq chat completion response: {e}");
            log::error!("Raw response that failed to parse: {response_text}");
            InvocationError::MalformedResponse(e.to_string())
        })?;

        Ok(ModelReply::new(response.into_content()))
    }
}
