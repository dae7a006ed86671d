//! The chat pipeline: validate a payload, normalize it into turns, invoke the
//! upstream model once, and extract plain text from its answer.

use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Json, State},
    routing::post,
};
use config::ChatConfig;
use serde_json::Value;

mod error;
mod extract;
mod messages;
mod prompt;
mod provider;
mod server;
mod validation;

pub use error::{ChatError, InvocationError};
pub use extract::{extract, extract_text};
pub use messages::{ChatRequest, ChatTurn, ModelReply, Role};
pub use prompt::normalize;
pub use provider::ModelClient;
pub use validation::validate;

use messages::ChatResponse;
use provider::groq::GroqClient;
use server::ChatService;

pub(crate) type Result<T> = std::result::Result<T, ChatError>;

/// Creates an axum router for the chat endpoint, backed by Groq.
///
/// Fails when the client cannot be built, most notably without an API key.
pub fn router(config: &ChatConfig) -> anyhow::Result<Router> {
    let client = GroqClient::new(config)?;

    Ok(router_with_client(config, Arc::new(client)))
}

/// Creates an axum router for the chat endpoint, backed by the given model client.
pub fn router_with_client(config: &ChatConfig, model: Arc<dyn ModelClient>) -> Router {
    let service = ChatService::new(config, model);
    let base = config.path.trim_end_matches('/');

    let router = if base.is_empty() {
        Router::new().route("/", post(chat))
    } else {
        Router::new()
            .route(base, post(chat))
            .route(&format!("{base}/"), post(chat))
    };

    router
        .layer(DefaultBodyLimit::max(config.body_limit))
        .with_state(service)
}

/// Handle chat requests.
///
/// The body is parsed here rather than by the `Json` extractor, so malformed
/// JSON gets the same 400 response shape as any other invalid payload.
async fn chat(State(service): State<ChatService>, body: Bytes) -> Result<Json<ChatResponse>> {
    let raw: Value = serde_json::from_slice(&body)
        .map_err(|e| ChatError::Validation(vec![format!("The request body must be valid JSON: {e}")]))?;

    let request = service.validate(&raw)?;

    match &request {
        ChatRequest::Conversation(turns) => log::debug!("Chat request with {} messages", turns.len()),
        ChatRequest::Prompt(_) => log::debug!("Chat request with a single prompt"),
    }

    let content = service.complete(request).await?;

    log::debug!("Chat completion successful, returning {} characters", content.len());

    Ok(Json(ChatResponse { content }))
}
