pub(crate) mod groq;

use async_trait::async_trait;

use crate::{
    error::InvocationError,
    messages::{ChatTurn, ModelReply},
};

/// A hosted chat model.
///
/// Each call performs exactly one request upstream. Implementations must not
/// retry; the caller decides what a failure means.
///
/// Note for async_trait: the server holds the client as `Arc<dyn ModelClient>`,
/// so the trait has to stay dyn-compatible.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Sends the ordered turns to the model and returns its raw answer.
    async fn invoke(&self, turns: &[ChatTurn]) -> Result<ModelReply, InvocationError>;
}
