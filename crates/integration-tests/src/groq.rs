//! A mock of Groq's OpenAI-compatible chat completion API.

use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Clone)]
enum Behavior {
    /// Answer with the content of the last message.
    Echo,
    /// Answer with this raw message content.
    Content(Value),
    /// Answer with an empty choice list.
    NoChoices,
    /// Answer with a body that is not JSON.
    Garbage,
    /// Fail with this status and body.
    Error(StatusCode, String),
}

/// Builder for a mock Groq server
pub struct GroqMock {
    behavior: Behavior,
    delay: Option<Duration>,
}

impl GroqMock {
    /// A mock that answers with the last message it receives.
    pub fn echo() -> Self {
        Self {
            behavior: Behavior::Echo,
            delay: None,
        }
    }

    /// A mock that answers with the given raw `message.content`.
    pub fn with_content(content: Value) -> Self {
        Self {
            behavior: Behavior::Content(content),
            delay: None,
        }
    }

    pub fn without_choices() -> Self {
        Self {
            behavior: Behavior::NoChoices,
            delay: None,
        }
    }

    pub fn with_garbage() -> Self {
        Self {
            behavior: Behavior::Garbage,
            delay: None,
        }
    }

    pub fn with_error(status: u16, message: impl Into<String>) -> Self {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        Self {
            behavior: Behavior::Error(status, message.into()),
            delay: None,
        }
    }

    /// Waits this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Starts the mock on an ephemeral port.
    pub async fn spawn(self) -> anyhow::Result<RunningGroqMock> {
        let state = Arc::new(MockState {
            behavior: self.behavior,
            delay: self.delay,
            requests: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            last_authorization: Mutex::new(None),
        });

        let app = Router::new()
            .route("/v1/chat/completions", post(chat_completions))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(RunningGroqMock { address, state })
    }
}

/// A mock Groq server running in the background
pub struct RunningGroqMock {
    address: SocketAddr,
    state: Arc<MockState>,
}

impl RunningGroqMock {
    /// The value for `chat.base_url`.
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.address)
    }

    /// Number of chat completion requests received.
    pub fn request_count(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    /// The JSON body of the last chat completion request.
    pub fn last_request(&self) -> Option<Value> {
        self.state.last_request.lock().unwrap().clone()
    }

    /// The `Authorization` header of the last chat completion request.
    pub fn last_authorization(&self) -> Option<String> {
        self.state.last_authorization.lock().unwrap().clone()
    }
}

struct MockState {
    behavior: Behavior,
    delay: Option<Duration>,
    requests: AtomicUsize,
    last_request: Mutex<Option<Value>>,
    last_authorization: Mutex<Option<String>>,
}

async fn chat_completions(State(state): State<Arc<MockState>>, headers: HeaderMap, Json(request): Json<Value>) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    *state.last_authorization.lock().unwrap() = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    *state.last_request.lock().unwrap() = Some(request.clone());

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }

    let content = match &state.behavior {
        Behavior::Echo => request["messages"]
            .as_array()
            .and_then(|messages| messages.last())
            .map(|message| message["content"].clone())
            .unwrap_or(Value::Null),
        Behavior::Content(content) => content.clone(),
        Behavior::NoChoices => return Json(completion(&request, Vec::new())).into_response(),
        Behavior::Garbage => return (StatusCode::OK, "<html>definitely not json</html>").into_response(),
        Behavior::Error(status, message) => {
            let body = json!({ "error": { "message": message, "type": "invalid_request_error" } });
            return (*status, Json(body)).into_response();
        }
    };

    let choice = json!({
        "index": 0,
        "message": { "role": "assistant", "content": content },
        "finish_reason": "stop"
    });

    Json(completion(&request, vec![choice])).into_response()
}

fn completion(request: &Value, choices: Vec<Value>) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1677651200,
        "model": request["model"],
        "choices": choices,
        "usage": { "prompt_tokens": 10, "completion_tokens": 15, "total_tokens": 25 }
    })
}
