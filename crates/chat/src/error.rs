use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Errors of the chat pipeline, each mapped to a distinct HTTP status.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The request body does not have a usable shape. Caused by the client.
    #[error("Invalid request: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// The call to the upstream model failed.
    #[error("Model invocation failed: {0}")]
    Invocation(#[from] InvocationError),

    /// The model answered, but with no usable text.
    #[error("The model returned an empty response.")]
    EmptyResponse,
}

/// Why a call to the upstream model did not produce a reply.
#[derive(Debug, Error)]
pub enum InvocationError {
    /// The request could not be sent, or the connection broke.
    #[error("connection error: {0}")]
    Connection(String),

    /// The upstream did not answer within the configured timeout.
    #[error("the upstream model did not answer in time")]
    Timeout,

    /// The upstream answered with a non-success status.
    #[error("upstream returned status {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The upstream answered with a body we cannot decode.
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for InvocationError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Connection(error.to_string())
        }
    }
}

impl ChatError {
    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Invocation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::EmptyResponse => StatusCode::BAD_GATEWAY,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            Self::Validation(details) => {
                log::debug!("Rejecting chat request: {}", details.join("; "));

                ErrorResponse {
                    error: "Invalid request".to_string(),
                    details: Some(details),
                }
            }
            Self::Invocation(error) => {
                // Upstream details stay in the logs.
                log::error!("Failed to invoke the model: {error}");

                ErrorResponse {
                    error: "Could not get a response from the model.".to_string(),
                    details: None,
                }
            }
            error @ Self::EmptyResponse => {
                log::error!("Server error ({}): {error}", status.as_u16());

                ErrorResponse {
                    error: error.to_string(),
                    details: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
