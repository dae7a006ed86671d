use std::time::Duration;

use config::Config;
use insta::assert_json_snapshot;
use integration_tests::{GroqMock, TestServer};
use serde_json::{Value, json};
use server::ServeConfig;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn empty_body_is_a_bad_request() {
    let mock = GroqMock::echo().spawn().await.unwrap();
    let server = TestServer::with_groq(&mock, "").await;

    let response = server.client.post("/chat", &json!({})).await;
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();

    assert_json_snapshot!(body, @r#"
    {
      "details": [
        "A non-empty prompt or at least one user or system message is required."
      ],
      "error": "Invalid request"
    }
    "#);

    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn every_structural_error_is_reported() {
    let mock = GroqMock::echo().spawn().await.unwrap();
    let server = TestServer::with_groq(&mock, "").await;

    let body = json!({
        "messages": [
            { "role": "robot", "content": "beep" },
            { "role": "user", "content": "   " },
            "not an object"
        ],
        "prompt": 42
    });

    let response = server.client.post("/chat", &body).await;
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();

    assert_json_snapshot!(body["details"], @r#"
    [
      "messages[0].role must be one of \"user\", \"assistant\" or \"system\".",
      "messages[1].content must not be empty.",
      "messages[2] must be an object.",
      "`prompt` must be a string."
    ]
    "#);

    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn only_assistant_messages_is_a_bad_request() {
    let mock = GroqMock::echo().spawn().await.unwrap();
    let server = TestServer::with_groq(&mock, "").await;

    let body = json!({ "messages": [{ "role": "assistant", "content": "I answered already" }] });

    let response = server.client.post("/chat", &body).await;
    assert_eq!(response.status(), 400);
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let mock = GroqMock::echo().spawn().await.unwrap();
    let server = TestServer::with_groq(&mock, "").await;

    let response = server.client.post_raw("/chat", "{\"prompt\": ").await;
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid request");
    assert!(body["details"][0].as_str().unwrap().starts_with("The request body must be valid JSON"));
}

#[tokio::test]
async fn upstream_error_is_an_internal_error() {
    let mock = GroqMock::with_error(503, "over capacity").spawn().await.unwrap();
    let server = TestServer::with_groq(&mock, "").await;

    let response = server.client.post("/chat", &json!({ "prompt": "hi" })).await;
    assert_eq!(response.status(), 500);

    let body: Value = response.json().await.unwrap();

    assert_json_snapshot!(body, @r#"
    {
      "error": "Could not get a response from the model."
    }
    "#);

    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn rejected_api_key_is_an_internal_error() {
    let mock = GroqMock::with_error(401, "Invalid API Key").spawn().await.unwrap();
    let server = TestServer::with_groq(&mock, "").await;

    let response = server.client.post("/chat", &json!({ "prompt": "hi" })).await;
    assert_eq!(response.status(), 500);

    let body = response.text().await.unwrap();
    assert!(!body.contains("Invalid API Key"));
}

#[tokio::test]
async fn malformed_upstream_body_is_an_internal_error() {
    let mock = GroqMock::with_garbage().spawn().await.unwrap();
    let server = TestServer::with_groq(&mock, "").await;

    let response = server.client.post("/chat", &json!({ "prompt": "hi" })).await;
    assert_eq!(response.status(), 500);
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let mock = GroqMock::echo().with_delay(Duration::from_secs(5)).spawn().await.unwrap();
    let server = TestServer::with_groq(&mock, "timeout = \"200ms\"").await;

    let response = server.client.post("/chat", &json!({ "prompt": "hi" })).await;
    assert_eq!(response.status(), 500);
}

#[tokio::test]
async fn unreachable_upstream_is_an_internal_error() {
    // Reserve a port, then free it so nothing listens there.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let config = format!("[chat]\napi_key = \"gsk_test\"\nbase_url = \"http://{address}/v1\"\n");
    let server = TestServer::start(&config).await;

    let response = server.client.post("/chat", &json!({ "prompt": "hi" })).await;
    assert_eq!(response.status(), 500);
}

#[tokio::test]
async fn empty_content_is_a_bad_gateway() {
    let mock = GroqMock::with_content(json!("   ")).spawn().await.unwrap();
    let server = TestServer::with_groq(&mock, "").await;

    let response = server.client.post("/chat", &json!({ "prompt": "hi" })).await;
    assert_eq!(response.status(), 502);

    let body: Value = response.json().await.unwrap();

    assert_json_snapshot!(body, @r#"
    {
      "error": "The model returned an empty response."
    }
    "#);
}

#[tokio::test]
async fn empty_parts_are_a_bad_gateway() {
    let mock = GroqMock::with_content(json!([])).spawn().await.unwrap();
    let server = TestServer::with_groq(&mock, "").await;

    let response = server.client.post("/chat", &json!({ "prompt": "hi" })).await;
    assert_eq!(response.status(), 502);
}

#[tokio::test]
async fn missing_choices_is_a_bad_gateway() {
    let mock = GroqMock::without_choices().spawn().await.unwrap();
    let server = TestServer::with_groq(&mock, "").await;

    let response = server.client.post("/chat", &json!({ "prompt": "hi" })).await;
    assert_eq!(response.status(), 502);
}

#[tokio::test]
async fn missing_api_key_prevents_startup() {
    let serve_config = ServeConfig {
        listen_address: "127.0.0.1:0".parse().unwrap(),
        config: Config::default(),
        shutdown: CancellationToken::new(),
    };

    let error = server::serve(serve_config).await.unwrap_err();

    assert!(error.to_string().starts_with("Missing Groq API key."));
}
