use insta::assert_json_snapshot;
use integration_tests::{GroqMock, TestServer};
use serde_json::{Value, json};

#[tokio::test]
async fn prompt_round_trip() {
    let mock = GroqMock::echo().spawn().await.unwrap();
    let server = TestServer::with_groq(&mock, "").await;

    let response = server.client.post("/chat", &json!({ "prompt": "2+2" })).await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();

    assert_json_snapshot!(body, @r#"
    {
      "content": "2+2"
    }
    "#);

    let request = mock.last_request().unwrap();

    assert_eq!(request["model"], "llama-3.3-70b-versatile");
    assert_eq!(request["temperature"], json!(0.0));
    assert_eq!(request["stream"], false);

    assert_json_snapshot!(request["messages"], @r#"
    [
      {
        "content": "You are a helpful and collaborative assistant. Answer briefly and clearly.",
        "role": "system"
      },
      {
        "content": "2+2",
        "role": "user"
      }
    ]
    "#);
}

#[tokio::test]
async fn api_key_is_sent_as_bearer_token() {
    let mock = GroqMock::echo().spawn().await.unwrap();
    let server = TestServer::with_groq(&mock, "").await;

    let response = server.client.post("/chat", &json!({ "prompt": "hi" })).await;
    assert_eq!(response.status(), 200);

    assert_eq!(mock.last_authorization().as_deref(), Some("Bearer gsk_test"));
}

#[tokio::test]
async fn trailing_slash() {
    let mock = GroqMock::echo().spawn().await.unwrap();
    let server = TestServer::with_groq(&mock, "").await;

    let response = server.client.post("/chat/", &json!({ "prompt": "slash" })).await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["content"], "slash");
}

#[tokio::test]
async fn conversation_is_forwarded_in_order() {
    let mock = GroqMock::with_content(json!("Rust is a systems language.")).spawn().await.unwrap();
    let server = TestServer::with_groq(&mock, "system_prompt = \"Be terse.\"\nmodel = \"llama-3.1-8b-instant\"").await;

    let body = json!({
        "messages": [
            { "role": "user", "content": "Hi" },
            { "role": "assistant", "content": "Hello!" },
            { "content": "What is Rust?" }
        ]
    });

    let response = server.client.post("/chat", &body).await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["content"], "Rust is a systems language.");

    let request = mock.last_request().unwrap();
    assert_eq!(request["model"], "llama-3.1-8b-instant");

    assert_json_snapshot!(request["messages"], @r#"
    [
      {
        "content": "Be terse.",
        "role": "system"
      },
      {
        "content": "Hi",
        "role": "user"
      },
      {
        "content": "Hello!",
        "role": "assistant"
      },
      {
        "content": "What is Rust?",
        "role": "user"
      }
    ]
    "#);
}

#[tokio::test]
async fn prompt_wins_over_messages() {
    let mock = GroqMock::echo().spawn().await.unwrap();
    let server = TestServer::with_groq(&mock, "").await;

    let body = json!({
        "prompt": "  from the prompt  ",
        "messages": [{ "role": "user", "content": "from the messages" }]
    });

    let response = server.client.post("/chat", &body).await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["content"], "from the prompt");
}

#[tokio::test]
async fn first_prompt_with_empty_history() {
    let mock = GroqMock::echo().spawn().await.unwrap();
    let server = TestServer::with_groq(&mock, "").await;

    let response = server
        .client
        .post("/chat", &json!({ "prompt": "hello", "messages": [] }))
        .await;

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["content"], "hello");
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn content_parts_are_joined() {
    let content = json!([
        "first line",
        { "type": "text", "text": "second line" },
        { "type": "image_url", "image_url": { "url": "https://example.com/cat.png" } }
    ]);

    let mock = GroqMock::with_content(content).spawn().await.unwrap();
    let server = TestServer::with_groq(&mock, "").await;

    let response = server.client.post("/chat", &json!({ "prompt": "hi" })).await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();

    assert_json_snapshot!(body, @r#"
    {
      "content": "first line\nsecond line"
    }
    "#);
}

#[tokio::test]
async fn padded_reply_is_trimmed() {
    let mock = GroqMock::with_content(json!("\n  4  \n")).spawn().await.unwrap();
    let server = TestServer::with_groq(&mock, "").await;

    let response = server.client.post("/chat", &json!({ "prompt": "2+2" })).await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["content"], "4");
}

#[tokio::test]
async fn custom_chat_path() {
    let mock = GroqMock::echo().spawn().await.unwrap();
    let server = TestServer::with_groq(&mock, "path = \"/api/chat\"").await;

    let response = server.client.post("/api/chat", &json!({ "prompt": "moved" })).await;
    assert_eq!(response.status(), 200);

    let response = server.client.post("/chat", &json!({ "prompt": "moved" })).await;
    assert_eq!(response.status(), 404);
}
