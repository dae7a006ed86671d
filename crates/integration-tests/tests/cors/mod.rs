use indoc::indoc;
use integration_tests::TestServer;
use reqwest::Method;

async fn preflight(server: &TestServer, origin: &str) -> reqwest::Response {
    server
        .client
        .request(Method::OPTIONS, "/chat")
        .header("Origin", origin)
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn any_origin_by_default() {
    let config = indoc! {r#"
        [chat]
        api_key = "gsk_test"
    "#};

    let server = TestServer::start(config).await;
    let response = preflight(&server, "http://localhost:5173").await;

    assert_eq!(response.status(), 200);

    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert!(headers.contains_key("access-control-allow-methods"));
}

#[tokio::test]
async fn explicit_origins_with_credentials() {
    let config = indoc! {r#"
        [server.cors]
        allow_origins = ["https://app.example.com"]
        allow_credentials = true
        max_age = "10m"

        [chat]
        api_key = "gsk_test"
    "#};

    let server = TestServer::start(config).await;

    let response = preflight(&server, "https://app.example.com").await;
    let headers = response.headers();

    assert_eq!(headers["access-control-allow-origin"], "https://app.example.com");
    assert_eq!(headers["access-control-allow-credentials"], "true");
    assert_eq!(headers["access-control-max-age"], "600");

    let response = preflight(&server, "https://other.example.com").await;
    assert!(!response.headers().contains_key("access-control-allow-origin"));
}
