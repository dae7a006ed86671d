//! Harness for end-to-end tests: a real Graphchain server talking to a mock Groq upstream.

mod groq;

use std::{net::SocketAddr, time::Duration};

use config::Config;
use reqwest::Method;
use server::ServeConfig;
use tokio::{net::TcpListener, time::timeout};
use tokio_util::sync::{CancellationToken, DropGuard};

pub use groq::{GroqMock, RunningGroqMock};

/// Test client for making HTTP requests to the test server
pub struct TestClient {
    base_url: String,
    client: reqwest::Client,
}

impl TestClient {
    /// Create a new test client for the given base URL
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Send a GET request to the given path
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .unwrap()
    }

    /// Send a POST request to the given path with JSON body
    pub async fn post<T: serde::Serialize>(&self, path: &str, body: &T) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .unwrap()
    }

    /// Send a POST request with a body that is sent as is, JSON or not.
    pub async fn post_raw(&self, path: &str, body: impl Into<String>) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .header("content-type", "application/json")
            .body(body.into())
            .send()
            .await
            .unwrap()
    }

    /// Start building a request with an arbitrary method
    pub fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }
}

/// Test server that manages the lifecycle of a server instance
pub struct TestServer {
    pub client: TestClient,
    pub address: SocketAddr,
    _shutdown: DropGuard,
}

impl TestServer {
    /// Start a new test server with the given TOML configuration
    pub async fn start(config_toml: &str) -> Self {
        let config: Config = toml::from_str(config_toml).unwrap();

        // Find an available port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let shutdown = CancellationToken::new();

        let serve_config = ServeConfig {
            listen_address: address,
            config,
            shutdown: shutdown.clone(),
        };

        tokio::spawn(async move {
            if let Err(e) = server::serve(serve_config).await {
                eprintln!("Server failed to start: {e}");
            }
        });

        let client = TestClient::new(format!("http://{address}"));

        // Wait until the server accepts connections
        let mut retries = 20;
        while retries > 0 {
            let probe = client.client.get(format!("{}/health", client.base_url)).send();

            if let Ok(Ok(_)) = timeout(Duration::from_millis(100), probe).await {
                break;
            }

            retries -= 1;
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestServer {
            client,
            address,
            _shutdown: shutdown.drop_guard(),
        }
    }

    /// Start a server whose chat endpoint talks to the given mock.
    ///
    /// `extra_toml` is appended to the `[chat]` table.
    pub async fn with_groq(mock: &RunningGroqMock, extra_toml: &str) -> Self {
        let config = format!(
            "[chat]\napi_key = \"gsk_test\"\nbase_url = \"{}\"\n{extra_toml}",
            mock.base_url()
        );

        Self::start(&config).await
    }
}
