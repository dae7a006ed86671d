//! Graphchain server library.
//!
//! Provides a reusable server function to serve Graphchain either for the binary, or for the integration tests.

#![deny(missing_docs)]

mod access_log;
mod cors;
mod health;

use std::net::SocketAddr;

use access_log::AccessLogLayer;
use anyhow::anyhow;
use axum::{Router, routing::get};
use config::Config;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

/// Configuration for serving Graphchain.
pub struct ServeConfig {
    /// The socket address (IP and port) the server will bind to
    pub listen_address: SocketAddr,
    /// The deserialized and overridden Graphchain configuration.
    pub config: Config,
    /// Cancelling this token stops accepting connections and drains in-flight requests.
    pub shutdown: CancellationToken,
}

/// Builds the application router: the chat endpoint, and the health endpoint if enabled.
///
/// Fails when the configuration cannot serve traffic, e.g. without an API key.
pub fn app(config: &Config) -> anyhow::Result<Router> {
    config.validate()?;

    let cors = if let Some(cors_config) = &config.server.cors {
        cors::generate(cors_config)
    } else {
        CorsLayer::permissive()
    };

    let chat_router = chat::router(&config.chat).map_err(|e| anyhow!("Failed to initialize chat router: {e}"))?;
    let mut app = Router::new().merge(chat_router);

    if config.server.health.enabled {
        app = app.route(&config.server.health.path, get(health::health));
    } else {
        log::debug!("Health endpoint disabled");
    }

    Ok(app.layer(cors).layer(AccessLogLayer))
}

/// Starts and runs the Graphchain server with the provided configuration.
pub async fn serve(
    ServeConfig {
        listen_address,
        config,
        shutdown,
    }: ServeConfig,
) -> anyhow::Result<()> {
    let app = app(&config)?;

    let listener = TcpListener::bind(listen_address)
        .await
        .map_err(|e| anyhow!("Failed to bind to {listen_address}: {e}"))?;

    log::info!("Chat endpoint available at: http://{listen_address}{}", config.chat.path);

    if config.server.health.enabled {
        log::info!(
            "Health check endpoint exposed at http://{listen_address}{}",
            config.server.health.path
        );
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| anyhow!("Failed to start HTTP server: {e}"))?;

    log::info!("Server stopped");

    Ok(())
}
