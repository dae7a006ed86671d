//! Access log middleware
//!
//! Logs method, route, status and latency of every HTTP request.

use std::{
    fmt::Display,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};

use axum::{body::Body, extract::MatchedPath};
use http::{Request, Response};
use tower::Layer;

/// Layer for HTTP access logging
#[derive(Clone, Default)]
pub struct AccessLogLayer;

impl<Service> Layer<Service> for AccessLogLayer
where
    Service: Send + Clone,
{
    type Service = AccessLogService<Service>;

    fn layer(&self, next: Service) -> Self::Service {
        AccessLogService { next }
    }
}

/// Service that logs HTTP requests
#[derive(Clone)]
pub struct AccessLogService<Service> {
    next: Service,
}

impl<Service, ReqBody> tower::Service<Request<ReqBody>> for AccessLogService<Service>
where
    Service: tower::Service<Request<ReqBody>, Response = Response<Body>> + Send + Clone + 'static,
    Service::Future: Send,
    Service::Error: Display + 'static,
    ReqBody: http_body::Body + Send + 'static,
{
    type Response = Response<Body>;
    type Error = Service::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response<Body>, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.next.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let route = req
            .extensions()
            .get::<MatchedPath>()
            .map(|matched_path| matched_path.as_str().to_owned())
            .unwrap_or_else(|| req.uri().path().to_owned());

        let method = req.method().clone();
        let mut next = self.next.clone();

        Box::pin(async move {
            let start = Instant::now();

            let response = match next.call(req).await {
                Ok(response) => response,
                Err(e) => {
                    log::error!("{method} {route} failed: {e}");
                    return Err(e);
                }
            };

            let status = response.status().as_u16();
            let elapsed_ms = start.elapsed().as_millis() as u64;

            if response.status().is_server_error() {
                log::warn!(method:% = method, route:% = route, status = status, elapsed_ms = elapsed_ms; "{method} {route} -> {status} in {elapsed_ms}ms");
            } else {
                log::info!(method:% = method, route:% = route, status = status, elapsed_ms = elapsed_ms; "{method} {route} -> {status} in {elapsed_ms}ms");
            }

            Ok(response)
        })
    }
}
