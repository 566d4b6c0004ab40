//! Request tracing middleware.
//!
//! Every request runs inside an `api_request` span carrying method and path.
//! On completion the status and latency are recorded on the span and one
//! event is emitted whose level follows the status class: server errors at
//! `warn`, client errors at `debug`, everything else at `info`.

use axum::{body::Body, http::Request, http::StatusCode, response::Response};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};
use tracing::{debug, info, info_span, warn, Instrument, Span};

/// Wraps routes in [`TracingService`].
#[derive(Clone, Default)]
pub struct TracingLayer;

impl TracingLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for TracingLayer {
    type Service = TracingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TracingService { inner }
    }
}

#[derive(Clone)]
pub struct TracingService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for TracingService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        // Take the clone that was driven to readiness, leave a fresh one behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let span = info_span!(
            "api_request",
            http.method = %req.method(),
            http.path = %req.uri().path(),
            http.status_code = tracing::field::Empty,
            latency_ms = tracing::field::Empty,
        );
        let started = Instant::now();

        Box::pin(
            async move {
                let response = inner.call(req).await?;
                let latency_ms = started.elapsed().as_millis() as u64;
                log_completion(response.status(), latency_ms);
                Ok(response)
            }
            .instrument(span),
        )
    }
}

fn log_completion(status: StatusCode, latency_ms: u64) {
    let span = Span::current();
    span.record("http.status_code", status.as_u16());
    span.record("latency_ms", latency_ms);

    let code = status.as_u16();
    if status.is_server_error() {
        warn!(status = code, latency_ms, "Request failed");
    } else if status.is_client_error() {
        debug!(status = code, latency_ms, "Request rejected");
    } else {
        info!(status = code, latency_ms, "Request completed");
    }
}
