//! HTTP pull endpoint for the monitoring backend
//!
//! Each `GET` on the configured path runs one collection cycle across every
//! registered exporter and returns the text exposition. The endpoint holds no
//! state of its own; the backend decides the scrape cadence.

use crate::export::MetricsRegistry;
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use std::future::Future;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Router serving `registry` at `path`
#[must_use]
pub fn router(registry: MetricsRegistry, path: &str) -> Router {
    Router::new()
        .route(path, get(scrape))
        .with_state(registry)
}

async fn scrape(State(registry): State<MetricsRegistry>) -> Response {
    match registry.encode_text() {
        Ok(body) => ([(header::CONTENT_TYPE, registry.content_type())], body).into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Serve scrapes on `listener` until `shutdown` resolves
///
/// # Errors
/// Returns the underlying I/O error if the listener fails.
pub async fn serve<F>(
    listener: TcpListener,
    registry: MetricsRegistry,
    path: &str,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("Serving KCP metrics on http://{}{}", addr, path);

    axum::serve(listener, router(registry, path))
        .with_graceful_shutdown(shutdown)
        .await
}
