//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Create the Axum router with the relay routes
//! - Wire up middleware (tracing, request ID, optional timeout)
//! - Bind the server to a listener and drain it on shutdown
//! - Convert pipeline results into HTTP responses

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::observability::metrics;
use crate::relay::{self, RelayError, Rewriter};

/// Application state injected into handlers.
///
/// The client and rewriter are the only things requests share; both are
/// immutable, so handlers need no locking.
#[derive(Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub rewriter: Arc<Rewriter>,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Self {
        let state = AppState {
            client: reqwest::Client::new(),
            rewriter: Arc::new(Rewriter::from_config(&config.rewrite)),
        };

        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/api/{*target}", get(relay_handler))
            .route("/api", get(missing_target_handler))
            .route("/api/", get(missing_target_handler))
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

        // Inbound deadline is opt-in; without it a hung upstream hangs its
        // request rather than being cut short.
        if let Some(secs) = config.timeouts.request_secs {
            router = router.layer(TimeoutLayer::new(Duration::from_secs(secs)));
        }

        router
    }

    /// Run the server until shutdown is signalled.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown.recv() => {}
                    _ = shutdown_signal() => {}
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main relay handler.
/// Resolves the target, runs the pipeline, and emits the document.
async fn relay_handler(
    State(state): State<AppState>,
    Path(target): Path<String>,
    headers: HeaderMap,
) -> Response {
    let start_time = Instant::now();
    let request_id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    tracing::debug!(
        request_id = %request_id,
        target = %target,
        "Relaying request"
    );

    // The wildcard keeps the slashes the caller sent; the resolver wants
    // the individual segments.
    let segments: Vec<&str> = target.split('/').collect();

    match relay::relay(&state.client, &state.rewriter, &segments).await {
        Ok(document) => {
            tracing::debug!(
                request_id = %request_id,
                bytes = document.len(),
                "Relayed document"
            );
            metrics::record_request(StatusCode::OK.as_u16(), "success", start_time);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/html"),
                    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
                ],
                document,
            )
                .into_response()
        }
        Err(error) => {
            tracing::warn!(
                request_id = %request_id,
                outcome = error.outcome(),
                error = %error,
                "Relay failed"
            );
            metrics::record_request(error.status().as_u16(), error.outcome(), start_time);
            error.into_response()
        }
    }
}

/// A bare `/api` carries no target URL at all.
async fn missing_target_handler() -> Response {
    metrics::record_request(
        StatusCode::BAD_REQUEST.as_u16(),
        "missing_target",
        Instant::now(),
    );
    RelayError::MissingTarget.into_response()
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
