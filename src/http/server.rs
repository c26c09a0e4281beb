//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router that sends every request to the wrapped handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Convert between axum requests/responses and the canonical model
//! - Bind server to listener, with optional TLS
//!
//! # Design Decisions
//! - The handler is synchronous and runs on the blocking pool
//! - Responses are finalized with the same Content-Type/Content-Length rules as event mode
//! - A handler panic becomes a bare 500; the connection stays usable
//! - A path with a malformed percent escape is answered with 400 before the handler runs

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Request as HttpRequest, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::adapter::{serve_captured, Handler};
use crate::canonical::{Request, RequestContext};
use crate::config::{AdapterConfig, GatewayConfig};
use crate::http::request::{propagate_request_id, set_request_id, X_REQUEST_ID};
use crate::net::tls::load_tls_config;
use crate::response::{finalize, FinalizedResponse};

/// Application state injected into handlers.
struct AppState<H> {
    handler: Arc<H>,
    adapter: Arc<AdapterConfig>,
    max_body_bytes: usize,
}

impl<H> Clone for AppState<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            adapter: Arc::clone(&self.adapter),
            max_body_bytes: self.max_body_bytes,
        }
    }
}

/// HTTP server hosting a synchronous handler on a listening socket.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new<H: Handler>(handler: Arc<H>, config: GatewayConfig) -> Self {
        let state = AppState {
            handler,
            adapter: Arc::new(config.adapter.clone().normalized()),
            max_body_bytes: config.listener.max_body_bytes,
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router<H: Handler>(config: &GatewayConfig, state: AppState<H>) -> Router {
        Router::new()
            .fallback(serve_request::<H>)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(set_request_id())
                    .layer(propagate_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;

        if let Some(tls) = self.config.listener.tls.clone() {
            // axum-server owns its own bind; release ours first.
            drop(listener);
            return self.run_tls(addr, &tls.cert_path, &tls.key_path, shutdown).await;
        }

        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    async fn run_tls(
        self,
        addr: SocketAddr,
        cert_path: &str,
        key_path: &str,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let rustls = load_tls_config(Path::new(cert_path), Path::new(key_path)).await?;
        let handle = axum_server::Handle::new();
        let grace = Duration::from_secs(self.config.timeouts.shutdown_grace_secs);

        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!("Shutdown signal received");
            shutdown_handle.graceful_shutdown(Some(grace));
        });

        tracing::info!(address = %addr, "HTTPS server starting");
        axum_server::bind_rustls(addr, rustls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Fallback handler: every request goes to the wrapped handler.
async fn serve_request<H: Handler>(
    State(state): State<AppState<H>>,
    request: HttpRequest,
) -> Response {
    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Request body rejected");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let request_id = parts
        .headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let context = RequestContext {
        request_id,
        deadline: None,
    };
    let request = match Request::from_http(&parts, body, &state.adapter, context) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "Request rejected");
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    tracing::debug!(
        request_id = request.request_id().unwrap_or("-"),
        method = %request.method(),
        path = %request.path(),
        "Dispatching request"
    );

    let handler = Arc::clone(&state.handler);
    let served = tokio::task::spawn_blocking(move || serve_captured(handler.as_ref(), &request)).await;

    match served {
        Ok(Ok(capture)) => into_http_response(finalize(capture)),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Handler failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Handler task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Convert a finalized capture into an axum response.
///
/// Headers that are not valid HTTP field names or values are dropped with a warning.
pub fn into_http_response(finalized: FinalizedResponse) -> Response {
    let status = match StatusCode::from_u16(finalized.status) {
        Ok(status) => status,
        Err(_) => {
            tracing::error!(status = finalized.status, "Handler set an invalid status code");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let mut response = Response::new(Body::from(finalized.body));
    *response.status_mut() = status;

    let headers = response.headers_mut();
    for (name, value) in finalized.headers.pairs() {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => tracing::warn!(header = name, "Dropping invalid response header"),
        }
    }
    response
}
